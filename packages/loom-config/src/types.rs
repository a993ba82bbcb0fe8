use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub engine: Engine,
	pub providers: Providers,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub skills: Skills,
}

#[derive(Debug, Deserialize)]
pub struct Engine {
	pub default_limit: u32,
	pub default_min_similarity: f32,
	pub cross_match_threshold: f32,
	#[serde(default = "default_palette_size")]
	pub palette_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Weights applied when composing a document's final score from its base
/// similarity and its skill score.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub technical_base_weight: f32,
	pub technical_skill_weight: f32,
	pub missing_skill_penalty: f32,
	pub domain_mismatch_penalty: f32,
	pub plain_base_weight: f32,
	pub plain_skill_weight: f32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			technical_base_weight: 0.7,
			technical_skill_weight: 0.3,
			missing_skill_penalty: 0.3,
			domain_mismatch_penalty: 0.5,
			plain_base_weight: 0.8,
			plain_skill_weight: 0.2,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Skills {
	pub vocabulary: Vec<String>,
	pub technical_indicators: Vec<String>,
	pub related_terms: HashMap<String, Vec<String>>,
}
impl Default for Skills {
	fn default() -> Self {
		let vocabulary = [
			"swift",
			"objective-c",
			"kotlin",
			"java",
			"javascript",
			"typescript",
			"python",
			"ruby",
			"rust",
			"golang",
			"c++",
			"c#",
			"php",
			"sql",
			"html",
			"css",
			"swiftui",
			"uikit",
			"react",
			"react native",
			"angular",
			"vue",
			"node.js",
			"django",
			"rails",
			"spring",
			"flutter",
			".net",
			"ios",
			"android",
			"macos",
			"linux",
			"aws",
			"azure",
			"gcp",
			"docker",
			"kubernetes",
			"terraform",
			"firebase",
			"postgres",
			"mysql",
			"mongodb",
			"redis",
			"kafka",
			"graphql",
			"grpc",
			"mobile",
			"frontend",
			"backend",
			"fullstack",
			"devops",
			"machine learning",
			"data science",
			"microservices",
			"ci/cd",
			"accessibility",
		]
		.into_iter()
		.map(str::to_string)
		.collect();
		let technical_indicators = [
			"software",
			"engineer",
			"engineering",
			"developer",
			"development",
			"programming",
			"programmer",
			"coding",
			"technical",
			"technology",
		]
		.into_iter()
		.map(str::to_string)
		.collect();
		let related_terms = [
			("swift", vec!["swiftui", "uikit", "xcode", "objective-c"]),
			("ios", vec!["iphone", "ipad", "app store", "xcode"]),
			("android", vec!["kotlin", "jetpack", "play store"]),
			("javascript", vec!["es6", "node.js", "npm"]),
			("react", vec!["jsx", "redux", "next.js", "react native"]),
			("python", vec!["pandas", "numpy", "django", "fastapi"]),
			("java", vec!["jvm", "spring", "maven"]),
			("kubernetes", vec!["k8s", "helm", "kubectl"]),
			("docker", vec!["container", "compose"]),
			("aws", vec!["ec2", "s3", "lambda", "dynamodb"]),
			("machine learning", vec!["pytorch", "tensorflow", "deep learning"]),
			("backend", vec!["microservices", "api design", "databases"]),
			("frontend", vec!["responsive design", "web apps"]),
			("devops", vec!["ci/cd", "terraform", "ansible"]),
			("postgres", vec!["postgresql"]),
		]
		.into_iter()
		.map(|(skill, terms)| {
			(skill.to_string(), terms.into_iter().map(str::to_string).collect())
		})
		.collect();

		Self { vocabulary, technical_indicators, related_terms }
	}
}

fn default_palette_size() -> u32 {
	10
}
