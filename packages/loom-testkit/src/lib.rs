//! Shared fixtures and in-memory doubles for the engine test suites.

use std::{
	collections::HashMap,
	sync::{
		Arc, Once,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::Map;

use loom_config::{Config, EmbeddingProviderConfig, Engine, Ranking, Skills};
use loom_engine::{
	BoxFuture, Candidate, Document, DocumentPool, EmbeddingProvider, EngineError, EngineResult,
	Opportunity, PoolId,
};

static TRACING: Once = Once::new();

/// Installs a fmt subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
	TRACING.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.try_init();
	});
}

/// Builds a config wired for the in-memory doubles, with the default ranking
/// and skill tables.
pub fn test_config(dimensions: u32) -> Config {
	Config {
		engine: Engine {
			default_limit: 10,
			default_min_similarity: 0.3,
			cross_match_threshold: 0.5,
			palette_size: 10,
		},
		providers: loom_config::Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "fixture".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "fixture-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "fixture-model".to_string(),
				dimensions,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		ranking: Ranking::default(),
		skills: Skills::default(),
	}
}

pub fn opportunity(id: &str, text: &str, embedding: Option<Vec<f32>>) -> Document {
	Document::Opportunity(Opportunity {
		id: id.to_string(),
		title: None,
		company: None,
		searchable_text: text.to_string(),
		embedding,
		extracted_skills: None,
	})
}

pub fn candidate(id: &str, text: &str, embedding: Option<Vec<f32>>) -> Document {
	Document::Candidate(Candidate {
		id: id.to_string(),
		name: None,
		headline: None,
		searchable_text: text.to_string(),
		embedding,
		extracted_skills: None,
	})
}

/// Serves fixed documents per pool.
pub struct StaticPool {
	opportunities: Vec<Document>,
	candidates: Vec<Document>,
}
impl StaticPool {
	pub fn new(opportunities: Vec<Document>, candidates: Vec<Document>) -> Self {
		Self { opportunities, candidates }
	}
}
impl DocumentPool for StaticPool {
	fn fetch_all<'a>(&'a self, pool: PoolId) -> BoxFuture<'a, EngineResult<Vec<Document>>> {
		let documents = match pool {
			PoolId::Opportunities => self.opportunities.clone(),
			PoolId::Candidates => self.candidates.clone(),
		};

		Box::pin(async move { Ok(documents) })
	}
}

/// Fails every fetch.
pub struct FailingPool;
impl DocumentPool for FailingPool {
	fn fetch_all<'a>(&'a self, pool: PoolId) -> BoxFuture<'a, EngineResult<Vec<Document>>> {
		Box::pin(async move {
			Err(EngineError::Pool {
				message: format!("The {} pool is unavailable.", pool.as_str()),
			})
		})
	}
}

/// Returns preconfigured vectors per exact text.
///
/// Texts without a configured vector embed to zeros, which cosine scores
/// as `0`.
pub struct FixedEmbedding {
	vectors: HashMap<String, Vec<f32>>,
}
impl FixedEmbedding {
	pub fn new() -> Self {
		Self { vectors: HashMap::new() }
	}

	pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
		self.vectors.insert(text.to_string(), vector);

		self
	}
}
impl Default for FixedEmbedding {
	fn default() -> Self {
		Self::new()
	}
}
impl EmbeddingProvider for FixedEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, EngineResult<Vec<Vec<f32>>>> {
		let dimensions = (cfg.dimensions as usize).max(1);
		let vectors = texts
			.iter()
			.map(|text| self.vectors.get(text).cloned().unwrap_or_else(|| vec![0.0; dimensions]))
			.collect::<Vec<_>>();

		Box::pin(async move { Ok(vectors) })
	}
}

/// Deterministic pseudo-embeddings derived from a BLAKE3 digest of the text.
pub struct HashEmbedding;
impl EmbeddingProvider for HashEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, EngineResult<Vec<Vec<f32>>>> {
		let dimensions = (cfg.dimensions as usize).max(1);
		let vectors =
			texts.iter().map(|text| hash_embedding(text, dimensions)).collect::<Vec<_>>();

		Box::pin(async move { Ok(vectors) })
	}
}

/// Maps the bytes of a BLAKE3 extended output into `[-1, 1]`.
pub fn hash_embedding(text: &str, dimensions: usize) -> Vec<f32> {
	let mut hasher = blake3::Hasher::new();

	hasher.update(text.as_bytes());

	let mut bytes = vec![0_u8; dimensions];

	hasher.finalize_xof().fill(&mut bytes);

	bytes.into_iter().map(|byte| byte as f32 / 127.5 - 1.0).collect()
}

/// Fails any call whose batch contains the trigger substring, otherwise
/// delegates to the wrapped provider.
pub struct FailingEmbedding {
	trigger: String,
	inner: Arc<dyn EmbeddingProvider>,
}
impl FailingEmbedding {
	pub fn new(trigger: &str, inner: Arc<dyn EmbeddingProvider>) -> Self {
		Self { trigger: trigger.to_string(), inner }
	}
}
impl EmbeddingProvider for FailingEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, EngineResult<Vec<Vec<f32>>>> {
		if texts.iter().any(|text| text.contains(&self.trigger)) {
			let message = format!("Refusing to embed text containing {:?}.", self.trigger);

			return Box::pin(async move { Err(EngineError::Provider { message }) });
		}

		self.inner.embed(cfg, texts)
	}
}

/// Counts calls, then delegates to the wrapped provider.
pub struct CountingEmbedding {
	calls: Arc<AtomicUsize>,
	inner: Arc<dyn EmbeddingProvider>,
}
impl CountingEmbedding {
	pub fn new(inner: Arc<dyn EmbeddingProvider>) -> Self {
		Self { calls: Arc::new(AtomicUsize::new(0)), inner }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl EmbeddingProvider for CountingEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, EngineResult<Vec<Vec<f32>>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		self.inner.embed(cfg, texts)
	}
}
