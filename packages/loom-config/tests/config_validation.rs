use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use loom_config::Config;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn render(value: &Value) -> String {
	toml::to_string(value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("loom_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> loom_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = loom_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_template_is_valid() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Expected template config to load.");

	assert_eq!(cfg.engine.default_limit, 10);
	assert_eq!(cfg.providers.embedding.dimensions, 1536);
}

#[test]
fn default_limit_must_be_positive() {
	let mut value = sample_value();
	let engine = value
		.as_table_mut()
		.and_then(|root| root.get_mut("engine"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [engine].");

	engine.insert("default_limit".to_string(), Value::Integer(0));

	let err = load_payload(render(&value)).expect_err("Expected default_limit validation error.");

	assert!(
		err.to_string().contains("engine.default_limit must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn palette_size_must_be_positive() {
	let mut cfg = base_config();

	cfg.engine.palette_size = 0;

	let err = loom_config::validate(&cfg).expect_err("Expected palette_size validation error.");

	assert!(
		err.to_string().contains("engine.palette_size must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn palette_size_defaults_when_omitted() {
	let mut value = sample_value();
	let engine = value
		.as_table_mut()
		.and_then(|root| root.get_mut("engine"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [engine].");

	engine.remove("palette_size");

	let cfg = load_payload(render(&value)).expect("Expected config without palette_size to load.");

	assert_eq!(cfg.engine.palette_size, 10);
}

#[test]
fn min_similarity_must_be_finite() {
	let mut cfg = base_config();

	cfg.engine.default_min_similarity = f32::NAN;

	let err = loom_config::validate(&cfg).expect_err("Expected min similarity validation error.");

	assert!(
		err.to_string().contains("engine.default_min_similarity must be a finite number."),
		"Unexpected error: {err}"
	);
}

#[test]
fn embedding_dimensions_must_be_positive() {
	let mut value = sample_value();
	let embedding = value
		.as_table_mut()
		.and_then(|root| root.get_mut("providers"))
		.and_then(Value::as_table_mut)
		.and_then(|providers| providers.get_mut("embedding"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [providers.embedding].");

	embedding.insert("dimensions".to_string(), Value::Integer(0));

	let err = load_payload(render(&value)).expect_err("Expected dimensions validation error.");

	assert!(
		err.to_string().contains("providers.embedding.dimensions must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn embedding_api_key_must_be_non_empty() {
	let mut value = sample_value();
	let embedding = value
		.as_table_mut()
		.and_then(|root| root.get_mut("providers"))
		.and_then(Value::as_table_mut)
		.and_then(|providers| providers.get_mut("embedding"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [providers.embedding].");

	embedding.insert("api_key".to_string(), Value::String("   ".to_string()));

	let err = load_payload(render(&value)).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("providers.embedding.api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn ranking_weights_must_be_finite() {
	let mut cfg = base_config();

	cfg.ranking.technical_base_weight = f32::NAN;

	let err = loom_config::validate(&cfg).expect_err("Expected ranking weight validation error.");

	assert!(
		err.to_string().contains("ranking.technical_base_weight must be a finite number."),
		"Unexpected error: {err}"
	);
}

#[test]
fn ranking_weights_must_be_in_range() {
	let mut cfg = base_config();

	cfg.ranking.domain_mismatch_penalty = 1.01;

	let err =
		loom_config::validate(&cfg).expect_err("Expected ranking weight range validation error.");

	assert!(
		err.to_string().contains("ranking.domain_mismatch_penalty must be in the range 0.0-1.0."),
		"Unexpected error: {err}"
	);

	cfg = base_config();
	cfg.ranking.plain_skill_weight = -0.01;

	let err =
		loom_config::validate(&cfg).expect_err("Expected ranking weight range validation error.");

	assert!(
		err.to_string().contains("ranking.plain_skill_weight must be in the range 0.0-1.0."),
		"Unexpected error: {err}"
	);
}

#[test]
fn skill_terms_are_lowercased_on_load() {
	let mut value = sample_value();
	let skills = value
		.as_table_mut()
		.and_then(|root| root.get_mut("skills"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [skills].");

	skills.insert(
		"vocabulary".to_string(),
		Value::Array(vec![
			Value::String("Swift".to_string()),
			Value::String("  iOS  ".to_string()),
		]),
	);

	let cfg = load_payload(render(&value)).expect("Expected mixed-case config to load.");

	assert_eq!(cfg.skills.vocabulary, vec!["swift".to_string(), "ios".to_string()]);
}

#[test]
fn related_term_keys_are_lowercased_on_load() {
	let mut value = sample_value();
	let related = value
		.as_table_mut()
		.and_then(|root| root.get_mut("skills"))
		.and_then(Value::as_table_mut)
		.and_then(|skills| skills.get_mut("related_terms"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [skills.related_terms].");

	related.insert(
		"Swift".to_string(),
		Value::Array(vec![Value::String("  SwiftUI ".to_string())]),
	);

	let cfg = load_payload(render(&value)).expect("Expected mixed-case config to load.");
	let terms = cfg.skills.related_terms.get("swift").expect("Expected lowercased key.");

	assert!(terms.contains(&"swiftui".to_string()));
}

#[test]
fn vocabulary_of_blank_terms_is_rejected() {
	let mut value = sample_value();
	let skills = value
		.as_table_mut()
		.and_then(|root| root.get_mut("skills"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [skills].");

	skills.insert(
		"vocabulary".to_string(),
		Value::Array(vec![Value::String("   ".to_string()), Value::String(String::new())]),
	);

	let err =
		load_payload(render(&value)).expect_err("Expected empty vocabulary validation error.");

	assert!(
		err.to_string().contains("skills.vocabulary must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn ranking_and_skills_sections_are_optional() {
	let mut value = sample_value();
	let root = value.as_table_mut().expect("Template config must be a table.");

	root.remove("ranking");
	root.remove("skills");

	let cfg = load_payload(render(&value)).expect("Expected config without tuning tables to load.");

	assert_eq!(cfg.ranking.technical_base_weight, 0.7);
	assert_eq!(cfg.ranking.plain_base_weight, 0.8);
	assert!(cfg.skills.vocabulary.contains(&"swift".to_string()));
	assert!(cfg.skills.technical_indicators.contains(&"developer".to_string()));
}
