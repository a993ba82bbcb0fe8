use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};

#[test]
fn builds_bearer_auth_header() {
	let headers =
		loom_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn forwards_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-request-tier".to_string(), Value::String("batch".to_string()));

	let headers =
		loom_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");
	let value = headers.get("x-request-tier").expect("Missing default header.");

	assert_eq!(value, "batch");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::Number(3.into()));

	let err = loom_providers::auth_headers("secret", &defaults)
		.expect_err("Expected non-string header error.");

	assert!(err.to_string().contains("must be a string value"));
}
