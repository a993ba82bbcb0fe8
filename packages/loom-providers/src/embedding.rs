use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use loom_config::EmbeddingProviderConfig;

/// Requests embeddings for every text in a single call.
///
/// The wire format is the OpenAI-compatible `/v1/embeddings` shape, so any
/// provider speaking it can back the engine.
pub async fn embed(cfg: &EmbeddingProviderConfig, texts: &[String]) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_embedding_response(json, texts.len())
}

fn parse_embedding_response(json: Value, expected: usize) -> Result<Vec<Vec<f32>>> {
	let data = json.get("data").and_then(Value::as_array).ok_or_else(|| Error::InvalidResponse {
		message: "Embedding response is missing the data array.".to_string(),
	})?;
	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(Value::as_u64)
			.map(|index| index as usize)
			.unwrap_or(fallback_index);
		let values = item.get("embedding").and_then(Value::as_array).ok_or_else(|| {
			Error::InvalidResponse {
				message: "Embedding item is missing the embedding array.".to_string(),
			}
		})?;
		let mut vector = Vec::with_capacity(values.len());

		for value in values {
			let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
				message: "Embedding values must be numeric.".to_string(),
			})?;

			vector.push(number as f32);
		}

		indexed.push((index, vector));
	}

	if indexed.len() != expected {
		return Err(Error::InvalidResponse {
			message: format!(
				"Embedding response returned {} vectors for {expected} inputs.",
				indexed.len()
			),
		});
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}
