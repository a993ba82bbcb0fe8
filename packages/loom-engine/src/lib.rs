pub mod cross_match;
pub mod documents;
pub mod search;

use std::{future::Future, pin::Pin, sync::Arc};

pub use cross_match::{
	ColorGroup, CrossMatch, CrossMatchRequest, CrossMatchResponse, CrossMatchedDocument,
};
pub use documents::{Candidate, Document, Opportunity, PoolId, PoolSelector};
pub use search::{RankedMatch, SearchRequest, SearchResponse};

use loom_config::{Config, EmbeddingProviderConfig};
use loom_providers::embedding;

pub type EngineResult<T> = Result<T, EngineError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Produces embedding vectors for free text.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, EngineResult<Vec<Vec<f32>>>>;
}

/// Supplies the documents of one pool.
pub trait DocumentPool
where
	Self: Send + Sync,
{
	fn fetch_all<'a>(&'a self, pool: PoolId) -> BoxFuture<'a, EngineResult<Vec<Document>>>;
}

#[derive(Debug)]
pub enum EngineError {
	InvalidRequest { message: String },
	Provider { message: String },
	Pool { message: String },
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}

pub struct LoomEngine {
	pub cfg: Config,
	pub pool: Arc<dyn DocumentPool>,
	pub providers: Providers,
}

struct DefaultProviders;

impl std::fmt::Display for EngineError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::Pool { message } => write!(f, "Pool error: {message}"),
		}
	}
}

impl std::error::Error for EngineError {}

impl From<loom_providers::Error> for EngineError {
	fn from(err: loom_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, EngineResult<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

impl LoomEngine {
	pub fn new(cfg: Config, pool: Arc<dyn DocumentPool>) -> Self {
		Self { cfg, pool, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, pool: Arc<dyn DocumentPool>, providers: Providers) -> Self {
		Self { cfg, pool, providers }
	}

	/// Embeds the query once per request; every pool comparison reuses the
	/// returned vector.
	pub(crate) async fn embed_query(&self, query: &str) -> EngineResult<Vec<f32>> {
		let texts = [query.to_string()];
		let mut vectors =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;

		if vectors.is_empty() {
			return Err(EngineError::Provider {
				message: "Embedding provider returned no vectors for the query.".to_string(),
			});
		}

		let vector = vectors.swap_remove(0);

		if vector.len() != self.cfg.providers.embedding.dimensions as usize {
			tracing::warn!(
				expected = self.cfg.providers.embedding.dimensions,
				actual = vector.len(),
				"Query embedding dimensions differ from the configured value.",
			);
		}

		Ok(vector)
	}

	/// Fetches one pool, dropping documents whose variant does not match the
	/// requested pool.
	pub(crate) async fn fetch_pool(&self, pool: PoolId) -> EngineResult<Vec<Document>> {
		let documents = self.pool.fetch_all(pool).await?;
		let mut out = Vec::with_capacity(documents.len());

		for document in documents {
			if document.pool() != pool {
				tracing::warn!(
					document_id = %document.id(),
					expected = pool.as_str(),
					"Pool returned a document of the wrong kind; skipping.",
				);

				continue;
			}

			out.push(document);
		}

		Ok(out)
	}
}
