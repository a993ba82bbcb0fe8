pub(crate) mod ranking;

use loom_domain::{classify, skills};

use crate::{
	EngineError, EngineResult, LoomEngine,
	documents::{PoolId, PoolSelector},
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub query: String,
	#[serde(default)]
	pub pool: PoolSelector,
	pub limit: Option<u32>,
	pub min_similarity: Option<f32>,
	/// Overrides the skill set derived from the query when present and
	/// non-empty.
	#[serde(default)]
	pub skill_filter: Option<Vec<String>>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RankedMatch {
	pub pool: PoolId,
	pub document_id: String,
	pub base_similarity: f32,
	pub skill_score: f32,
	pub matched_skills: Vec<String>,
	pub has_required_skills: bool,
	pub final_similarity: f32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub trace_id: uuid::Uuid,
	pub matches: Vec<RankedMatch>,
}

impl LoomEngine {
	/// Pure semantic search: cosine similarity scaled by the plain base
	/// weight, no query classification and no skill scoring.
	pub async fn search_plain(&self, req: SearchRequest) -> EngineResult<SearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(EngineError::InvalidRequest { message: "query is required.".to_string() });
		}

		let limit = req.limit.unwrap_or(self.cfg.engine.default_limit).max(1);
		let min_similarity = req.min_similarity.unwrap_or(self.cfg.engine.default_min_similarity);
		let embedding = self.embed_query(query).await?;
		let ctx = ranking::QueryContext::plain(embedding);

		self.run_search(req.pool, &ctx, limit, min_similarity).await
	}

	/// Skill-aware search: classifies the query, derives (or accepts) a skill
	/// set, and blends skill scores into the ranking.
	pub async fn search_enhanced(&self, req: SearchRequest) -> EngineResult<SearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(EngineError::InvalidRequest { message: "query is required.".to_string() });
		}

		let limit = req.limit.unwrap_or(self.cfg.engine.default_limit).max(1);
		let min_similarity = req.min_similarity.unwrap_or(self.cfg.engine.default_min_similarity);
		let is_technical = classify::is_technical(&self.cfg.skills.technical_indicators, query);
		let skill_set = match req.skill_filter.as_deref() {
			Some(filter) if !filter.is_empty() => filter.to_vec(),
			_ => skills::extract(&self.cfg.skills, query),
		};

		if is_technical && skill_set.is_empty() {
			// Technical queries require at least one matched skill, so an
			// empty set rejects every document.
			tracing::debug!("Technical query matched no skill terms; results will be empty.");
		}

		let embedding = self.embed_query(query).await?;
		let ctx = ranking::QueryContext { embedding, is_technical, skill_set };

		self.run_search(req.pool, &ctx, limit, min_similarity).await
	}

	async fn run_search(
		&self,
		selector: PoolSelector,
		ctx: &ranking::QueryContext,
		limit: u32,
		min_similarity: f32,
	) -> EngineResult<SearchResponse> {
		let trace_id = uuid::Uuid::new_v4();
		let mut matches = Vec::new();

		for pool in selector.pools().iter().copied() {
			let documents = self.fetch_pool(pool).await?;

			matches.extend(ranking::rank_pool(&self.cfg, ctx, min_similarity, &documents));
		}

		ranking::sort_matches(&mut matches);
		matches.truncate(limit as usize);

		tracing::debug!(
			%trace_id,
			technical = ctx.is_technical,
			matches = matches.len(),
			"Search completed.",
		);

		Ok(SearchResponse { trace_id, matches })
	}
}
