use std::collections::{HashMap, HashSet};

use loom_domain::similarity;

use crate::{
	EngineError, EngineResult, LoomEngine,
	documents::{Document, PoolId},
	search::ranking,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrossMatchRequest {
	pub query: String,
	pub limit: Option<u32>,
	pub min_similarity: Option<f32>,
	/// Minimum pairwise cosine similarity for an opportunity-candidate pair
	/// to count as a cross match.
	pub cross_match_threshold: Option<f32>,
}

/// One opportunity-candidate pair whose embeddings agree.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrossMatch {
	pub opportunity_id: String,
	pub candidate_id: String,
	pub pair_similarity: f32,
}

/// A shortlisted document annotated with its hub color.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrossMatchedDocument {
	pub id: String,
	pub similarity: f32,
	pub color_index: u32,
}

/// All documents sharing one hub opportunity's color.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ColorGroup {
	pub color_index: u32,
	pub opportunity_ids: Vec<String>,
	pub candidate_ids: Vec<String>,
	pub match_count: u64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrossMatchResponse {
	pub trace_id: uuid::Uuid,
	pub opportunities: Vec<CrossMatchedDocument>,
	pub candidates: Vec<CrossMatchedDocument>,
	pub cross_matches: Vec<CrossMatch>,
	pub color_groups: Vec<ColorGroup>,
}

/// A shortlisted document with the embedding used for pairwise comparison.
struct ShortlistEntry {
	id: String,
	final_similarity: f32,
	embedding: Vec<f32>,
}

struct PairingOutcome {
	cross_matches: Vec<CrossMatch>,
	opportunity_colors: HashMap<String, u32>,
	candidate_colors: HashMap<String, u32>,
	assigned_colors: u32,
}

impl LoomEngine {
	/// Runs the query against both pools, then pairs the two shortlists by
	/// embedding similarity and groups the pairs around hub opportunities.
	pub async fn search_cross_matched(
		&self,
		req: CrossMatchRequest,
	) -> EngineResult<CrossMatchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(EngineError::InvalidRequest { message: "query is required.".to_string() });
		}

		let limit = req.limit.unwrap_or(self.cfg.engine.default_limit).max(1);
		let min_similarity = req.min_similarity.unwrap_or(self.cfg.engine.default_min_similarity);
		let threshold =
			req.cross_match_threshold.unwrap_or(self.cfg.engine.cross_match_threshold);
		let trace_id = uuid::Uuid::new_v4();

		let embedding = self.embed_query(query).await?;
		let ctx = ranking::QueryContext::plain(embedding);

		let opportunities = self.fetch_pool(PoolId::Opportunities).await?;
		let opportunity_shortlist =
			build_shortlist(&self.cfg, &ctx, min_similarity, limit, &opportunities);

		let candidates = self.fetch_pool(PoolId::Candidates).await?;
		let candidates = self.backfill_candidate_embeddings(candidates, limit).await;
		let candidate_shortlist =
			build_shortlist(&self.cfg, &ctx, min_similarity, limit, &candidates);

		let outcome = pair_shortlists(
			threshold,
			self.cfg.engine.palette_size,
			&opportunity_shortlist,
			&candidate_shortlist,
		);
		let color_groups =
			build_color_groups(&outcome, &opportunity_shortlist, &candidate_shortlist);
		let matched_opportunities: HashSet<&str> =
			outcome.cross_matches.iter().map(|pair| pair.opportunity_id.as_str()).collect();
		let matched_candidates: HashSet<&str> =
			outcome.cross_matches.iter().map(|pair| pair.candidate_id.as_str()).collect();
		let opportunities =
			annotate(&opportunity_shortlist, &matched_opportunities, &outcome.opportunity_colors);
		let candidates =
			annotate(&candidate_shortlist, &matched_candidates, &outcome.candidate_colors);

		tracing::debug!(
			%trace_id,
			pairs = outcome.cross_matches.len(),
			groups = color_groups.len(),
			"Cross match completed.",
		);

		Ok(CrossMatchResponse {
			trace_id,
			opportunities,
			candidates,
			cross_matches: outcome.cross_matches,
			color_groups,
		})
	}

	/// Embeds candidates that arrive without a vector, budgeted to `limit`
	/// calls per request. Failures skip the candidate rather than failing the
	/// whole request.
	async fn backfill_candidate_embeddings(
		&self,
		documents: Vec<Document>,
		budget: u32,
	) -> Vec<Document> {
		let mut remaining = budget;
		let mut out = Vec::with_capacity(documents.len());

		for mut document in documents {
			if document.embedding().is_some()
				|| document.searchable_text().trim().is_empty()
			{
				out.push(document);

				continue;
			}
			if remaining == 0 {
				tracing::debug!(
					document_id = %document.id(),
					"Embedding budget exhausted; candidate left unscored.",
				);
				out.push(document);

				continue;
			}

			remaining -= 1;

			let texts = [document.searchable_text().to_string()];

			match self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await {
				Ok(mut vectors) if !vectors.is_empty() => {
					document.set_embedding(vectors.swap_remove(0));
				},
				Ok(_) => {
					tracing::warn!(
						document_id = %document.id(),
						"Embedding provider returned no vector; skipping candidate.",
					);
				},
				Err(err) => {
					tracing::warn!(
						document_id = %document.id(),
						error = %err,
						"On-demand embedding failed; skipping candidate.",
					);
				},
			}

			out.push(document);
		}

		out
	}
}

/// Plain-ranks one pool and keeps the top `limit` entries together with the
/// embeddings needed for pairing.
fn build_shortlist(
	cfg: &loom_config::Config,
	ctx: &ranking::QueryContext,
	min_similarity: f32,
	limit: u32,
	documents: &[Document],
) -> Vec<ShortlistEntry> {
	let mut scored: Vec<(crate::search::RankedMatch, &Document)> = Vec::new();

	for document in documents {
		let Some(ranked) = ranking::score_document(cfg, ctx, document) else {
			continue;
		};

		if ranked.final_similarity < min_similarity {
			continue;
		}

		scored.push((ranked, document));
	}

	scored.sort_by(|a, b| ranking::compare_matches(&a.0, &b.0));
	scored.truncate(limit as usize);

	scored
		.into_iter()
		.filter_map(|(ranked, document)| {
			let embedding = document.embedding()?.to_vec();

			Some(ShortlistEntry {
				id: ranked.document_id,
				final_similarity: ranked.final_similarity,
				embedding,
			})
		})
		.collect()
}

/// Compares every shortlist pair and assigns hub colors.
///
/// Opportunities are visited in shortlist order; the first recorded match of
/// an opportunity claims the next free color (until the palette runs out).
/// Candidates inherit the color of the last colored opportunity they matched.
fn pair_shortlists(
	threshold: f32,
	palette_size: u32,
	opportunities: &[ShortlistEntry],
	candidates: &[ShortlistEntry],
) -> PairingOutcome {
	let mut outcome = PairingOutcome {
		cross_matches: Vec::new(),
		opportunity_colors: HashMap::new(),
		candidate_colors: HashMap::new(),
		assigned_colors: 0,
	};

	for opportunity in opportunities {
		for candidate in candidates {
			let pair_similarity =
				similarity::cosine(&opportunity.embedding, &candidate.embedding);

			if pair_similarity < threshold {
				continue;
			}

			outcome.cross_matches.push(CrossMatch {
				opportunity_id: opportunity.id.clone(),
				candidate_id: candidate.id.clone(),
				pair_similarity,
			});

			if !outcome.opportunity_colors.contains_key(&opportunity.id)
				&& outcome.assigned_colors < palette_size
			{
				outcome.opportunity_colors.insert(opportunity.id.clone(), outcome.assigned_colors);
				outcome.assigned_colors += 1;
			}
			if let Some(color) = outcome.opportunity_colors.get(&opportunity.id).copied() {
				// Last write wins when a candidate matches several hubs.
				outcome.candidate_colors.insert(candidate.id.clone(), color);
			}
		}
	}

	outcome
}

/// Collects the documents carrying each assigned color. `match_count` is the
/// size of the cartesian product of each group's two sides.
fn build_color_groups(
	outcome: &PairingOutcome,
	opportunities: &[ShortlistEntry],
	candidates: &[ShortlistEntry],
) -> Vec<ColorGroup> {
	let mut groups = Vec::with_capacity(outcome.assigned_colors as usize);

	for color_index in 0..outcome.assigned_colors {
		let opportunity_ids: Vec<String> = opportunities
			.iter()
			.filter(|entry| outcome.opportunity_colors.get(&entry.id) == Some(&color_index))
			.map(|entry| entry.id.clone())
			.collect();
		let candidate_ids: Vec<String> = candidates
			.iter()
			.filter(|entry| outcome.candidate_colors.get(&entry.id) == Some(&color_index))
			.map(|entry| entry.id.clone())
			.collect();
		let match_count = opportunity_ids.len() as u64 * candidate_ids.len() as u64;

		groups.push(ColorGroup { color_index, opportunity_ids, candidate_ids, match_count });
	}

	groups
}

/// Keeps the shortlist entries that appear in at least one cross match, in
/// shortlist order, annotated with their color.
fn annotate(
	shortlist: &[ShortlistEntry],
	matched: &HashSet<&str>,
	colors: &HashMap<String, u32>,
) -> Vec<CrossMatchedDocument> {
	shortlist
		.iter()
		.filter(|entry| matched.contains(entry.id.as_str()))
		.map(|entry| CrossMatchedDocument {
			id: entry.id.clone(),
			similarity: entry.final_similarity,
			color_index: colors.get(&entry.id).copied().unwrap_or(0),
		})
		.collect()
}
