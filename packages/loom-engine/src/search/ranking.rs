use std::cmp::Ordering;

use loom_config::{Config, Ranking};
use loom_domain::{
	classify, similarity,
	skills::{self, SkillScore},
};

use crate::{documents::Document, search::RankedMatch};

/// Per-request query state shared by every document comparison.
pub(crate) struct QueryContext {
	pub(crate) embedding: Vec<f32>,
	pub(crate) is_technical: bool,
	pub(crate) skill_set: Vec<String>,
}
impl QueryContext {
	pub(crate) fn plain(embedding: Vec<f32>) -> Self {
		Self { embedding, is_technical: false, skill_set: Vec::new() }
	}
}

/// Scores one pool and applies the retain rule; callers sort and truncate.
pub(crate) fn rank_pool(
	cfg: &Config,
	ctx: &QueryContext,
	min_similarity: f32,
	documents: &[Document],
) -> Vec<RankedMatch> {
	let mut matches = Vec::new();

	for document in documents {
		let Some(ranked) = score_document(cfg, ctx, document) else {
			continue;
		};

		if ranked.final_similarity < min_similarity {
			continue;
		}
		if ctx.is_technical && !ranked.has_required_skills {
			continue;
		}

		matches.push(ranked);
	}

	matches
}

/// Scores a single document, or returns `None` when it cannot be scored
/// (missing embedding or blank text).
pub(crate) fn score_document(
	cfg: &Config,
	ctx: &QueryContext,
	document: &Document,
) -> Option<RankedMatch> {
	let embedding = document.embedding()?;
	let text = document.searchable_text();

	if text.trim().is_empty() {
		return None;
	}

	let base = similarity::cosine(&ctx.embedding, embedding);
	let skill = skills::score_against(&cfg.skills, &ctx.skill_set, text);
	let technical_document = ctx.is_technical
		&& classify::is_technical(&cfg.skills.technical_indicators, text);
	let final_similarity =
		compose_final(&cfg.ranking, ctx.is_technical, technical_document, base, &skill);

	Some(RankedMatch {
		pool: document.pool(),
		document_id: document.id().to_string(),
		base_similarity: base,
		skill_score: skill.score,
		matched_skills: skill.matched,
		has_required_skills: skill.has_required,
		final_similarity,
	})
}

/// Blends the base similarity with the skill score.
///
/// Technical queries weight matched skills heavily and punish documents that
/// carry none; on top of that, documents whose own text does not read as
/// technical are halved. Non-technical queries keep the base similarity
/// dominant.
pub(crate) fn compose_final(
	weights: &Ranking,
	technical_query: bool,
	technical_document: bool,
	base: f32,
	skill: &SkillScore,
) -> f32 {
	if !technical_query {
		return base * weights.plain_base_weight + skill.score * weights.plain_skill_weight;
	}

	let mut final_similarity = if skill.has_required {
		base * weights.technical_base_weight + skill.score * weights.technical_skill_weight
	} else {
		base * weights.missing_skill_penalty
	};

	if !technical_document {
		final_similarity *= weights.domain_mismatch_penalty;
	}

	final_similarity
}

/// Documents carrying a required skill always outrank those without one;
/// within each band the final similarity decides, descending.
pub(crate) fn sort_matches(matches: &mut [RankedMatch]) {
	matches.sort_by(compare_matches);
}

pub(crate) fn compare_matches(a: &RankedMatch, b: &RankedMatch) -> Ordering {
	b.has_required_skills
		.cmp(&a.has_required_skills)
		.then_with(|| cmp_f32_desc(a.final_similarity, b.final_similarity))
}

// NaN sorts last so a poisoned score cannot float to the top.
pub(crate) fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	b.partial_cmp(&a).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}
