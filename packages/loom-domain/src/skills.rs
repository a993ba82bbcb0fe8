use loom_config::Skills;

use crate::normalize;

/// Score contribution when a skill itself appears in the text.
pub const DIRECT_MATCH_WEIGHT: f32 = 0.3;
/// Score contribution for each related term of a skill found in the text.
pub const RELATED_MATCH_WEIGHT: f32 = 0.15;

/// Outcome of scoring one document text against a query's skill set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillScore {
	/// Accumulated weight over direct and related matches; not clamped.
	pub score: f32,
	/// Canonical skill labels that matched, in skill-set order, deduplicated.
	pub matched: Vec<String>,
	pub has_required: bool,
}

/// Collects the vocabulary terms present in the text, in vocabulary order.
pub fn extract(skills: &Skills, text: &str) -> Vec<String> {
	let folded = normalize::fold(text);

	skills.vocabulary.iter().filter(|term| folded.contains(term.as_str())).cloned().collect()
}

/// Scores the text against each skill in the set.
///
/// A direct occurrence of the skill adds [`DIRECT_MATCH_WEIGHT`] once; every
/// related term found adds [`RELATED_MATCH_WEIGHT`] on top. Either kind of hit
/// records the canonical skill label, never the related term.
pub fn score_against(skills: &Skills, skill_set: &[String], text: &str) -> SkillScore {
	let folded = normalize::fold(text);
	let mut result = SkillScore::default();

	for skill in skill_set {
		let folded_skill = normalize::fold(skill);
		let skill = folded_skill.trim();

		if skill.is_empty() {
			continue;
		}
		if folded.contains(skill) {
			result.score += DIRECT_MATCH_WEIGHT;

			record(&mut result.matched, skill);
		}

		let Some(related) = skills.related_terms.get(skill) else {
			continue;
		};

		for term in related {
			if !term.is_empty() && folded.contains(term.as_str()) {
				result.score += RELATED_MATCH_WEIGHT;

				record(&mut result.matched, skill);
			}
		}
	}

	result.has_required = !result.matched.is_empty();

	result
}

fn record(matched: &mut Vec<String>, skill: &str) {
	if !matched.iter().any(|existing| existing == skill) {
		matched.push(skill.to_string());
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use loom_config::Skills;

	use super::{DIRECT_MATCH_WEIGHT, RELATED_MATCH_WEIGHT, extract, score_against};

	fn test_skills() -> Skills {
		let mut related_terms = HashMap::new();

		related_terms
			.insert("swift".to_string(), vec!["swiftui".to_string(), "xcode".to_string()]);
		related_terms.insert("react".to_string(), vec!["jsx".to_string()]);

		Skills {
			vocabulary: ["swift", "ios", "react", "python"]
				.into_iter()
				.map(str::to_string)
				.collect(),
			technical_indicators: Vec::new(),
			related_terms,
		}
	}

	#[test]
	fn extract_finds_terms_in_vocabulary_order() {
		let found = extract(&test_skills(), "React and Swift experience on iOS");

		assert_eq!(found, vec!["swift".to_string(), "ios".to_string(), "react".to_string()]);
	}

	#[test]
	fn extract_returns_empty_for_unrelated_text() {
		assert!(extract(&test_skills(), "warehouse logistics and forklifts").is_empty());
	}

	#[test]
	fn direct_match_scores_full_weight() {
		let result = score_against(&test_skills(), &["swift".to_string()], "writes swift daily");

		assert!((result.score - DIRECT_MATCH_WEIGHT).abs() < 1e-6);
		assert_eq!(result.matched, vec!["swift".to_string()]);
		assert!(result.has_required);
	}

	#[test]
	fn related_match_scores_half_weight_under_canonical_label() {
		let result = score_against(&test_skills(), &["swift".to_string()], "ships with xcode");

		assert!((result.score - RELATED_MATCH_WEIGHT).abs() < 1e-6);
		assert_eq!(result.matched, vec!["swift".to_string()]);
	}

	#[test]
	fn direct_and_related_hits_accumulate() {
		let result =
			score_against(&test_skills(), &["swift".to_string()], "swift, swiftui and xcode");

		let expected = DIRECT_MATCH_WEIGHT + 2.0 * RELATED_MATCH_WEIGHT;

		assert!((result.score - expected).abs() < 1e-6);
		assert_eq!(result.matched, vec!["swift".to_string()]);
	}

	#[test]
	fn missing_skills_score_zero() {
		let result = score_against(&test_skills(), &["python".to_string()], "pure sales role");

		assert_eq!(result.score, 0.0);
		assert!(result.matched.is_empty());
		assert!(!result.has_required);
	}

	#[test]
	fn skill_set_entries_are_case_folded() {
		let result = score_against(&test_skills(), &["SWIFT".to_string()], "swift shop");

		assert!(result.has_required);
		assert_eq!(result.matched, vec!["swift".to_string()]);
	}

	#[test]
	fn blank_skill_entries_are_ignored() {
		let result = score_against(&test_skills(), &["   ".to_string()], "any text at all");

		assert_eq!(result.score, 0.0);
		assert!(!result.has_required);
	}

	#[test]
	fn matched_skills_follow_skill_set_order() {
		let skill_set = vec!["react".to_string(), "swift".to_string()];
		let result = score_against(&test_skills(), &skill_set, "swift and react together");

		assert_eq!(result.matched, vec!["react".to_string(), "swift".to_string()]);
	}
}
