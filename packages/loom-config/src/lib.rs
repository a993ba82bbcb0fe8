mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, EmbeddingProviderConfig, Engine, Providers, Ranking, Skills};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.engine.default_limit == 0 {
		return Err(Error::Validation {
			message: "engine.default_limit must be greater than zero.".to_string(),
		});
	}
	if !cfg.engine.default_min_similarity.is_finite() {
		return Err(Error::Validation {
			message: "engine.default_min_similarity must be a finite number.".to_string(),
		});
	}
	if !cfg.engine.cross_match_threshold.is_finite() {
		return Err(Error::Validation {
			message: "engine.cross_match_threshold must be a finite number.".to_string(),
		});
	}
	if cfg.engine.palette_size == 0 {
		return Err(Error::Validation {
			message: "engine.palette_size must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.api_key must be non-empty.".to_string(),
		});
	}

	for (label, weight) in [
		("technical_base_weight", cfg.ranking.technical_base_weight),
		("technical_skill_weight", cfg.ranking.technical_skill_weight),
		("missing_skill_penalty", cfg.ranking.missing_skill_penalty),
		("domain_mismatch_penalty", cfg.ranking.domain_mismatch_penalty),
		("plain_base_weight", cfg.ranking.plain_base_weight),
		("plain_skill_weight", cfg.ranking.plain_skill_weight),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation {
				message: format!("ranking.{label} must be a finite number."),
			});
		}
		if !(0.0..=1.0).contains(&weight) {
			return Err(Error::Validation {
				message: format!("ranking.{label} must be in the range 0.0-1.0."),
			});
		}
	}

	if cfg.skills.vocabulary.is_empty() {
		return Err(Error::Validation {
			message: "skills.vocabulary must be non-empty.".to_string(),
		});
	}
	if cfg.skills.technical_indicators.is_empty() {
		return Err(Error::Validation {
			message: "skills.technical_indicators must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	// Substring matching works on lowercased text, so every configured term
	// must be lowercased up front.
	fold_terms(&mut cfg.skills.vocabulary);
	fold_terms(&mut cfg.skills.technical_indicators);

	cfg.skills.related_terms = cfg
		.skills
		.related_terms
		.drain()
		.filter_map(|(skill, mut terms)| {
			let skill = skill.trim().to_lowercase();

			if skill.is_empty() {
				return None;
			}

			fold_terms(&mut terms);

			Some((skill, terms))
		})
		.collect();
}

fn fold_terms(terms: &mut Vec<String>) {
	*terms = terms
		.iter()
		.map(|term| term.trim().to_lowercase())
		.filter(|term| !term.is_empty())
		.collect();
}
