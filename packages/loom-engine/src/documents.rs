/// One side of the bidirectional match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolId {
	Opportunities,
	Candidates,
}
impl PoolId {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Opportunities => "opportunities",
			Self::Candidates => "candidates",
		}
	}
}

/// Which pools a search request runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolSelector {
	Opportunities,
	Candidates,
	#[default]
	Both,
}
impl PoolSelector {
	pub fn pools(self) -> &'static [PoolId] {
		match self {
			Self::Opportunities => &[PoolId::Opportunities],
			Self::Candidates => &[PoolId::Candidates],
			Self::Both => &[PoolId::Opportunities, PoolId::Candidates],
		}
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Opportunity {
	pub id: String,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub company: Option<String>,
	#[serde(default)]
	pub searchable_text: String,
	#[serde(default)]
	pub embedding: Option<Vec<f32>>,
	#[serde(default)]
	pub extracted_skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Candidate {
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub headline: Option<String>,
	#[serde(default)]
	pub searchable_text: String,
	#[serde(default)]
	pub embedding: Option<Vec<f32>>,
	#[serde(default)]
	pub extracted_skills: Option<Vec<String>>,
}

/// A pool entry. Records arrive from heterogeneous upstream sources, so every
/// field beyond the id is optional and scoring degrades instead of failing
/// when one is absent.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Document {
	Opportunity(Opportunity),
	Candidate(Candidate),
}
impl Document {
	pub fn id(&self) -> &str {
		match self {
			Self::Opportunity(doc) => &doc.id,
			Self::Candidate(doc) => &doc.id,
		}
	}

	pub fn pool(&self) -> PoolId {
		match self {
			Self::Opportunity(_) => PoolId::Opportunities,
			Self::Candidate(_) => PoolId::Candidates,
		}
	}

	pub fn searchable_text(&self) -> &str {
		match self {
			Self::Opportunity(doc) => &doc.searchable_text,
			Self::Candidate(doc) => &doc.searchable_text,
		}
	}

	pub fn embedding(&self) -> Option<&[f32]> {
		match self {
			Self::Opportunity(doc) => doc.embedding.as_deref(),
			Self::Candidate(doc) => doc.embedding.as_deref(),
		}
	}

	pub fn extracted_skills(&self) -> Option<&[String]> {
		match self {
			Self::Opportunity(doc) => doc.extracted_skills.as_deref(),
			Self::Candidate(doc) => doc.extracted_skills.as_deref(),
		}
	}

	pub fn set_embedding(&mut self, embedding: Vec<f32>) {
		match self {
			Self::Opportunity(doc) => doc.embedding = Some(embedding),
			Self::Candidate(doc) => doc.embedding = Some(embedding),
		}
	}
}
