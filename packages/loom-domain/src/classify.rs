use crate::normalize;

/// Returns true when the text reads like a technical query or role
/// description, i.e. it contains any of the configured indicator words.
///
/// Indicators are expected in lowercase; matching is substring-based on the
/// folded text, so "developer" also fires on "developers".
pub fn is_technical(indicators: &[String], text: &str) -> bool {
	let folded = normalize::fold(text);

	indicators.iter().any(|word| !word.is_empty() && folded.contains(word.as_str()))
}
