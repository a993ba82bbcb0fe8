use unicode_normalization::UnicodeNormalization;

/// NFKC-normalizes and lowercases free text so substring checks behave the
/// same regardless of the source's Unicode form.
pub fn fold(input: &str) -> String {
	input.nfkc().collect::<String>().to_lowercase()
}
