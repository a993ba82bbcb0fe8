/// Cosine similarity between two embedding vectors.
///
/// Degenerate inputs (empty vectors, mismatched dimensions, zero magnitude)
/// yield 0.0 rather than an error, so callers can fold documents from
/// different providers into one ranking without special-casing them.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
	if a.is_empty() || b.is_empty() || a.len() != b.len() {
		return 0.0;
	}

	let mut dot = 0.0_f32;
	let mut norm_a = 0.0_f32;
	let mut norm_b = 0.0_f32;

	for (x, y) in a.iter().zip(b.iter()) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
	use super::cosine;

	#[test]
	fn identical_vectors_score_one() {
		let v = vec![0.3, 0.5, 0.2];

		assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn orthogonal_vectors_score_zero() {
		assert!((cosine(&[1.0, 0.0], &[0.0, 1.0])).abs() < 1e-6);
	}

	#[test]
	fn opposite_vectors_score_negative_one() {
		assert!((cosine(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
	}

	#[test]
	fn scale_does_not_change_similarity() {
		let a = [1.0, 2.0, 3.0];
		let b = [10.0, 20.0, 30.0];

		assert!((cosine(&a, &b) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn mismatched_dimensions_score_zero() {
		assert_eq!(cosine(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
	}

	#[test]
	fn empty_vectors_score_zero() {
		assert_eq!(cosine(&[], &[]), 0.0);
		assert_eq!(cosine(&[1.0], &[]), 0.0);
	}

	#[test]
	fn zero_magnitude_scores_zero() {
		assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
	}
}
