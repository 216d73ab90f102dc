//! Face box and feature vector generators.

use crate::model::{FACE_BOX_LEN, FEATURE_VECTOR_LEN};
use rand::Rng;

/// Generate bounding-box coordinates, each drawn over the full `u64` range.
pub fn generate_face_box<R: Rng>(rng: &mut R) -> [u64; FACE_BOX_LEN] {
    std::array::from_fn(|_| rng.gen::<u64>())
}

/// Generate a feature vector with components drawn uniformly from `[-1.0, 1.0)`.
pub fn generate_feature_vector<R: Rng>(rng: &mut R) -> [f64; FEATURE_VECTOR_LEN] {
    std::array::from_fn(|_| rng.gen_range(-1.0..1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_feature_vector_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let vector = generate_feature_vector(&mut rng);
            assert_eq!(vector.len(), FEATURE_VECTOR_LEN);
            assert!(vector.iter().all(|v| (-1.0..1.0).contains(v)));
        }
    }

    #[test]
    fn test_feature_vector_spans_both_signs() {
        let mut rng = StdRng::seed_from_u64(3);
        let vector = generate_feature_vector(&mut rng);

        assert!(vector.iter().any(|v| *v < 0.0));
        assert!(vector.iter().any(|v| *v > 0.0));
    }

    #[test]
    fn test_face_box_components_independent() {
        let mut rng = StdRng::seed_from_u64(42);
        let face_box = generate_face_box(&mut rng);

        assert_eq!(face_box.len(), FACE_BOX_LEN);
        // Four equal draws over the full u64 range would be astronomically unlikely
        assert!(face_box.windows(2).any(|w| w[0] != w[1]));
        // Values above u32::MAX show the full range is used
        assert!(face_box.iter().any(|v| *v > u64::from(u32::MAX)));
    }

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(generate_face_box(&mut rng1), generate_face_box(&mut rng2));
        assert_eq!(
            generate_feature_vector(&mut rng1),
            generate_feature_vector(&mut rng2)
        );
    }
}
