//! UUID value generator.

use rand::Rng;
use uuid::Uuid;

/// Generate a random UUID v4 using the provided RNG.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> Uuid {
    // Generate 16 random bytes
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    // Set version (4) and variant (RFC 4122) bits
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_uuid_v4() {
        let mut rng = StdRng::seed_from_u64(42);
        let first = generate_uuid_v4(&mut rng);
        let second = generate_uuid_v4(&mut rng);

        assert_ne!(first, second);
        assert_ne!(first, Uuid::nil());
    }

    #[test]
    fn test_uuid_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(generate_uuid_v4(&mut rng1), generate_uuid_v4(&mut rng2));
    }

    #[test]
    fn test_uuid_version() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let uuid = generate_uuid_v4(&mut rng);
            assert_eq!(uuid.get_version_num(), 4);
            assert_eq!(uuid.get_variant(), uuid::Variant::RFC4122);
        }
    }
}
