//! Passport number generator.
//!
//! A passport is a 12-character string of decimal digits with a single space
//! at indices 2 and 5, e.g. `45 12 3456789`.

use crate::model::PASSPORT_LEN;
use rand::Rng;

/// Indices holding a space instead of a digit.
pub const SEPARATOR_POSITIONS: [usize; 2] = [2, 5];

/// Generate a masked passport number, left to right, one uniform digit per
/// non-separator position.
pub fn generate_passport_number<R: Rng>(rng: &mut R) -> String {
    let mut passport = String::with_capacity(PASSPORT_LEN);

    for position in 0..PASSPORT_LEN {
        if SEPARATOR_POSITIONS.contains(&position) {
            passport.push(' ');
        } else {
            passport.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
    }

    passport
}
