//! Individual value generators for the fixed-format fields.
//!
//! Every generator takes the RNG explicitly so callers control seeding.

pub mod passport;
pub mod uuid;
pub mod vector;

pub use passport::generate_passport_number;
pub use self::uuid::generate_uuid_v4;
pub use vector::{generate_face_box, generate_feature_vector};
