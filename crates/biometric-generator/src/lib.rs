//! Synthetic record generator for the ffv-loader bulk loader.
//!
//! This crate produces the two entities written by the loader: a
//! [`ControlObject`] (a person record with identity fields) and the
//! [`FacialFeaturesVector`] tied to it. All randomness comes from a single
//! seeded RNG owned by the [`BiometricGenerator`], so the same seed always
//! yields the same identifiers, passports and vectors.
//!
//! # Architecture
//!
//! ```text
//!        seed (u64)
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │  BiometricGenerator  │
//! │                      │
//! │  - rng (StdRng)      │
//! │  - generated count   │
//! └──────────┬───────────┘
//!            │
//!            ├──▶ ControlObject { id, created_at, passport, .. }
//!            │
//!            └──▶ FacialFeaturesVector { id, control_object_id, face_box, feature_vector, .. }
//! ```
//!
//! # Example
//!
//! ```rust
//! use biometric_generator::BiometricGenerator;
//!
//! let mut generator = BiometricGenerator::new(42);
//! let control_objects: Vec<_> = generator.control_objects(3).collect();
//! let vectors = generator.feature_vectors_for(&control_objects);
//!
//! assert_eq!(vectors[1].control_object_id, control_objects[1].id);
//! ```

pub mod generator;
pub mod generators;
pub mod model;

// Re-exports for convenience
pub use generator::{BiometricGenerator, ControlObjectIterator};
pub use model::{
    ControlObject, FacialFeaturesVector, FACE_BOX_LEN, FEATURE_VECTOR_LEN, NO_IMAGE_ID,
    PASSPORT_LEN, PLACEHOLDER,
};
