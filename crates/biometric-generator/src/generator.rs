//! Main generator producing control objects and their feature vectors.

use crate::generators::{
    generate_face_box, generate_feature_vector, generate_passport_number, generate_uuid_v4,
};
use crate::model::{ControlObject, FacialFeaturesVector, NO_IMAGE_ID};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generator that produces synthetic biometric records.
///
/// The generator owns the only RNG used for record generation, so a run is
/// fully determined by its seed (apart from the `created_at` timestamps).
pub struct BiometricGenerator {
    /// Seed the RNG was created from
    seed: u64,
    /// Seeded random number generator
    rng: StdRng,
    /// Number of control objects generated so far
    generated: u64,
}

impl BiometricGenerator {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            generated: 0,
        }
    }

    /// Create a generator seeded from the wall clock, at second granularity.
    pub fn from_clock() -> Self {
        Self::new(clock_seed())
    }

    /// The seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of control objects generated so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Generate one control object stamped with `now`.
    pub fn control_object(&mut self, now: DateTime<Utc>) -> ControlObject {
        let id = generate_uuid_v4(&mut self.rng);
        let passport = generate_passport_number(&mut self.rng);
        self.generated += 1;

        ControlObject::synthetic(id, now, passport)
    }

    /// Generate `count` control objects, each stamped with the current time.
    ///
    /// Returns an iterator that lazily generates records.
    pub fn control_objects(&mut self, count: usize) -> ControlObjectIterator<'_> {
        ControlObjectIterator {
            generator: self,
            remaining: count,
        }
    }

    /// Generate the facial features vector owned by `control_object`.
    pub fn facial_features(&mut self, control_object: &ControlObject) -> FacialFeaturesVector {
        FacialFeaturesVector {
            id: generate_uuid_v4(&mut self.rng),
            control_object_id: control_object.id,
            image_id: NO_IMAGE_ID,
            face_box: generate_face_box(&mut self.rng),
            feature_vector: generate_feature_vector(&mut self.rng),
        }
    }

    /// Generate one feature vector per control object, in the same order.
    pub fn feature_vectors_for(
        &mut self,
        control_objects: &[ControlObject],
    ) -> Vec<FacialFeaturesVector> {
        control_objects
            .iter()
            .map(|control_object| self.facial_features(control_object))
            .collect()
    }
}

/// Unix time in whole seconds, or zero if the clock is before the epoch.
fn clock_seed() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

/// Iterator that lazily generates control objects.
pub struct ControlObjectIterator<'a> {
    generator: &'a mut BiometricGenerator,
    remaining: usize,
}

impl Iterator for ControlObjectIterator<'_> {
    type Item = ControlObject;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.control_object(Utc::now()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ControlObjectIterator<'_> {}
