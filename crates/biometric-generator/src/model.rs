//! In-memory representation of the generated entities.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Length of a generated passport number, separators included.
pub const PASSPORT_LEN: usize = 12;

/// Number of coordinates in a face bounding box.
pub const FACE_BOX_LEN: usize = 4;

/// Number of components in a facial features vector.
pub const FEATURE_VECTOR_LEN: usize = 128;

/// Value used for every free-text identity field of a synthetic record.
pub const PLACEHOLDER: &str = "-";

/// Image identifier meaning "no real source image".
pub const NO_IMAGE_ID: Uuid = Uuid::nil();

/// A synthetic biometric subject record.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlObject {
    pub id: Uuid,
    /// Client-side wall clock at generation time.
    pub created_at: DateTime<Utc>,
    /// Masked numeric string of the form `DD DD DDDDDDD`.
    pub passport: String,
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub sex: String,
    pub birth_date: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
}

impl ControlObject {
    /// Create a control object whose identity fields are all [`PLACEHOLDER`].
    pub fn synthetic(id: Uuid, created_at: DateTime<Utc>, passport: String) -> Self {
        Self {
            id,
            created_at,
            passport,
            surname: PLACEHOLDER.to_string(),
            name: PLACEHOLDER.to_string(),
            patronymic: PLACEHOLDER.to_string(),
            sex: PLACEHOLDER.to_string(),
            birth_date: PLACEHOLDER.to_string(),
            phone_number: PLACEHOLDER.to_string(),
            email: PLACEHOLDER.to_string(),
            address: PLACEHOLDER.to_string(),
        }
    }
}

/// A biometric descriptor owned by exactly one [`ControlObject`].
#[derive(Debug, Clone, PartialEq)]
pub struct FacialFeaturesVector {
    pub id: Uuid,
    /// Id of the owning control object, generated in the same batch.
    pub control_object_id: Uuid,
    pub image_id: Uuid,
    pub face_box: [u64; FACE_BOX_LEN],
    pub feature_vector: [f64; FEATURE_VECTOR_LEN],
}
