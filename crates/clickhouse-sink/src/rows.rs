//! Wire rows for the `control_objects` and `facial_features` tables.
//!
//! Identifiers are sent as native ClickHouse `UUID`s, face boxes as
//! `Array(UInt64)` and feature vectors as `Array(Float64)`.

use crate::store::Record;
use biometric_generator::{ControlObject, FacialFeaturesVector};
use chrono::{DateTime, Utc};
use clickhouse::Row;
use serde::Serialize;
use uuid::Uuid;

/// Row of `control_objects`.
#[derive(Debug, Clone, Row, Serialize)]
pub struct ControlObjectRow {
    #[serde(with = "clickhouse::serde::uuid")]
    pub id: Uuid,
    /// `DateTime`, seconds since the epoch.
    #[serde(with = "clickhouse::serde::chrono::datetime")]
    pub ts: DateTime<Utc>,
    pub passport: String,
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub sex: String,
    pub birthdate: String,
    pub phone_num: String,
    pub email: String,
    pub address: String,
}

impl From<&ControlObject> for ControlObjectRow {
    fn from(object: &ControlObject) -> Self {
        Self {
            id: object.id,
            ts: object.created_at,
            passport: object.passport.clone(),
            surname: object.surname.clone(),
            name: object.name.clone(),
            patronymic: object.patronymic.clone(),
            sex: object.sex.clone(),
            birthdate: object.birth_date.clone(),
            phone_num: object.phone_number.clone(),
            email: object.email.clone(),
            address: object.address.clone(),
        }
    }
}

impl Record for ControlObject {
    const TABLE: &'static str = "control_objects";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "ts",
        "passport",
        "surname",
        "name",
        "patronymic",
        "sex",
        "birthdate",
        "phone_num",
        "email",
        "address",
    ];

    type Row = ControlObjectRow;

    fn to_row(&self) -> Self::Row {
        self.into()
    }
}

/// Row of `facial_features`.
#[derive(Debug, Clone, Row, Serialize)]
pub struct FacialFeaturesRow {
    #[serde(with = "clickhouse::serde::uuid")]
    pub id: Uuid,
    #[serde(with = "clickhouse::serde::uuid")]
    pub cob_id: Uuid,
    #[serde(with = "clickhouse::serde::uuid")]
    pub img_id: Uuid,
    pub fb: Vec<u64>,
    pub ff: Vec<f64>,
}

impl From<&FacialFeaturesVector> for FacialFeaturesRow {
    fn from(vector: &FacialFeaturesVector) -> Self {
        Self {
            id: vector.id,
            cob_id: vector.control_object_id,
            img_id: vector.image_id,
            fb: vector.face_box.to_vec(),
            ff: vector.feature_vector.to_vec(),
        }
    }
}

impl Record for FacialFeaturesVector {
    const TABLE: &'static str = "facial_features";
    const COLUMNS: &'static [&'static str] = &["id", "cob_id", "img_id", "fb", "ff"];

    type Row = FacialFeaturesRow;

    fn to_row(&self) -> Self::Row {
        self.into()
    }
}
