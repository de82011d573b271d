//! Personal-data record model and form input validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::types::{RecordId, Timestamp};

/// Minimum accepted age (inclusive).
pub const MIN_AGE: u32 = 1;

/// Maximum accepted age (inclusive).
pub const MAX_AGE: u32 = 120;

/// Minimum length of a trimmed name.
pub const MIN_NAME_CHARS: usize = 2;

/// Gender options offered by the form. Serialised with the form labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Laki-laki")]
    Male,
    #[serde(rename = "Perempuan")]
    Female,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Laki-laki",
            Gender::Female => "Perempuan",
        }
    }
}

/// Submitted form fields, before region names are resolved.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(range(min = 1, max = 120, message = "Age must be between 1 and 120"))]
    pub age: u32,
    #[validate(length(min = 1, message = "Province is required"))]
    pub region_id: String,
    /// Display name sent by the client; used when the id is not cached.
    #[serde(default)]
    pub region_name: Option<String>,
    #[validate(length(min = 1, message = "City/regency is required"))]
    pub sub_region_id: String,
    #[serde(default)]
    pub sub_region_name: Option<String>,
    #[validate(required(message = "Gender is required"))]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub message: String,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < MIN_NAME_CHARS {
        let mut err = ValidationError::new("name_too_short");
        err.message = Some(format!("Name must be at least {MIN_NAME_CHARS} characters").into());
        return Err(err);
    }
    Ok(())
}

/// A stored record. Ordered position in the store is its public handle;
/// `id` is a stable surrogate that survives reordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub age: u32,
    pub region_id: String,
    pub region_name: String,
    pub sub_region_id: String,
    pub sub_region_name: String,
    pub gender: Gender,
    pub interests: BTreeSet<String>,
    pub message: String,
    pub created_at: Timestamp,
}

impl Record {
    /// Validate `input` and build a fresh record with resolved region names.
    ///
    /// Resolved names win; the client-supplied names are used only when the
    /// resolved name is empty.
    pub fn from_input(
        input: RecordInput,
        resolved_region_name: &str,
        resolved_sub_region_name: &str,
    ) -> Result<Self, CoreError> {
        input.validate()?;

        let region_name = pick_name(resolved_region_name, input.region_name);
        let sub_region_name = pick_name(resolved_sub_region_name, input.sub_region_name);
        let gender = input
            .gender
            .ok_or_else(|| CoreError::Validation("Gender is required".to_string()))?;

        Ok(Self {
            id: uuid::Uuid::now_v7(),
            name: input.name.trim().to_string(),
            age: input.age,
            region_id: input.region_id,
            region_name,
            sub_region_id: input.sub_region_id,
            sub_region_name,
            gender,
            interests: input.interests,
            message: input.message,
            created_at: chrono::Utc::now(),
        })
    }
}

fn pick_name(resolved: &str, supplied: Option<String>) -> String {
    if resolved.is_empty() {
        supplied.unwrap_or_default()
    } else {
        resolved.to_string()
    }
}
