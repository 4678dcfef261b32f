use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_storage::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub name: String,
    pub specialty: String,
}

impl Doctor {
    pub fn new(name: impl Into<String>, specialty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specialty: specialty.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSearchResponse {
    pub disease: String,
    pub specialty: Option<String>,
    pub doctors: Vec<Doctor>,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found: {0}")]
    NotFound(String),

    #[error("Doctor '{0}' is listed more than once in the registry")]
    DuplicateDoctor(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
