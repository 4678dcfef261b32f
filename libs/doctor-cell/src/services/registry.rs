// libs/doctor-cell/src/services/registry.rs
use std::collections::HashSet;

use tracing::info;

use shared_storage::{load_typed, DocumentStore};

use crate::models::{Doctor, DoctorError};

/// Ordered, read-only list of the clinic's doctors.
#[derive(Debug, Clone, Default)]
pub struct DoctorRegistry {
    doctors: Vec<Doctor>,
}

impl DoctorRegistry {
    pub fn new(doctors: Vec<Doctor>) -> Result<Self, DoctorError> {
        let mut seen = HashSet::new();
        for doctor in &doctors {
            if doctor.name.trim().is_empty() {
                return Err(DoctorError::ValidationError("doctor name must not be empty".to_string()));
            }
            if !seen.insert(doctor.name.as_str()) {
                return Err(DoctorError::DuplicateDoctor(doctor.name.clone()));
            }
        }

        Ok(Self { doctors })
    }

    pub async fn load(store: &dyn DocumentStore, key: &str) -> Result<Self, DoctorError> {
        let doctors: Vec<Doctor> = load_typed(store, key).await?;
        info!("Loaded {} doctors from '{}'", doctors.len(), key);
        Self::new(doctors)
    }

    pub fn all(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn find(&self, name: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|doctor| doctor.name == name)
    }

    pub fn by_specialty(&self, specialty: &str) -> Vec<Doctor> {
        self.doctors
            .iter()
            .filter(|doctor| doctor.specialty == specialty)
            .cloned()
            .collect()
    }
}
