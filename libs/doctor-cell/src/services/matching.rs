// libs/doctor-cell/src/services/matching.rs
use tracing::debug;

use shared_storage::DocumentStore;

use crate::models::{Doctor, DoctorError, DoctorSearchResponse};
use crate::services::{registry::DoctorRegistry, specialty::SpecialtyDirectory};

pub struct DoctorMatchingService {
    directory: SpecialtyDirectory,
    registry: DoctorRegistry,
}

impl DoctorMatchingService {
    pub fn new(directory: SpecialtyDirectory, registry: DoctorRegistry) -> Self {
        Self { directory, registry }
    }

    pub async fn load(
        store: &dyn DocumentStore,
        specialties_key: &str,
        doctors_key: &str,
    ) -> Result<Self, DoctorError> {
        let directory = SpecialtyDirectory::load(store, specialties_key).await?;
        let registry = DoctorRegistry::load(store, doctors_key).await?;
        Ok(Self::new(directory, registry))
    }

    /// Doctors whose specialty treats `disease`. Unmapped diseases and
    /// specialties with nobody on staff both give an empty list.
    pub fn doctors_for_disease(&self, disease: &str) -> Vec<Doctor> {
        match self.directory.specialty_for(disease) {
            Some(specialty) => {
                let doctors = self.registry.by_specialty(specialty);
                debug!("Found {} doctors for '{}' ({})", doctors.len(), disease, specialty);
                doctors
            }
            None => Vec::new(),
        }
    }

    pub fn search(&self, disease: &str) -> DoctorSearchResponse {
        DoctorSearchResponse {
            disease: disease.to_string(),
            specialty: self.directory.specialty_for(disease).map(str::to_string),
            doctors: self.doctors_for_disease(disease),
        }
    }

    pub fn get_doctor(&self, name: &str) -> Result<&Doctor, DoctorError> {
        self.registry
            .find(name)
            .ok_or_else(|| DoctorError::NotFound(name.to_string()))
    }

    pub fn all_doctors(&self) -> &[Doctor] {
        self.registry.all()
    }
}
