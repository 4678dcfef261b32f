// libs/doctor-cell/src/services/specialty.rs
use std::collections::HashMap;

use tracing::{debug, info};

use shared_storage::{load_typed, DocumentStore};

use crate::models::DoctorError;

/// Read-only mapping from disease name to medical specialty.
#[derive(Debug, Clone, Default)]
pub struct SpecialtyDirectory {
    specialties: HashMap<String, String>,
}

impl SpecialtyDirectory {
    /// Keys are lowercased on the way in, so lookups are case-insensitive.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let specialties = entries
            .into_iter()
            .map(|(disease, specialty)| (disease.as_ref().trim().to_lowercase(), specialty.into()))
            .collect();

        Self { specialties }
    }

    pub async fn load(store: &dyn DocumentStore, key: &str) -> Result<Self, DoctorError> {
        let raw: HashMap<String, String> = load_typed(store, key).await?;
        info!("Loaded {} disease specialty mappings from '{}'", raw.len(), key);
        Ok(Self::new(raw))
    }

    pub fn specialty_for(&self, disease: &str) -> Option<&str> {
        let specialty = self
            .specialties
            .get(&disease.trim().to_lowercase())
            .map(String::as_str);

        if specialty.is_none() {
            debug!("No specialty mapped for disease '{}'", disease);
        }

        specialty
    }

    pub fn len(&self) -> usize {
        self.specialties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specialties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let directory = SpecialtyDirectory::new([("Fever", "General Medicine")]);

        assert_eq!(directory.specialty_for("fever"), Some("General Medicine"));
        assert_eq!(directory.specialty_for("FEVER"), Some("General Medicine"));
        assert_eq!(directory.specialty_for("cough"), None);
    }
}
