use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_storage::InMemoryStore;

pub const APPOINTMENTS_KEY: &str = "appointments.json";
pub const DOCTORS_KEY: &str = "doctors.json";
pub const SPECIALTIES_KEY: &str = "disease_specialties.json";

pub struct TestConfig {
    pub sender_email: String,
    pub sender_password: String,
    pub mail_relay_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            sender_email: "clinic@example.com".to_string(),
            sender_password: "test-mail-secret".to_string(),
            mail_relay_url: "http://localhost:8025/api/send".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_relay(mut self, url: impl Into<String>) -> Self {
        self.mail_relay_url = url.into();
        self
    }

    pub fn to_app_config(&self, data_dir: &Path) -> AppConfig {
        AppConfig {
            data_dir: data_dir.to_path_buf(),
            sender_email: self.sender_email.clone(),
            sender_password: self.sender_password.clone(),
            mail_relay_url: self.mail_relay_url.clone(),
            notification_timeout_secs: 2,
            ..AppConfig::default()
        }
    }
}

/// Naive local timestamp shorthand for fixtures.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("fixture timestamp must be valid")
}

pub struct Fixtures;

impl Fixtures {
    pub fn doctors() -> Value {
        json!([
            { "name": "Dr. A", "specialty": "General Medicine" },
            { "name": "Dr. B", "specialty": "General Medicine" },
            { "name": "Dr. C", "specialty": "Dermatology" },
            { "name": "Dr. D", "specialty": "Cardiology" }
        ])
    }

    pub fn disease_specialties() -> Value {
        json!({
            "fever": "General Medicine",
            "cold": "General Medicine",
            "rash": "Dermatology",
            "arrhythmia": "Cardiology",
            "migraine": "Neurology"
        })
    }

    pub fn appointment(doctor: &str, patient: &str, disease: &str, time: &str) -> Value {
        json!({
            "user": patient,
            "doctor": doctor,
            "disease": disease,
            "time": time
        })
    }

    /// Record in the shape written by the legacy global booking tool.
    pub fn legacy_appointment(name: &str, time: &str) -> Value {
        json!({
            "time": time,
            "name": name
        })
    }
}

/// Store pre-seeded with the doctor registry and specialty directory, and an
/// optional appointment ledger.
pub async fn seeded_store(appointments: Option<Value>) -> InMemoryStore {
    let store = InMemoryStore::new()
        .with_document(DOCTORS_KEY, Fixtures::doctors())
        .await
        .with_document(SPECIALTIES_KEY, Fixtures::disease_specialties())
        .await;

    match appointments {
        Some(ledger) => store.with_document(APPOINTMENTS_KEY, ledger).await,
        None => store,
    }
}

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
