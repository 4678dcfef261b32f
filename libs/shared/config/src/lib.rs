use std::env;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_APPOINTMENTS_FILE: &str = "appointments.json";
pub const DEFAULT_DOCTORS_FILE: &str = "doctors.json";
pub const DEFAULT_DISEASE_SPECIALTIES_FILE: &str = "disease_specialties.json";
pub const DEFAULT_MAIL_RELAY_URL: &str = "http://localhost:8025/api/send";
pub const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub appointments_file: String,
    pub doctors_file: String,
    pub disease_specialties_file: String,
    pub sender_email: String,
    pub sender_password: String,
    pub mail_relay_url: String,
    pub notification_timeout_secs: u64,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            appointments_file: DEFAULT_APPOINTMENTS_FILE.to_string(),
            doctors_file: DEFAULT_DOCTORS_FILE.to_string(),
            disease_specialties_file: DEFAULT_DISEASE_SPECIALTIES_FILE.to_string(),
            sender_email: String::new(),
            sender_password: String::new(),
            mail_relay_url: DEFAULT_MAIL_RELAY_URL.to_string(),
            notification_timeout_secs: DEFAULT_NOTIFICATION_TIMEOUT_SECS,
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("DATA_DIR not set, using current directory");
                    defaults.data_dir.clone()
                }),
            appointments_file: env::var("APPOINTMENTS_FILE")
                .unwrap_or(defaults.appointments_file),
            doctors_file: env::var("DOCTORS_FILE")
                .unwrap_or(defaults.doctors_file),
            disease_specialties_file: env::var("DISEASE_SPECIALTIES_FILE")
                .unwrap_or(defaults.disease_specialties_file),
            sender_email: env::var("EMAIL")
                .unwrap_or_else(|_| {
                    warn!("EMAIL not set, using empty value");
                    String::new()
                }),
            sender_password: env::var("EMAIL_PASSWORD")
                .unwrap_or_else(|_| {
                    warn!("EMAIL_PASSWORD not set, using empty value");
                    String::new()
                }),
            mail_relay_url: env::var("MAIL_RELAY_URL")
                .unwrap_or_else(|_| {
                    warn!("MAIL_RELAY_URL not set, using default");
                    defaults.mail_relay_url.clone()
                }),
            notification_timeout_secs: parse_or_default(
                "NOTIFICATION_TIMEOUT_SECS",
                defaults.notification_timeout_secs,
            ),
            port: parse_or_default("PORT", defaults.port),
        };

        if !config.is_notifier_configured() {
            warn!("Notifier not configured - EMAIL or EMAIL_PASSWORD missing");
        }

        config
    }

    /// Both sender credentials must be present before any mail is sent.
    pub fn is_notifier_configured(&self) -> bool {
        !self.sender_email.is_empty()
            && !self.sender_password.is_empty()
            && !self.mail_relay_url.is_empty()
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
