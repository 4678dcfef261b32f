use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use appointment_cell::{AppointmentBookingService, AppointmentError, AppointmentLedger, SchedulingService};
use doctor_cell::{DoctorError, DoctorMatchingService};
use notification_cell::{NotificationDispatcher, Notifier};
use shared_config::AppConfig;
use shared_storage::DocumentStore;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load doctor data: {0}")]
    Doctors(#[from] DoctorError),

    #[error("failed to load appointment ledger: {0}")]
    Ledger(#[from] AppointmentError),
}

/// Services shared by every request, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub doctors: Arc<DoctorMatchingService>,
    pub scheduling: Arc<SchedulingService>,
}

impl AppState {
    /// Loads the registry, specialty directory and ledger from `store`, and
    /// starts the notification worker on the current runtime.
    pub async fn build(
        config: &AppConfig,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, StartupError> {
        let doctors = Arc::new(
            DoctorMatchingService::load(
                store.as_ref(),
                &config.disease_specialties_file,
                &config.doctors_file,
            )
            .await?,
        );

        let ledger = AppointmentLedger::load(store, config.appointments_file.clone()).await?;
        info!("Appointment ledger ready with {} entries", ledger.len());

        let dispatcher = NotificationDispatcher::spawn(
            notifier,
            Duration::from_secs(config.notification_timeout_secs),
        );
        let booking = Arc::new(AppointmentBookingService::new(ledger, dispatcher));
        let scheduling = Arc::new(SchedulingService::new(doctors.clone(), booking));

        Ok(Self { doctors, scheduling })
    }
}
