pub mod ledger;
pub mod conflict;
pub mod booking;
pub mod scheduling;

pub use ledger::AppointmentLedger;
pub use conflict::SlotConflictEngine;
pub use booking::AppointmentBookingService;
pub use scheduling::SchedulingService;
