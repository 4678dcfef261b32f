// libs/appointment-cell/src/services/conflict.rs
use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::debug;

use crate::models::{slot_duration, slot_end, Appointment, SLOT_DURATION_MINUTES};

/// Half-open intervals `[start1, end1)` and `[start2, end2)` share an instant.
pub fn intervals_overlap(
    start1: NaiveDateTime,
    end1: NaiveDateTime,
    start2: NaiveDateTime,
    end2: NaiveDateTime,
) -> bool {
    start1 < end2 && start2 < end1
}

/// First 30-minute boundary strictly after `time`. Seconds are dropped first,
/// so a time already on a boundary moves to the next one. `None` past the end
/// of the calendar.
pub fn next_slot_boundary(time: NaiveDateTime) -> Option<NaiveDateTime> {
    let truncated = time
        .with_nanosecond(0)
        .and_then(|t| t.with_second(0))
        .unwrap_or(time);

    let minutes_to_add = SLOT_DURATION_MINUTES - i64::from(truncated.minute()) % SLOT_DURATION_MINUTES;
    truncated.checked_add_signed(Duration::minutes(minutes_to_add))
}

/// Unconditional "one hour from now" proposal, with no ledger check.
pub fn suggest_next_hour(now: NaiveDateTime) -> Option<NaiveDateTime> {
    now.checked_add_signed(Duration::hours(1))
}

/// Read-only conflict queries over a snapshot of the ledger.
pub struct SlotConflictEngine<'a> {
    appointments: &'a [Appointment],
}

impl<'a> SlotConflictEngine<'a> {
    pub fn new(appointments: &'a [Appointment]) -> Self {
        Self { appointments }
    }

    /// Per-doctor interval check: `false` when any of `doctor`'s appointments
    /// overlaps `[proposed_start, proposed_start + 30min)`, or when that slot
    /// does not fit in the calendar.
    pub fn is_available(&self, doctor: &str, proposed_start: NaiveDateTime) -> bool {
        let available = slot_end(proposed_start).is_some()
            && self.conflicts_for(doctor, proposed_start).next().is_none();
        debug!("Doctor {} available at {}: {}", doctor, proposed_start, available);
        available
    }

    pub fn conflicting_appointments(&self, doctor: &str, proposed_start: NaiveDateTime) -> Vec<&'a Appointment> {
        self.conflicts_for(doctor, proposed_start).collect()
    }

    /// Global check: any appointment, for any doctor, starting exactly at `start_time`.
    pub fn has_exact_collision(&self, start_time: NaiveDateTime) -> bool {
        self.appointments
            .iter()
            .any(|appointment| appointment.start_time == start_time)
    }

    /// Next 30-minute boundary after `from_time` whose start time is not
    /// already taken by any appointment, regardless of doctor. `None` when the
    /// search runs off the end of the calendar.
    pub fn next_available_slot(&self, from_time: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut candidate = next_slot_boundary(from_time)?;
        while self.has_exact_collision(candidate) || slot_end(candidate).is_none() {
            candidate = candidate.checked_add_signed(slot_duration())?;
        }

        debug!("Next available appointment: {}", candidate);
        Some(candidate)
    }

    /// Next 30-minute boundary after `from_time` at which `doctor` has no
    /// overlapping appointment.
    pub fn next_available_slot_for_doctor(&self, doctor: &str, from_time: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut candidate = next_slot_boundary(from_time)?;
        while !self.is_available(doctor, candidate) {
            candidate = candidate.checked_add_signed(slot_duration())?;
        }

        debug!("Next available slot for {}: {}", doctor, candidate);
        Some(candidate)
    }

    fn conflicts_for<'s>(
        &'s self,
        doctor: &'s str,
        proposed_start: NaiveDateTime,
    ) -> impl Iterator<Item = &'a Appointment> + 's {
        let proposed_end = slot_end(proposed_start).unwrap_or(NaiveDateTime::MAX);
        self.appointments.iter().filter(move |appointment| {
            appointment.is_with(doctor)
                && intervals_overlap(
                    proposed_start,
                    proposed_end,
                    appointment.start_time,
                    appointment.end_time(),
                )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn booked(doctor: Option<&str>, hour: u32, minute: u32) -> Appointment {
        Appointment {
            doctor: doctor.map(str::to_string),
            patient: "p1".to_string(),
            disease: None,
            start_time: at(hour, minute),
        }
    }

    #[test]
    fn overlap_is_half_open() {
        assert!(intervals_overlap(at(10, 0), at(10, 30), at(10, 15), at(10, 45)));
        assert!(!intervals_overlap(at(10, 0), at(10, 30), at(10, 30), at(11, 0)));
        assert!(!intervals_overlap(at(10, 30), at(11, 0), at(10, 0), at(10, 30)));
    }

    #[test]
    fn boundary_rolls_forward() {
        assert_eq!(next_slot_boundary(at(10, 7)), Some(at(10, 30)));
        assert_eq!(next_slot_boundary(at(10, 0)), Some(at(10, 30)));
        assert_eq!(next_slot_boundary(at(10, 30)), Some(at(11, 0)));
        assert_eq!(next_slot_boundary(at(10, 59)), Some(at(11, 0)));

        let with_seconds = at(10, 29) + Duration::seconds(59);
        assert_eq!(next_slot_boundary(with_seconds), Some(at(10, 30)));
    }

    #[test]
    fn boundary_crosses_midnight() {
        let late = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(23, 45, 0).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(next_slot_boundary(late), Some(expected));
    }

    #[test]
    fn availability_is_per_doctor() {
        let appointments = vec![booked(Some("Dr. A"), 10, 0)];
        let engine = SlotConflictEngine::new(&appointments);

        assert!(!engine.is_available("Dr. A", at(10, 0)));
        assert!(!engine.is_available("Dr. A", at(10, 15)));
        assert!(!engine.is_available("Dr. A", at(9, 45)));
        assert!(engine.is_available("Dr. A", at(10, 30)));
        assert!(engine.is_available("Dr. A", at(9, 30)));
        assert!(engine.is_available("Dr. B", at(10, 0)));
    }

    #[test]
    fn doctorless_records_never_block_doctor_checks() {
        let appointments = vec![booked(None, 10, 0)];
        let engine = SlotConflictEngine::new(&appointments);

        assert!(engine.is_available("Dr. A", at(10, 0)));
        assert!(engine.has_exact_collision(at(10, 0)));
    }

    #[test]
    fn is_available_is_idempotent() {
        let appointments = vec![booked(Some("Dr. A"), 10, 0)];
        let engine = SlotConflictEngine::new(&appointments);

        let first = engine.is_available("Dr. A", at(10, 15));
        let second = engine.is_available("Dr. A", at(10, 15));
        assert_eq!(first, second);
    }

    #[test]
    fn exact_collision_ignores_overlap() {
        let appointments = vec![booked(Some("Dr. A"), 10, 0)];
        let engine = SlotConflictEngine::new(&appointments);

        assert!(engine.has_exact_collision(at(10, 0)));
        assert!(!engine.has_exact_collision(at(10, 15)));
    }

    #[test]
    fn next_available_skips_taken_start_times() {
        let appointments = vec![
            booked(Some("Dr. A"), 10, 30),
            booked(Some("Dr. B"), 11, 0),
        ];
        let engine = SlotConflictEngine::new(&appointments);

        assert_eq!(engine.next_available_slot(at(10, 7)), Some(at(11, 30)));
        assert_eq!(engine.next_available_slot(at(11, 10)), Some(at(11, 30)));
    }

    #[test]
    fn next_available_ignores_unaligned_bookings() {
        // Exact-match only: a 10:45 booking does not block the 10:30 proposal
        let appointments = vec![booked(Some("Dr. A"), 10, 45)];
        let engine = SlotConflictEngine::new(&appointments);

        assert_eq!(engine.next_available_slot(at(10, 7)), Some(at(10, 30)));
    }

    #[test]
    fn next_available_for_doctor_respects_overlap() {
        let appointments = vec![
            booked(Some("Dr. A"), 10, 45),
            booked(Some("Dr. B"), 10, 30),
        ];
        let engine = SlotConflictEngine::new(&appointments);

        assert_eq!(engine.next_available_slot_for_doctor("Dr. A", at(10, 7)), Some(at(11, 30)));
        assert_eq!(engine.next_available_slot_for_doctor("Dr. C", at(10, 7)), Some(at(10, 30)));
    }

    #[test]
    fn next_hour_suggestion_is_unconditional() {
        assert_eq!(suggest_next_hour(at(10, 7)), Some(at(11, 7)));
    }

    #[test]
    fn end_of_calendar_never_panics() {
        let appointments = vec![Appointment {
            start_time: NaiveDateTime::MAX - Duration::minutes(10),
            ..booked(Some("Dr. A"), 10, 0)
        }];
        let engine = SlotConflictEngine::new(&appointments);

        let last_minutes = NaiveDateTime::MAX - Duration::minutes(5);
        assert!(!engine.is_available("Dr. A", NaiveDateTime::MAX));
        assert!(!engine.is_available("Dr. B", last_minutes));
        assert_eq!(engine.conflicting_appointments("Dr. A", last_minutes).len(), 1);
        assert_eq!(appointments[0].end_time(), NaiveDateTime::MAX);

        assert_eq!(next_slot_boundary(NaiveDateTime::MAX), None);
        assert_eq!(engine.next_available_slot(NaiveDateTime::MAX), None);
        assert_eq!(engine.next_available_slot_for_doctor("Dr. B", NaiveDateTime::MAX), None);
        assert_eq!(suggest_next_hour(NaiveDateTime::MAX), None);
    }

    #[test]
    fn search_stops_when_the_last_slot_does_not_fit() {
        let near_end = NaiveDateTime::MAX - Duration::minutes(45);
        let engine = SlotConflictEngine::new(&[]);

        assert_eq!(engine.next_available_slot(near_end), None);
        assert_eq!(engine.next_available_slot_for_doctor("Dr. A", near_end), None);
    }
}
