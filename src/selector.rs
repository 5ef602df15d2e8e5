//! Nearest-snapshot selection
//!
//! Reports and bulk snapshots are exported on independent schedules. For a
//! report produced on `reference_date` the resolver needs the snapshot whose
//! names best reflect that date:
//!
//! - the latest snapshot dated on or before the reference date (no limit), or
//! - the earliest snapshot after it, within a forward tolerance window.
//!
//! When both exist the closer one wins; ties go to the earlier snapshot.
//! With neither, the batch is parked as `missing_bulk_snapshot` instead of
//! being resolved against a wrong-period snapshot.

use chrono::NaiveDate;

/// Default forward tolerance in days
pub const DEFAULT_FORWARD_TOLERANCE_DAYS: u32 = 7;

/// Which side of the reference date the chosen snapshot lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// On or before the reference date
    Backward,
    /// Strictly after the reference date
    Forward,
}

/// A selected snapshot and how far it is from the reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotChoice {
    pub snapshot_date: NaiveDate,
    pub direction: Direction,
    /// Absolute distance in days
    pub gap_days: i64,
}

/// Pick a snapshot date using the default 7-day forward tolerance
pub fn pick(reference_date: NaiveDate, available: &[NaiveDate]) -> Option<NaiveDate> {
    pick_with_tolerance(reference_date, available, DEFAULT_FORWARD_TOLERANCE_DAYS)
}

/// Pick a snapshot date with an explicit forward tolerance
pub fn pick_with_tolerance(
    reference_date: NaiveDate,
    available: &[NaiveDate],
    forward_tolerance_days: u32,
) -> Option<NaiveDate> {
    choose(reference_date, available, forward_tolerance_days).map(|c| c.snapshot_date)
}

/// Select a snapshot, reporting direction and gap.
///
/// `available` may be unsorted and contain duplicates.
pub fn choose(
    reference_date: NaiveDate,
    available: &[NaiveDate],
    forward_tolerance_days: u32,
) -> Option<SnapshotChoice> {
    let backward = available.iter().filter(|d| **d <= reference_date).max();
    let forward = available
        .iter()
        .filter(|d| **d > reference_date)
        .filter(|d| (**d - reference_date).num_days() <= i64::from(forward_tolerance_days))
        .min();

    let backward = backward.map(|d| SnapshotChoice {
        snapshot_date: *d,
        direction: Direction::Backward,
        gap_days: (reference_date - *d).num_days(),
    });
    let forward = forward.map(|d| SnapshotChoice {
        snapshot_date: *d,
        direction: Direction::Forward,
        gap_days: (*d - reference_date).num_days(),
    });

    match (backward, forward) {
        (Some(b), Some(f)) if f.gap_days < b.gap_days => Some(f),
        (Some(b), _) => Some(b),
        (None, f) => f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_prefers_latest_on_or_before() {
        let dates = [d("2025-01-01"), d("2025-01-15"), d("2025-02-05")];
        assert_eq!(pick(d("2025-01-20"), &dates), Some(d("2025-01-15")));
    }

    #[test]
    fn test_same_day_snapshot() {
        let dates = [d("2025-01-15"), d("2025-01-20")];
        assert_eq!(pick(d("2025-01-20"), &dates), Some(d("2025-01-20")));
    }

    #[test]
    fn test_forward_within_tolerance() {
        assert_eq!(pick(d("2025-01-15"), &[d("2025-01-20")]), Some(d("2025-01-20")));
        assert_eq!(pick(d("2025-01-13"), &[d("2025-01-20")]), Some(d("2025-01-20")));
    }

    #[test]
    fn test_forward_beyond_tolerance() {
        assert_eq!(pick(d("2025-01-01"), &[d("2025-01-20")]), None);
        assert_eq!(pick(d("2025-01-12"), &[d("2025-01-20")]), None);
    }

    #[test]
    fn test_closer_forward_beats_distant_backward() {
        let dates = [d("2025-01-01"), d("2025-01-22")];
        let choice = choose(d("2025-01-20"), &dates, 7).unwrap();
        assert_eq!(choice.snapshot_date, d("2025-01-22"));
        assert_eq!(choice.direction, Direction::Forward);
        assert_eq!(choice.gap_days, 2);
    }

    #[test]
    fn test_tie_favors_backward() {
        let dates = [d("2025-01-17"), d("2025-01-23")];
        let choice = choose(d("2025-01-20"), &dates, 7).unwrap();
        assert_eq!(choice.snapshot_date, d("2025-01-17"));
        assert_eq!(choice.direction, Direction::Backward);
    }

    #[test]
    fn test_unsorted_with_duplicates() {
        let dates = [d("2025-02-05"), d("2025-01-15"), d("2025-01-01"), d("2025-01-15")];
        assert_eq!(pick(d("2025-01-20"), &dates), Some(d("2025-01-15")));
    }

    #[test]
    fn test_empty_and_zero_tolerance() {
        assert_eq!(pick(d("2025-01-20"), &[]), None);
        assert_eq!(
            pick_with_tolerance(d("2025-01-19"), &[d("2025-01-20")], 0),
            None
        );
    }
}
