use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::time::{lenient_minutes, time_to_minutes, TimeError, TimePolicy};
use super::types::Slot;

/// Upper bound on the sum of a day's slot points
pub const POINT_BUDGET: i64 = 100;

/// Warnings shown above the slot form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub total_points_exceeded: bool,
    pub has_overlap: bool,
    pub total_points: i64,
    /// First overlapping pair found, lower index first
    pub overlap: Option<(usize, usize)>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        !self.total_points_exceeded && !self.has_overlap
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeField {
    StartTime,
    EndTime,
}

impl std::fmt::Display for TimeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeField::StartTime => write!(f, "start time"),
            TimeField::EndTime => write!(f, "end time"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot {} has an invalid {field}: {source}", .index + 1)]
    InvalidTime {
        index: usize,
        field: TimeField,
        #[source]
        source: TimeError,
    },
}

/// Validates a slot list. Unparseable times count as midnight, so this never fails.
pub fn validate(slots: &[Slot]) -> ValidationReport {
    let intervals: Vec<(u32, u32)> = slots
        .iter()
        .map(|s| (lenient_minutes(&s.start_time), lenient_minutes(&s.end_time)))
        .collect();
    build_report(slots, &intervals)
}

/// Like [`validate`] but rejects any non-empty time that is not a real clock time
pub fn validate_strict(slots: &[Slot]) -> Result<ValidationReport, SlotError> {
    let mut intervals = Vec::with_capacity(slots.len());
    for (index, slot) in slots.iter().enumerate() {
        let start = time_to_minutes(&slot.start_time, TimePolicy::Strict).map_err(|source| {
            SlotError::InvalidTime { index, field: TimeField::StartTime, source }
        })?;
        let end = time_to_minutes(&slot.end_time, TimePolicy::Strict).map_err(|source| {
            SlotError::InvalidTime { index, field: TimeField::EndTime, source }
        })?;
        intervals.push((start, end));
    }
    Ok(build_report(slots, &intervals))
}

/// Dispatches to [`validate`] or [`validate_strict`]
pub fn validate_with(slots: &[Slot], policy: TimePolicy) -> Result<ValidationReport, SlotError> {
    match policy {
        TimePolicy::Lenient => Ok(validate(slots)),
        TimePolicy::Strict => validate_strict(slots),
    }
}

/// Sum of all slot points, negatives included
pub fn total_points(slots: &[Slot]) -> i64 {
    slots.iter().map(|s| s.points as i64).sum()
}

/// Finds the first pair of half-open intervals that intersect.
/// Touching endpoints (one ends at 10:00, the next starts at 10:00) do not count.
pub fn find_overlap(intervals: &[(u32, u32)]) -> Option<(usize, usize)> {
    for i in 0..intervals.len() {
        let (start_i, end_i) = intervals[i];
        for j in (i + 1)..intervals.len() {
            let (start_j, end_j) = intervals[j];
            if start_i < end_j && end_i > start_j {
                return Some((i, j));
            }
        }
    }
    None
}

fn build_report(slots: &[Slot], intervals: &[(u32, u32)]) -> ValidationReport {
    let total = total_points(slots);
    let overlap = find_overlap(intervals);
    ValidationReport {
        total_points_exceeded: total > POINT_BUDGET,
        has_overlap: overlap.is_some(),
        total_points: total,
        overlap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn timed(start: &str, end: &str) -> Slot {
        Slot::new("", start, end, 0)
    }

    fn pointed(points: &[i32]) -> Vec<Slot> {
        points.iter().map(|&p| Slot::new("", "", "", p)).collect()
    }

    #[test]
    fn test_empty_sequence_is_clean() {
        let report = validate(&[]);
        assert!(!report.total_points_exceeded);
        assert!(!report.has_overlap);
        assert!(report.is_clean());
    }

    #[test]
    fn test_point_budget_boundary() {
        assert!(validate(&pointed(&[40, 40, 21])).total_points_exceeded);
        let at_budget = validate(&pointed(&[40, 40, 20]));
        assert!(!at_budget.total_points_exceeded);
        assert_eq!(at_budget.total_points, 100);
    }

    #[test]
    fn test_zero_points_never_exceed() {
        assert!(!validate(&pointed(&[0; 50])).total_points_exceeded);
    }

    #[test]
    fn test_negative_points_are_summed_as_is() {
        let report = validate(&pointed(&[90, 30, -25]));
        assert_eq!(report.total_points, 95);
        assert!(!report.total_points_exceeded);
    }

    #[test]
    fn test_touching_boundary_is_not_overlap() {
        let report = validate(&[timed("09:00", "10:00"), timed("10:00", "11:00")]);
        assert!(!report.has_overlap);
        assert_eq!(report.overlap, None);
    }

    #[test]
    fn test_true_overlap() {
        let report = validate(&[timed("09:00", "10:30"), timed("10:00", "11:00")]);
        assert!(report.has_overlap);
        assert_eq!(report.overlap, Some((0, 1)));
    }

    #[test]
    fn test_overlap_reports_first_pair() {
        let slots = [
            timed("06:00", "07:00"),
            timed("08:00", "09:00"),
            timed("08:30", "09:30"),
            timed("06:30", "06:45"),
        ];
        assert_eq!(validate(&slots).overlap, Some((0, 3)));
    }

    #[test]
    fn test_unset_slots_never_overlap() {
        let slots = [timed("", ""), timed("", ""), timed("00:00", "23:59")];
        assert!(!validate(&slots).has_overlap);
    }

    #[test]
    fn test_lenient_treats_garbage_as_midnight() {
        let slots = [timed("abc", "xyz"), timed("09:00", "10:00")];
        assert!(!validate(&slots).has_overlap);
    }

    #[test]
    fn test_strict_reports_offending_slot() {
        let slots = [timed("09:00", "10:00"), timed("10:00", "25:99")];
        let err = validate_strict(&slots).unwrap_err();
        assert_eq!(
            err,
            SlotError::InvalidTime {
                index: 1,
                field: TimeField::EndTime,
                source: TimeError::Malformed("25:99".to_string()),
            }
        );
        assert_eq!(err.to_string(), "slot 2 has an invalid end time: '25:99' is not a valid HH:MM time");
    }

    #[test]
    fn test_strict_matches_lenient_on_clean_input() {
        let slots = [timed("09:00", "10:30"), timed("10:00", "11:00"), timed("", "")];
        assert_eq!(validate_strict(&slots), Ok(validate(&slots)));
        assert_eq!(validate_with(&slots, TimePolicy::Lenient), Ok(validate(&slots)));
    }

    #[test]
    fn test_validate_does_not_mutate_input() {
        let slots = vec![timed("09:00", "10:30"), timed("10:00", "11:00")];
        let before = slots.clone();
        let _ = validate(&slots);
        assert_eq!(slots, before);
    }

    fn arb_slot() -> impl Strategy<Value = Slot> {
        (0u32..24, 0u32..60, 0u32..24, 0u32..60, -10i32..60).prop_map(|(sh, sm, eh, em, points)| {
            Slot::new(
                "",
                &format!("{:02}:{:02}", sh, sm),
                &format!("{:02}:{:02}", eh, em),
                points,
            )
        })
    }

    proptest! {
        #[test]
        fn prop_permutation_keeps_flags(slots in prop::collection::vec(arb_slot(), 0..12), seed in any::<u64>()) {
            let original = validate(&slots);
            let mut shuffled = slots.clone();
            let len = shuffled.len();
            if len > 1 {
                let mut state = seed;
                for i in (1..len).rev() {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    let j = (state >> 33) as usize % (i + 1);
                    shuffled.swap(i, j);
                }
            }
            let permuted = validate(&shuffled);
            prop_assert_eq!(original.total_points_exceeded, permuted.total_points_exceeded);
            prop_assert_eq!(original.has_overlap, permuted.has_overlap);
            prop_assert_eq!(original.total_points, permuted.total_points);
        }

        #[test]
        fn prop_reversal_keeps_flags(slots in prop::collection::vec(arb_slot(), 0..12)) {
            let mut reversed = slots.clone();
            reversed.reverse();
            prop_assert_eq!(validate(&slots).has_overlap, validate(&reversed).has_overlap);
        }

        #[test]
        fn prop_validate_is_idempotent(slots in prop::collection::vec(arb_slot(), 0..12)) {
            prop_assert_eq!(validate(&slots), validate(&slots));
        }

        #[test]
        fn prop_all_zero_points_never_exceed(count in 0usize..40) {
            let slots = vec![Slot::default(); count];
            prop_assert!(!validate(&slots).total_points_exceeded);
        }
    }
}
