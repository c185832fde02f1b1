//! Meal distribution page: per-timeslot counts and service totals.

use serde::{Deserialize, Serialize};

use crate::models::TimeslotDistribution;

/// Nominal wait per slot until the backend reports real queue times.
pub const NOMINAL_WAIT_MINUTES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionPoint {
    /// First token of the slot label, e.g. `"12:00"` for `"12:00 - 12:30"`.
    pub time: String,
    pub count: u64,
    pub wait: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    pub total_students: u64,
    /// Students in slots whose status is `completed`.
    pub students_served: u64,
    pub average_wait_minutes: u32,
    pub series: Vec<DistributionPoint>,
    pub timeslots: Vec<TimeslotDistribution>,
}

pub fn summarize_distribution(timeslots: &[TimeslotDistribution]) -> DistributionSummary {
    let series: Vec<DistributionPoint> = timeslots
        .iter()
        .map(|slot| DistributionPoint {
            time: slot
                .timeslot
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string(),
            count: slot.count,
            wait: NOMINAL_WAIT_MINUTES,
        })
        .collect();

    let average_wait_minutes = if series.is_empty() {
        0
    } else {
        let total: u32 = series.iter().map(|p| p.wait).sum();
        (f64::from(total) / series.len() as f64).round() as u32
    };

    DistributionSummary {
        total_students: saturating_total(timeslots.iter()),
        students_served: saturating_total(timeslots.iter().filter(|s| {
            s.status
                .as_deref()
                .is_some_and(|st| st.trim().eq_ignore_ascii_case("completed"))
        })),
        average_wait_minutes,
        series,
        timeslots: timeslots.to_vec(),
    }
}

fn saturating_total<'a>(slots: impl Iterator<Item = &'a TimeslotDistribution>) -> u64 {
    slots.fold(0, |total, slot| total.saturating_add(slot.count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(label: &str, count: u64, status: Option<&str>) -> TimeslotDistribution {
        TimeslotDistribution {
            timeslot: label.to_string(),
            count,
            status: status.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty() {
        let summary = summarize_distribution(&[]);
        assert_eq!(summary.total_students, 0);
        assert_eq!(summary.students_served, 0);
        assert_eq!(summary.average_wait_minutes, 0);
        assert!(summary.series.is_empty());
    }

    #[test]
    fn test_totals_and_series() {
        let summary = summarize_distribution(&[
            slot("11:30 - 12:00", 40, Some("completed")),
            slot("12:00 - 12:30", 55, Some("active")),
            slot("", 5, None),
        ]);
        assert_eq!(summary.total_students, 100);
        assert_eq!(summary.students_served, 40);
        assert_eq!(summary.average_wait_minutes, 5);
        let times: Vec<&str> = summary.series.iter().map(|p| p.time.as_str()).collect();
        assert_eq!(times, vec!["11:30", "12:00", ""]);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let summary = summarize_distribution(&[
            slot("11:30 - 12:00", u64::MAX, Some("completed")),
            slot("12:00 - 12:30", 1, Some("completed")),
        ]);
        assert_eq!(summary.total_students, u64::MAX);
        assert_eq!(summary.students_served, u64::MAX);
    }
}
