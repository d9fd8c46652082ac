//! Pure indicator resolution for one composed workflow.

use chrono::{DateTime, Utc};
use flowlens_core::types::{ComposedWorkflow, WorkflowIndicators};
use flowlens_schedule::next_occurrence;

/// Decide which indicators apply. The rules are independent, not mutually
/// exclusive; a disabled workflow can still be dispatchable and scheduled.
/// A malformed schedule expression degrades to no projected next run.
pub fn resolve_indicators(workflow: &ComposedWorkflow, now: DateTime<Utc>) -> WorkflowIndicators {
    WorkflowIndicators {
        disabled: !workflow.is_enabled,
        dispatchable: workflow.manually_dispatchable,
        next_run: workflow
            .schedule
            .as_deref()
            .and_then(|expression| next_occurrence(expression, now)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn workflow(enabled: bool, schedule: Option<&str>, dispatchable: bool) -> ComposedWorkflow {
        ComposedWorkflow {
            name: "ci.yml".into(),
            is_enabled: enabled,
            schedule: schedule.map(String::from),
            manually_dispatchable: dispatchable,
        }
    }

    #[test]
    fn test_indicators_are_independent() {
        // Sunday noon; next Monday 05:30 is the 31st.
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let indicators = resolve_indicators(&workflow(false, Some("30 5 * * 1"), true), now);
        assert!(indicators.disabled);
        assert!(indicators.dispatchable);
        assert_eq!(
            indicators.next_run,
            Some(Utc.with_ymd_and_hms(2026, 8, 31, 5, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_no_schedule_means_no_next_run() {
        let indicators = resolve_indicators(&workflow(true, None, false), Utc::now());
        assert!(!indicators.disabled);
        assert!(!indicators.dispatchable);
        assert_eq!(indicators.next_run, None);
    }

    #[test]
    fn test_malformed_schedule_degrades_silently() {
        let indicators = resolve_indicators(&workflow(true, Some("not a cron"), false), Utc::now());
        assert_eq!(indicators.next_run, None);
    }

    #[test]
    fn test_next_run_is_strictly_future() {
        let now = Utc::now();
        let indicators = resolve_indicators(&workflow(true, Some("* * * * *"), false), now);
        assert!(indicators.next_run.unwrap() > now);
    }
}
