//! Join workflow summaries with definition texts into composed records.
//!
//! The list endpoint and the file tree are fetched independently and can
//! disagree: the join is the sole source of truth for presence. A summary
//! without a matching definition file (deleted, renamed, or a garbage path
//! that produced an empty name) is silently dropped.

use flowlens_core::types::{ComposedWorkflow, WorkflowDetails, WorkflowMap, WorkflowSummary};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Best-effort textual scan, deliberately not a YAML parse: matches a
/// `schedule:` block followed by a `- cron:` key and captures the quoted
/// or bare expression up to the closing quote or end of line.
fn cron_regex() -> &'static Regex {
    static CRON_REGEX: OnceLock<Regex> = OnceLock::new();
    CRON_REGEX.get_or_init(|| {
        Regex::new(r#"(?im)schedule:\s+-\s*cron:\s*["']?([^"'\r\n]+)"#).expect("valid regex")
    })
}

/// Scan a raw definition for its schedule expression and dispatch trigger.
///
/// The captured cron text is NOT validated here — a malformed expression
/// is carried through and the projector later yields no next run for it.
pub fn extract_details(raw_text: &str) -> WorkflowDetails {
    WorkflowDetails {
        schedule: cron_regex()
            .captures(raw_text)
            .map(|captures| captures[1].trim().to_string()),
        manually_dispatchable: raw_text.contains("workflow_dispatch:"),
    }
}

/// Strict intersection by name: exactly the summaries whose name has a
/// definition file make it into the result.
pub fn aggregate(
    summaries: Vec<WorkflowSummary>,
    definitions: &HashMap<String, String>,
) -> WorkflowMap {
    let mut composed = WorkflowMap::new();
    for summary in summaries {
        let Some(raw_text) = definitions.get(&summary.name) else {
            tracing::debug!("Dropping summary '{}' (no definition file)", summary.name);
            continue;
        };
        let details = extract_details(raw_text);
        composed.insert(
            summary.name.clone(),
            ComposedWorkflow::compose(summary, details),
        );
    }
    composed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, enabled: bool) -> WorkflowSummary {
        WorkflowSummary {
            name: name.into(),
            is_enabled: enabled,
        }
    }

    fn definitions(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(name, text)| (name.to_string(), text.to_string()))
            .collect()
    }

    #[test]
    fn test_join_is_strict_intersection() {
        let summaries = vec![
            summary("ci.yml", true),
            summary("gone.yml", true),
            summary("release.yml", false),
        ];
        let defs = definitions(&[
            ("ci.yml", "on: push\n"),
            ("release.yml", "on: push\n"),
            ("orphan.yml", "on: push\n"),
        ]);

        let composed = aggregate(summaries, &defs);
        assert_eq!(composed.len(), 2);
        assert!(composed.contains_key("ci.yml"));
        assert!(composed.contains_key("release.yml"));
        // Only in summaries, or only in definitions: absent.
        assert!(!composed.contains_key("gone.yml"));
        assert!(!composed.contains_key("orphan.yml"));
    }

    #[test]
    fn test_empty_name_never_joins() {
        let composed = aggregate(
            vec![summary("", true)],
            &definitions(&[("ci.yml", "on: push\n")]),
        );
        assert!(composed.is_empty());
    }

    #[test]
    fn test_schedule_extraction_round_trip() {
        let details = extract_details("on:\n  schedule:\n    - cron: \"0 0 * * *\"\n");
        assert_eq!(details.schedule.as_deref(), Some("0 0 * * *"));

        let details = extract_details("on:\n  push:\n    branches: [main]\n");
        assert_eq!(details.schedule, None);
    }

    #[test]
    fn test_schedule_extraction_variants() {
        // Single quotes.
        let details = extract_details("on:\n  schedule:\n    - cron: '30 5 * * 1'\n");
        assert_eq!(details.schedule.as_deref(), Some("30 5 * * 1"));

        // Bare, unquoted.
        let details = extract_details("on:\n  schedule:\n    - cron: 15 3 * * *\n");
        assert_eq!(details.schedule.as_deref(), Some("15 3 * * *"));

        // Case-insensitive.
        let details = extract_details("on:\n  SCHEDULE:\n    - CRON: \"0 12 * * *\"\n");
        assert_eq!(details.schedule.as_deref(), Some("0 12 * * *"));

        // First match wins.
        let details = extract_details(
            "on:\n  schedule:\n    - cron: '1 1 * * *'\n    - cron: '2 2 * * *'\n",
        );
        assert_eq!(details.schedule.as_deref(), Some("1 1 * * *"));
    }

    #[test]
    fn test_malformed_cron_is_still_captured() {
        // Validity is the projector's concern, not the aggregator's.
        let details = extract_details("on:\n  schedule:\n    - cron: 'not a cron'\n");
        assert_eq!(details.schedule.as_deref(), Some("not a cron"));
    }

    #[test]
    fn test_dispatch_is_substring_scan() {
        assert!(extract_details("on:\n  workflow_dispatch:\n").manually_dispatchable);
        assert!(extract_details("on:\n      workflow_dispatch:   \n").manually_dispatchable);
        assert!(!extract_details("on:\n  push:\n").manually_dispatchable);
        // No colon, no trigger.
        assert!(!extract_details("# mentions workflow_dispatch only\n").manually_dispatchable);
    }

    #[test]
    fn test_composed_scenario() {
        let composed = aggregate(
            vec![summary("ci.yml", false)],
            &definitions(&[(
                "ci.yml",
                "on:\n  workflow_dispatch:\n  schedule:\n    - cron: '30 5 * * 1'",
            )]),
        );
        let workflow = &composed["ci.yml"];
        assert!(!workflow.is_enabled);
        assert_eq!(workflow.schedule.as_deref(), Some("30 5 * * 1"));
        assert!(workflow.manually_dispatchable);
    }
}
