//! Resource status derived from LRM operation history.
//!
//! The classifier walks the history in stored (call-id) order and keeps the
//! last operation that passes three gates:
//!
//! ```text
//! op-status != "0"                         -> skip (did not complete)
//! operation not start/stop/monitor/promote -> skip (irrelevant)
//! rc-code != "0" and operation != monitor  -> skip (failed action)
//! ```
//!
//! The survivor decides the status:
//!
//! ```text
//! none                      -> ?
//! start | stop | promote    -> the operation name
//! monitor, rc-code 0 or 8   -> start
//! monitor, any other rc     -> stop
//! ```
//!
//! A monitor returning 8 ("running promoted") still reports `start`; only a
//! completed promote action reports `promote`.

use serde::Serialize;
use std::fmt;

use crate::model::Operation;

const RELEVANT_OPERATIONS: [&str; 4] = ["start", "stop", "monitor", "promote"];

/// Classified state of a resource on one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceStatus {
    #[serde(rename = "?")]
    Unknown,
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "stop")]
    Stop,
    #[serde(rename = "promote")]
    Promote,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Unknown => "?",
            ResourceStatus::Start => "start",
            ResourceStatus::Stop => "stop",
            ResourceStatus::Promote => "promote",
        }
    }

    /// Started or promoted; what the health probe reports as healthy.
    pub fn is_running(&self) -> bool {
        matches!(self, ResourceStatus::Start | ResourceStatus::Promote)
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives the status of a resource from its call-id ordered history.
pub fn classify(ops: &[Operation]) -> ResourceStatus {
    let last_op = ops
        .iter()
        .fold(None, |last, op| if qualifies(op) { Some(op) } else { last });

    let Some(last_op) = last_op else {
        return ResourceStatus::Unknown;
    };

    match last_op.operation.as_deref() {
        Some("start") => ResourceStatus::Start,
        Some("stop") => ResourceStatus::Stop,
        Some("promote") => ResourceStatus::Promote,
        // Only monitors reach this arm.
        _ => match last_op.rc_code.as_deref() {
            Some("0") | Some("8") => ResourceStatus::Start,
            _ => ResourceStatus::Stop,
        },
    }
}

fn qualifies(op: &Operation) -> bool {
    if op.op_status.as_deref() != Some("0") {
        return false;
    }

    let operation = op.operation.as_deref().unwrap_or_default();
    if !RELEVANT_OPERATIONS.contains(&operation) {
        return false;
    }

    op.rc_code.as_deref() == Some("0") || operation == "monitor"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operation: &str, op_status: &str, rc_code: &str, call_id: &str) -> Operation {
        Operation::from_attributes(
            format!("rsc_{}_{}", operation, call_id),
            [
                ("operation", operation),
                ("op-status", op_status),
                ("rc-code", rc_code),
                ("call-id", call_id),
            ],
        )
    }

    #[test]
    fn test_empty_history_is_unknown() {
        assert_eq!(classify(&[]), ResourceStatus::Unknown);
    }

    #[test]
    fn test_monitor_success_is_start() {
        assert_eq!(classify(&[op("monitor", "0", "0", "1")]), ResourceStatus::Start);
    }

    #[test]
    fn test_monitor_promoted_is_start_not_promote() {
        assert_eq!(classify(&[op("monitor", "0", "8", "1")]), ResourceStatus::Start);
    }

    #[test]
    fn test_monitor_failure_is_stop() {
        assert_eq!(classify(&[op("monitor", "0", "1", "1")]), ResourceStatus::Stop);
        assert_eq!(classify(&[op("monitor", "0", "7", "1")]), ResourceStatus::Stop);
    }

    #[test]
    fn test_later_qualifying_record_wins() {
        let ops = [op("start", "0", "0", "1"), op("monitor", "0", "1", "2")];
        assert_eq!(classify(&ops), ResourceStatus::Stop);
    }

    #[test]
    fn test_failed_non_monitor_is_ignored() {
        assert_eq!(classify(&[op("stop", "0", "7", "1")]), ResourceStatus::Unknown);

        let ops = [op("start", "0", "0", "1"), op("stop", "0", "1", "2")];
        assert_eq!(classify(&ops), ResourceStatus::Start);
    }

    #[test]
    fn test_incomplete_ops_are_ignored() {
        let ops = [
            op("start", "1", "0", "1"),
            op("monitor", "-1", "0", "2"),
            op("promote", "4", "0", "3"),
        ];
        assert_eq!(classify(&ops), ResourceStatus::Unknown);
    }

    #[test]
    fn test_irrelevant_operations_are_ignored() {
        let ops = [op("promote", "0", "0", "1"), op("notify", "0", "0", "2")];
        assert_eq!(classify(&ops), ResourceStatus::Promote);

        let ops = [op("demote", "0", "0", "1"), op("migrate_to", "0", "0", "2")];
        assert_eq!(classify(&ops), ResourceStatus::Unknown);
    }

    #[test]
    fn test_missing_attributes_never_qualify() {
        let bare = Operation::from_attributes("bare", std::iter::empty());
        assert_eq!(classify(&[bare]), ResourceStatus::Unknown);

        let no_rc = Operation::from_attributes(
            "no_rc",
            [("operation", "start"), ("op-status", "0")],
        );
        assert_eq!(classify(&[no_rc]), ResourceStatus::Unknown);

        let monitor_no_rc = Operation::from_attributes(
            "monitor_no_rc",
            [("operation", "monitor"), ("op-status", "0")],
        );
        assert_eq!(classify(&[monitor_no_rc]), ResourceStatus::Stop);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let ops = [
            op("start", "0", "0", "1"),
            op("monitor", "0", "8", "2"),
            op("promote", "0", "0", "3"),
        ];
        assert_eq!(classify(&ops), classify(&ops));
        assert_eq!(classify(&ops), ResourceStatus::Promote);
    }

    #[test]
    fn test_status_tokens() {
        assert_eq!(ResourceStatus::Unknown.to_string(), "?");
        assert_eq!(ResourceStatus::Promote.to_string(), "promote");
        assert_eq!(
            serde_json::to_string(&ResourceStatus::Stop).unwrap(),
            "\"stop\""
        );
        assert!(ResourceStatus::Promote.is_running());
        assert!(!ResourceStatus::Unknown.is_running());
    }
}
