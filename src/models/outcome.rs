//! Structured, non-fatal run outcomes.
//!
//! Data-quality problems never abort a run. They are recorded per student or
//! per stop with a reason whose serialized form is the diagnostic code shown
//! to operators.

use serde::{Deserialize, Serialize};

/// Why a student received no stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnassignedReason {
    /// Missing or invalid coordinates.
    NoCoordinates,
    /// The stop budget ran out before this student was covered.
    StopLimitReached,
    /// The time limit expired before this student was covered.
    DeadlineExceeded,
}

impl UnassignedReason {
    /// Diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            UnassignedReason::NoCoordinates => "NO_COORDINATES",
            UnassignedReason::StopLimitReached => "STOP_LIMIT_REACHED",
            UnassignedReason::DeadlineExceeded => "DEADLINE_EXCEEDED",
        }
    }
}

/// A student left without a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedStudent {
    /// The student.
    pub student_id: usize,
    /// Why no stop was assigned.
    pub reason: UnassignedReason,
}

/// Why demand was left off every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnroutedReason {
    /// Demand exceeds vehicle capacity and splitting is disabled.
    UnroutableStop,
    /// The time limit expired before this node was routed.
    DeadlineExceeded,
}

impl UnroutedReason {
    /// Diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            UnroutedReason::UnroutableStop => "UNROUTABLE_STOP",
            UnroutedReason::DeadlineExceeded => "DEADLINE_EXCEEDED",
        }
    }
}

/// Demand that no route carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnroutedStop {
    /// The placed stop.
    pub stop_id: usize,
    /// Slice index when only a virtual slice was left unrouted.
    pub slice_index: Option<usize>,
    /// Students not picked up.
    pub demand: i32,
    /// Why it was not routed.
    pub reason: UnroutedReason,
}

/// Completion status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// The algorithm ran to completion.
    #[default]
    Complete,
    /// The time limit expired; output is best-effort.
    PartialResult,
}

impl RunStatus {
    /// Combines two statuses; partial wins.
    pub fn merge(self, other: RunStatus) -> RunStatus {
        if self == RunStatus::PartialResult || other == RunStatus::PartialResult {
            RunStatus::PartialResult
        } else {
            RunStatus::Complete
        }
    }

    /// Diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            RunStatus::Complete => "COMPLETE",
            RunStatus::PartialResult => "PARTIAL_RESULT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_serialized_form() {
        for reason in [
            UnassignedReason::NoCoordinates,
            UnassignedReason::StopLimitReached,
            UnassignedReason::DeadlineExceeded,
        ] {
            let json = serde_json::to_string(&reason).expect("serializable");
            assert_eq!(json, format!("\"{}\"", reason.code()));
        }
        let json = serde_json::to_string(&UnroutedReason::UnroutableStop).expect("serializable");
        assert_eq!(json, "\"UNROUTABLE_STOP\"");
        let json = serde_json::to_string(&RunStatus::PartialResult).expect("serializable");
        assert_eq!(json, "\"PARTIAL_RESULT\"");
    }

    #[test]
    fn test_status_merge() {
        use RunStatus::*;
        assert_eq!(Complete.merge(Complete), Complete);
        assert_eq!(Complete.merge(PartialResult), PartialResult);
        assert_eq!(PartialResult.merge(Complete), PartialResult);
    }
}
