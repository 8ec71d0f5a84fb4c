//! OCF resource agent return codes, for display only.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RcCode {
    Success,
    ErrGeneric,
    ErrArgs,
    ErrUnimplemented,
    ErrPerm,
    ErrInstalled,
    ErrConfigured,
    NotRunning,
    RunningMaster,
    FailedMaster,
    /// Missing or outside the OCF range.
    Unknown,
}

/// How a return code should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Running,
    NotRunning,
    Error,
}

impl RcCode {
    /// Maps the textual `rc-code` attribute.
    pub fn parse(rc_code: Option<&str>) -> Self {
        match rc_code {
            Some("0") => RcCode::Success,
            Some("1") => RcCode::ErrGeneric,
            Some("2") => RcCode::ErrArgs,
            Some("3") => RcCode::ErrUnimplemented,
            Some("4") => RcCode::ErrPerm,
            Some("5") => RcCode::ErrInstalled,
            Some("6") => RcCode::ErrConfigured,
            Some("7") => RcCode::NotRunning,
            Some("8") => RcCode::RunningMaster,
            Some("9") => RcCode::FailedMaster,
            _ => RcCode::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RcCode::Success => "Success",
            RcCode::ErrGeneric => "Error: Generic",
            RcCode::ErrArgs => "Error: Arguments",
            RcCode::ErrUnimplemented => "Error: Unimplemented",
            RcCode::ErrPerm => "Error: Permissions",
            RcCode::ErrInstalled => "Error: Installation",
            RcCode::ErrConfigured => "Error: Configuration",
            RcCode::NotRunning => "Not Running",
            RcCode::RunningMaster => "Master Running",
            RcCode::FailedMaster => "Master Failed",
            RcCode::Unknown => "Unknown!",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RcCode::Success | RcCode::RunningMaster => Severity::Running,
            RcCode::NotRunning => Severity::NotRunning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for RcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
