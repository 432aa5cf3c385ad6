use thiserror::Error;

/// Domain error taxonomy for the attendance core. Ordering violations are
/// surfaced to the caller for display; batch-scoped failures are accumulated
/// into the run report instead of aborting the sweep.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttendanceError {
    #[error("already checked in today")]
    AlreadyCheckedIn,

    #[error("no open session to check out of")]
    NoOpenSession,

    #[error("employee {0} not found")]
    EmployeeNotFound(u64),

    #[error("company {0} not found")]
    CompanyNotFound(u64),

    #[error("storage commit rejected: {0}")]
    CommitFailure(String),
}
