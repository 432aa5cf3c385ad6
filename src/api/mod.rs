pub mod attendance;
pub mod jobs;
pub mod payroll;
