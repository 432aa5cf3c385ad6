pub mod calendar;
pub mod error;
pub mod geofence;
pub mod payroll;
pub mod session;
