pub mod advance;
pub mod attendance;
pub mod company;
pub mod employee;
pub mod geofence;
pub mod payroll;
