use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Derived payroll view for one employee and one reporting month. Never
/// persisted by this service; recomputed on every request from the event log
/// plus directory configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": 1001,
        "employee_name": "John Doe",
        "year": 2026,
        "month": 1,
        "base_salary": 30000.0,
        "total_standard_hours_for_month": 208.0,
        "total_actual_hours_worked": 184.5,
        "calculated_deductions": 3389.42,
        "total_approved_advances": 5000.0,
        "final_net_payable": 21610.58
    })
)]
pub struct MonthlyPayrollReport {
    pub employee_id: u64,
    pub employee_name: String,
    pub year: i32,
    pub month: u32,
    pub base_salary: f64,
    pub total_standard_hours_for_month: f64,
    pub total_actual_hours_worked: f64,
    pub calculated_deductions: f64,
    pub total_approved_advances: f64,
    pub final_net_payable: f64,
}
