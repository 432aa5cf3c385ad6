use crate::api::attendance::AttendancePunch;
use crate::api::payroll::ReportQuery;
use crate::jobs::stale_closer::RunReport;
use crate::model::advance::{Advance, AdvanceStatus};
use crate::model::attendance::{AttendanceEvent, SessionStatus};
use crate::model::company::SalaryPolicy;
use crate::model::employee::Employee;
use crate::model::geofence::{GeoPoint, GeofenceKind, GeofenceVerdict};
use crate::model::payroll::MonthlyPayrollReport;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance & Payroll Reconciliation API",
        version = "1.0.0",
        description = r#"
## Attendance & Payroll Reconciliation Service

Validates geofenced check-in/check-out events, maintains the per-employee
daily attendance state machine, force-closes sessions left open overnight,
and aggregates a month of attendance plus approved advances into a payable
amount.

### 🔹 Key Features
- **Attendance**
  - Geofence-validated check-in and check-out with photo evidence
  - Tri-state geofence verdicts (inside / outside / unknown)
- **Stale-session closer**
  - Daily batch job that force-closes sessions left open overnight
  - Per-company atomic batches with a run summary
- **Payroll reports**
  - Monthly report under `hourly_deduction` or `check_in_out` policy
  - Sunday and holiday aware standard-hours computation

### 📦 Response Format
- JSON-based RESTful responses

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,

        crate::api::payroll::monthly_report,

        crate::api::jobs::close_stale
    ),
    components(
        schemas(
            AttendancePunch,
            AttendanceEvent,
            SessionStatus,
            GeoPoint,
            GeofenceKind,
            GeofenceVerdict,
            Employee,
            SalaryPolicy,
            Advance,
            AdvanceStatus,
            ReportQuery,
            MonthlyPayrollReport,
            RunReport
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance recording APIs"),
        (name = "Payroll", description = "Payroll report APIs"),
        (name = "Jobs", description = "Batch job triggers"),
    )
)]
pub struct ApiDoc;
