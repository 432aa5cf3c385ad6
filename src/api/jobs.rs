use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use sqlx::MySqlPool;

use crate::core::calendar::Calendar;
use crate::jobs::stale_closer::{self, RunReport};

/// Manual trigger for the stale-session closer, for external schedulers.
/// Safe to call repeatedly: an already-closed session never matches the
/// sweep again.
#[utoipa::path(
    post,
    path = "/api/jobs/close-stale",
    responses(
        (status = 200, description = "Sweep summary", body = RunReport)
    ),
    tag = "Jobs"
)]
pub async fn close_stale(
    pool: web::Data<MySqlPool>,
    cal: web::Data<Calendar>,
) -> actix_web::Result<impl Responder> {
    let report = stale_closer::run(pool.get_ref(), cal.get_ref(), Utc::now()).await;
    Ok(HttpResponse::Ok().json(report))
}
