use crate::{
    api::{attendance, jobs, payroll},
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/attendance")
                    // /attendance/check-in
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    // /attendance/check-out
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    // /payroll/report?employee_id&year&month
                    .service(web::resource("/report").route(web::get().to(payroll::monthly_report))),
            )
            .service(
                web::scope("/jobs")
                    // /jobs/close-stale — external scheduler trigger
                    .service(web::resource("/close-stale").route(web::post().to(jobs::close_stale))),
            ),
    );
}
