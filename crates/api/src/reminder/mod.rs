mod run_reminder_batch;

use actix_web::web;
use run_reminder_batch::run_reminder_batch_controller;

pub use run_reminder_batch::RunReminderBatchUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reminders/run",
        web::post().to(run_reminder_batch_controller),
    );
}
