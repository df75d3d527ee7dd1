use crate::reminder::RunReminderBatchUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use sage_scheduler_infra::SageContext;
use std::time::Duration;

/// How often the intake reminder batch looks for due contacts. The thresholds
/// are hours apart, so a coarse interval is plenty.
const REMINDER_BATCH_INTERVAL_SECS: u64 = 15 * 60;

pub fn start_reminder_batch_job(ctx: SageContext) {
    actix_web::rt::spawn(async move {
        let mut interval = interval(Duration::from_secs(REMINDER_BATCH_INTERVAL_SECS));
        // the first tick resolves immediately; skip it so the batch does not
        // run while the server is still starting up
        interval.tick().await;
        loop {
            interval.tick().await;

            let usecase = RunReminderBatchUseCase { dry_run: false };
            let _ = execute(usecase, &ctx).await;
        }
    });
}
