use chrono::TimeZone;
use sage_scheduler_api::Application;
use sage_scheduler_infra::{InMemoryNotifier, SageContext, StaticTimeSys};
use std::sync::Arc;

pub struct TestApp {
    pub ctx: SageContext,
    pub notifier: Arc<InMemoryNotifier>,
    pub address: String,
}

pub fn eastern_ts(year: i32, month: u32, day: u32, hours: u32, minutes: u32) -> i64 {
    chrono_tz::America::New_York
        .with_ymd_and_hms(year, month, day, hours, minutes, 0)
        .unwrap()
        .timestamp_millis()
}

/// Boots the application on a random port against in-memory infrastructure,
/// with the clock frozen on Monday 2026-08-03, 08:00 Eastern.
pub async fn spawn_app() -> TestApp {
    let notifier = Arc::new(InMemoryNotifier::new());
    let mut ctx = SageContext::create_inmemory();
    ctx.config.port = 0;
    ctx.sys = Arc::new(StaticTimeSys {
        timestamp_millis: eastern_ts(2026, 8, 3, 8, 0),
    });
    ctx.notifier = notifier.clone();

    let app = Application::new(ctx.clone())
        .await
        .expect("To spawn application");
    let address = format!("http://127.0.0.1:{}/api/v1", app.port());
    actix_web::rt::spawn(async move {
        let _ = app.start().await;
    });

    TestApp {
        ctx,
        notifier,
        address,
    }
}
