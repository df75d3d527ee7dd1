use crate::error::ApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use sage_scheduler_api_structs::dtos::{
    ReminderOutcomeDTO, ReminderOutcomeKind, ReminderRunReportDTO,
};
use sage_scheduler_api_structs::run_reminder_batch::*;
use sage_scheduler_domain::{
    Contact, DashboardNotification, ReminderStage, TimeZoneNormalizer, ID,
};
use sage_scheduler_infra::{NotificationPayload, ReminderChannel, SageContext};
use tracing::{error, warn};

pub async fn run_reminder_batch_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SageContext>,
) -> Result<HttpResponse, ApiError> {
    let usecase = RunReminderBatchUseCase {
        dry_run: query_params.0.dry_run.unwrap_or(false),
    };

    execute(usecase, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(to_dto(report)))
        .map_err(|e| match e {
            UseCaseError::StorageError => ApiError::InternalError,
        })
}

fn to_dto(report: ReminderRunReport) -> ReminderRunReportDTO {
    let outcomes = report
        .outcomes
        .into_iter()
        .map(|(contact_id, outcome)| match outcome {
            ReminderOutcome::Sent(stage) => ReminderOutcomeDTO {
                contact_id,
                outcome: ReminderOutcomeKind::Sent,
                stage: Some(stage.number()),
                detail: None,
            },
            ReminderOutcome::Skipped => ReminderOutcomeDTO {
                contact_id,
                outcome: ReminderOutcomeKind::Skipped,
                stage: None,
                detail: None,
            },
            ReminderOutcome::Error(detail) => ReminderOutcomeDTO {
                contact_id,
                outcome: ReminderOutcomeKind::Error,
                stage: None,
                detail: Some(detail),
            },
        })
        .collect::<Vec<_>>();
    ReminderRunReportDTO {
        dry_run: report.dry_run,
        sent: outcomes
            .iter()
            .filter(|o| o.outcome == ReminderOutcomeKind::Sent)
            .count(),
        skipped: outcomes
            .iter()
            .filter(|o| o.outcome == ReminderOutcomeKind::Skipped)
            .count(),
        errors: outcomes
            .iter()
            .filter(|o| o.outcome == ReminderOutcomeKind::Error)
            .count(),
        outcomes,
    }
}

/// One pass of the intake reminder escalation over every awaiting-intake
/// contact. Idempotent by construction: the due-ness check reads the same
/// fields a successful send updates, so an immediate re-run classifies
/// everything as not due.
#[derive(Debug)]
pub struct RunReminderBatchUseCase {
    /// Classify only; send nothing, mutate nothing.
    pub dry_run: bool,
}

#[derive(Debug, PartialEq)]
pub enum ReminderOutcome {
    Sent(ReminderStage),
    Skipped,
    Error(String),
}

#[derive(Debug)]
pub struct ReminderRunReport {
    pub dry_run: bool,
    pub outcomes: Vec<(ID, ReminderOutcome)>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunReminderBatchUseCase {
    type Response = ReminderRunReport;

    type Error = UseCaseError;

    const NAME: &'static str = "RunReminderBatch";

    async fn execute(&mut self, ctx: &SageContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let normalizer = TimeZoneNormalizer::new(ctx.config.timezone);
        let contacts = ctx
            .repos
            .contacts
            .find_awaiting_intake()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut outcomes = Vec::with_capacity(contacts.len());
        for contact in contacts {
            let outcome = self
                .process_contact(contact, now, &normalizer, ctx)
                .await;
            outcomes.push(outcome);
        }

        Ok(ReminderRunReport {
            dry_run: self.dry_run,
            outcomes,
        })
    }
}

impl RunReminderBatchUseCase {
    /// Read state -> decide -> send -> write state, for one contact. An error
    /// here never aborts the rest of the batch.
    async fn process_contact(
        &self,
        mut contact: Contact,
        now: i64,
        normalizer: &TimeZoneNormalizer,
        ctx: &SageContext,
    ) -> (ID, ReminderOutcome) {
        let contact_id = contact.id.clone();
        let stage = match contact
            .reminders
            .due_stage(contact.created, now, &ctx.config.reminder_schedule)
        {
            Some(stage) => stage,
            None => return (contact_id, ReminderOutcome::Skipped),
        };
        if self.dry_run {
            return (contact_id, ReminderOutcome::Sent(stage));
        }

        let payload = reminder_payload(&contact, stage);
        if !ctx.notifier.send(&payload).await {
            // state untouched, the next run retries this contact
            return (
                contact_id,
                ReminderOutcome::Error("notification dispatch failed".into()),
            );
        }

        contact.reminders.record_sent(now);
        contact.status_label = format!("intake reminder {} sent", stage.number());
        let stamp = normalizer
            .instant_label(now)
            .unwrap_or_else(|_| now.to_string());
        contact.append_note(&format!(
            "[{}] Intake reminder #{} sent",
            stamp,
            stage.number()
        ));
        contact.updated = now;

        if let Err(e) = ctx.repos.contacts.save(&contact).await {
            // the reminder went out but the counter did not advance; the next
            // run will re-send, which we surface loudly
            error!(
                "Failed to record reminder #{} for contact {}: {:?}",
                stage.number(),
                contact_id,
                e
            );
            return (
                contact_id,
                ReminderOutcome::Error("state update failed after send".into()),
            );
        }

        let record = DashboardNotification::new(
            contact_id.clone(),
            format!(
                "Intake reminder #{} sent to {}",
                stage.number(),
                contact.full_name
            ),
            now,
        );
        if ctx.repos.notifications.insert(&record).await.is_err() {
            warn!(
                "Dashboard notification for contact {} reminder was not recorded",
                contact_id
            );
        }

        (contact_id, ReminderOutcome::Sent(stage))
    }
}

fn reminder_payload(contact: &Contact, stage: ReminderStage) -> NotificationPayload {
    let (subject, body) = match stage {
        ReminderStage::First => (
            "A quick note about your intake form",
            format!(
                "Hi {}, we noticed you have not finished your intake form yet. It only takes a few minutes and helps us prepare for your first session.",
                contact.first_name()
            ),
        ),
        ReminderStage::Second => (
            "Your intake form is still waiting",
            format!(
                "Hi {}, your intake form is still incomplete. We cannot confirm your first session until it is done. It only takes a few minutes.",
                contact.first_name()
            ),
        ),
        ReminderStage::Third => (
            "Last reminder about your intake form",
            format!(
                "Hi {}, this is our last reminder about your intake form. If you need help or have questions, just reply to this message.",
                contact.first_name()
            ),
        ),
    };

    // the final nudge goes over SMS when we have a number, everything else is
    // email
    let (channel, to) = match (stage, &contact.phone) {
        (ReminderStage::Third, Some(phone)) => (ReminderChannel::Sms, phone.clone()),
        _ => (ReminderChannel::Email, contact.email.clone()),
    };

    NotificationPayload::IntakeReminder {
        to,
        channel,
        subject: subject.into(),
        body,
    }
}
