//! One run: T2 reservation in, Offstreet event out, T2 note denied.
//!
//! Every step runs inside its own `step` span. [`Step::policy`] decides whether a failure ends the
//! run or is logged and skipped.

use std::future::Future;
use std::path::PathBuf;

use tracing::{Instrument, error, info, info_span, warn};

use crate::config::Config;
use crate::email;
use crate::error::{StepError, StepResult};
use crate::models::credentials::StoredCredentials;
use crate::models::reservation::{BillingCode, ReservationRecord};
use crate::models::snapshot::RunSnapshot;
use crate::scraping::offstreet::Offstreet;
use crate::scraping::session::Browser;
use crate::scraping::t2::T2Portal;
use crate::scraping::wait::Waiter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Abort,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    T2Login,
    ExtractReservation,
    BillingCode,
    SaveSnapshot,
    OffstreetLogin,
    OpenCreateForm,
    EventDetails,
    Schedule,
    Location,
    Settings,
    Portal,
    Notification,
    DenyNote,
}

impl Step {
    /// Run order.
    pub const ALL: [Step; 13] = [
        Step::T2Login,
        Step::ExtractReservation,
        Step::BillingCode,
        Step::SaveSnapshot,
        Step::OffstreetLogin,
        Step::OpenCreateForm,
        Step::EventDetails,
        Step::Schedule,
        Step::Location,
        Step::Settings,
        Step::Portal,
        Step::Notification,
        Step::DenyNote,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::T2Login => "t2_login",
            Step::ExtractReservation => "extract_reservation",
            Step::BillingCode => "billing_code",
            Step::SaveSnapshot => "save_snapshot",
            Step::OffstreetLogin => "offstreet_login",
            Step::OpenCreateForm => "open_create_form",
            Step::EventDetails => "event_details",
            Step::Schedule => "schedule",
            Step::Location => "location",
            Step::Settings => "settings",
            Step::Portal => "portal",
            Step::Notification => "notification",
            Step::DenyNote => "deny_note",
        }
    }

    pub fn policy(self) -> Policy {
        match self {
            Step::SaveSnapshot | Step::Notification | Step::DenyNote => Policy::Continue,
            _ => Policy::Abort,
        }
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub record: ReservationRecord,
    pub billing_code: BillingCode,
    pub event_link: Option<String>,
    pub notification_path: Option<PathBuf>,
    pub note_denied: bool,
}

/// Runs an abort-policy step; its error ends the run.
async fn required<T, F>(step: Step, fut: F) -> StepResult<T>
where
    F: Future<Output = StepResult<T>>,
{
    debug_assert_eq!(step.policy(), Policy::Abort);
    let span = info_span!("step", name = step.name());
    let outcome = fut.instrument(span.clone()).await;
    if let Err(e) = &outcome {
        span.in_scope(|| error!(kind = ?e.kind(), "step failed, aborting run: {}", e));
    }
    outcome
}

/// Runs a continue-policy step; its error is logged and the run goes on.
async fn optional<T, F>(step: Step, fut: F) -> Option<T>
where
    F: Future<Output = StepResult<T>>,
{
    debug_assert_eq!(step.policy(), Policy::Continue);
    let span = info_span!("step", name = step.name());
    match fut.instrument(span.clone()).await {
        Ok(value) => Some(value),
        Err(e) => {
            span.in_scope(|| warn!(kind = ?e.kind(), "step failed, continuing: {}", e));
            None
        }
    }
}

pub async fn run(
    browser: &Browser,
    config: &Config,
    creds: &StoredCredentials,
) -> StepResult<RunReport> {
    let driver = browser.driver();
    let wait = Waiter::new(config.wait_timeout());
    let matcher = config.matcher();
    let reservation_url = config.reservation_url()?;
    let login_url = config.offstreet_page("login")?;
    let create_url = config.offstreet_page("events/create")?;

    let t2 = T2Portal::new(driver, wait);
    required(Step::T2Login, async {
        t2.open(&reservation_url).await?;
        t2.login(&creds.t2_username, &creds.t2_password).await
    })
    .await?;
    let record = required(Step::ExtractReservation, t2.extract_reservation()).await?;
    let billing_code = required(Step::BillingCode, t2.billing_code()).await?;

    let snapshot_path = config.snapshot_path();
    optional(Step::SaveSnapshot, async {
        let snapshot = RunSnapshot {
            t2_data: record.clone(),
            billing_code: Some(billing_code.clone()),
        };
        snapshot.save(&snapshot_path)?;
        info!("saved T2 data to {}", snapshot_path.display());
        Ok::<_, StepError>(())
    })
    .await;

    browser.open_tab().await?;
    let offstreet = Offstreet::new(driver, wait);
    required(
        Step::OffstreetLogin,
        offstreet.login(&login_url, &creds.offstreet_email, &creds.offstreet_password),
    )
    .await?;
    required(Step::OpenCreateForm, offstreet.open_create_form(&create_url)).await?;
    required(
        Step::EventDetails,
        offstreet.fill_details(&record, Some(&billing_code)),
    )
    .await?;
    required(Step::Schedule, offstreet.fill_schedule(&record)).await?;
    required(Step::Location, offstreet.choose_location(&record, &matcher)).await?;
    required(Step::Settings, offstreet.configure_settings(&record)).await?;
    required(Step::Portal, offstreet.finish_portal(&record)).await?;

    let event_link = offstreet.event_link().await;
    let notification_path = optional(Step::Notification, async {
        let mail = email::render(&record, Some(&billing_code), event_link.as_deref());
        let path = mail.write_to(&config.output_dir)?;
        mail.open_in_new_tab(driver).await?;
        info!("notification subject: {}", mail.subject);
        info!("{}", mail.summary);
        Ok::<_, StepError>(path)
    })
    .await;

    let note_denied = optional(Step::DenyNote, async {
        browser.switch_to_t2().await?;
        t2.deny_note(&reservation_url).await
    })
    .await
    .is_some();

    Ok(RunReport {
        record,
        billing_code,
        event_link,
        notification_path,
        note_denied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BusinessRule;

    #[test]
    fn only_bookkeeping_steps_may_fail() {
        let continuing: Vec<Step> = Step::ALL
            .into_iter()
            .filter(|s| s.policy() == Policy::Continue)
            .collect();
        assert_eq!(
            continuing,
            vec![Step::SaveSnapshot, Step::Notification, Step::DenyNote]
        );
    }

    #[test]
    fn t2_steps_come_first_and_deny_last() {
        assert_eq!(Step::ALL[0], Step::T2Login);
        assert_eq!(Step::ALL[2], Step::BillingCode);
        assert_eq!(Step::ALL[Step::ALL.len() - 1], Step::DenyNote);
    }

    #[test]
    fn step_names_are_unique() {
        let mut names: Vec<&str> = Step::ALL.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Step::ALL.len());
    }

    #[tokio::test]
    async fn abort_step_propagates_error() {
        let outcome: StepResult<()> = required(Step::BillingCode, async {
            Err(StepError::Business(BusinessRule::RequisitionExpired))
        })
        .await;
        assert!(matches!(
            outcome,
            Err(StepError::Business(BusinessRule::RequisitionExpired))
        ));
    }

    #[tokio::test]
    async fn continue_step_swallows_error() {
        let outcome: Option<()> = optional(Step::DenyNote, async {
            Err(StepError::Business(BusinessRule::AlreadyDenied))
        })
        .await;
        assert!(outcome.is_none());

        let saved = optional(Step::SaveSnapshot, async { Ok::<_, StepError>(7) }).await;
        assert_eq!(saved, Some(7));
    }
}
