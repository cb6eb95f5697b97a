use thirtyfour::prelude::*;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{BusinessRule, StepError, StepResult};
use crate::models::reservation::{BillingCode, ReservationRecord};
use crate::parse;
use crate::scraping::constants::*;
use crate::scraping::wait::{Waiter, fill};

/// The T2 reservation portal, driven through the tab that owns it.
pub struct T2Portal<'a> {
    driver: &'a WebDriver,
    wait: Waiter,
}

impl<'a> T2Portal<'a> {
    pub fn new(driver: &'a WebDriver, wait: Waiter) -> Self {
        T2Portal { driver, wait }
    }

    pub async fn open(&self, reservation_url: &Url) -> StepResult<()> {
        info!("navigating to {}", reservation_url);
        self.driver.goto(reservation_url.as_str()).await?;
        Ok(())
    }

    /// Signs in from the login form T2 puts in front of the reservation page.
    pub async fn login(&self, username: &str, password: &str) -> StepResult<()> {
        info!("logging into T2");
        let user = self.wait.present(self.driver, By::Id(T2_USER_ID)).await?;
        let pass = self.wait.present(self.driver, By::Id(T2_PASSWORD_ID)).await?;
        fill(&user, username).await?;
        fill(&pass, password).await?;

        self.wait
            .clickable(self.driver, By::Id(T2_LOGIN_BUTTON_ID))
            .await?
            .click()
            .await?;

        self.wait
            .present(self.driver, By::ClassName(T2_FORM_ROW_CLASS))
            .await
            .map_err(|_| StepError::Timeout("reservation form after T2 login".into()))?;
        info!("T2 login successful");
        Ok(())
    }

    pub async fn extract_reservation(&self) -> StepResult<ReservationRecord> {
        info!("extracting T2 data");
        self.wait
            .present(self.driver, By::ClassName(T2_FORM_ROW_CLASS))
            .await?;
        let html = self.driver.source().await?;
        let record = parse::reservation_from_html(&html);
        if record.is_empty() {
            return Err(StepError::MissingData("reservation fields"));
        }
        info!("extracted {} reservation fields", record.len());
        Ok(record)
    }

    /// R# from the reservation page, GL account from the linked requisition.
    ///
    /// Leaves the tab on the requisition page.
    pub async fn billing_code(&self) -> StepResult<BillingCode> {
        info!("getting billing code");
        let r_number = self
            .label_text(By::Id(T2_R_NUMBER_ID))
            .await?
            .ok_or(StepError::MissingData("R#"))?;
        debug!("found R number: {}", r_number);

        let link = self
            .wait
            .clickable(self.driver, By::Id(T2_REQUISITION_LINK_ID))
            .await?;
        debug!("following requisition link {:?}", link.text().await.unwrap_or_default());
        link.click().await?;

        let body = self.wait.present(self.driver, By::Tag("body")).await?;
        if body
            .text()
            .await?
            .to_lowercase()
            .contains(T2_EXPIRED_TEXT)
        {
            return Err(StepError::Business(BusinessRule::RequisitionExpired));
        }

        let gl_account = self
            .label_text(By::Id(T2_GL_ACCOUNT_ID))
            .await?
            .ok_or(StepError::MissingData("GL Account"))?;
        debug!("found GL account: {}", gl_account);

        let code = BillingCode::new(&r_number, &gl_account);
        info!("billing code: {}", code);
        Ok(code)
    }

    /// Denies the reservation's note now that the event lives in Offstreet.
    pub async fn deny_note(&self, reservation_url: &Url) -> StepResult<()> {
        self.open(reservation_url).await?;
        self.wait
            .present(self.driver, By::ClassName(T2_FORM_ROW_CLASS))
            .await?;

        if self.note_denied().await? {
            return Err(StepError::Business(BusinessRule::AlreadyDenied));
        }

        info!("denying reservation note");
        self.wait
            .clickable(self.driver, By::Css(T2_DENY_BUTTON_CSS))
            .await?
            .click()
            .await?;
        if let Err(e) = self.driver.accept_alert().await {
            debug!("no confirmation dialog after deny: {:?}", e);
        }

        self.wait
            .until("note status to read denied", || async move {
                self.note_denied().await.map(|denied| denied.then_some(()))
            })
            .await?;
        info!("reservation note denied");
        Ok(())
    }

    async fn note_denied(&self) -> WebDriverResult<bool> {
        let status = self.driver.find(By::Css(T2_NOTE_STATUS_CSS)).await?;
        let text = status.text().await?;
        Ok(text.to_lowercase().contains(T2_DENIED_TEXT))
    }

    async fn label_text(&self, by: By) -> StepResult<Option<String>> {
        let elem = self.wait.present(self.driver, by).await?;
        let text = elem.text().await?.trim().to_string();
        if text.is_empty() {
            warn!("label was present but empty");
            return Ok(None);
        }
        Ok(Some(text))
    }
}
