//! Offstreet dashboard: login plus the five pages of the event-creation wizard.
//!
//! Each page lives in its own module as an `impl` block on [`Offstreet`].

pub mod details;
pub mod locations;
pub mod portal;
pub mod schedule;
pub mod settings;

use thirtyfour::prelude::*;
use tracing::{debug, info};
use url::Url;

use crate::error::StepResult;
use crate::scraping::constants::*;
use crate::scraping::wait::{Waiter, fill};

pub struct Offstreet<'a> {
    driver: &'a WebDriver,
    wait: Waiter,
}

impl<'a> Offstreet<'a> {
    pub fn new(driver: &'a WebDriver, wait: Waiter) -> Self {
        Offstreet { driver, wait }
    }

    pub async fn login(&self, login_url: &Url, email: &str, password: &str) -> StepResult<()> {
        info!("logging into Offstreet");
        self.driver.goto(login_url.as_str()).await?;

        let email_field = self
            .wait
            .present(self.driver, By::Id(OFFSTREET_EMAIL_ID))
            .await?;
        let password_field = self
            .wait
            .present(self.driver, By::Id(OFFSTREET_PASSWORD_ID))
            .await?;
        fill(&email_field, email).await?;
        fill(&password_field, password).await?;

        self.wait
            .clickable(self.driver, By::Id(OFFSTREET_LOGIN_ID))
            .await?
            .click()
            .await?;

        debug!("waiting for dashboard");
        self.wait
            .url_contains(self.driver, OFFSTREET_DASHBOARD_PATH)
            .await?;
        info!("Offstreet login successful");
        Ok(())
    }

    pub async fn open_create_form(&self, create_url: &Url) -> StepResult<()> {
        info!("navigating to {}", create_url);
        self.driver.goto(create_url.as_str()).await?;
        self.wait
            .url_contains(self.driver, OFFSTREET_CREATE_PATH)
            .await?;
        self.wait.present(self.driver, By::Tag("form")).await?;
        info!("event create form is ready");
        Ok(())
    }

    /// Submits the current wizard page.
    pub async fn click_continue(&self) -> StepResult<()> {
        self.wait
            .clickable(self.driver, By::Css(SUBMIT_BUTTON_CSS))
            .await?
            .click()
            .await?;
        debug!("continue clicked");
        Ok(())
    }

    pub async fn page_source(&self) -> StepResult<String> {
        Ok(self.driver.source().await?)
    }
}
