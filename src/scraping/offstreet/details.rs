use once_cell::sync::Lazy;
use regex::Regex;
use thirtyfour::prelude::*;
use tracing::{debug, error, info, warn};

use super::Offstreet;
use crate::error::StepResult;
use crate::models::reservation::{BillingCode, ReservationRecord, labels};
use crate::scraping::constants::*;
use crate::scraping::wait::fill;

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").unwrap());

/// `+1 (AAA) BBB-CCCC` for ten-digit numbers, anything else unchanged.
pub fn format_phone(raw: &str) -> String {
    let digits = NON_DIGIT.replace_all(raw, "");
    if digits.len() == 10 {
        format!("+1 ({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        raw.to_string()
    }
}

enum Source {
    Field(&'static str),
    Phone,
    BillingCode,
}

const DETAIL_FIELDS: &[(&str, &str, Source)] = &[
    ("event", EVENT_NAME_CSS, Source::Field(labels::EVENT_NAME)),
    ("host", HOST_CSS, Source::Field(labels::DEPARTMENT)),
    ("firstName", CONTACT_FIRST_CSS, Source::Field(labels::FIRST_NAME)),
    ("lastName", CONTACT_LAST_CSS, Source::Field(labels::LAST_NAME)),
    ("email", CONTACT_EMAIL_CSS, Source::Field(labels::EMAIL)),
    ("phoneNumber", CONTACT_PHONE_CSS, Source::Phone),
    ("billingCode", BILLING_CODE_CSS, Source::BillingCode),
];

/// `(field, selector, value)` for every input on the details page.
pub fn detail_values(
    record: &ReservationRecord,
    billing_code: Option<&BillingCode>,
) -> Vec<(&'static str, &'static str, Option<String>)> {
    DETAIL_FIELDS
        .iter()
        .map(|(name, css, source)| {
            let value = match source {
                Source::Field(label) => record.value(label).map(str::to_string),
                Source::Phone => record.value(labels::PHONE).map(format_phone),
                Source::BillingCode => billing_code.map(|c| c.as_str().to_string()),
            };
            (*name, *css, value)
        })
        .collect()
}

impl Offstreet<'_> {
    /// Page 1. A field that cannot be filled is logged and skipped.
    pub async fn fill_details(
        &self,
        record: &ReservationRecord,
        billing_code: Option<&BillingCode>,
    ) -> StepResult<()> {
        info!("filling event details");
        for (name, css, value) in detail_values(record, billing_code) {
            let Some(value) = value else {
                warn!("no value found for field: {}", name);
                continue;
            };
            match self.fill_input(css, &value).await {
                Ok(()) => debug!("field {} filled with {}", name, value),
                Err(e) => error!("error filling field {}: {}", name, e),
            }
        }

        self.click_continue().await?;
        info!("event details submitted");
        Ok(())
    }

    async fn fill_input(&self, css: &str, value: &str) -> StepResult<()> {
        let elem = self.wait.clickable(self.driver, By::Css(css)).await?;
        fill(&elem, value).await?;
        Ok(())
    }
}
