use thirtyfour::prelude::*;
use tracing::{debug, error, info, warn};

use super::Offstreet;
use crate::error::StepResult;
use crate::models::reservation::{ReservationRecord, labels};
use crate::scraping::constants::*;
use crate::scraping::wait::fill;

pub const DAILY_RATE: f64 = 20.50;

/// Daily rate times the inclusive number of reserved days.
pub fn parking_rate(record: &ReservationRecord) -> f64 {
    match record.days_reserved() {
        Ok(days) if days > 0 => days as f64 * DAILY_RATE,
        Ok(days) => {
            warn!("reservation spans {} days, using the daily rate", days);
            DAILY_RATE
        }
        Err(e) => {
            warn!("cannot compute rate ({}), using the daily rate", e);
            DAILY_RATE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    AdditionalInfo,
    Code,
    Rate,
    MaxParkers,
}

impl Toggle {
    pub fn id(self) -> &'static str {
        match self {
            Toggle::AdditionalInfo => TOGGLE_ADDITIONAL_INFO,
            Toggle::Code => TOGGLE_CODE,
            Toggle::Rate => TOGGLE_RATE,
            Toggle::MaxParkers => TOGGLE_MAX_PARKERS,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Toggle::AdditionalInfo => "Collect Additional Information",
            Toggle::Code => "Require a Code",
            Toggle::Rate => "Add Rate",
            Toggle::MaxParkers => "Set Max Number of Parkers",
        }
    }
}

/// Toggles to switch on, in page order. The parker cap only applies when T2 does not allow
/// exceeding the requested car count.
pub fn settings_plan(record: &ReservationRecord) -> Vec<Toggle> {
    let mut plan = vec![Toggle::AdditionalInfo, Toggle::Code, Toggle::Rate];
    if record.value(labels::EXCEED_CARS).unwrap_or("No") == "No" {
        plan.push(Toggle::MaxParkers);
    }
    plan
}

impl Offstreet<'_> {
    /// Page 4. A sub-setting that fails is logged and the rest still run.
    pub async fn configure_settings(&self, record: &ReservationRecord) -> StepResult<()> {
        info!("configuring event settings");
        for toggle in settings_plan(record) {
            info!("configuring setting: {}", toggle.title());
            self.wait
                .clickable(self.driver, By::Id(toggle.id()))
                .await?
                .click()
                .await?;

            let outcome = match toggle {
                Toggle::AdditionalInfo => self.configure_additional_info().await,
                Toggle::Code => self.configure_code(record).await,
                Toggle::Rate => self.configure_rate(record).await,
                Toggle::MaxParkers => self.configure_max_parkers(record).await,
            };
            if let Err(e) = outcome {
                error!("error configuring {}: {}", toggle.title(), e);
            }
        }

        self.click_continue().await?;
        info!("event settings submitted");
        Ok(())
    }

    async fn configure_additional_info(&self) -> StepResult<()> {
        let first = self
            .wait
            .present(self.driver, By::Css(FIELD_NAME_CSS))
            .await?;
        fill(&first, "First Name").await?;
        self.wait
            .clickable(self.driver, By::Id("additionalInfo.0.isRequired"))
            .await?
            .click()
            .await?;
        debug!("first name field configured and required");

        self.wait
            .clickable(self.driver, By::XPath(ADD_FIELD_XPATH))
            .await?
            .click()
            .await?;
        let inputs = self
            .wait
            .at_least(self.driver, By::Css(FIELD_NAME_CSS), 2)
            .await?;
        if let Some(last) = inputs.last() {
            fill(last, "Last Name").await?;
        }
        self.wait
            .clickable(self.driver, By::Id("additionalInfo.1.isRequired"))
            .await?
            .click()
            .await?;
        debug!("last name field configured and required");
        Ok(())
    }

    async fn configure_code(&self, record: &ReservationRecord) -> StepResult<()> {
        match self
            .wait
            .clickable(self.driver, By::XPath(SAME_CODE_XPATH))
            .await
        {
            Ok(option) => option.click().await?,
            Err(_) => debug!("same code option already selected"),
        }

        let code = record.text(labels::RESERVATION_UID);
        let input = self.wait.present(self.driver, By::Id(SAME_CODE_ID)).await?;
        fill(&input, code).await?;
        info!("access code set to: {}", code);
        Ok(())
    }

    async fn configure_rate(&self, record: &ReservationRecord) -> StepResult<()> {
        let rate = format!("{:.2}", parking_rate(record));
        let input = self
            .wait
            .present(self.driver, By::Css(RATE_INPUT_CSS))
            .await?;
        fill(&input, &rate).await?;
        info!("rate configured: ${}", rate);
        Ok(())
    }

    async fn configure_max_parkers(&self, record: &ReservationRecord) -> StepResult<()> {
        let cars = record.value(labels::CARS_REQUESTED).unwrap_or("1");
        let input = self
            .wait
            .present(self.driver, By::Css(MAX_PARKERS_CSS))
            .await?;
        fill(&input, cars).await?;
        info!("maximum parkers set to: {}", cars);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> ReservationRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn rate_scales_with_inclusive_days() {
        let r = record(&[
            (labels::BEGIN_DATE, "4/1/2025"),
            (labels::END_DATE, "4/3/2025"),
        ]);
        assert_eq!(parking_rate(&r), 61.5);
        let single = record(&[
            (labels::BEGIN_DATE, "4/1/2025"),
            (labels::END_DATE, "4/1/2025"),
        ]);
        assert_eq!(parking_rate(&single), DAILY_RATE);
    }

    #[test]
    fn unusable_dates_fall_back_to_daily_rate() {
        assert_eq!(parking_rate(&record(&[])), DAILY_RATE);
        let reversed = record(&[
            (labels::BEGIN_DATE, "4/5/2025"),
            (labels::END_DATE, "4/1/2025"),
        ]);
        assert_eq!(parking_rate(&reversed), DAILY_RATE);
    }

    #[test]
    fn parker_cap_only_when_not_exceedable() {
        let capped = settings_plan(&record(&[(labels::EXCEED_CARS, "No")]));
        assert_eq!(capped.last(), Some(&Toggle::MaxParkers));

        let defaulted = settings_plan(&record(&[]));
        assert!(defaulted.contains(&Toggle::MaxParkers));

        let open = settings_plan(&record(&[(labels::EXCEED_CARS, "Yes")]));
        assert_eq!(open, vec![Toggle::AdditionalInfo, Toggle::Code, Toggle::Rate]);
    }
}
