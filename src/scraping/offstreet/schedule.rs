use thirtyfour::prelude::*;
use tracing::info;

use super::Offstreet;
use crate::error::StepResult;
use crate::models::reservation::{ReservationRecord, SlashDate};
use crate::scraping::constants::*;
use crate::scraping::wait::js_click;

/// Hour, minute and day period as typed into the time picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: &'static str,
    pub minute: &'static str,
    pub period: &'static str,
}

pub const START_TIME: ClockTime = ClockTime {
    hour: "06",
    minute: "00",
    period: "AM",
};

pub const END_TIME: ClockTime = ClockTime {
    hour: "11",
    minute: "59",
    period: "PM",
};

/// CSS for one segment (`month`, `day`, `year`) of a labelled date picker.
pub fn date_segment_css(segment: &str, picker_label: &str) -> String {
    format!("div[data-segment-type='{segment}'][aria-label='{segment}, {picker_label}']")
}

impl Offstreet<'_> {
    /// Page 2: the reservation's dates, all-day from 6:00 AM to 11:59 PM.
    pub async fn fill_schedule(&self, record: &ReservationRecord) -> StepResult<()> {
        let start = record.begin_date()?;
        let end = record.end_date()?;
        info!("filling dates {} - {}", start, end);

        self.fill_date(START_DATE_LABEL, &start).await?;
        self.fill_date(END_DATE_LABEL, &end).await?;

        info!("setting start time to 6:00 AM");
        self.fill_time(START_TIME_ID, START_TIME).await?;
        info!("setting end time to 11:59 PM");
        self.fill_time(END_TIME_ID, END_TIME).await?;

        self.click_continue().await?;
        info!("schedule submitted");
        Ok(())
    }

    async fn fill_date(&self, picker_label: &str, date: &SlashDate) -> StepResult<()> {
        for (segment, value) in [
            ("month", date.month.as_str()),
            ("day", date.day.as_str()),
            ("year", date.year.as_str()),
        ] {
            let css = date_segment_css(segment, picker_label);
            self.wait
                .present(self.driver, By::Css(&css))
                .await?
                .send_keys(value)
                .await?;
        }
        Ok(())
    }

    async fn fill_time(&self, container_id: &str, time: ClockTime) -> StepResult<()> {
        let container = self.wait.present(self.driver, By::Id(container_id)).await?;
        for (segment, value) in [
            ("hour", time.hour),
            ("minute", time.minute),
            ("dayPeriod", time.period),
        ] {
            let elem = container
                .find(By::Css(&format!("div[data-segment-type='{segment}']")))
                .await?;
            js_click(self.driver, &elem).await?;
            elem.send_keys(value).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_segment_selectors() {
        assert_eq!(
            date_segment_css("month", START_DATE_LABEL),
            "div[data-segment-type='month'][aria-label='month, Start Date']"
        );
        assert_eq!(
            date_segment_css("year", END_DATE_LABEL),
            "div[data-segment-type='year'][aria-label='year, Expiry Date']"
        );
    }

    #[test]
    fn event_spans_the_whole_day() {
        assert_eq!((START_TIME.hour, START_TIME.period), ("06", "AM"));
        assert_eq!((END_TIME.hour, END_TIME.minute, END_TIME.period), ("11", "59", "PM"));
    }
}
