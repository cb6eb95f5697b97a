use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::StepError;

/// Labels the T2 reservation page renders for the fields we consume.
pub mod labels {
    pub const EVENT_NAME: &str = "Event Name";
    pub const DEPARTMENT: &str = "Contact Department";
    pub const FIRST_NAME: &str = "Contact First Name";
    pub const LAST_NAME: &str = "Contact Last Name";
    pub const EMAIL: &str = "Contact E-mail";
    pub const PHONE: &str = "Contact Phone";
    pub const BEGIN_DATE: &str = "Begin Date";
    pub const END_DATE: &str = "End Date";
    pub const REQUESTED_LOT: &str = "Requested Lot";
    pub const CARS_REQUESTED: &str = "Cars Requested";
    pub const EXCEED_CARS: &str = "Exceed Car Requested Set Value";
    pub const RESERVATION_UID: &str = "Confirmation/Reservation UID";
}

const T2_DATE_FORMAT: &str = "%m/%d/%Y";

/// Free-form label/value pairs scraped from the T2 reservation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationRecord(BTreeMap<String, String>);

impl ReservationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.0.insert(label.into(), value.into());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    /// Like [`get`](Self::get) but treats blank values as absent.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.get(label).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Trimmed value, empty when the label is absent.
    pub fn text(&self, label: &str) -> &str {
        self.get(label).unwrap_or_default().trim()
    }

    pub fn require(&self, label: &'static str) -> Result<&str, StepError> {
        self.value(label).ok_or(StepError::MissingData(label))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn requested_lot(&self) -> &str {
        self.text(labels::REQUESTED_LOT)
    }

    pub fn begin_date(&self) -> Result<SlashDate, StepError> {
        SlashDate::parse(self.require(labels::BEGIN_DATE)?)
            .ok_or(StepError::MissingData(labels::BEGIN_DATE))
    }

    pub fn end_date(&self) -> Result<SlashDate, StepError> {
        SlashDate::parse(self.require(labels::END_DATE)?)
            .ok_or(StepError::MissingData(labels::END_DATE))
    }

    /// Inclusive number of days between begin and end date.
    pub fn days_reserved(&self) -> Result<i64, StepError> {
        let begin = self
            .begin_date()?
            .to_naive()
            .ok_or(StepError::MissingData(labels::BEGIN_DATE))?;
        let end = self
            .end_date()?
            .to_naive()
            .ok_or(StepError::MissingData(labels::END_DATE))?;
        Ok((end - begin).num_days() + 1)
    }
}

impl FromIterator<(String, String)> for ReservationRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A `M/D/YYYY` date kept as the segments the date pickers expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashDate {
    pub month: String,
    pub day: String,
    pub year: String,
}

impl SlashDate {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().split('/');
        let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if !(numeric(month) && numeric(day) && numeric(year)) {
            return None;
        }
        Some(Self {
            month: month.to_string(),
            day: day.to_string(),
            year: year.to_string(),
        })
    }

    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.to_string(), T2_DATE_FORMAT).ok()
    }
}

impl fmt::Display for SlashDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.month, self.day, self.year)
    }
}

/// R# and GL account joined the way finance expects them in the event form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillingCode(String);

impl BillingCode {
    pub fn new(r_number: &str, gl_account: &str) -> Self {
        Self(format!("{} & {}", r_number.trim(), gl_account.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BillingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
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
    fn splits_t2_dates_into_segments() {
        let date = SlashDate::parse("1/15/2025").unwrap();
        assert_eq!(date.month, "1");
        assert_eq!(date.day, "15");
        assert_eq!(date.year, "2025");
        assert!(SlashDate::parse("2025-01-15").is_none());
        assert!(SlashDate::parse("1/15/2025/3").is_none());
        assert!(SlashDate::parse("").is_none());
    }

    #[test]
    fn counts_days_inclusively() {
        let r = record(&[
            (labels::BEGIN_DATE, "1/30/2025"),
            (labels::END_DATE, "2/1/2025"),
        ]);
        assert_eq!(r.days_reserved().unwrap(), 3);
    }

    #[test]
    fn blank_values_are_missing() {
        let r = record(&[(labels::EVENT_NAME, "   ")]);
        assert_eq!(r.get(labels::EVENT_NAME), Some("   "));
        assert!(r.value(labels::EVENT_NAME).is_none());
        assert!(matches!(
            r.require(labels::EVENT_NAME),
            Err(StepError::MissingData(labels::EVENT_NAME))
        ));
    }

    #[test]
    fn billing_code_joins_both_halves() {
        let code = BillingCode::new(" R12345 ", "1234-56789");
        assert_eq!(code.as_str(), "R12345 & 1234-56789");
    }
}
