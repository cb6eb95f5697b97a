use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::StepError;
use crate::models::reservation::{BillingCode, ReservationRecord};

/// What a run persists after scraping T2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub t2_data: ReservationRecord,
    pub billing_code: Option<BillingCode>,
}

impl RunSnapshot {
    pub fn save(&self, path: &Path) -> Result<(), StepError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, StepError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
