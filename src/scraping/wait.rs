//! Predicate waits against the live page. Every wait is bounded by the configured timeout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use thirtyfour::prelude::*;
use tokio::time::sleep;

use crate::error::{StepError, StepResult};
use crate::scraping::constants::POLL_INTERVAL_MS;

#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    timeout: Duration,
    interval: Duration,
}

impl Waiter {
    pub fn new(timeout: Duration) -> Self {
        Waiter {
            timeout,
            interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// First element matching `by` once it exists.
    pub async fn present(&self, driver: &WebDriver, by: By) -> WebDriverResult<WebElement> {
        driver
            .query(by)
            .wait(self.timeout, self.interval)
            .first()
            .await
    }

    /// First element matching `by` once it is displayed and enabled.
    pub async fn clickable(&self, driver: &WebDriver, by: By) -> WebDriverResult<WebElement> {
        let elem = self.present(driver, by).await?;
        elem.wait_until()
            .wait(self.timeout, self.interval)
            .clickable()
            .await?;
        Ok(elem)
    }

    /// Polls `check` until it yields a value or the timeout passes.
    pub async fn until<T, F, Fut>(&self, what: &str, mut check: F) -> StepResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = WebDriverResult<Option<T>>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(found) = check().await? {
                return Ok(found);
            }
            if Instant::now() >= deadline {
                return Err(StepError::Timeout(what.to_string()));
            }
            sleep(self.interval).await;
        }
    }

    pub async fn url_contains(&self, driver: &WebDriver, needle: &str) -> StepResult<()> {
        self.until(&format!("url containing {needle}"), || async move {
            let url = driver.current_url().await?;
            Ok(url.as_str().contains(needle).then_some(()))
        })
        .await
    }

    /// Waits until at least `count` elements match and returns all of them.
    pub async fn at_least(
        &self,
        driver: &WebDriver,
        by: By,
        count: usize,
    ) -> StepResult<Vec<WebElement>> {
        self.until(&format!("{count} elements"), || {
            let by = by.clone();
            async move {
                let found = driver.find_all(by).await?;
                Ok((found.len() >= count).then_some(found))
            }
        })
        .await
    }
}

/// Clears the input and types `value`.
pub async fn fill(elem: &WebElement, value: &str) -> WebDriverResult<()> {
    elem.clear().await?;
    elem.send_keys(value).await
}

/// Click through JavaScript for elements that overlays keep from receiving real clicks.
pub async fn js_click(driver: &WebDriver, elem: &WebElement) -> WebDriverResult<()> {
    let args: Vec<Value> = vec![elem.to_json()?];
    driver
        .execute("arguments[0].click();", Arc::from(args))
        .await?;
    Ok(())
}

pub async fn has_class(elem: &WebElement, class: &str) -> WebDriverResult<bool> {
    let classes = elem.class_name().await?.unwrap_or_default();
    Ok(classes.split_whitespace().any(|c| c == class))
}
