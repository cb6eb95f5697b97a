use thirtyfour::prelude::*;
use thirtyfour::WindowHandle;
use tracing::{error, info};

use crate::config::Config;
use crate::scraping::constants::*;

/// The single browser session of a run. T2 stays in the first tab, Offstreet gets its own.
pub struct Browser {
    driver: WebDriver,
    t2_window: WindowHandle,
}

impl Browser {
    pub async fn connect(config: &Config) -> WebDriverResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.set_headless()?;
        }
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg("--disable-extensions")?;
        caps.add_arg("--disable-notifications")?;
        caps.add_arg("--disable-default-apps")?;
        caps.add_arg("--no-first-run")?;
        caps.add_arg("--disable-features=Translate")?;

        info!("connecting to webdriver at {}", config.webdriver_url);
        let driver = WebDriver::new(config.webdriver_url.as_str(), caps).await?;
        driver
            .set_window_rect(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT)
            .await?;
        let t2_window = driver.window().await?;

        Ok(Browser { driver, t2_window })
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// Opens a blank tab and makes it current.
    pub async fn open_tab(&self) -> WebDriverResult<WindowHandle> {
        let handle = self.driver.new_tab().await?;
        self.driver.switch_to_window(handle.clone()).await?;
        Ok(handle)
    }

    pub async fn switch_to_t2(&self) -> WebDriverResult<()> {
        self.driver.switch_to_window(self.t2_window.clone()).await
    }

    pub async fn quit(self) {
        info!("quitting browser session");
        if let Err(e) = self.driver.quit().await {
            error!("failed to quit browser cleanly: {:?}", e);
        }
    }
}
