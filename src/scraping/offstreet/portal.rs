use std::sync::Arc;

use serde_json::Value;
use thirtyfour::prelude::*;
use tracing::{debug, error, info, warn};

use super::Offstreet;
use crate::error::StepResult;
use crate::models::reservation::ReservationRecord;
use crate::parse;
use crate::scraping::constants::*;
use crate::scraping::wait::{fill, has_class, js_click};

pub fn instructions_text(requested_lot: &str) -> String {
    let lot = if requested_lot.is_empty() {
        "Structure"
    } else {
        requested_lot
    };
    format!(
        "Parking is now digital in the {lot}. Please ensure to register your vehicle upon parking in any unmarked space."
    )
}

fn branding_checkbox_xpath(file_name: &str) -> String {
    format!("//tr[contains(@aria-label, '{file_name}')][1]//span[@role='checkbox']")
}

impl Offstreet<'_> {
    /// Page 5: branding and parker instructions, then create the event.
    ///
    /// Only the final "Create Event" click is allowed to fail the page.
    pub async fn finish_portal(&self, record: &ReservationRecord) -> StepResult<()> {
        info!("configuring portal settings");
        if let Err(e) = self.enable_branding().await {
            error!("error enabling branding: {}", e);
        }
        if let Err(e) = self.add_instructions(record).await {
            error!("error adding instructions: {}", e);
        }
        self.create_event().await
    }

    async fn enable_branding(&self) -> StepResult<()> {
        let toggle = self
            .wait
            .clickable(self.driver, By::Id(BRANDING_TOGGLE_ID))
            .await?;
        if has_class(&toggle, PRIMARY_CLASS).await? {
            info!("branding was already enabled");
            return Ok(());
        }
        toggle.click().await?;
        info!("branding enabled");
        self.select_branding_image().await
    }

    async fn select_branding_image(&self) -> StepResult<()> {
        self.wait
            .clickable(self.driver, By::XPath(ADD_PREVIOUS_FILES_XPATH))
            .await?
            .click()
            .await?;

        let search = self
            .wait
            .clickable(self.driver, By::Css(FILE_SEARCH_CSS))
            .await?;
        fill(&search, BRANDING_IMAGE).await?;

        self.wait
            .clickable(self.driver, By::XPath(&branding_checkbox_xpath(BRANDING_IMAGE)))
            .await?
            .click()
            .await?;
        debug!("selected {}", BRANDING_IMAGE);

        for (label, xpath) in [("Next", NEXT_XPATH), ("Save", SAVE_XPATH)] {
            self.wait
                .clickable(self.driver, By::XPath(xpath))
                .await?
                .click()
                .await?;
            debug!("clicked {}", label);
        }
        Ok(())
    }

    async fn add_instructions(&self, record: &ReservationRecord) -> StepResult<()> {
        info!("adding instructions");
        self.wait.present(self.driver, By::Tag("form")).await?;

        let toggle = self
            .wait
            .clickable(self.driver, By::Id(INSTRUCTIONS_TOGGLE_ID))
            .await?;
        if !has_class(&toggle, PRIMARY_CLASS).await? {
            toggle.scroll_into_view().await?;
            toggle.click().await?;
        }

        let text = instructions_text(record.requested_lot());
        let editors = self
            .wait
            .at_least(self.driver, By::ClassName(EDITOR_CLASS), 2)
            .await?;

        for (idx, editor) in editors.iter().take(2).enumerate() {
            editor.scroll_into_view().await?;
            if let Err(e) = self.write_editor(editor, &text).await {
                warn!("script injection failed for field #{} ({:?}), typing instead", idx + 1, e);
                editor.click().await?;
                editor.send_keys(text.as_str()).await?;
            }
            info!("instructions written into field #{}", idx + 1);
        }
        Ok(())
    }

    async fn write_editor(&self, editor: &WebElement, text: &str) -> WebDriverResult<()> {
        js_click(self.driver, editor).await?;
        let args: Vec<Value> = vec![editor.to_json()?, Value::String(text.to_string())];
        self.driver
            .execute("arguments[0].innerHTML = '';arguments[0].innerText = arguments[1];", Arc::from(args))
            .await?;
        Ok(())
    }

    async fn create_event(&self) -> StepResult<()> {
        info!("creating event");
        let button = self
            .wait
            .present(self.driver, By::XPath(CREATE_EVENT_XPATH))
            .await?;
        button.scroll_into_view().await?;
        button
            .wait_until()
            .wait(self.wait.timeout(), self.wait.interval())
            .clickable()
            .await?;
        button.click().await?;
        info!("event created");
        Ok(())
    }

    /// Registration link of the created event, once the confirmation page shows it.
    pub async fn event_link(&self) -> Option<String> {
        let found = self
            .wait
            .until("event link", || async move {
                let html = self.driver.source().await?;
                Ok(parse::event_link(&html))
            })
            .await;
        match found {
            Ok(link) => {
                info!("found event link: {}", link);
                Some(link)
            }
            Err(e) => {
                warn!("event link not found: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_name_the_lot() {
        assert_eq!(
            instructions_text("Biggy Structure"),
            "Parking is now digital in the Biggy Structure. Please ensure to register your vehicle upon parking in any unmarked space."
        );
        assert!(instructions_text("").contains("in the Structure."));
    }

    #[test]
    fn checkbox_xpath_targets_named_file() {
        assert_eq!(
            branding_checkbox_xpath("transport.png"),
            "//tr[contains(@aria-label, 'transport.png')][1]//span[@role='checkbox']"
        );
    }
}
