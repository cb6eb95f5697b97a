use std::time::Instant;

use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::Offstreet;
use crate::error::{StepError, StepResult};
use crate::matcher::LotMatcher;
use crate::models::candidate::CandidateOption;
use crate::models::reservation::{ReservationRecord, labels};
use crate::parse;
use crate::scraping::constants::*;
use crate::scraping::wait::fill;

/// The search table is already narrowed by the full name, so rows are scored on its first word.
pub fn search_term(requested: &str) -> &str {
    requested.split_whitespace().next().unwrap_or_default()
}

fn row_labels(rows: &[(WebElement, String)]) -> Vec<String> {
    rows.iter().map(|(_, label)| label.clone()).collect()
}

/// Candidates for the search table. The id is the row's position in the same read.
pub fn row_candidates(labels: &[String]) -> Vec<CandidateOption> {
    labels
        .iter()
        .enumerate()
        .map(|(idx, label)| CandidateOption::new(label.as_str(), idx.to_string()))
        .collect()
}

/// The search has taken effect once the table is non-empty, unchanged since the last poll, and
/// either differs from the pre-search table or holds only rows naming the term.
pub fn search_settled(
    before: &[String],
    previous: Option<&[String]>,
    current: &[String],
    term: &str,
) -> bool {
    if current.is_empty() || previous != Some(current) {
        return false;
    }
    let term = term.to_lowercase();
    current != before || current.iter().all(|label| label.to_lowercase().contains(&term))
}

fn log_top_matches(matcher: &LotMatcher, requested: &str, candidates: &[CandidateOption]) {
    for (i, (candidate, score)) in matcher.rank(requested, candidates).iter().take(3).enumerate() {
        info!("{}. {:30} | score: {:2}", i + 1, candidate.label, score);
    }
}

impl Offstreet<'_> {
    /// Page 3. Tries the "Add Locations" search first and falls back to the plain dropdown once.
    pub async fn choose_location(
        &self,
        record: &ReservationRecord,
        matcher: &LotMatcher,
    ) -> StepResult<()> {
        let requested = record.requested_lot();
        info!("requested parking lot: {}", requested);

        if let Err(e) = self.pick_from_search(requested, matcher).await {
            warn!("location search failed ({}), using the location dropdown", e);
            self.pick_from_dropdown(requested, matcher).await?;
        }

        self.click_continue().await?;
        info!("location submitted");
        Ok(())
    }

    async fn pick_from_search(&self, requested: &str, matcher: &LotMatcher) -> StepResult<()> {
        if requested.is_empty() {
            return Err(StepError::MissingData(labels::REQUESTED_LOT));
        }

        self.wait
            .clickable(self.driver, By::XPath(ADD_LOCATIONS_XPATH))
            .await?
            .click()
            .await?;

        let search = self
            .wait
            .clickable(self.driver, By::Css(LOCATION_SEARCH_CSS))
            .await?;
        let before = row_labels(&self.read_rows().await.unwrap_or_default());
        fill(&search, requested).await?;
        debug!("entered '{}' in location search", requested);

        let term = search_term(requested);
        let rows = self.settled_rows(&before, term).await?;
        let candidates = row_candidates(&row_labels(&rows));
        info!("found {} rows in search results", candidates.len());

        log_top_matches(matcher, term, &candidates);
        let best = matcher
            .best_match(term, &candidates)
            .ok_or(StepError::MissingData("location search results"))?;

        let (row, _) = best
            .id
            .parse::<usize>()
            .ok()
            .and_then(|idx| rows.get(idx))
            .ok_or(StepError::MissingData("location search results"))?;
        row.find(By::Css(ROW_CHECKBOX_CSS)).await?.click().await?;
        info!("selected best match: {}", best.label);

        match self
            .wait
            .clickable(self.driver, By::XPath(CHOOSE_XPATH))
            .await
        {
            Ok(choose) => choose.click().await?,
            Err(e) => warn!("no Choose button, continuing anyway: {}", e),
        }
        Ok(())
    }

    /// Each result row with its location label, read from the row element itself.
    async fn read_rows(&self) -> WebDriverResult<Vec<(WebElement, String)>> {
        let mut rows = Vec::new();
        for row in self.driver.find_all(By::Css(RESULT_ROWS_CSS)).await? {
            let Ok(cell) = row.find(By::Css(LOCATION_CELL_CSS)).await else {
                continue;
            };
            let label = cell.text().await?.trim().to_string();
            rows.push((row, label));
        }
        Ok(rows)
    }

    /// Polls the result table until the typed search has been applied and two reads agree.
    async fn settled_rows(
        &self,
        before: &[String],
        term: &str,
    ) -> StepResult<Vec<(WebElement, String)>> {
        let deadline = Instant::now() + self.wait.timeout();
        let mut previous: Option<Vec<String>> = None;
        loop {
            match self.read_rows().await {
                Ok(rows) => {
                    let labels = row_labels(&rows);
                    if search_settled(before, previous.as_deref(), &labels, term) {
                        return Ok(rows);
                    }
                    previous = Some(labels);
                }
                Err(e) => {
                    debug!("result table changed while reading: {:?}", e);
                    previous = None;
                }
            }
            if Instant::now() >= deadline {
                return Err(StepError::Timeout("filtered location search results".into()));
            }
            sleep(self.wait.interval()).await;
        }
    }

    async fn pick_from_dropdown(&self, requested: &str, matcher: &LotMatcher) -> StepResult<()> {
        let select = self
            .wait
            .clickable(self.driver, By::Css(LOCATION_SELECT_CSS))
            .await?;
        let candidates =
            parse::select_candidates(&self.page_source().await?, LOCATION_SELECT_CSS);
        info!("found {} available parking locations", candidates.len());

        log_top_matches(matcher, requested, &candidates);
        let best = matcher
            .best_match(requested, &candidates)
            .ok_or(StepError::MissingData("location options"))?;

        SelectElement::new(&select)
            .await?
            .select_by_value(&best.id)
            .await?;
        info!("selected location {} ({})", best.label, best.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_term_is_first_word() {
        assert_eq!(search_term("Biggy Structure Lot B"), "Biggy");
        assert_eq!(search_term("  San Pablo"), "San");
        assert_eq!(search_term(""), "");
    }

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn candidates_index_into_the_same_read() {
        let read = labels(&["BUILDING B", "P8 - BIGGY STRUCTURE"]);
        let candidates = row_candidates(&read);
        assert_eq!(candidates[1], CandidateOption::new("P8 - BIGGY STRUCTURE", "1"));
        let best = LotMatcher::default().best_match("Biggy", &candidates).unwrap();
        assert_eq!(read[best.id.parse::<usize>().unwrap()], best.label);
    }

    #[test]
    fn unfiltered_table_is_not_settled() {
        let before = labels(&["BUILDING B", "P8 - BIGGY STRUCTURE", "PSA - SAN PABLO"]);
        assert!(!search_settled(&before, Some(&before), &before, "Biggy"));
        assert!(!search_settled(&before, None, &before, "Biggy"));
    }

    #[test]
    fn filtered_table_settles_after_two_equal_reads() {
        let before = labels(&["BUILDING B", "LOT 71", "P8 - BIGGY STRUCTURE"]);
        let filtered = labels(&["P8 - BIGGY STRUCTURE"]);
        assert!(!search_settled(&before, Some(&before), &filtered, "Biggy"));
        assert!(search_settled(&before, Some(&filtered), &filtered, "Biggy"));
        assert!(!search_settled(&before, Some(&filtered), &[], "Biggy"));
    }

    #[test]
    fn table_already_narrowed_to_the_term_counts_as_settled() {
        let only = labels(&["P8 - BIGGY STRUCTURE"]);
        assert!(search_settled(&only, Some(&only), &only, "biggy"));
    }
}
