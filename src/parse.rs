use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::models::candidate::CandidateOption;
use crate::models::reservation::ReservationRecord;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css}: {e:?}"))
}

static FORM_ROW: Lazy<Selector> = Lazy::new(|| selector(".T2FormRow"));
static READONLY_LABEL: Lazy<Selector> = Lazy::new(|| selector(".T2FormLabelReadOnly span"));
static REQUIRED_LABEL: Lazy<Selector> = Lazy::new(|| selector(".T2FormLabelRequired span"));
static CONTROL_CELL: Lazy<Selector> = Lazy::new(|| selector(".T2FormControlCell"));
static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));
static EVENT_LINK: Lazy<Selector> =
    Lazy::new(|| selector(r#"a[href^="https://www.offstreet.io/events/"]"#));
static OPTION: Lazy<Selector> = Lazy::new(|| selector("option"));

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Reads every label/value row of a T2 reservation page.
pub fn reservation_from_html(html: &str) -> ReservationRecord {
    let doc = Html::parse_document(html);
    let mut record = ReservationRecord::new();

    for row in doc.select(&FORM_ROW) {
        let label = row
            .select(&READONLY_LABEL)
            .next()
            .or_else(|| row.select(&REQUIRED_LABEL).next())
            .map(text_of);
        let Some(label) = label.filter(|l| !l.is_empty()) else {
            continue;
        };

        let value = row
            .select(&CONTROL_CELL)
            .next()
            .and_then(|cell| {
                cell.select(&SPAN)
                    .next()
                    .or_else(|| cell.select(&ANCHOR).next())
            })
            .map(text_of)
            .unwrap_or_default();

        tracing::debug!("found field: {} = {}", label, value);
        record.insert(label, value);
    }

    record
}

/// Public registration link of the event Offstreet just created.
pub fn event_link(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    doc.select(&EVENT_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

/// Options of the `<select>` matched by `select_css` that carry a value.
pub fn select_candidates(html: &str, select_css: &str) -> Vec<CandidateOption> {
    let Ok(select) = Selector::parse(select_css) else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);
    let Some(element) = doc.select(&select).next() else {
        return Vec::new();
    };

    element
        .select(&OPTION)
        .filter_map(|opt| {
            let value = opt.value().attr("value")?.trim();
            if value.is_empty() {
                return None;
            }
            Some(CandidateOption::new(text_of(opt), value))
        })
        .collect()
}
