use t2_offstreet::email;
use t2_offstreet::matcher::LotMatcher;
use t2_offstreet::models::candidate::CandidateOption;
use t2_offstreet::models::reservation::{BillingCode, labels};
use t2_offstreet::parse;
use t2_offstreet::scraping::offstreet::locations::{row_candidates, search_term};
use t2_offstreet::scraping::offstreet::settings::{Toggle, parking_rate, settings_plan};

const T2_PAGE: &str = r#"
<table>
  <tr class="T2FormRow">
    <td class="T2FormLabelReadOnly"><span>Event Name</span></td>
    <td class="T2FormControlCell"><span>Spring Career Fair</span></td>
  </tr>
  <tr class="T2FormRow">
    <td class="T2FormLabelReadOnly"><span>Begin Date</span></td>
    <td class="T2FormControlCell"><span>4/10/2025</span></td>
  </tr>
  <tr class="T2FormRow">
    <td class="T2FormLabelReadOnly"><span>End Date</span></td>
    <td class="T2FormControlCell"><span>4/12/2025</span></td>
  </tr>
  <tr class="T2FormRow">
    <td class="T2FormLabelRequired"><span>Requested Lot</span></td>
    <td class="T2FormControlCell"><a href="/lots/8">Biggy Structure Lot B</a></td>
  </tr>
  <tr class="T2FormRow">
    <td class="T2FormLabelReadOnly"><span>Exceed Car Requested Set Value</span></td>
    <td class="T2FormControlCell"><span>No</span></td>
  </tr>
  <tr class="T2FormRow">
    <td class="T2FormLabelReadOnly"><span>Contact First Name</span></td>
    <td class="T2FormControlCell"><span>Morgan</span></td>
  </tr>
</table>
"#;

#[test]
fn t2_page_drives_rate_settings_and_location() {
    let record = parse::reservation_from_html(T2_PAGE);
    assert_eq!(record.get(labels::EVENT_NAME), Some("Spring Career Fair"));
    assert_eq!(record.requested_lot(), "Biggy Structure Lot B");

    assert_eq!(parking_rate(&record), 3.0 * 20.50);
    assert_eq!(settings_plan(&record).last(), Some(&Toggle::MaxParkers));

    let read = vec!["BUILDING B".to_string(), "P8 - BIGGY STRUCTURE".to_string()];
    let candidates = row_candidates(&read);
    let best = LotMatcher::default()
        .best_match(search_term(record.requested_lot()), &candidates)
        .unwrap();
    assert_eq!(best, &CandidateOption::new("P8 - BIGGY STRUCTURE", "1"));
}

#[test]
fn matcher_always_picks_from_the_list() {
    let matcher = LotMatcher::default();
    let candidates = vec![
        CandidateOption::new("PSA - San Pablo Structure", "3"),
        CandidateOption::new("Figueroa Street", "4"),
        CandidateOption::new("Lot 71", "5"),
    ];
    for requested in ["", "zzz", "Figueroa", "lot 7", "San Pablo Structure Level 2"] {
        let picked = matcher.best_match(requested, &candidates).unwrap();
        assert!(candidates.contains(picked), "{requested} picked {picked:?}");
    }
    assert!(matcher.best_match("anything", &[]).is_none());
}

#[test]
fn notification_links_created_event() {
    let record = parse::reservation_from_html(T2_PAGE);
    let confirmation = r#"<p>Event created</p>
        <a href="https://www.offstreet.io/events/spring-fair">Share link</a>"#;
    let link = parse::event_link(confirmation);

    let code = BillingCode::new("R1001", "4410-2200");
    let mail = email::render(&record, Some(&code), link.as_deref());
    assert!(mail.html.contains("https://www.offstreet.io/events/spring-fair"));
    assert!(mail.html.contains("Biggy Structure"));
    assert_eq!(mail.subject, "#R1001 - Spring Career Fair");
}
