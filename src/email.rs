use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use thirtyfour::prelude::*;
use tracing::info;

use crate::error::StepResult;
use crate::models::reservation::{BillingCode, ReservationRecord, labels};

pub const MISSING_EVENT_LINK: &str = "[EVENT_LINK_NOT_FOUND]";
pub const NOTIFICATION_FILE: &str = "notification.html";

/// Display names used in guest-facing mail, keyed by a fragment of the T2 lot name.
const STRUCTURE_NAMES: &[(&str, &str)] = &[
    ("Biggy", "Biggy Structure"),
    ("San Pablo", "San Pablo Parking Structure"),
    ("Figueroa", "Figueroa Street Structure"),
];

pub fn parking_structure_name(lot: &str) -> &str {
    STRUCTURE_NAMES
        .iter()
        .find(|(fragment, _)| lot.contains(fragment))
        .map(|(_, name)| *name)
        .unwrap_or(lot)
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub html: String,
    pub summary: String,
}

/// Builds the guest-instructions mail for the event that was just created.
pub fn render(
    record: &ReservationRecord,
    billing_code: Option<&BillingCode>,
    event_link: Option<&str>,
) -> Notification {
    let field = |label: &'static str| record.text(label);

    let event_name = field(labels::EVENT_NAME);
    let begin_date = field(labels::BEGIN_DATE);
    let contact_name = field(labels::FIRST_NAME);
    let email = field(labels::EMAIL);
    let passcode = field(labels::RESERVATION_UID);
    let structure = parking_structure_name(record.requested_lot());
    let link = event_link.unwrap_or(MISSING_EVENT_LINK);

    let (event_name_h, begin_h, contact_h, email_h, passcode_h, structure_h, link_h) = (
        escape(event_name),
        escape(begin_date),
        escape(contact_name),
        escape(email),
        escape(passcode),
        escape(structure),
        escape(link),
    );

    let html = format!(
        r#"<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; }}
        ul {{ list-style-type: disc; padding-left: 40px; }}
        .underline {{ text-decoration: underline; }}
        .bold {{ font-weight: bold; }}
    </style>
</head>
<body>
    <p>OFST- RE: {event_name_h}</p>
    <p>Transportation Parking Reservations</p>
    <p>{email_h}</p>
    <p><strong>Reference: {event_name_h} {begin_h}</strong></p><br>
    <p>Hello <span style="color: black;">{contact_h}</span>,</p><br>
    <p>Please note that RSVP {passcode_h} is no longer eligible for a manual/paper pass and has been converted to our Digital Platform Offstreet.</p><br>
    <p>Below you will find important information regarding our new digital parking pass system which will allow your guests to easily and conveniently park without needing to stop at a Gate Entrance Booth. Simply send your guests the below Link with instructions and they will take it from there!</p><br>
    <p class="underline bold">GUEST INSTRUCTIONS:</p>
    <p><strong>Here's how to obtain a ONE-DAY Digital Parking Pass:</strong></p>
    <ul>
        <li><strong>Registration Link/QR Code:</strong> To register for Parking no earlier than 1-2 days prior to your event, please click on this link: <a href="{link_h}" style="color: blue;">{link_h}</a></li>
        <li><strong>Vehicle License Plate:</strong> Once in our system, please enter license plate information</li>
        <li><strong>Enter Pass Code:</strong> <span style="font-weight: bold; color: #386600;">{passcode_h}</span></li>
        <li><strong>Parking Confirmation Receipt:</strong> After completing your registration, enter your e-mail for a receipt copy (optional). Your License plate is your permit. No paper pass required to be displayed. You are now all set to park!</li>
        <li><strong>Additional Notes:</strong> Your assigned parking structure is: <span style="font-weight: bold;">{structure_h}</span> (Refer to Welcome Registration page for Parking Map)</li>
    </ul><br>
    <p>Please make sure you do NOT park in any reserved/signage space as these are for reserved permit holders only! Thank you!</p>
</body>
</html>
"#
    );

    let r_number = billing_code
        .and_then(|code| code.as_str().split(" & ").next())
        .unwrap_or_default();
    let subject = format!("#{} - {}", r_number, event_name);
    let summary = format!(
        "Parking Authorization for:\n\n\
         R#: {r_number}\n\
         Event: {event_name}\n\
         Date: {begin_date} - {end}\n\
         Location: {lot}\n\
         Department: {dept}\n\
         Contact: {contact_name} {last}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Billing Code: {code}",
        end = field(labels::END_DATE),
        lot = record.requested_lot(),
        dept = field(labels::DEPARTMENT),
        last = field(labels::LAST_NAME),
        phone = field(labels::PHONE),
        code = billing_code.map(BillingCode::as_str).unwrap_or_default(),
    );

    Notification {
        subject,
        html,
        summary,
    }
}

impl Notification {
    pub fn write_to(&self, dir: &Path) -> StepResult<PathBuf> {
        let path = dir.join(NOTIFICATION_FILE);
        fs::write(&path, &self.html)?;
        Ok(path)
    }

    /// Shows the mail in a fresh tab so the operator can copy it into their mail client.
    pub async fn open_in_new_tab(&self, driver: &WebDriver) -> StepResult<()> {
        let js = r#"
            var w = window.open();
            w.document.write(arguments[0]);
            w.document.close();
        "#;
        let args: Vec<Value> = vec![Value::String(self.html.clone())];
        driver.execute(js, Arc::from(args)).await?;
        info!("notification email opened in a new tab");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ReservationRecord {
        [
            (labels::EVENT_NAME, "Alumni <Gala>"),
            (labels::BEGIN_DATE, "3/14/2025"),
            (labels::END_DATE, "3/15/2025"),
            (labels::FIRST_NAME, "Dana"),
            (labels::LAST_NAME, "Reyes"),
            (labels::EMAIL, "dreyes@example.edu"),
            (labels::RESERVATION_UID, "RSV-0042"),
            (labels::REQUESTED_LOT, "San Pablo Structure Level 2"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn maps_known_structures_to_display_names() {
        assert_eq!(parking_structure_name("Biggy Structure Lot B"), "Biggy Structure");
        assert_eq!(
            parking_structure_name("Figueroa St"),
            "Figueroa Street Structure"
        );
        assert_eq!(parking_structure_name("Lot 71"), "Lot 71");
    }

    #[test]
    fn renders_guest_instructions() {
        let code = BillingCode::new("R778", "GL-1");
        let mail = render(
            &record(),
            Some(&code),
            Some("https://www.offstreet.io/events/xyz"),
        );

        assert!(mail.html.contains("Hello <span style=\"color: black;\">Dana</span>"));
        assert!(mail.html.contains("RSVP RSV-0042 is no longer eligible"));
        assert!(mail.html.contains("San Pablo Parking Structure"));
        assert!(mail.html.contains("href=\"https://www.offstreet.io/events/xyz\""));
        assert!(mail.html.contains("Alumni &lt;Gala&gt; 3/14/2025"));
        assert_eq!(mail.subject, "#R778 - Alumni <Gala>");
        assert!(mail.summary.contains("Billing Code: R778 & GL-1"));
        assert!(mail.summary.contains("Contact: Dana Reyes"));
    }

    #[test]
    fn missing_link_uses_placeholder() {
        let mail = render(&record(), None, None);
        assert!(mail.html.contains(MISSING_EVENT_LINK));
        assert_eq!(mail.subject, "# - Alumni <Gala>");
    }

    #[test]
    fn writes_html_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mail = render(&record(), None, None);
        let path = mail.write_to(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), mail.html);
    }
}
