// thirtyfour (selenium) inputs
pub const WINDOW_WIDTH: u32 = 1440;
pub const WINDOW_HEIGHT: u32 = 900;

pub const POLL_INTERVAL_MS: u64 = 250;

// T2 login form
pub const T2_USER_ID: &str = "ctl00_pageContent_UserID_T2FormTextBox_TextBox";
pub const T2_PASSWORD_ID: &str = "ctl00_pageContent_Password_T2FormTextBox_TextBox";
pub const T2_LOGIN_BUTTON_ID: &str = "ctl00_pageContent_LoginButton";

// T2 reservation page
pub const T2_FORM_ROW_CLASS: &str = "T2FormRow";
pub const T2_R_NUMBER_ID: &str = "MySettings_custom_Reservation_REQ_NUMBER_T2Label_Label";
pub const T2_REQUISITION_LINK_ID: &str = "MySettings_ResponsibleThirdPartyLink_T2FormLinkButton";
pub const T2_GL_ACCOUNT_ID: &str =
    "ctl00_pageContent_MySettings_custom_ThirdParty_ACCT_NUMBER_T2Label_Label";
pub const T2_EXPIRED_TEXT: &str = "requisition has expired";

// T2 reservation note
pub const T2_NOTE_STATUS_CSS: &str = "[id$='NoteStatus_T2Label_Label']";
pub const T2_DENY_BUTTON_CSS: &str = "[id$='DenyNote_T2FormButton'], input[value='Deny']";
pub const T2_DENIED_TEXT: &str = "denied";

// Offstreet login
pub const OFFSTREET_EMAIL_ID: &str = "email";
pub const OFFSTREET_PASSWORD_ID: &str = "password";
pub const OFFSTREET_LOGIN_ID: &str = "login";
pub const OFFSTREET_DASHBOARD_PATH: &str = "/dashboard";
pub const OFFSTREET_CREATE_PATH: &str = "events/create";

// Offstreet wizard, shared
pub const SUBMIT_BUTTON_CSS: &str = "button[type='submit']";
pub const PRIMARY_CLASS: &str = "bg-primary-600";

// Page 1: event details
pub const EVENT_NAME_CSS: &str = "#event";
pub const HOST_CSS: &str = "#host";
pub const CONTACT_FIRST_CSS: &str = "#contact\\.firstName";
pub const CONTACT_LAST_CSS: &str = "#contact\\.lastName";
pub const CONTACT_EMAIL_CSS: &str = "#contact\\.email";
pub const CONTACT_PHONE_CSS: &str = "#contact\\.phoneNumber";
pub const BILLING_CODE_CSS: &str = "#billingCode";

// Page 2: schedule
pub const START_TIME_ID: &str = "startTime";
pub const END_TIME_ID: &str = "endTime";
pub const START_DATE_LABEL: &str = "Start Date";
pub const END_DATE_LABEL: &str = "Expiry Date";

// Page 3: locations
pub const ADD_LOCATIONS_XPATH: &str =
    "//button[contains(@class, 'inline-flex') and contains(., 'Add Locations')]";
pub const LOCATION_SEARCH_CSS: &str = "input#search[placeholder='Search...']";
pub const RESULT_ROWS_CSS: &str = "tbody tr";
pub const LOCATION_CELL_CSS: &str = "td:nth-child(2)";
pub const ROW_CHECKBOX_CSS: &str = "td:first-child span[role='checkbox']";
pub const CHOOSE_XPATH: &str =
    "//button[contains(@class, 'bg-primary-600') and contains(., 'Choose')]";
pub const LOCATION_SELECT_CSS: &str = "select[name='locations.0.id']";

// Page 4: settings
pub const TOGGLE_ADDITIONAL_INFO: &str = "hasAdditionalInfo";
pub const TOGGLE_CODE: &str = "hasCode";
pub const TOGGLE_RATE: &str = "hasRate";
pub const TOGGLE_MAX_PARKERS: &str = "hasMaxParkers";
pub const SAME_CODE_XPATH: &str = "//div[contains(text(), 'Parkers input the same code')]";
pub const SAME_CODE_ID: &str = "sameCode";
pub const RATE_INPUT_CSS: &str = "input[inputmode='numeric']";
pub const MAX_PARKERS_CSS: &str = "input[placeholder='e.g. 48']";
pub const FIELD_NAME_CSS: &str = "input[placeholder='e.g. Driver Name']";
pub const ADD_FIELD_XPATH: &str = "//button[text()='Add Field']";

// Page 5: portal
pub const BRANDING_TOGGLE_ID: &str = "hasBranding";
pub const INSTRUCTIONS_TOGGLE_ID: &str = "hasInstructions";
pub const ADD_PREVIOUS_FILES_XPATH: &str = "//button[text()='Add Previous Files']";
pub const FILE_SEARCH_CSS: &str = "input[placeholder='Search...']";
pub const BRANDING_IMAGE: &str = "transport.png";
pub const NEXT_XPATH: &str =
    "//button[contains(@class, 'bg-primary') and normalize-space(text())='Next']";
pub const SAVE_XPATH: &str =
    "//button[contains(@class, 'bg-primary') and normalize-space(text())='Save']";
pub const EDITOR_CLASS: &str = "ProseMirror";
pub const CREATE_EVENT_XPATH: &str = "//button[text()='Create Event']";
