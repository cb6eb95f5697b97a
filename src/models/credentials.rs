use serde::{Deserialize, Serialize};
use std::fmt;

/// The two login pairs the run needs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub t2_username: String,
    pub t2_password: String,
    pub offstreet_email: String,
    pub offstreet_password: String,
}

// Keep passwords out of logs.
impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("t2_username", &self.t2_username)
            .field("t2_password", &"***")
            .field("offstreet_email", &self.offstreet_email)
            .field("offstreet_password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_masks_passwords() {
        let creds = StoredCredentials {
            t2_username: "parker".into(),
            t2_password: "hunter2".into(),
            offstreet_email: "parker@example.edu".into(),
            offstreet_password: "swordfish".into(),
        };
        let shown = format!("{:?}", creds);
        assert!(shown.contains("parker@example.edu"));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("swordfish"));
    }
}
