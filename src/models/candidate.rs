use serde::Serialize;

/// One selectable entry in an Offstreet dropdown or search-result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateOption {
    pub label: String,
    pub id: String,
}

impl CandidateOption {
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        CandidateOption {
            label: label.into(),
            id: id.into(),
        }
    }
}
