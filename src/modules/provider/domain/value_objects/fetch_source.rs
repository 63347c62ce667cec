use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream source queried during aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchSource {
    Profile,
    Order,
}

impl FetchSource {
    /// Join order of the aggregated payload
    pub const ALL: [FetchSource; 2] = [FetchSource::Profile, FetchSource::Order];

    pub fn as_str(&self) -> &'static str {
        match self {
            FetchSource::Profile => "profile",
            FetchSource::Order => "order",
        }
    }
}

impl fmt::Display for FetchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
