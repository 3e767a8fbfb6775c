use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    pub link: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub location: String,
    pub location_link: Option<String>,
    pub venue: Option<String>,
    pub date: DateTime<FixedOffset>,
}

impl Event {
    /// Virtual events carry the literal `Online event` location and no venue.
    pub fn is_online(&self) -> bool {
        self.location.split_whitespace().next() == Some("Online")
    }
}
