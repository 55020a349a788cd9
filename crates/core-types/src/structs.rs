use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of the loaded price series.
///
/// `log_return` is always present: the first cleaned row has no predecessor
/// and is dropped by the loader instead of being stored with a null return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub price: f64,
    pub log_return: f64,
}

/// A hand-curated geopolitical or economic event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub event_type: String,
    pub region: String,
    pub description: String,
}

/// A catalogued shift in mean price.
///
/// The means and percentage are recorded facts, not values derived from the
/// loaded series, and may disagree with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    pub date: NaiveDate,
    pub probability: f64,
    pub before_mean: f64,
    pub after_mean: f64,
    pub change_percentage: f64,
    #[serde(default)]
    pub associated_events: Vec<u32>,
}

impl ChangePoint {
    pub fn is_associated_with(&self, event_id: u32) -> bool {
        self.associated_events.contains(&event_id)
    }
}
