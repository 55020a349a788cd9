use crate::error::ConfigError;
use core_types::{ChangePoint, Event};
use serde::Deserialize;
use std::collections::HashSet;

/// The curated events and change points, read from a declarative file so they
/// can be corrected without a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub change_points: Vec<ChangePoint>,
}

impl Catalog {
    /// Rejects catalogs that would make lookups ambiguous or nonsensical.
    ///
    /// Change points that reference unknown event ids are only logged: the
    /// correlator scans by id and simply never matches them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids = HashSet::with_capacity(self.events.len());
        for event in &self.events {
            if !ids.insert(event.id) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate event id {}",
                    event.id
                )));
            }
        }

        for cp in &self.change_points {
            if !(0.0..=1.0).contains(&cp.probability) {
                return Err(ConfigError::ValidationError(format!(
                    "change point {} has probability {} outside [0, 1]",
                    cp.date, cp.probability
                )));
            }
            for id in cp.associated_events.iter().filter(|id| !ids.contains(id)) {
                tracing::warn!(
                    change_point = %cp.date,
                    event_id = id,
                    "Change point references an unknown event."
                );
            }
        }

        Ok(())
    }
}
