//! Per-session health log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tracker::scoring::{calculate_score, HealthReading, ImprovementLabel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthLogEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub reading: HealthReading,
    pub points: u8,
    pub improvements: ImprovementLabel,
}

/// Entries newest first.
#[derive(Debug, Clone, Default)]
pub struct HealthLog {
    entries: Vec<HealthLogEntry>,
}

impl HealthLog {
    /// Scores `reading` and prepends it. A reading with every field blank is
    /// ignored and returns `None`.
    pub fn add(&mut self, reading: HealthReading, date: NaiveDate) -> Option<&HealthLogEntry> {
        if reading.is_blank() {
            return None;
        }
        let score = calculate_score(&reading);
        self.entries.insert(
            0,
            HealthLogEntry {
                id: Uuid::new_v4(),
                date,
                reading,
                points: score.points,
                improvements: score.label,
            },
        );
        self.entries.first()
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[HealthLogEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HealthLogEntry> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
