use super::stage::GrowthStage;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which sensor feed applies to a plant or device. Plants sharing a device
/// group share one environment and therefore one set of readings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "key")]
pub enum SensorScope {
    Plant(i64),
    Group(String),
}

impl std::fmt::Display for SensorScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorScope::Plant(id) => write!(f, "plant #{}", id),
            SensorScope::Group(group) => write!(f, "group '{}'", group),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: Option<i64>,
    pub name: String,
    pub stage: GrowthStage,
    pub planted_date: NaiveDate,
    pub device_group: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Plant {
    pub fn new(name: impl Into<String>, stage: GrowthStage, planted_date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            stage,
            planted_date,
            device_group: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        self.device_group = if group.trim().is_empty() {
            None
        } else {
            Some(group)
        };
        self
    }

    /// Readings for a grouped plant come from the group, otherwise from the plant itself.
    pub fn sensor_scope(&self) -> Option<SensorScope> {
        match (&self.device_group, self.id) {
            (Some(group), _) => Some(SensorScope::Group(group.clone())),
            (None, Some(id)) => Some(SensorScope::Plant(id)),
            (None, None) => None,
        }
    }

    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.planted_date).num_days().max(0)
    }
}
