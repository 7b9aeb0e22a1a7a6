use super::plant::SensorScope;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One environmental sample. Temperature in °C, humidity in %, soil
/// moisture in raw sensor units where higher means wetter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub id: Option<i64>,
    pub scope: Option<SensorScope>,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    pub recorded_at: DateTime<Utc>,
}

impl SensorReading {
    pub fn new(temperature: f64, humidity: f64, soil_moisture: f64) -> Self {
        Self {
            id: None,
            scope: None,
            temperature,
            humidity,
            soil_moisture,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_scope(mut self, scope: SensorScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = at;
        self
    }
}
