use serde::{Deserialize, Serialize};

/// Outcome of evaluating one device against its plant and environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationDecision {
    pub should_be_on: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl AutomationDecision {
    pub fn on(reason: impl Into<String>) -> Self {
        Self {
            should_be_on: true,
            reason: reason.into(),
            recommendation: None,
        }
    }

    pub fn off(reason: impl Into<String>) -> Self {
        Self {
            should_be_on: false,
            reason: reason.into(),
            recommendation: None,
        }
    }

    pub fn when(should_be_on: bool, reason: impl Into<String>) -> Self {
        Self {
            should_be_on,
            reason: reason.into(),
            recommendation: None,
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// Wattage bucket used to pick a mounting distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerCategory {
    Low,
    Med,
    High,
}

impl PowerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerCategory::Low => "low",
            PowerCategory::Med => "med",
            PowerCategory::High => "high",
        }
    }
}

impl std::fmt::Display for PowerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recommended mounting distance for a light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightDistance {
    /// Centimetres between light and canopy
    pub distance: u32,
    pub category: PowerCategory,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityRecommendation {
    /// Dimmer setting in percent
    pub intensity: u32,
    pub reason: String,
    /// Estimated photon flux density at the canopy, μmol/m²/s
    pub ppfd: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_json_shape() {
        let decision = AutomationDecision::off("No sensor data available");
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["shouldBeOn"], false);
        assert_eq!(json["reason"], "No sensor data available");
        assert!(json.get("recommendation").is_none());

        let decision = AutomationDecision::on("Soil dry").with_recommendation("Water now");
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["recommendation"], "Water now");
    }
}
