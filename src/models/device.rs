use super::plant::{Plant, SensorScope};
use serde::{Deserialize, Serialize};

pub const MIN_INTENSITY: u8 = 10;
pub const MAX_INTENSITY: u8 = 100;

/// Kind of controllable device. Literals outside the known set are kept
/// verbatim in `Other` so they survive a round trip through storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    Light,
    Fan,
    Pump,
    Heater,
    Humidifier,
    Other(String),
}

impl DeviceType {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceType::Light => "light",
            DeviceType::Fan => "fan",
            DeviceType::Pump => "pump",
            DeviceType::Heater => "heater",
            DeviceType::Humidifier => "humidifier",
            DeviceType::Other(s) => s.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "light" => DeviceType::Light,
            "fan" => DeviceType::Fan,
            "pump" => DeviceType::Pump,
            "heater" => DeviceType::Heater,
            "humidifier" => DeviceType::Humidifier,
            _ => DeviceType::Other(s.trim().to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DeviceType::Other(_))
    }

    pub fn known() -> &'static [DeviceType] {
        &[
            DeviceType::Light,
            DeviceType::Fan,
            DeviceType::Pump,
            DeviceType::Heater,
            DeviceType::Humidifier,
        ]
    }
}

impl From<String> for DeviceType {
    fn from(s: String) -> Self {
        DeviceType::parse(&s)
    }
}

impl From<DeviceType> for String {
    fn from(t: DeviceType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: Option<i64>,
    pub name: String,
    pub device_type: DeviceType,
    pub plant_id: Option<i64>,
    pub device_group: Option<String>,
    pub is_on: bool,
    pub auto_mode: bool,
    // Light-only attributes
    pub wattage: Option<f64>,
    pub distance_from_plant: Option<f64>,
    pub is_dimmable: bool,
    pub current_intensity: u8,
}

impl Device {
    pub fn new(name: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            id: None,
            name: name.into(),
            device_type,
            plant_id: None,
            device_group: None,
            is_on: false,
            auto_mode: false,
            wattage: None,
            distance_from_plant: None,
            is_dimmable: false,
            current_intensity: MAX_INTENSITY,
        }
    }

    pub fn for_plant(mut self, plant_id: i64) -> Self {
        self.plant_id = Some(plant_id);
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.device_group = Some(group.into());
        self
    }

    pub fn with_auto_mode(mut self, auto_mode: bool) -> Self {
        self.auto_mode = auto_mode;
        self
    }

    pub fn with_wattage(mut self, wattage: f64) -> Self {
        self.wattage = Some(wattage);
        self
    }

    pub fn with_distance(mut self, distance_cm: f64) -> Self {
        self.distance_from_plant = Some(distance_cm);
        self
    }

    pub fn dimmable(mut self, intensity: u8) -> Self {
        self.is_dimmable = true;
        self.set_intensity(intensity);
        self
    }

    pub fn set_intensity(&mut self, intensity: u8) {
        self.current_intensity = intensity.clamp(MIN_INTENSITY, MAX_INTENSITY);
    }

    /// Group membership wins over a direct plant link when both are set.
    pub fn sensor_scope(&self) -> Option<SensorScope> {
        match (&self.device_group, self.plant_id) {
            (Some(group), _) => Some(SensorScope::Group(group.clone())),
            (None, Some(id)) => Some(SensorScope::Plant(id)),
            (None, None) => None,
        }
    }

    /// Whether this device acts on the given plant. A grouped device serves
    /// only plants in its group, even when it is also linked to a plant.
    pub fn serves(&self, plant: &Plant) -> bool {
        match &self.device_group {
            Some(group) => plant.device_group.as_deref() == Some(group.as_str()),
            None => plant.id.is_some() && self.plant_id == plant.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GrowthStage;
    use chrono::NaiveDate;

    #[test]
    fn device_type_parse_known() {
        assert_eq!(DeviceType::parse("light"), DeviceType::Light);
        assert_eq!(DeviceType::parse("FAN"), DeviceType::Fan);
        assert_eq!(DeviceType::parse(" pump"), DeviceType::Pump);
        assert_eq!(DeviceType::parse("Heater"), DeviceType::Heater);
        assert_eq!(DeviceType::parse("humidifier"), DeviceType::Humidifier);
    }

    #[test]
    fn device_type_keeps_unknown_literal() {
        let t = DeviceType::parse("dehumidifier");
        assert_eq!(t, DeviceType::Other("dehumidifier".to_string()));
        assert!(!t.is_known());
        assert_eq!(t.as_str(), "dehumidifier");
    }

    #[test]
    fn device_type_serde_uses_plain_strings() {
        let json = serde_json::to_string(&DeviceType::Humidifier).unwrap();
        assert_eq!(json, "\"humidifier\"");
        let parsed: DeviceType = serde_json::from_str("\"co2 burner\"").unwrap();
        assert_eq!(parsed, DeviceType::Other("co2 burner".to_string()));
    }

    #[test]
    fn intensity_is_clamped() {
        let mut light = Device::new("LED", DeviceType::Light).dimmable(5);
        assert_eq!(light.current_intensity, MIN_INTENSITY);
        light.set_intensity(140);
        assert_eq!(light.current_intensity, MAX_INTENSITY);
        light.set_intensity(65);
        assert_eq!(light.current_intensity, 65);
    }

    #[test]
    fn group_membership_governs_scope() {
        let fan = Device::new("Inline fan", DeviceType::Fan)
            .for_plant(3)
            .in_group("tent-a");
        assert_eq!(
            fan.sensor_scope(),
            Some(SensorScope::Group("tent-a".to_string()))
        );

        let pump = Device::new("Pump", DeviceType::Pump).for_plant(3);
        assert_eq!(pump.sensor_scope(), Some(SensorScope::Plant(3)));
    }

    #[test]
    fn serves_direct_and_grouped_plants() {
        let planted = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut plant = Plant::new("Gelato", GrowthStage::Flowering, planted).with_group("tent-a");
        plant.id = Some(1);

        let own = Device::new("Pump", DeviceType::Pump).for_plant(1);
        let shared = Device::new("Fan", DeviceType::Fan).in_group("tent-a");
        let other = Device::new("Heater", DeviceType::Heater).in_group("tent-b");

        assert!(own.serves(&plant));
        assert!(shared.serves(&plant));
        assert!(!other.serves(&plant));
    }

    #[test]
    fn group_overrides_plant_link() {
        let planted = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut plant = Plant::new("Gelato", GrowthStage::Flowering, planted).with_group("tent-a");
        plant.id = Some(1);

        let elsewhere = Device::new("Pump", DeviceType::Pump)
            .for_plant(1)
            .in_group("tent-b");
        assert!(!elsewhere.serves(&plant));

        let same_tent = Device::new("Pump", DeviceType::Pump)
            .for_plant(1)
            .in_group("tent-a");
        assert!(same_tent.serves(&plant));

        let mut loose = Plant::new("Auto", GrowthStage::Seed, planted);
        loose.id = Some(1);
        assert!(!elsewhere.serves(&loose));
    }

    #[test]
    fn unknown_type_is_trimmed() {
        assert_eq!(DeviceType::parse(" co2 "), DeviceType::Other("co2".to_string()));
        assert_eq!(DeviceType::parse(" co2 ").as_str(), "co2");
    }
}
