use crate::db::Database;
use crate::error::{GrowOpsError, Result};
use crate::logic::automation::{apply_decision, AutomationEngine};
use crate::models::{AutomationDecision, Device, Plant, SensorReading, SensorScope};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceOutcome {
    pub device: Device,
    pub decision: AutomationDecision,
    /// Where the reading behind the decision came from
    pub sensor_scope: Option<SensorScope>,
    /// The device was in auto mode and its power state was switched
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRun {
    pub plant: Plant,
    /// Latest reading for the plant's own scope
    pub reading: Option<SensorReading>,
    pub outcomes: Vec<DeviceOutcome>,
}

impl AutomationRun {
    pub fn changed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.changed).count()
    }
}

/// Latest readings per scope, fetched once per run.
struct ReadingCache<'a> {
    db: &'a Database,
    readings: HashMap<SensorScope, Option<SensorReading>>,
}

impl<'a> ReadingCache<'a> {
    fn new(db: &'a Database) -> Self {
        Self {
            db,
            readings: HashMap::new(),
        }
    }

    fn latest(&mut self, scope: &SensorScope) -> Result<Option<SensorReading>> {
        if let Some(reading) = self.readings.get(scope) {
            return Ok(reading.clone());
        }
        let reading = self.db.latest_reading(scope)?;
        self.readings.insert(scope.clone(), reading.clone());
        Ok(reading)
    }
}

/// Evaluate every device serving a plant and persist the auto-mode devices
/// whose state changed.
///
/// Each device reads its own sensor scope (its group, else its plant). When
/// that scope has no reading the plant's scope is used instead.
pub fn run_plant_automation(
    db: &Database,
    engine: &AutomationEngine,
    plant_id: i64,
    hour: u32,
) -> Result<AutomationRun> {
    let plant = db
        .get_plant(plant_id)?
        .ok_or_else(|| GrowOpsError::NotFound(format!("Plant {}", plant_id)))?;

    let mut cache = ReadingCache::new(db);
    let plant_scope = plant.sensor_scope();
    let plant_reading = match &plant_scope {
        Some(scope) => cache.latest(scope)?,
        None => None,
    };
    if plant_reading.is_none() {
        tracing::debug!(plant_id, "No sensor reading for plant");
    }

    let devices = db.devices_for_plant(&plant)?;
    let mut outcomes = Vec::with_capacity(devices.len());

    for mut device in devices {
        let own = match device.sensor_scope() {
            Some(scope) => cache.latest(&scope)?.map(|r| (Some(scope), r)),
            None => None,
        };
        let (sensor_scope, reading) = match own {
            Some((scope, reading)) => (scope, Some(reading)),
            None => (plant_scope.clone(), plant_reading.clone()),
        };

        let decision = engine.evaluate_at(&device, &plant, reading.as_ref(), hour);
        let changed = apply_decision(&mut device, &decision);
        if changed {
            db.update_device_state(&device)?;
            tracing::info!(
                device = %device.name,
                is_on = device.is_on,
                reason = %decision.reason,
                "Switched device"
            );
        }
        outcomes.push(DeviceOutcome {
            device,
            decision,
            sensor_scope,
            changed,
        });
    }

    Ok(AutomationRun {
        plant,
        reading: plant_reading,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceType, GrowthStage, SensorScope};
    use chrono::NaiveDate;

    fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let plant = Plant::new(
            "Northern Lights",
            GrowthStage::Flowering,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .with_group("tent-a");
        let plant_id = db.create_plant(&plant).unwrap();
        (db, plant_id)
    }

    #[test]
    fn switches_auto_devices_and_leaves_manual_ones() {
        let (db, plant_id) = setup();
        let pump_id = db
            .create_device(
                &Device::new("Pump", DeviceType::Pump)
                    .for_plant(plant_id)
                    .with_auto_mode(true),
            )
            .unwrap();
        let heater_id = db
            .create_device(&Device::new("Heater", DeviceType::Heater).in_group("tent-a"))
            .unwrap();
        db.insert_reading(
            &SensorReading::new(18.0, 50.0, 200.0)
                .with_scope(SensorScope::Group("tent-a".into())),
        )
        .unwrap();

        let run = run_plant_automation(&db, &AutomationEngine::new(), plant_id, 10).unwrap();
        assert_eq!(run.outcomes.len(), 2);
        assert_eq!(run.changed_count(), 1);
        assert!(run.reading.is_some());

        // Pump is auto and soil is dry
        assert!(db.get_device(pump_id).unwrap().unwrap().is_on);
        // Heater wants to be on but is manual
        let heater = &run.outcomes[1];
        assert!(heater.decision.should_be_on);
        assert!(!heater.changed);
        assert!(!db.get_device(heater_id).unwrap().unwrap().is_on);
    }

    #[test]
    fn missing_reading_turns_sensor_devices_off() {
        let (db, plant_id) = setup();
        let mut fan = Device::new("Fan", DeviceType::Fan)
            .for_plant(plant_id)
            .with_auto_mode(true);
        fan.is_on = true;
        let fan_id = db.create_device(&fan).unwrap();

        let run = run_plant_automation(&db, &AutomationEngine::new(), plant_id, 10).unwrap();
        assert!(run.reading.is_none());
        assert_eq!(run.outcomes[0].decision.reason, "No sensor data available");
        assert!(run.outcomes[0].changed);
        assert!(!db.get_device(fan_id).unwrap().unwrap().is_on);
    }

    #[test]
    fn device_in_another_group_is_not_driven() {
        let (db, plant_id) = setup();
        db.insert_reading(
            &SensorReading::new(24.0, 50.0, 100.0)
                .with_scope(SensorScope::Group("tent-a".into())),
        )
        .unwrap();
        db.insert_reading(
            &SensorReading::new(24.0, 50.0, 900.0)
                .with_scope(SensorScope::Group("tent-b".into())),
        )
        .unwrap();
        let pump_id = db
            .create_device(
                &Device::new("Pump", DeviceType::Pump)
                    .for_plant(plant_id)
                    .in_group("tent-b")
                    .with_auto_mode(true),
            )
            .unwrap();

        let run = run_plant_automation(&db, &AutomationEngine::new(), plant_id, 10).unwrap();
        assert!(run.outcomes.is_empty());
        assert!(!db.get_device(pump_id).unwrap().unwrap().is_on);
    }

    #[test]
    fn linked_device_prefers_its_own_readings() {
        let (db, plant_id) = setup();
        // Group is dry, the plant's own sensor is wet
        db.insert_reading(
            &SensorReading::new(24.0, 50.0, 100.0)
                .with_scope(SensorScope::Group("tent-a".into())),
        )
        .unwrap();
        db.insert_reading(
            &SensorReading::new(24.0, 50.0, 380.0).with_scope(SensorScope::Plant(plant_id)),
        )
        .unwrap();
        let pump_id = db
            .create_device(
                &Device::new("Pump", DeviceType::Pump)
                    .for_plant(plant_id)
                    .with_auto_mode(true),
            )
            .unwrap();
        db.create_device(&Device::new("Fan", DeviceType::Fan).in_group("tent-a"))
            .unwrap();

        let run = run_plant_automation(&db, &AutomationEngine::new(), plant_id, 10).unwrap();
        let pump = &run.outcomes[0];
        assert_eq!(pump.sensor_scope, Some(SensorScope::Plant(plant_id)));
        assert_eq!(pump.decision.reason, "Soil moisture good: 380 (target: 250-400)");
        assert!(!db.get_device(pump_id).unwrap().unwrap().is_on);

        let fan = &run.outcomes[1];
        assert_eq!(fan.sensor_scope, Some(SensorScope::Group("tent-a".into())));
        assert_eq!(run.reading.as_ref().map(|r| r.soil_moisture), Some(100.0));
    }

    #[test]
    fn linked_device_falls_back_to_plant_scope() {
        let (db, plant_id) = setup();
        db.insert_reading(
            &SensorReading::new(24.0, 50.0, 100.0)
                .with_scope(SensorScope::Group("tent-a".into())),
        )
        .unwrap();
        db.create_device(
            &Device::new("Pump", DeviceType::Pump)
                .for_plant(plant_id)
                .with_auto_mode(true),
        )
        .unwrap();

        let run = run_plant_automation(&db, &AutomationEngine::new(), plant_id, 10).unwrap();
        let pump = &run.outcomes[0];
        assert_eq!(pump.sensor_scope, Some(SensorScope::Group("tent-a".into())));
        assert!(pump.decision.should_be_on);
        assert!(pump.changed);
    }

    #[test]
    fn unknown_plant_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            run_plant_automation(&db, &AutomationEngine::new(), 5, 10),
            Err(GrowOpsError::NotFound(_))
        ));
    }
}
