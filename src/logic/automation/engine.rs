use super::{
    climate::{HeaterController, HumidifierController},
    fan::FanController,
    light::{LightController, DEFAULT_LIGHT_START_HOUR},
    pump::PumpController,
    AutomationContext, DeviceController,
};
use crate::models::{AutomationDecision, Device, Plant, SensorReading};
use chrono::{Local, Timelike};

pub struct AutomationEngine {
    controllers: Vec<Box<dyn DeviceController>>,
}

impl AutomationEngine {
    pub fn new() -> Self {
        Self::with_light_start_hour(DEFAULT_LIGHT_START_HOUR)
    }

    pub fn with_light_start_hour(light_start_hour: u32) -> Self {
        let controllers: Vec<Box<dyn DeviceController>> = vec![
            Box::new(LightController::new(light_start_hour)),
            Box::new(FanController),
            Box::new(PumpController),
            Box::new(HeaterController),
            Box::new(HumidifierController),
        ];

        Self { controllers }
    }

    /// Evaluate using the current local hour.
    pub fn evaluate(
        &self,
        device: &Device,
        plant: &Plant,
        sensor: Option<&SensorReading>,
    ) -> AutomationDecision {
        self.evaluate_at(device, plant, sensor, Local::now().hour())
    }

    pub fn evaluate_at(
        &self,
        device: &Device,
        plant: &Plant,
        sensor: Option<&SensorReading>,
        hour: u32,
    ) -> AutomationDecision {
        let ctx = AutomationContext {
            device,
            stage: plant.stage,
            sensor,
            hour: hour % 24,
        };

        let Some(controller) = self
            .controllers
            .iter()
            .find(|c| c.device_type() == device.device_type)
        else {
            tracing::error!(
                device_type = %device.device_type,
                device = %device.name,
                "Unknown device type reached automation"
            );
            return AutomationDecision::off("Unknown device type");
        };

        let decision = controller.evaluate(&ctx);
        tracing::debug!(
            device = %device.name,
            device_type = %device.device_type,
            stage = %plant.stage,
            should_be_on = decision.should_be_on,
            reason = %decision.reason,
            "Automation decision"
        );
        decision
    }

    pub fn supported_types(&self) -> Vec<String> {
        self.controllers
            .iter()
            .map(|c| c.device_type().to_string())
            .collect()
    }
}

impl Default for AutomationEngine {
    fn default() -> Self {
        Self::new()
    }
}
