pub mod climate;
pub mod engine;
pub mod fan;
pub mod light;
pub mod pump;

pub use engine::AutomationEngine;

use crate::models::{AutomationDecision, Device, DeviceType, GrowthStage, Plant, SensorReading};

pub(crate) const NO_SENSOR_DATA: &str = "No sensor data available";

/// Everything a controller may look at when deciding a device's state.
#[derive(Debug, Clone, Copy)]
pub struct AutomationContext<'a> {
    pub device: &'a Device,
    pub stage: GrowthStage,
    pub sensor: Option<&'a SensorReading>,
    /// Local hour of day, 0-23
    pub hour: u32,
}

/// Decision logic for one kind of device
pub trait DeviceController: Send + Sync {
    /// Device type this controller is responsible for
    fn device_type(&self) -> DeviceType;

    /// Decide whether the device should be on right now
    fn evaluate(&self, ctx: &AutomationContext) -> AutomationDecision;
}

/// Evaluate a device with the default engine and the local clock.
pub fn get_device_automation(
    device: &Device,
    plant: &Plant,
    sensor: Option<&SensorReading>,
) -> AutomationDecision {
    AutomationEngine::new().evaluate(device, plant, sensor)
}

/// Apply a decision to a device in auto mode. Devices under manual control
/// keep their state. Returns true when `is_on` changed.
pub fn apply_decision(device: &mut Device, decision: &AutomationDecision) -> bool {
    if !device.auto_mode || device.is_on == decision.should_be_on {
        return false;
    }
    device.is_on = decision.should_be_on;
    true
}
