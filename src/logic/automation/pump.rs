use super::{AutomationContext, DeviceController, NO_SENSOR_DATA};
use crate::logic::tables::moisture_thresholds;
use crate::models::{AutomationDecision, DeviceType};

/// Irrigation pump control: water when soil moisture drops below the
/// stage's dry threshold.
pub struct PumpController;

impl DeviceController for PumpController {
    fn device_type(&self) -> DeviceType {
        DeviceType::Pump
    }

    fn evaluate(&self, ctx: &AutomationContext) -> AutomationDecision {
        let Some(reading) = ctx.sensor else {
            return AutomationDecision::off(NO_SENSOR_DATA);
        };

        let threshold = moisture_thresholds(ctx.stage);
        let moisture = reading.soil_moisture;
        let should_be_on = moisture < f64::from(threshold.dry);

        let reason = if should_be_on {
            format!("Soil dry: {} < {} ({} stage)", moisture, threshold.dry, ctx.stage)
        } else {
            format!(
                "Soil moisture good: {} (target: {}-{})",
                moisture, threshold.dry, threshold.moist
            )
        };

        AutomationDecision::when(should_be_on, reason).with_recommendation(format!(
            "Optimal range for {}: {}-{}",
            ctx.stage, threshold.dry, threshold.moist
        ))
    }
}
