use super::{AutomationContext, DeviceController, NO_SENSOR_DATA};
use crate::models::{AutomationDecision, DeviceType, GrowthStage};

/// Ventilation control.
///
/// Flowering plants want a cooler, drier room (24°C / 50%) than other
/// stages (26°C / 60%). The fan runs when temperature is more than 2°C
/// over ideal or humidity more than 10 points over ideal.
pub struct FanController;

const TEMP_MARGIN_C: f64 = 2.0;
const HUMIDITY_MARGIN: f64 = 10.0;

fn ideal_conditions(stage: GrowthStage) -> (f64, f64) {
    if stage == GrowthStage::Flowering {
        (24.0, 50.0)
    } else {
        (26.0, 60.0)
    }
}

impl DeviceController for FanController {
    fn device_type(&self) -> DeviceType {
        DeviceType::Fan
    }

    fn evaluate(&self, ctx: &AutomationContext) -> AutomationDecision {
        let Some(reading) = ctx.sensor else {
            return AutomationDecision::off(NO_SENSOR_DATA);
        };

        let (ideal_temp, ideal_humidity) = ideal_conditions(ctx.stage);
        let max_temp = ideal_temp + TEMP_MARGIN_C;
        let max_humidity = ideal_humidity + HUMIDITY_MARGIN;

        let mut exceeded = Vec::new();
        if reading.temperature > max_temp {
            exceeded.push(format!("temp {}°C > {}°C", reading.temperature, max_temp));
        }
        if reading.humidity > max_humidity {
            exceeded.push(format!("humidity {}% > {}%", reading.humidity, max_humidity));
        }

        if exceeded.is_empty() {
            AutomationDecision::off(format!(
                "Conditions good: {}°C, {}%",
                reading.temperature, reading.humidity
            ))
        } else {
            AutomationDecision::on(format!("Ventilation needed: {}", exceeded.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Device, SensorReading};

    fn evaluate(stage: GrowthStage, reading: Option<&SensorReading>) -> AutomationDecision {
        let fan = Device::new("Fan", DeviceType::Fan);
        let ctx = AutomationContext {
            device: &fan,
            stage,
            sensor: reading,
            hour: 12,
        };
        FanController.evaluate(&ctx)
    }

    #[test]
    fn no_reading_keeps_fan_off() {
        let decision = evaluate(GrowthStage::Vegetative, None);
        assert!(!decision.should_be_on);
        assert_eq!(decision.reason, "No sensor data available");
    }

    #[test]
    fn hot_vegetative_room_needs_ventilation() {
        let reading = SensorReading::new(29.0, 55.0, 300.0);
        let decision = evaluate(GrowthStage::Vegetative, Some(&reading));
        assert!(decision.should_be_on);
        assert!(decision.reason.contains("temp 29°C > 28°C"));
        assert!(!decision.reason.contains("humidity"));
    }

    #[test]
    fn flowering_uses_tighter_limits() {
        // 27°C / 65% is fine in veg but too warm and humid in flower
        let reading = SensorReading::new(27.0, 65.0, 300.0);
        assert!(!evaluate(GrowthStage::Vegetative, Some(&reading)).should_be_on);

        let decision = evaluate(GrowthStage::Flowering, Some(&reading));
        assert!(decision.should_be_on);
        assert_eq!(
            decision.reason,
            "Ventilation needed: temp 27°C > 26°C, humidity 65% > 60%"
        );
    }

    #[test]
    fn thresholds_are_exclusive() {
        let reading = SensorReading::new(28.0, 70.0, 300.0);
        let decision = evaluate(GrowthStage::Seedling, Some(&reading));
        assert!(!decision.should_be_on);
        assert_eq!(decision.reason, "Conditions good: 28°C, 70%");
    }

    #[test]
    fn humidity_alone_triggers_fan() {
        let reading = SensorReading::new(22.5, 71.5, 300.0);
        let decision = evaluate(GrowthStage::Seed, Some(&reading));
        assert!(decision.should_be_on);
        assert_eq!(decision.reason, "Ventilation needed: humidity 71.5% > 70%");
    }
}
