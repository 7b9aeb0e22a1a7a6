use super::{AutomationContext, DeviceController, NO_SENSOR_DATA};
use crate::models::{AutomationDecision, DeviceType};

const MIN_TEMP_C: f64 = 20.0;
const MIN_HUMIDITY: f64 = 40.0;

/// Runs below 20°C regardless of stage.
pub struct HeaterController;

impl DeviceController for HeaterController {
    fn device_type(&self) -> DeviceType {
        DeviceType::Heater
    }

    fn evaluate(&self, ctx: &AutomationContext) -> AutomationDecision {
        let Some(reading) = ctx.sensor else {
            return AutomationDecision::off(NO_SENSOR_DATA);
        };

        let cold = reading.temperature < MIN_TEMP_C;
        AutomationDecision::when(
            cold,
            format!(
                "Temperature {}°C {} {}°C",
                reading.temperature,
                if cold { "<" } else { ">=" },
                MIN_TEMP_C
            ),
        )
    }
}

/// Runs below 40% relative humidity regardless of stage.
pub struct HumidifierController;

impl DeviceController for HumidifierController {
    fn device_type(&self) -> DeviceType {
        DeviceType::Humidifier
    }

    fn evaluate(&self, ctx: &AutomationContext) -> AutomationDecision {
        let Some(reading) = ctx.sensor else {
            return AutomationDecision::off(NO_SENSOR_DATA);
        };

        let dry = reading.humidity < MIN_HUMIDITY;
        AutomationDecision::when(
            dry,
            format!(
                "Humidity {}% {} {}%",
                reading.humidity,
                if dry { "<" } else { ">=" },
                MIN_HUMIDITY
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Device, GrowthStage, SensorReading};

    fn ctx<'a>(device: &'a Device, reading: Option<&'a SensorReading>) -> AutomationContext<'a> {
        AutomationContext {
            device,
            stage: GrowthStage::Vegetative,
            sensor: reading,
            hour: 3,
        }
    }

    #[test]
    fn heater_below_twenty() {
        let heater = Device::new("Heater", DeviceType::Heater);
        let cold = SensorReading::new(18.5, 50.0, 300.0);
        let decision = HeaterController.evaluate(&ctx(&heater, Some(&cold)));
        assert!(decision.should_be_on);
        assert_eq!(decision.reason, "Temperature 18.5°C < 20°C");

        let warm = SensorReading::new(20.0, 50.0, 300.0);
        let decision = HeaterController.evaluate(&ctx(&heater, Some(&warm)));
        assert!(!decision.should_be_on);
        assert_eq!(decision.reason, "Temperature 20°C >= 20°C");
    }

    #[test]
    fn humidifier_below_forty() {
        let humidifier = Device::new("Humidifier", DeviceType::Humidifier);
        let dry = SensorReading::new(24.0, 35.0, 300.0);
        let decision = HumidifierController.evaluate(&ctx(&humidifier, Some(&dry)));
        assert!(decision.should_be_on);
        assert_eq!(decision.reason, "Humidity 35% < 40%");

        let humid = SensorReading::new(24.0, 40.0, 300.0);
        assert!(!HumidifierController
            .evaluate(&ctx(&humidifier, Some(&humid)))
            .should_be_on);
    }

    #[test]
    fn no_reading_keeps_climate_devices_off() {
        let heater = Device::new("Heater", DeviceType::Heater);
        let humidifier = Device::new("Humidifier", DeviceType::Humidifier);
        assert!(!HeaterController.evaluate(&ctx(&heater, None)).should_be_on);
        assert_eq!(
            HumidifierController.evaluate(&ctx(&humidifier, None)).reason,
            "No sensor data available"
        );
    }
}
