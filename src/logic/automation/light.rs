use super::{AutomationContext, DeviceController};
use crate::logic::lighting::{calculate_light_distance, calculate_recommended_intensity};
use crate::logic::tables::light_schedule;
use crate::models::{AutomationDecision, DeviceType};

pub const DEFAULT_LIGHT_START_HOUR: u32 = 6;

/// Photoperiod control for grow lights.
///
/// Lights come on at `start_hour` and stay on for the stage's photoperiod,
/// wrapping past midnight when needed. Lights with a known wattage also get
/// a hanging distance recommendation, and dimmable lights with a known
/// distance a dimmer setting.
pub struct LightController {
    start_hour: u32,
}

impl LightController {
    pub fn new(start_hour: u32) -> Self {
        Self {
            start_hour: start_hour % 24,
        }
    }

    /// Whether `hour` falls inside the on-window. Start is inclusive, end exclusive.
    pub fn is_day(&self, hours_on: u32, hour: u32) -> bool {
        let start = self.start_hour;
        let end = (start + hours_on) % 24;

        if start <= end {
            hour >= start && hour < end
        } else {
            hour >= start || hour < end
        }
    }
}

impl Default for LightController {
    fn default() -> Self {
        Self::new(DEFAULT_LIGHT_START_HOUR)
    }
}

impl DeviceController for LightController {
    fn device_type(&self) -> DeviceType {
        DeviceType::Light
    }

    fn evaluate(&self, ctx: &AutomationContext) -> AutomationDecision {
        let schedule = light_schedule(ctx.stage);
        let should_be_on = self.is_day(schedule.hours_on, ctx.hour);

        let decision = AutomationDecision::when(
            should_be_on,
            format!(
                "{}. Currently {} period.",
                schedule.reason,
                if should_be_on { "day" } else { "night" }
            ),
        );

        let Some(wattage) = ctx.device.wattage.filter(|w| *w > 0.0) else {
            return decision;
        };

        let placement = calculate_light_distance(wattage, ctx.stage);
        let mut recommendation = format!(
            "Recommended distance: {}cm. {}",
            placement.distance, placement.reason
        );

        if let (true, Some(distance)) = (ctx.device.is_dimmable, ctx.device.distance_from_plant) {
            let intensity = calculate_recommended_intensity(wattage, distance, ctx.stage, true);
            recommendation.push_str(&format!(
                ". Recommended intensity: {}, currently {}%",
                intensity.reason, ctx.device.current_intensity
            ));
        }

        decision.with_recommendation(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Device, GrowthStage};

    fn evaluate(device: &Device, stage: GrowthStage, hour: u32) -> AutomationDecision {
        let ctx = AutomationContext {
            device,
            stage,
            sensor: None,
            hour,
        };
        LightController::default().evaluate(&ctx)
    }

    #[test]
    fn flowering_window_is_six_to_eighteen() {
        let light = Device::new("LED", DeviceType::Light);
        assert!(evaluate(&light, GrowthStage::Flowering, 10).should_be_on);
        assert!(evaluate(&light, GrowthStage::Flowering, 6).should_be_on);
        assert!(!evaluate(&light, GrowthStage::Flowering, 18).should_be_on);
        assert!(!evaluate(&light, GrowthStage::Flowering, 20).should_be_on);
        assert!(!evaluate(&light, GrowthStage::Flowering, 5).should_be_on);
    }

    #[test]
    fn vegetative_window_ends_at_midnight() {
        let light = Device::new("LED", DeviceType::Light);
        assert!(evaluate(&light, GrowthStage::Vegetative, 23).should_be_on);
        assert!(!evaluate(&light, GrowthStage::Vegetative, 0).should_be_on);
        assert!(!evaluate(&light, GrowthStage::Vegetative, 5).should_be_on);
    }

    #[test]
    fn window_wraps_past_midnight() {
        let controller = LightController::new(18);
        // 18h from 18:00 ends at 12:00 the next day
        assert!(controller.is_day(18, 23));
        assert!(controller.is_day(18, 3));
        assert!(controller.is_day(18, 11));
        assert!(!controller.is_day(18, 12));
        assert!(!controller.is_day(18, 17));
    }

    #[test]
    fn harvest_keeps_lights_off() {
        let light = Device::new("LED", DeviceType::Light);
        for hour in 0..24 {
            assert!(!evaluate(&light, GrowthStage::Harvest, hour).should_be_on);
        }
    }

    #[test]
    fn reason_names_schedule_and_period() {
        let light = Device::new("LED", DeviceType::Light);
        let day = evaluate(&light, GrowthStage::Seed, 8);
        assert_eq!(day.reason, "16/8 cycle for seed development. Currently day period.");
        let night = evaluate(&light, GrowthStage::Seed, 23);
        assert_eq!(night.reason, "16/8 cycle for seed development. Currently night period.");
        assert!(day.recommendation.is_none());
    }

    #[test]
    fn wattage_adds_placement_recommendation() {
        let light = Device::new("LED", DeviceType::Light).with_wattage(600.0);
        let decision = evaluate(&light, GrowthStage::Flowering, 10);
        assert_eq!(
            decision.recommendation.as_deref(),
            Some("Recommended distance: 15cm. 600W light in flowering stage: high intensity setup")
        );
    }

    #[test]
    fn zero_wattage_gets_no_recommendation() {
        let light = Device::new("LED", DeviceType::Light).with_wattage(0.0);
        assert!(evaluate(&light, GrowthStage::Vegetative, 10)
            .recommendation
            .is_none());
    }

    #[test]
    fn dimmable_light_at_known_distance_gets_intensity() {
        let light = Device::new("LED", DeviceType::Light)
            .with_wattage(400.0)
            .with_distance(45.7)
            .dimmable(80);
        let decision = evaluate(&light, GrowthStage::Vegetative, 10);
        assert_eq!(
            decision.recommendation.as_deref(),
            Some(
                "Recommended distance: 20cm. 400W light in vegetative stage: high intensity setup. \
                 Recommended intensity: 50% (40–60%) for 400W at 18\" in vegetative stage, currently 80%"
            )
        );
    }

    #[test]
    fn fixed_output_light_gets_distance_only() {
        let light = Device::new("LED", DeviceType::Light)
            .with_wattage(400.0)
            .with_distance(45.7);
        let decision = evaluate(&light, GrowthStage::Vegetative, 10);
        let recommendation = decision.recommendation.unwrap();
        assert!(!recommendation.contains("intensity:"));
        assert!(recommendation.starts_with("Recommended distance: 20cm."));
    }
}
