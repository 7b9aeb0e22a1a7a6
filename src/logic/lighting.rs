use super::tables::{light_distances, DistanceRow, IntensityBucket, WattageTier, INTENSITY_TABLE};
use crate::models::{GrowthStage, IntensityRecommendation, LightDistance, PowerCategory};
use std::cmp::Ordering;

const CM_PER_INCH: f64 = 2.54;

/// Photon efficacy assumed for a quality LED fixture, μmol/J.
const LED_EFFICACY: f64 = 2.5;

const FALLBACK_INTENSITY: u32 = 50;

/// Recommend how far above the canopy to hang a light.
///
/// Wattage picks the bucket (≤100 W low, ≤300 W medium, otherwise high) and
/// the stage picks the distance row.
pub fn calculate_light_distance(wattage: f64, stage: GrowthStage) -> LightDistance {
    let distances = light_distances(stage);

    let (category, distance) = if wattage <= 100.0 {
        (PowerCategory::Low, distances.low)
    } else if wattage <= 300.0 {
        (PowerCategory::Med, distances.med)
    } else {
        (PowerCategory::High, distances.high)
    };

    LightDistance {
        distance,
        category,
        reason: format!(
            "{}W light in {} stage: {} intensity setup",
            wattage, stage, category
        ),
    }
}

/// Recommend a dimmer setting for a light at a given height.
///
/// Looks up the nearest tabulated wattage, then the nearest tabulated
/// height (in whole inches) for that wattage, and takes the middle of the
/// stage's range. Falls back to 50% when no cell matches.
pub fn calculate_recommended_intensity(
    wattage: f64,
    distance_cm: f64,
    stage: GrowthStage,
    is_dimmable: bool,
) -> IntensityRecommendation {
    if !is_dimmable {
        return IntensityRecommendation {
            intensity: 100,
            reason: "Non-dimmable light at full power".to_string(),
            ppfd: 0,
        };
    }

    if distance_cm.is_nan() || distance_cm <= 0.0 {
        return no_data(format!("No data available for {}cm distance", distance_cm));
    }

    let distance_in = (distance_cm / CM_PER_INCH).round() as i64;

    let Some(tier) = nearest_tier(wattage) else {
        return no_data(format!("No data available for {}W", wattage));
    };

    let Some(row) = nearest_row(tier, distance_in) else {
        return no_data(format!("No data available for {}cm distance", distance_cm));
    };

    let range = row.range(IntensityBucket::from_stage(stage));
    let intensity = range.midpoint();
    let ppfd = estimate_ppfd(wattage, distance_cm, intensity);

    let mut reason = format!(
        "{}% ({}–{}%) for {}W at {}\" in {} stage",
        intensity, range.min, range.max, wattage, distance_in, stage
    );
    if f64::from(tier.watts) != wattage {
        reason.push_str(&format!(" (based on {}W)", tier.watts));
    }

    IntensityRecommendation {
        intensity,
        reason,
        ppfd,
    }
}

/// Rough canopy PPFD: fixture output spread over a disc whose radius is the
/// hanging distance, scaled by the dimmer setting.
pub fn estimate_ppfd(wattage: f64, distance_cm: f64, intensity: u32) -> u64 {
    if distance_cm <= 0.0 || wattage <= 0.0 {
        return 0;
    }
    let max_ppfd = wattage * LED_EFFICACY * 1_000_000.0 / (distance_cm * distance_cm * std::f64::consts::PI);
    (max_ppfd * f64::from(intensity) / 100.0).round() as u64
}

fn no_data(reason: String) -> IntensityRecommendation {
    tracing::debug!(%reason, "No intensity table match");
    IntensityRecommendation {
        intensity: FALLBACK_INTENSITY,
        reason,
        ppfd: 0,
    }
}

// Ties resolve to the earlier (smaller) key since `min_by` keeps the first minimum.
fn nearest_tier(wattage: f64) -> Option<&'static WattageTier> {
    INTENSITY_TABLE.iter().min_by(|a, b| {
        let da = (f64::from(a.watts) - wattage).abs();
        let db = (f64::from(b.watts) - wattage).abs();
        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
    })
}

fn nearest_row(tier: &WattageTier, distance_in: i64) -> Option<&DistanceRow> {
    tier.rows
        .iter()
        .min_by_key(|row| (i64::from(row.inches) - distance_in).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_buckets_by_wattage() {
        let low = calculate_light_distance(100.0, GrowthStage::Seed);
        assert_eq!(low.category, PowerCategory::Low);
        assert_eq!(low.distance, 60);

        let med = calculate_light_distance(250.0, GrowthStage::Flowering);
        assert_eq!(med.category, PowerCategory::Med);
        assert_eq!(med.distance, 20);

        let high = calculate_light_distance(301.0, GrowthStage::Flowering);
        assert_eq!(high.category, PowerCategory::High);
        assert_eq!(high.distance, 15);
    }

    #[test]
    fn distance_reason_names_inputs() {
        let rec = calculate_light_distance(600.0, GrowthStage::Vegetative);
        assert_eq!(rec.distance, 20);
        assert_eq!(rec.reason, "600W light in vegetative stage: high intensity setup");
    }

    #[test]
    fn distance_uses_vegetative_row_for_other_stages() {
        let seedling = calculate_light_distance(200.0, GrowthStage::Seedling);
        let harvest = calculate_light_distance(200.0, GrowthStage::Harvest);
        assert_eq!(seedling.distance, 30);
        assert_eq!(harvest.distance, 30);
    }

    #[test]
    fn intensity_non_dimmable_runs_full_power() {
        let rec = calculate_recommended_intensity(400.0, 45.7, GrowthStage::Vegetative, false);
        assert_eq!(rec.intensity, 100);
        assert_eq!(rec.ppfd, 0);
        assert_eq!(rec.reason, "Non-dimmable light at full power");
    }

    #[test]
    fn intensity_exact_table_cell() {
        let rec = calculate_recommended_intensity(400.0, 45.7, GrowthStage::Vegetative, true);
        assert_eq!(rec.intensity, 50);
        assert!(rec.reason.starts_with("50% (40–60%) for 400W at 18\""));
        assert!(rec.reason.contains("vegetative stage"));
        assert!(!rec.reason.contains("based on"));
        // 1e9 / (45.7² π) ≈ 152_412 at full power
        assert!((76_000..76_500).contains(&rec.ppfd), "ppfd was {}", rec.ppfd);
    }

    #[test]
    fn intensity_seed_uses_seedling_column() {
        let rec = calculate_recommended_intensity(100.0, 30.48, GrowthStage::Seed, true);
        // 12" row, seedling range 20-30
        assert_eq!(rec.intensity, 25);
    }

    #[test]
    fn intensity_nearest_wattage_is_noted() {
        let rec = calculate_recommended_intensity(450.0, 61.0, GrowthStage::Flowering, true);
        // 450W -> 400W tier, 61cm -> 24", flowering 80-100
        assert_eq!(rec.intensity, 90);
        assert!(rec.reason.ends_with("(based on 400W)"));
    }

    #[test]
    fn intensity_wattage_tie_prefers_smaller_tier() {
        let rec = calculate_recommended_intensity(350.0, 30.48, GrowthStage::Vegetative, true);
        // 300W tier, 12" row, vegetative 30-40
        assert_eq!(rec.intensity, 35);
        assert!(rec.reason.contains("(based on 300W)"));
    }

    #[test]
    fn intensity_distance_snaps_to_available_rows() {
        // 800W only has a 24" row, so a 12" hang still uses it
        let rec = calculate_recommended_intensity(800.0, 30.0, GrowthStage::Vegetative, true);
        assert_eq!(rec.intensity, 40);
        assert!(rec.reason.contains("at 12\""));
    }

    #[test]
    fn intensity_beyond_table_uses_largest_tier() {
        let rec = calculate_recommended_intensity(1500.0, 76.2, GrowthStage::Harvest, true);
        // 1000W tier, 30" row, flowering column
        assert_eq!(rec.intensity, 100);
        assert!(rec.reason.contains("(based on 1000W)"));
    }

    #[test]
    fn intensity_invalid_distance_falls_back() {
        let rec = calculate_recommended_intensity(400.0, 0.0, GrowthStage::Vegetative, true);
        assert_eq!(rec.intensity, 50);
        assert_eq!(rec.ppfd, 0);
        assert!(rec.reason.starts_with("No data available"));
    }

    #[test]
    fn ppfd_scales_with_intensity() {
        let full = estimate_ppfd(200.0, 30.0, 100);
        let half = estimate_ppfd(200.0, 30.0, 50);
        assert!(full > 0);
        assert!((full as i64 - 2 * half as i64).abs() <= 1);
        assert_eq!(estimate_ppfd(200.0, 0.0, 100), 0);
    }
}
