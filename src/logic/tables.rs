//! Static agronomic tables shared by the automation engine and the light
//! placement calculator. Every lookup is total: stages without a dedicated
//! row fall back to the vegetative values.

use crate::models::GrowthStage;

/// Daily photoperiod for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSchedule {
    pub hours_on: u32,
    pub reason: &'static str,
}

pub fn light_schedule(stage: GrowthStage) -> LightSchedule {
    match stage {
        GrowthStage::Seed => LightSchedule {
            hours_on: 16,
            reason: "16/8 cycle for seed development",
        },
        GrowthStage::Seedling => LightSchedule {
            hours_on: 18,
            reason: "18/6 cycle for seedling development",
        },
        GrowthStage::Vegetative => LightSchedule {
            hours_on: 18,
            reason: "18/6 cycle for vegetative growth",
        },
        GrowthStage::Flowering => LightSchedule {
            hours_on: 12,
            reason: "12/12 cycle to trigger flowering",
        },
        GrowthStage::Harvest => LightSchedule {
            hours_on: 0,
            reason: "No lighting needed during harvest",
        },
    }
}

/// Soil moisture band in raw sensor units. Watering starts below `dry`;
/// `moist` is the upper end of the healthy range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoistureThresholds {
    pub dry: u32,
    pub moist: u32,
}

const VEGETATIVE_MOISTURE: MoistureThresholds = MoistureThresholds {
    dry: 300,
    moist: 450,
};

pub fn moisture_thresholds(stage: GrowthStage) -> MoistureThresholds {
    match stage {
        GrowthStage::Seed => MoistureThresholds {
            dry: 400,
            moist: 500,
        },
        GrowthStage::Flowering => MoistureThresholds {
            dry: 250,
            moist: 400,
        },
        _ => VEGETATIVE_MOISTURE,
    }
}

/// Mounting distances in cm for low, medium and high power lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceTriple {
    pub low: u32,
    pub med: u32,
    pub high: u32,
}

const VEGETATIVE_DISTANCES: DistanceTriple = DistanceTriple {
    low: 45,
    med: 30,
    high: 20,
};

pub fn light_distances(stage: GrowthStage) -> DistanceTriple {
    match stage {
        GrowthStage::Seed => DistanceTriple {
            low: 60,
            med: 45,
            high: 30,
        },
        GrowthStage::Flowering => DistanceTriple {
            low: 30,
            med: 20,
            high: 15,
        },
        _ => VEGETATIVE_DISTANCES,
    }
}

/// Coarse stage grouping used by the dimming table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityBucket {
    Seedling,
    Vegetative,
    Flowering,
}

impl IntensityBucket {
    pub fn from_stage(stage: GrowthStage) -> Self {
        match stage {
            GrowthStage::Seed | GrowthStage::Seedling => IntensityBucket::Seedling,
            GrowthStage::Vegetative => IntensityBucket::Vegetative,
            GrowthStage::Flowering | GrowthStage::Harvest => IntensityBucket::Flowering,
        }
    }
}

/// Inclusive dimmer range in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityRange {
    pub min: u32,
    pub max: u32,
}

impl IntensityRange {
    pub fn midpoint(&self) -> u32 {
        ((self.min + self.max) as f64 / 2.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DistanceRow {
    pub inches: u32,
    pub seedling: IntensityRange,
    pub vegetative: IntensityRange,
    pub flowering: IntensityRange,
}

impl DistanceRow {
    pub fn range(&self, bucket: IntensityBucket) -> IntensityRange {
        match bucket {
            IntensityBucket::Seedling => self.seedling,
            IntensityBucket::Vegetative => self.vegetative,
            IntensityBucket::Flowering => self.flowering,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WattageTier {
    pub watts: u32,
    pub rows: &'static [DistanceRow],
}

const fn row(inches: u32, seedling: (u32, u32), veg: (u32, u32), flower: (u32, u32)) -> DistanceRow {
    DistanceRow {
        inches,
        seedling: IntensityRange {
            min: seedling.0,
            max: seedling.1,
        },
        vegetative: IntensityRange {
            min: veg.0,
            max: veg.1,
        },
        flowering: IntensityRange {
            min: flower.0,
            max: flower.1,
        },
    }
}

/// Recommended dimmer ranges by fixture wattage and hanging height (inches).
/// Tiers and rows are sorted ascending; nearest-match lookups rely on it.
pub static INTENSITY_TABLE: &[WattageTier] = &[
    WattageTier {
        watts: 100,
        rows: &[
            row(12, (20, 30), (50, 60), (80, 100)),
            row(18, (30, 40), (60, 70), (100, 100)),
        ],
    },
    WattageTier {
        watts: 200,
        rows: &[
            row(12, (15, 25), (40, 50), (70, 90)),
            row(18, (25, 35), (60, 60), (100, 100)),
        ],
    },
    WattageTier {
        watts: 300,
        rows: &[
            row(12, (10, 20), (30, 40), (60, 80)),
            row(18, (20, 30), (50, 60), (100, 100)),
        ],
    },
    WattageTier {
        watts: 400,
        rows: &[
            row(12, (10, 15), (25, 35), (50, 75)),
            row(18, (20, 30), (40, 60), (80, 100)),
            row(24, (20, 30), (40, 60), (80, 100)),
        ],
    },
    WattageTier {
        watts: 600,
        rows: &[
            row(18, (10, 10), (30, 40), (60, 80)),
            row(24, (15, 25), (50, 50), (100, 100)),
        ],
    },
    WattageTier {
        watts: 800,
        rows: &[row(24, (10, 20), (30, 50), (70, 90))],
    },
    WattageTier {
        watts: 1000,
        rows: &[
            row(24, (10, 15), (25, 40), (60, 90)),
            row(30, (15, 25), (50, 60), (100, 100)),
        ],
    },
];
