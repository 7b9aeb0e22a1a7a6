use serde::{Deserialize, Serialize};

/// Plant lifecycle stage, in growing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    Seed,
    Seedling,
    Vegetative,
    Flowering,
    Harvest,
}

impl GrowthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Seed => "seed",
            GrowthStage::Seedling => "seedling",
            GrowthStage::Vegetative => "vegetative",
            GrowthStage::Flowering => "flowering",
            GrowthStage::Harvest => "harvest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "seed" | "germination" => Some(GrowthStage::Seed),
            "seedling" => Some(GrowthStage::Seedling),
            "vegetative" | "veg" => Some(GrowthStage::Vegetative),
            "flowering" | "flower" | "bloom" => Some(GrowthStage::Flowering),
            "harvest" => Some(GrowthStage::Harvest),
            _ => None,
        }
    }

    /// Position in the lifecycle, seed = 0.
    pub fn index(&self) -> usize {
        match self {
            GrowthStage::Seed => 0,
            GrowthStage::Seedling => 1,
            GrowthStage::Vegetative => 2,
            GrowthStage::Flowering => 3,
            GrowthStage::Harvest => 4,
        }
    }

    /// The stage a plant moves to when advanced. `None` once harvested.
    pub fn next(&self) -> Option<Self> {
        match self {
            GrowthStage::Seed => Some(GrowthStage::Seedling),
            GrowthStage::Seedling => Some(GrowthStage::Vegetative),
            GrowthStage::Vegetative => Some(GrowthStage::Flowering),
            GrowthStage::Flowering => Some(GrowthStage::Harvest),
            GrowthStage::Harvest => None,
        }
    }

    pub fn all() -> &'static [GrowthStage] {
        &[
            GrowthStage::Seed,
            GrowthStage::Seedling,
            GrowthStage::Vegetative,
            GrowthStage::Flowering,
            GrowthStage::Harvest,
        ]
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a generated calendar begins: at a given stage, or from the very
/// start of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScheduleStart {
    Stage(GrowthStage),
    Complete,
}

impl ScheduleStart {
    pub fn from_str(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("complete") {
            return Some(ScheduleStart::Complete);
        }
        GrowthStage::from_str(s).map(ScheduleStart::Stage)
    }

    /// Whether a template entry of `stage` belongs in a schedule starting here.
    pub fn includes(&self, stage: GrowthStage) -> bool {
        match self {
            ScheduleStart::Complete => true,
            ScheduleStart::Stage(start) => stage.index() >= start.index(),
        }
    }
}

impl From<GrowthStage> for ScheduleStart {
    fn from(stage: GrowthStage) -> Self {
        ScheduleStart::Stage(stage)
    }
}

impl TryFrom<String> for ScheduleStart {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s).ok_or_else(|| format!("unknown schedule start '{}'", s))
    }
}

impl From<ScheduleStart> for String {
    fn from(start: ScheduleStart) -> Self {
        start.to_string()
    }
}

impl std::fmt::Display for ScheduleStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleStart::Stage(stage) => write!(f, "{}", stage),
            ScheduleStart::Complete => write!(f, "complete"),
        }
    }
}
