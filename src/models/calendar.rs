use super::stage::GrowthStage;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the care template. `day_offset` counts from day 0 of a
/// full seed-to-harvest program, not from any particular plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTask {
    pub day_offset: u32,
    pub task: &'static str,
    pub stage: GrowthStage,
}

/// A dated task produced by the schedule generator, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventDraft {
    pub date: NaiveDate,
    pub task: String,
    pub completed: bool,
    pub stage: GrowthStage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Option<i64>,
    pub plant_id: i64,
    pub date: NaiveDate,
    pub task: String,
    pub completed: bool,
    pub stage: GrowthStage,
    pub created_at: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn from_draft(plant_id: i64, draft: CalendarEventDraft) -> Self {
        Self {
            id: None,
            plant_id,
            date: draft.date,
            task: draft.task,
            completed: draft.completed,
            stage: draft.stage,
            created_at: Utc::now(),
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.date < today
    }
}
