use crate::db::Database;
use crate::error::{GrowOpsError, Result};
use crate::models::{
    CalendarEvent, CalendarEventDraft, GrowthStage, Plant, ScheduleStart, StageTask,
};
use chrono::{Duration, NaiveDate};

const fn task(day_offset: u32, task: &'static str, stage: GrowthStage) -> StageTask {
    StageTask {
        day_offset,
        task,
        stage,
    }
}

use GrowthStage::{Flowering, Harvest, Seed, Seedling, Vegetative};

/// Full seed-to-harvest care program. Offsets are days from germination
/// and the list is ordered by offset.
pub static GROW_TEMPLATE: &[StageTask] = &[
    // Germination
    task(0, "Germinate seeds in paper towel method", Seed),
    task(2, "Check for taproot emergence", Seed),
    task(5, "Plant sprouted seeds in starter medium", Seed),
    // Seedling
    task(7, "First watering - pH 6.0-6.5, light misting", Seedling),
    task(10, "Monitor for first true leaves", Seedling),
    task(14, "Begin weak nutrients (200-400 PPM)", Seedling),
    task(17, "Increase light to 18/6 schedule", Seedling),
    task(21, "Transplant to 1-gallon containers", Seedling),
    // Early vegetative
    task(24, "Water/feed cycle - nutrients 400-600 PPM", Vegetative),
    task(28, "First topping for bushier growth", Vegetative),
    task(31, "Monitor for pest issues - neem oil spray", Vegetative),
    task(35, "Increase nutrients to 600-800 PPM", Vegetative),
    task(38, "LST (Low Stress Training) begins", Vegetative),
    task(42, "Transplant to final containers (3-5 gallon)", Vegetative),
    // Mid vegetative
    task(45, "Full strength veg nutrients (800-1000 PPM)", Vegetative),
    task(49, "Defoliation - remove lower fan leaves", Vegetative),
    task(52, "SCROG setup if using (Screen of Green)", Vegetative),
    task(56, "Final vegetative feeding", Vegetative),
    // Pre-flower transition
    task(58, "Switch to 12/12 light cycle", Flowering),
    task(60, "Begin transition nutrients (lower N, higher P-K)", Flowering),
    task(63, "Watch for first pistils (flower sites)", Flowering),
    // Early flowering
    task(66, "Full flowering nutrients (1000-1200 PPM)", Flowering),
    task(70, "Remove male plants if not feminized", Flowering),
    task(73, "Lollipop lower branches (remove small buds)", Flowering),
    task(77, "Monitor for nutrient burn - adjust if needed", Flowering),
    task(80, "Increase P-K nutrients for bud development", Flowering),
    task(84, "Check trichomes with jeweler's loupe", Flowering),
    // Late flowering
    task(87, "Reduce nitrogen further, max P-K", Flowering),
    task(91, "Monitor trichomes - 10% amber for head high", Flowering),
    task(94, "Check for bud rot and powdery mildew", Flowering),
    task(98, "Begin flushing with pH'd water only", Flowering),
    task(101, "Trichomes 20-30% amber for body effect", Flowering),
    task(105, "Final flush - 48 hours darkness before harvest", Flowering),
    // Harvest, dry and cure
    task(107, "Harvest when trichomes are 30% amber", Harvest),
    task(108, "Wet trim fan leaves and sugar leaves", Harvest),
    task(109, "Hang dry in 60°F, 60% humidity, dark room", Harvest),
    task(115, "Check drying - stems should snap, not bend", Harvest),
    task(117, "Begin curing in airtight jars", Harvest),
    task(124, "Burp jars daily for first week of cure", Harvest),
    task(131, "Burp jars every 2-3 days", Harvest),
    task(145, "Optimal cure complete", Harvest),
];

/// Template entries belonging to exactly one stage.
pub fn tasks_for_stage(stage: GrowthStage) -> Vec<StageTask> {
    GROW_TEMPLATE
        .iter()
        .filter(|t| t.stage == stage)
        .copied()
        .collect()
}

/// Dated tasks for one stage only, the first landing on `start_date`.
pub fn generate_stage_schedule(stage: GrowthStage, start_date: NaiveDate) -> Vec<CalendarEventDraft> {
    schedule_from_template(&tasks_for_stage(stage), ScheduleStart::Stage(stage), start_date)
}

/// Turn the care template into dated tasks.
///
/// Keeps every entry at or after `start` and shifts the offsets so the
/// earliest kept entry lands on `start_date`.
pub fn generate_schedule(start: ScheduleStart, start_date: NaiveDate) -> Vec<CalendarEventDraft> {
    schedule_from_template(GROW_TEMPLATE, start, start_date)
}

/// Like [`generate_schedule`] but for an unvalidated stage name. Unknown
/// names produce an empty schedule.
pub fn generate_schedule_str(start: &str, start_date: NaiveDate) -> Vec<CalendarEventDraft> {
    match ScheduleStart::from_str(start) {
        Some(start) => generate_schedule(start, start_date),
        None => {
            tracing::warn!(stage = %start, "Unknown schedule start stage, nothing generated");
            Vec::new()
        }
    }
}

pub fn schedule_from_template(
    template: &[StageTask],
    start: ScheduleStart,
    start_date: NaiveDate,
) -> Vec<CalendarEventDraft> {
    let selected: Vec<&StageTask> = template.iter().filter(|t| start.includes(t.stage)).collect();

    let min_offset = selected.iter().map(|t| t.day_offset).min().unwrap_or(0);

    selected
        .into_iter()
        .map(|t| CalendarEventDraft {
            date: start_date + Duration::days(i64::from(t.day_offset - min_offset)),
            task: t.task.to_string(),
            completed: false,
            stage: t.stage,
        })
        .collect()
}

/// Storage seam for calendar regeneration.
///
/// Regeneration is two-phase: every event of the plant is removed, then the
/// new batch is inserted. Stores that support transactions should override
/// [`CalendarStore::replace_plant_events`] so both phases commit together.
pub trait CalendarStore {
    fn clear_plant_events(&self, plant_id: i64) -> Result<usize>;

    fn insert_plant_events(&self, plant_id: i64, drafts: &[CalendarEventDraft]) -> Result<usize>;

    fn replace_plant_events(&self, plant_id: i64, drafts: &[CalendarEventDraft]) -> Result<usize> {
        self.clear_plant_events(plant_id)?;
        self.insert_plant_events(plant_id, drafts)
    }
}

/// Replace a plant's calendar with a freshly generated one.
pub fn regenerate_calendar<S: CalendarStore>(
    store: &S,
    plant_id: i64,
    start: ScheduleStart,
    start_date: NaiveDate,
) -> Result<Vec<CalendarEventDraft>> {
    let drafts = generate_schedule(start, start_date);
    let inserted = store.replace_plant_events(plant_id, &drafts)?;
    tracing::info!(
        plant_id,
        %start,
        %start_date,
        inserted,
        "Regenerated calendar"
    );
    Ok(drafts)
}

/// Move a plant to its next stage and rebuild its calendar from `today`.
///
/// Any edits made to the previous calendar are discarded.
pub fn advance_plant_stage(
    db: &Database,
    plant_id: i64,
    today: NaiveDate,
) -> Result<(Plant, Vec<CalendarEvent>)> {
    let mut plant = db
        .get_plant(plant_id)?
        .ok_or_else(|| GrowOpsError::NotFound(format!("Plant {}", plant_id)))?;

    let next = plant.stage.next().ok_or_else(|| {
        GrowOpsError::StageAdvance(format!(
            "Plant {} is already at {} and cannot advance further",
            plant_id, plant.stage
        ))
    })?;

    let drafts = generate_schedule(ScheduleStart::Stage(next), today);
    db.advance_plant(plant_id, next, &drafts)?;
    plant.stage = next;

    tracing::info!(plant_id, stage = %next, events = drafts.len(), "Advanced plant stage");

    let events = db.get_calendar_events(plant_id)?;
    Ok((plant, events))
}
