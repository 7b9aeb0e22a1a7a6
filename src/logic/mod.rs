pub mod automation;
pub mod lighting;
pub mod plant_run;
pub mod schedule;
pub mod tables;

pub use automation::AutomationEngine;
pub use plant_run::{run_plant_automation, AutomationRun, DeviceOutcome};
