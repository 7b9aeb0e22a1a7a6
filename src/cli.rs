use crate::models::{DeviceType, GrowthStage, ScheduleStart};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "growops",
    version,
    about = "Grow calendars, device automation and light placement"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a care calendar from a stage (or `complete`)
    Schedule {
        #[arg(value_parser = parse_schedule_start)]
        start: ScheduleStart,
        /// First calendar day, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Replace this plant's stored calendar with the result
        #[arg(long)]
        plant: Option<i64>,
        /// Only the tasks of the start stage, not the stages after it
        #[arg(long)]
        only_stage: bool,
    },
    /// Move a plant to its next stage and rebuild its calendar
    Advance {
        plant_id: i64,
        /// Day the new stage begins, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List a plant's calendar
    Calendar { plant_id: i64 },
    /// Mark a calendar event done
    Complete { event_id: i64 },
    /// Evaluate and apply automation for every device serving a plant
    Automate {
        plant_id: i64,
        /// Hour of day to evaluate at, defaults to the local hour
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },
    /// Ad-hoc decision for a device that is not stored
    Evaluate(EvaluateArgs),
    /// Light placement helpers
    Light {
        #[command(subcommand)]
        command: LightCommands,
    },
    /// Manage plants
    Plant {
        #[command(subcommand)]
        command: PlantCommands,
    },
    /// Manage devices
    Device {
        #[command(subcommand)]
        command: DeviceCommands,
    },
    /// Record sensor readings
    Reading {
        #[command(subcommand)]
        command: ReadingCommands,
    },
    /// Validate config and storage
    Check,
}

#[derive(Args)]
pub struct EvaluateArgs {
    #[arg(long = "type", value_parser = parse_device_type)]
    pub device_type: DeviceType,
    #[arg(long, value_parser = parse_stage)]
    pub stage: GrowthStage,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: Option<u32>,
    /// Temperature in °C; a reading needs all three sensor values
    #[arg(long, requires_all = ["humidity", "moisture"])]
    pub temp: Option<f64>,
    #[arg(long, requires_all = ["temp", "moisture"])]
    pub humidity: Option<f64>,
    #[arg(long, requires_all = ["temp", "humidity"])]
    pub moisture: Option<f64>,
    #[arg(long)]
    pub wattage: Option<f64>,
    /// Distance from canopy in cm
    #[arg(long)]
    pub distance: Option<f64>,
    #[arg(long)]
    pub dimmable: bool,
}

#[derive(Subcommand)]
pub enum LightCommands {
    /// Recommended hanging distance for a wattage and stage
    Distance {
        wattage: f64,
        #[arg(value_parser = parse_stage)]
        stage: GrowthStage,
    },
    /// Recommended dimmer setting
    Intensity {
        wattage: f64,
        /// Distance from canopy in cm
        distance: f64,
        #[arg(value_parser = parse_stage)]
        stage: GrowthStage,
        #[arg(long)]
        not_dimmable: bool,
    },
}

#[derive(Subcommand)]
pub enum PlantCommands {
    /// Add a plant and generate its calendar
    Add {
        name: String,
        #[arg(long, value_parser = parse_stage, default_value = "seed")]
        stage: GrowthStage,
        /// Defaults to today
        #[arg(long)]
        planted: Option<NaiveDate>,
        /// Device group sharing devices and sensors
        #[arg(long)]
        group: Option<String>,
        /// Skip calendar generation
        #[arg(long)]
        no_calendar: bool,
    },
    /// List plants
    List,
}

#[derive(Subcommand)]
pub enum DeviceCommands {
    /// Add a device
    Add {
        name: String,
        #[arg(long = "type", value_parser = parse_device_type)]
        device_type: DeviceType,
        #[arg(long, conflicts_with = "group")]
        plant: Option<i64>,
        #[arg(long)]
        group: Option<String>,
        /// Let automation switch the device
        #[arg(long)]
        auto: bool,
        #[arg(long)]
        wattage: Option<f64>,
        /// Distance from canopy in cm
        #[arg(long)]
        distance: Option<f64>,
        /// Dimmable light starting at this intensity (10-100)
        #[arg(long)]
        dimmable: Option<u8>,
    },
}

#[derive(Subcommand)]
pub enum ReadingCommands {
    /// Store a reading for a plant or a device group
    Add {
        #[arg(long, required_unless_present = "group", conflicts_with = "group")]
        plant: Option<i64>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        temp: f64,
        #[arg(long)]
        humidity: f64,
        #[arg(long)]
        moisture: f64,
    },
}

fn parse_stage(s: &str) -> Result<GrowthStage, String> {
    GrowthStage::from_str(s).ok_or_else(|| {
        format!(
            "unknown stage '{}' (expected one of: seed, seedling, vegetative, flowering, harvest)",
            s
        )
    })
}

fn parse_schedule_start(s: &str) -> Result<ScheduleStart, String> {
    ScheduleStart::from_str(s).ok_or_else(|| {
        format!(
            "unknown start '{}' (expected a stage name or 'complete')",
            s
        )
    })
}

fn parse_device_type(s: &str) -> Result<DeviceType, String> {
    if s.trim().is_empty() {
        return Err("device type cannot be empty".into());
    }
    Ok(DeviceType::parse(s))
}
