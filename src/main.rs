use chrono::{Local, NaiveDate, Timelike};
use clap::Parser;
use growops::cli::{
    Cli, Commands, DeviceCommands, EvaluateArgs, LightCommands, PlantCommands, ReadingCommands,
};
use growops::config::Config;
use growops::db::Database;
use growops::error::{GrowOpsError, Result};
use growops::logic::lighting::{calculate_light_distance, calculate_recommended_intensity};
use growops::logic::schedule::{
    advance_plant_stage, generate_schedule, generate_stage_schedule, regenerate_calendar,
    CalendarStore,
};
use growops::logic::{run_plant_automation, AutomationEngine};
use growops::models::{
    CalendarEvent, CalendarEventDraft, Device, Plant, ScheduleStart, SensorReading, SensorScope,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

struct Context {
    config: Config,
    data_dir: Option<std::path::PathBuf>,
    json: bool,
}

impl Context {
    fn open_db(&self) -> Result<Database> {
        let path = self.config.db_path(self.data_dir.as_ref())?;
        tracing::debug!(path = %path.display(), "Opening database");
        Database::open(&path)
    }

    fn engine(&self) -> AutomationEngine {
        AutomationEngine::with_light_start_hour(self.config.automation.light_start_hour)
    }

    /// Print `value` as JSON, or run the human-readable printer.
    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_ref())?;
    let ctx = Context {
        config,
        data_dir: cli.data_dir,
        json: cli.json,
    };

    match cli.command {
        Commands::Schedule {
            start,
            date,
            plant,
            only_stage,
        } => cmd_schedule(&ctx, start, date.unwrap_or_else(today), plant, only_stage),
        Commands::Advance { plant_id, date } => {
            let db = ctx.open_db()?;
            let (plant, events) = advance_plant_stage(&db, plant_id, date.unwrap_or_else(today))?;
            ctx.emit(&events, |events| {
                println!("{} advanced to {}", plant.name, plant.stage);
                print_events(events);
            })
        }
        Commands::Calendar { plant_id } => {
            let db = ctx.open_db()?;
            if db.get_plant(plant_id)?.is_none() {
                return Err(GrowOpsError::NotFound(format!("Plant {}", plant_id)));
            }
            let events = db.get_calendar_events(plant_id)?;
            ctx.emit(&events, |events| print_events(events))
        }
        Commands::Complete { event_id } => {
            let db = ctx.open_db()?;
            db.complete_event(event_id)?;
            ctx.emit(&event_id, |id| println!("Event {} completed", id))
        }
        Commands::Automate { plant_id, hour } => {
            let db = ctx.open_db()?;
            let hour = hour.unwrap_or_else(|| Local::now().hour());
            let report = run_plant_automation(&db, &ctx.engine(), plant_id, hour)?;
            ctx.emit(&report, |report| {
                println!(
                    "{} ({}) at {:02}:00, {} device(s) switched",
                    report.plant.name,
                    report.plant.stage,
                    hour,
                    report.changed_count()
                );
                for outcome in &report.outcomes {
                    println!(
                        "  {:<16} {:<3} {}{}",
                        outcome.device.name,
                        if outcome.decision.should_be_on { "ON" } else { "OFF" },
                        outcome.decision.reason,
                        if outcome.device.auto_mode { "" } else { " [manual]" }
                    );
                    if let Some(rec) = &outcome.decision.recommendation {
                        println!("  {:<16}     {}", "", rec);
                    }
                }
            })
        }
        Commands::Evaluate(args) => cmd_evaluate(&ctx, args),
        Commands::Light { command } => match command {
            LightCommands::Distance { wattage, stage } => {
                let result = calculate_light_distance(wattage, stage);
                ctx.emit(&result, |r| println!("{}cm ({})", r.distance, r.reason))
            }
            LightCommands::Intensity {
                wattage,
                distance,
                stage,
                not_dimmable,
            } => {
                let result =
                    calculate_recommended_intensity(wattage, distance, stage, !not_dimmable);
                ctx.emit(&result, |r| {
                    println!("{}% ({}), ~{} PPFD", r.intensity, r.reason, r.ppfd)
                })
            }
        },
        Commands::Plant { command } => cmd_plant(&ctx, command),
        Commands::Device { command } => cmd_device(&ctx, command),
        Commands::Reading { command } => cmd_reading(&ctx, command),
        Commands::Check => cmd_check(&ctx),
    }
}

fn cmd_schedule(
    ctx: &Context,
    start: ScheduleStart,
    date: NaiveDate,
    plant: Option<i64>,
    only_stage: bool,
) -> Result<()> {
    let drafts = match (only_stage, start) {
        (false, _) => generate_schedule(start, date),
        (true, ScheduleStart::Stage(stage)) => generate_stage_schedule(stage, date),
        (true, ScheduleStart::Complete) => {
            return Err(GrowOpsError::InvalidData(
                "--only-stage needs a stage, not 'complete'".into(),
            ))
        }
    };

    if let Some(plant_id) = plant {
        let db = ctx.open_db()?;
        if db.get_plant(plant_id)?.is_none() {
            return Err(GrowOpsError::NotFound(format!("Plant {}", plant_id)));
        }
        let inserted = db.replace_plant_events(plant_id, &drafts)?;
        tracing::info!(plant_id, %start, %date, inserted, "Regenerated calendar");
    }
    ctx.emit(&drafts, |drafts| print_drafts(drafts))
}

fn cmd_evaluate(ctx: &Context, args: EvaluateArgs) -> Result<()> {
    let mut device = Device::new("ad-hoc", args.device_type);
    device.wattage = args.wattage;
    device.distance_from_plant = args.distance;
    device.is_dimmable = args.dimmable;

    let plant = Plant::new("ad-hoc", args.stage, today());
    let reading = match (args.temp, args.humidity, args.moisture) {
        (Some(t), Some(h), Some(m)) => Some(SensorReading::new(t, h, m)),
        _ => None,
    };
    let hour = args.hour.unwrap_or_else(|| Local::now().hour());

    let decision = ctx
        .engine()
        .evaluate_at(&device, &plant, reading.as_ref(), hour);
    ctx.emit(&decision, |d| {
        println!("{}: {}", if d.should_be_on { "ON" } else { "OFF" }, d.reason);
        if let Some(rec) = &d.recommendation {
            println!("{}", rec);
        }
    })
}

fn cmd_plant(ctx: &Context, command: PlantCommands) -> Result<()> {
    let db = ctx.open_db()?;
    match command {
        PlantCommands::Add {
            name,
            stage,
            planted,
            group,
            no_calendar,
        } => {
            let mut plant = Plant::new(name, stage, planted.unwrap_or_else(today));
            if let Some(group) = group {
                plant = plant.with_group(group);
            }
            let id = db.create_plant(&plant)?;
            plant.id = Some(id);

            if !no_calendar {
                regenerate_calendar(&db, id, ScheduleStart::Stage(stage), plant.planted_date)?;
            }
            ctx.emit(&plant, |p| println!("Added plant #{} {} ({})", id, p.name, p.stage))
        }
        PlantCommands::List => {
            let plants = db.list_plants()?;
            let today = today();
            ctx.emit(&plants, |plants| {
                for p in plants {
                    println!(
                        "#{:<4} {:<20} {:<11} planted {} (day {}){}",
                        p.id.unwrap_or_default(),
                        p.name,
                        p.stage,
                        p.planted_date,
                        p.age_days(today),
                        p.device_group
                            .as_ref()
                            .map(|g| format!(" [{}]", g))
                            .unwrap_or_default()
                    );
                }
            })
        }
    }
}

fn cmd_device(ctx: &Context, command: DeviceCommands) -> Result<()> {
    let DeviceCommands::Add {
        name,
        device_type,
        plant,
        group,
        auto,
        wattage,
        distance,
        dimmable,
    } = command;

    let db = ctx.open_db()?;
    if let Some(plant_id) = plant {
        if db.get_plant(plant_id)?.is_none() {
            return Err(GrowOpsError::NotFound(format!("Plant {}", plant_id)));
        }
    }
    if !device_type.is_known() {
        tracing::warn!(%device_type, "Device type has no automation rules");
    }

    let mut device = Device::new(name, device_type).with_auto_mode(auto);
    if let Some(plant_id) = plant {
        device = device.for_plant(plant_id);
    }
    if let Some(group) = group {
        device = device.in_group(group);
    }
    if let Some(w) = wattage {
        device = device.with_wattage(w);
    }
    if let Some(d) = distance {
        device = device.with_distance(d);
    }
    if let Some(intensity) = dimmable {
        device = device.dimmable(intensity);
    }

    device.id = Some(db.create_device(&device)?);
    ctx.emit(&device, |d| {
        println!(
            "Added device #{} {} ({})",
            d.id.unwrap_or_default(),
            d.name,
            d.device_type
        )
    })
}

fn cmd_reading(ctx: &Context, command: ReadingCommands) -> Result<()> {
    let ReadingCommands::Add {
        plant,
        group,
        temp,
        humidity,
        moisture,
    } = command;

    let scope = match (plant, group) {
        (_, Some(group)) => SensorScope::Group(group),
        (Some(plant_id), None) => SensorScope::Plant(plant_id),
        (None, None) => {
            return Err(GrowOpsError::InvalidData(
                "A reading needs --plant or --group".into(),
            ))
        }
    };

    let db = ctx.open_db()?;
    let mut reading = SensorReading::new(temp, humidity, moisture).with_scope(scope);
    reading.id = Some(db.insert_reading(&reading)?);
    ctx.emit(&reading, |r| {
        if let Some(scope) = &r.scope {
            println!("Recorded reading for {}", scope);
        }
    })
}

fn cmd_check(ctx: &Context) -> Result<()> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct CheckReport {
        grow: String,
        light_start_hour: u32,
        automated_types: Vec<String>,
        database: String,
        plants: usize,
    }

    let db = ctx.open_db()?;
    let report = CheckReport {
        grow: ctx.config.grow.name.clone(),
        light_start_hour: ctx.config.automation.light_start_hour,
        automated_types: ctx.engine().supported_types(),
        database: db.path().display().to_string(),
        plants: db.list_plants()?.len(),
    };
    ctx.emit(&report, |r| {
        println!("Grow:        {}", r.grow);
        println!("Lights on:   {:02}:00", r.light_start_hour);
        println!("Automates:   {}", r.automated_types.join(", "));
        println!("Database:    {} (OK)", r.database);
        println!("Plants:      {}", r.plants);
    })
}

fn print_drafts(drafts: &[CalendarEventDraft]) {
    if drafts.is_empty() {
        println!("No tasks");
    }
    for d in drafts {
        println!("{}  {:<10}  {}", d.date, d.stage, d.task);
    }
}

fn print_events(events: &[CalendarEvent]) {
    if events.is_empty() {
        println!("No calendar events");
    }
    let today = today();
    for e in events {
        let mark = if e.completed {
            "x"
        } else if e.is_overdue(today) {
            "!"
        } else {
            " "
        };
        println!(
            "[{}] #{:<5} {}  {:<10}  {}",
            mark,
            e.id.unwrap_or_default(),
            e.date,
            e.stage,
            e.task
        );
    }
}
