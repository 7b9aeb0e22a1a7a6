use crate::db::Database;
use crate::error::{GrowOpsError, Result};
use crate::logic::schedule::CalendarStore;
use crate::models::{
    CalendarEvent, CalendarEventDraft, Device, DeviceType, GrowthStage, Plant, SensorReading,
    SensorScope,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";

// Fixed-width UTC timestamps so lexical order matches time order
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str, column: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            warn!(column, value, "Unparseable timestamp in database, using now");
            Utc::now()
        })
}

fn parse_date(value: &str, column: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_else(|_| {
        warn!(column, value, "Unparseable date in database, using today");
        Utc::now().date_naive()
    })
}

fn parse_stage(value: &str) -> GrowthStage {
    GrowthStage::from_str(value).unwrap_or_else(|| {
        warn!(stage = %value, "Unknown stage in database, defaulting to seed");
        GrowthStage::Seed
    })
}

// Plant Queries

impl Database {
    pub fn create_plant(&self, plant: &Plant) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO plants (name, stage, planted_date, device_group, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    plant.name,
                    plant.stage.as_str(),
                    plant.planted_date.format(DATE_FORMAT).to_string(),
                    plant.device_group,
                    timestamp(&plant.created_at),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_plant(&self, id: i64) -> Result<Option<Plant>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM plants WHERE id = ?1", [id], row_to_plant)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn list_plants(&self) -> Result<Vec<Plant>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM plants ORDER BY id")?;
            let plants = stmt
                .query_map([], row_to_plant)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(plants)
        })
    }

    /// Set a plant's stage and replace its calendar in one transaction.
    pub fn advance_plant(
        &self,
        plant_id: i64,
        stage: GrowthStage,
        drafts: &[CalendarEventDraft],
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let updated = tx.execute(
                "UPDATE plants SET stage = ?1 WHERE id = ?2",
                params![stage.as_str(), plant_id],
            )?;
            if updated == 0 {
                return Err(GrowOpsError::NotFound(format!("Plant {}", plant_id)));
            }
            tx.execute("DELETE FROM calendar_events WHERE plant_id = ?1", [plant_id])?;
            let inserted = insert_events(&tx, plant_id, drafts)?;
            tx.commit()?;
            Ok(inserted)
        })
    }
}

fn row_to_plant(row: &Row) -> rusqlite::Result<Plant> {
    let stage_str: String = row.get("stage")?;
    let planted_str: String = row.get("planted_date")?;
    let created_at_str: String = row.get("created_at")?;

    Ok(Plant {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        stage: parse_stage(&stage_str),
        planted_date: parse_date(&planted_str, "planted_date"),
        device_group: row.get("device_group")?,
        created_at: parse_timestamp(&created_at_str, "created_at"),
    })
}

// Device Queries

impl Database {
    pub fn create_device(&self, device: &Device) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO devices
                    (name, device_type, plant_id, device_group, is_on, auto_mode,
                     wattage, distance_from_plant, is_dimmable, current_intensity)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    device.name,
                    device.device_type.as_str(),
                    device.plant_id,
                    device.device_group,
                    device.is_on,
                    device.auto_mode,
                    device.wattage,
                    device.distance_from_plant,
                    device.is_dimmable,
                    device.current_intensity,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_device(&self, id: i64) -> Result<Option<Device>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM devices WHERE id = ?1", [id], row_to_device)
                .optional()
                .map_err(Into::into)
        })
    }

    /// Ungrouped devices attached to the plant plus every device in the
    /// plant's group. A device's group wins over its plant link.
    pub fn devices_for_plant(&self, plant: &Plant) -> Result<Vec<Device>> {
        let plant_id = plant
            .id
            .ok_or_else(|| GrowOpsError::InvalidData("Plant has no ID".into()))?;

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT * FROM devices
                WHERE (device_group IS NULL AND plant_id = ?1) OR device_group = ?2
                ORDER BY id
                "#,
            )?;
            let devices = stmt
                .query_map(params![plant_id, plant.device_group], row_to_device)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(devices)
        })
    }

    /// Persist the mutable state of a device: power, mode and intensity.
    pub fn update_device_state(&self, device: &Device) -> Result<()> {
        let id = device
            .id
            .ok_or_else(|| GrowOpsError::InvalidData("Device has no ID".into()))?;

        self.with_conn(|conn| {
            let updated = conn.execute(
                r#"
                UPDATE devices SET is_on = ?1, auto_mode = ?2, current_intensity = ?3
                WHERE id = ?4
                "#,
                params![device.is_on, device.auto_mode, device.current_intensity, id],
            )?;
            if updated == 0 {
                return Err(GrowOpsError::NotFound(format!("Device {}", id)));
            }
            Ok(())
        })
    }
}

fn row_to_device(row: &Row) -> rusqlite::Result<Device> {
    let type_str: String = row.get("device_type")?;

    Ok(Device {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        device_type: DeviceType::parse(&type_str),
        plant_id: row.get("plant_id")?,
        device_group: row.get("device_group")?,
        is_on: row.get("is_on")?,
        auto_mode: row.get("auto_mode")?,
        wattage: row.get("wattage")?,
        distance_from_plant: row.get("distance_from_plant")?,
        is_dimmable: row.get("is_dimmable")?,
        current_intensity: row.get("current_intensity")?,
    })
}

// Sensor Reading Queries

impl Database {
    pub fn insert_reading(&self, reading: &SensorReading) -> Result<i64> {
        let (plant_id, group) = match &reading.scope {
            Some(SensorScope::Plant(id)) => (Some(*id), None),
            Some(SensorScope::Group(group)) => (None, Some(group.as_str())),
            None => {
                return Err(GrowOpsError::InvalidData(
                    "Sensor reading needs a plant or device group".into(),
                ))
            }
        };

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO sensor_readings
                    (plant_id, device_group, temperature, humidity, soil_moisture, recorded_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    plant_id,
                    group,
                    reading.temperature,
                    reading.humidity,
                    reading.soil_moisture,
                    timestamp(&reading.recorded_at),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn latest_reading(&self, scope: &SensorScope) -> Result<Option<SensorReading>> {
        self.with_conn(|conn| {
            let result = match scope {
                SensorScope::Plant(id) => conn.query_row(
                    r#"
                    SELECT * FROM sensor_readings
                    WHERE plant_id = ?1 AND device_group IS NULL
                    ORDER BY recorded_at DESC, id DESC LIMIT 1
                    "#,
                    [id],
                    row_to_reading,
                ),
                SensorScope::Group(group) => conn.query_row(
                    r#"
                    SELECT * FROM sensor_readings
                    WHERE device_group = ?1
                    ORDER BY recorded_at DESC, id DESC LIMIT 1
                    "#,
                    [group],
                    row_to_reading,
                ),
            };
            result.optional().map_err(Into::into)
        })
    }
}

fn row_to_reading(row: &Row) -> rusqlite::Result<SensorReading> {
    let plant_id: Option<i64> = row.get("plant_id")?;
    let group: Option<String> = row.get("device_group")?;
    let recorded_at_str: String = row.get("recorded_at")?;

    let scope = match (group, plant_id) {
        (Some(group), _) => Some(SensorScope::Group(group)),
        (None, Some(id)) => Some(SensorScope::Plant(id)),
        (None, None) => None,
    };

    Ok(SensorReading {
        id: Some(row.get("id")?),
        scope,
        temperature: row.get("temperature")?,
        humidity: row.get("humidity")?,
        soil_moisture: row.get("soil_moisture")?,
        recorded_at: parse_timestamp(&recorded_at_str, "recorded_at"),
    })
}

// Calendar Queries

impl Database {
    pub fn get_calendar_events(&self, plant_id: i64) -> Result<Vec<CalendarEvent>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM calendar_events WHERE plant_id = ?1 ORDER BY date, id",
            )?;
            let events = stmt
                .query_map([plant_id], row_to_event)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(events)
        })
    }

    pub fn complete_event(&self, event_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE calendar_events SET completed = 1 WHERE id = ?1",
                [event_id],
            )?;
            if updated == 0 {
                return Err(GrowOpsError::NotFound(format!("Calendar event {}", event_id)));
            }
            Ok(())
        })
    }
}

impl CalendarStore for Database {
    fn clear_plant_events(&self, plant_id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM calendar_events WHERE plant_id = ?1", [plant_id])
                .map_err(Into::into)
        })
    }

    fn insert_plant_events(&self, plant_id: i64, drafts: &[CalendarEventDraft]) -> Result<usize> {
        self.with_conn(|conn| insert_events(conn, plant_id, drafts))
    }

    fn replace_plant_events(&self, plant_id: i64, drafts: &[CalendarEventDraft]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM calendar_events WHERE plant_id = ?1", [plant_id])?;
            let inserted = insert_events(&tx, plant_id, drafts)?;
            tx.commit()?;
            Ok(inserted)
        })
    }
}

fn insert_events(conn: &Connection, plant_id: i64, drafts: &[CalendarEventDraft]) -> Result<usize> {
    let now = timestamp(&Utc::now());
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO calendar_events (plant_id, date, task, completed, stage, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )?;
    for draft in drafts {
        stmt.execute(params![
            plant_id,
            draft.date.format(DATE_FORMAT).to_string(),
            draft.task,
            draft.completed,
            draft.stage.as_str(),
            now,
        ])?;
    }
    Ok(drafts.len())
}

fn row_to_event(row: &Row) -> rusqlite::Result<CalendarEvent> {
    let date_str: String = row.get("date")?;
    let stage_str: String = row.get("stage")?;
    let created_at_str: String = row.get("created_at")?;

    Ok(CalendarEvent {
        id: Some(row.get("id")?),
        plant_id: row.get("plant_id")?,
        date: parse_date(&date_str, "date"),
        task: row.get("task")?,
        completed: row.get("completed")?,
        stage: parse_stage(&stage_str),
        created_at: parse_timestamp(&created_at_str, "created_at"),
    })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
