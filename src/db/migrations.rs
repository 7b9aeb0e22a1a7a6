use crate::db::Database;
use crate::error::Result;

const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS plants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        stage TEXT NOT NULL,
        planted_date TEXT NOT NULL,
        device_group TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS devices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        device_type TEXT NOT NULL,
        plant_id INTEGER REFERENCES plants(id) ON DELETE SET NULL,
        device_group TEXT,
        is_on INTEGER NOT NULL DEFAULT 0,
        auto_mode INTEGER NOT NULL DEFAULT 0,
        wattage REAL,
        distance_from_plant REAL,
        is_dimmable INTEGER NOT NULL DEFAULT 0,
        current_intensity INTEGER NOT NULL DEFAULT 100
            CHECK (current_intensity BETWEEN 10 AND 100)
    );

    CREATE TABLE IF NOT EXISTS sensor_readings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        plant_id INTEGER REFERENCES plants(id) ON DELETE CASCADE,
        device_group TEXT,
        temperature REAL NOT NULL,
        humidity REAL NOT NULL,
        soil_moisture REAL NOT NULL,
        recorded_at TEXT NOT NULL,
        CHECK (plant_id IS NOT NULL OR device_group IS NOT NULL)
    );

    CREATE TABLE IF NOT EXISTS calendar_events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        plant_id INTEGER NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
        date TEXT NOT NULL,
        task TEXT NOT NULL,
        completed INTEGER NOT NULL DEFAULT 0,
        stage TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    // Migration 2: Add indexes
    r#"
    CREATE INDEX IF NOT EXISTS idx_devices_plant_id ON devices(plant_id);
    CREATE INDEX IF NOT EXISTS idx_devices_group ON devices(device_group);
    CREATE INDEX IF NOT EXISTS idx_readings_plant ON sensor_readings(plant_id, recorded_at);
    CREATE INDEX IF NOT EXISTS idx_readings_group ON sensor_readings(device_group, recorded_at);
    CREATE INDEX IF NOT EXISTS idx_calendar_plant_date ON calendar_events(plant_id, date);
    "#,
];

pub fn run(db: &Database) -> Result<()> {
    db.with_conn_mut(|conn| {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        let current_version: i32 = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                tracing::info!("Applying migration {}", version);
                let tx = conn.transaction()?;
                tx.execute_batch(migration)?;
                tx.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    [version],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    })
}
