use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// Ensure that the `log` table exists; it also records applied migrations.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260301_0001_create_shifts",
        description: "Created shifts table (25 columns + stage)",
        sql: r#"
        CREATE TABLE IF NOT EXISTS shifts (
            row_id                      TEXT PRIMARY KEY,
            shift_date                  TEXT NOT NULL,
            driver_id                   TEXT NOT NULL,
            driver_name                 TEXT NOT NULL,
            helper_id                   TEXT,
            helper_name                 TEXT,
            helper_company              TEXT,
            vehicle_number              TEXT NOT NULL,
            start_odometer              REAL NOT NULL DEFAULT 0,
            start_photo_url             TEXT NOT NULL DEFAULT '',
            fuel_taken                  TEXT,
            destination_emirate         TEXT NOT NULL DEFAULT '',
            primary_customer            TEXT NOT NULL DEFAULT '',
            total_drops                 INTEGER NOT NULL DEFAULT 0,
            arrival_at_gate             TEXT NOT NULL,
            departure_from_warehouse    TEXT,
            last_drop_time              TEXT,
            last_drop_photo_url         TEXT,
            last_drop_submit_timestamp  TEXT,
            failed_drops                INTEGER,
            shift_complete_time         TEXT,
            end_odometer                REAL,
            end_photo_url               TEXT,
            shift_duration_hours        REAL,
            overtime_hours              REAL,
            stage                       TEXT NOT NULL DEFAULT 'arrived'
                CHECK(stage IN ('arrived','departed','last_drop','complete')),
            departure_auto              INTEGER NOT NULL DEFAULT 0
        );
        "#,
    },
    Migration {
        version: "20260301_0002_create_reference_list",
        description: "Created reference_list table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS reference_list (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            driver_id       TEXT NOT NULL DEFAULT '',
            driver_name     TEXT NOT NULL DEFAULT '',
            helper_id       TEXT NOT NULL DEFAULT '',
            helper_name     TEXT NOT NULL DEFAULT '',
            helper_company  TEXT NOT NULL DEFAULT '',
            vehicle_number  TEXT NOT NULL DEFAULT '',
            destination     TEXT NOT NULL DEFAULT '',
            customer        TEXT NOT NULL DEFAULT ''
        );
        "#,
    },
    Migration {
        version: "20260301_0003_index_open_shifts",
        description: "Indexed shifts by driver and stage",
        sql: "CREATE INDEX IF NOT EXISTS idx_shifts_driver_stage ON shifts(driver_id, stage);",
    },
];

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;
    success(format!("Migration applied: {} → {}", m.version, m.description));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Called by db::init_db() every time a database is opened, so a fresh file
/// is provisioned on first use.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let versions = applied_versions(&conn).unwrap();
        assert_eq!(versions.len(), MIGRATIONS.len());
        assert_eq!(versions[0], "20260301_0001_create_shifts");
    }
}
