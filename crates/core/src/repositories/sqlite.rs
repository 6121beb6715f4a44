//! SQLite-backed [`PatientStore`].
//!
//! A single `rusqlite::Connection` sits behind a mutex. Every operation acquires it inside
//! `spawn_blocking`, runs one parameterised statement and releases it.

use super::PatientStore;
use crate::config::CoreConfig;
use crate::error::{StorageError, StorageResult};
use crate::record::{PatientColumns, PatientId};
use api_shared::PatientRow;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

const MIGRATIONS: [(i64, &str); 1] = [(
    1,
    include_str!("../../migrations/001_create_patients.sql"),
)];

const SEED_SQL: &str = include_str!("../../migrations/seed_patients.sql");

const SELECT_PATIENTS: &str = "SELECT id, first_name, middle_name, last_name, date_of_birth, status,
     addresses, phone_numbers, additional_fields
     FROM patients ORDER BY id";

const INSERT_PATIENT: &str = "INSERT INTO patients (
     first_name, middle_name, last_name, date_of_birth, status,
     addresses, phone_numbers, additional_fields
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const UPDATE_PATIENT: &str = "UPDATE patients
     SET first_name = ?1, middle_name = ?2, last_name = ?3, date_of_birth = ?4, status = ?5,
         addresses = ?6, phone_numbers = ?7, additional_fields = ?8
     WHERE id = ?9";

const DELETE_PATIENT: &str = "DELETE FROM patients WHERE id = ?1";

#[derive(Clone, Debug)]
pub struct SqlitePatientStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePatientStore {
    /// Opens (creating if needed) the database file at `path` and runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be opened, pragmas fail, or a migration fails.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, path = %path.display(), "opened patient database");
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database (tests, `:memory:` configuration).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Opens whichever database `cfg` points at.
    pub fn from_config(cfg: &CoreConfig) -> StorageResult<Self> {
        if cfg.is_in_memory() {
            Self::open_in_memory()
        } else {
            Self::open(cfg.database_path())
        }
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Inserts the bundled sample patients. Returns how many rows were added.
    pub async fn seed(&self) -> StorageResult<usize> {
        self.with_connection(|conn| {
            let before = count_patients(conn)?;
            conn.execute_batch(SEED_SQL)?;
            let after = count_patients(conn)?;
            Ok(usize::try_from(after - before).unwrap_or_default())
        })
        .await
    }

    /// Highest applied migration version.
    pub async fn schema_version(&self) -> StorageResult<i64> {
        self.with_connection(current_version).await
    }

    async fn with_connection<T, F>(&self, f: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StorageResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StorageError::Unavailable("connection lock poisoned".into()))?;
            f(&*guard)
        })
        .await
        .map_err(|e| StorageError::Unavailable(e.to_string()))?
    }
}

#[async_trait]
impl PatientStore for SqlitePatientStore {
    async fn list(&self) -> StorageResult<Vec<PatientRow>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(SELECT_PATIENTS)?;
            let rows = stmt.query_map([], patient_row)?;
            let patients = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(patients)
        })
        .await
    }

    async fn insert(&self, columns: PatientColumns) -> StorageResult<PatientId> {
        self.with_connection(move |conn| {
            conn.execute(
                INSERT_PATIENT,
                params![
                    columns.first_name,
                    columns.middle_name,
                    columns.last_name,
                    columns.date_of_birth,
                    columns.status,
                    columns.addresses,
                    columns.phone_numbers,
                    columns.additional_fields,
                ],
            )?;
            Ok(PatientId::new(conn.last_insert_rowid()))
        })
        .await
    }

    async fn update(&self, id: PatientId, columns: PatientColumns) -> StorageResult<usize> {
        self.with_connection(move |conn| {
            let changed = conn.execute(
                UPDATE_PATIENT,
                params![
                    columns.first_name,
                    columns.middle_name,
                    columns.last_name,
                    columns.date_of_birth,
                    columns.status,
                    columns.addresses,
                    columns.phone_numbers,
                    columns.additional_fields,
                    id.get(),
                ],
            )?;
            Ok(changed)
        })
        .await
    }

    async fn delete(&self, id: PatientId) -> StorageResult<usize> {
        self.with_connection(move |conn| Ok(conn.execute(DELETE_PATIENT, params![id.get()])?))
            .await
    }
}

fn patient_row(row: &Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        middle_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        last_name: row.get(3)?,
        date_of_birth: row.get(4)?,
        status: row.get(5)?,
        addresses: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        phone_numbers: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        additional_fields: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
    })
}

/// Applies every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at TEXT NOT NULL DEFAULT (datetime('now'))
         );",
    )?;
    let current = current_version(conn)?;

    for (version, sql) in MIGRATIONS {
        if version <= current {
            continue;
        }
        tracing::info!("Running migration v{version}");

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .and_then(|()| {
                tx.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    [version],
                )
            })
            .map_err(|e| StorageError::Migration {
                version,
                reason: e.to_string(),
            })?;
        tx.commit()?;
    }

    Ok(())
}

fn current_version(conn: &Connection) -> StorageResult<i64> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn count_patients(conn: &Connection) -> StorageResult<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}
