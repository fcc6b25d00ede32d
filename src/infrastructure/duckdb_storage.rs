use crate::domain::{DATE_FORMAT, DateRange, Entry, EntryId, EntryUpdate, JournalError, NewEntry};
use crate::infrastructure::EntryRepository;
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use duckdb::{Connection, OptionalExt, params, params_from_iter};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const ENTRY_COLUMNS: &str = "id, date, content, word_count, created_at, updated_at";

/// Schema migrations, applied in version order and recorded once applied.
const MIGRATIONS: &[(i32, &str, &str)] = &[(
    1,
    "001_create_entries",
    include_str!("../../migrations/001_create_entries.sql"),
)];

pub struct DuckDbStorage {
    conn: Mutex<Connection>,
}

impl DuckDbStorage {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }

        let conn = Connection::open(db_path).context("Failed to open DuckDB connection")?;
        log::debug!("opened journal database at {}", db_path.display());

        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .context("Failed to create in-memory DuckDB connection")?;

        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize()?;
        Ok(storage)
    }

    pub fn backend_info(&self) -> &str {
        "DuckDB entry store"
    }

    fn initialize(&self) -> Result<()> {
        self.setup_migration_system()?;
        self.run_migrations()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("DuckDB connection mutex poisoned"))
    }
}

impl EntryRepository for DuckDbStorage {
    fn load_all(&self) -> Result<Vec<Entry>> {
        let conn = self.lock()?;
        query_entries(&conn, "", Vec::new())
    }

    fn load_range(&self, range: &DateRange) -> Result<Vec<Entry>> {
        let mut conditions = Vec::new();
        let mut values = Vec::new();
        if let Some(start) = range.start {
            conditions.push("date >= ?");
            values.push(format_date(start));
        }
        if let Some(end) = range.end {
            conditions.push("date <= ?");
            values.push(format_date(end));
        }

        let filter = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let conn = self.lock()?;
        query_entries(&conn, &filter, values)
    }

    fn find_by_date(&self, date: NaiveDate) -> Result<Option<Entry>> {
        let conn = self.lock()?;
        entry_by_date(&conn, date)
    }

    fn find_by_id(&self, id: EntryId) -> Result<Option<Entry>> {
        let conn = self.lock()?;
        entry_by_id(&conn, id)
    }

    fn upsert(&self, entry: NewEntry) -> Result<Entry> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .context("Failed to begin upsert transaction")?;
        let date_str = format_date(entry.date);
        let now = Utc::now().to_rfc3339();

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM entries WHERE date = ?",
                params![date_str],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to look up entry by date")?;

        match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE entries SET content = ?, word_count = ?, updated_at = ? WHERE id = ?",
                    params![entry.content, i64::from(entry.word_count), now, id],
                )
                .with_context(|| format!("Failed to update entry for {}", entry.date))?;
            }
            None => {
                tx.execute(
                    "INSERT INTO entries (date, content, word_count, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?)",
                    params![date_str, entry.content, i64::from(entry.word_count), now, now],
                )
                .with_context(|| format!("Failed to insert entry for {}", entry.date))?;
            }
        }

        let saved = entry_by_date(&tx, entry.date)?
            .ok_or_else(|| anyhow!("Entry for {} missing after upsert", entry.date))?;
        tx.commit().context("Failed to commit upsert")?;
        Ok(saved)
    }

    fn update(&self, update: EntryUpdate) -> Result<Entry> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .context("Failed to begin update transaction")?;

        let changed = tx
            .execute(
                "UPDATE entries SET content = ?, word_count = ?, updated_at = ? WHERE id = ?",
                params![
                    update.content,
                    i64::from(update.word_count),
                    Utc::now().to_rfc3339(),
                    update.id
                ],
            )
            .with_context(|| format!("Failed to update entry {}", update.id))?;

        if changed == 0 {
            return Err(JournalError::EntryNotFound(update.id).into());
        }

        let updated = entry_by_id(&tx, update.id)?
            .ok_or(JournalError::EntryNotFound(update.id))?;
        tx.commit().context("Failed to commit update")?;
        Ok(updated)
    }

    fn count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .context("Failed to count entries")?;

        Ok(count as u64)
    }
}

impl DuckDbStorage {
    fn setup_migration_system(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR NOT NULL,
                applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
        "#,
        )
        .context("Failed to create migrations table")?;
        Ok(())
    }

    fn run_migrations(&self) -> Result<()> {
        let applied = self.get_applied_migrations()?;

        for &(version, name, sql) in MIGRATIONS {
            if !applied.contains(&version) {
                self.apply_migration(version, name, sql)
                    .with_context(|| format!("Failed to apply migration {}: {}", version, name))?;
            }
        }

        Ok(())
    }

    fn get_applied_migrations(&self) -> Result<HashSet<i32>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT version FROM migrations ORDER BY version")
            .context("Failed to prepare migration query")?;

        let rows = stmt.query_map([], |row| row.get::<_, i32>(0))?;

        let mut applied = HashSet::new();
        for version in rows {
            applied.insert(version?);
        }

        Ok(applied)
    }

    fn apply_migration(&self, version: i32, name: &str, sql: &str) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(sql)
            .with_context(|| format!("Failed to execute migration SQL for {}", name))?;

        conn.execute(
            "INSERT INTO migrations (version, name) VALUES (?, ?)",
            params![version, name],
        )
        .with_context(|| format!("Failed to record migration {} as applied", name))?;

        log::info!("applied migration {}", name);
        Ok(())
    }
}

/// Row as stored, before dates and timestamps are parsed.
struct StoredRow {
    id: i64,
    date: String,
    content: String,
    word_count: i64,
    created_at: String,
    updated_at: String,
}

impl StoredRow {
    fn from_row(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            content: row.get(2)?,
            word_count: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl TryFrom<StoredRow> for Entry {
    type Error = anyhow::Error;

    fn try_from(row: StoredRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
            .with_context(|| format!("Failed to parse date '{}' from database", row.date))?;
        let word_count = u32::try_from(row.word_count)
            .with_context(|| format!("Invalid word count {} for {}", row.word_count, date))?;

        Ok(Entry {
            id: row.id,
            date,
            content: row.content,
            word_count,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("Failed to parse timestamp '{}' from database", value))
}

fn query_entries(conn: &Connection, filter: &str, values: Vec<String>) -> Result<Vec<Entry>> {
    let query = format!(
        "SELECT {} FROM entries {} ORDER BY date DESC",
        ENTRY_COLUMNS, filter
    );
    let mut stmt = conn
        .prepare(&query)
        .context("Failed to prepare select statement")?;

    let rows = stmt.query_map(params_from_iter(values), StoredRow::from_row)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(Entry::try_from(row?)?);
    }

    Ok(entries)
}

fn entry_by_date(conn: &Connection, date: NaiveDate) -> Result<Option<Entry>> {
    let query = format!("SELECT {} FROM entries WHERE date = ?", ENTRY_COLUMNS);
    conn.query_row(&query, params![format_date(date)], StoredRow::from_row)
        .optional()
        .context("Failed to load entry by date")?
        .map(Entry::try_from)
        .transpose()
}

fn entry_by_id(conn: &Connection, id: EntryId) -> Result<Option<Entry>> {
    let query = format!("SELECT {} FROM entries WHERE id = ?", ENTRY_COLUMNS);
    conn.query_row(&query, params![id], StoredRow::from_row)
        .optional()
        .context("Failed to load entry by id")?
        .map(Entry::try_from)
        .transpose()
}
