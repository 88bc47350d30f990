use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::migrations;
use crate::applications::form::DATE_FORMAT;
use crate::applications::{
    ApplicationDraft, ApplicationId, ApplicationQuery, ApplicationRepository, ApplicationStatus,
    ApplicationSummary, JobApplication, RepositoryError,
};

const SELECT_COLUMNS: &str =
    "SELECT id, company, role, date_applied, status, notes FROM job_applications";

/// SQLite-backed store. All access is serialized through one connection behind a `Mutex`.
///
/// Opening does not touch the schema; call [`SqliteApplicationRepository::migrate`] once before
/// serving requests.
#[derive(Clone)]
pub struct SqliteApplicationRepository {
    conn: Arc<Mutex<Connection>>,
}

/// A raw row before the date column is parsed.
struct StoredRow {
    id: i64,
    company: String,
    role: String,
    date_applied: String,
    status: String,
    notes: String,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            company: row.get("company")?,
            role: row.get("role")?,
            date_applied: row.get("date_applied")?,
            status: row.get("status")?,
            notes: row.get("notes")?,
        })
    }

    fn into_application(self) -> Result<JobApplication, RepositoryError> {
        let id = ApplicationId(self.id);
        let date_applied = NaiveDate::parse_from_str(&self.date_applied, DATE_FORMAT).map_err(
            |err| RepositoryError::Corrupt {
                id,
                reason: format!("date_applied '{}': {err}", self.date_applied),
            },
        )?;

        Ok(JobApplication {
            id,
            company: self.company,
            role: self.role,
            date_applied,
            status: ApplicationStatus::from(self.status),
            notes: self.notes,
        })
    }
}

impl SqliteApplicationRepository {
    /// Opens (or creates) the database file.
    pub fn open(path: &Path) -> Result<Self, RepositoryError> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                RepositoryError::Unavailable(format!("create {}: {err}", parent.display()))
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!(path = %path.display(), "database opened");

        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Brings the schema up to date. Safe to call repeatedly.
    pub fn migrate(&self) -> Result<usize, RepositoryError> {
        self.with_conn(|conn| {
            let applied = migrations::run_all(conn)?;
            info!(
                applied,
                version = migrations::current_version(conn)?,
                "schema ready"
            );
            Ok(applied)
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&Connection) -> Result<T, RepositoryError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection mutex poisoned".to_string()))?;
        f(&conn)
    }

    fn fetch_with(conn: &Connection, id: ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        let row = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.0],
                StoredRow::from_row,
            )
            .optional()?;
        row.map(StoredRow::into_application).transpose()
    }
}

impl ApplicationRepository for SqliteApplicationRepository {
    fn insert(&self, draft: ApplicationDraft) -> Result<JobApplication, RepositoryError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO job_applications (company, role, date_applied, status, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    draft.company,
                    draft.role,
                    draft.date_applied.format(DATE_FORMAT).to_string(),
                    draft.status.label(),
                    draft.notes,
                ],
            )?;
            let id = ApplicationId(conn.last_insert_rowid());
            debug!(%id, "inserted application row");
            Ok(draft.into_application(id))
        })
    }

    fn update(&self, application: &JobApplication) -> Result<(), RepositoryError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE job_applications
                 SET company = ?2, role = ?3, date_applied = ?4, status = ?5, notes = ?6
                 WHERE id = ?1",
                params![
                    application.id.0,
                    application.company,
                    application.role,
                    application.date_applied.format(DATE_FORMAT).to_string(),
                    application.status.label(),
                    application.notes,
                ],
            )?;
            if changed == 0 {
                return Err(RepositoryError::NotFound(application.id));
            }
            Ok(())
        })
    }

    fn fetch(&self, id: ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        self.with_conn(|conn| Self::fetch_with(conn, id))
    }

    fn delete(&self, id: ApplicationId) -> Result<JobApplication, RepositoryError> {
        self.with_conn(|conn| {
            let existing = Self::fetch_with(conn, id)?.ok_or(RepositoryError::NotFound(id))?;
            conn.execute("DELETE FROM job_applications WHERE id = ?1", params![id.0])?;
            Ok(existing)
        })
    }

    fn list(&self, query: &ApplicationQuery) -> Result<Vec<JobApplication>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE (?1 IS NULL OR status = ?1)
                 ORDER BY date_applied DESC, id DESC"
            ))?;
            let status = query.status().map(ApplicationStatus::label);
            let rows = stmt.query_map(params![status], StoredRow::from_row)?;

            let mut applications = Vec::new();
            for row in rows {
                let application = row?.into_application()?;
                // Search stays in Rust so case folding matches the in-memory store.
                if query.matches(&application) {
                    applications.push(application);
                }
            }
            Ok(applications)
        })
    }

    fn summarize(&self) -> Result<ApplicationSummary, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT status, COUNT(*) FROM job_applications GROUP BY status")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;

            let mut summary = ApplicationSummary::default();
            for row in rows {
                let (status, count) = row?;
                let count = usize::try_from(count).unwrap_or_default();
                summary.record(&ApplicationStatus::from(status), count);
            }
            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> SqliteApplicationRepository {
        let repository = SqliteApplicationRepository::open_in_memory().expect("open");
        repository.migrate().expect("migrate");
        repository
    }

    fn draft(company: &str, date: &str, status: &str) -> ApplicationDraft {
        ApplicationDraft::new(company, "Engineer")
            .applied_on(NaiveDate::parse_from_str(date, DATE_FORMAT).expect("valid date"))
            .with_status(status)
            .with_notes("via referral")
    }

    #[test]
    fn insert_then_fetch_round_trips_fields() {
        let repository = repository();
        let stored = repository
            .insert(draft("Acme", "2024-01-15", "Pending"))
            .expect("insert");

        let fetched = repository
            .fetch(stored.id)
            .expect("fetch")
            .expect("record present");
        assert_eq!(fetched, stored);
        assert_eq!(
            fetched.date_applied,
            NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
        );
    }

    #[test]
    fn list_filters_in_sql_and_orders_newest_first() {
        let repository = repository();
        repository
            .insert(draft("Acme Corp", "2024-01-01", "Pending"))
            .expect("insert");
        repository
            .insert(draft("Globex", "2024-03-01", "Rejected"))
            .expect("insert");
        repository
            .insert(draft("ACME labs", "2024-03-01", "Pending"))
            .expect("insert");

        let all = repository.list(&ApplicationQuery::all()).expect("list");
        let companies: Vec<&str> = all.iter().map(|app| app.company.as_str()).collect();
        assert_eq!(companies, vec!["ACME labs", "Globex", "Acme Corp"]);

        let pending_acme = repository
            .list(&ApplicationQuery::from_params(Some("Pending"), Some("acme")))
            .expect("list");
        assert_eq!(pending_acme.len(), 2);

        let selected = repository
            .list(&ApplicationQuery::from_params(Some("Selected"), None))
            .expect("list");
        assert!(selected.is_empty());
    }

    #[test]
    fn update_replaces_fields_and_rejects_unknown_ids() {
        let repository = repository();
        let mut stored = repository
            .insert(draft("Acme", "2024-01-15", "Pending"))
            .expect("insert");

        stored.apply(draft("Acme", "2024-02-01", "Interview Scheduled").with_notes(""));
        repository.update(&stored).expect("update");
        let fetched = repository.fetch(stored.id).expect("fetch");
        assert_eq!(fetched, Some(stored.clone()));

        stored.id = ApplicationId(9999);
        assert!(matches!(
            repository.update(&stored),
            Err(RepositoryError::NotFound(ApplicationId(9999)))
        ));
    }

    #[test]
    fn delete_removes_and_reports_missing() {
        let repository = repository();
        let stored = repository
            .insert(draft("Acme", "2024-01-15", "Pending"))
            .expect("insert");

        let removed = repository.delete(stored.id).expect("delete");
        assert_eq!(removed, stored);
        assert_eq!(repository.fetch(stored.id).expect("fetch"), None);
        assert!(matches!(
            repository.delete(stored.id),
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[test]
    fn summary_groups_by_status_and_tolerates_other_values() {
        let repository = repository();
        for (company, status) in [
            ("Acme", "Pending"),
            ("Globex", "Pending"),
            ("Initech", "Selected"),
            ("Umbrella", "On hold"),
        ] {
            repository
                .insert(draft(company, "2024-01-15", status))
                .expect("insert");
        }

        let summary = repository.summarize().expect("summary");
        assert_eq!(summary.total, 4);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.selected, 1);
        assert_eq!(summary.bucketed(), 3);

        let other = repository
            .list(&ApplicationQuery::all())
            .expect("list")
            .into_iter()
            .find(|app| app.company == "Umbrella")
            .expect("present");
        assert_eq!(other.status, ApplicationStatus::Other("On hold".to_string()));
    }

    #[test]
    fn unreadable_dates_surface_as_corrupt_rows() {
        let repository = repository();
        repository
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO job_applications (company, role, date_applied) VALUES ('Acme', 'Engineer', '15/01/2024')",
                    [],
                )?;
                Ok(())
            })
            .expect("raw insert");

        assert!(matches!(
            repository.list(&ApplicationQuery::all()),
            Err(RepositoryError::Corrupt { .. })
        ));
    }

    #[test]
    fn file_database_persists_across_handles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("jobs.db");

        let first = SqliteApplicationRepository::open(&path).expect("open");
        first.migrate().expect("migrate");
        let stored = first
            .insert(draft("Acme", "2024-01-15", "Pending"))
            .expect("insert");
        drop(first);

        let second = SqliteApplicationRepository::open(&path).expect("reopen");
        assert_eq!(second.migrate().expect("migrate"), 0);
        assert_eq!(second.fetch(stored.id).expect("fetch"), Some(stored));
    }
}
