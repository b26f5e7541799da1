//! Credential store backed by a CSV file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use dashmap::DashMap;

use crate::access::Role;
use crate::error::PortalError;
use crate::observability::metrics;
use crate::store::record::{validate_username, EmployeeRecord};

/// Header row of the credential source.
pub const CSV_HEADER: [&str; 3] = ["username", "passwordHash", "role"];

/// Authoritative mapping of usernames to password hashes and roles.
pub struct CredentialStore {
    records: DashMap<String, EmployeeRecord>,
    /// File new users are appended to. `None` keeps inserts in memory.
    source: Option<PathBuf>,
    /// Serializes inserts so check, persist and publish happen as one step.
    writer: Mutex<()>,
}

impl CredentialStore {
    /// Create an empty store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            records: DashMap::new(),
            source: None,
            writer: Mutex::new(()),
        }
    }

    /// Load records from `path`.
    ///
    /// Never fails: a missing file yields an empty store and any read error
    /// leaves whatever was parsed before it. When `persist` is set, inserts are
    /// appended to `path` (created with a header row if needed).
    pub fn load(path: impl AsRef<Path>, persist: bool) -> Self {
        let path = path.as_ref();
        let store = Self {
            records: DashMap::new(),
            source: persist.then(|| path.to_path_buf()),
            writer: Mutex::new(()),
        };

        match store.load_rows(path) {
            Ok(count) => {
                tracing::info!(path = ?path, employees = count, "Credential store loaded");
            }
            Err(PortalError::SourceUnavailable(reason)) => {
                tracing::warn!(path = ?path, reason = %reason, "Credential source not found, starting empty");
            }
            Err(e) => {
                tracing::warn!(
                    path = ?path,
                    error = %e,
                    employees = store.len(),
                    "Failed to read credential source, continuing with partial store"
                );
            }
        }

        metrics::record_store_size(store.len());
        store
    }

    fn load_rows(&self, path: &Path) -> Result<usize, PortalError> {
        let mut reader = match ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)
        {
            Ok(r) => r,
            Err(e) => {
                if let csv::ErrorKind::Io(io) = e.kind() {
                    if io.kind() == std::io::ErrorKind::NotFound {
                        return Err(PortalError::SourceUnavailable(path.display().to_string()));
                    }
                }
                return Err(e.into());
            }
        };

        let headers = reader.headers()?.clone();
        if headers.iter().ne(CSV_HEADER) {
            tracing::warn!(headers = ?headers, "Unexpected credential header row, reading columns by position");
        }

        for (index, result) in reader.records().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let row = match result {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(line, error = %e, "Skipping unreadable credential row");
                    continue;
                }
            };

            match parse_row(&row) {
                Ok(record) => {
                    let username = record.username.clone();
                    if self.records.contains_key(&username) {
                        tracing::warn!(line, username = %username, "Skipping duplicate username");
                        continue;
                    }
                    self.records.insert(username, record);
                }
                Err(reason) => {
                    tracing::warn!(line, reason = %reason, "Skipping invalid credential row");
                }
            }
        }

        Ok(self.records.len())
    }

    pub fn exists(&self, username: &str) -> bool {
        self.records.contains_key(username)
    }

    pub fn get(&self, username: &str) -> Option<EmployeeRecord> {
        self.records.get(username).map(|r| r.value().clone())
    }

    pub fn get_hash(&self, username: &str) -> Result<String, PortalError> {
        self.records
            .get(username)
            .map(|r| r.password_hash.clone())
            .ok_or_else(|| PortalError::NotFound(username.to_string()))
    }

    pub fn get_role(&self, username: &str) -> Result<Role, PortalError> {
        self.records
            .get(username)
            .map(|r| r.role)
            .ok_or_else(|| PortalError::NotFound(username.to_string()))
    }

    /// Add a new employee, persisting before the record becomes visible.
    ///
    /// Fails with `AlreadyExists` if the username is taken; the existing record
    /// is left untouched.
    pub fn insert(&self, record: EmployeeRecord) -> Result<(), PortalError> {
        validate_username(&record.username)?;

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        if self.records.contains_key(&record.username) {
            return Err(PortalError::AlreadyExists(record.username));
        }

        if let Some(path) = &self.source {
            append_row(path, &record)?;
        }

        tracing::info!(username = %record.username, role = %record.role, "Employee added");
        self.records.insert(record.username.clone(), record);
        metrics::record_store_size(self.records.len());
        Ok(())
    }

    /// Hash of an arbitrary stored record.
    pub fn any_hash(&self) -> Option<String> {
        self.records.iter().next().map(|r| r.password_hash.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Path inserts are persisted to, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn parse_row(row: &StringRecord) -> Result<EmployeeRecord, String> {
    if row.len() != 3 {
        return Err(format!("expected 3 fields, found {}", row.len()));
    }

    let username = &row[0];
    let password_hash = &row[1];
    let role = &row[2];

    validate_username(username).map_err(|e| e.to_string())?;
    if password_hash.is_empty() {
        return Err(format!("empty password hash for {}", username));
    }
    let role = role.parse::<Role>().map_err(|e| e.to_string())?;

    Ok(EmployeeRecord::new(username, password_hash, role))
}

fn append_row(path: &Path, record: &EmployeeRecord) -> Result<(), PortalError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().read(true).create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;
    if !needs_header && !ends_with_newline(&mut file)? {
        // Keep a hand-edited last row from absorbing the new one.
        file.write_all(b"\n")?;
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    if needs_header {
        writer.write_record(CSV_HEADER)?;
    }
    writer.write_record([
        record.username.as_str(),
        record.password_hash.as_str(),
        record.role.as_str(),
    ])?;
    writer.flush()?;
    Ok(())
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HASH: &str = "$argon2id$v=19$c2FsdHNhbHQ$aGFzaGhhc2g";
    const PHC_HASH: &str = "$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2g";

    fn write_csv(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("employees.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_rows() {
        let dir = tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            &format!("username,passwordHash,role\nalice,{HASH},admin\nbob,{HASH},intern\n"),
        );

        let store = CredentialStore::load(&path, false);
        assert_eq!(store.len(), 2);
        assert!(store.exists("alice"));
        assert_eq!(store.get_role("alice").unwrap(), Role::Admin);
        assert_eq!(store.get_role("bob").unwrap(), Role::Intern);
        assert_eq!(store.get_hash("bob").unwrap(), HASH);
    }

    #[test]
    fn test_quoted_phc_hash_round_trips() {
        let dir = tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            &format!("username,passwordHash,role\nalice,\"{PHC_HASH}\",admin\n"),
        );
        let store = CredentialStore::load(&path, true);
        assert_eq!(store.get_hash("alice").unwrap(), PHC_HASH);

        store.insert(EmployeeRecord::new("bob", PHC_HASH, Role::Intern)).unwrap();
        let reloaded = CredentialStore::load(&path, false);
        assert_eq!(reloaded.get_hash("bob").unwrap(), PHC_HASH);
    }

    #[test]
    fn test_missing_source_yields_empty_store() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::load(dir.path().join("absent.csv"), true);
        assert!(store.is_empty());
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let dir = tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            &format!(
                "username,passwordHash,role\n\
                 alice,{HASH},admin\n\
                 carol,{HASH},superuser\n\
                 dave,{HASH}\n\
                 bad name,{HASH},intern\n\
                 alice,{HASH},intern\n\
                 erin,{HASH},engineer\n"
            ),
        );

        let store = CredentialStore::load(&path, false);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_role("alice").unwrap(), Role::Admin);
        assert_eq!(store.get_role("erin").unwrap(), Role::Engineer);
        assert!(!store.exists("carol"));
        assert!(!store.exists("dave"));
    }

    #[test]
    fn test_unreadable_source_yields_empty_store() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::load(dir.path(), false);
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_after_unterminated_last_row() {
        let dir = tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            &format!("username,passwordHash,role\nalice,{HASH},admin"),
        );

        let store = CredentialStore::load(&path, true);
        store.insert(EmployeeRecord::new("bob", HASH, Role::Intern)).unwrap();

        let reloaded = CredentialStore::load(&path, false);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get_role("alice").unwrap(), Role::Admin);
        assert_eq!(reloaded.get_role("bob").unwrap(), Role::Intern);
    }

    #[test]
    fn test_lookups_are_case_sensitive() {
        let store = CredentialStore::in_memory();
        store.insert(EmployeeRecord::new("Alice", HASH, Role::Admin)).unwrap();
        assert!(store.exists("Alice"));
        assert!(!store.exists("alice"));
        assert!(matches!(store.get_hash("alice"), Err(PortalError::NotFound(_))));
        assert!(matches!(store.get_role("ALICE"), Err(PortalError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let store = CredentialStore::in_memory();
        store.insert(EmployeeRecord::new("alice", HASH, Role::Admin)).unwrap();

        let err = store
            .insert(EmployeeRecord::new("alice", "$argon2id$other", Role::Intern))
            .unwrap_err();
        assert!(matches!(err, PortalError::AlreadyExists(ref name) if name == "alice"));

        let kept = store.get("alice").unwrap();
        assert_eq!(kept.password_hash, HASH);
        assert_eq!(kept.role, Role::Admin);
    }

    #[test]
    fn test_insert_rejects_invalid_username() {
        let store = CredentialStore::in_memory();
        let err = store.insert(EmployeeRecord::new("a,b", HASH, Role::Intern)).unwrap_err();
        assert!(matches!(err, PortalError::InvalidUsername(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("employees.csv");

        let store = CredentialStore::load(&path, true);
        store.insert(EmployeeRecord::new("alice", HASH, Role::Accountant)).unwrap();
        store.insert(EmployeeRecord::new("bob", HASH, Role::Intern)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("username,passwordHash,role\n"));

        let reloaded = CredentialStore::load(&path, true);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get_role("alice").unwrap(), Role::Accountant);
    }

    #[test]
    fn test_concurrent_inserts_single_winner() {
        let store = std::sync::Arc::new(CredentialStore::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .insert(EmployeeRecord::new("shared", format!("$argon2id${i}"), Role::Intern))
                        .is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|inserted| *inserted)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }
}
