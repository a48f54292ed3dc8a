//! Local credential cache
//!
//! Session credentials are reused until five minutes before they expire.
//! The file is a JSON object with `AccessKeyId`, `SecretAccessKey`,
//! `SessionToken` and an ISO-8601 `Expiration`.
//!
//! Writes go to a sibling temp file that is renamed over the cache, so a
//! concurrent reader sees either the old or the new record, never a torn
//! one. There is no locking: two racing writers both store valid
//! credentials and the last rename wins.

use crate::config::Config;
use crate::error::CacheError;
use crate::types::{format_expiration, parse_expiration, SessionCredentials};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Credentials expiring within this many seconds are not reused
pub const FRESHNESS_MARGIN_SECS: i64 = 5 * 60;

/// On-disk record
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CacheRecord {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: String,
}

/// `true` when `credentials` outlive `now` by more than the margin
pub fn is_fresh(credentials: &SessionCredentials, now: DateTime<Utc>) -> bool {
    credentials.expiration > now + Duration::seconds(FRESHNESS_MARGIN_SECS)
}

#[derive(Debug, Clone)]
pub struct CredentialCache {
    path: PathBuf,
}

impl CredentialCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_file.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    /// Read the stored record regardless of its age
    ///
    /// `Ok(None)` when there is no cache file.
    pub fn read(&self) -> Result<Option<SessionCredentials>, CacheError> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Read {
                    path: self.display_path(),
                    source,
                })
            }
        };

        let record: CacheRecord =
            serde_json::from_slice(&contents).map_err(|source| CacheError::Malformed {
                path: self.display_path(),
                source,
            })?;

        let expiration =
            parse_expiration(&record.expiration).map_err(|_| CacheError::InvalidExpiration {
                path: self.display_path(),
                value: record.expiration.clone(),
            })?;

        Ok(Some(SessionCredentials::new(
            record.access_key_id,
            record.secret_access_key,
            record.session_token,
            expiration,
        )))
    }

    /// Stored credentials if they are still fresh at `now`
    pub fn load_at(&self, now: DateTime<Utc>) -> Result<Option<SessionCredentials>, CacheError> {
        Ok(self.read()?.filter(|credentials| {
            let fresh = is_fresh(credentials, now);
            if !fresh {
                debug!(
                    "Cached credentials expire at {}, too close to reuse",
                    credentials.expiration
                );
            }
            fresh
        }))
    }

    /// Stored credentials if they are still fresh now
    pub fn load(&self) -> Result<Option<SessionCredentials>, CacheError> {
        self.load_at(Utc::now())
    }

    /// Replace the cache with `credentials`
    pub fn save(&self, credentials: &SessionCredentials) -> Result<(), CacheError> {
        let write_err = |source| CacheError::Write {
            path: self.display_path(),
            source,
        };

        let record = CacheRecord {
            access_key_id: credentials.access_key_id.clone(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration: format_expiration(&credentials.expiration),
        };
        let json = serde_json::to_vec(&record).map_err(|source| CacheError::Malformed {
            path: self.display_path(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp_path = self.temp_path();
        let result = write_private(&tmp_path, &json).and_then(|()| fs::rename(&tmp_path, &self.path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result.map_err(write_err)?;

        debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".tmp.{}", std::process::id()));
        self.path.with_file_name(name)
    }
}

/// Create `path` readable by the owner only and write `contents`
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn creds(expiration: DateTime<Utc>) -> SessionCredentials {
        SessionCredentials::new(
            "ASIAEXAMPLE".to_string(),
            "secret".to_string(),
            "token".to_string(),
            expiration,
        )
    }

    #[test]
    fn test_is_fresh_boundary() {
        let now = Utc::now();
        let margin = Duration::seconds(FRESHNESS_MARGIN_SECS);
        assert!(!is_fresh(&creds(now + margin - Duration::seconds(1)), now));
        assert!(!is_fresh(&creds(now + margin), now));
        assert!(is_fresh(&creds(now + margin + Duration::seconds(1)), now));
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp_dir = tempdir().unwrap();
        let cache = CredentialCache::new(temp_dir.path().join("absent.json"));
        assert!(cache.read().unwrap().is_none());
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("cache.json");
        let cache = CredentialCache::new(&path);

        cache.save(&creds(Utc::now() + Duration::hours(1))).unwrap();

        let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("cache.json")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("cache.json");
        CredentialCache::new(&path)
            .save(&creds(Utc::now() + Duration::hours(1)))
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_invalid_expiration() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("cache.json");
        fs::write(
            &path,
            r#"{"AccessKeyId":"a","SecretAccessKey":"b","SessionToken":"c","Expiration":"soon"}"#,
        )
        .unwrap();

        let err = CredentialCache::new(&path).read().unwrap_err();
        assert!(matches!(err, CacheError::InvalidExpiration { .. }));
    }
}
