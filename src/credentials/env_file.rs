use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::{ConfigError, read_env_file};

use super::{CredentialKey, CredentialStore, StoreError, StoreResult};

/// Credential store backed by a `KEY=value` env file.
///
/// The file is parsed once on open and kept in an in-memory cache. Writes
/// rewrite the file in place: lines for updated keys are replaced, every
/// other line (comments, unrelated settings) is kept as is, and new keys are
/// appended.
#[derive(Debug)]
pub struct EnvFileStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl EnvFileStore {
    /// Open the store, reading the file if it exists.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let values = read_values(&path)?;
        debug!(path = %path.display(), keys = values.len(), "Loaded env file");
        Ok(Self {
            path,
            cache: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, message: impl ToString) -> StoreError {
        StoreError::Write {
            path: self.path.display().to_string(),
            message: message.to_string(),
        }
    }

    fn rewrite(&self, entries: &[(CredentialKey, String)]) -> StoreResult<()> {
        let existing = if self.path.exists() {
            std::fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            String::new()
        };

        let content = render_updates(&existing, entries);

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| self.write_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.write_error(e))?;
        }

        tmp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;
        Ok(())
    }
}

impl CredentialStore for EnvFileStore {
    fn get(&self, key: CredentialKey) -> StoreResult<Option<String>> {
        let cache = self.cache.read().map_err(|_| StoreError::Poisoned)?;
        Ok(cache
            .get(key.env_name())
            .filter(|v| !v.is_empty())
            .cloned())
    }

    fn set_many(&self, entries: &[(CredentialKey, String)]) -> StoreResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        // Holding the write lock across the file write keeps the cache and
        // the file in step for writers inside this process.
        let mut cache = self.cache.write().map_err(|_| StoreError::Poisoned)?;
        self.rewrite(entries)?;
        for (key, value) in entries {
            cache.insert(key.env_name().to_string(), value.clone());
        }

        debug!(
            path = %self.path.display(),
            keys = ?entries.iter().map(|(k, _)| k.env_name()).collect::<Vec<_>>(),
            "Persisted credentials"
        );
        Ok(())
    }
}

fn read_values(path: &Path) -> StoreResult<HashMap<String, String>> {
    read_env_file(path).map_err(|e| match e {
        ConfigError::EnvFile { path, message } => StoreError::Read { path, message },
        other => StoreError::Read {
            path: path.display().to_string(),
            message: other.to_string(),
        },
    })
}

/// Apply `entries` to env file text, keeping unrelated lines.
pub(crate) fn render_updates(existing: &str, entries: &[(CredentialKey, String)]) -> String {
    let updates: HashMap<&str, &str> = entries
        .iter()
        .map(|(k, v)| (k.env_name(), v.as_str()))
        .collect();
    let mut written: Vec<&str> = Vec::new();
    let mut lines: Vec<String> = Vec::new();

    for line in existing.lines() {
        match line_key(line) {
            Some((prefix, key)) if updates.contains_key(key) => {
                lines.push(format!("{prefix}{key}={}", quote_value(updates[key])));
                written.push(key);
            }
            _ => lines.push(line.to_string()),
        }
    }

    for (key, _) in entries {
        let name = key.env_name();
        if !written.contains(&name) {
            lines.push(format!("{name}={}", quote_value(updates[name])));
            written.push(name);
        }
    }

    let mut content = lines.join("\n");
    content.push('\n');
    content
}

/// Split an assignment line into its `export ` prefix and key.
fn line_key(line: &str) -> Option<(&'static str, &str)> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    let (prefix, rest) = match trimmed.strip_prefix("export ") {
        Some(rest) => ("export ", rest.trim_start()),
        None => ("", trimmed),
    };
    let (key, _) = rest.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((prefix, key))
}

/// Quote a value so that `#`, `^` and `$` in eBay tokens survive parsing.
pub(crate) fn quote_value(value: &str) -> String {
    if !value.contains('\'') && !value.contains('\n') {
        return format!("'{value}'");
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '$' => quoted.push_str("\\$"),
            '\n' => quoted.push_str("\\n"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}
