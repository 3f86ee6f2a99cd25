//! Loading of the two `KEY = VALUE` configuration files.
//!
//! Both files must contain exactly their expected keys: an unknown, repeated
//! or missing key is a fatal startup error.

use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::ConfigError;
use crate::domain::BoundingBox;

/// Collection parameters, relative to the install directory
pub const PARAMETERS_FILE: &str = "confs/parameters.conf";

/// Upstream credentials, relative to the install directory
pub const CREDENTIALS_FILE: &str = "confs/auth.conf";

const OUT_FILE: &str = "OUT_FILE";
const RETRY_DELAY: &str = "RETRY_DELAY";
const TIMEOUT: &str = "TIMEOUT";
const COORDINATES: &str = "COORDINATES";
const PARAMETER_KEYS: [&str; 4] = [OUT_FILE, RETRY_DELAY, TIMEOUT, COORDINATES];

const CONSUMER_KEY: &str = "CONSUMER_KEY";
const CONSUMER_SECRET: &str = "CONSUMER_SECRET";
const ACCESS_TOKEN: &str = "ACCESS_TOKEN";
const ACCESS_TOKEN_SECRET: &str = "ACCESS_TOKEN_SECRET";
const CREDENTIAL_KEYS: [&str; 4] = [
    CONSUMER_KEY,
    CONSUMER_SECRET,
    ACCESS_TOKEN,
    ACCESS_TOKEN_SECRET,
];

/// Immutable connection parameters for the whole process lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub out_file: PathBuf,
    pub retry_delay: Duration,
    pub timeout: Duration,
    pub bounding_box: BoundingBox,
}

impl Parameters {
    /// Read and validate the parameters file; a relative `OUT_FILE` is
    /// resolved against `base_dir`
    pub async fn load(path: &Path, base_dir: &Path) -> Result<Self, ConfigError> {
        let content = read_config(path).await?;
        Self::parse(&content, path, base_dir)
    }

    pub fn parse(content: &str, path: &Path, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut values = parse_key_values(content, &PARAMETER_KEYS, path)?;

        let out_file = PathBuf::from(take(&mut values, OUT_FILE));
        let out_file = if out_file.is_absolute() {
            out_file
        } else {
            base_dir.join(out_file)
        };

        Ok(Self {
            out_file,
            retry_delay: parse_seconds(RETRY_DELAY, &take(&mut values, RETRY_DELAY), true)?,
            timeout: parse_seconds(TIMEOUT, &take(&mut values, TIMEOUT), false)?,
            bounding_box: take(&mut values, COORDINATES).parse()?,
        })
    }
}

/// OAuth 1.0a consumer and access token pairs
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_config(path).await?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut values = parse_key_values(content, &CREDENTIAL_KEYS, path)?;
        Ok(Self {
            consumer_key: take(&mut values, CONSUMER_KEY),
            consumer_secret: take(&mut values, CONSUMER_SECRET),
            access_token: take(&mut values, ACCESS_TOKEN),
            access_token_secret: take(&mut values, ACCESS_TOKEN_SECRET),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

async fn read_config(path: &Path) -> Result<String, ConfigError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })
}

/// Collect `KEY = VALUE` lines, requiring exactly the `expected` keys
fn parse_key_values(
    content: &str,
    expected: &[&'static str],
    path: &Path,
) -> Result<HashMap<&'static str, String>, ConfigError> {
    let mut values = HashMap::with_capacity(expected.len());

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();

        let Some(known) = expected.iter().copied().find(|k| *k == key) else {
            return Err(ConfigError::UnknownKey {
                key: key.to_string(),
                path: path.to_path_buf(),
            });
        };
        if values.insert(known, value.trim().to_string()).is_some() {
            return Err(ConfigError::DuplicateKey {
                key: key.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    let missing: Vec<&'static str> = expected
        .iter()
        .copied()
        .filter(|k| !values.contains_key(k))
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingKeys {
            keys: missing,
            path: path.to_path_buf(),
        });
    }

    Ok(values)
}

// Only called for keys `parse_key_values` has already checked
fn take(values: &mut HashMap<&'static str, String>, key: &'static str) -> String {
    values.remove(key).unwrap_or_default()
}

fn parse_seconds(key: &'static str, value: &str, allow_zero: bool) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let seconds: f64 = value.parse().map_err(|_| invalid("not a number"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid("must be a finite, non-negative number of seconds"));
    }
    if !allow_zero && seconds == 0.0 {
        return Err(invalid("must be greater than zero"));
    }
    Duration::try_from_secs_f64(seconds).map_err(|e| invalid(&e.to_string()))
}
