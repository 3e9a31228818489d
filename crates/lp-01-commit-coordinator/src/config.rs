//! Commit Coordinator configuration
//!
//! Timeouts are named per action class instead of living as literals at the
//! call sites. Values come from `Default`, the environment, or a TOML file:
//!
//! ```toml
//! [timeouts]
//! default_ms = 20000
//! hype_vote_ms = 10000
//! signer_ms = 120000        # optional; signing is unbounded when absent
//!
//! [commit]
//! level = "confirmed"
//!
//! [sites.ticket_purchase]
//! timeout_ms = 30000
//! ```

use crate::error::{CommitError, CommitResult};
use serde::Deserialize;
use shared_types::{ActionSite, CommitLevel};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Confirmation deadline used by every action site without its own value.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(20);

/// Shorter confirmation deadline for hype voting.
pub const HYPE_VOTE_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Commit Coordinator configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitConfig {
    /// Confirmation timeout for ordinary actions
    pub default_timeout: Duration,
    /// Confirmation timeout for hype voting
    pub hype_vote_timeout: Duration,
    /// Per-site overrides, checked before the two named timeouts
    pub site_timeouts: HashMap<ActionSite, Duration>,
    /// Commitment level requested when the caller does not pick one
    pub commit_level: CommitLevel,
    /// Upper bound on the signing step. `None` waits for the signer forever.
    pub signer_timeout: Option<Duration>,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            hype_vote_timeout: HYPE_VOTE_CONFIRMATION_TIMEOUT,
            site_timeouts: HashMap::new(),
            commit_level: CommitLevel::default(),
            signer_timeout: None,
        }
    }
}

impl CommitConfig {
    /// Create configuration from environment variables.
    ///
    /// - `LP_COMMIT_TIMEOUT_MS`: default confirmation timeout
    /// - `LP_HYPE_VOTE_TIMEOUT_MS`: hype vote confirmation timeout
    /// - `LP_COMMIT_LEVEL`: processed | confirmed | finalized
    /// - `LP_SIGNER_TIMEOUT_MS`: signer bound (unset means unbounded)
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_timeout: env_millis("LP_COMMIT_TIMEOUT_MS")
                .unwrap_or(defaults.default_timeout),
            hype_vote_timeout: env_millis("LP_HYPE_VOTE_TIMEOUT_MS")
                .unwrap_or(defaults.hype_vote_timeout),
            site_timeouts: HashMap::new(),
            commit_level: env::var("LP_COMMIT_LEVEL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.commit_level),
            signer_timeout: env_millis("LP_SIGNER_TIMEOUT_MS"),
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Missing keys keep defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let commit_level = match file.commit.level {
            Some(level) => level.parse().map_err(ConfigError::Parse)?,
            None => CommitLevel::default(),
        };

        let site_timeouts = file
            .sites
            .into_iter()
            .filter_map(|(site, section)| {
                section
                    .timeout_ms
                    .map(|ms| (site, Duration::from_millis(ms)))
            })
            .collect();

        let t = file.timeouts;
        Ok(Self {
            default_timeout: t
                .default_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CONFIRMATION_TIMEOUT),
            hype_vote_timeout: t
                .hype_vote_ms
                .map(Duration::from_millis)
                .unwrap_or(HYPE_VOTE_CONFIRMATION_TIMEOUT),
            site_timeouts,
            commit_level,
            signer_timeout: t.signer_ms.map(Duration::from_millis),
        })
    }

    /// Confirmation timeout for an action site.
    pub fn timeout_for(&self, site: ActionSite) -> Duration {
        if let Some(timeout) = self.site_timeouts.get(&site) {
            return *timeout;
        }
        match site {
            ActionSite::HypeVote => self.hype_vote_timeout,
            _ => self.default_timeout,
        }
    }

    /// Reject zero-length timeouts: they would time out every session.
    pub fn validate(&self) -> CommitResult<()> {
        let zero_site = ActionSite::ALL
            .into_iter()
            .find(|site| self.timeout_for(*site).is_zero());
        if let Some(site) = zero_site {
            return Err(CommitError::Config {
                reason: format!("confirmation timeout for {} is zero", site),
            });
        }
        if self.signer_timeout.is_some_and(|t| t.is_zero()) {
            return Err(CommitError::Config {
                reason: "signer timeout is zero".to_string(),
            });
        }
        Ok(())
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    timeouts: TimeoutSection,
    #[serde(default)]
    commit: CommitSection,
    #[serde(default)]
    sites: HashMap<ActionSite, SiteSection>,
}

#[derive(Debug, Default, Deserialize)]
struct TimeoutSection {
    default_ms: Option<u64>,
    hype_vote_ms: Option<u64>,
    signer_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CommitSection {
    level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SiteSection {
    timeout_ms: Option<u64>,
}

/// Errors that can occur during config loading.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// File I/O error.
    Io { path: String, error: String },
    /// TOML parsing error.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, error } => write!(f, "Failed to read {}: {}", path, error),
            Self::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
