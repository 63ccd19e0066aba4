use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub semesters: SemesterConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_info_path")]
    pub info_path: String,
    #[serde(default = "default_result_path")]
    pub result_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
    #[serde(default)]
    pub status_policy: StatusPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterConfig {
    #[serde(default = "default_start_year")]
    pub start_year: u16,
    #[serde(default = "default_end_year")]
    pub end_year: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_ids_path")]
    pub ids_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// What to do when the portal answers with a non-2xx status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Log the failure and treat the student as having no data.
    #[default]
    Skip,
    /// Retry like a connection failure, within the same attempt budget.
    Retry,
    /// Stop the whole run.
    Abort,
}

impl Display for StatusPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Skip => "skip",
            Self::Retry => "retry",
            Self::Abort => "abort",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub ids_path: Option<String>,
    pub workers: Option<usize>,
    pub status_policy: Option<StatusPolicy>,
    pub top_n: Option<usize>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/cgpa-leaderboard/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.portal.base_url = base_url;
        }
        if let Some(ids_path) = overrides.ids_path {
            self.input.ids_path = ids_path;
        }
        if let Some(workers) = overrides.workers {
            self.pool.workers = workers;
        }
        if let Some(status_policy) = overrides.status_policy {
            self.retry.status_policy = status_policy;
        }
        if let Some(top_n) = overrides.top_n {
            self.report.top_n = top_n;
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.pool.workers > 0, "pool.workers must be at least 1");
        ensure!(self.retry.attempts > 0, "retry.attempts must be at least 1");
        ensure!(
            self.portal.timeout_secs > 0,
            "portal.timeout_secs must be at least 1"
        );
        ensure!(
            self.semesters.start_year <= self.semesters.end_year,
            "semesters.start_year {} is after semesters.end_year {}",
            self.semesters.start_year,
            self.semesters.end_year
        );
        Ok(())
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[portal]
base_url = "http://software.diu.edu.bd:8006"
info_path = "result/studentInfo"
result_path = "result"
timeout_secs = 10
connect_timeout_secs = 5

[retry]
attempts = 3
delay_secs = 2
# skip | retry | abort
status_policy = "skip"

[pool]
workers = 10

[semesters]
start_year = 2010
end_year = 2030

[input]
ids_path = "section-ids.txt"

[report]
top_n = 10
"#;
        template.to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portal: PortalConfig::default(),
            retry: RetryConfig::default(),
            pool: PoolConfig::default(),
            semesters: SemesterConfig::default(),
            input: InputConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            info_path: default_info_path(),
            result_path: default_result_path(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_secs: default_delay_secs(),
            status_policy: StatusPolicy::default(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

impl Default for SemesterConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            ids_path: default_ids_path(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_base_url() -> String {
    "http://software.diu.edu.bd:8006".to_string()
}

fn default_info_path() -> String {
    "result/studentInfo".to_string()
}

fn default_result_path() -> String {
    "result".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_attempts() -> u32 {
    3
}

fn default_delay_secs() -> u64 {
    2
}

fn default_workers() -> usize {
    10
}

fn default_start_year() -> u16 {
    2010
}

fn default_end_year() -> u16 {
    2030
}

fn default_ids_path() -> String {
    "section-ids.txt".to_string()
}

fn default_top_n() -> usize {
    10
}
