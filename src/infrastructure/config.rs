use crate::domain::entities::Credentials;
use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Credentials directory used when neither `--config-dir` nor
/// `HTP_CONFIG_DIR` is given. Relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = ".htp";

const BASE_URL_FILE: &str = "base_url.env";
const AUTH_TOKEN_FILE: &str = "auth_token.env";

/// Environment variable that turns on colored output.
pub const COLOR_ENV: &str = "HTP_COL";

/// Plain-text store for the base URL and auth token, one file each.
///
/// No locking: two invocations writing at once simply race.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load(&self) -> Result<Credentials> {
        Ok(Credentials {
            base_url: self.read_value(BASE_URL_FILE)?,
            auth_token: self.read_value(AUTH_TOKEN_FILE)?,
        })
    }

    pub fn save_base_url(&self, url: &str) -> Result<()> {
        self.write_value(BASE_URL_FILE, url)
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        self.write_value(AUTH_TOKEN_FILE, token)
    }

    /// A missing or blank file means the value is absent.
    fn read_value(&self, file: &str) -> Result<Option<String>> {
        let path = self.dir.join(file);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let value = content.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn write_value(&self, file: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.dir.join(file);
        fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Color is on only when `HTP_COL=1` and stdout is a terminal.
pub fn color_enabled() -> bool {
    color_setting(
        std::env::var(COLOR_ENV).ok().as_deref(),
        std::io::stdout().is_tty(),
    )
}

pub fn color_setting(env_value: Option<&str>, stdout_is_tty: bool) -> bool {
    env_value == Some("1") && stdout_is_tty
}
