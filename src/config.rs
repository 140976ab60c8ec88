use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{EditorError, EditorResult};

/// Environment variable overriding [`EditorConfig::history_limit`]; `0` means uncapped.
pub const ENV_HISTORY_LIMIT: &str = "RETOUCH_HISTORY_LIMIT";
/// Environment variable overriding [`EditorConfig::fonts_dir`].
pub const ENV_FONTS_DIR: &str = "RETOUCH_FONTS_DIR";

/// Session configuration, loaded from JSON with environment overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept. `None` (or `0` in JSON) keeps everything.
    pub history_limit: Option<usize>,
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` files.
    pub fonts_dir: Option<PathBuf>,
    /// Load fonts installed on the system.
    pub load_system_fonts: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            fonts_dir: None,
            load_system_fonts: true,
        }
    }
}

impl EditorConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> EditorResult<Self> {
        let mut cfg: Self = serde_json::from_reader(r)
            .map_err(|e| EditorError::config(format!("parse config JSON: {e}")))?;
        cfg.history_limit = cfg.history_limit.filter(|&n| n > 0);
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            EditorError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Apply `RETOUCH_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> EditorResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> EditorResult<Self> {
        if let Some(raw) = lookup(ENV_HISTORY_LIMIT) {
            let n = raw.trim().parse::<usize>().map_err(|e| {
                EditorError::config(format!("{ENV_HISTORY_LIMIT}='{raw}' is not a count: {e}"))
            })?;
            self.history_limit = (n > 0).then_some(n);
        }
        if let Some(dir) = lookup(ENV_FONTS_DIR).filter(|d| !d.trim().is_empty()) {
            self.fonts_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
