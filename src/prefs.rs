use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::{
    PingUnit, SessionConfig, DEFAULT_PING_UNIT, DEFAULT_PING_VALUE, DEFAULT_SET_MINUTES,
    DEFAULT_VOLUME,
};

/// The persisted preference file: one flat JSON object per user.
/// Every field defaults individually so a partial file still loads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prefs {
    #[serde(default)]
    pub sets_done: u32,
    #[serde(default = "default_set_minutes")]
    pub set_minutes: u32,
    #[serde(default = "default_ping_value")]
    pub ping_value: u32,
    #[serde(default = "default_ping_unit")]
    pub ping_unit: PingUnit,
    #[serde(default = "default_volume", deserialize_with = "volume_from_number")]
    pub volume: u8,
}

fn default_set_minutes() -> u32 {
    DEFAULT_SET_MINUTES
}

fn default_ping_value() -> u32 {
    DEFAULT_PING_VALUE
}

fn default_ping_unit() -> PingUnit {
    DEFAULT_PING_UNIT
}

fn default_volume() -> u8 {
    DEFAULT_VOLUME
}

/// Older builds wrote the volume as a float; accept any number and clamp.
fn volume_from_number<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.clamp(0.0, 100.0).round() as u8)
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            sets_done: 0,
            set_minutes: default_set_minutes(),
            ping_value: default_ping_value(),
            ping_unit: default_ping_unit(),
            volume: default_volume(),
        }
    }
}

impl Prefs {
    pub fn from_session(config: &SessionConfig, sets_done: u32) -> Self {
        Self {
            sets_done,
            set_minutes: config.set_minutes,
            ping_value: config.ping_value,
            ping_unit: config.ping_unit,
            volume: config.volume,
        }
    }

    pub fn config(&self) -> SessionConfig {
        SessionConfig {
            set_minutes: self.set_minutes,
            ping_value: self.ping_value,
            ping_unit: self.ping_unit,
            volume: self.volume,
        }
        .sanitized()
    }
}

pub trait PrefStore {
    /// Infallible: a missing or unparsable file is the expected first-run
    /// state and yields defaults.
    fn load(&self) -> Prefs;
    /// Best-effort full-object overwrite; callers may ignore the result.
    fn save(&self, prefs: &Prefs) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FilePrefStore {
    path: PathBuf,
}

impl FilePrefStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "thirty") {
            pd.config_dir().join("state.json")
        } else {
            PathBuf::from("thirty_state.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FilePrefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefStore for FilePrefStore {
    fn load(&self) -> Prefs {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(prefs) = serde_json::from_slice::<Prefs>(&bytes) {
                return prefs;
            }
        }
        Prefs::default()
    }

    fn save(&self, prefs: &Prefs) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(prefs).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
