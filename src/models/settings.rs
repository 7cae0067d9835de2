use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Default name of the modpack data file.
pub const DEFAULT_DATA_FILE: &str = "modpack_data.txt";

/// User settings from modpack_settings.yaml
///
/// Controls where modpack data is stored and how the manager behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Data file holding the modpack registry, relative to the base directory
    /// unless absolute.
    #[serde(default = "default_data_file")]
    pub data_file: Utf8PathBuf,

    /// Persist after every mutation that changed the collection.
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: Utf8PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            auto_save: default_auto_save(),
            debug_mode: false,
            log_dir: default_log_dir(),
        }
    }
}

impl Settings {
    /// Resolve the data file against `base_dir`.
    pub fn data_path(&self, base_dir: &Utf8Path) -> Utf8PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            base_dir.join(&self.data_file)
        }
    }
}

fn default_data_file() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_auto_save() -> bool {
    true
}

fn default_log_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("logs")
}
