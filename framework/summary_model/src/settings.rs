use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Keys that every settings document must define.
pub const REQUIRED_SETTINGS_KEYS: [&str; 4] = [
    "binder_name",
    "target_hotspot_residues",
    "lengths",
    "design_path",
];

/// Settings of a BindCraft design run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSettings {
    /// Name of the binder, also used as the report title
    pub binder_name: String,
    /// Hotspot residues on the target, as written in the settings file (e.g. `A56,A115`)
    pub target_hotspot_residues: String,
    /// Minimum and maximum binder length, in residues
    pub lengths: (u32, u32),
    /// Directory holding the run's artifacts
    ///
    /// This is the raw value from the settings file. Use [RunSettings::design_path] to get the
    /// form that is used for local directories and object store keys.
    pub design_path: String,
    /// Target structure the binders were designed against
    pub starting_pdb: Option<String>,
    /// Target chains
    pub chains: Option<String>,
    /// Number of accepted designs the run was asked to produce
    pub number_of_final_designs: Option<u32>,
}

impl RunSettings {
    /// The design path with any leading `./` and surrounding `/` removed.
    pub fn design_path(&self) -> &str {
        normalize_design_path(&self.design_path)
    }
}

/// Strip leading `./` segments and surrounding slashes from a design path.
///
/// `"./runs/cas12a/"` becomes `"runs/cas12a"`.
pub fn normalize_design_path(raw: &str) -> &str {
    let mut path = raw.trim();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path.trim_matches('/')
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Settings file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Settings are not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Settings do not match the expected schema: {0}")]
    Schema(String),
}

/// Load run settings from a JSON file.
pub fn load_run_settings(path: impl AsRef<Path>) -> Result<RunSettings, ConfigError> {
    let path = path.as_ref();
    log::debug!("Loading run settings from {}", path.display());

    let file = std::fs::File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    read_run_settings(file)
}

/// Read run settings from a JSON document.
///
/// Keys other than the ones modelled by [RunSettings] are ignored. BindCraft settings files carry
/// plenty of them.
pub fn read_run_settings<R: Read>(reader: R) -> Result<RunSettings, ConfigError> {
    let reader = std::io::BufReader::new(reader);
    let document: serde_json::Value =
        serde_json::from_reader(reader).map_err(ConfigError::Parse)?;

    let Some(object) = document.as_object() else {
        return Err(ConfigError::Schema(
            "expected a JSON object at the top level".to_string(),
        ));
    };
    for key in REQUIRED_SETTINGS_KEYS {
        if !object.contains_key(key) {
            return Err(ConfigError::Schema(format!("missing required key `{key}`")));
        }
    }

    let settings: RunSettings =
        serde_json::from_value(document).map_err(|e| ConfigError::Schema(e.to_string()))?;
    log::debug!("Loaded settings for binder {}", settings.binder_name);

    Ok(settings)
}
