//! Optional `config.toml` with defaults for the command-line flags.
//!
//! Problems with the file never stop a run: they come back as warnings and the
//! built-in defaults are used instead.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use sheetfn_engine::CompileOptions;
use sheetfn_engine::engine::{DEFAULT_FUNCTION_NAME, Dialect, Namespaces};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub dialect: Option<Dialect>,
    pub input_name: Option<String>,
    pub computed_name: Option<String>,
    pub default_function_name: Option<String>,
    pub include_test_code: Option<bool>,
}

impl FileConfig {
    /// Compile options with file values applied over the defaults.
    ///
    /// `dialect` (from the command line) wins over the file. Namespace names
    /// that are not usable in the final dialect are replaced by the defaults
    /// and reported as warnings.
    pub fn compile_options(&self, dialect: Option<Dialect>) -> (CompileOptions, Vec<String>) {
        let mut warnings: Vec<String> = Vec::new();
        let dialect = dialect.or(self.dialect).unwrap_or_default();

        let defaults = Namespaces::default();
        let mut namespaces = Namespaces {
            input: non_empty(self.input_name.as_deref()).unwrap_or_else(|| defaults.input.clone()),
            computed: non_empty(self.computed_name.as_deref())
                .unwrap_or_else(|| defaults.computed.clone()),
        };
        if let Err(reason) = namespaces.validate(dialect) {
            warnings.push(format!(
                "Ignoring input_name/computed_name: {}; using {:?}/{:?}",
                reason, defaults.input, defaults.computed
            ));
            namespaces = defaults;
        }

        let options = CompileOptions {
            dialect,
            namespaces,
            range: None,
            default_function_name: non_empty(self.default_function_name.as_deref())
                .unwrap_or_else(|| DEFAULT_FUNCTION_NAME.to_string()),
        };
        (options, warnings)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Load the config from `explicit`, or from the user config dir when absent.
///
/// A missing default file is silent; a missing explicit file is a warning.
pub fn load_config(explicit: Option<&Path>) -> (FileConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = explicit.map(Path::to_path_buf).or_else(user_config_path) else {
        return (FileConfig::default(), warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (FileConfig::default(), warnings);
    }

    let config = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<FileConfig>(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    };

    if config.is_some() {
        tracing::debug!(path = %path.display(), "loaded config");
    }
    (config.unwrap_or_default(), warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetfn")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
