use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SymresError};
use crate::names::Language;
use crate::resolution::InterceptorKind;

/// Name of the configuration file stored inside the `.symres` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory holding resolver settings.
pub const SYMRES_DIR: &str = ".symres";

/// Configuration for building a resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Language assumed for references whose file does not say.
    pub default_language: Language,
    /// Interceptors in the order they run.
    pub interceptors: Vec<InterceptorKind>,
    /// Implicitly imported standard-library names, short name to qualified.
    pub stdlib: BTreeMap<String, String>,
    /// Whether results are memoized per file and reference text.
    pub cache_results: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let stdlib = [
            ("Any", "kotlin.Any"),
            ("Boolean", "kotlin.Boolean"),
            ("Int", "kotlin.Int"),
            ("Long", "kotlin.Long"),
            ("String", "kotlin.String"),
            ("Unit", "kotlin.Unit"),
            ("List", "kotlin.collections.List"),
            ("Map", "kotlin.collections.Map"),
            ("Set", "kotlin.collections.Set"),
            ("MutableList", "kotlin.collections.MutableList"),
            ("Object", "java.lang.Object"),
            ("Override", "java.lang.Override"),
        ]
        .into_iter()
        .map(|(short, qualified)| (short.to_string(), qualified.to_string()))
        .collect();

        Self {
            version: 1,
            default_language: Language::Kotlin,
            interceptors: InterceptorKind::DEFAULT_CHAIN.to_vec(),
            stdlib,
            cache_results: true,
        }
    }
}

impl ResolverConfig {
    /// Checks settings that deserialization alone cannot.
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SymresError::Config {
                message: format!("unsupported config version {}", self.version),
            });
        }
        let mut seen = Vec::new();
        for kind in &self.interceptors {
            if seen.contains(kind) {
                return Err(SymresError::Config {
                    message: format!("interceptor '{}' is listed twice", kind.as_str()),
                });
            }
            seen.push(*kind);
        }
        if let Some((short, _)) = self.stdlib.iter().find(|(short, q)| short.is_empty() || q.is_empty()) {
            return Err(SymresError::Config {
                message: format!("stdlib entry '{short}' has an empty side"),
            });
        }
        Ok(())
    }
}

/// Returns the path to the `.symres` directory within the given project root.
pub fn get_symres_dir(project_root: &Path) -> PathBuf {
    project_root.join(SYMRES_DIR)
}

/// Returns the path to the configuration file within the `.symres` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_symres_dir(project_root).join(CONFIG_FILENAME)
}

fn config_error(action: &str, path: &Path, cause: impl std::fmt::Display) -> SymresError {
    SymresError::Config {
        message: format!("cannot {action} resolver config at {}: {cause}", path.display()),
    }
}

/// Reads `.symres/config.json` under `project_root`. A project without one
/// resolves with [`ResolverConfig::default`]. The loaded file is validated.
pub fn load_config(project_root: &Path) -> Result<ResolverConfig> {
    let path = get_config_path(project_root);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no resolver config, using defaults");
        return Ok(ResolverConfig::default());
    }

    let text = fs::read_to_string(&path).map_err(|e| config_error("read", &path, e))?;
    let config: ResolverConfig =
        serde_json::from_str(&text).map_err(|e| config_error("parse", &path, e))?;
    config.validate()?;
    Ok(config)
}

/// Validates `config` and stores it under `project_root`.
///
/// The JSON goes to `config.tmp` beside the target and is renamed over it,
/// so a reader never sees a half-written config.
pub fn save_config(project_root: &Path, config: &ResolverConfig) -> Result<()> {
    config.validate()?;

    let dir = get_symres_dir(project_root);
    fs::create_dir_all(&dir).map_err(|e| config_error("create the directory for", &dir, e))?;

    let path = get_config_path(project_root);
    let staged = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(config).map_err(|e| config_error("encode", &path, e))?;
    fs::write(&staged, json).map_err(|e| config_error("stage", &staged, e))?;
    fs::rename(&staged, &path).map_err(|e| config_error("replace", &path, e))?;

    tracing::debug!(path = %path.display(), "saved resolver config");
    Ok(())
}
