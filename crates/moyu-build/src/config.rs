// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::{BuildError, Result};
use crate::resolver::UnresolvedPolicy;
use crate::workspace::WorkspaceBackend;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Moyu.toml";

/// Represents the structure of the `Moyu.toml` configuration file.
///
/// Every field is optional in the file; missing fields keep their defaults.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory whose immediate subdirectories are scanned for modules.
    pub source_root: PathBuf,
    /// File name that marks a directory as a module.
    pub descriptor_file: String,
    /// Extension of generated project files.
    pub project_extension: String,
    /// Base name of the generated workspace file.
    pub workspace_name: String,
    /// Where the workspace is written. Defaults to the working directory.
    pub output_dir: Option<PathBuf>,
    pub unresolved: UnresolvedPolicy,
    pub backend: WorkspaceBackend,
    /// Embed module ids in projects and their references.
    pub link_guids: bool,
}

impl Default for BuildConfig {
    /// The layout the engine repository uses: modules under `src/`, each with
    /// a `module.json`, assembled into `Moyu.sln`.
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src"),
            descriptor_file: "module.json".to_string(),
            project_extension: "vcxproj".to_string(),
            workspace_name: "Moyu".to_string(),
            output_dir: None,
            unresolved: UnresolvedPolicy::default(),
            backend: WorkspaceBackend::default(),
            link_guids: false,
        }
    }
}

impl BuildConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|err| BuildError::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Loads the configuration.
    ///
    /// An explicitly requested file must exist. Without one, `Moyu.toml` in
    /// the working directory is used if present, and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    log::info!("No '{}' found. Using default configuration.", path.display());
                    return Ok(Self::default());
                }
                path
            }
        };

        log::info!("Found '{}'. Loading configuration.", path.display());
        let text = fs::read_to_string(&path).map_err(|err| BuildError::Config {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        Self::from_toml(&text, &path)
    }

    /// Returns the directory the workspace is written to.
    pub fn resolved_output_dir(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(|source| BuildError::Io {
                path: PathBuf::from("."),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = BuildConfig::from_toml("", Path::new("Moyu.toml")).unwrap();
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn test_fields_override_defaults() {
        let config = BuildConfig::from_toml(
            r#"
            source_root = "Engine/Source"
            workspace_name = "Game"
            unresolved = "degrade"
            backend = "native"
            link_guids = true
            "#,
            Path::new("Moyu.toml"),
        )
        .unwrap();

        assert_eq!(config.source_root, PathBuf::from("Engine/Source"));
        assert_eq!(config.workspace_name, "Game");
        assert_eq!(config.unresolved, UnresolvedPolicy::Degrade);
        assert_eq!(config.backend, WorkspaceBackend::Native);
        assert!(config.link_guids);
        assert_eq!(config.descriptor_file, "module.json");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = BuildConfig::from_toml("solution = \"x\"", Path::new("Moyu.toml")).unwrap_err();
        assert!(matches!(err, BuildError::Config { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BuildConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, BuildError::Config { .. }));
    }

    #[test]
    fn test_explicit_output_dir_is_used() {
        let config = BuildConfig {
            output_dir: Some(PathBuf::from("out")),
            ..BuildConfig::default()
        };
        assert_eq!(config.resolved_output_dir().unwrap(), PathBuf::from("out"));
    }
}
