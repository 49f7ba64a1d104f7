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

//! Error types for every stage of the generation pipeline.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = BuildError> = std::result::Result<T, E>;

/// An error raised while scanning, resolving, emitting or assembling.
///
/// Every variant names the module or path it failed on so the message printed
/// by the CLI is enough to locate the problem.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A file or directory could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A descriptor is not valid JSON, or a field has the wrong type.
    #[error("Failed to parse module descriptor '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A descriptor parsed but violates a structural rule.
    #[error("Invalid module descriptor '{}': {reason}", path.display())]
    InvalidDescriptor { path: PathBuf, reason: String },

    /// Two descriptors declare the same module name.
    #[error(
        "Duplicate module name '{name}' declared in '{}' and '{}'",
        first.display(),
        second.display()
    )]
    DuplicateModule {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A module depends on a name that no descriptor declares.
    #[error("Module '{module}' depends on unknown module '{dependency}'")]
    UnresolvedDependency { module: String, dependency: String },

    /// A generated artifact could not be written or removed.
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool could not be started at all.
    #[error("Failed to execute '{command}': {source}")]
    ToolSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An external tool ran but reported failure.
    #[error("'{command}' failed with status: {status}")]
    ToolFailed { command: String, status: ExitStatus },

    /// The configuration file is unreadable or malformed.
    #[error("Invalid configuration '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}
