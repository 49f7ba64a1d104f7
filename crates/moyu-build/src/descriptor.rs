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

//! In-memory representation of a module descriptor (`module.json`).

use crate::error::{BuildError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A per-run identifier attached to a module and its generated project.
///
/// Ids are random (version 4) and are never persisted, so two runs over the
/// same tree produce different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(Uuid);

impl ModuleId {
    /// Creates a new, random `ModuleId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the id in the braced, upper-case form used by Visual Studio,
    /// e.g. `{8BC9CEB8-8B4A-11D0-8D11-00A0C91E6BC2}`.
    pub fn to_braced_upper(&self) -> String {
        format!("{{{}}}", self.0.hyphenated()).to_uppercase()
    }
}

impl Default for ModuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_braced_upper())
    }
}

/// A module as declared by its descriptor file.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    /// Unique, case-sensitive module name.
    pub name: String,
    /// Source files relative to the module directory, in declaration order.
    pub sources: Vec<String>,
    /// Names of the modules this one links against, in declaration order.
    /// May contain blank entries; consumers skip them.
    pub dependencies: Vec<String>,
    /// Directory the descriptor was loaded from.
    pub path: PathBuf,
    /// Identifier assigned at load time.
    pub id: ModuleId,
}

impl ModuleDescriptor {
    /// Iterates over the dependency names that are not blank, trimmed.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .map(|dep| dep.trim())
            .filter(|dep| !dep.is_empty())
    }

    /// Returns the file name of this module's generated project.
    pub fn project_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.name, extension)
    }

    /// Returns the path of this module's generated project.
    pub fn project_path(&self, extension: &str) -> PathBuf {
        self.path.join(self.project_file_name(extension))
    }
}

/// The fields a descriptor may carry once keys are folded to lower case.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    name: String,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    dependencies: Vec<String>,
}

/// Parses descriptor text into a [`ModuleDescriptor`].
///
/// `descriptor_path` is only used for error messages; `module_dir` becomes the
/// module's `path`. Field names are matched without regard to case.
pub fn parse_descriptor(
    text: &str,
    descriptor_path: &Path,
    module_dir: &Path,
) -> Result<ModuleDescriptor> {
    let parse_err = |source: serde_json::Error| BuildError::Parse {
        path: descriptor_path.to_path_buf(),
        source,
    };
    let invalid = |reason: String| BuildError::InvalidDescriptor {
        path: descriptor_path.to_path_buf(),
        reason,
    };

    let value: Value = serde_json::from_str(text).map_err(parse_err)?;
    let Value::Object(fields) = value else {
        return Err(invalid("expected a JSON object at the top level".into()));
    };

    let mut folded = Map::with_capacity(fields.len());
    for (key, value) in fields {
        let lower = key.to_lowercase();
        if folded.contains_key(&lower) {
            return Err(invalid(format!("field '{key}' is declared more than once")));
        }
        folded.insert(lower, value);
    }

    let raw: RawDescriptor = serde_json::from_value(Value::Object(folded)).map_err(parse_err)?;
    if raw.name.trim().is_empty() {
        return Err(invalid("field 'name' must not be blank".into()));
    }

    Ok(ModuleDescriptor {
        name: raw.name,
        sources: raw.sources,
        dependencies: raw.dependencies,
        path: module_dir.to_path_buf(),
        id: ModuleId::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ModuleDescriptor> {
        parse_descriptor(text, Path::new("src/Core/module.json"), Path::new("src/Core"))
    }

    #[test]
    fn test_parse_full_descriptor() {
        let module = parse(
            r#"{ "name": "Core", "sources": ["a.c", "b.c", "a.c"], "dependencies": ["Base"] }"#,
        )
        .unwrap();

        assert_eq!(module.name, "Core");
        assert_eq!(module.sources, vec!["a.c", "b.c", "a.c"]);
        assert_eq!(module.dependencies, vec!["Base"]);
        assert_eq!(module.path, PathBuf::from("src/Core"));
    }

    #[test]
    fn test_field_names_are_case_insensitive() {
        let module =
            parse(r#"{ "NAME": "Core", "Sources": ["core.c"], "DePeNdEnCiEs": [] }"#).unwrap();
        assert_eq!(module.name, "Core");
        assert_eq!(module.sources, vec!["core.c"]);
        assert!(module.dependencies.is_empty());
    }

    #[test]
    fn test_optional_lists_default_to_empty() {
        let module = parse(r#"{ "name": "Core" }"#).unwrap();
        assert!(module.sources.is_empty());
        assert!(module.dependencies.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let module = parse(r#"{ "name": "Core", "kind": "library" }"#).unwrap();
        assert_eq!(module.name, "Core");
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let err = parse(r#"{ "sources": [] }"#).unwrap_err();
        assert!(matches!(err, BuildError::Parse { .. }));
        assert!(err.to_string().contains("src/Core/module.json"));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let err = parse(r#"{ "name": "   " }"#).unwrap_err();
        assert!(matches!(err, BuildError::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_case_folded_duplicate_field_is_rejected() {
        let err = parse(r#"{ "name": "Core", "Name": "Other" }"#).unwrap_err();
        assert!(matches!(err, BuildError::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let err = parse(r#"["Core"]"#).unwrap_err();
        assert!(matches!(err, BuildError::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let err = parse(r#"{ "name": "Core", "sources": "core.c" }"#).unwrap_err();
        assert!(matches!(err, BuildError::Parse { .. }));
    }

    #[test]
    fn test_dependency_names_skip_blanks() {
        let module = parse(r#"{ "name": "App", "dependencies": ["Core", "", "  ", " Base "] }"#)
            .unwrap();
        let names: Vec<&str> = module.dependency_names().collect();
        assert_eq!(names, vec!["Core", "Base"]);
    }

    #[test]
    fn test_ids_are_unique_and_braced() {
        let a = ModuleId::new();
        let b = ModuleId::new();
        assert_ne!(a, b);

        let text = a.to_braced_upper();
        assert_eq!(text.len(), 38);
        assert!(text.starts_with('{') && text.ends_with('}'));
        assert_eq!(text, text.to_uppercase());
    }
}
