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

//! Scans a source root for module directories and loads their descriptors.

use crate::descriptor::{parse_descriptor, ModuleDescriptor};
use crate::error::{BuildError, Result};
use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// The name-keyed set of every module loaded in a run.
///
/// Iteration is in ascending module-name order, independent of the order the
/// filesystem returned the directories in.
#[derive(Debug, Default)]
pub struct ModuleSet {
    modules: BTreeMap<String, ModuleDescriptor>,
}

impl ModuleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module, rejecting a name that is already taken.
    pub fn insert(&mut self, module: ModuleDescriptor) -> Result<()> {
        match self.modules.entry(module.name.clone()) {
            btree_map::Entry::Occupied(existing) => Err(BuildError::DuplicateModule {
                name: module.name,
                first: existing.get().path.clone(),
                second: module.path,
            }),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(module);
                Ok(())
            }
        }
    }

    /// Looks up a module by its exact name.
    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates over the modules in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.values()
    }
}

impl<'a> IntoIterator for &'a ModuleSet {
    type Item = &'a ModuleDescriptor;
    type IntoIter = btree_map::Values<'a, String, ModuleDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.values()
    }
}

/// Loads every module found directly under `source_root`.
///
/// A subdirectory is a module when it contains `descriptor_file`; any other
/// subdirectory is skipped. The first unreadable or malformed descriptor, or
/// the first duplicate name, aborts the whole load.
pub fn load_modules(source_root: &Path, descriptor_file: &str) -> Result<ModuleSet> {
    let metadata = fs::metadata(source_root).map_err(|source| BuildError::Io {
        path: source_root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(BuildError::Io {
            path: source_root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let mut modules = ModuleSet::new();
    let entries = WalkDir::new(source_root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = entry.map_err(|err| BuildError::Io {
            path: err.path().unwrap_or(source_root).to_path_buf(),
            source: err.into(),
        })?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let descriptor_path = dir.join(descriptor_file);
        if !descriptor_path.is_file() {
            log::debug!("Skipping '{}': no {}", dir.display(), descriptor_file);
            continue;
        }

        let text = fs::read_to_string(&descriptor_path).map_err(|source| BuildError::Io {
            path: descriptor_path.clone(),
            source,
        })?;
        let module = parse_descriptor(&text, &descriptor_path, dir)?;
        log::debug!(
            "Loaded module '{}' from '{}' ({} sources, {} dependencies)",
            module.name,
            dir.display(),
            module.sources.len(),
            module.dependencies.len()
        );
        modules.insert(module)?;
    }

    Ok(modules)
}
