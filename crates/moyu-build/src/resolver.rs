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

//! Resolves module dependency names against the loaded [`ModuleSet`].
//!
//! Resolution does not detect self-references or cycles; a module that names
//! itself simply references its own project.

use crate::descriptor::{ModuleDescriptor, ModuleId};
use crate::error::{BuildError, Result};
use crate::loader::ModuleSet;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What to do when a dependency names a module that was not loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Abort before anything is written.
    #[default]
    Fail,
    /// Warn and emit a path-only reference with no matched id.
    Degrade,
}

/// One dependency edge, ready to be written as a project reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// The dependency name as declared, trimmed.
    pub name: String,
    /// Directory of the dependency module. For an unresolved dependency this
    /// is where the module would live if it existed.
    pub dir: PathBuf,
    /// Id of the matched module, `None` when unresolved.
    pub id: Option<ModuleId>,
}

impl ResolvedDependency {
    pub fn is_resolved(&self) -> bool {
        self.id.is_some()
    }

    /// The reference path written into a sibling module's project,
    /// e.g. `../Core/Core.vcxproj`.
    pub fn relative_project_path(&self, extension: &str) -> String {
        let dir_name = self
            .dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone());
        format!("../{}/{}.{}", dir_name, self.name, extension)
    }
}

/// Resolved dependencies for every module, keyed by module name.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<ResolvedDependency>>,
}

impl DependencyGraph {
    /// Returns the resolved dependencies of `module`, in declaration order.
    pub fn dependencies_of(&self, module: &str) -> &[ResolvedDependency] {
        self.edges.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Counts the references that could not be matched to a loaded module.
    pub fn unresolved_count(&self) -> usize {
        self.edges
            .values()
            .flatten()
            .filter(|dep| !dep.is_resolved())
            .count()
    }
}

/// Resolves the dependencies of every module in `modules`.
pub fn resolve(modules: &ModuleSet, policy: UnresolvedPolicy) -> Result<DependencyGraph> {
    let mut graph = DependencyGraph::default();
    for module in modules {
        let resolved = resolve_module(module, modules, policy)?;
        graph.edges.insert(module.name.clone(), resolved);
    }
    Ok(graph)
}

fn resolve_module(
    module: &ModuleDescriptor,
    modules: &ModuleSet,
    policy: UnresolvedPolicy,
) -> Result<Vec<ResolvedDependency>> {
    let mut resolved = Vec::with_capacity(module.dependencies.len());
    for name in module.dependency_names() {
        let dependency = match modules.get(name) {
            Some(target) => ResolvedDependency {
                name: name.to_string(),
                dir: target.path.clone(),
                id: Some(target.id),
            },
            None => match policy {
                UnresolvedPolicy::Fail => {
                    return Err(BuildError::UnresolvedDependency {
                        module: module.name.clone(),
                        dependency: name.to_string(),
                    });
                }
                UnresolvedPolicy::Degrade => {
                    log::warn!(
                        "Module '{}' depends on unknown module '{}'; emitting an unlinked reference",
                        module.name,
                        name
                    );
                    ResolvedDependency {
                        name: name.to_string(),
                        dir: sibling_dir(&module.path, name),
                        id: None,
                    }
                }
            },
        };
        resolved.push(dependency);
    }
    Ok(resolved)
}

fn sibling_dir(module_dir: &Path, name: &str) -> PathBuf {
    module_dir
        .parent()
        .map(|parent| parent.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}
