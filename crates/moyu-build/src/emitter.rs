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

//! Emits one project file per module.

use crate::descriptor::ModuleDescriptor;
use crate::error::Result;
use crate::loader::ModuleSet;
use crate::project::ProjectRoot;
use crate::resolver::{DependencyGraph, ResolvedDependency};
use std::path::PathBuf;

/// Item kind for translation units.
pub const COMPILE_ITEM: &str = "ClCompile";
/// Item kind for links to sibling projects.
pub const REFERENCE_ITEM: &str = "ProjectReference";

/// Settings shared by every emitted project.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Extension of generated project files, without the dot.
    pub extension: String,
    /// Write module ids into projects and their references.
    pub link_guids: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            extension: "vcxproj".to_string(),
            link_guids: false,
        }
    }
}

/// Builds the project model for a single module.
pub fn build_project(
    module: &ModuleDescriptor,
    dependencies: &[ResolvedDependency],
    options: &EmitOptions,
) -> ProjectRoot {
    let mut project = ProjectRoot::new();

    if options.link_guids {
        project
            .add_property_group()
            .add_property("ProjectGuid", module.id.to_braced_upper());
    }

    let sources = project.add_item_group();
    for source in &module.sources {
        sources.add_item(COMPILE_ITEM, source.as_str());
    }

    let references = project.add_item_group();
    for dependency in dependencies {
        let item = references.add_item(
            REFERENCE_ITEM,
            dependency.relative_project_path(&options.extension),
        );
        if options.link_guids {
            if let Some(id) = dependency.id {
                item.add_metadata("Project", id.to_braced_upper());
            }
        }
    }

    project
}

/// Writes a project file for every module and returns their paths in
/// module order.
///
/// The first failed write aborts; projects already written stay on disk.
pub fn emit_all(
    modules: &ModuleSet,
    graph: &DependencyGraph,
    options: &EmitOptions,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(modules.len());
    for module in modules {
        let project = build_project(module, graph.dependencies_of(&module.name), options);
        let path = module.project_path(&options.extension);
        project.save(&path)?;
        log::debug!("Wrote '{}'", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ModuleId;

    fn module(name: &str, sources: &[&str]) -> ModuleDescriptor {
        ModuleDescriptor {
            name: name.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            dependencies: Vec::new(),
            path: PathBuf::from("src").join(name),
            id: ModuleId::new(),
        }
    }

    #[test]
    fn test_sources_become_compile_items_in_order() {
        let module = module("Core", &["b.c", "a.c", "b.c"]);
        let project = build_project(&module, &[], &EmitOptions::default());

        let includes: Vec<&str> = project
            .items_of_kind(COMPILE_ITEM)
            .map(|item| item.include.as_str())
            .collect();
        assert_eq!(includes, vec!["b.c", "a.c", "b.c"]);
        assert_eq!(project.items_of_kind(REFERENCE_ITEM).count(), 0);
    }

    #[test]
    fn test_references_carry_no_id_by_default() {
        let core = module("Core", &[]);
        let app = module("App", &["app.c"]);
        let deps = vec![ResolvedDependency {
            name: "Core".into(),
            dir: core.path.clone(),
            id: Some(core.id),
        }];

        let project = build_project(&app, &deps, &EmitOptions::default());
        let refs: Vec<_> = project.items_of_kind(REFERENCE_ITEM).collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].include, "../Core/Core.vcxproj");
        assert_eq!(refs[0].metadata("Project"), None);
        assert!(project.property_groups().is_empty());
    }

    #[test]
    fn test_link_guids_enriches_resolved_references() {
        let core = module("Core", &[]);
        let app = module("App", &[]);
        let deps = vec![
            ResolvedDependency {
                name: "Core".into(),
                dir: core.path.clone(),
                id: Some(core.id),
            },
            ResolvedDependency {
                name: "Ghost".into(),
                dir: PathBuf::from("src/Ghost"),
                id: None,
            },
        ];
        let options = EmitOptions {
            link_guids: true,
            ..EmitOptions::default()
        };

        let project = build_project(&app, &deps, &options);
        let app_guid = app.id.to_braced_upper();
        assert_eq!(
            project.property_groups()[0].get("ProjectGuid"),
            Some(app_guid.as_str())
        );

        let refs: Vec<_> = project.items_of_kind(REFERENCE_ITEM).collect();
        let core_guid = core.id.to_braced_upper();
        assert_eq!(refs[0].metadata("Project"), Some(core_guid.as_str()));
        assert_eq!(refs[1].metadata("Project"), None);
    }

    #[test]
    fn test_custom_extension() {
        let core = module("Core", &[]);
        let deps = vec![ResolvedDependency {
            name: "Core".into(),
            dir: core.path.clone(),
            id: Some(core.id),
        }];
        let options = EmitOptions {
            extension: "proj".into(),
            ..EmitOptions::default()
        };
        let project = build_project(&module("App", &[]), &deps, &options);
        assert_eq!(
            project.items_of_kind(REFERENCE_ITEM).next().unwrap().include,
            "../Core/Core.proj"
        );
    }
}
