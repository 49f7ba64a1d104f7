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

//! Drives the generation stages in order.
//!
//! `Scanning → Resolving → Emitting → Assembling → Done`. The first error
//! stops the run; nothing is rolled back.

use crate::config::BuildConfig;
use crate::emitter::{emit_all, EmitOptions};
use crate::error::{BuildError, Result};
use crate::loader::{load_modules, ModuleSet};
use crate::resolver::{resolve, DependencyGraph};
use crate::workspace::{assemble, workspace_candidates, WorkspaceTool};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// The states a generation run moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scanning,
    Resolving,
    Emitting,
    Assembling,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Scanning => "Scanning modules",
            Stage::Resolving => "Resolving dependencies",
            Stage::Emitting => "Generating projects",
            Stage::Assembling => "Creating workspace",
            Stage::Done => "Done",
            Stage::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// What a completed run produced.
#[derive(Debug)]
pub struct BuildReport {
    /// Project files, in module-name order.
    pub projects: Vec<PathBuf>,
    pub workspace: PathBuf,
    /// References emitted without a matching module.
    pub unresolved: usize,
}

/// Runs a single generation pass.
pub struct Pipeline<'a> {
    config: &'a BuildConfig,
    stage: Stage,
    observer: Option<Box<dyn FnMut(Stage) + 'a>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a BuildConfig) -> Self {
        Self {
            config,
            stage: Stage::Scanning,
            observer: None,
        }
    }

    /// Registers a callback invoked on every stage transition.
    pub fn on_stage(mut self, observer: impl FnMut(Stage) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        log::info!("{}...", stage);
        self.stage = stage;
        if let Some(observer) = self.observer.as_mut() {
            observer(stage);
        }
    }

    /// Loads and resolves the module tree without writing anything.
    ///
    /// A successful scan ends in [`Stage::Done`]; emission and assembly are
    /// skipped.
    pub fn scan(&mut self) -> Result<(ModuleSet, DependencyGraph)> {
        let result = self.scan_inner();
        self.enter(if result.is_ok() {
            Stage::Done
        } else {
            Stage::Failed
        });
        result
    }

    fn scan_inner(&mut self) -> Result<(ModuleSet, DependencyGraph)> {
        self.enter(Stage::Scanning);
        let modules = load_modules(&self.config.source_root, &self.config.descriptor_file)?;
        log::info!(
            "Found {} module(s) under '{}'",
            modules.len(),
            self.config.source_root.display()
        );

        self.enter(Stage::Resolving);
        let graph = resolve(&modules, self.config.unresolved)?;
        Ok((modules, graph))
    }

    /// Runs every stage, assembling the workspace with `tool`.
    pub fn run(&mut self, tool: &mut dyn WorkspaceTool) -> Result<BuildReport> {
        match self.run_inner(tool) {
            Ok(report) => {
                self.enter(Stage::Done);
                Ok(report)
            }
            Err(err) => {
                self.enter(Stage::Failed);
                Err(err)
            }
        }
    }

    fn run_inner(&mut self, tool: &mut dyn WorkspaceTool) -> Result<BuildReport> {
        let (modules, graph) = self.scan_inner()?;

        self.enter(Stage::Emitting);
        let options = EmitOptions {
            extension: self.config.project_extension.clone(),
            link_guids: self.config.link_guids,
        };
        let projects = emit_all(&modules, &graph, &options)?;

        self.enter(Stage::Assembling);
        let output_dir = self.config.resolved_output_dir()?;
        let workspace = assemble(
            &modules,
            &self.config.project_extension,
            &output_dir,
            &self.config.workspace_name,
            tool,
        )?;

        Ok(BuildReport {
            projects,
            workspace,
            unresolved: graph.unresolved_count(),
        })
    }
}

/// Deletes the project files and the workspace a previous run generated.
///
/// Returns the paths that were removed. Modules are discovered the same way
/// as during generation, so descriptors must still be valid.
pub fn clean(config: &BuildConfig) -> Result<Vec<PathBuf>> {
    let modules = load_modules(&config.source_root, &config.descriptor_file)?;
    let mut candidates: Vec<PathBuf> = modules
        .iter()
        .map(|module| module.project_path(&config.project_extension))
        .collect();
    candidates.extend(workspace_candidates(
        &config.resolved_output_dir()?,
        &config.workspace_name,
    ));

    let mut removed = Vec::new();
    for path in candidates {
        if !path.is_file() {
            continue;
        }
        fs::remove_file(&path).map_err(|source| BuildError::Write {
            path: path.clone(),
            source,
        })?;
        log::debug!("Removed '{}'", path.display());
        removed.push(path);
    }
    Ok(removed)
}
