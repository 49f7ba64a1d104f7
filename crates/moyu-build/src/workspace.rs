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

//! Assembles the top-level workspace (`.sln`) that references every project.
//!
//! The workspace is always rebuilt from scratch: an existing file is removed,
//! an empty workspace is created, then projects are added one at a time in
//! module-name order. How each step is carried out is up to the
//! [`WorkspaceTool`] in use.

use crate::descriptor::{ModuleDescriptor, ModuleId};
use crate::error::{BuildError, Result};
use crate::helpers::execute_command;
use crate::loader::ModuleSet;
use serde::Deserialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the generated workspace file.
pub const WORKSPACE_EXTENSION: &str = "sln";

/// XML solution format that newer `dotnet new sln` templates create instead.
pub const XML_WORKSPACE_EXTENSION: &str = "slnx";

/// Project type GUID Visual Studio uses for C++ projects.
const CPP_PROJECT_TYPE: &str = "{8BC9CEB8-8B4A-11D0-8D11-00A0C91E6BC2}";

/// Selects the [`WorkspaceTool`] used by the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceBackend {
    /// Drive the `dotnet` CLI (`dotnet new sln`, `dotnet sln add`).
    #[default]
    Dotnet,
    /// Write the solution file directly.
    Native,
}

impl WorkspaceBackend {
    pub fn create_tool(self) -> Box<dyn WorkspaceTool> {
        match self {
            WorkspaceBackend::Dotnet => Box::new(DotnetCli::default()),
            WorkspaceBackend::Native => Box::new(NativeSolution::default()),
        }
    }
}

/// The two operations needed to build a workspace.
pub trait WorkspaceTool {
    /// Creates an empty workspace called `name` inside `dir` and returns its path.
    fn create(&mut self, dir: &Path, name: &str) -> Result<PathBuf>;

    /// Adds the project of `module`, located at `project`, to `workspace`.
    fn add(&mut self, workspace: &Path, module: &ModuleDescriptor, project: &Path) -> Result<()>;
}

/// Returns the path of the workspace file named `name` inside `dir`.
pub fn workspace_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{WORKSPACE_EXTENSION}"))
}

/// Every file a workspace named `name` may occupy in `dir`.
pub fn workspace_candidates(dir: &Path, name: &str) -> [PathBuf; 2] {
    [
        workspace_path(dir, name),
        dir.join(format!("{name}.{XML_WORKSPACE_EXTENSION}")),
    ]
}

/// Returns the workspace file a tool actually created in `dir`.
pub fn locate_created_workspace(dir: &Path, name: &str) -> Result<PathBuf> {
    let candidates = workspace_candidates(dir, name);
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| BuildError::Io {
            path: candidates[0].clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "the workspace tool did not create a solution file",
            ),
        })
}

/// Rebuilds the workspace in `dir` so that it references the project of every
/// module in `modules`.
pub fn assemble(
    modules: &ModuleSet,
    project_extension: &str,
    dir: &Path,
    name: &str,
    tool: &mut dyn WorkspaceTool,
) -> Result<PathBuf> {
    for previous in workspace_candidates(dir, name) {
        if !previous.exists() {
            continue;
        }
        log::debug!("Removing previous workspace '{}'", previous.display());
        fs::remove_file(&previous).map_err(|source| BuildError::Write {
            path: previous.clone(),
            source,
        })?;
    }

    let workspace = tool.create(dir, name)?;
    for module in modules {
        let project = module.project_path(project_extension);
        tool.add(&workspace, module, &project)?;
        log::debug!("Added '{}' to '{}'", project.display(), workspace.display());
    }
    Ok(workspace)
}

/// Drives the `dotnet` command-line tool.
#[derive(Debug, Clone)]
pub struct DotnetCli {
    pub program: String,
}

impl Default for DotnetCli {
    fn default() -> Self {
        Self {
            program: "dotnet".to_string(),
        }
    }
}

impl WorkspaceTool for DotnetCli {
    fn create(&mut self, dir: &Path, name: &str) -> Result<PathBuf> {
        execute_command(
            &self.program,
            &["new", "sln", "-n", name],
            dir,
            "Create workspace",
        )?;
        // Recent SDKs default to `.slnx`; add to whichever file was made.
        locate_created_workspace(dir, name)
    }

    fn add(&mut self, workspace: &Path, _module: &ModuleDescriptor, project: &Path) -> Result<()> {
        // The tool runs inside the workspace directory, so the project path
        // must not depend on our own working directory.
        let project = fs::canonicalize(project).map_err(|source| BuildError::Io {
            path: project.to_path_buf(),
            source,
        })?;
        let dir = workspace.parent().unwrap_or_else(|| Path::new("."));
        let workspace_file = workspace
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let project = project.to_string_lossy().into_owned();

        execute_command(
            &self.program,
            &["sln", workspace_file.as_str(), "add", project.as_str()],
            dir,
            "Add project",
        )
    }
}

#[derive(Debug, Clone)]
struct SolutionEntry {
    name: String,
    relative_path: String,
    id: ModuleId,
}

/// Writes a Visual Studio solution file without any external tool.
///
/// The file is rewritten after every step so it is valid at all times.
#[derive(Debug, Default)]
pub struct NativeSolution {
    dir: PathBuf,
    entries: Vec<SolutionEntry>,
}

impl NativeSolution {
    /// Renders the solution text for the projects added so far.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("\r\nMicrosoft Visual Studio Solution File, Format Version 12.00\r\n");
        out.push_str("# Visual Studio Version 17\r\n");
        out.push_str("VisualStudioVersion = 17.0.31903.59\r\n");
        out.push_str("MinimumVisualStudioVersion = 10.0.40219.1\r\n");
        for entry in &self.entries {
            let _ = write!(
                out,
                "Project(\"{}\") = \"{}\", \"{}\", \"{}\"\r\nEndProject\r\n",
                CPP_PROJECT_TYPE,
                entry.name,
                entry.relative_path,
                entry.id.to_braced_upper()
            );
        }
        out.push_str("Global\r\n");
        out.push_str("\tGlobalSection(SolutionProperties) = preSolution\r\n");
        out.push_str("\t\tHideSolutionNode = FALSE\r\n");
        out.push_str("\tEndGlobalSection\r\n");
        out.push_str("EndGlobal\r\n");
        out
    }

    fn write(&self, workspace: &Path) -> Result<()> {
        fs::write(workspace, self.render()).map_err(|source| BuildError::Write {
            path: workspace.to_path_buf(),
            source,
        })
    }

    /// Expresses `project` relative to the solution directory with Windows
    /// separators, climbing with `..` when the project lies outside it.
    /// Falls back to the absolute path when no relative path exists (e.g. a
    /// different drive).
    fn relative_to_dir(&self, project: &Path) -> String {
        let absolute = |p: &Path| fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
        let dir = absolute(&self.dir);
        let project = absolute(project);
        match pathdiff::diff_paths(&project, &dir) {
            Some(relative) if relative.is_relative() => relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("\\"),
            _ => project.display().to_string(),
        }
    }
}

impl WorkspaceTool for NativeSolution {
    fn create(&mut self, dir: &Path, name: &str) -> Result<PathBuf> {
        self.dir = dir.to_path_buf();
        self.entries.clear();
        let workspace = workspace_path(dir, name);
        self.write(&workspace)?;
        Ok(workspace)
    }

    fn add(&mut self, workspace: &Path, module: &ModuleDescriptor, project: &Path) -> Result<()> {
        let relative_path = self.relative_to_dir(project);
        self.entries.push(SolutionEntry {
            name: module.name.clone(),
            relative_path,
            id: module.id,
        });
        self.write(workspace)
    }
}
