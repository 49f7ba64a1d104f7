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

use anyhow::Result;
use moyu_build::pipeline::{self, Pipeline, Stage};
use moyu_build::{BuildConfig, BuildError, NativeSolution, UnresolvedPolicy, WorkspaceBackend};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// --- Test Setup: a module tree inside a temporary directory ---
fn write_module(root: &Path, name: &str, sources: &[&str], deps: &[&str]) {
    let dir = root.join("src").join(name);
    fs::create_dir_all(&dir).unwrap();
    let json = format!(
        r#"{{ "Name": "{}", "Sources": {:?}, "Dependencies": {:?} }}"#,
        name, sources, deps
    );
    fs::write(dir.join("module.json"), json).unwrap();
}

fn config_for(root: &Path) -> BuildConfig {
    BuildConfig {
        source_root: root.join("src"),
        output_dir: Some(root.to_path_buf()),
        backend: WorkspaceBackend::Native,
        ..BuildConfig::default()
    }
}

fn generate(config: &BuildConfig) -> Result<moyu_build::BuildReport, BuildError> {
    Pipeline::new(config).run(&mut NativeSolution::default())
}
// ---

#[test]
fn test_core_and_app_scenario() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "Core", &["core.c"], &[]);
    write_module(root.path(), "App", &["app.c"], &["Core"]);

    let report = generate(&config_for(root.path()))?;
    assert_eq!(report.projects.len(), 2);
    assert_eq!(report.unresolved, 0);

    let core = fs::read_to_string(root.path().join("src/Core/Core.vcxproj"))?;
    assert_eq!(core.matches("<ClCompile ").count(), 1);
    assert!(core.contains("<ClCompile Include=\"core.c\" />"));
    assert!(!core.contains("<ProjectReference"));

    let app = fs::read_to_string(root.path().join("src/App/App.vcxproj"))?;
    assert_eq!(app.matches("<ClCompile ").count(), 1);
    assert!(app.contains("<ProjectReference Include=\"../Core/Core.vcxproj\" />"));

    let workspace = fs::read_to_string(&report.workspace)?;
    assert_eq!(report.workspace, root.path().join("Moyu.sln"));
    assert!(workspace.contains("\"Core\", \"src\\Core\\Core.vcxproj\""));
    assert!(workspace.contains("\"App\", \"src\\App\\App.vcxproj\""));
    Ok(())
}

#[test]
fn test_one_project_per_module_plus_workspace() -> Result<()> {
    let root = tempdir()?;
    for name in ["Base", "Platform", "Runtime", "Editor"] {
        write_module(root.path(), name, &["a.cpp"], &["Base"]);
    }
    fs::create_dir_all(root.path().join("src/ThirdParty"))?;

    let report = generate(&config_for(root.path()))?;
    assert_eq!(report.projects.len(), 4);
    for project in &report.projects {
        assert!(project.is_file());
    }
    assert!(!root.path().join("src/ThirdParty/ThirdParty.vcxproj").exists());
    assert_eq!(
        fs::read_to_string(&report.workspace)?
            .matches("EndProject")
            .count(),
        4
    );
    Ok(())
}

#[test]
fn test_sources_keep_declaration_order() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "Core", &["z.c", "a.c", "m.c", "a.c"], &[]);

    generate(&config_for(root.path()))?;
    let text = fs::read_to_string(root.path().join("src/Core/Core.vcxproj"))?;
    let includes: Vec<&str> = text
        .lines()
        .filter_map(|line| line.trim().strip_prefix("<ClCompile Include=\""))
        .map(|rest| rest.trim_end_matches("\" />"))
        .collect();
    assert_eq!(includes, vec!["z.c", "a.c", "m.c", "a.c"]);
    Ok(())
}

#[test]
fn test_regeneration_is_byte_identical() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "Core", &["core.c"], &[]);
    write_module(root.path(), "App", &["app.c", "main.c"], &["Core", ""]);
    let config = config_for(root.path());

    generate(&config)?;
    let first_core = fs::read(root.path().join("src/Core/Core.vcxproj"))?;
    let first_app = fs::read(root.path().join("src/App/App.vcxproj"))?;

    generate(&config)?;
    assert_eq!(first_core, fs::read(root.path().join("src/Core/Core.vcxproj"))?);
    assert_eq!(first_app, fs::read(root.path().join("src/App/App.vcxproj"))?);
    Ok(())
}

#[test]
fn test_unknown_dependency_fails_before_emitting() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "App", &["app.c"], &["Ghost"]);

    let err = generate(&config_for(root.path())).unwrap_err();
    assert!(matches!(
        err,
        BuildError::UnresolvedDependency { ref dependency, .. } if dependency == "Ghost"
    ));
    assert!(!root.path().join("src/App/App.vcxproj").exists());
    assert!(!root.path().join("Moyu.sln").exists());
    Ok(())
}

#[test]
fn test_unknown_dependency_degrades_when_allowed() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "App", &["app.c"], &["Ghost"]);
    let config = BuildConfig {
        unresolved: UnresolvedPolicy::Degrade,
        link_guids: true,
        ..config_for(root.path())
    };

    let report = generate(&config)?;
    assert_eq!(report.unresolved, 1);

    let app = fs::read_to_string(root.path().join("src/App/App.vcxproj"))?;
    assert!(app.contains("<ProjectReference Include=\"../Ghost/Ghost.vcxproj\" />"));
    assert!(app.contains("<ProjectGuid>"));
    Ok(())
}

#[test]
fn test_empty_tree_produces_only_workspace() -> Result<()> {
    let root = tempdir()?;
    fs::create_dir_all(root.path().join("src/Docs"))?;

    let report = generate(&config_for(root.path()))?;
    assert!(report.projects.is_empty());
    assert!(report.workspace.is_file());
    Ok(())
}

#[test]
fn test_duplicate_module_names_are_rejected() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "Core", &[], &[]);
    let other = root.path().join("src/CoreCopy");
    fs::create_dir_all(&other)?;
    fs::write(other.join("module.json"), r#"{ "name": "Core" }"#)?;

    let err = generate(&config_for(root.path())).unwrap_err();
    assert!(matches!(err, BuildError::DuplicateModule { .. }));
    assert!(!root.path().join("src/Core/Core.vcxproj").exists());
    Ok(())
}

#[test]
fn test_write_failure_aborts_the_run() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "Core", &[], &[]);
    // A directory where the project file should go makes the write fail.
    fs::create_dir_all(root.path().join("src/Core/Core.vcxproj"))?;

    let err = generate(&config_for(root.path())).unwrap_err();
    assert!(matches!(err, BuildError::Write { .. }));
    assert!(err.to_string().contains("Core.vcxproj"));
    assert!(!root.path().join("Moyu.sln").exists());
    Ok(())
}

#[test]
fn test_stages_are_visited_in_order() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "Core", &["core.c"], &[]);
    let config = config_for(root.path());

    let mut seen = Vec::new();
    Pipeline::new(&config)
        .on_stage(|stage| seen.push(stage))
        .run(&mut NativeSolution::default())?;
    assert_eq!(
        seen,
        vec![
            Stage::Scanning,
            Stage::Resolving,
            Stage::Emitting,
            Stage::Assembling,
            Stage::Done
        ]
    );
    Ok(())
}

#[test]
fn test_failure_ends_in_failed_stage() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "App", &[], &["Ghost"]);
    let config = config_for(root.path());

    let mut pipeline = Pipeline::new(&config);
    assert!(pipeline.run(&mut NativeSolution::default()).is_err());
    assert_eq!(pipeline.stage(), Stage::Failed);
    Ok(())
}

#[test]
fn test_clean_removes_generated_files() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "Core", &["core.c"], &[]);
    write_module(root.path(), "App", &["app.c"], &["Core"]);
    let config = config_for(root.path());
    generate(&config)?;

    let removed = pipeline::clean(&config)?;
    assert_eq!(removed.len(), 3);
    assert!(!root.path().join("src/Core/Core.vcxproj").exists());
    assert!(!root.path().join("Moyu.sln").exists());
    assert!(root.path().join("src/Core/module.json").exists());
    Ok(())
}

#[test]
fn test_workspace_in_sibling_directory_links_projects() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "Core", &["core.c"], &[]);
    let build = root.path().join("build");
    fs::create_dir_all(&build)?;
    let config = BuildConfig {
        output_dir: Some(build.clone()),
        ..config_for(root.path())
    };

    let report = generate(&config)?;
    assert_eq!(report.workspace, build.join("Moyu.sln"));
    let workspace = fs::read_to_string(&report.workspace)?;
    assert!(workspace.contains("\"Core\", \"..\\src\\Core\\Core.vcxproj\""));
    Ok(())
}

#[test]
fn test_scan_ends_in_done_without_writing() -> Result<()> {
    let root = tempdir()?;
    write_module(root.path(), "Core", &["core.c"], &[]);
    write_module(root.path(), "App", &["app.c"], &["Core"]);
    let config = config_for(root.path());

    let mut seen = Vec::new();
    let mut pipeline = Pipeline::new(&config).on_stage(|stage| seen.push(stage));
    let (modules, graph) = pipeline.scan()?;
    assert_eq!(pipeline.stage(), Stage::Done);
    drop(pipeline);

    assert_eq!(modules.len(), 2);
    assert_eq!(graph.dependencies_of("App")[0].name, "Core");
    assert_eq!(seen, vec![Stage::Scanning, Stage::Resolving, Stage::Done]);
    assert!(!root.path().join("src/Core/Core.vcxproj").exists());
    assert!(!root.path().join("Moyu.sln").exists());
    Ok(())
}
