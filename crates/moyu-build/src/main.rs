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

// Project generation for the Moyu engine
// Run with: cargo run -p moyu-build -- <command>

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use moyu_build::helpers::*;
use moyu_build::pipeline::{self, Pipeline};
use moyu_build::{BuildConfig, UnresolvedPolicy, WorkspaceBackend};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "moyu-build",
    version,
    about = "Generates native projects and the Moyu workspace from module descriptors"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate every project file and the workspace (default).
    Generate,
    /// Load and resolve modules, then list them without writing anything.
    Scan,
    /// Delete generated project files and the workspace.
    Clean,
}

/// Command-line values that take precedence over `Moyu.toml`.
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Configuration file (defaults to ./Moyu.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory scanned for module subdirectories.
    #[arg(long, global = true)]
    source_root: Option<PathBuf>,

    /// Directory the workspace is written to.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Base name of the workspace file.
    #[arg(long, global = true)]
    workspace_name: Option<String>,

    /// How the workspace file is produced.
    #[arg(long, value_enum, global = true)]
    backend: Option<WorkspaceBackend>,

    /// Emit references to unknown modules instead of failing.
    #[arg(long, global = true)]
    allow_unresolved: bool,

    /// Embed module ids in projects and project references.
    #[arg(long, global = true)]
    link_guids: bool,
}

impl Overrides {
    fn apply(self, config: &mut BuildConfig) {
        if let Some(source_root) = self.source_root {
            config.source_root = source_root;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = Some(output_dir);
        }
        if let Some(name) = self.workspace_name {
            config.workspace_name = name;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if self.allow_unresolved {
            config.unresolved = UnresolvedPolicy::Degrade;
        }
        if self.link_guids {
            config.link_guids = true;
        }
    }
}

fn main() {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        print_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = BuildConfig::load(cli.overrides.config.as_deref())
        .context("Failed to load build configuration")?;
    cli.overrides.apply(&mut config);

    match cli.command.unwrap_or(Commands::Generate) {
        Commands::Generate => generate(&config),
        Commands::Scan => scan(&config),
        Commands::Clean => clean(&config),
    }
}

fn generate(config: &BuildConfig) -> Result<()> {
    println!("{}", BANNER);
    let start_time = Instant::now();

    let mut tool = config.backend.create_tool();
    let report = Pipeline::new(config)
        .on_stage(|stage| match stage {
            pipeline::Stage::Scanning => print_task_start("Scanning Modules", MAGNIFIER, CYAN),
            pipeline::Stage::Emitting => print_task_start("Generating Projects", HAMMER, BLUE),
            pipeline::Stage::Assembling => print_task_start("Creating Workspace", GEAR, MAGENTA),
            _ => {}
        })
        .run(tool.as_mut())
        .context("Project generation failed")?;

    for project in &report.projects {
        println!("  {}{}{} {}", GREEN, CHECK, RESET, project.display());
    }
    if report.unresolved > 0 {
        println!(
            "{}{} ⚠ {} unresolved reference(s) emitted without a project id{}",
            BOLD, YELLOW, report.unresolved, RESET
        );
    }
    print_success(&format!(
        "Generated {} project(s) and '{}' in {:.2}s {}",
        report.projects.len(),
        report.workspace.display(),
        start_time.elapsed().as_secs_f64(),
        ROCKET
    ));
    Ok(())
}

fn scan(config: &BuildConfig) -> Result<()> {
    print_task_start("Scanning Modules", MAGNIFIER, CYAN);
    let (modules, graph) = Pipeline::new(config)
        .scan()
        .context("Module scan failed")?;

    if modules.is_empty() {
        print_info(&format!(
            "No modules found under '{}'",
            config.source_root.display()
        ));
        return Ok(());
    }

    for module in &modules {
        println!(
            "{}{}{} ({}) - {} source(s)",
            BOLD,
            module.name,
            RESET,
            module.path.display(),
            module.sources.len()
        );
        for dep in graph.dependencies_of(&module.name) {
            let marker = if dep.is_resolved() { CHECK } else { CROSS };
            println!(
                "    {} {}",
                marker,
                dep.relative_project_path(&config.project_extension)
            );
        }
    }
    print_success(&format!("{} module(s) resolved", modules.len()));
    Ok(())
}

fn clean(config: &BuildConfig) -> Result<()> {
    print_task_start("Cleaning Generated Files", BRUSH, MAGENTA);
    let removed = pipeline::clean(config).context("Clean failed")?;
    for path in &removed {
        println!("  {}{}{} {}", RED, CROSS, RESET, path.display());
    }
    print_success(&format!("Removed {} file(s)", removed.len()));
    Ok(())
}
