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

//! Moyu project generation.
//!
//! Turns a tree of per-module descriptors (`src/<Module>/module.json`) into one
//! native project file per module plus a workspace that references them all.
//!
//! ```text
//! loader ──► resolver ──► emitter ──► workspace
//! ```
//!
//! [`pipeline::Pipeline`] runs the stages in order; each stage is also usable
//! on its own.

pub mod config;
pub mod descriptor;
pub mod emitter;
pub mod error;
pub mod helpers;
pub mod loader;
pub mod pipeline;
pub mod project;
pub mod resolver;
pub mod workspace;

pub use config::BuildConfig;
pub use descriptor::{ModuleDescriptor, ModuleId};
pub use error::BuildError;
pub use loader::ModuleSet;
pub use pipeline::{BuildReport, Pipeline, Stage};
pub use resolver::{DependencyGraph, ResolvedDependency, UnresolvedPolicy};
pub use workspace::{DotnetCli, NativeSolution, WorkspaceBackend, WorkspaceTool};
