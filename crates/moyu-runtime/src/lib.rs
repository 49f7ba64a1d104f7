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

//! The Moyu application host.
//!
//! An [`Application`] owns exactly one [`AppContext`] and one [`Game`], and
//! drives the game through its lifecycle:
//! `init → load → update/draw per frame → unload → exit`.
//! Native hosts enter through [`ffi::moyu_runtime_main`].

pub mod context;
pub mod editor;
pub mod ffi;
pub mod game;

pub use context::AppContext;
pub use editor::Editor;
pub use game::{Application, Game};
