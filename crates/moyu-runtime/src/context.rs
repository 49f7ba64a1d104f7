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

//! Per-application state handed to every lifecycle hook.

use std::path::PathBuf;

/// State owned by a running [`Application`](crate::Application).
///
/// There is no process-wide "current application"; hooks receive the context
/// of the application that is calling them.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Directory the host was launched from.
    pub root_path: PathBuf,
    /// Arguments passed by the host, program name excluded.
    pub args: Vec<String>,
    /// Number of completed frames.
    pub frame: u64,
    /// Seconds simulated by the current frame.
    pub delta_time: f32,
    exit_requested: bool,
}

impl AppContext {
    pub fn new(root_path: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            root_path: root_path.into(),
            args,
            frame: 0,
            delta_time: 0.0,
            exit_requested: false,
        }
    }

    /// Asks the application to stop after the current frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}
