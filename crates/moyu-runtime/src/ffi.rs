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

//! The C-ABI boundary between a native host and the application runtime.
//!
//! This is the only module that deals with raw pointers. Everything past
//! [`moyu_runtime_main`] works on owned Rust values.

use crate::context::AppContext;
use crate::editor::Editor;
use crate::game::Application;
use anyhow::{Context, Result};
use std::ffi::{c_char, c_int, CStr};
use std::panic::{self, AssertUnwindSafe};

pub const EXIT_SUCCESS: c_int = 0;
pub const EXIT_FAILURE: c_int = 1;

/// Frames the editor stub runs before exiting.
const DEFAULT_FRAMES: u64 = 1;
const DEFAULT_DELTA_TIME: f32 = 1.0 / 60.0;

/// Entry point exported to native hosts.
///
/// Returns [`EXIT_SUCCESS`] when the application ran to completion and
/// [`EXIT_FAILURE`] on error or panic; neither crosses the boundary.
///
/// # Safety
///
/// `argv` must be null, or point to `argc` pointers that are each null or a
/// valid NUL-terminated string, all alive for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn moyu_runtime_main(argc: c_int, argv: *const *const c_char) -> c_int {
    let args = unsafe { collect_args(argc, argv) };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    match panic::catch_unwind(AssertUnwindSafe(|| run_editor(args))) {
        Ok(Ok(())) => EXIT_SUCCESS,
        Ok(Err(err)) => {
            log::error!("{err:#}");
            EXIT_FAILURE
        }
        Err(_) => {
            log::error!("Runtime panicked");
            EXIT_FAILURE
        }
    }
}

/// Copies `argv` into owned strings, replacing invalid UTF-8 and skipping
/// null entries.
///
/// # Safety
///
/// Same contract as [`moyu_runtime_main`].
unsafe fn collect_args(argc: c_int, argv: *const *const c_char) -> Vec<String> {
    if argv.is_null() || argc <= 0 {
        return Vec::new();
    }
    (0..argc as usize)
        .filter_map(|i| {
            let arg = unsafe { *argv.add(i) };
            if arg.is_null() {
                None
            } else {
                Some(unsafe { CStr::from_ptr(arg) }.to_string_lossy().into_owned())
            }
        })
        .collect()
}

/// Runs the editor with host arguments; the first argument is the program
/// name and is dropped.
pub fn run_editor(args: Vec<String>) -> Result<()> {
    let root = std::env::current_dir().context("Failed to determine the root path")?;
    let context = AppContext::new(root, args.into_iter().skip(1).collect());
    Application::new(context, Editor).run(DEFAULT_FRAMES, DEFAULT_DELTA_TIME)
}
