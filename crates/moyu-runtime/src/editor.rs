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

//! The editor's application stub.

use crate::context::AppContext;
use crate::game::Game;
use anyhow::Result;

/// Logs each lifecycle step and does nothing else.
#[derive(Debug, Default)]
pub struct Editor;

impl Game for Editor {
    fn on_init(&mut self, _ctx: &mut AppContext) -> Result<()> {
        log::info!("Editor: init");
        Ok(())
    }

    fn on_update(&mut self, _ctx: &mut AppContext, delta_time: f32) {
        log::info!("Editor: update {delta_time}");
    }

    fn on_exit(&mut self, _ctx: &mut AppContext) {
        log::info!("Editor: exit");
    }
}
