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

use crate::context::AppContext;
use anyhow::{Context, Result};

/// The lifecycle hooks a game or tool implements.
pub trait Game {
    /// Called once before anything else.
    fn on_init(&mut self, ctx: &mut AppContext) -> Result<()>;

    /// Called once after initialization to load resources.
    fn on_load(&mut self, _ctx: &mut AppContext) -> Result<()> {
        Ok(())
    }

    /// Called every frame for game logic updates.
    fn on_update(&mut self, ctx: &mut AppContext, delta_time: f32);

    /// Called every frame after `on_update`.
    fn on_draw(&mut self, _ctx: &mut AppContext) {}

    /// Called once when the frame loop ends to release resources.
    fn on_unload(&mut self, _ctx: &mut AppContext) {}

    /// Called last, even when loading failed.
    fn on_exit(&mut self, ctx: &mut AppContext);
}

/// Owns a [`Game`] together with its [`AppContext`].
pub struct Application<G: Game> {
    context: AppContext,
    game: G,
}

impl<G: Game> Application<G> {
    pub fn new(context: AppContext, game: G) -> Self {
        Self { context, game }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Runs the full lifecycle for at most `max_frames` frames of
    /// `delta_time` seconds each. The loop also ends when a hook calls
    /// [`AppContext::request_exit`].
    pub fn run(&mut self, max_frames: u64, delta_time: f32) -> Result<()> {
        log::info!("Application starting ({})", self.context.root_path.display());
        self.game
            .on_init(&mut self.context)
            .context("Initialization failed")?;

        let loaded = self.game.on_load(&mut self.context);
        if loaded.is_ok() {
            while self.context.frame < max_frames && !self.context.exit_requested() {
                self.context.delta_time = delta_time;
                self.game.on_update(&mut self.context, delta_time);
                self.game.on_draw(&mut self.context);
                self.context.frame += 1;
            }
            self.game.on_unload(&mut self.context);
        }

        self.game.on_exit(&mut self.context);
        log::info!("Application stopped after {} frame(s)", self.context.frame);
        loaded.context("Loading failed")
    }
}
