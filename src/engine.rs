//! The host-facing side of the engine.

use std::time::Duration;

use log::info;

use crate::config::Config;
use crate::game::{Backends, Controller, GameScheduler, InputFrame, Snapshot};
use crate::quiz::pool::QuestionPool;
use crate::speech::{Narrator, UtteranceId};

/// Owns the controller and its scheduler. The host calls [`Engine::tick`]
/// once per frame and reports finished speech through
/// [`Engine::speech_finished`].
pub struct Engine {
    scheduler: GameScheduler,
    controller: Controller,
}

impl Engine {
    pub fn new(config: Config, pool: QuestionPool, backends: Backends) -> Self {
        Self {
            scheduler: GameScheduler::new(),
            controller: Controller::new(config, pool, backends),
        }
    }

    /// Enters the first phase. Call once before the first tick.
    pub fn start(&mut self) {
        info!("Starting quiz engine with {} questions", self.controller.pool().len());
        self.controller.start(&mut self.scheduler);
    }

    /// Feeds one frame: input goes to the active phase first, then every
    /// timer due at `now` runs. A tap and a timeout landing on the same tick
    /// therefore resolve in favour of the tap. Returns how many timers ran.
    pub fn tick(&mut self, now: Duration, input: InputFrame) -> usize {
        self.controller.handle_input(&mut self.scheduler, input);
        self.scheduler.advance(now, &mut self.controller)
    }

    pub fn speech_finished(&mut self, utterance: UtteranceId) {
        Narrator::speech_finished(&mut self.controller, &mut self.scheduler, utterance);
    }

    /// Stops speech when the host loses focus and repeats the interrupted
    /// lines when it comes back.
    pub fn focus_changed(&mut self, focused: bool) {
        info!("focus {}", if focused { "gained" } else { "lost" });
        self.controller.set_focus(focused);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.controller.snapshot()
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }
}
