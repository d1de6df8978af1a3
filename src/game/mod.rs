//! The phase controller: setup, the question loop and results.
//!
//! Every phase owns a [`Scope`]. Entering a phase closes the previous scope,
//! which cancels its timers and narrations and detaches the tap interpreter
//! before anything of the new phase is armed.

pub mod phase;
pub mod scripts;

mod results;
mod round;
mod scope;
mod setup;

use std::rc::Rc;
use std::time::Duration;

use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::feedback::{Feedback, FeedbackKind, Screen, TextSlot};
use crate::game::phase::{interpret, Action, Phase, SetupStep, WelcomeStep};
use crate::game::scope::Scope;
use crate::quiz::pool::QuestionPool;
use crate::quiz::{Categories, Question};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::speech::{Narrate, Narrator, Script, Speaker, Voice};

pub type GameScheduler = Scheduler<Controller>;

/// The external capabilities the controller talks to.
pub struct Backends {
    pub speaker: Box<dyn Speaker>,
    pub feedback: Box<dyn Feedback>,
    pub screen: Box<dyn Screen>,
}

/// What the input layer saw during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// The screen was touched this tick (first tap of a gesture included).
    pub touched: bool,
    /// Consecutive taps of a gesture that ended this tick, 0 if none.
    pub tap_count: u32,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn touch() -> Self {
        Self {
            touched: true,
            tap_count: 0,
        }
    }

    pub fn taps(count: u32) -> Self {
        Self {
            touched: count > 0,
            tap_count: count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub statement: String,
    /// `None` when time ran out.
    pub choice: Option<usize>,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: Phase,
    pub listening: bool,
    pub score: u32,
    pub asked: usize,
    pub session_size: usize,
    pub remaining_seconds: Option<u32>,
    pub categories: Categories,
    pub answer_seconds: u32,
}

struct Selection {
    categories: Categories,
    seconds: u32,
}

#[derive(Default)]
struct Session {
    questions: Vec<Rc<Question>>,
    size: usize,
    asked: usize,
    score: u32,
    current: Option<Rc<Question>>,
    countdown: Option<TimerHandle>,
    remaining: Option<u32>,
    shown_answers: usize,
    history: Vec<AnswerRecord>,
}

pub struct Controller {
    config: Config,
    pool: QuestionPool,
    narrator: Narrator<Controller>,
    feedback: Box<dyn Feedback>,
    screen: Box<dyn Screen>,
    rng: StdRng,
    phase: Phase,
    listening: bool,
    epoch: u64,
    scope: Scope,
    selection: Selection,
    session: Session,
}

impl Narrate for Controller {
    fn narrator(&mut self) -> &mut Narrator<Self> {
        &mut self.narrator
    }
}

impl Controller {
    pub fn new(config: Config, pool: QuestionPool, backends: Backends) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            pool,
            narrator: Narrator::new(backends.speaker),
            feedback: backends.feedback,
            screen: backends.screen,
            rng,
            phase: Phase::Welcome(WelcomeStep::Title),
            listening: false,
            epoch: 0,
            scope: Scope::default(),
            selection: Selection {
                categories: Categories::MIXED,
                seconds: 10,
            },
            session: Session::default(),
        }
    }

    pub fn start(&mut self, scheduler: &mut GameScheduler) {
        let first = if self.config.skip_intro {
            Phase::Setup(SetupStep::ChooseCategory)
        } else {
            Phase::Welcome(WelcomeStep::Title)
        };
        self.enter(scheduler, first);
    }

    /// Answers given so far in the running or last finished quiz.
    pub fn history(&self) -> &[AnswerRecord] {
        &self.session.history
    }

    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            listening: self.listening,
            score: self.session.score,
            asked: self.session.asked,
            session_size: self.session.size,
            remaining_seconds: self.session.remaining,
            categories: self.selection.categories,
            answer_seconds: self.selection.seconds,
        }
    }

    /// Consumes one tick of input. Only the interpreter bound when the tick
    /// started sees it; anything bound while handling it waits for the next.
    pub fn handle_input(&mut self, scheduler: &mut GameScheduler, input: InputFrame) {
        if !self.listening {
            return;
        }
        if input.touched {
            self.on_touch(scheduler);
        }

        let action = interpret(self.phase, input.tap_count);
        if action == Action::Ignore {
            return;
        }
        self.listening = false;
        debug!("{:?} during {:?}", action, self.phase);

        match action {
            Action::Ignore => {}
            Action::Continue => self.on_continue(scheduler),
            Action::SelectCategory(categories) => {
                self.feedback.notify(FeedbackKind::Confirm);
                self.enter(scheduler, Phase::Setup(SetupStep::ConfirmCategory(categories)));
            }
            Action::SelectTime(seconds) => {
                self.feedback.notify(FeedbackKind::Confirm);
                self.enter(scheduler, Phase::Setup(SetupStep::ConfirmTime(seconds)));
            }
            Action::Confirm => self.on_confirm(scheduler),
            Action::Reject => self.on_reject(scheduler),
            Action::Answer(index) => self.evaluate(scheduler, Some(index)),
        }
    }

    pub(crate) fn set_focus(&mut self, focused: bool) {
        if focused {
            self.narrator.resume();
        } else {
            self.narrator.interrupt();
        }
    }

    fn enter(&mut self, scheduler: &mut GameScheduler, phase: Phase) {
        let canceled = self.scope.close(scheduler, &mut self.narrator);
        self.listening = false;
        self.epoch += 1;
        info!("{:?} -> {:?}", self.phase, phase);
        if canceled > 0 {
            debug!("{} pending callbacks dropped on phase exit", canceled);
        }
        self.phase = phase;

        match phase {
            Phase::Welcome(step) => self.enter_welcome(scheduler, step),
            Phase::Setup(step) => self.enter_setup(scheduler, step),
            Phase::Quiz(step) => self.enter_quiz(scheduler, step),
            Phase::Results => self.enter_results(scheduler),
        }
    }

    fn listen(&mut self) {
        self.listening = true;
        self.feedback.notify(FeedbackKind::Ready);
    }

    fn is_current(&self, epoch: u64) -> bool {
        if epoch == self.epoch {
            return true;
        }
        logic_error(&format!(
            "callback from phase epoch {} fired during epoch {} ({:?})",
            epoch, self.epoch, self.phase
        ));
        false
    }

    /// Runs `then` after `delay` unless the phase ends first.
    fn after(
        &mut self,
        scheduler: &mut GameScheduler,
        delay: Duration,
        then: impl FnOnce(&mut Controller, &mut GameScheduler) + 'static,
    ) -> TimerHandle {
        let epoch = self.epoch;
        let handle = scheduler.after(delay, move |quiz: &mut Controller, scheduler| {
            if quiz.is_current(epoch) {
                then(quiz, scheduler);
            }
        });
        self.scope.timer(handle)
    }

    /// Plays `script`, then runs `then` unless the phase ends first.
    fn narrate(
        &mut self,
        scheduler: &mut GameScheduler,
        script: &Script,
        voice: Voice,
        then: impl FnOnce(&mut Controller, &mut GameScheduler) + 'static,
    ) {
        let epoch = self.epoch;
        let handle = self
            .narrator
            .play(scheduler, script, voice, move |quiz: &mut Controller, scheduler| {
                if quiz.is_current(epoch) {
                    then(quiz, scheduler);
                }
            });
        self.scope.narration(handle);
    }

    /// Speaks a number or short word without waiting on it.
    fn say(&mut self, scheduler: &mut GameScheduler, text: String) {
        let voice = self.config.menu_voice();
        let handle = self.narrator.say(scheduler, text, voice);
        self.scope.narration(handle);
    }

    /// Shows `script` in `slot`, waits `delay`, then reads it with the menu
    /// voice and runs `then`.
    fn announce(
        &mut self,
        scheduler: &mut GameScheduler,
        slot: TextSlot,
        script: Script,
        delay: Duration,
        then: impl FnOnce(&mut Controller, &mut GameScheduler) + 'static,
    ) {
        self.screen.show(slot, script.full_text().trim_end());
        self.after(scheduler, delay, move |quiz, scheduler| {
            let voice = quiz.config.menu_voice();
            quiz.narrate(scheduler, &script, voice, then);
        });
    }
}

/// Something the state machine should have made impossible.
fn logic_error(message: &str) {
    error!("{}", message);
    debug_assert!(false, "{}", message);
}
