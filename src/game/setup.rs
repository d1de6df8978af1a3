use std::time::Duration;

use crate::feedback::{FeedbackKind, TextSlot};
use crate::game::phase::{Phase, QuizStep, SetupStep, WelcomeStep};
use crate::game::{logic_error, scripts, Controller, GameScheduler};
use crate::speech::Script;

impl Controller {
    pub(super) fn enter_welcome(&mut self, scheduler: &mut GameScheduler, step: WelcomeStep) {
        match step {
            WelcomeStep::Title => {
                self.announce(
                    scheduler,
                    TextSlot::Monologue,
                    Script::line(scripts::TITLE),
                    Duration::ZERO,
                    |quiz, scheduler| {
                        quiz.announce(
                            scheduler,
                            TextSlot::SubMonologue,
                            Script::line(scripts::PRESS_TO_START),
                            Duration::ZERO,
                            |quiz, _| quiz.listen(),
                        );
                    },
                );
            }
            WelcomeStep::Briefing => {
                let delay = self.config.speak_delay;
                let session_size = self.config.session_size;
                self.announce(
                    scheduler,
                    TextSlot::Monologue,
                    scripts::welcome(session_size),
                    delay,
                    |quiz, _| quiz.listen(),
                );
            }
        }
    }

    pub(super) fn enter_setup(&mut self, scheduler: &mut GameScheduler, step: SetupStep) {
        let delay = self.config.speak_delay;
        match step {
            SetupStep::ChooseCategory => {
                self.announce(
                    scheduler,
                    TextSlot::Monologue,
                    scripts::choose_category(),
                    delay,
                    |quiz, _| quiz.listen(),
                );
            }
            SetupStep::ConfirmCategory(categories) => {
                self.confirm_choice(scheduler, scripts::category_selected(categories));
            }
            SetupStep::ChooseTime => {
                self.announce(
                    scheduler,
                    TextSlot::Monologue,
                    scripts::choose_time(),
                    delay,
                    |quiz, _| quiz.listen(),
                );
            }
            SetupStep::ConfirmTime(seconds) => {
                self.confirm_choice(scheduler, scripts::time_selected(seconds));
            }
        }
    }

    /// Reads the choice back, then asks for a yes/no tap.
    fn confirm_choice(&mut self, scheduler: &mut GameScheduler, choice: String) {
        let delay = self.config.speak_delay;
        self.announce(
            scheduler,
            TextSlot::Monologue,
            Script::line(choice),
            delay,
            move |quiz, scheduler| {
                quiz.announce(
                    scheduler,
                    TextSlot::SubMonologue,
                    Script::line(scripts::CONFIRM_PROMPT),
                    delay,
                    |quiz, _| quiz.listen(),
                );
            },
        );
    }

    pub(super) fn on_continue(&mut self, scheduler: &mut GameScheduler) {
        match self.phase {
            Phase::Welcome(WelcomeStep::Title) => {
                self.feedback.notify(FeedbackKind::Start);
                self.screen.clear(TextSlot::SubMonologue);
                self.enter(scheduler, Phase::Welcome(WelcomeStep::Briefing));
            }
            Phase::Welcome(WelcomeStep::Briefing) => {
                self.feedback.notify(FeedbackKind::Confirm);
                self.screen.clear(TextSlot::Monologue);
                self.enter(scheduler, Phase::Setup(SetupStep::ChooseCategory));
            }
            Phase::Results => self.restart(scheduler),
            phase => logic_error(&format!("continue while in {:?}", phase)),
        }
    }

    pub(super) fn on_confirm(&mut self, scheduler: &mut GameScheduler) {
        self.feedback.notify(FeedbackKind::Confirm);
        match self.phase {
            Phase::Setup(SetupStep::ConfirmCategory(categories)) => {
                self.selection.categories = categories;
                self.screen.clear(TextSlot::SubMonologue);
                self.enter(scheduler, Phase::Setup(SetupStep::ChooseTime));
            }
            Phase::Setup(SetupStep::ConfirmTime(seconds)) => {
                self.selection.seconds = seconds;
                self.enter(scheduler, Phase::Quiz(QuizStep::Starting));
            }
            phase => logic_error(&format!("confirm while in {:?}", phase)),
        }
    }

    pub(super) fn on_reject(&mut self, scheduler: &mut GameScheduler) {
        self.feedback.notify(FeedbackKind::Cancel);
        self.screen.clear(TextSlot::Monologue);
        self.screen.clear(TextSlot::SubMonologue);
        match self.phase {
            Phase::Setup(SetupStep::ConfirmCategory(_)) => {
                self.enter(scheduler, Phase::Setup(SetupStep::ChooseCategory));
            }
            Phase::Setup(SetupStep::ConfirmTime(_)) => {
                self.enter(scheduler, Phase::Setup(SetupStep::ChooseTime));
            }
            phase => logic_error(&format!("reject while in {:?}", phase)),
        }
    }
}
