use log::info;

use crate::feedback::{FeedbackKind, TextSlot};
use crate::game::phase::{Phase, SetupStep};
use crate::game::{scripts, Controller, GameScheduler, Session};
use crate::quiz::score::{self, ScoreBand};
use crate::speech::Script;

impl Controller {
    pub(super) fn enter_finished(&mut self, scheduler: &mut GameScheduler) {
        for slot in 0..self.session.shown_answers {
            self.screen.clear(TextSlot::Answer(slot));
        }
        self.session.shown_answers = 0;
        self.session.remaining = None;
        self.screen.clear(TextSlot::Header);
        self.screen.clear(TextSlot::Central);

        let delay = self.config.speak_delay;
        self.announce(
            scheduler,
            TextSlot::Monologue,
            Script::line(scripts::FINISHED),
            delay,
            |quiz, scheduler| quiz.enter(scheduler, Phase::Results),
        );
    }

    pub(super) fn enter_results(&mut self, scheduler: &mut GameScheduler) {
        let score = self.session.score;
        let total = self.session.size;
        info!("Quiz finished with {} of {}", score, total);

        let delay = self.config.feedback_delay;
        self.after(scheduler, delay, move |quiz, scheduler| {
            let cue = if ScoreBand::for_score(score).passed() {
                FeedbackKind::Approved
            } else {
                FeedbackKind::NotApproved
            };
            quiz.feedback.notify(cue);

            let delay = quiz.config.speak_delay;
            quiz.announce(
                scheduler,
                TextSlot::Monologue,
                Script::line(score::summary(score, total)),
                delay,
                move |quiz, scheduler| {
                    quiz.announce(
                        scheduler,
                        TextSlot::SubMonologue,
                        Script::line(scripts::CLOSING),
                        delay,
                        |quiz, _| quiz.listen(),
                    );
                },
            );
        });
    }

    /// Back to the category menu with an empty session.
    pub(super) fn restart(&mut self, scheduler: &mut GameScheduler) {
        self.feedback.notify(FeedbackKind::Confirm);
        self.screen.clear(TextSlot::Monologue);
        self.screen.clear(TextSlot::SubMonologue);
        self.session = Session::default();
        self.enter(scheduler, Phase::Setup(SetupStep::ChooseCategory));
    }
}
