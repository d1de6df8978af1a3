use std::rc::Rc;
use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;

use crate::feedback::{FeedbackKind, TextSlot};
use crate::game::phase::{Phase, QuizStep};
use crate::game::{logic_error, scripts, AnswerRecord, Controller, GameScheduler, Session};
use crate::speech::Script;

impl Controller {
    pub(super) fn enter_quiz(&mut self, scheduler: &mut GameScheduler, step: QuizStep) {
        match step {
            QuizStep::Starting => self.enter_starting(scheduler),
            QuizStep::Asking => self.ask_next(scheduler),
            QuizStep::AwaitingAnswer { .. } => self.open_answer_window(scheduler),
            QuizStep::Evaluating => {
                let delay = self.config.feedback_delay;
                self.after(scheduler, delay, |quiz, scheduler| {
                    let next = if quiz.session.questions.is_empty() {
                        QuizStep::Finished
                    } else {
                        QuizStep::Asking
                    };
                    quiz.enter(scheduler, Phase::Quiz(next));
                });
            }
            QuizStep::Finished => self.enter_finished(scheduler),
        }
    }

    fn enter_starting(&mut self, scheduler: &mut GameScheduler) {
        self.screen.clear(TextSlot::SubMonologue);
        self.announce(
            scheduler,
            TextSlot::Monologue,
            Script::line(scripts::STARTING),
            Duration::ZERO,
            |quiz, scheduler| {
                let epoch = quiz.epoch;
                let seconds = quiz.config.start_countdown;
                let handle = scheduler.countdown(
                    seconds,
                    move |quiz: &mut Controller, scheduler, remaining| {
                        if quiz.is_current(epoch) {
                            quiz.screen.show(TextSlot::Monologue, &remaining.to_string());
                            quiz.say(scheduler, remaining.to_string());
                        }
                    },
                    move |quiz: &mut Controller, scheduler| {
                        if quiz.is_current(epoch) {
                            quiz.announce(
                                scheduler,
                                TextSlot::Monologue,
                                Script::line(scripts::NOW),
                                Duration::from_millis(500),
                                |quiz, scheduler| quiz.begin_session(scheduler),
                            );
                        }
                    },
                );
                quiz.scope.timer(handle);
            },
        );
    }

    /// Draws a fresh session from the pool and asks the first question.
    fn begin_session(&mut self, scheduler: &mut GameScheduler) {
        let categories = self.selection.categories;
        let questions =
            self.pool
                .sample_session(categories, self.config.session_size, &mut self.rng);
        if questions.is_empty() {
            warn!("No questions available for {}", categories);
        }
        info!(
            "Quiz started: {} questions of {}, {}s each",
            questions.len(),
            categories,
            self.selection.seconds
        );

        self.session = Session {
            size: questions.len(),
            questions,
            ..Session::default()
        };
        self.screen.clear(TextSlot::Monologue);
        self.enter(scheduler, Phase::Quiz(QuizStep::Asking));
    }

    fn ask_next(&mut self, scheduler: &mut GameScheduler) {
        if self.session.questions.is_empty() {
            self.enter(scheduler, Phase::Quiz(QuizStep::Finished));
            return;
        }

        let index = self.rng.gen_range(0..self.session.questions.len());
        let question = self.session.questions.swap_remove(index);
        self.session.asked += 1;
        self.session.remaining = Some(self.selection.seconds);
        self.session.current = Some(Rc::clone(&question));

        let header = scripts::header(self.session.asked, self.selection.seconds);
        self.screen.show(TextSlot::Header, &header);
        self.screen.show(TextSlot::Central, question.statement());
        for slot in 0..question.answer_count() {
            if let Some(text) = question.lettered_answer(slot) {
                self.screen.show(TextSlot::Answer(slot), &text);
            }
        }
        for slot in question.answer_count()..self.session.shown_answers {
            self.screen.clear(TextSlot::Answer(slot));
        }
        self.session.shown_answers = question.answer_count();

        let voice = self.config.question_voice(question.language());
        let delay = self.config.speak_delay;
        self.after(scheduler, delay, move |quiz, scheduler| {
            let answers = question.answer_count();
            quiz.narrate(scheduler, &scripts::question(&question), voice, move |quiz, scheduler| {
                quiz.enter(scheduler, Phase::Quiz(QuizStep::AwaitingAnswer { answers }));
            });
        });
    }

    /// Arms the answer countdown and starts listening for taps.
    fn open_answer_window(&mut self, scheduler: &mut GameScheduler) {
        let epoch = self.epoch;
        let total = self.selection.seconds;
        let time_low = self.config.time_low_seconds;
        let number = self.session.asked;

        let handle = scheduler.countdown(
            total,
            move |quiz: &mut Controller, scheduler, remaining| {
                if !quiz.is_current(epoch) {
                    return;
                }
                quiz.session.remaining = Some(remaining);
                if remaining <= time_low {
                    quiz.feedback.notify(FeedbackKind::TimeLow);
                    quiz.say(scheduler, remaining.to_string());
                } else if remaining < total {
                    quiz.feedback.notify(FeedbackKind::ClockTick);
                }
                quiz.screen.show(TextSlot::Header, &scripts::header(number, remaining));
            },
            move |quiz: &mut Controller, scheduler| {
                if !quiz.is_current(epoch) {
                    return;
                }
                quiz.session.countdown = None;
                quiz.session.remaining = Some(0);
                quiz.screen.show(TextSlot::Header, &scripts::header(number, 0));
                quiz.feedback.notify(FeedbackKind::TimeLowStop);
                quiz.evaluate(scheduler, None);
            },
        );
        self.session.countdown = Some(self.scope.timer(handle));
        self.listen();
    }

    /// A touch while answering freezes the countdown so a slow gesture is not
    /// overtaken by the clock.
    pub(super) fn on_touch(&mut self, scheduler: &mut GameScheduler) {
        if !matches!(self.phase, Phase::Quiz(QuizStep::AwaitingAnswer { .. })) {
            return;
        }
        if let Some(countdown) = self.session.countdown.take() {
            scheduler.cancel(countdown);
            self.feedback.notify(FeedbackKind::TimeLowStop);
            debug!("answer countdown stopped by touch");
        }
    }

    /// Scores the current question; `None` means the time ran out.
    pub(super) fn evaluate(&mut self, scheduler: &mut GameScheduler, choice: Option<usize>) {
        let Some(question) = self.session.current.take() else {
            logic_error("answer evaluated with no current question");
            return;
        };
        self.listening = false;
        if let Some(countdown) = self.session.countdown.take() {
            scheduler.cancel(countdown);
            self.feedback.notify(FeedbackKind::TimeLowStop);
        }

        let correct = choice.map_or(false, |index| question.is_correct(index));
        if correct {
            self.session.score += 1;
            self.feedback.notify(FeedbackKind::Correct);
        } else {
            self.feedback.notify(FeedbackKind::Incorrect);
        }
        info!(
            "Question {} answered {:?}: {}",
            self.session.asked,
            choice,
            if correct { "correct" } else { "incorrect" }
        );
        self.session.history.push(AnswerRecord {
            statement: question.statement().to_string(),
            choice,
            correct,
        });

        self.enter(scheduler, Phase::Quiz(QuizStep::Evaluating));
    }
}
