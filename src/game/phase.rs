//! Phases and the pure tap interpreter.

use crate::quiz::Categories;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Welcome(WelcomeStep),
    Setup(SetupStep),
    Quiz(QuizStep),
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeStep {
    Title,
    Briefing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    ChooseCategory,
    ConfirmCategory(Categories),
    ChooseTime,
    ConfirmTime(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    /// Spoken 3-2-1 before the first question.
    Starting,
    Asking,
    AwaitingAnswer { answers: usize },
    Evaluating,
    Finished,
}

/// What a tap gesture means in the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Ignore,
    Continue,
    SelectCategory(Categories),
    SelectTime(u32),
    Confirm,
    Reject,
    /// Zero-based answer index.
    Answer(usize),
}

/// Tap count N picks entry N.
pub const CATEGORY_CHOICES: [Categories; 7] = [
    Categories::ART,
    Categories::MIXED,
    Categories::SPORTS,
    Categories::HISTORY,
    Categories::SCIENCE,
    Categories::GEOGRAPHY,
    Categories::ENTERTAINMENT,
];

/// Seconds to answer each question; tap count N picks entry N.
pub const TIME_CHOICES: [u32; 4] = [5, 10, 20, 30];

pub fn category_for_taps(taps: u32) -> Categories {
    CATEGORY_CHOICES[clamp_choice(taps, CATEGORY_CHOICES.len())]
}

pub fn seconds_for_taps(taps: u32) -> u32 {
    TIME_CHOICES[clamp_choice(taps, TIME_CHOICES.len())]
}

fn clamp_choice(taps: u32, choices: usize) -> usize {
    (taps as usize).clamp(1, choices) - 1
}

/// Maps a resolved tap count to an action. Zero taps never mean anything.
pub fn interpret(phase: Phase, taps: u32) -> Action {
    if taps == 0 {
        return Action::Ignore;
    }
    match phase {
        Phase::Welcome(_) | Phase::Results => Action::Continue,
        Phase::Setup(SetupStep::ChooseCategory) => Action::SelectCategory(category_for_taps(taps)),
        Phase::Setup(SetupStep::ChooseTime) => Action::SelectTime(seconds_for_taps(taps)),
        Phase::Setup(SetupStep::ConfirmCategory(_)) | Phase::Setup(SetupStep::ConfirmTime(_)) => {
            if taps == 1 {
                Action::Confirm
            } else {
                Action::Reject
            }
        }
        Phase::Quiz(QuizStep::AwaitingAnswer { answers }) if answers > 0 => {
            Action::Answer(clamp_choice(taps, answers))
        }
        Phase::Quiz(_) => Action::Ignore,
    }
}
