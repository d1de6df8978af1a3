//! Fire-and-forget cues and on-screen text. The engine never waits on these.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackKind {
    /// The player pressed to leave the title screen.
    Start,
    /// The engine is now listening for taps.
    Ready,
    Confirm,
    Cancel,
    Correct,
    Incorrect,
    ClockTick,
    /// Looping "time is running out" cue.
    TimeLow,
    TimeLowStop,
    Approved,
    NotApproved,
}

impl FeedbackKind {
    /// How long a device should vibrate for this cue, if at all.
    pub fn vibration(self) -> Option<Duration> {
        match self {
            FeedbackKind::Ready => Some(Duration::from_millis(100)),
            FeedbackKind::Correct => Some(Duration::from_millis(200)),
            FeedbackKind::Incorrect => Some(Duration::from_millis(500)),
            _ => None,
        }
    }
}

pub trait Feedback {
    fn notify(&mut self, kind: FeedbackKind);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    Monologue,
    SubMonologue,
    Header,
    Central,
    Answer(usize),
}

pub trait Screen {
    fn show(&mut self, slot: TextSlot, text: &str);
    fn clear(&mut self, slot: TextSlot);
}
