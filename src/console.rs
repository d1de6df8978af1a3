//! Terminal stand-ins for the speaker, the feedback cues and the screen.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use log::debug;

use crate::feedback::{Feedback, FeedbackKind, Screen, TextSlot};
use crate::game::InputFrame;
use crate::speech::{Speaker, Utterance, UtteranceId};

/// Rough reading speed used to decide when a printed line is "spoken".
const PER_CHAR: Duration = Duration::from_millis(45);
const MIN_UTTERANCE: Duration = Duration::from_millis(250);

/// Lines the console speaker has started, with the time each one ends.
/// Shared between the speaker and the loop that reports finished speech.
#[derive(Debug, Clone, Default)]
pub struct SpeechQueue {
    inner: Rc<RefCell<SpeechState>>,
}

#[derive(Debug, Default)]
struct SpeechState {
    now: Duration,
    pending: VecDeque<(Duration, UtteranceId)>,
}

impl SpeechQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every utterance that has ended by `now`.
    pub fn finished(&self, now: Duration) -> Vec<UtteranceId> {
        let mut state = self.inner.borrow_mut();
        state.now = now;
        let mut done = Vec::new();
        while let Some(&(ends, id)) = state.pending.front() {
            if ends > now {
                break;
            }
            state.pending.pop_front();
            done.push(id);
        }
        done
    }

    pub fn is_idle(&self) -> bool {
        self.inner.borrow().pending.is_empty()
    }

    fn push(&self, utterance: &Utterance) {
        let mut state = self.inner.borrow_mut();
        let length = utterance.text.chars().count() as u32;
        let rate = if utterance.voice.rate > 0.0 {
            utterance.voice.rate
        } else {
            1.0
        };
        let spoken = (PER_CHAR * length).div_f32(rate).max(MIN_UTTERANCE);
        // one voice at a time, so a new line starts after the last queued one
        let start = state
            .pending
            .back()
            .map_or(state.now, |&(ends, _)| ends.max(state.now));
        state.pending.push_back((start + spoken, utterance.id));
    }

    fn clear(&self) {
        self.inner.borrow_mut().pending.clear();
    }
}

/// Prints each line and pretends to speak it for a while.
pub struct ConsoleSpeaker {
    queue: SpeechQueue,
}

impl ConsoleSpeaker {
    pub fn new(queue: SpeechQueue) -> Self {
        Self { queue }
    }
}

impl Speaker for ConsoleSpeaker {
    fn speak(&mut self, utterance: Utterance) {
        let text = utterance.text.trim();
        if !text.is_empty() {
            println!("({}) {}", utterance.voice.locale, text);
        }
        self.queue.push(&utterance);
    }

    fn stop(&mut self) {
        debug!("speech stopped");
        self.queue.clear();
    }
}

#[derive(Debug, Default)]
pub struct ConsoleFeedback;

impl Feedback for ConsoleFeedback {
    fn notify(&mut self, kind: FeedbackKind) {
        match kind {
            FeedbackKind::ClockTick | FeedbackKind::TimeLowStop => debug!("cue {:?}", kind),
            FeedbackKind::Ready => println!("  [your turn]"),
            kind => match kind.vibration() {
                Some(length) => println!("  [{:?}, buzz {}ms]", kind, length.as_millis()),
                None => println!("  [{:?}]", kind),
            },
        }
    }
}

/// Prints the header and answer slots as they change. Monologue text is left
/// to the speaker so it is not printed twice.
#[derive(Debug, Default)]
pub struct ConsoleScreen {
    slots: HashMap<TextSlot, String>,
}

impl ConsoleScreen {
    pub fn text(&self, slot: TextSlot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }
}

impl Screen for ConsoleScreen {
    fn show(&mut self, slot: TextSlot, text: &str) {
        if self.slots.get(&slot).map(String::as_str) == Some(text) {
            return;
        }
        match slot {
            TextSlot::Header => println!("== {} ==", text),
            TextSlot::Answer(_) => println!("   {}", text),
            TextSlot::Central | TextSlot::Monologue | TextSlot::SubMonologue => {
                debug!("{:?}: {}", slot, text)
            }
        }
        self.slots.insert(slot, text.to_string());
    }

    fn clear(&mut self, slot: TextSlot) {
        self.slots.remove(&slot);
    }
}

/// Reads a typed gesture: a run of dots (`...`) or a number (`3`) is that
/// many taps.
pub fn parse_taps(line: &str) -> Option<InputFrame> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let taps = if line.chars().all(|c| c == '.') {
        line.len() as u32
    } else {
        line.parse::<u32>().ok()?
    };
    if taps == 0 {
        return None;
    }
    Some(InputFrame::taps(taps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::Voice;

    fn utterance(id: u64, text: &str) -> Utterance {
        Utterance {
            id: UtteranceId(id),
            text: text.to_string(),
            voice: Voice::new("en-GB", 1.0, 1.0),
        }
    }

    #[test]
    fn screen_keeps_the_latest_text_per_slot() {
        let mut screen = ConsoleScreen::default();
        screen.show(TextSlot::Header, "Question 1 - Remaining Time: 10");
        screen.show(TextSlot::Header, "Question 1 - Remaining Time: 9");
        assert_eq!(screen.text(TextSlot::Header), Some("Question 1 - Remaining Time: 9"));

        screen.clear(TextSlot::Header);
        assert_eq!(screen.text(TextSlot::Header), None);
    }

    #[test]
    fn taps_from_dots_or_numbers() {
        assert_eq!(parse_taps("..."), Some(InputFrame::taps(3)));
        assert_eq!(parse_taps(" 2 \n"), Some(InputFrame::taps(2)));
        assert_eq!(parse_taps(""), None);
        assert_eq!(parse_taps("0"), None);
        assert_eq!(parse_taps("three"), None);
    }

    #[test]
    fn speech_ends_in_order() {
        let queue = SpeechQueue::new();
        let mut speaker = ConsoleSpeaker::new(queue.clone());
        speaker.speak(utterance(0, "A"));
        speaker.speak(utterance(1, "B"));

        assert!(queue.finished(Duration::from_millis(100)).is_empty());
        assert_eq!(queue.finished(Duration::from_millis(260)), vec![UtteranceId(0)]);
        assert_eq!(queue.finished(Duration::from_secs(1)), vec![UtteranceId(1)]);
        assert!(queue.is_idle());
    }

    #[test]
    fn stopping_drops_pending_speech() {
        let queue = SpeechQueue::new();
        let mut speaker = ConsoleSpeaker::new(queue.clone());
        speaker.speak(utterance(0, "Question one"));
        speaker.stop();
        assert!(queue.finished(Duration::from_secs(10)).is_empty());
    }
}
