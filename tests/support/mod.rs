// Recording backends and a frame-stepping harness shared by the integration
// tests. Not every test file uses every helper.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use sense_quiz::feedback::{Feedback, FeedbackKind, Screen, TextSlot};
use sense_quiz::game::phase::{Phase, QuizStep};
use sense_quiz::speech::{Speaker, Utterance};
use sense_quiz::{Backends, Categories, Config, Engine, InputFrame, Language, Question, QuestionPool, Snapshot};

pub const FRAME: Duration = Duration::from_millis(100);

#[derive(Clone, Default)]
pub struct SpeakerLog {
    pub spoken: Rc<RefCell<Vec<Utterance>>>,
    pub stops: Rc<RefCell<usize>>,
}

impl SpeakerLog {
    pub fn texts(&self) -> Vec<String> {
        self.spoken.borrow().iter().map(|u| u.text.clone()).collect()
    }
}

pub struct RecordingSpeaker(pub SpeakerLog);

impl Speaker for RecordingSpeaker {
    fn speak(&mut self, utterance: Utterance) {
        self.0.spoken.borrow_mut().push(utterance);
    }

    fn stop(&mut self) {
        *self.0.stops.borrow_mut() += 1;
    }
}

pub struct RecordingFeedback(pub Rc<RefCell<Vec<FeedbackKind>>>);

impl Feedback for RecordingFeedback {
    fn notify(&mut self, kind: FeedbackKind) {
        self.0.borrow_mut().push(kind);
    }
}

pub struct RecordingScreen(pub Rc<RefCell<HashMap<TextSlot, String>>>);

impl Screen for RecordingScreen {
    fn show(&mut self, slot: TextSlot, text: &str) {
        self.0.borrow_mut().insert(slot, text.to_string());
    }

    fn clear(&mut self, slot: TextSlot) {
        self.0.borrow_mut().remove(&slot);
    }
}

pub fn question(statement: &str, answers: &[&str], correct: i64) -> Question {
    Question::new(
        statement,
        answers.iter().map(|a| a.to_string()).collect(),
        correct,
    )
    .unwrap()
}

/// `count` two-answer Art questions whose first answer is right.
pub fn art_pool(count: usize) -> QuestionPool {
    let mut pool = QuestionPool::new();
    for n in 0..count {
        pool.register(
            question(&format!("Art question {}", n), &["Right", "Wrong"], 0),
            Language::BritishEnglish,
            Categories::ART,
        );
    }
    pool
}

pub fn test_config(session_size: usize) -> Config {
    Config {
        session_size,
        seed: Some(7),
        skip_intro: true,
        ..Config::default()
    }
}

/// Drives an [`Engine`] in fixed frames. Every line spoken during a frame is
/// reported finished at the start of the next one.
pub struct Harness {
    pub engine: Engine,
    pub speech: SpeakerLog,
    pub cues: Rc<RefCell<Vec<FeedbackKind>>>,
    pub screen: Rc<RefCell<HashMap<TextSlot, String>>>,
    pub now: Duration,
    reported: usize,
}

impl Harness {
    pub fn new(config: Config, pool: QuestionPool) -> Self {
        let speech = SpeakerLog::default();
        let cues = Rc::new(RefCell::new(Vec::new()));
        let screen = Rc::new(RefCell::new(HashMap::new()));
        let backends = Backends {
            speaker: Box::new(RecordingSpeaker(speech.clone())),
            feedback: Box::new(RecordingFeedback(cues.clone())),
            screen: Box::new(RecordingScreen(screen.clone())),
        };
        let mut engine = Engine::new(config, pool, backends);
        engine.start();
        Self {
            engine,
            speech,
            cues,
            screen,
            now: Duration::ZERO,
            reported: 0,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.snapshot().phase
    }

    pub fn step(&mut self, input: InputFrame) {
        let spoken = self
            .speech
            .spoken
            .borrow()
            .iter()
            .skip(self.reported)
            .map(|u| u.id)
            .collect::<Vec<_>>();
        self.reported += spoken.len();
        for id in spoken {
            self.engine.speech_finished(id);
        }
        self.now += FRAME;
        self.engine.tick(self.now, input);
    }

    pub fn idle(&mut self, frames: usize) {
        for _ in 0..frames {
            self.step(InputFrame::idle());
        }
    }

    /// Steps idle frames until `done` holds. Panics after a minute of game time.
    pub fn run_until(&mut self, mut done: impl FnMut(&Snapshot) -> bool) {
        for _ in 0..600 {
            if done(&self.snapshot()) {
                return;
            }
            self.step(InputFrame::idle());
        }
        panic!("condition not reached, stuck in {:?}", self.snapshot());
    }

    pub fn wait_listening(&mut self) {
        self.run_until(|snapshot| snapshot.listening);
    }

    /// Waits until the engine listens, then taps `count` times in one frame.
    pub fn tap(&mut self, count: u32) {
        self.wait_listening();
        self.step(InputFrame::taps(count));
    }

    /// Picks Art (one tap), confirms, picks 10 seconds (two taps), confirms.
    pub fn setup_art_ten_seconds(&mut self) {
        self.tap(1);
        self.tap(1);
        self.tap(2);
        self.tap(1);
    }

    pub fn wait_for_answer_window(&mut self) {
        self.run_until(|snapshot| {
            snapshot.listening
                && matches!(snapshot.phase, Phase::Quiz(QuizStep::AwaitingAnswer { .. }))
        });
    }

    pub fn cue_count(&self, kind: FeedbackKind) -> usize {
        self.cues.borrow().iter().filter(|&&k| k == kind).count()
    }

    pub fn text(&self, slot: TextSlot) -> Option<String> {
        self.screen.borrow().get(&slot).cloned()
    }
}
