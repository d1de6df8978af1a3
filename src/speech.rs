//! Spoken lines played one after another through an external speaker.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use log::debug;

use crate::scheduler::{Callback, Scheduler, TimerHandle};

/// Delay after a line when none is given.
pub const DEFAULT_POST_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Voice {
    pub fn new(locale: impl Into<String>, rate: f32, pitch: f32) -> Self {
        Self {
            locale: locale.into(),
            rate,
            pitch,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub voice: Voice,
}

/// Text-to-speech backend.
///
/// Every `speak` must eventually be answered with exactly one
/// `speech_finished(utterance.id)` on the engine, unless it was stopped.
pub trait Speaker {
    fn speak(&mut self, utterance: Utterance);
    fn stop(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub post_delay: Duration,
}

impl Line {
    pub fn new(text: impl Into<String>, post_delay: Duration) -> Self {
        Self {
            text: text.into(),
            post_delay,
        }
    }

    pub fn secs(text: impl Into<String>, post_delay: f32) -> Self {
        Self::new(text, Duration::from_secs_f32(post_delay))
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Line::new(text, DEFAULT_POST_DELAY)
    }
}

/// An immutable, cheaply cloned list of lines.
#[derive(Debug, Clone)]
pub struct Script {
    lines: Rc<[Line]>,
    full_text: String,
}

impl Script {
    pub fn new(lines: Vec<Line>) -> Self {
        let full_text = lines
            .iter()
            .map(|line| format!("{}\n\n", line.text))
            .collect::<String>();
        Self {
            lines: lines.into(),
            full_text,
        }
    }

    /// A single line with no pause after it.
    pub fn line(text: impl Into<String>) -> Self {
        Self::new(vec![Line::new(text, Duration::ZERO)])
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Every line in order, each as its own paragraph.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

impl FromIterator<Line> for Script {
    fn from_iter<I: IntoIterator<Item = Line>>(iter: I) -> Self {
        Script::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NarrationHandle(u64);

/// Gives the narrator's callbacks a way back to it from the scheduler context.
pub trait Narrate: Sized + 'static {
    fn narrator(&mut self) -> &mut Narrator<Self>;
}

enum Stage {
    Speaking(UtteranceId),
    Waiting(TimerHandle),
}

struct Narration<C> {
    lines: Rc<[Line]>,
    cursor: usize,
    voice: Voice,
    on_complete: Option<Callback<C>>,
    stage: Stage,
}

/// Plays scripts. Each `play` owns its own cursor, so two narrations running
/// at once never disturb each other.
pub struct Narrator<C> {
    speaker: Box<dyn Speaker>,
    narrations: HashMap<u64, Narration<C>>,
    utterances: HashMap<UtteranceId, u64>,
    next_narration: u64,
    next_utterance: u64,
}

impl<C: Narrate> Narrator<C> {
    pub fn new(speaker: Box<dyn Speaker>) -> Self {
        Self {
            speaker,
            narrations: HashMap::new(),
            utterances: HashMap::new(),
            next_narration: 0,
            next_utterance: 0,
        }
    }

    /// Speaks every line of `script`, waiting each line's post delay after
    /// its speech finishes, then calls `on_complete` once. An empty script
    /// completes on the next scheduling cycle.
    pub fn play(
        &mut self,
        scheduler: &mut Scheduler<C>,
        script: &Script,
        voice: Voice,
        on_complete: impl FnOnce(&mut C, &mut Scheduler<C>) + 'static,
    ) -> NarrationHandle {
        let id = self.next_narration;
        self.next_narration += 1;

        if script.is_empty() {
            let timer = scheduler.after(Duration::ZERO, move |ctx: &mut C, scheduler| {
                Self::finish(ctx, scheduler, id)
            });
            self.narrations.insert(
                id,
                Narration {
                    lines: script.lines.clone(),
                    cursor: 0,
                    voice,
                    on_complete: Some(Box::new(on_complete)),
                    stage: Stage::Waiting(timer),
                },
            );
            return NarrationHandle(id);
        }

        let utterance = self.allocate_utterance(id);
        self.narrations.insert(
            id,
            Narration {
                lines: script.lines.clone(),
                cursor: 0,
                voice,
                on_complete: Some(Box::new(on_complete)),
                stage: Stage::Speaking(utterance),
            },
        );
        self.speak_current(id);
        NarrationHandle(id)
    }

    /// Speaks a single line without waiting for anything afterwards.
    pub fn say(
        &mut self,
        scheduler: &mut Scheduler<C>,
        text: impl Into<String>,
        voice: Voice,
    ) -> NarrationHandle {
        self.play(scheduler, &Script::line(text), voice, |_, _| {})
    }

    /// Drops a narration. Its completion never runs and a late speech-done
    /// for its current line is ignored. A line still being spoken is cut off.
    pub fn cancel(&mut self, scheduler: &mut Scheduler<C>, handle: NarrationHandle) -> bool {
        self.cancel_all(scheduler, [handle]) == 1
    }

    /// Drops every narration in `handles` and returns how many were still
    /// playing. The speaker is stopped at most once; lines of narrations left
    /// running are spoken again under the same ids.
    pub fn cancel_all(
        &mut self,
        scheduler: &mut Scheduler<C>,
        handles: impl IntoIterator<Item = NarrationHandle>,
    ) -> usize {
        let mut canceled = 0;
        let mut cut_off = false;
        for handle in handles {
            let Some(narration) = self.narrations.remove(&handle.0) else {
                continue;
            };
            match narration.stage {
                Stage::Speaking(utterance) => {
                    self.utterances.remove(&utterance);
                    cut_off = true;
                }
                Stage::Waiting(timer) => {
                    scheduler.cancel(timer);
                }
            }
            debug!("narration {} canceled", handle.0);
            canceled += 1;
        }
        if cut_off {
            self.speaker.stop();
            self.resume();
        }
        canceled
    }

    pub fn is_playing(&self, handle: NarrationHandle) -> bool {
        self.narrations.contains_key(&handle.0)
    }

    /// Number of narrations not yet completed.
    pub fn active(&self) -> usize {
        self.narrations.len()
    }

    /// Stops the speaker, e.g. when the app loses focus.
    pub fn interrupt(&mut self) {
        self.speaker.stop();
    }

    /// Speaks again every line that was being spoken, under the same id.
    pub fn resume(&mut self) {
        let mut speaking = self
            .narrations
            .iter()
            .filter_map(|(id, narration)| match narration.stage {
                Stage::Speaking(utterance) => Some((utterance, *id)),
                Stage::Waiting(_) => None,
            })
            .collect::<Vec<_>>();
        speaking.sort();
        for (_, id) in speaking {
            self.speak_current(id);
        }
    }

    /// Feeds the speaker's done signal back in. Unknown ids are ignored.
    pub fn speech_finished(ctx: &mut C, scheduler: &mut Scheduler<C>, utterance: UtteranceId) {
        let narrator = ctx.narrator();
        let Some(id) = narrator.utterances.remove(&utterance) else {
            debug!("speech {:?} finished with no narration waiting", utterance);
            return;
        };
        let Some(narration) = narrator.narrations.get_mut(&id) else {
            return;
        };

        let delay = narration.lines[narration.cursor].post_delay;
        let timer = scheduler.after(delay, move |ctx: &mut C, scheduler| {
            Self::next_line(ctx, scheduler, id)
        });
        narration.stage = Stage::Waiting(timer);
    }

    fn next_line(ctx: &mut C, scheduler: &mut Scheduler<C>, id: u64) {
        let narrator = ctx.narrator();
        let Some(narration) = narrator.narrations.get_mut(&id) else {
            return;
        };
        narration.cursor += 1;
        if narration.cursor < narration.lines.len() {
            let utterance = narrator.allocate_utterance(id);
            if let Some(narration) = narrator.narrations.get_mut(&id) {
                narration.stage = Stage::Speaking(utterance);
            }
            narrator.speak_current(id);
            return;
        }
        Self::finish(ctx, scheduler, id);
    }

    fn finish(ctx: &mut C, scheduler: &mut Scheduler<C>, id: u64) {
        let on_complete = ctx
            .narrator()
            .narrations
            .remove(&id)
            .and_then(|narration| narration.on_complete);
        if let Some(on_complete) = on_complete {
            on_complete(ctx, scheduler);
        }
    }

    fn allocate_utterance(&mut self, narration: u64) -> UtteranceId {
        let utterance = UtteranceId(self.next_utterance);
        self.next_utterance += 1;
        self.utterances.insert(utterance, narration);
        utterance
    }

    fn speak_current(&mut self, id: u64) {
        let Some(narration) = self.narrations.get(&id) else {
            return;
        };
        let Stage::Speaking(utterance) = narration.stage else {
            return;
        };
        let request = Utterance {
            id: utterance,
            text: narration.lines[narration.cursor].text.clone(),
            voice: narration.voice.clone(),
        };
        self.speaker.speak(request);
    }
}
