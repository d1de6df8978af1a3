use crate::scheduler::{Scheduler, TimerHandle};
use crate::speech::{NarrationHandle, Narrate, Narrator};

/// Timers and narrations owned by the active phase. Closing the scope cancels
/// all of them, whether or not they already ran.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    timers: Vec<TimerHandle>,
    narrations: Vec<NarrationHandle>,
}

impl Scope {
    pub(crate) fn timer(&mut self, handle: TimerHandle) -> TimerHandle {
        self.timers.push(handle);
        handle
    }

    pub(crate) fn narration(&mut self, handle: NarrationHandle) -> NarrationHandle {
        self.narrations.push(handle);
        handle
    }

    /// Returns how many were still pending.
    pub(crate) fn close<C: Narrate>(
        &mut self,
        scheduler: &mut Scheduler<C>,
        narrator: &mut Narrator<C>,
    ) -> usize {
        let timers = self
            .timers
            .drain(..)
            .filter(|handle| scheduler.cancel(*handle))
            .count();
        let narrations = narrator.cancel_all(scheduler, self.narrations.drain(..));
        timers + narrations
    }
}
