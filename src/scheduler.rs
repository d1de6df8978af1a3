//! Cooperative timers driven by an external clock.
//!
//! Nothing here sleeps or spawns. The host calls [`Scheduler::advance`] once per
//! frame with the current time and a context value; every due callback runs on
//! that call with `&mut` access to both the context and the scheduler, so it can
//! arm or cancel further work.
//!
//! Work armed while an `advance` call is running never runs in that same call,
//! it waits for the next one. A zero delay therefore means "next cycle".

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

use log::debug;

pub type Callback<C> = Box<dyn FnOnce(&mut C, &mut Scheduler<C>)>;
type TickFn<C> = Box<dyn FnMut(&mut C, &mut Scheduler<C>)>;
type CountdownFn<C> = Box<dyn FnMut(&mut C, &mut Scheduler<C>, u32)>;

const SECOND: Duration = Duration::from_secs(1);

/// Returned by every scheduling call. Cancelling it twice, or after the work
/// already ran, does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

enum Task<C> {
    Once(Callback<C>),
    Every {
        period: Duration,
        tick: TickFn<C>,
    },
    Countdown {
        remaining: u32,
        on_tick: CountdownFn<C>,
        on_complete: Option<Callback<C>>,
    },
}

struct Entry<C> {
    task: Task<C>,
    seq: u64,
    armed_cycle: u64,
}

struct Firing {
    id: u64,
    canceled: bool,
}

pub struct Scheduler<C> {
    now: Duration,
    cycle: u64,
    next_id: u64,
    next_seq: u64,
    entries: HashMap<u64, Entry<C>>,
    // (due, seq, id); stale rows are skipped when their seq no longer matches
    queue: BinaryHeap<Reverse<(Duration, u64, u64)>>,
    firing: Option<Firing>,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            cycle: 0,
            next_id: 0,
            next_seq: 0,
            entries: HashMap::new(),
            queue: BinaryHeap::new(),
            firing: None,
        }
    }

    /// Time of the latest `advance` call.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers still waiting to run.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&handle.0)
    }

    /// Runs `callback` once, `delay` after now.
    pub fn after(
        &mut self,
        delay: Duration,
        callback: impl FnOnce(&mut C, &mut Scheduler<C>) + 'static,
    ) -> TimerHandle {
        self.arm(delay, Task::Once(Box::new(callback)))
    }

    /// Runs `tick` every `period` until cancelled. The next run is armed only
    /// after the current one returns.
    pub fn every(
        &mut self,
        period: Duration,
        tick: impl FnMut(&mut C, &mut Scheduler<C>) + 'static,
    ) -> TimerHandle {
        self.arm(
            period,
            Task::Every {
                period,
                tick: Box::new(tick),
            },
        )
    }

    /// Ticks with `seconds` on the next cycle, then once per second with the
    /// decremented value down to 1, and calls `on_complete` one second after
    /// the last tick. Cancelling suppresses both callbacks from then on.
    pub fn countdown(
        &mut self,
        seconds: u32,
        on_tick: impl FnMut(&mut C, &mut Scheduler<C>, u32) + 'static,
        on_complete: impl FnOnce(&mut C, &mut Scheduler<C>) + 'static,
    ) -> TimerHandle {
        self.arm(
            Duration::ZERO,
            Task::Countdown {
                remaining: seconds,
                on_tick: Box::new(on_tick),
                on_complete: Some(Box::new(on_complete)),
            },
        )
    }

    /// Returns whether anything was still pending for `handle`.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if self.entries.remove(&handle.0).is_some() {
            debug!("timer {} canceled", handle.0);
            return true;
        }
        match self.firing.as_mut() {
            Some(firing) if firing.id == handle.0 && !firing.canceled => {
                firing.canceled = true;
                true
            }
            _ => false,
        }
    }

    /// Moves the clock to `now` and runs everything due, earliest first.
    /// Returns how many callbacks ran.
    pub fn advance(&mut self, now: Duration, ctx: &mut C) -> usize {
        if now > self.now {
            self.now = now;
        }
        self.cycle += 1;

        let mut fired = 0;
        let mut deferred = Vec::new();
        while let Some(Reverse((due, seq, id))) = self.queue.peek().copied() {
            if due > self.now {
                break;
            }
            self.queue.pop();

            let armed_cycle = match self.entries.get(&id) {
                Some(entry) if entry.seq == seq => entry.armed_cycle,
                _ => continue,
            };
            if armed_cycle >= self.cycle {
                deferred.push(Reverse((due, seq, id)));
                continue;
            }
            if let Some(entry) = self.entries.remove(&id) {
                self.run(id, entry.task, ctx);
                fired += 1;
            }
        }
        self.queue.extend(deferred);
        fired
    }

    fn run(&mut self, id: u64, task: Task<C>, ctx: &mut C) {
        self.firing = Some(Firing {
            id,
            canceled: false,
        });

        let rearm = match task {
            Task::Once(callback) => {
                callback(ctx, self);
                None
            }
            Task::Every { period, mut tick } => {
                tick(ctx, self);
                Some((period, Task::Every { period, tick }))
            }
            Task::Countdown {
                remaining: 0,
                on_complete,
                ..
            } => {
                if let Some(on_complete) = on_complete {
                    on_complete(ctx, self);
                }
                None
            }
            Task::Countdown {
                remaining,
                mut on_tick,
                on_complete,
            } => {
                on_tick(ctx, self, remaining);
                Some((
                    SECOND,
                    Task::Countdown {
                        remaining: remaining - 1,
                        on_tick,
                        on_complete,
                    },
                ))
            }
        };

        let canceled = self.firing.take().map_or(false, |firing| firing.canceled);
        if let Some((delay, task)) = rearm {
            if !canceled {
                self.insert(id, delay, task);
            }
        }
    }

    fn arm(&mut self, delay: Duration, task: Task<C>) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.insert(id, delay, task);
        debug!("timer {} armed for {:?}", id, delay);
        TimerHandle(id)
    }

    fn insert(&mut self, id: u64, delay: Duration, task: Task<C>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            id,
            Entry {
                task,
                seq,
                armed_cycle: self.cycle,
            },
        );
        self.queue.push(Reverse((self.now + delay, seq, id)));
    }
}
