//! Delayed one-shot tasks measured in ticks
//!
//! Every task is stamped with the session generation that scheduled it.
//! Restarting bumps the generation, so a task left over from a torn-down
//! session is dropped instead of acting on the new one.

use serde::{Deserialize, Serialize};

/// Work the session defers to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Clear the transient message, if it is still the one identified by `message_seq`
    ClearTransientMessage { message_seq: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ScheduledTask {
    due_tick: u64,
    generation: u64,
    action: DeferredAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    generation: u64,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run `action` once `delay_ticks` have elapsed after `now`
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, action: DeferredAction) {
        self.tasks.push(ScheduledTask {
            due_tick: now + delay_ticks,
            generation: self.generation,
            action,
        });
    }

    /// Invalidate everything scheduled so far and start a new generation
    pub fn advance_generation(&mut self) -> u64 {
        self.generation += 1;
        self.tasks.clear();
        self.generation
    }

    /// Remove and return actions due at or before `now`, in scheduling order.
    /// Tasks from an older generation are discarded.
    pub fn drain_due(&mut self, now: u64) -> Vec<DeferredAction> {
        let generation = self.generation;
        let mut due = Vec::new();
        self.tasks.retain(|task| {
            if task.generation != generation {
                return false;
            }
            if task.due_tick <= now {
                due.push(task.action);
                return false;
            }
            true
        });
        due
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}
