//! Wall-clock deferred actions with epoch-based cancellation
//!
//! Every action remembers the epoch it was scheduled in. Bumping the epoch
//! (pause, restart, new round) makes everything already queued stale: stale
//! actions are discarded when they come due instead of firing.

/// Actions the controller defers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// End the chomp and start the happy dance
    FinishEating,
    /// Leave the round-clear pause and start the next round
    AdvanceRound,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due_ms: f64,
    epoch: u64,
    action: Deferred,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    epoch: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued actions, stale ones included
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, action: Deferred) {
        self.pending.push(Pending {
            due_ms: now_ms + delay_ms,
            epoch: self.epoch,
            action,
        });
    }

    /// Make every queued action stale
    pub fn invalidate(&mut self) {
        self.epoch += 1;
    }

    /// Remove all due actions; returns the current-epoch ones in due order
    pub fn take_due(&mut self, now_ms: f64) -> Vec<Deferred> {
        if !self.pending.iter().any(|p| p.due_ms <= now_ms) {
            return Vec::new();
        }

        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due_ms <= now_ms {
                due.push(*p);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));

        let epoch = self.epoch;
        due.into_iter()
            .filter(|p| {
                let fresh = p.epoch == epoch;
                if !fresh {
                    log::debug!("Dropping stale {:?} from epoch {}", p.action, p.epoch);
                }
                fresh
            })
            .map(|p| p.action)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due_in_order() {
        let mut s = Scheduler::new();
        s.schedule(0.0, 1500.0, Deferred::AdvanceRound);
        s.schedule(0.0, 300.0, Deferred::FinishEating);

        assert!(s.take_due(299.0).is_empty());
        assert_eq!(s.take_due(2000.0), vec![Deferred::FinishEating, Deferred::AdvanceRound]);
        assert_eq!(s.pending_len(), 0);
    }

    #[test]
    fn test_invalidated_actions_never_fire() {
        let mut s = Scheduler::new();
        s.schedule(0.0, 1500.0, Deferred::AdvanceRound);
        s.invalidate();
        s.schedule(100.0, 1500.0, Deferred::AdvanceRound);

        assert!(s.take_due(1500.0).is_empty());
        assert_eq!(s.pending_len(), 1);
        assert_eq!(s.take_due(1600.0), vec![Deferred::AdvanceRound]);
    }
}
