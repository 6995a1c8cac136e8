use tokio::task::JoinHandle;

/// Bookkeeping for the single pending shutoff timer.
///
/// Every arm gets a fresh generation. A sleeping task only gets to fire if its
/// generation is still the pending one when it takes the engine lock, so a
/// task that woke just as it was cancelled or superseded does nothing.
#[derive(Default)]
pub struct ShutoffTimer {
    last_generation: u64,
    pending: Option<PendingTimer>
}

struct PendingTimer {
    generation: u64,
    task: JoinHandle<()>
}

impl ShutoffTimer {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Reserve the generation for a timer task that is about to be spawned.
    pub fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    /// Record the spawned task as the pending timer.
    ///
    /// Callers cancel any previous timer first; one left behind here is aborted.
    pub fn track(&mut self, generation: u64, task: JoinHandle<()>) {
        if let Some(previous) = self.pending.replace(PendingTimer { generation, task }) {
            previous.task.abort();
        }
    }

    /// Abort the pending timer. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.task.abort();
                true
            },
            None => false
        }
    }

    /// Claim the pending timer on behalf of a task that has woken up.
    ///
    /// Returns false for a stale generation, leaving any newer timer alone.
    pub fn claim(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                true
            },
            _ => false
        }
    }
}


#[cfg(test)]
mod tests {
    use std::future::pending;

    use super::*;

    #[tokio::test]
    async fn test_claim_only_current_generation() {
        let mut timer = ShutoffTimer::default();

        let first = timer.next_generation();
        timer.track(first, tokio::spawn(pending()));

        timer.cancel();
        let second = timer.next_generation();
        timer.track(second, tokio::spawn(pending()));

        assert!(!timer.claim(first));
        assert!(timer.is_pending());

        assert!(timer.claim(second));
        assert!(!timer.is_pending());

        // already claimed
        assert!(!timer.claim(second));
    }

    #[tokio::test]
    async fn test_cancel_aborts_task() {
        let mut timer = ShutoffTimer::default();

        // the sender is dropped once the task is torn down
        let (alive_send, alive_recv) = tokio::sync::oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _alive = alive_send;
            pending::<()>().await
        });

        let generation = timer.next_generation();
        timer.track(generation, task);

        assert!(timer.cancel());
        assert!(!timer.cancel());

        assert!(alive_recv.await.is_err());
        assert!(!timer.claim(generation));
    }
}
