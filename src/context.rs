use std::sync::Arc;

use tokio::sync::watch;

/// Cooperative cancellation signal shared by every clone.
#[derive(Clone, Debug)]
pub struct Cancellation {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for Cancellation {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Per-worker execution context threaded through every operation.
#[derive(Clone, Debug, Default)]
pub struct ThreadContext {
    cancellation: Cancellation,
    thread_id: usize,
    thread_count: usize,
}

impl ThreadContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancellation: Cancellation) -> Self {
        Self {
            cancellation,
            ..Self::default()
        }
    }

    pub(crate) fn for_thread(mut self, thread_id: usize, thread_count: usize) -> Self {
        self.thread_id = thread_id;
        self.thread_count = thread_count;
        self
    }

    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    pub fn thread_id(&self) -> usize {
        self.thread_id
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }
}
