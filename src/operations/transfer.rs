use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

/// Kind of background transfer owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Upload,
    PackagedDownload,
}

/// A cancellable background transfer: the spawned task reports completion
/// through the session's message channel, progress through an atomic byte
/// counter.
///
/// Upload and packaged download each own one of these independently;
/// cancelling one never touches the other or the listing state.
pub struct Transfer {
    pub kind: TransferKind,
    pub label: String,
    handle: JoinHandle<()>,
    progress: Arc<AtomicU64>,
}

impl Transfer {
    pub fn new(kind: TransferKind, label: String, handle: JoinHandle<()>, progress: Arc<AtomicU64>) -> Self {
        Self {
            kind,
            label,
            handle,
            progress,
        }
    }

    /// Bytes moved so far.
    pub fn progress(&self) -> u64 {
        self.progress.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for Transfer {
    fn drop(&mut self) {
        // A transfer abandoned by the session must not keep running.
        self.handle.abort();
    }
}
