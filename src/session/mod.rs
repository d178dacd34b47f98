pub mod actions;
pub mod navigation;
mod pager;
mod update;

pub use pager::{FetchRequest, ListingPager, PagerState};
pub use update::update;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::message::Message;
use crate::models::config::ConsoleConfig;
use crate::models::expiry::ExpiryWindow;
use crate::models::list::SortState;
use crate::models::selection::SelectionSet;
use crate::operations::backend::Backend;
use crate::operations::history::{HistorySubscription, NavigationHistory};
use crate::operations::transfer::Transfer;

/// Severity of a transient alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Danger,
    Success,
}

/// Single-slot transient notification; each new alert replaces the
/// previous one, nothing is queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

/// State of the share dialog while it is open. Discarded on close and on
/// navigation.
#[derive(Debug, Clone)]
pub struct ShareState {
    /// Row name of the shared object, relative to the current path.
    pub object: String,
    pub window: ExpiryWindow,
    pub url: Option<String>,
}

/// The browsing session: one explicit state struct handed to every
/// operation, mutated only on the event loop.
///
/// The view layer reads the public fields plus the derived booleans below
/// and feeds user input back as [`Message`]s through [`Session::sender`].
pub struct Session {
    pub config: ConsoleConfig,
    pub logged_in: bool,

    pub buckets: Vec<String>,
    pub visible_buckets: Vec<String>,
    pub selection: SelectionSet,
    pub sort: SortState,
    pub pager: ListingPager,
    pub alert: Option<Alert>,
    pub share: Option<ShareState>,
    /// Object key awaiting a per-row delete confirmation.
    pub delete_confirmation: Option<String>,
    pub upload: Option<Transfer>,
    pub download: Option<Transfer>,
    pub should_quit: bool,

    pub(crate) backend: Arc<dyn Backend>,
    pub(crate) history: Arc<dyn NavigationHistory>,
    pub(crate) tx: UnboundedSender<Message>,
    pub(crate) _history_subscription: Option<HistorySubscription>,
}

impl Session {
    pub fn new(
        config: ConsoleConfig,
        logged_in: bool,
        backend: Arc<dyn Backend>,
        history: Arc<dyn NavigationHistory>,
    ) -> (Self, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let session = Self {
            config,
            logged_in,
            buckets: Vec::new(),
            visible_buckets: Vec::new(),
            selection: SelectionSet::new(),
            sort: SortState::default(),
            pager: ListingPager::new(),
            alert: None,
            share: None,
            delete_confirmation: None,
            upload: None,
            download: None,
            should_quit: false,
            backend,
            history,
            tx,
            _history_subscription: None,
        };

        (session, rx)
    }

    /// Sender the view layer uses to feed user input into the session.
    pub fn sender(&self) -> UnboundedSender<Message> {
        self.tx.clone()
    }

    pub fn current_bucket(&self) -> &str {
        &self.pager.target().bucket
    }

    pub fn current_path(&self) -> &str {
        &self.pager.target().prefix
    }

    pub fn show_alert(&mut self, level: AlertLevel, message: impl Into<String>) {
        self.alert = Some(Alert {
            level,
            message: message.into(),
        });
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // ===== Derived booleans for the view layer =====

    pub fn can_delete(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn can_download(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Sharing works on exactly one object.
    pub fn can_share(&self) -> bool {
        self.selection.count() == 1
    }

    pub fn is_loading(&self) -> bool {
        self.pager.is_loading()
    }

    /// Dialog state does not survive a navigation-target change.
    pub(crate) fn close_dialogs(&mut self) {
        self.share = None;
        self.delete_confirmation = None;
    }
}
