use std::path::PathBuf;

use crate::models::expiry::ExpiryField;
use crate::models::list::ListingPage;
use crate::operations::transfer::TransferKind;
use crate::session::AlertLevel;

/// Every externally-triggered session event: history changes, user input
/// and backend results all arrive here and are applied by
/// [`crate::session::update`].
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Session Control =====
    Shutdown,

    // ===== Navigation =====
    /// The navigation history moved to a new console path.
    PathChanged {
        path: String,
    },
    SelectBucket {
        bucket: String,
    },
    /// A separator-terminated prefix navigates; anything else is a leaf
    /// object and starts a download.
    SelectPrefix {
        prefix: String,
    },
    RefreshListing,

    // ===== Pagination =====
    RequestMore,
    ListingLoaded {
        generation: u64,
        page: ListingPage,
    },
    ListingFailed {
        generation: u64,
        error: String,
    },

    // ===== Bucket List =====
    BucketsLoaded {
        buckets: Vec<String>,
    },
    BucketsFailed {
        error: String,
    },
    CreateBucket {
        name: String,
    },
    BucketCreated {
        name: String,
    },
    FilterBuckets {
        pattern: String,
    },

    // ===== Selection =====
    CheckObject {
        name: String,
    },
    UncheckObject {
        name: String,
    },

    // ===== Sort =====
    SortByName,
    SortBySize,
    SortByDate,

    // ===== Delete =====
    ShowDeleteConfirmation {
        object: String,
    },
    HideDeleteConfirmation,
    ConfirmDelete,
    ObjectsRemoved {
        names: Vec<String>,
    },
    RemoveFailed {
        error: String,
    },

    // ===== Share =====
    ShareObject {
        /// Explicit per-row target; `None` shares the single checked
        /// object.
        object: Option<String>,
    },
    ExpiryIncrement {
        field: ExpiryField,
    },
    ExpiryDecrement {
        field: ExpiryField,
    },
    ShareLinkReady {
        object: String,
        url: String,
    },
    CloseShareDialog,

    // ===== Transfers =====
    UploadFile {
        local_path: PathBuf,
    },
    DownloadSelected,
    CancelUpload,
    CancelDownload,
    TransferFinished {
        kind: TransferKind,
        label: String,
    },
    TransferFailed {
        kind: TransferKind,
        error: String,
    },

    // ===== Alerts =====
    ShowAlert {
        level: AlertLevel,
        message: String,
    },
    DismissAlert,
}
