pub mod backend;
pub mod history;
pub mod run;
pub mod s3;
pub mod transfer;

pub use backend::{Backend, PackageRequest, ProgressCallback};
pub use history::{HistorySubscription, LocalHistory, NavigationHistory, PathListener};
pub use run::run_session;
pub use s3::S3Backend;
pub use transfer::{Transfer, TransferKind};
