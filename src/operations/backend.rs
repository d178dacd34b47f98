use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::models::list::ListingPage;

pub type ProgressCallback = Arc<Mutex<dyn FnMut(u64) + Send>>;

/// Request body for a packaged (multi-object) download. The token
/// authorizes the request; anonymous sessions send it empty.
#[derive(Debug, Clone, Serialize)]
pub struct PackageRequest {
    pub bucket: String,
    pub prefix: String,
    pub objects: Vec<String>,
    pub token: String,
}

/// Storage transport consumed by the session.
///
/// Every call is asynchronous; the session never awaits one on the event
/// loop. Failures surface as alerts, leaving prior state untouched.
#[async_trait]
pub trait Backend: Send + Sync {
    /// One page of objects under `(bucket, prefix)`. Passing the
    /// continuation token of a truncated page resumes enumeration.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListingPage>;

    async fn list_buckets(&self) -> Result<Vec<String>>;

    async fn make_bucket(&self, name: &str) -> Result<()>;

    /// Removes the named objects in one call; all-or-nothing from the
    /// caller's perspective.
    async fn remove_objects(&self, bucket: &str, objects: &[String]) -> Result<()>;

    /// Short-lived token authorizing download requests.
    async fn create_access_token(&self) -> Result<String>;

    /// Time-limited shareable URL for one object. `expiry == None` asks
    /// for the public (unauthenticated) variant.
    async fn share_link(&self, bucket: &str, object: &str, expiry: Option<Duration>)
        -> Result<String>;

    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<()>;

    /// Fetches the requested objects into `dest_dir` as one packaged
    /// transfer.
    async fn packaged_download(
        &self,
        request: PackageRequest,
        dest_dir: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<()>;
}
