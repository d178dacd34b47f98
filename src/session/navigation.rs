use tracing::debug;

use crate::message::Message;
use crate::models::list::SortState;
use crate::models::path::{decode_path, encode_path, NavigationTarget};
use crate::session::pager::FetchRequest;
use crate::session::{actions, Session};

/// Starts the session: subscribes to history changes and, when
/// authenticated, bootstraps the bucket list. The subscription guard lives
/// on the session and unsubscribes on teardown.
pub fn start(session: &mut Session) {
    let tx = session.tx.clone();
    let subscription = session.history.subscribe(Box::new(move |path| {
        let _ = tx.send(Message::PathChanged { path });
    }));
    session._history_subscription = Some(subscription);

    // Resolve the path the console mounted on; the login route and the
    // bare root are ignored downstream. Anonymous single-bucket browsing
    // depends on this, since it never sees a bucket-list bootstrap.
    let current = session.history.current_path();
    let _ = session.tx.send(Message::PathChanged { path: current });

    if session.logged_in {
        let backend = session.backend.clone();
        let tx = session.tx.clone();
        tokio::spawn(async move {
            match backend.list_buckets().await {
                Ok(buckets) => {
                    let _ = tx.send(Message::BucketsLoaded { buckets });
                }
                Err(e) => {
                    let _ = tx.send(Message::BucketsFailed {
                        error: e.to_string(),
                    });
                }
            }
        });
    }
}

/// Applies the bootstrap bucket list. When the console still sits at the
/// namespace root, synthesizes a navigation to the first bucket; this is
/// the only history change the session initiates itself.
pub fn buckets_loaded(session: &mut Session, buckets: Vec<String>) {
    if buckets.is_empty() {
        return;
    }
    session.buckets = buckets.clone();
    session.visible_buckets = buckets.clone();

    let route_prefix = &session.config.route_prefix;
    let current = session.history.current_path();
    if current == *route_prefix || current == format!("{route_prefix}/") {
        let path = encode_path(route_prefix, &buckets[0], "");
        debug!(%path, "bootstrap navigation to first bucket");
        session.history.push(&path);
    }
}

/// Handles one history-change notification: derive the target, reconcile
/// session state, fetch the listing.
pub fn path_changed(session: &mut Session, path: String) {
    let route_prefix = session.config.route_prefix.clone();

    if path == format!("{route_prefix}/login") {
        return;
    }

    let mut path = path;
    if !path.ends_with('/') {
        path.push('/');
    }
    if path == format!("{route_prefix}/") {
        return;
    }

    let target = decode_path(&route_prefix, &path);

    // Anonymous sessions can only see the bucket named in the path.
    if !session.logged_in {
        session.buckets = vec![target.bucket.clone()];
        session.visible_buckets = session.buckets.clone();
    }

    navigate_to(session, target);
}

/// User picked a bucket from the sidebar.
pub fn select_bucket(session: &mut Session, bucket: &str) {
    if bucket == session.current_bucket() {
        return;
    }
    let path = encode_path(&session.config.route_prefix, bucket, "");
    session.history.push(&path);
}

/// User activated an entry. A separator-terminated (or empty) prefix
/// navigates through the history; anything else references a leaf object
/// and starts a download instead.
pub fn select_prefix(session: &mut Session, prefix: &str) {
    if prefix.is_empty() || prefix.ends_with('/') {
        if prefix == session.current_path() {
            return;
        }
        let path = encode_path(
            &session.config.route_prefix,
            session.current_bucket(),
            prefix,
        );
        session.history.push(&path);
    } else {
        actions::download_object(session, prefix.to_string());
    }
}

/// Re-fetches the current target (after an upload lands). Unlike a target
/// change, the selection survives.
pub fn refresh(session: &mut Session) {
    let target = session.pager.target().clone();
    if let Some(request) = session.pager.reset(target) {
        issue_fetch(session, request);
    }
}

/// Continuation fetch; the pager collapses duplicate triggers.
pub fn request_more(session: &mut Session) {
    if let Some(request) = session.pager.request_more() {
        issue_fetch(session, request);
    }
}

/// Resets selection, sort and pager for a new target, then issues the
/// fetch. The reset is synchronous, so a late response for the previous
/// target can never land on the new one.
fn navigate_to(session: &mut Session, target: NavigationTarget) {
    debug!(bucket = %target.bucket, prefix = %target.prefix, "navigation target changed");
    session.selection.clear();
    session.sort = SortState::default();
    session.close_dialogs();

    if let Some(request) = session.pager.reset(target) {
        issue_fetch(session, request);
    }
}

/// Spawns the listing call; the response comes back as a message tagged
/// with the issuing generation.
pub(crate) fn issue_fetch(session: &Session, request: FetchRequest) {
    let backend = session.backend.clone();
    let tx = session.tx.clone();
    tokio::spawn(async move {
        let FetchRequest {
            target,
            continuation,
            generation,
        } = request;
        match backend
            .list_objects(&target.bucket, &target.prefix, continuation)
            .await
        {
            Ok(page) => {
                let _ = tx.send(Message::ListingLoaded { generation, page });
            }
            Err(e) => {
                let _ = tx.send(Message::ListingFailed {
                    generation,
                    error: e.to_string(),
                });
            }
        }
    });
}
