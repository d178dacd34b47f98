use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::message::Message;
use crate::models::expiry::{ExpiryField, ExpiryWindow};
use crate::operations::backend::{PackageRequest, ProgressCallback};
use crate::operations::transfer::{Transfer, TransferKind};
use crate::session::{navigation, AlertLevel, Session, ShareState};

// ===== Bulk delete =====

/// Deletes the checked objects, or the single confirmed row when nothing
/// is checked. One backend call for the whole batch; the listing and
/// selection are only touched on success (all-or-nothing).
pub fn delete_objects(session: &mut Session) {
    let current_path = session.current_path().to_string();

    let (keys, names): (Vec<String>, Vec<String>) = if !session.selection.is_empty() {
        let names = session.selection.to_list();
        let keys = names.iter().map(|n| format!("{current_path}{n}")).collect();
        (keys, names)
    } else if let Some(object) = session.delete_confirmation.clone() {
        let name = object
            .strip_prefix(&current_path)
            .unwrap_or(&object)
            .to_string();
        (vec![object], vec![name])
    } else {
        session.show_alert(AlertLevel::Danger, "No objects selected for deletion");
        return;
    };

    let bucket = session.current_bucket().to_string();
    if bucket.is_empty() {
        session.show_alert(AlertLevel::Danger, "No bucket selected");
        return;
    }

    let backend = session.backend.clone();
    let tx = session.tx.clone();
    tokio::spawn(async move {
        match backend.remove_objects(&bucket, &keys).await {
            Ok(()) => {
                let _ = tx.send(Message::ObjectsRemoved { names });
            }
            Err(e) => {
                let _ = tx.send(Message::RemoveFailed {
                    error: e.to_string(),
                });
            }
        }
    });
}

/// Applies a successful bulk delete: drop the names from the listing,
/// reset the selection, close the confirmation. Deliberately no alert.
pub fn objects_removed(session: &mut Session, names: Vec<String>) {
    debug!(count = names.len(), "objects removed from listing");
    session.pager.remove_entries(&names);
    session.selection.clear();
    session.delete_confirmation = None;
}

// ===== Bulk download =====

pub fn download_selected(session: &mut Session) {
    if session.selection.is_empty() {
        session.show_alert(AlertLevel::Danger, "No objects selected for download");
        return;
    }
    let objects = session.selection.to_list();
    let prefix = session.current_path().to_string();
    let label = format!("{} object(s)", objects.len());
    start_packaged_download(session, objects, prefix, label);
}

/// Single leaf object activated in the listing.
pub fn download_object(session: &mut Session, key: String) {
    let label = key.clone();
    start_packaged_download(session, vec![key], String::new(), label);
}

/// Authenticated sessions acquire a short-lived access token first;
/// anonymous ones request with an empty token directly.
fn start_packaged_download(
    session: &mut Session,
    objects: Vec<String>,
    prefix: String,
    label: String,
) {
    let bucket = session.current_bucket().to_string();
    if bucket.is_empty() {
        session.show_alert(AlertLevel::Danger, "No bucket selected");
        return;
    }

    let logged_in = session.logged_in;
    let backend = session.backend.clone();
    let tx = session.tx.clone();
    let dest_dir = session.config.download_dir();

    let progress = Arc::new(AtomicU64::new(0));
    let counter = progress.clone();
    let callback: ProgressCallback = Arc::new(Mutex::new(move |transferred: u64| {
        counter.store(transferred, Ordering::Relaxed);
    }));

    let task_label = label.clone();
    let handle = tokio::spawn(async move {
        let token = if logged_in {
            match backend.create_access_token().await {
                Ok(token) => token,
                Err(e) => {
                    let _ = tx.send(Message::TransferFailed {
                        kind: TransferKind::PackagedDownload,
                        error: e.to_string(),
                    });
                    return;
                }
            }
        } else {
            String::new()
        };

        let request = PackageRequest {
            bucket,
            prefix,
            objects,
            token,
        };
        match backend
            .packaged_download(request, &dest_dir, Some(callback))
            .await
        {
            Ok(()) => {
                let _ = tx.send(Message::TransferFinished {
                    kind: TransferKind::PackagedDownload,
                    label: task_label,
                });
            }
            Err(e) => {
                let _ = tx.send(Message::TransferFailed {
                    kind: TransferKind::PackagedDownload,
                    error: e.to_string(),
                });
            }
        }
    });

    session.download = Some(Transfer::new(
        TransferKind::PackagedDownload,
        label,
        handle,
        progress,
    ));
}

// ===== Share =====

/// Opens the share dialog. With no explicit target the single checked
/// object is shared; any other selection count is a precondition failure.
pub fn share_object(session: &mut Session, object: Option<String>) {
    let object = match object {
        Some(name) => name,
        None => {
            if session.selection.count() != 1 {
                session.show_alert(AlertLevel::Danger, "Select exactly one object to share");
                return;
            }
            session.selection.to_list().remove(0)
        }
    };

    session.share = Some(ShareState {
        object,
        window: ExpiryWindow::default(),
        url: None,
    });
    request_share_link(session);
}

/// Expiry-wheel change while the dialog is open; every change re-requests
/// the URL for the new window.
pub fn adjust_expiry(session: &mut Session, field: ExpiryField, increment: bool) {
    let Some(share) = session.share.as_mut() else {
        return;
    };
    if increment {
        share.window.increment(field);
    } else {
        share.window.decrement(field);
    }
    request_share_link(session);
}

fn request_share_link(session: &mut Session) {
    let Some(share) = &session.share else {
        return;
    };
    let object = share.object.clone();
    let key = format!("{}{}", session.current_path(), object);
    let bucket = session.current_bucket().to_string();
    // Anonymous sessions get the public URL variant instead of an error.
    let expiry = session.logged_in.then(|| share.window.to_duration());

    let backend = session.backend.clone();
    let tx = session.tx.clone();
    tokio::spawn(async move {
        match backend.share_link(&bucket, &key, expiry).await {
            Ok(url) => {
                let _ = tx.send(Message::ShareLinkReady { object, url });
            }
            Err(e) => {
                let _ = tx.send(Message::ShowAlert {
                    level: AlertLevel::Danger,
                    message: e.to_string(),
                });
            }
        }
    });
}

/// URLs are matched back against the dialog's object; a link for a closed
/// or superseded dialog is dropped.
pub fn share_link_ready(session: &mut Session, object: String, url: String) {
    if let Some(share) = session.share.as_mut() {
        if share.object == object {
            share.url = Some(url);
        }
    }
}

// ===== Upload =====

pub fn upload_file(session: &mut Session, local_path: PathBuf) {
    if session.buckets.is_empty() {
        session.show_alert(
            AlertLevel::Danger,
            "Bucket needs to be created before trying to upload files.",
        );
        return;
    }
    let bucket = session.current_bucket().to_string();
    if bucket.is_empty() {
        session.show_alert(AlertLevel::Danger, "No bucket selected for upload");
        return;
    }
    let Some(file_name) = local_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
    else {
        session.show_alert(AlertLevel::Danger, "Invalid upload path");
        return;
    };
    let key = format!("{}{}", session.current_path(), file_name);

    let backend = session.backend.clone();
    let tx = session.tx.clone();

    let progress = Arc::new(AtomicU64::new(0));
    let counter = progress.clone();
    let callback: ProgressCallback = Arc::new(Mutex::new(move |transferred: u64| {
        counter.store(transferred, Ordering::Relaxed);
    }));

    let task_key = key.clone();
    let handle = tokio::spawn(async move {
        match backend
            .upload_file(&bucket, &task_key, &local_path, Some(callback))
            .await
        {
            Ok(()) => {
                let _ = tx.send(Message::TransferFinished {
                    kind: TransferKind::Upload,
                    label: task_key,
                });
            }
            Err(e) => {
                let _ = tx.send(Message::TransferFailed {
                    kind: TransferKind::Upload,
                    error: e.to_string(),
                });
            }
        }
    });

    session.upload = Some(Transfer::new(TransferKind::Upload, key, handle, progress));
}

// ===== Transfer lifecycle =====

pub fn transfer_finished(
    session: &mut Session,
    kind: TransferKind,
    label: String,
) -> Option<Message> {
    match kind {
        TransferKind::Upload => {
            session.upload = None;
            session.show_alert(AlertLevel::Success, format!("Uploaded: {label}"));
            Some(Message::RefreshListing)
        }
        TransferKind::PackagedDownload => {
            session.download = None;
            session.show_alert(AlertLevel::Success, format!("Downloaded: {label}"));
            None
        }
    }
}

pub fn transfer_failed(session: &mut Session, kind: TransferKind, error: String) {
    match kind {
        TransferKind::Upload => session.upload = None,
        TransferKind::PackagedDownload => session.download = None,
    }
    session.show_alert(AlertLevel::Danger, format!("Transfer failed: {error}"));
}

/// Cancelling one transfer never touches the other or the listing.
pub fn cancel_upload(session: &mut Session) {
    if let Some(transfer) = session.upload.take() {
        transfer.cancel();
        session.show_alert(
            AlertLevel::Info,
            format!("Upload cancelled: {}", transfer.label),
        );
    }
}

pub fn cancel_download(session: &mut Session) {
    if let Some(transfer) = session.download.take() {
        transfer.cancel();
        session.show_alert(
            AlertLevel::Info,
            format!("Download cancelled: {}", transfer.label),
        );
    }
}

// ===== Bucket management =====

pub fn create_bucket(session: &mut Session, name: String) {
    let name = name.trim().to_string();
    if name.is_empty() {
        session.show_alert(AlertLevel::Danger, "Bucket name cannot be empty");
        return;
    }

    let backend = session.backend.clone();
    let tx = session.tx.clone();
    tokio::spawn(async move {
        match backend.make_bucket(&name).await {
            Ok(()) => {
                let _ = tx.send(Message::BucketCreated { name });
            }
            Err(e) => {
                let _ = tx.send(Message::ShowAlert {
                    level: AlertLevel::Danger,
                    message: e.to_string(),
                });
            }
        }
    });
}

pub fn bucket_created(session: &mut Session, name: String) {
    session.buckets.push(name.clone());
    session.visible_buckets.push(name.clone());
    navigation::select_bucket(session, &name);
}

/// Narrows the visible bucket list; the full list is retained.
pub fn filter_buckets(session: &mut Session, pattern: &str) {
    session.visible_buckets = session
        .buckets
        .iter()
        .filter(|b| b.contains(pattern))
        .cloned()
        .collect();
}
