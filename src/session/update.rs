use anyhow::Result;

use crate::message::Message;
use crate::models::list::{sort_by_date, sort_by_name, sort_by_size};
use crate::session::{actions, navigation, AlertLevel, Session};

/// Central update function: takes the session and one message, applies the
/// transition, and optionally returns a follow-up message to process next.
/// Every state change in the session goes through here.
pub fn update(session: &mut Session, msg: Message) -> Result<Option<Message>> {
    match msg {
        // ===== Session Control =====
        Message::Shutdown => {
            session.should_quit = true;
            Ok(None)
        }

        // ===== Navigation =====
        Message::PathChanged { path } => {
            navigation::path_changed(session, path);
            Ok(None)
        }
        Message::SelectBucket { bucket } => {
            navigation::select_bucket(session, &bucket);
            Ok(None)
        }
        Message::SelectPrefix { prefix } => {
            navigation::select_prefix(session, &prefix);
            Ok(None)
        }
        Message::RefreshListing => {
            navigation::refresh(session);
            Ok(None)
        }

        // ===== Pagination =====
        Message::RequestMore => {
            navigation::request_more(session);
            Ok(None)
        }
        Message::ListingLoaded { generation, page } => {
            session.pager.apply(generation, page);
            Ok(None)
        }
        Message::ListingFailed { generation, error } => {
            // Stale failures are discarded as silently as stale pages.
            if session.pager.fail(generation) {
                session.show_alert(AlertLevel::Danger, error);
            }
            Ok(None)
        }

        // ===== Bucket List =====
        Message::BucketsLoaded { buckets } => {
            navigation::buckets_loaded(session, buckets);
            Ok(None)
        }
        Message::BucketsFailed { error } => {
            session.show_alert(AlertLevel::Danger, error);
            Ok(None)
        }
        Message::CreateBucket { name } => {
            actions::create_bucket(session, name);
            Ok(None)
        }
        Message::BucketCreated { name } => {
            actions::bucket_created(session, name);
            Ok(None)
        }
        Message::FilterBuckets { pattern } => {
            actions::filter_buckets(session, &pattern);
            Ok(None)
        }

        // ===== Selection =====
        Message::CheckObject { name } => {
            session.selection.add(&name);
            Ok(None)
        }
        Message::UncheckObject { name } => {
            session.selection.remove(&name);
            Ok(None)
        }

        // ===== Sort =====
        Message::SortByName => {
            session.sort.by_name = !session.sort.by_name;
            let ascending = session.sort.by_name;
            sort_by_name(session.pager.entries_mut(), ascending);
            Ok(None)
        }
        Message::SortBySize => {
            session.sort.by_size = !session.sort.by_size;
            let ascending = session.sort.by_size;
            sort_by_size(session.pager.entries_mut(), ascending);
            Ok(None)
        }
        Message::SortByDate => {
            session.sort.by_date = !session.sort.by_date;
            let ascending = session.sort.by_date;
            sort_by_date(session.pager.entries_mut(), ascending);
            Ok(None)
        }

        // ===== Delete =====
        Message::ShowDeleteConfirmation { object } => {
            session.delete_confirmation = Some(object);
            Ok(None)
        }
        Message::HideDeleteConfirmation => {
            session.delete_confirmation = None;
            Ok(None)
        }
        Message::ConfirmDelete => {
            actions::delete_objects(session);
            Ok(None)
        }
        Message::ObjectsRemoved { names } => {
            actions::objects_removed(session, names);
            Ok(None)
        }
        Message::RemoveFailed { error } => {
            session.show_alert(AlertLevel::Danger, error);
            Ok(None)
        }

        // ===== Share =====
        Message::ShareObject { object } => {
            actions::share_object(session, object);
            Ok(None)
        }
        Message::ExpiryIncrement { field } => {
            actions::adjust_expiry(session, field, true);
            Ok(None)
        }
        Message::ExpiryDecrement { field } => {
            actions::adjust_expiry(session, field, false);
            Ok(None)
        }
        Message::ShareLinkReady { object, url } => {
            actions::share_link_ready(session, object, url);
            Ok(None)
        }
        Message::CloseShareDialog => {
            session.share = None;
            Ok(None)
        }

        // ===== Transfers =====
        Message::UploadFile { local_path } => {
            actions::upload_file(session, local_path);
            Ok(None)
        }
        Message::DownloadSelected => {
            actions::download_selected(session);
            Ok(None)
        }
        Message::CancelUpload => {
            actions::cancel_upload(session);
            Ok(None)
        }
        Message::CancelDownload => {
            actions::cancel_download(session);
            Ok(None)
        }
        Message::TransferFinished { kind, label } => {
            Ok(actions::transfer_finished(session, kind, label))
        }
        Message::TransferFailed { kind, error } => {
            actions::transfer_failed(session, kind, error);
            Ok(None)
        }

        // ===== Alerts =====
        Message::ShowAlert { level, message } => {
            session.show_alert(level, message);
            Ok(None)
        }
        Message::DismissAlert => {
            session.dismiss_alert();
            Ok(None)
        }
    }
}
