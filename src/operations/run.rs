use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::message::Message;
use crate::session::{navigation, update, Session};

/// Main session loop: starts the session (history subscription plus
/// bucket-list bootstrap), then drains the message channel, applying each
/// message and any follow-up it cascades into.
///
/// Returns when a [`Message::Shutdown`] lands or every sender is gone.
pub async fn run_session(
    session: &mut Session,
    rx: &mut UnboundedReceiver<Message>,
) -> Result<()> {
    navigation::start(session);

    while let Some(msg) = rx.recv().await {
        let mut current = Some(msg);
        while let Some(message) = current.take() {
            current = update(session, message)?;
        }

        if session.should_quit {
            break;
        }
    }

    Ok(())
}
