use tokio::sync::oneshot;
use tracing::warn;

use crate::error::{AppError, Result};

/// One pending confirmation: the prompt text and the decision sink.
#[derive(Debug)]
struct Pending {
    title: String,
    message: String,
    decision: oneshot::Sender<bool>,
}

/// Single-slot asynchronous confirmation gate.
///
/// A consequential action calls [`ConfirmGate::request`] and awaits the
/// returned receiver; the UI resolves the slot exactly once with the user's
/// decision. Every dismissal path (cancel button, Escape, outside click)
/// resolves `false`; only the explicit primary button resolves `true`.
///
/// Only one request is tracked at a time. A second request while one is
/// pending is rejected with [`AppError::ConfirmPending`] — the original
/// stays pending and is never silently abandoned.
#[derive(Debug, Default)]
pub struct ConfirmGate {
    pending: Option<Pending>,
}

impl ConfirmGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Title of the pending confirmation, empty when closed.
    pub fn title(&self) -> &str {
        self.pending.as_ref().map_or("", |p| p.title.as_str())
    }

    /// Message of the pending confirmation, empty when closed.
    pub fn message(&self) -> &str {
        self.pending.as_ref().map_or("", |p| p.message.as_str())
    }

    /// Store a pending confirmation and hand back the deferred decision.
    pub fn request(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<oneshot::Receiver<bool>> {
        if self.pending.is_some() {
            warn!("confirmation requested while another is pending; rejecting");
            return Err(AppError::ConfirmPending);
        }
        let (tx, rx) = oneshot::channel();
        self.pending = Some(Pending {
            title: title.into(),
            message: message.into(),
            decision: tx,
        });
        Ok(rx)
    }

    /// Resolve the pending confirmation with the user's decision and reset
    /// the slot. A resolve with no pending request is a no-op.
    pub fn resolve(&mut self, accepted: bool) {
        if let Some(pending) = self.pending.take() {
            // The receiver may have been dropped; nothing to do then.
            let _ = pending.decision.send(accepted);
        }
    }
}
