//! One-off status messages back to the requester.
//!
//! The core narrates session progress (start, success, every failure cause)
//! through this trait; the intake layer implements it against whatever
//! surface the request came from. Exactly one message is sent per detected
//! failure cause.

use crate::request::HelpstartRequest;

/// Sink for one-off status messages addressed to a request's originator.
pub trait Notifier {
    fn notify(&self, request: &HelpstartRequest, message: &str);
}

/// A notifier that only logs, for headless deployments and tools.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, request: &HelpstartRequest, message: &str) {
        log::info!("[{}] {}", request.requester, message);
    }
}
