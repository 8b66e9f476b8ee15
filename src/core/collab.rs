//! Interfaces of the subsystems an account talks to.
//!
//! All handles are passed in when the account is built; nothing here is
//! looked up lazily.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::error::TransportError;
use super::wire::{Request, Response};

/// Carries requests to the server module.
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> BoxFuture<'static, Result<Response, TransportError>>;
}

/// The client-wide account list.
pub trait AccountRegistry: Send + Sync {
    fn change_current_account(&self, account_id: i64, pass_to_ui: bool);
    fn delete_account(&self, account_id: i64);
}

/// Dialogs shown on behalf of an account.
pub trait Popups: Send + Sync {
    /// Resolves with the user's answer. May never resolve.
    fn confirm(&self, text: String, heading: String) -> BoxFuture<'static, bool>;
    fn alert(&self, text: String, heading: String);
    fn close_compose_popup(&self);
}

/// Mail cache notifications.
pub trait CacheBus: Send + Sync {
    /// Flips the quota-changed trigger observed by quota widgets.
    fn toggle_quota_change(&self);
    fn request_folder_list(&self, account_id: i64);
}

pub trait ErrorReporter: Send + Sync {
    fn show_error_by_code(&self, response: &Response, fallback: &str);
}

pub trait Navigation: Send + Sync {
    /// Drops all client state and reloads from the start page.
    fn clear_and_reload(&self);
}

#[derive(Clone)]
pub struct Collaborators {
    pub transport: Arc<dyn Transport>,
    pub registry: Arc<dyn AccountRegistry>,
    pub popups: Arc<dyn Popups>,
    pub cache: Arc<dyn CacheBus>,
    pub errors: Arc<dyn ErrorReporter>,
    pub navigation: Arc<dyn Navigation>,
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
