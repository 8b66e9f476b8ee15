use std::fmt;

use futures::FutureExt;
use serde::Serialize;

use super::{AccountEntity, AccountMessage, Task};
use crate::core::hints;
use crate::core::wire::{Request, Response};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemovalState {
    Idle,
    ConfirmPending,
    Requesting,
}

/// How the last removal attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemovalOutcome {
    Cancelled,
    /// `reloaded` is set when the default account went away and the whole
    /// client was reset.
    Removed { reloaded: bool },
    Failed { error_code: Option<i64> },
}

/// Runs once after a successful removal of a non-default account.
pub struct AfterRemove(Box<dyn FnOnce() + Send>);

impl AfterRemove {
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        AfterRemove(Box::new(f))
    }

    fn run(self) {
        (self.0)()
    }
}

impl fmt::Debug for AfterRemove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AfterRemove")
    }
}

impl AccountEntity {
    pub fn removal_state(&self) -> RemovalState {
        self.removal
    }

    pub fn last_removal_outcome(&self) -> Option<RemovalOutcome> {
        self.last_removal
    }

    /// Ask the user to confirm removal. Ignored when the account cannot be
    /// removed or a removal is already under way.
    pub fn remove(&mut self, after: Option<AfterRemove>) -> Option<Task> {
        if !self.can_be_removed() {
            log::debug!("account {}: removal not allowed", self.id);
            return None;
        }
        if self.removal != RemovalState::Idle {
            log::debug!("account {}: removal already in progress", self.id);
            return None;
        }

        self.removal = RemovalState::ConfirmPending;
        self.after_remove = after;
        let answer = self
            .collab
            .popups
            .confirm(self.remove_confirmation(), self.email.clone());
        Some(answer.map(AccountMessage::RemovalAnswered).boxed())
    }

    pub(super) fn on_removal_answered(&mut self, ok: bool) -> Option<Task> {
        if self.removal != RemovalState::ConfirmPending {
            log::warn!("account {}: stray removal answer", self.id);
            return None;
        }
        if !ok {
            self.after_remove = None;
            self.finish_removal(RemovalOutcome::Cancelled);
            return None;
        }

        self.removal = RemovalState::Requesting;
        Some(self.send(
            Request::DeleteAccount { account_id_to_delete: self.id },
            AccountMessage::AccountDeleted,
        ))
    }

    pub(super) fn on_account_deleted(&mut self, response: Response) {
        if self.removal != RemovalState::Requesting {
            log::warn!("account {}: stray delete response", self.id);
            return;
        }

        if !response.is_success() {
            log::error!(
                "account {}: server refused removal (code {:?})",
                self.id,
                response.error_code
            );
            self.collab
                .errors
                .show_error_by_code(&response, hints::ERROR_REMOVE_ACCOUNT);
            self.after_remove = None;
            self.finish_removal(RemovalOutcome::Failed {
                error_code: response.error_code,
            });
            return;
        }

        if !self.config.is_mobile && !self.config.is_new_tab {
            self.collab.popups.close_compose_popup();
        }
        self.collab.registry.delete_account(self.id);

        let after = self.after_remove.take();
        if self.is_default {
            log::info!("account {}: default account removed, reloading", self.id);
            self.finish_removal(RemovalOutcome::Removed { reloaded: true });
            self.collab.navigation.clear_and_reload();
        } else {
            log::info!("account {}: removed", self.id);
            self.finish_removal(RemovalOutcome::Removed { reloaded: false });
            if let Some(after) = after {
                after.run();
            }
        }
    }

    fn finish_removal(&mut self, outcome: RemovalOutcome) {
        self.removal = RemovalState::Idle;
        self.last_removal = Some(outcome);
    }
}
