use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use super::{AccountEntity, AccountMessage, AccountSnapshot, AfterRemove, FieldEdit, Task};
use crate::core::error::HandleError;

// ---------------------------------------------------------------------------
// Commands handled by the account task
// ---------------------------------------------------------------------------

enum AccountCmd {
    Parse(Value),
    UpdateExtended(Option<Value>),
    Edit(FieldEdit),
    AllowMailAfterConfiguring,
    UpdateQuota,
    RequestExtensions,
    RequestFilters,
    Remove(Option<AfterRemove>),
    ChangeAccount,
    Snapshot {
        reply: oneshot::Sender<AccountSnapshot>,
    },
}

// ---------------------------------------------------------------------------
// AccountHandle: Clone + Send + Sync facade over one entity
// ---------------------------------------------------------------------------

/// Owns an [`AccountEntity`] on a tokio task. Commands and finished
/// requests are applied one at a time in arrival order, so the entity is
/// never touched concurrently.
#[derive(Clone)]
pub struct AccountHandle {
    tx: mpsc::UnboundedSender<AccountCmd>,
}

impl AccountHandle {
    /// Must be called inside a tokio runtime. The task ends when the last
    /// handle is dropped; requests still in flight are then discarded.
    pub fn spawn(entity: AccountEntity) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::run_loop(entity, rx));
        AccountHandle { tx }
    }

    fn send(&self, cmd: AccountCmd) -> Result<(), HandleError> {
        self.tx.send(cmd).map_err(|_| HandleError)
    }

    pub fn parse(&self, raw: Value) -> Result<(), HandleError> {
        self.send(AccountCmd::Parse(raw))
    }

    pub fn update_extended(&self, raw: Option<Value>) -> Result<(), HandleError> {
        self.send(AccountCmd::UpdateExtended(raw))
    }

    /// Write one plain field, e.g. when the user switches accounts or
    /// saves the signature form.
    pub fn edit(&self, edit: FieldEdit) -> Result<(), HandleError> {
        self.send(AccountCmd::Edit(edit))
    }

    pub fn allow_mail_after_configuring(&self) -> Result<(), HandleError> {
        self.send(AccountCmd::AllowMailAfterConfiguring)
    }

    pub fn update_quota_params(&self) -> Result<(), HandleError> {
        self.send(AccountCmd::UpdateQuota)
    }

    pub fn request_extensions(&self) -> Result<(), HandleError> {
        self.send(AccountCmd::RequestExtensions)
    }

    pub fn request_filters(&self) -> Result<(), HandleError> {
        self.send(AccountCmd::RequestFilters)
    }

    pub fn remove(&self, after: Option<AfterRemove>) -> Result<(), HandleError> {
        self.send(AccountCmd::Remove(after))
    }

    pub fn change_account(&self) -> Result<(), HandleError> {
        self.send(AccountCmd::ChangeAccount)
    }

    pub async fn snapshot(&self) -> Result<AccountSnapshot, HandleError> {
        let (reply, rx) = oneshot::channel();
        self.send(AccountCmd::Snapshot { reply })?;
        rx.await.map_err(|_| HandleError)
    }

    // -- account task --------------------------------------------------------

    async fn run_loop(mut entity: AccountEntity, mut rx: mpsc::UnboundedReceiver<AccountCmd>) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<AccountMessage>();

        loop {
            let task = tokio::select! {
                cmd = rx.recv() => match cmd {
                    Some(cmd) => Self::apply(&mut entity, cmd),
                    None => break,
                },
                Some(message) = done_rx.recv() => entity.update(message),
            };

            if let Some(task) = task {
                let done_tx = done_tx.clone();
                tokio::spawn(async move {
                    let _ = done_tx.send(task.await);
                });
            }
        }
        log::debug!("account {} task exiting", entity.id());
    }

    fn apply(entity: &mut AccountEntity, cmd: AccountCmd) -> Option<Task> {
        match cmd {
            AccountCmd::Parse(raw) => {
                entity.parse(&raw);
                None
            }
            AccountCmd::UpdateExtended(raw) => {
                entity.update_extended(raw.as_ref());
                None
            }
            AccountCmd::Edit(edit) => {
                entity.apply_edit(edit);
                None
            }
            AccountCmd::AllowMailAfterConfiguring => {
                entity.allow_mail_after_configuring();
                None
            }
            AccountCmd::UpdateQuota => entity.update_quota_params(),
            AccountCmd::RequestExtensions => entity.request_extensions(),
            AccountCmd::RequestFilters => Some(entity.request_filters()),
            AccountCmd::Remove(after) => entity.remove(after),
            AccountCmd::ChangeAccount => {
                entity.change_account();
                None
            }
            AccountCmd::Snapshot { reply } => {
                let _ = reply.send(entity.snapshot());
                None
            }
        }
    }
}
