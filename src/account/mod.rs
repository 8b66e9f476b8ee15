//! The account entity: one mail account's state as the UI sees it.
//!
//! Plain fields are read and written through accessors; derived values
//! (`hash`, `full_email`, `can_be_removed`, removal texts) have getters
//! only. Network round-trips are returned as [`Task`]s; the owner awaits
//! them and feeds the resulting [`AccountMessage`] back into
//! [`AccountEntity::update`].

mod handle;
mod parse;
mod removal;
mod sync;

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use indexmap::IndexSet;
use serde::Serialize;

use crate::config::SessionConfig;
use crate::core::collab::Collaborators;
use crate::core::hints;
use crate::core::models::{Fetcher, Filters, Identity, ServerSubEntity};
use crate::core::wire::{Request, Response};

pub use handle::AccountHandle;
pub use removal::{AfterRemove, RemovalOutcome, RemovalState};

/// Pending work produced by an account operation.
pub type Task = BoxFuture<'static, AccountMessage>;

#[derive(Debug)]
pub enum AccountMessage {
    QuotaLoaded(Response),
    ExtensionsLoaded(Response),
    FiltersLoaded(Response),
    RemovalAnswered(bool),
    AccountDeleted(Response),
}

pub struct AccountEntity {
    config: Arc<SessionConfig>,
    collab: Collaborators,
    /// The workspace holds only this account.
    single: bool,

    id: i64,
    email: String,
    hash: String,
    allow_mail: bool,
    password_specified: bool,

    server_id: i64,
    server: ServerSubEntity,

    extensions: IndexSet<String>,
    extensions_requested: bool,
    extensions_in_flight: bool,
    fetchers: Option<Vec<Fetcher>>,
    identities: Option<Vec<Identity>>,

    friendly_name: String,
    incoming_login: String,
    outgoing_login: String,
    // Hosted by the bundled mail server. Set from extended data only.
    is_internal: bool,
    is_default: bool,
    is_current: bool,
    is_edited: bool,
    is_extended: bool,
    signature: String,
    use_signature: bool,
    filters: Option<Filters>,

    quota: i64,
    used_space: i64,
    quota_received: bool,

    removal: RemovalState,
    after_remove: Option<AfterRemove>,
    last_removal: Option<RemovalOutcome>,
}

/// A write to one plain field, as the UI makes it. Derived values have no
/// variant; they follow from the fields they depend on.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Email(String),
    FriendlyName(String),
    AllowMail(bool),
    PasswordSpecified(bool),
    IsDefault(bool),
    IsCurrent(bool),
    IsEdited(bool),
    Signature(String),
    UseSignature(bool),
    Fetchers(Option<Vec<Fetcher>>),
    Identities(Option<Vec<Identity>>),
}

/// Serializable view of the UI-visible state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub id: i64,
    pub email: String,
    pub hash: String,
    pub friendly_name: String,
    pub full_email: String,
    pub allow_mail: bool,
    pub password_specified: bool,
    pub server_id: i64,
    pub is_internal: bool,
    pub is_default: bool,
    pub is_current: bool,
    pub is_edited: bool,
    pub is_extended: bool,
    pub signature: String,
    pub use_signature: bool,
    pub can_be_removed: bool,
    pub quota: i64,
    pub used_space: i64,
    pub quota_received: bool,
    pub extensions: Vec<String>,
    pub other_emails: Vec<String>,
    pub removal: RemovalState,
}

/// 32-bit rolling hash over UTF-16 units, printed in decimal.
pub fn account_hash(id: i64, email: &str) -> String {
    let key = format!("{id}{email}");
    let mut h: i32 = 0;
    for unit in key.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(unit as i32);
    }
    h.to_string()
}

fn is_correct_email(s: &str) -> bool {
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "\"!#$%^{}`~&'+-=_.".contains(c))
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// `Name <address>`, quoting names that would otherwise parse as addresses.
pub fn full_email(name: &str, email: &str) -> String {
    if email.is_empty() {
        return name.to_string();
    }
    if name.is_empty() {
        return email.to_string();
    }
    if is_correct_email(name) || name.contains(',') {
        format!("\"{name}\" <{email}>")
    } else {
        format!("{name} <{email}>")
    }
}

impl AccountEntity {
    /// A blank account. `single` tells whether it is the only account of
    /// the workspace, which changes the removal hint.
    pub fn new(config: Arc<SessionConfig>, collab: Collaborators, single: bool) -> Self {
        AccountEntity {
            config,
            collab,
            single,
            id: 0,
            email: String::new(),
            hash: account_hash(0, ""),
            allow_mail: true,
            password_specified: true,
            server_id: 0,
            server: ServerSubEntity::default(),
            extensions: IndexSet::new(),
            extensions_requested: false,
            extensions_in_flight: false,
            fetchers: None,
            identities: None,
            friendly_name: String::new(),
            incoming_login: String::new(),
            outgoing_login: String::new(),
            is_internal: false,
            is_default: false,
            is_current: false,
            is_edited: false,
            is_extended: false,
            signature: String::new(),
            use_signature: false,
            filters: None,
            quota: 0,
            used_space: 0,
            quota_received: false,
            removal: RemovalState::Idle,
            after_remove: None,
            last_removal: None,
        }
    }

    /// Apply the result of a finished task. May hand back a follow-up.
    pub fn update(&mut self, message: AccountMessage) -> Option<Task> {
        match message {
            AccountMessage::QuotaLoaded(response) => {
                self.on_quota_response(response);
                None
            }
            AccountMessage::ExtensionsLoaded(response) => {
                self.on_extensions_response(response);
                None
            }
            AccountMessage::FiltersLoaded(response) => {
                self.on_filters_response(response);
                None
            }
            AccountMessage::RemovalAnswered(ok) => self.on_removal_answered(ok),
            AccountMessage::AccountDeleted(response) => {
                self.on_account_deleted(response);
                None
            }
        }
    }

    /// Run a task and every follow-up it produces to completion.
    pub async fn drive(&mut self, task: Option<Task>) {
        let mut next = task;
        while let Some(task) = next.take() {
            let message = task.await;
            next = self.update(message);
        }
    }

    /// Issue `request` now; the returned task resolves to its wrapped
    /// response. Transport failures read as `Result: false`.
    fn send<F>(&self, request: Request, wrap: F) -> Task
    where
        F: FnOnce(Response) -> AccountMessage + Send + 'static,
    {
        let method = request.method();
        log::debug!("account {}: sending {}", self.id, method);
        let pending = self.collab.transport.send(request);
        async move {
            let response = match pending.await {
                Ok(response) => response,
                Err(e) => {
                    log::warn!("{} failed: {}", method, e);
                    Response::failed()
                }
            };
            wrap(response)
        }
        .boxed()
    }

    // -- plain fields --------------------------------------------------------

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Once assigned, the id is fixed; records for any other id are refused.
    fn accepts_id(&self, id: i64) -> bool {
        if self.id != 0 && id != self.id {
            log::warn!("account {}: refusing record for account {}", self.id, id);
            return false;
        }
        true
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.hash = account_hash(self.id, &self.email);
    }

    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    pub fn set_friendly_name(&mut self, name: impl Into<String>) {
        self.friendly_name = name.into();
    }

    pub fn allow_mail(&self) -> bool {
        self.allow_mail
    }

    pub fn set_allow_mail(&mut self, allow: bool) {
        self.allow_mail = allow;
    }

    pub fn password_specified(&self) -> bool {
        self.password_specified
    }

    pub fn set_password_specified(&mut self, specified: bool) {
        self.password_specified = specified;
    }

    pub fn server_id(&self) -> i64 {
        self.server_id
    }

    pub fn server(&self) -> &ServerSubEntity {
        &self.server
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn extensions_requested(&self) -> bool {
        self.extensions_requested
    }

    pub fn fetchers(&self) -> Option<&[Fetcher]> {
        self.fetchers.as_deref()
    }

    pub fn set_fetchers(&mut self, fetchers: Option<Vec<Fetcher>>) {
        self.fetchers = fetchers;
    }

    pub fn identities(&self) -> Option<&[Identity]> {
        self.identities.as_deref()
    }

    pub fn set_identities(&mut self, identities: Option<Vec<Identity>>) {
        self.identities = identities;
    }

    pub fn incoming_login(&self) -> &str {
        &self.incoming_login
    }

    pub fn outgoing_login(&self) -> &str {
        &self.outgoing_login
    }

    pub fn is_internal(&self) -> bool {
        self.is_internal
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn set_is_default(&mut self, is_default: bool) {
        self.is_default = is_default;
    }

    pub fn is_current(&self) -> bool {
        self.is_current
    }

    pub fn set_is_current(&mut self, current: bool) {
        self.is_current = current;
    }

    pub fn is_edited(&self) -> bool {
        self.is_edited
    }

    pub fn set_is_edited(&mut self, edited: bool) {
        self.is_edited = edited;
    }

    pub fn is_extended(&self) -> bool {
        self.is_extended
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn set_signature(&mut self, signature: impl Into<String>) {
        self.signature = signature.into();
    }

    pub fn use_signature(&self) -> bool {
        self.use_signature
    }

    pub fn set_use_signature(&mut self, use_signature: bool) {
        self.use_signature = use_signature;
    }

    pub fn apply_edit(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Email(email) => self.set_email(email),
            FieldEdit::FriendlyName(name) => self.set_friendly_name(name),
            FieldEdit::AllowMail(allow) => self.set_allow_mail(allow),
            FieldEdit::PasswordSpecified(specified) => self.set_password_specified(specified),
            FieldEdit::IsDefault(is_default) => self.set_is_default(is_default),
            FieldEdit::IsCurrent(current) => self.set_is_current(current),
            FieldEdit::IsEdited(edited) => self.set_is_edited(edited),
            FieldEdit::Signature(signature) => self.set_signature(signature),
            FieldEdit::UseSignature(use_signature) => self.set_use_signature(use_signature),
            FieldEdit::Fetchers(fetchers) => self.set_fetchers(fetchers),
            FieldEdit::Identities(identities) => self.set_identities(identities),
        }
    }

    pub fn filters(&self) -> Option<&Filters> {
        self.filters.as_ref()
    }

    pub fn quota(&self) -> i64 {
        self.quota
    }

    pub fn used_space(&self) -> i64 {
        self.used_space
    }

    /// True once any quota response arrived, well-formed or not.
    pub fn quota_received(&self) -> bool {
        self.quota_received
    }

    // -- derived -------------------------------------------------------------

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn full_email(&self) -> String {
        full_email(&self.friendly_name, &self.email)
    }

    pub fn can_be_removed(&self) -> bool {
        !self.is_internal && (!self.is_default || self.config.allow_change_email_settings)
    }

    pub fn remove_hint(&self) -> String {
        if !self.is_default {
            return hints::REMOVE_ACCOUNT.to_string();
        }
        let and_other = hints::and_other(self.config.calendar_installed, self.config.contacts_installed);
        let mut hint = hints::remove_default_account(and_other);
        if !self.single {
            hint.push_str(hints::REMOVE_DEFAULT_ACCOUNT_NOT_SINGLE);
        }
        hint
    }

    pub fn remove_confirmation(&self) -> String {
        if self.is_default {
            self.remove_hint() + hints::CONFIRM_REMOVE_DEFAULT_ACCOUNT
        } else {
            hints::CONFIRM_REMOVE_ACCOUNT.to_string()
        }
    }

    // -- registry and cross-subsystem actions ----------------------------------

    /// Make this the current account of the client.
    pub fn change_account(&self) {
        self.collab.registry.change_current_account(self.id, true);
    }

    /// Enable mail on an account that was created without it.
    pub fn allow_mail_after_configuring(&mut self) {
        if self.allow_mail {
            return;
        }
        if self.password_specified {
            let (text, heading) = hints::after_connect_mail(&self.email);
            self.collab.popups.alert(text, heading);
        }
        self.allow_mail = true;
        self.collab.cache.request_folder_list(self.id);
    }

    pub fn default_identity(&self) -> Option<&Identity> {
        self.identities
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|identity| identity.is_default)
    }

    /// Addresses of fetchers first, then identities.
    pub fn fetchers_identities_emails(&self) -> Vec<String> {
        let fetchers = self.fetchers.as_deref().unwrap_or_default();
        let identities = self.identities.as_deref().unwrap_or_default();
        fetchers
            .iter()
            .map(|f| f.email.clone())
            .chain(identities.iter().map(|i| i.email.clone()))
            .collect()
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id,
            email: self.email.clone(),
            hash: self.hash.clone(),
            friendly_name: self.friendly_name.clone(),
            full_email: self.full_email(),
            allow_mail: self.allow_mail,
            password_specified: self.password_specified,
            server_id: self.server_id,
            is_internal: self.is_internal,
            is_default: self.is_default,
            is_current: self.is_current,
            is_edited: self.is_edited,
            is_extended: self.is_extended,
            signature: self.signature.clone(),
            use_signature: self.use_signature,
            can_be_removed: self.can_be_removed(),
            quota: self.quota,
            used_space: self.used_space,
            quota_received: self.quota_received,
            extensions: self.extensions.iter().cloned().collect(),
            other_emails: self.fetchers_identities_emails(),
            removal: self.removal,
        }
    }
}
