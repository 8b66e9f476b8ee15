//! Recording collaborators for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture};
use futures::FutureExt;

use crate::account::AccountEntity;
use crate::config::SessionConfig;
use crate::core::collab::{
    AccountRegistry, CacheBus, Collaborators, ErrorReporter, Navigation, Popups, Transport,
};
use crate::core::error::TransportError;
use crate::core::wire::{Request, Response};

/// Answers from a per-method queue; unscripted calls get `Result: false`.
#[derive(Default)]
pub struct FakeTransport {
    sent: Mutex<Vec<Request>>,
    scripted: Mutex<HashMap<&'static str, VecDeque<Result<Response, TransportError>>>>,
}

impl FakeTransport {
    pub fn respond(&self, method: &'static str, reply: Result<Response, TransportError>) {
        self.scripted
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(reply);
    }

    pub fn sent(&self) -> Vec<Request> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: Request) -> BoxFuture<'static, Result<Response, TransportError>> {
        let reply = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(request.method())
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Response::failed()));
        self.sent.lock().unwrap().push(request);
        future::ready(reply).boxed()
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    current: Mutex<Vec<(i64, bool)>>,
    deleted: Mutex<Vec<i64>>,
}

impl FakeRegistry {
    pub fn current(&self) -> Vec<(i64, bool)> {
        self.current.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<i64> {
        self.deleted.lock().unwrap().clone()
    }
}

impl AccountRegistry for FakeRegistry {
    fn change_current_account(&self, account_id: i64, pass_to_ui: bool) {
        self.current.lock().unwrap().push((account_id, pass_to_ui));
    }

    fn delete_account(&self, account_id: i64) {
        self.deleted.lock().unwrap().push(account_id);
    }
}

/// `answer(None)` leaves confirmations pending forever.
#[derive(Default)]
pub struct FakePopups {
    answer: Mutex<Option<bool>>,
    confirms: Mutex<Vec<(String, String)>>,
    alerts: Mutex<Vec<(String, String)>>,
    compose_closed: AtomicUsize,
}

impl FakePopups {
    pub fn answer(&self, answer: Option<bool>) {
        *self.answer.lock().unwrap() = answer;
    }

    pub fn confirms(&self) -> Vec<(String, String)> {
        self.confirms.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<(String, String)> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn compose_closed(&self) -> usize {
        self.compose_closed.load(Ordering::SeqCst)
    }
}

impl Popups for FakePopups {
    fn confirm(&self, text: String, heading: String) -> BoxFuture<'static, bool> {
        self.confirms.lock().unwrap().push((text, heading));
        match *self.answer.lock().unwrap() {
            Some(ok) => future::ready(ok).boxed(),
            None => future::pending::<bool>().boxed(),
        }
    }

    fn alert(&self, text: String, heading: String) {
        self.alerts.lock().unwrap().push((text, heading));
    }

    fn close_compose_popup(&self) {
        self.compose_closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeCache {
    quota_toggles: AtomicUsize,
    folder_lists: Mutex<Vec<i64>>,
}

impl FakeCache {
    pub fn quota_toggles(&self) -> usize {
        self.quota_toggles.load(Ordering::SeqCst)
    }

    pub fn folder_lists(&self) -> Vec<i64> {
        self.folder_lists.lock().unwrap().clone()
    }
}

impl CacheBus for FakeCache {
    fn toggle_quota_change(&self) {
        self.quota_toggles.fetch_add(1, Ordering::SeqCst);
    }

    fn request_folder_list(&self, account_id: i64) {
        self.folder_lists.lock().unwrap().push(account_id);
    }
}

#[derive(Default)]
pub struct FakeErrors {
    reported: Mutex<Vec<(Option<i64>, String)>>,
}

impl FakeErrors {
    pub fn reported(&self) -> Vec<(Option<i64>, String)> {
        self.reported.lock().unwrap().clone()
    }
}

impl ErrorReporter for FakeErrors {
    fn show_error_by_code(&self, response: &Response, fallback: &str) {
        self.reported
            .lock()
            .unwrap()
            .push((response.error_code, fallback.to_string()));
    }
}

#[derive(Default)]
pub struct FakeNavigation {
    reloads: AtomicUsize,
}

impl FakeNavigation {
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl Navigation for FakeNavigation {
    fn clear_and_reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Default)]
pub struct Fakes {
    pub transport: Arc<FakeTransport>,
    pub registry: Arc<FakeRegistry>,
    pub popups: Arc<FakePopups>,
    pub cache: Arc<FakeCache>,
    pub errors: Arc<FakeErrors>,
    pub navigation: Arc<FakeNavigation>,
}

impl Fakes {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            transport: self.transport.clone(),
            registry: self.registry.clone(),
            popups: self.popups.clone(),
            cache: self.cache.clone(),
            errors: self.errors.clone(),
            navigation: self.navigation.clone(),
        }
    }

    /// An account in a workspace with other accounts.
    pub fn account(config: SessionConfig) -> (AccountEntity, Fakes) {
        Self::build(config, false)
    }

    pub fn single_account(config: SessionConfig) -> (AccountEntity, Fakes) {
        Self::build(config, true)
    }

    fn build(config: SessionConfig, single: bool) -> (AccountEntity, Fakes) {
        let _ = env_logger::builder().is_test(true).try_init();
        let fakes = Fakes::default();
        let account = AccountEntity::new(Arc::new(config), fakes.collaborators(), single);
        (account, fakes)
    }
}
