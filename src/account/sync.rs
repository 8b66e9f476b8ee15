use serde_json::Value;

use super::{AccountEntity, AccountMessage, Task};
use crate::core::coerce;
use crate::core::models::Filters;
use crate::core::wire::{Request, Response};

impl AccountEntity {
    /// Fetch storage usage when the quota bar is on and mail is enabled.
    ///
    /// Not deduplicated: overlapping calls each send a request and the
    /// last response to arrive wins.
    pub fn update_quota_params(&self) -> Option<Task> {
        if !self.config.show_quota_bar || !self.allow_mail {
            return None;
        }
        Some(self.send(
            Request::GetQuota { account_id: self.id },
            AccountMessage::QuotaLoaded,
        ))
    }

    // Best effort: a malformed payload still counts as received.
    pub(super) fn on_quota_response(&mut self, response: Response) {
        match &response.result {
            Value::Array(items) if items.len() > 1 => {
                self.used_space = coerce::int(items.first());
                self.quota = coerce::int(items.get(1));
                self.collab.cache.toggle_quota_change();
            }
            other => {
                log::warn!("account {}: unexpected quota payload {}", self.id, other);
            }
        }
        self.quota_received = true;
    }

    /// Fetch capability extensions once per entity. A rejected request
    /// leaves the guard unset so a later call retries.
    pub fn request_extensions(&mut self) -> Option<Task> {
        if self.extensions_requested || self.extensions_in_flight {
            return None;
        }
        self.extensions_in_flight = true;
        Some(self.send(
            Request::GetExtensions {
                account_id: self.id,
                client_time_zone: self.config.time_zone().to_string(),
            },
            AccountMessage::ExtensionsLoaded,
        ))
    }

    pub(super) fn on_extensions_response(&mut self, response: Response) {
        self.extensions_in_flight = false;
        if !response.is_success() {
            log::debug!("account {}: extensions request rejected", self.id);
            return;
        }
        match coerce::string_list(response.result.get("Extensions")) {
            Some(list) => self.extensions = list.into_iter().collect(),
            None => log::warn!("account {}: extensions payload without a list", self.id),
        }
        self.extensions_requested = true;
    }

    pub fn extension_exists(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }

    /// Fetch sieve filters. Always sends.
    pub fn request_filters(&self) -> Task {
        self.send(
            Request::GetFilters { account_id: self.id },
            AccountMessage::FiltersLoaded,
        )
    }

    pub(super) fn on_filters_response(&mut self, response: Response) {
        let mut filters = Filters::new();
        if response.is_success() {
            filters.parse(self.id, &response.result);
        }
        self.filters = Some(filters);
    }
}
