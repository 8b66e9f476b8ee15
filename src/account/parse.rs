use serde_json::Value;

use super::AccountEntity;
use crate::core::coerce;
use crate::core::models::ServerSubEntity;

impl AccountEntity {
    /// Ignored entirely when `id` conflicts with the id already assigned.
    pub fn init(&mut self, id: i64, email: impl Into<String>, friendly_name: impl Into<String>) {
        if !self.accepts_id(id) {
            return;
        }
        self.id = id;
        self.set_email(email);
        self.friendly_name = friendly_name.into();
    }

    /// Load an entry of the server's account list. Malformed values are
    /// coerced, never rejected.
    ///
    /// `is_current` and `is_edited` are re-seeded from `IsDefault`, so any
    /// selection made before the call is lost. A record for a different
    /// account than the one already loaded is dropped without changes.
    pub fn parse(&mut self, raw: &Value) {
        let id = coerce::int(raw.get("AccountID"));
        if !self.accepts_id(id) {
            return;
        }
        self.init(
            id,
            coerce::string(raw.get("Email")),
            coerce::string(raw.get("FriendlyName")),
        );

        self.allow_mail = coerce::truthy(raw.get("AllowMail"));
        self.password_specified = coerce::truthy(raw.get("IsPasswordSpecified"));
        self.use_signature = coerce::truthy(raw.get("UseSignature"));
        self.signature = coerce::string(raw.get("Signature"));

        let is_default = coerce::truthy(raw.get("IsDefault"));
        self.is_default = is_default;
        self.is_current = is_default;
        self.is_edited = is_default;
    }

    /// Merge the extended account record. Server and extensions are
    /// replaced, not merged.
    pub fn update_extended(&mut self, raw: Option<&Value>) {
        let Some(raw) = raw else {
            return;
        };
        self.is_extended = true;

        self.is_internal = coerce::truthy(raw.get("IsInternal"));
        self.is_default = coerce::truthy(raw.get("IsDefault"));

        self.friendly_name = coerce::string(raw.get("FriendlyName"));
        self.incoming_login = coerce::string(raw.get("IncomingLogin"));
        self.outgoing_login = coerce::string(raw.get("OutgoingLogin"));

        self.server_id = coerce::int(raw.get("ServerId"));
        self.server = ServerSubEntity::from_raw(raw.get("Server"));

        self.extensions = coerce::string_list(raw.get("Extensions"))
            .unwrap_or_default()
            .into_iter()
            .collect();
        log::debug!(
            "account {}: extended data merged ({} extensions)",
            self.id,
            self.extensions.len()
        );
    }
}
