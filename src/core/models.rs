use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce;

/// Connection parameters of an account's mail server.
///
/// Built once from the server block of the extended account record and
/// never patched afterwards; a newer record replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSubEntity {
    pub id: i64,
    pub name: String,

    pub incoming_server: String,
    pub incoming_port: u16,
    pub incoming_use_ssl: bool,

    pub outgoing_server: String,
    pub outgoing_port: u16,
    pub outgoing_use_ssl: bool,
    pub smtp_auth_type: String,

    pub domains: String,
    pub enable_sieve: bool,
    pub sieve_port: u16,
    pub enable_threading: bool,
    pub use_full_email_address_as_login: bool,

    pub set_external_access_servers: bool,
    pub external_access_imap_server: String,
    pub external_access_imap_port: u16,
    pub external_access_smtp_server: String,
    pub external_access_smtp_port: u16,
}

/// Host/port pairs that clients outside the webmail should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalAccessHosts {
    pub imap_server: String,
    pub imap_port: u16,
    pub smtp_server: String,
    pub smtp_port: u16,
}

fn port(value: Option<&Value>) -> u16 {
    u16::try_from(coerce::int(value)).unwrap_or(0)
}

impl ServerSubEntity {
    /// A missing or non-object block yields the empty server.
    pub fn from_raw(raw: Option<&Value>) -> Self {
        let Some(obj) = raw.and_then(Value::as_object) else {
            return Self::default();
        };
        let id = match obj.get("EntityId") {
            Some(v) if !v.is_null() => coerce::int(Some(v)),
            _ => coerce::int(obj.get("ServerId")),
        };
        ServerSubEntity {
            id,
            name: coerce::string(obj.get("Name")),
            incoming_server: coerce::string(obj.get("IncomingServer")),
            incoming_port: port(obj.get("IncomingPort")),
            incoming_use_ssl: coerce::truthy(obj.get("IncomingUseSsl")),
            outgoing_server: coerce::string(obj.get("OutgoingServer")),
            outgoing_port: port(obj.get("OutgoingPort")),
            outgoing_use_ssl: coerce::truthy(obj.get("OutgoingUseSsl")),
            smtp_auth_type: coerce::string(obj.get("SmtpAuthType")),
            domains: coerce::string(obj.get("Domains")),
            enable_sieve: coerce::truthy(obj.get("EnableSieve")),
            sieve_port: port(obj.get("SievePort")),
            enable_threading: coerce::truthy(obj.get("EnableThreading")),
            use_full_email_address_as_login: coerce::truthy(obj.get("UseFullEmailAddressAsLogin")),
            set_external_access_servers: coerce::truthy(obj.get("SetExternalAccessServers")),
            external_access_imap_server: coerce::string(obj.get("ExternalAccessImapServer")),
            external_access_imap_port: port(obj.get("ExternalAccessImapPort")),
            external_access_smtp_server: coerce::string(obj.get("ExternalAccessSmtpServer")),
            external_access_smtp_port: port(obj.get("ExternalAccessSmtpPort")),
        }
    }

    /// External endpoints, only when the server publishes them.
    pub fn external_access_hosts(&self) -> Option<ExternalAccessHosts> {
        if !self.set_external_access_servers {
            return None;
        }
        Some(ExternalAccessHosts {
            imap_server: self.external_access_imap_server.clone(),
            imap_port: self.external_access_imap_port,
            smtp_server: self.external_access_smtp_server.clone(),
            smtp_port: self.external_access_smtp_port,
        })
    }
}

/// One server-side sieve rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub enabled: bool,
    pub field: i64,
    pub condition: i64,
    pub filter: String,
    pub action: i64,
    pub folder_full_name: String,
}

impl Filter {
    fn from_raw(raw: &Value) -> Option<Self> {
        let obj = raw.as_object()?;
        Some(Filter {
            enabled: coerce::truthy(obj.get("Enable")),
            field: coerce::int(obj.get("Field")),
            condition: coerce::int(obj.get("Condition")),
            filter: coerce::string(obj.get("Filter")),
            action: coerce::int(obj.get("Action")),
            folder_full_name: coerce::string(obj.get("FolderFullName")),
        })
    }
}

/// Filters of one account as last fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub account_id: i64,
    pub collection: Vec<Filter>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, account_id: i64, payload: &Value) {
        self.account_id = account_id;
        self.collection = match payload {
            Value::Array(items) => items.iter().filter_map(Filter::from_raw).collect(),
            _ => Vec::new(),
        };
    }
}

/// Sender identity owned by the identities subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub friendly_name: String,
    pub is_default: bool,
}

/// External mailbox fetched into this account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fetcher {
    pub id: i64,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_from_raw() {
        let raw = json!({
            "EntityId": 4,
            "Name": "main",
            "IncomingServer": "imap.example.com",
            "IncomingPort": "993",
            "IncomingUseSsl": true,
            "OutgoingServer": "smtp.example.com",
            "OutgoingPort": 587,
            "SetExternalAccessServers": true,
            "ExternalAccessImapServer": "mail.example.com",
            "ExternalAccessImapPort": 143,
            "ExternalAccessSmtpServer": "mail.example.com",
            "ExternalAccessSmtpPort": 25
        });
        let server = ServerSubEntity::from_raw(Some(&raw));
        assert_eq!(server.id, 4);
        assert_eq!(server.incoming_port, 993);
        assert!(server.incoming_use_ssl);
        assert!(!server.outgoing_use_ssl);

        let hosts = server.external_access_hosts().unwrap();
        assert_eq!(hosts.imap_port, 143);
        assert_eq!(hosts.smtp_server, "mail.example.com");
    }

    #[test]
    fn server_fallbacks() {
        assert_eq!(ServerSubEntity::from_raw(None), ServerSubEntity::default());
        assert_eq!(
            ServerSubEntity::from_raw(Some(&json!("nope"))),
            ServerSubEntity::default()
        );

        let server = ServerSubEntity::from_raw(Some(&json!({"ServerId": 2, "IncomingPort": 70000})));
        assert_eq!(server.id, 2);
        assert_eq!(server.incoming_port, 0);
        assert!(server.external_access_hosts().is_none());
    }

    #[test]
    fn filters_parse() {
        let mut filters = Filters::new();
        filters.parse(
            5,
            &json!([
                {"Enable": "1", "Field": 2, "Condition": 0, "Filter": "invoice", "Action": 3, "FolderFullName": "Bills"},
                "garbage"
            ]),
        );
        assert_eq!(filters.account_id, 5);
        assert_eq!(filters.collection.len(), 1);
        assert!(filters.collection[0].enabled);
        assert_eq!(filters.collection[0].folder_full_name, "Bills");
    }
}
