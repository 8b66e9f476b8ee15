//! Request/response shapes exchanged with the mail server module.
//!
//! Field names are the server's and must not change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce;
use super::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Method", content = "Parameters")]
pub enum Request {
    GetQuota {
        #[serde(rename = "AccountID")]
        account_id: i64,
    },
    GetExtensions {
        #[serde(rename = "AccountID")]
        account_id: i64,
        #[serde(rename = "ClientTimeZone")]
        client_time_zone: String,
    },
    GetFilters {
        #[serde(rename = "AccountID")]
        account_id: i64,
    },
    DeleteAccount {
        #[serde(rename = "AccountIDToDelete")]
        account_id_to_delete: i64,
    },
}

impl Request {
    pub fn method(&self) -> &'static str {
        match self {
            Request::GetQuota { .. } => "GetQuota",
            Request::GetExtensions { .. } => "GetExtensions",
            Request::GetFilters { .. } => "GetFilters",
            Request::DeleteAccount { .. } => "DeleteAccount",
        }
    }

    /// The parameters object alone, as the transport puts it on the wire.
    pub fn parameters(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove("Parameters").unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

/// Server reply envelope. `Result` is loosely typed: `false` on rejection,
/// otherwise whatever the method returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "Result", default)]
    pub result: Value,
    #[serde(rename = "ErrorCode", default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(rename = "ErrorMessage", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Response {
    pub fn ok(result: Value) -> Self {
        Response {
            result,
            ..Default::default()
        }
    }

    /// A bare `Result: false`.
    pub fn failed() -> Self {
        Response::ok(Value::Bool(false))
    }

    pub fn rejected(error_code: i64) -> Self {
        Response {
            error_code: Some(error_code),
            ..Response::failed()
        }
    }

    pub fn from_json(data: &str) -> Result<Self, TransportError> {
        Ok(serde_json::from_str(data)?)
    }

    /// JavaScript truthiness of `Result`.
    pub fn is_success(&self) -> bool {
        coerce::truthy(Some(&self.result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_wire_names() {
        let req = Request::GetExtensions {
            account_id: 3,
            client_time_zone: "Europe/Berlin".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "Method": "GetExtensions",
                "Parameters": {"AccountID": 3, "ClientTimeZone": "Europe/Berlin"}
            })
        );

        let del = Request::DeleteAccount { account_id_to_delete: 9 };
        assert_eq!(del.method(), "DeleteAccount");
        assert_eq!(del.parameters(), json!({"AccountIDToDelete": 9}));
    }

    #[test]
    fn response_decoding() {
        let resp = Response::from_json(r#"{"Result":[50,100]}"#).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.error_code, None);

        let resp = Response::from_json(r#"{"Result":false,"ErrorCode":703}"#).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.error_code, Some(703));

        let resp = Response::from_json("{}").unwrap();
        assert!(!resp.is_success());
    }

    #[test]
    fn response_decode_error() {
        assert!(matches!(
            Response::from_json("not json"),
            Err(TransportError::Decode(_))
        ));
    }
}
