//! Domain DTOs for the account API.
//!
//! # Design
//! These types mirror the mock-server's wire format but are defined
//! independently; integration tests catch schema drift between the two.
//! Optional fields are skipped when absent so a created account echoes back
//! exactly what was sent. Unknown fields (server timestamps and the like) are
//! ignored on decode.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::HttpResponse;

/// Resource type tag carried by every account record.
pub const ACCOUNT_TYPE: &str = "accounts";

/// The `{"data": ...}` wrapper around every resource payload.
///
/// A missing `data` field decodes as `None`, so error bodies such as
/// `{"error_message": "..."}` decode into an empty envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self { data: None }
    }
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data: Some(data) }
    }

    pub fn into_inner(self) -> Option<T> {
        self.data
    }
}

/// A decoded result together with the response it came from.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub response: HttpResponse,
}

impl<T> ApiResponse<T> {
    pub fn status(&self) -> u16 {
        self.response.status
    }
}

/// An account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Uuid,
    pub organisation_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AccountAttributes>,
}

impl AccountData {
    /// A version-0 account with the given ids and attributes.
    pub fn new(id: Uuid, organisation_id: Uuid, attributes: AccountAttributes) -> Self {
        Self {
            kind: ACCOUNT_TYPE.to_string(),
            id,
            organisation_id,
            version: Some(0),
            attributes: Some(attributes),
        }
    }
}

/// Bank account details. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_account: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_matching_opt_out: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_identification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switched: Option<bool>,
}
