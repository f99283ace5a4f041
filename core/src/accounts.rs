//! Account resource operations.
//!
//! Each operation is a fixed composition of `build_request` and `execute`
//! that unwraps the `{"data": ...}` envelope. A 404 or 409 is not an error
//! here: the result is simply absent and the status is on the response.

use serde::de::IgnoredAny;
use uuid::Uuid;

use crate::client::AccountClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse};
use crate::signal::CancelSignal;
use crate::types::{AccountData, ApiResponse, Envelope};

/// Collection path, relative to the base URL.
pub const ACCOUNTS_PATH: &str = "organisation/accounts";

fn account_path(id: Uuid) -> String {
    format!("{ACCOUNTS_PATH}/{id}")
}

fn delete_path(id: Uuid, version: i64) -> String {
    format!("{ACCOUNTS_PATH}/{id}?version={version}")
}

impl AccountClient {
    /// Create `account`. The created record is absent when the server
    /// rejects it (409 for a duplicate id, 400 for a validation failure).
    pub async fn create_account(
        &self,
        cancel: &CancelSignal,
        account: &AccountData,
    ) -> Result<ApiResponse<Option<AccountData>>, ApiError> {
        let payload = Envelope::new(account);
        let req = self.build_request(HttpMethod::Post, ACCOUNTS_PATH, Some(&payload))?;
        let mut envelope = Envelope::<AccountData>::default();
        let response = self.execute(req, cancel, &mut envelope).await?;
        Ok(ApiResponse {
            data: envelope.into_inner(),
            response,
        })
    }

    /// All accounts, in the order the server returned them.
    pub async fn list_accounts(
        &self,
        cancel: &CancelSignal,
    ) -> Result<ApiResponse<Vec<AccountData>>, ApiError> {
        let req = self.build_request::<()>(HttpMethod::Get, ACCOUNTS_PATH, None)?;
        let mut envelope = Envelope::<Vec<AccountData>>::default();
        let response = self.execute(req, cancel, &mut envelope).await?;
        Ok(ApiResponse {
            data: envelope.into_inner().unwrap_or_default(),
            response,
        })
    }

    /// The account with `id`, absent when it does not exist.
    pub async fn get_account(
        &self,
        cancel: &CancelSignal,
        id: Uuid,
    ) -> Result<ApiResponse<Option<AccountData>>, ApiError> {
        let req = self.build_request::<()>(HttpMethod::Get, &account_path(id), None)?;
        let mut envelope = Envelope::<AccountData>::default();
        let response = self.execute(req, cancel, &mut envelope).await?;
        Ok(ApiResponse {
            data: envelope.into_inner(),
            response,
        })
    }

    /// Delete the account with `id` at `version`.
    ///
    /// The server answers 409 when `version` is not the record's current
    /// version, so callers pass the version they last read.
    pub async fn delete_account(
        &self,
        cancel: &CancelSignal,
        id: Uuid,
        version: i64,
    ) -> Result<HttpResponse, ApiError> {
        let req = self.build_request::<()>(HttpMethod::Delete, &delete_path(id, version), None)?;
        self.execute(req, cancel, &mut IgnoredAny).await
    }
}
