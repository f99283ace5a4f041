use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const ACCOUNT_TYPE: &str = "accounts";

/// A stored account as returned on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Uuid,
    pub organisation_id: Uuid,
    pub version: i64,
    pub attributes: serde_json::Value,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NewAccount {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Uuid,
    pub organisation_id: Uuid,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_message: String,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub version: i64,
}

/// Failures mapped to the status codes and `error_message` bodies the
/// account API uses.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Duplicate,
    NotFound(Uuid),
    VersionConflict,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, format!("validation failure: {msg}"))
            }
            AppError::Duplicate => (
                StatusCode::CONFLICT,
                "Account cannot be created as it violates a duplicate constraint".to_string(),
            ),
            AppError::NotFound(id) => {
                (StatusCode::NOT_FOUND, format!("record {id} does not exist"))
            }
            AppError::VersionConflict => (StatusCode::CONFLICT, "invalid version".to_string()),
        };
        (status, Json(ErrorBody { error_message: message })).into_response()
    }
}

/// Accounts in insertion order, which is also list order.
pub type Db = Arc<RwLock<Vec<Account>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/v1/organisation/accounts", get(list_accounts).post(create_account))
        .route(
            "/v1/organisation/accounts/{id}",
            get(get_account).delete(delete_account),
        )
        .route("/v1/echo", post(echo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_accounts(State(db): State<Db>) -> Json<Envelope<Vec<Account>>> {
    let accounts = db.read().await;
    Json(Envelope {
        data: accounts.clone(),
    })
}

async fn create_account(
    State(db): State<Db>,
    payload: Result<Json<Envelope<NewAccount>>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Account>>), AppError> {
    let Json(Envelope { data: input }) =
        payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    if input.kind != ACCOUNT_TYPE {
        return Err(AppError::Validation(format!("type must be `{ACCOUNT_TYPE}`")));
    }
    if !input.attributes.is_object() {
        return Err(AppError::Validation("attributes is required".to_string()));
    }

    let mut accounts = db.write().await;
    if accounts.iter().any(|a| a.id == input.id) {
        debug!(id = %input.id, "duplicate account rejected");
        return Err(AppError::Duplicate);
    }
    let now = Utc::now();
    let account = Account {
        kind: input.kind,
        id: input.id,
        organisation_id: input.organisation_id,
        version: 0,
        attributes: input.attributes,
        created_on: now,
        modified_on: now,
    };
    accounts.push(account.clone());
    info!(id = %account.id, "account created");
    Ok((StatusCode::CREATED, Json(Envelope { data: account })))
}

async fn get_account(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Account>>, AppError> {
    let accounts = db.read().await;
    accounts
        .iter()
        .find(|a| a.id == id)
        .cloned()
        .map(|data| Json(Envelope { data }))
        .ok_or(AppError::NotFound(id))
}

async fn delete_account(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    params: Result<Query<DeleteParams>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let mut accounts = db.write().await;
    let Some(index) = accounts.iter().position(|a| a.id == id) else {
        // The account API answers an unknown id with an empty 404.
        return Ok(StatusCode::NOT_FOUND);
    };
    if accounts[index].version != params.version {
        return Err(AppError::VersionConflict);
    }
    accounts.remove(index);
    info!(%id, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the request body and content type unchanged.
async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}
