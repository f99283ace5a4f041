//! Async client for the account API.
//!
//! # Overview
//! Every operation runs through one pipeline: `build_request` produces an
//! `HttpRequest` value, `execute` sends it under a caller-supplied
//! `CancelSignal`, and the shared decoder fills a typed container from the
//! JSON body. The account operations (`create_account`, `list_accounts`,
//! `get_account`, `delete_account`) only pick a method, a path and an
//! envelope type.
//!
//! # Design
//! - `AccountClient` holds an immutable `ClientConfig` and its own transport.
//! - The cancel signal is a required argument, so an operation can never be
//!   started without one.
//! - An empty response body leaves the container untouched; malformed JSON
//!   is an `ApiError::DecodingError` that still carries the response.
//! - HTTP error statuses are data, not errors: the caller reads them from the
//!   returned `HttpResponse`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod accounts;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod signal;
pub mod types;

pub use accounts::ACCOUNTS_PATH;
pub use client::AccountClient;
pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use decode::decode;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use signal::{CancelReason, CancelSignal};
pub use types::{AccountAttributes, AccountData, ApiResponse, Envelope, ACCOUNT_TYPE};
