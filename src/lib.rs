//! JobAdder API client with OAuth 2.0 session handling.
//!
//! A [`JobAdderClient`](client::JobAdderClient) exchanges an authorization code (or resumes
//! from a stored refresh token) against the JobAdder identity provider, keeps the issued
//! tokens in a shared [`CredentialStore`](auth::CredentialStore), and attaches the current
//! access token to every API request as `Authorization: Bearer <token>`.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod authenticator;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{client::JobAdderClient, config::ClientParams, http::ReqwestHttpClient};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_client() -> ReqwestClient {
		ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Token transport wrapping [`test_reqwest_client`].
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		ReqwestHttpClient::with_client(test_reqwest_client())
	}

	/// Parameters pointing the token endpoint at `token_endpoint`.
	pub fn test_params(token_endpoint: &str) -> ClientParams {
		ClientParams::new("https://api.jobadder.com/v2", "client-test", "secret-test")
			.with_token_endpoint(token_endpoint)
	}

	/// JSON body of a successful JobAdder token response.
	pub fn token_body(access: &str, refresh: &str, expires_in: i64, api: &str) -> String {
		serde_json::json!({
			"access_token": access,
			"refresh_token": refresh,
			"token_type": "Bearer",
			"expires_in": expires_in,
			"api": api,
		})
		.to_string()
	}

	/// Initializes a client on the test transports.
	pub async fn build_test_client(params: ClientParams) -> Result<JobAdderClient> {
		JobAdderClient::with_http_clients(params, test_reqwest_http_client(), test_reqwest_client())
			.await
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
