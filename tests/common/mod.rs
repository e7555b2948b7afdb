//! Helpers shared by the integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::prelude::*;
// self
use jobadder_client::{
	client::JobAdderClient, config::ClientParams, error::Result, http::ReqwestHttpClient,
	reqwest::Client as ReqwestClient,
};

pub const CLIENT_ID: &str = "client-it";
pub const CLIENT_SECRET: &str = "secret-it";
pub const REDIRECT_URI: &str = "https://app.example.com/jobadder/callback";

pub fn reqwest_client() -> ReqwestClient {
	ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.redirect(jobadder_client::reqwest::redirect::Policy::none())
		.build()
		.expect("Failed to build Reqwest client for tests.")
}

pub fn token_http_client() -> ReqwestHttpClient {
	ReqwestHttpClient::with_client(reqwest_client())
}

/// Parameters for a fresh session that still has to redeem `code`.
pub fn code_params(server: &MockServer, code: &str) -> ClientParams {
	ClientParams::new(server.url("/v2"), CLIENT_ID, CLIENT_SECRET)
		.with_authorization_code(code, REDIRECT_URI)
		.with_token_endpoint(server.url("/connect/token"))
}

/// Parameters for a resumed session holding `access` and `refresh`.
pub fn resumed_params(server: &MockServer, access: &str, refresh: &str) -> ClientParams {
	ClientParams::new(server.url("/v2"), CLIENT_ID, CLIENT_SECRET)
		.with_access_token(access)
		.with_refresh_token(refresh)
		.with_token_endpoint(server.url("/connect/token"))
}

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

pub async fn connect(params: ClientParams) -> Result<JobAdderClient> {
	JobAdderClient::with_http_clients(params, token_http_client(), reqwest_client()).await
}
