//! Redeems an authorization code against a mock JobAdder identity provider, then calls the
//! tenant API with the issued bearer token and forces a refresh.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use jobadder_client::{
	client::JobAdderClient, config::ClientParams, http::ReqwestHttpClient, reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let code_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/connect/token")
				.form_urlencoded_tuple("grant_type", "authorization_code");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"access_token\":\"demo-access\",\"refresh_token\":\"demo-refresh\",\"token_type\":\"Bearer\",\"expires_in\":3600,\"api\":\"{}\"}}",
				server.url("/v2")
			));
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/connect/token")
				.form_urlencoded_tuple("refresh_token", "demo-refresh");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"access_token\":\"demo-access-2\",\"token_type\":\"Bearer\",\"expires_in\":3600,\"api\":\"{}\"}}",
				server.url("/v2")
			));
		})
		.await;
	let jobs_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/jobs").header_exists("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"items\":[{\"jobId\":1,\"jobTitle\":\"Rust Engineer\"}]}");
		})
		.await;
	let params = ClientParams::new("https://api.jobadder.com/v2", "demo-client", "demo-secret")
		.with_authorization_code("demo-code", "https://app.example.com/callback")
		.with_token_endpoint(server.url("/connect/token"));
	let client = JobAdderClient::with_http_clients(
		params,
		ReqwestHttpClient::with_client(Client::builder().build()?),
		Client::new(),
	)
	.await?;

	println!("Session bound to {}.", client.api.base_url());

	let response = client.api.execute(client.api.get("jobs")?).await?;

	println!("GET /jobs -> {}: {}", response.status(), response.text().await?);

	let state = client.refresh_token().await?;

	println!(
		"Refreshed; access token expires at {:?}, refresh token kept: {}.",
		state.token_expiry_time,
		state.refresh_token.is_some()
	);

	code_mock.assert_async().await;
	refresh_mock.assert_async().await;
	jobs_mock.assert_async().await;

	Ok(())
}
