//! Request editors that decorate outgoing API requests.

// crates.io
use reqwest::RequestBuilder;
// self
use crate::{
	_prelude::*,
	auth::CredentialStore,
	error::ApiClientError,
};

/// Hook applied to every request issued through [`ApiClient`](crate::api::ApiClient).
///
/// Closures with the signature `Fn(RequestBuilder) -> Result<RequestBuilder>` implement
/// the trait directly.
pub trait RequestEditor
where
	Self: Send + Sync,
{
	/// Consumes the request and returns it with this editor's changes applied.
	fn edit(&self, request: RequestBuilder) -> Result<RequestBuilder>;

	/// Short label used in debug output.
	fn name(&self) -> &'static str {
		"custom"
	}
}
impl<F> RequestEditor for F
where
	F: Send + Sync + Fn(RequestBuilder) -> Result<RequestBuilder>,
{
	fn edit(&self, request: RequestBuilder) -> Result<RequestBuilder> {
		self(request)
	}
}

/// Sets `Authorization: Bearer <token>` from the credential store at request time.
///
/// The token is never captured when the editor is created, so a refresh (or a manual
/// override) is picked up by the very next request.
#[derive(Clone, Debug)]
pub struct BearerAuth {
	store: Arc<CredentialStore>,
}
impl BearerAuth {
	/// Creates an editor reading from `store`.
	pub fn new(store: Arc<CredentialStore>) -> Self {
		Self { store }
	}
}
impl RequestEditor for BearerAuth {
	fn edit(&self, request: RequestBuilder) -> Result<RequestBuilder> {
		let token = self.store.access_token().ok_or(ApiClientError::MissingAccessToken)?;

		Ok(request.bearer_auth(token.expose()))
	}

	fn name(&self) -> &'static str {
		"bearer_auth"
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{api::ApiClient, auth::TokenSecret, config::ClientParams};

	fn authorization(client: &ApiClient) -> String {
		let request = client
			.get("candidates")
			.expect("Request should be prepared.")
			.build()
			.expect("Request should build.");

		request
			.headers()
			.get(reqwest::header::AUTHORIZATION)
			.expect("Authorization header should be set.")
			.to_str()
			.expect("Authorization header should be ASCII.")
			.to_owned()
	}

	#[test]
	fn bearer_header_tracks_store_updates() {
		let store = Arc::new(CredentialStore::from_params(
			ClientParams::new("https://api.jobadder.com/v2", "client", "secret")
				.with_access_token("first")
				.with_refresh_token("refresh"),
		));
		let client = ApiClient::new("https://api.jobadder.com/v2")
			.expect("Client should build.")
			.with_request_editor(BearerAuth::new(store.clone()));

		assert_eq!(authorization(&client), "Bearer first");

		store.set_access_token(Some(TokenSecret::new("second")));

		assert_eq!(authorization(&client), "Bearer second");
	}

	#[test]
	fn missing_token_is_reported() {
		let store = Arc::new(CredentialStore::from_params(ClientParams::new(
			"https://api.jobadder.com/v2",
			"client",
			"secret",
		)));
		let client = ApiClient::new("https://api.jobadder.com/v2")
			.expect("Client should build.")
			.with_request_editor(BearerAuth::new(store));
		let err = client.get("jobs").expect_err("Requests need an access token.");

		assert!(matches!(err, Error::ApiClient(ApiClientError::MissingAccessToken)));
	}
}
