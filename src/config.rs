//! Caller-facing configuration for [`JobAdderClient`](crate::client::JobAdderClient).
//!
//! [`ClientParams`] derives serde traits so callers can load it from whatever format they
//! already use; the crate itself reads no environment variables or files.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Token endpoint of the JobAdder identity provider.
pub const JOBADDER_TOKEN_ENDPOINT: &str = "https://id.jobadder.com/connect/token";

/// Initial configuration for a client session.
///
/// Either provide an authorization code (plus the redirect URI it was issued for) to open a
/// new session, or an access/refresh token pair to resume one.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientParams {
	/// API base URL used until the token endpoint returns the tenant-specific one.
	pub api_base_url: String,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: TokenSecret,
	/// One-time code returned by the consent redirect.
	#[serde(default)]
	pub authorization_code: Option<TokenSecret>,
	/// Redirect URI the authorization code was issued for.
	#[serde(default)]
	pub redirect_uri: Option<String>,
	/// Access token of a session being resumed.
	#[serde(default)]
	pub access_token: Option<TokenSecret>,
	/// Refresh token of a session being resumed.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Expiry of `access_token`, when known.
	#[serde(default)]
	pub token_expiry_time: Option<OffsetDateTime>,
	/// Token endpoint; defaults to [`JOBADDER_TOKEN_ENDPOINT`].
	#[serde(default = "default_token_endpoint")]
	pub token_endpoint: String,
}
impl ClientParams {
	/// Creates parameters for the provided base URL and client credentials.
	pub fn new(
		api_base_url: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			api_base_url: api_base_url.into(),
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			authorization_code: None,
			redirect_uri: None,
			access_token: None,
			refresh_token: None,
			token_expiry_time: None,
			token_endpoint: default_token_endpoint(),
		}
	}

	/// Sets the authorization code and the redirect URI it was issued for.
	pub fn with_authorization_code(
		mut self,
		code: impl Into<String>,
		redirect_uri: impl Into<String>,
	) -> Self {
		self.authorization_code = TokenSecret::non_empty(code);
		self.redirect_uri = Some(redirect_uri.into()).filter(|uri| !uri.is_empty());

		self
	}

	/// Seeds the session with a previously issued access token.
	pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = TokenSecret::non_empty(token);

		self
	}

	/// Seeds the session with a previously issued refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = TokenSecret::non_empty(token);

		self
	}

	/// Records when the seeded access token expires.
	pub fn with_token_expiry_time(mut self, instant: OffsetDateTime) -> Self {
		self.token_expiry_time = Some(instant);

		self
	}

	/// Overrides the token endpoint (sandboxes, mock servers).
	pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.token_endpoint = endpoint.into();

		self
	}
}
impl Debug for ClientParams {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientParams")
			.field("api_base_url", &self.api_base_url)
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("authorization_code_set", &self.authorization_code.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.field("access_token_set", &self.access_token.is_some())
			.field("refresh_token_set", &self.refresh_token.is_some())
			.field("token_expiry_time", &self.token_expiry_time)
			.field("token_endpoint", &self.token_endpoint)
			.finish()
	}
}

fn default_token_endpoint() -> String {
	JOBADDER_TOKEN_ENDPOINT.into()
}
