//! Shared credential store read by request editors and written by the authenticator.

// self
use crate::{
	_prelude::*,
	auth::{GrantType, TokenGrant, TokenSecret},
	config::ClientParams,
	error::ConfigError,
};

/// Session state inferred from the tokens the store holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
	/// Neither an access token nor a refresh token is present.
	Unauthenticated,
	/// At least one token is present; the next exchange uses the refresh grant.
	Authenticated,
}

/// Mutable part of the credential store, replaced as a whole on every exchange.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenState {
	/// Base URL of the tenant API.
	pub base_url: String,
	/// Current bearer token.
	pub access_token: Option<TokenSecret>,
	/// Current refresh token.
	pub refresh_token: Option<TokenSecret>,
	/// Instant at which `access_token` expires, when known.
	pub token_expiry_time: Option<OffsetDateTime>,
}
impl TokenState {
	/// Returns the session state implied by the held tokens.
	pub fn auth_state(&self) -> AuthState {
		if self.access_token.is_none() && self.refresh_token.is_none() {
			AuthState::Unauthenticated
		} else {
			AuthState::Authenticated
		}
	}

	/// Returns `true` once the expiry instant has been reached.
	///
	/// Tokens without a known expiry are never reported as expired.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.token_expiry_time, Some(expiry) if instant >= expiry)
	}

	/// Returns `true` if the access token is missing or expires within `window` of `instant`.
	pub fn needs_refresh_at(&self, instant: OffsetDateTime, window: Duration) -> bool {
		if self.access_token.is_none() {
			return true;
		}

		let window = if window.is_negative() { Duration::ZERO } else { window };

		matches!(self.token_expiry_time, Some(expiry) if expiry - instant <= window)
	}
}
impl Debug for TokenState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenState")
			.field("base_url", &self.base_url)
			.field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("token_expiry_time", &self.token_expiry_time)
			.finish()
	}
}

/// Token material returned by a successful exchange.
#[derive(Clone)]
pub struct IssuedTokens {
	/// New bearer token.
	pub access_token: TokenSecret,
	/// Rotated refresh token; `None` if the provider did not send one.
	pub refresh_token: Option<TokenSecret>,
	/// Token type reported by the provider (normally `Bearer`).
	pub token_type: String,
	/// Lifetime of `access_token`.
	pub expires_in: Duration,
	/// Tenant API base URL (the response's `api` field).
	pub api: String,
	/// Instant the response was received.
	pub issued_at: OffsetDateTime,
}
impl IssuedTokens {
	/// Absolute expiry derived from `issued_at + expires_in`, or `None` on overflow.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.issued_at.checked_add(self.expires_in)
	}
}
impl Debug for IssuedTokens {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IssuedTokens")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("token_type", &self.token_type)
			.field("expires_in", &self.expires_in)
			.field("api", &self.api)
			.field("issued_at", &self.issued_at)
			.finish()
	}
}

/// Single source of truth for the session's credentials.
///
/// Static client configuration is immutable; the [`TokenState`] sits behind a lock and is
/// replaced wholesale, so readers see either the previous token set or the next one.
pub struct CredentialStore {
	client_id: String,
	client_secret: TokenSecret,
	authorization_code: Option<TokenSecret>,
	redirect_uri: Option<String>,
	token_endpoint: String,
	state: RwLock<TokenState>,
}
impl CredentialStore {
	/// Builds the store from caller configuration. Empty strings count as absent values.
	pub fn from_params(params: ClientParams) -> Self {
		let ClientParams {
			api_base_url,
			client_id,
			client_secret,
			authorization_code,
			redirect_uri,
			access_token,
			refresh_token,
			token_expiry_time,
			token_endpoint,
		} = params;
		let state = TokenState {
			base_url: api_base_url,
			access_token: access_token.filter(|secret| !secret.is_empty()),
			refresh_token: refresh_token.filter(|secret| !secret.is_empty()),
			token_expiry_time,
		};

		Self {
			client_id,
			client_secret,
			authorization_code: authorization_code.filter(|secret| !secret.is_empty()),
			redirect_uri: redirect_uri.filter(|uri| !uri.is_empty()),
			token_endpoint,
			state: RwLock::new(state),
		}
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// OAuth 2.0 client secret.
	pub fn client_secret(&self) -> &TokenSecret {
		&self.client_secret
	}

	/// Configured authorization code. It is kept after use.
	pub fn authorization_code(&self) -> Option<&TokenSecret> {
		self.authorization_code.as_ref()
	}

	/// Configured redirect URI.
	pub fn redirect_uri(&self) -> Option<&str> {
		self.redirect_uri.as_deref()
	}

	/// Token endpoint used for every exchange.
	pub fn token_endpoint(&self) -> &str {
		&self.token_endpoint
	}

	/// Returns a consistent copy of the current token state.
	pub fn snapshot(&self) -> TokenState {
		self.state.read().clone()
	}

	/// Current bearer token, read at call time.
	pub fn access_token(&self) -> Option<TokenSecret> {
		self.state.read().access_token.clone()
	}

	/// Current refresh token.
	pub fn refresh_token(&self) -> Option<TokenSecret> {
		self.state.read().refresh_token.clone()
	}

	/// Current API base URL.
	pub fn base_url(&self) -> String {
		self.state.read().base_url.clone()
	}

	/// Expiry of the current access token, when known.
	pub fn token_expiry_time(&self) -> Option<OffsetDateTime> {
		self.state.read().token_expiry_time
	}

	/// Session state implied by the held tokens.
	pub fn auth_state(&self) -> AuthState {
		self.state.read().auth_state()
	}

	/// Replaces the access token without touching the rest of the state.
	pub fn set_access_token(&self, token: Option<TokenSecret>) {
		self.state.write().access_token = token.filter(|secret| !secret.is_empty());
	}

	/// Picks the grant for the next exchange.
	///
	/// With no tokens at all the authorization code is used; otherwise the refresh token is,
	/// even when an access token is also present.
	pub fn select_grant(&self) -> Result<TokenGrant, ConfigError> {
		let state = self.state.read();

		match state.auth_state() {
			AuthState::Unauthenticated => {
				let code =
					self.authorization_code.clone().ok_or(ConfigError::MissingAuthorizationCode)?;

				Ok(TokenGrant::AuthorizationCode { code, redirect_uri: self.redirect_uri.clone() })
			},
			AuthState::Authenticated => {
				let refresh_token =
					state.refresh_token.clone().ok_or(ConfigError::MissingRefreshToken)?;

				Ok(TokenGrant::RefreshToken { refresh_token })
			},
		}
	}

	/// Grant type [`select_grant`](Self::select_grant) would pick, without validating secrets.
	pub fn next_grant_type(&self) -> GrantType {
		match self.auth_state() {
			AuthState::Unauthenticated => GrantType::AuthorizationCode,
			AuthState::Authenticated => GrantType::RefreshToken,
		}
	}

	/// Writes a successful exchange into the store under a single lock.
	///
	/// A missing refresh token in the response keeps the one already held.
	pub(crate) fn apply(&self, issued: &IssuedTokens) {
		let mut state = self.state.write();
		let refresh_token = issued.refresh_token.clone().or_else(|| state.refresh_token.clone());

		*state = TokenState {
			base_url: issued.api.clone(),
			access_token: Some(issued.access_token.clone()),
			refresh_token,
			token_expiry_time: issued.expires_at(),
		};
	}
}
impl Debug for CredentialStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialStore")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("authorization_code_set", &self.authorization_code.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.field("token_endpoint", &self.token_endpoint)
			.field("state", &*self.state.read())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn params() -> ClientParams {
		ClientParams::new("https://api.jobadder.com/v2", "client", "secret")
			.with_authorization_code("code-1", "https://app.example.com/callback")
	}

	fn issued(access: &str, refresh: Option<&str>) -> IssuedTokens {
		IssuedTokens {
			access_token: TokenSecret::new(access),
			refresh_token: refresh.map(TokenSecret::new),
			token_type: "Bearer".into(),
			expires_in: Duration::hours(1),
			api: "https://tenant.jobadder.com/v2".into(),
			issued_at: macros::datetime!(2025-01-01 00:00 UTC),
		}
	}

	#[test]
	fn empty_store_selects_authorization_code() {
		let store = CredentialStore::from_params(params());
		let grant = store.select_grant().expect("Authorization code grant should be selected.");

		assert_eq!(store.auth_state(), AuthState::Unauthenticated);
		assert_eq!(
			grant,
			TokenGrant::AuthorizationCode {
				code: TokenSecret::new("code-1"),
				redirect_uri: Some("https://app.example.com/callback".into()),
			}
		);
	}

	#[test]
	fn refresh_token_wins_even_with_access_token() {
		let store = CredentialStore::from_params(
			params().with_access_token("access-0").with_refresh_token("refresh-0"),
		);
		let grant = store.select_grant().expect("Refresh grant should be selected.");

		assert_eq!(
			grant,
			TokenGrant::RefreshToken { refresh_token: TokenSecret::new("refresh-0") }
		);
		assert_eq!(store.next_grant_type(), GrantType::RefreshToken);
	}

	#[test]
	fn access_token_without_refresh_token_is_a_config_error() {
		let store = CredentialStore::from_params(params().with_access_token("access-0"));
		let err = store.select_grant().expect_err("Refresh grant requires a refresh token.");

		assert!(matches!(err, ConfigError::MissingRefreshToken));
	}

	#[test]
	fn missing_code_is_a_config_error() {
		let store = CredentialStore::from_params(ClientParams::new(
			"https://api.jobadder.com/v2",
			"client",
			"secret",
		));
		let err = store.select_grant().expect_err("Authorization code grant requires a code.");

		assert!(matches!(err, ConfigError::MissingAuthorizationCode));
	}

	#[test]
	fn apply_replaces_state_and_keeps_code() {
		let store = CredentialStore::from_params(params());

		store.apply(&issued("access-1", Some("refresh-1")));

		let state = store.snapshot();

		assert_eq!(state.access_token, Some(TokenSecret::new("access-1")));
		assert_eq!(state.refresh_token, Some(TokenSecret::new("refresh-1")));
		assert_eq!(state.base_url, "https://tenant.jobadder.com/v2");
		assert_eq!(state.token_expiry_time, Some(macros::datetime!(2025-01-01 01:00 UTC)));
		assert_eq!(store.authorization_code(), Some(&TokenSecret::new("code-1")));
		assert_eq!(store.auth_state(), AuthState::Authenticated);
	}

	#[test]
	fn apply_without_refresh_token_keeps_previous_one() {
		let store = CredentialStore::from_params(params().with_refresh_token("refresh-0"));

		store.apply(&issued("access-1", None));

		assert_eq!(store.refresh_token(), Some(TokenSecret::new("refresh-0")));
		assert_eq!(store.access_token(), Some(TokenSecret::new("access-1")));
	}

	#[test]
	fn expires_at_does_not_overflow() {
		let mut tokens = issued("access-1", None);

		assert_eq!(tokens.expires_at(), Some(macros::datetime!(2025-01-01 01:00 UTC)));

		tokens.expires_in = Duration::MAX;

		assert_eq!(tokens.expires_at(), None);
	}

	#[test]
	fn needs_refresh_honours_window() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let mut state = TokenState {
			base_url: String::new(),
			access_token: Some(TokenSecret::new("a")),
			refresh_token: None,
			token_expiry_time: Some(now + Duration::minutes(10)),
		};

		assert!(!state.needs_refresh_at(now, Duration::minutes(5)));
		assert!(state.needs_refresh_at(now, Duration::minutes(10)));
		assert!(!state.is_expired_at(now));
		assert!(state.is_expired_at(now + Duration::minutes(10)));

		state.token_expiry_time = None;

		assert!(!state.needs_refresh_at(now, Duration::hours(1)));

		state.access_token = None;

		assert!(state.needs_refresh_at(now, Duration::ZERO));
	}

	#[test]
	fn debug_output_redacts_tokens() {
		let store = CredentialStore::from_params(params().with_refresh_token("refresh-secret"));
		let rendered = format!("{store:?}");

		assert!(!rendered.contains("refresh-secret"));
		assert!(!rendered.contains("code-1"));
		assert!(!rendered.contains("\"secret\""));
	}
}
