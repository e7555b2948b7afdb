//! Token exchange orchestration against the JobAdder identity provider.
//!
//! [`Authenticator::authenticate`] picks the grant from the credential store (authorization
//! code while no tokens are held, refresh token afterwards), performs the exchange, and
//! writes the result back in one step. Exchanges are serialized through an async guard, so
//! concurrent refreshes run one after another and each presents the refresh token written
//! by the previous one. A failed exchange leaves the store untouched.
//!
//! Expiry is not checked on the request path. Callers that want a pre-flight check use
//! [`Authenticator::ensure_fresh`].

mod metrics;

pub use metrics::ExchangeMetrics;

// self
use crate::{
	_prelude::*,
	auth::{AuthState, CredentialStore, TokenGrant, TokenState},
	error::ConfigError,
	http::{ReqwestHttpClient, TokenHttpClient},
	oauth::TokenExchange,
	obs::{self, FlowOutcome, FlowSpan},
};

/// Performs OAuth 2.0 exchanges and keeps the shared [`CredentialStore`] current.
pub struct Authenticator<C = ReqwestHttpClient>
where
	C: ?Sized + TokenHttpClient,
{
	/// HTTP client wrapper used for every token request.
	pub http_client: Arc<C>,
	/// Credential store written by every successful exchange.
	pub store: Arc<CredentialStore>,
	/// In-process exchange counters.
	pub metrics: Arc<ExchangeMetrics>,
	exchange_guard: Arc<AsyncMutex<()>>,
}
impl<C> Authenticator<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates an authenticator that reuses the caller-provided transport.
	pub fn with_http_client(store: Arc<CredentialStore>, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			metrics: Default::default(),
			exchange_guard: Default::default(),
		}
	}

	/// Session state implied by the credential store.
	pub fn state(&self) -> AuthState {
		self.store.auth_state()
	}

	/// Runs one token exchange and returns the state it wrote.
	pub async fn authenticate(&self) -> Result<TokenState> {
		let _serialized = self.exchange_guard.lock().await;

		self.exchange("authenticate").await
	}

	/// Re-runs [`authenticate`](Self::authenticate).
	///
	/// With tokens in the store this is a refresh-token exchange; with an empty store it
	/// degenerates to an authorization-code exchange.
	pub async fn refresh_token(&self) -> Result<TokenState> {
		let _serialized = self.exchange_guard.lock().await;

		self.exchange("refresh_token").await
	}

	/// Refreshes only when the access token is missing or expires within `window`.
	///
	/// Returns `true` if an exchange ran. Callers waiting on an in-flight exchange re-check
	/// the store afterwards and skip the provider when it already produced a fresh token.
	pub async fn ensure_fresh(&self, window: Duration) -> Result<bool> {
		let _serialized = self.exchange_guard.lock().await;

		if !self.store.snapshot().needs_refresh_at(OffsetDateTime::now_utc(), window) {
			self.metrics.record_skip();

			return Ok(false);
		}

		self.exchange("ensure_fresh").await.map(|_| true)
	}

	async fn exchange(&self, stage: &'static str) -> Result<TokenState> {
		let selected = self.store.select_grant();
		let grant_type =
			selected.as_ref().map_or_else(|_| self.store.next_grant_type(), TokenGrant::grant_type);
		let span = FlowSpan::new(grant_type, stage);

		obs::record_flow_outcome(grant_type, FlowOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span
			.instrument(async {
				let grant = selected?;

				#[cfg(feature = "tracing")]
				tracing::debug!(flow = grant_type.as_str(), "selected token grant");

				let exchange = TokenExchange::from_store(&self.store, self.http_client.clone())?;
				let issued = exchange.exchange(&grant).await?;

				self.store.apply(&issued);

				Ok(self.store.snapshot())
			})
			.await;

		obs::log_flow_result(grant_type, &result);

		match &result {
			Ok(_) => {
				self.metrics.record_success();
				obs::record_flow_outcome(grant_type, FlowOutcome::Success);
			},
			Err(_) => {
				self.metrics.record_failure();
				obs::record_flow_outcome(grant_type, FlowOutcome::Failure);
			},
		}

		result
	}
}
impl Authenticator<ReqwestHttpClient> {
	/// Creates an authenticator with its own reqwest transport.
	///
	/// The transport does not follow redirects; token endpoints answer directly.
	pub fn new(store: Arc<CredentialStore>) -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;

		Ok(Self::with_http_client(store, ReqwestHttpClient::with_client(client)))
	}
}
impl<C> Clone for Authenticator<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			metrics: self.metrics.clone(),
			exchange_guard: self.exchange_guard.clone(),
		}
	}
}
impl<C> Debug for Authenticator<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("store", &self.store)
			.field("metrics", &self.metrics)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::ClientParams;

	#[tokio::test]
	async fn missing_code_fails_without_touching_the_store() {
		let store = Arc::new(CredentialStore::from_params(ClientParams::new(
			"https://api.jobadder.com/v2",
			"client",
			"secret",
		)));
		let authenticator =
			Authenticator::new(store.clone()).expect("Default transport should build.");
		let err = authenticator
			.authenticate()
			.await
			.expect_err("Authorization code exchange without a code must fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingAuthorizationCode)));
		assert_eq!(authenticator.state(), AuthState::Unauthenticated);
		assert_eq!(authenticator.metrics.attempts(), 1);
		assert_eq!(authenticator.metrics.failures(), 1);
		assert_eq!(store.snapshot().base_url, "https://api.jobadder.com/v2");
	}

	#[tokio::test]
	async fn ensure_fresh_skips_when_token_is_valid() {
		let store = Arc::new(CredentialStore::from_params(
			ClientParams::new("https://api.jobadder.com/v2", "client", "secret")
				.with_access_token("access")
				.with_refresh_token("refresh")
				.with_token_expiry_time(OffsetDateTime::now_utc() + Duration::hours(1)),
		));
		let authenticator = Authenticator::new(store).expect("Default transport should build.");
		let refreshed = authenticator
			.ensure_fresh(Duration::minutes(5))
			.await
			.expect("Fresh tokens should not trigger an exchange.");

		assert!(!refreshed);
		assert_eq!(authenticator.metrics.attempts(), 0);
		assert_eq!(authenticator.metrics.skipped(), 1);
	}
}
