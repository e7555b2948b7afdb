//! Top-level JobAdder session: one credential store, one authenticator, one API client.
//!
//! Construction runs the first token exchange. When it fails the error is returned and no
//! client exists, so a half-initialized session can never reach the API.

// self
use crate::{
	_prelude::*,
	api::{ApiClient, BearerAuth},
	auth::{CredentialStore, TokenState},
	authenticator::Authenticator,
	config::ClientParams,
	error::{ApiClientError, ConfigError},
	http::{ReqwestHttpClient, TokenHttpClient},
};

/// Authenticated JobAdder client.
///
/// Every request issued through [`api`](Self::api) carries `Authorization: Bearer <token>`
/// read from the shared credential store at the time the request is built.
pub struct JobAdderClient<C = ReqwestHttpClient>
where
	C: ?Sized + TokenHttpClient,
{
	/// Downstream API client bound to the tenant base URL returned by the first exchange.
	pub api: ApiClient,
	authenticator: Authenticator<C>,
}
impl JobAdderClient<ReqwestHttpClient> {
	/// Creates a session with default reqwest transports and authenticates it.
	pub async fn new(params: ClientParams) -> Result<Self> {
		let token_http = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;
		let api_http = ReqwestClient::builder()
			.build()
			.map_err(|source| ApiClientError::HttpClientBuild { source })?;

		Self::with_http_clients(params, ReqwestHttpClient::with_client(token_http), api_http).await
	}
}
impl<C> JobAdderClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a session on caller-provided transports and authenticates it.
	///
	/// `token_http` carries the token exchanges and `api_http` carries the API calls.
	pub async fn with_http_clients(
		params: ClientParams,
		token_http: impl Into<Arc<C>>,
		api_http: ReqwestClient,
	) -> Result<Self> {
		let store = Arc::new(CredentialStore::from_params(params));
		let authenticator = Authenticator::with_http_client(store.clone(), token_http);

		authenticator.authenticate().await?;

		let api = ApiClient::with_client(&store.base_url(), api_http)?
			.with_request_editor(BearerAuth::new(store));

		#[cfg(feature = "tracing")]
		tracing::info!(base_url = api.base_url().as_str(), "JobAdder client initialized");

		Ok(Self { api, authenticator })
	}

	/// Runs a token exchange (refresh-token grant once tokens are held).
	pub async fn authenticate(&self) -> Result<TokenState> {
		self.authenticator.authenticate().await
	}

	/// Forces a refresh and returns the new state.
	pub async fn refresh_token(&self) -> Result<TokenState> {
		self.authenticator.refresh_token().await
	}

	/// Refreshes only when the access token expires within `window`.
	pub async fn ensure_fresh(&self, window: Duration) -> Result<bool> {
		self.authenticator.ensure_fresh(window).await
	}

	/// Shared credential store backing this session.
	pub fn credentials(&self) -> &Arc<CredentialStore> {
		&self.authenticator.store
	}

	/// Authenticator driving token exchanges for this session.
	pub fn authenticator(&self) -> &Authenticator<C> {
		&self.authenticator
	}
}
impl<C> Clone for JobAdderClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self { api: self.api.clone(), authenticator: self.authenticator.clone() }
	}
}
impl<C> Debug for JobAdderClient<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("JobAdderClient")
			.field("api", &self.api)
			.field("authenticator", &self.authenticator)
			.finish()
	}
}
