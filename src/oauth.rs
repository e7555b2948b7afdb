//! OAuth facade over the `oauth2` crate for JobAdder token exchanges.
//!
//! Grant requests are form-encoded by `oauth2` (client credentials travel in the request
//! body) and the JobAdder-specific `api` field is decoded as an extra token field. Errors
//! are folded into the crate taxonomy using the response metadata recorded by the
//! transport: any non-200 answer becomes an [`AuthenticationError`] carrying the raw body.

pub use oauth2;

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AuthType, AuthorizationCode, Client, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	ExtraTokenFields, HttpClientError, RedirectUrl, RefreshToken, RequestTokenError,
	StandardRevocableToken, StandardTokenResponse, TokenResponse, TokenUrl,
	basic::{
		BasicErrorResponse, BasicRequestTokenError, BasicRevocationErrorResponse,
		BasicTokenIntrospectionResponse, BasicTokenType,
	},
};
// self
use crate::{
	_prelude::*,
	auth::{CredentialStore, IssuedTokens, TokenGrant, TokenSecret},
	error::{AuthenticationError, ConfigError, ResponseParseError, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
};

/// Non-standard fields JobAdder adds to its token response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAdderTokenFields {
	/// Tenant-specific API base URL.
	pub api: String,
}
impl ExtraTokenFields for JobAdderTokenFields {}

/// Token response document returned by the JobAdder token endpoint.
pub type JobAdderTokenResponse = StandardTokenResponse<JobAdderTokenFields, BasicTokenType>;

type ConfiguredClient = Client<
	BasicErrorResponse,
	JobAdderTokenResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointSet,
>;

/// One-shot exchange bound to a credential store's client configuration.
pub(crate) struct TokenExchange<C>
where
	C: ?Sized + TokenHttpClient,
{
	oauth_client: ConfiguredClient,
	http_client: Arc<C>,
}
impl<C> TokenExchange<C>
where
	C: ?Sized + TokenHttpClient,
{
	pub(crate) fn from_store(store: &CredentialStore, http_client: Arc<C>) -> Result<Self> {
		let token_url = TokenUrl::new(store.token_endpoint().to_owned())
			.map_err(|source| ConfigError::InvalidTokenEndpoint { source })?;
		let oauth_client = Client::new(ClientId::new(store.client_id().to_owned()))
			.set_client_secret(ClientSecret::new(store.client_secret().expose().to_owned()))
			.set_auth_type(AuthType::RequestBody)
			.set_token_uri(token_url);

		Ok(Self { oauth_client, http_client })
	}

	/// Performs the exchange for `grant` and returns the issued token material.
	pub(crate) async fn exchange(&self, grant: &TokenGrant) -> Result<IssuedTokens> {
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let response = match grant {
			TokenGrant::AuthorizationCode { code, redirect_uri } => {
				let mut request = self
					.oauth_client
					.exchange_code(AuthorizationCode::new(code.expose().to_owned()));

				if let Some(uri) = redirect_uri {
					let redirect_url = RedirectUrl::new(uri.to_owned())
						.map_err(|source| ConfigError::InvalidRedirect { source })?;

					request = request.set_redirect_uri(Cow::Owned(redirect_url));
				}

				request.request_async(&handle).await
			},
			TokenGrant::RefreshToken { refresh_token } => {
				let secret = RefreshToken::new(refresh_token.expose().to_owned());

				self.oauth_client.exchange_refresh_token(&secret).request_async(&handle).await
			},
		}
		.map_err(|err| map_request_error(meta.take(), err))?;

		map_token_response(response)
	}
}

fn map_token_response(response: JobAdderTokenResponse) -> Result<IssuedTokens> {
	let expires_in =
		response.expires_in().ok_or(ResponseParseError::MissingExpiresIn)?.as_secs();
	let expires_in =
		i64::try_from(expires_in).map_err(|_| ResponseParseError::ExpiresInOutOfRange)?;
	let expires_in = Duration::seconds(expires_in);
	let issued_at = OffsetDateTime::now_utc();

	issued_at.checked_add(expires_in).ok_or(ResponseParseError::ExpiresInOutOfRange)?;

	Ok(IssuedTokens {
		access_token: TokenSecret::new(response.access_token().secret().to_owned()),
		refresh_token: response
			.refresh_token()
			.map(|token| TokenSecret::new(token.secret().to_owned())),
		token_type: response.token_type().as_ref().to_owned(),
		expires_in,
		api: response.extra_fields().api.clone(),
		issued_at,
	})
}

fn map_request_error<E>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	if let Some(meta) = meta.filter(ResponseMetadata::is_rejection) {
		let body = match (meta.error_body, &err) {
			(Some(body), _) => body,
			(None, RequestTokenError::Parse(_, raw)) => String::from_utf8_lossy(raw).into_owned(),
			(None, RequestTokenError::ServerResponse(response)) => server_response_text(response),
			(None, _) => String::new(),
		};

		return AuthenticationError::new(meta.status, body).into();
	}

	match err {
		RequestTokenError::ServerResponse(response) =>
			AuthenticationError::new(None, server_response_text(&response)).into(),
		RequestTokenError::Request(error) => map_transport_error(error),
		RequestTokenError::Parse(source, _body) => ResponseParseError::Json { source }.into(),
		RequestTokenError::Other(message) => ResponseParseError::Unexpected { message }.into(),
	}
}

fn server_response_text(response: &BasicErrorResponse) -> String {
	serde_json::to_string(response).unwrap_or_else(|_| response.error().as_ref().to_owned())
}

fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		other => TransportError::Other { message: format!("{other:?}") }.into(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{config::ClientParams, http::ReqwestHttpClient};

	#[test]
	fn builds_exchange_for_default_endpoint() {
		let store = CredentialStore::from_params(ClientParams::new(
			"https://api.jobadder.com/v2",
			"client-id",
			"secret",
		));
		let result = TokenExchange::from_store(&store, Arc::new(ReqwestHttpClient::default()));

		assert!(result.is_ok());
	}

	#[test]
	fn rejects_invalid_token_endpoint() {
		let store = CredentialStore::from_params(
			ClientParams::new("https://api.jobadder.com/v2", "client-id", "secret")
				.with_token_endpoint("not a url"),
		);
		let result = TokenExchange::from_store(&store, Arc::new(ReqwestHttpClient::default()));

		assert!(matches!(
			result,
			Err(Error::Config(ConfigError::InvalidTokenEndpoint { .. }))
		));
	}

	#[test]
	fn token_response_decodes_api_field() {
		let response: JobAdderTokenResponse = serde_json::from_str(
			"{\"access_token\":\"A1\",\"refresh_token\":\"R1\",\"token_type\":\"Bearer\",\"expires_in\":3600,\"api\":\"https://api.example/v2\"}",
		)
		.expect("JobAdder token response should deserialize.");
		let issued = map_token_response(response).expect("Token response should map.");

		assert_eq!(issued.access_token.expose(), "A1");
		assert_eq!(issued.refresh_token.as_ref().map(TokenSecret::expose), Some("R1"));
		assert_eq!(issued.api, "https://api.example/v2");
		assert_eq!(issued.expires_in, Duration::hours(1));
		assert_eq!(issued.token_type, "bearer");
	}

	#[test]
	fn token_response_without_expiry_is_a_parse_error() {
		let response: JobAdderTokenResponse = serde_json::from_str(
			"{\"access_token\":\"A1\",\"refresh_token\":\"R1\",\"token_type\":\"Bearer\",\"api\":\"https://api.example/v2\"}",
		)
		.expect("Token response without expires_in should deserialize.");
		let err = map_token_response(response).expect_err("Missing expires_in must be rejected.");

		assert!(matches!(err, Error::ResponseParse(ResponseParseError::MissingExpiresIn)));
	}

	#[test]
	fn rejection_metadata_wins_over_parse_errors() {
		let source = serde_path_to_error::deserialize::<_, BasicErrorResponse>(
			&mut serde_json::Deserializer::from_str("invalid_grant"),
		)
		.expect_err("Plain text is not a JSON error document.");
		let err: BasicRequestTokenError<HttpClientError<std::io::Error>> =
			RequestTokenError::Parse(source, b"invalid_grant".to_vec());
		let meta = ResponseMetadata { status: Some(400), error_body: Some("invalid_grant".into()) };
		let mapped = map_request_error(Some(meta), err);

		match mapped {
			Error::Authentication(auth) => {
				assert_eq!(auth.status, Some(400));
				assert_eq!(auth.to_string(), "invalid_grant");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
