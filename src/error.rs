//! Client-level error types shared by the authenticator, transports, and the API client.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) while calling the token endpoint or the API.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint rejected the exchange.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Token endpoint answered 200 with a body that could not be parsed.
	#[error(transparent)]
	ResponseParse(#[from] ResponseParseError),
	/// Downstream API client could not be built or could not prepare a request.
	#[error(transparent)]
	ApiClient(#[from] ApiClientError),
}
impl Error {
	/// Returns the authentication failure, if this error is one.
	pub fn as_authentication(&self) -> Option<&AuthenticationError> {
		match self {
			Self::Authentication(e) => Some(e),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised before any exchange leaves the process.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Token endpoint cannot be parsed.
	#[error("Token endpoint is invalid.")]
	InvalidTokenEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},

	/// The authorization code grant was selected but no code is configured.
	#[error("No authorization code is configured for the authorization_code grant.")]
	MissingAuthorizationCode,
	/// The refresh grant was selected but the store holds no refresh token.
	#[error("Credential store is missing a refresh token.")]
	MissingRefreshToken,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {target}.")]
	Network {
		/// Which remote the request was addressed to.
		target: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// HTTP client failure without a structured source.
	#[error("HTTP client error occurred while calling the token endpoint: {message}.")]
	Other {
		/// Message reported by the HTTP client.
		message: String,
	},
}
impl TransportError {
	/// Wraps a token-endpoint network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { target: "the token endpoint", source: Box::new(src) }
	}

	/// Wraps a network error raised by a downstream API call.
	pub fn api(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { target: "the JobAdder API", source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Non-200 answer from the token endpoint.
///
/// The display form is the raw response body, exactly as the provider sent it.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{body}")]
pub struct AuthenticationError {
	/// HTTP status code returned by the token endpoint, when the transport recorded it.
	pub status: Option<u16>,
	/// Raw response body.
	pub body: String,
}
impl AuthenticationError {
	/// Creates a new authentication error from a status and raw body.
	pub fn new(status: impl Into<Option<u16>>, body: impl Into<String>) -> Self {
		Self { status: status.into(), body: body.into() }
	}

	/// Classifies the body into a well-known OAuth 2.0 error code, if it carries one.
	///
	/// JSON bodies are read through their `error` field; anything else is matched as text.
	pub fn oauth_error(&self) -> Option<OAuthErrorCode> {
		#[derive(Deserialize)]
		struct ErrorBody {
			error: String,
		}

		if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&self.body) {
			return OAuthErrorCode::from_code(&parsed.error);
		}
		if let Ok(text) = serde_json::from_str::<String>(&self.body) {
			return OAuthErrorCode::from_code(&text).or_else(|| OAuthErrorCode::scan(&text));
		}

		OAuthErrorCode::from_code(&self.body).or_else(|| OAuthErrorCode::scan(&self.body))
	}
}

/// OAuth 2.0 token endpoint error codes (RFC 6749 section 5.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OAuthErrorCode {
	/// Request is missing a parameter or is otherwise malformed.
	InvalidRequest,
	/// Client authentication failed.
	InvalidClient,
	/// Authorization code or refresh token is invalid, expired, or revoked.
	InvalidGrant,
	/// Client is not allowed to use this grant.
	UnauthorizedClient,
	/// Grant type is not supported by the server.
	UnsupportedGrantType,
	/// Requested scope is invalid or exceeds the granted scope.
	InvalidScope,
}
impl OAuthErrorCode {
	const ALL: [Self; 6] = [
		Self::InvalidGrant,
		Self::InvalidClient,
		Self::UnauthorizedClient,
		Self::UnsupportedGrantType,
		Self::InvalidScope,
		Self::InvalidRequest,
	];

	/// Returns the RFC 6749 identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::InvalidRequest => "invalid_request",
			Self::InvalidClient => "invalid_client",
			Self::InvalidGrant => "invalid_grant",
			Self::UnauthorizedClient => "unauthorized_client",
			Self::UnsupportedGrantType => "unsupported_grant_type",
			Self::InvalidScope => "invalid_scope",
		}
	}

	/// Parses an exact (case-insensitive, whitespace-trimmed) error code.
	pub fn from_code(code: &str) -> Option<Self> {
		let code = code.trim();

		Self::ALL.into_iter().find(|kind| kind.as_str().eq_ignore_ascii_case(code))
	}

	fn scan(text: &str) -> Option<Self> {
		let lowered = text.to_ascii_lowercase();

		Self::ALL.into_iter().find(|kind| lowered.contains(kind.as_str()))
	}
}
impl Display for OAuthErrorCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Successful (200) token responses that could not be decoded.
#[derive(Debug, ThisError)]
pub enum ResponseParseError {
	/// Body is not a valid token response document.
	#[error("Token endpoint returned malformed JSON.")]
	Json {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Body could not be interpreted at all (empty or non-JSON content type).
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Unexpected {
		/// Description reported by the OAuth layer.
		message: String,
	},
	/// Token response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token response carried an `expires_in` too large to turn into an expiry instant.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}

/// Failures building or driving the downstream API client.
#[derive(Debug, ThisError)]
pub enum ApiClientError {
	/// Base URL returned by the token endpoint (or supplied by the caller) is invalid.
	#[error("API base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request path could not be joined onto the base URL.
	#[error("API path `{path}` cannot be joined onto the base URL.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Underlying reqwest client could not be constructed.
	#[error("API HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying builder failure.
		#[source]
		source: ReqwestError,
	},
	/// The credential store holds no access token to attach.
	#[error("No access token is available for the Authorization header.")]
	MissingAccessToken,
	/// A request editor rejected the outgoing request.
	#[error("Request editor `{editor}` failed.")]
	RequestEditor {
		/// Editor name.
		editor: &'static str,
		/// Editor-specific failure.
		#[source]
		source: BoxError,
	},
}
impl ApiClientError {
	/// Wraps a failure raised by the named request editor.
	pub fn request_editor(
		editor: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::RequestEditor { editor, source: Box::new(src) }
	}
}
