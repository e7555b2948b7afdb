//! Authenticated transport for the JobAdder REST API.
//!
//! [`ApiClient`] resolves paths against the tenant base URL and runs every registered
//! [`RequestEditor`] on each outgoing request, in registration order. The resource bindings
//! themselves live outside this crate and only need a request builder to work with.

pub mod editor;

pub use editor::*;

// crates.io
use reqwest::{Method, RequestBuilder, Response};
// self
use crate::{
	_prelude::*,
	error::{ApiClientError, TransportError},
};

/// HTTP client bound to a JobAdder API base URL.
#[derive(Clone)]
pub struct ApiClient {
	base_url: Url,
	http: ReqwestClient,
	editors: Vec<Arc<dyn RequestEditor>>,
}
impl ApiClient {
	/// Builds a client with a fresh reqwest transport.
	pub fn new(base_url: &str) -> Result<Self> {
		let http = ReqwestClient::builder()
			.build()
			.map_err(|source| ApiClientError::HttpClientBuild { source })?;

		Self::with_client(base_url, http)
	}

	/// Builds a client on top of an existing reqwest transport.
	pub fn with_client(base_url: &str, http: ReqwestClient) -> Result<Self> {
		Ok(Self { base_url: parse_base_url(base_url)?, http, editors: Vec::new() })
	}

	/// Appends an editor that runs on every request.
	pub fn with_request_editor(mut self, editor: impl 'static + RequestEditor) -> Self {
		self.editors.push(Arc::new(editor));

		self
	}

	/// Base URL every path is resolved against. Always ends with `/`.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Resolves `path` against the base URL, keeping the base path prefix.
	pub fn url(&self, path: &str) -> Result<Url> {
		self.base_url.join(path.trim_start_matches('/')).map_err(|source| {
			ApiClientError::InvalidPath { path: path.to_owned(), source }.into()
		})
	}

	/// Starts a request and applies every editor.
	///
	/// Editors run here, so values they read (such as the access token) are taken at the
	/// moment the request is built.
	pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
		let url = self.url(path)?;

		self.editors
			.iter()
			.try_fold(self.http.request(method, url), |request, editor| editor.edit(request))
	}

	/// Starts a `GET` request.
	pub fn get(&self, path: &str) -> Result<RequestBuilder> {
		self.request(Method::GET, path)
	}

	/// Starts a `POST` request.
	pub fn post(&self, path: &str) -> Result<RequestBuilder> {
		self.request(Method::POST, path)
	}

	/// Starts a `PUT` request.
	pub fn put(&self, path: &str) -> Result<RequestBuilder> {
		self.request(Method::PUT, path)
	}

	/// Starts a `PATCH` request.
	pub fn patch(&self, path: &str) -> Result<RequestBuilder> {
		self.request(Method::PATCH, path)
	}

	/// Starts a `DELETE` request.
	pub fn delete(&self, path: &str) -> Result<RequestBuilder> {
		self.request(Method::DELETE, path)
	}

	/// Sends a prepared request. Non-2xx responses are returned as-is.
	pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
		request.send().await.map_err(|e| TransportError::api(e).into())
	}
}
impl Debug for ApiClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.base_url.as_str())
			.field("editors", &self.editors.iter().map(|e| e.name()).collect::<Vec<_>>())
			.finish()
	}
}

fn parse_base_url(raw: &str) -> Result<Url, ApiClientError> {
	let invalid = |source| ApiClientError::InvalidBaseUrl { url: raw.to_owned(), source };
	let mut url = Url::parse(raw).map_err(invalid)?;

	if url.cannot_be_a_base() {
		return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn base_url_keeps_version_prefix() {
		let client = ApiClient::new("https://api.jobadder.com/v2").expect("Client should build.");

		assert_eq!(client.base_url().as_str(), "https://api.jobadder.com/v2/");
		assert_eq!(
			client.url("/candidates/42").expect("Path should resolve.").as_str(),
			"https://api.jobadder.com/v2/candidates/42"
		);
		assert_eq!(
			client.url("jobs?offset=10").expect("Path should resolve.").as_str(),
			"https://api.jobadder.com/v2/jobs?offset=10"
		);
	}

	#[test]
	fn invalid_base_urls_fail_construction() {
		for raw in ["", "not a url", "mailto:ops@example.com"] {
			let err = ApiClient::new(raw).expect_err("Invalid base URL must be rejected.");

			assert!(
				matches!(err, Error::ApiClient(ApiClientError::InvalidBaseUrl { .. })),
				"Unexpected error for {raw:?}: {err:?}."
			);
		}
	}

	#[test]
	fn editors_run_in_registration_order() {
		let client = ApiClient::new("https://api.jobadder.com/v2")
			.expect("Client should build.")
			.with_request_editor(|request: RequestBuilder| -> Result<RequestBuilder> {
				Ok(request.header("x-step", "one"))
			})
			.with_request_editor(|request: RequestBuilder| -> Result<RequestBuilder> {
				Ok(request.header("x-step", "two"))
			});
		let request = client
			.get("contacts")
			.expect("Request should be prepared.")
			.build()
			.expect("Request should build.");
		let steps: Vec<_> = request
			.headers()
			.get_all("x-step")
			.iter()
			.map(|value| value.to_str().expect("Header should be ASCII."))
			.collect();

		assert_eq!(steps, ["one", "two"]);
		assert_eq!(request.method(), Method::GET);
	}

	#[test]
	fn failing_editor_aborts_the_request() {
		let client = ApiClient::new("https://api.jobadder.com/v2")
			.expect("Client should build.")
			.with_request_editor(|_: RequestBuilder| -> Result<RequestBuilder> {
				Err(ApiClientError::request_editor(
					"tenant_header",
					std::io::Error::other("tenant is not configured"),
				)
				.into())
			});
		let err = client.delete("jobs/1").expect_err("Editor failure should surface.");

		assert!(matches!(
			err,
			Error::ApiClient(ApiClientError::RequestEditor { editor: "tenant_header", .. })
		));
	}
}
