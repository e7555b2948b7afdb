//! OAuth 2.0 grant selection types.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// OAuth 2.0 grant types used against the JobAdder identity provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Authorization Code grant, used once to open a session.
	AuthorizationCode,
	/// Refresh Token grant, used for every later exchange.
	RefreshToken,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::RefreshToken => "refresh_token",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved grant, carrying the secret the exchange will present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenGrant {
	/// Exchange a one-time authorization code.
	AuthorizationCode {
		/// Code returned by the consent redirect.
		code: TokenSecret,
		/// Redirect URI registered with the provider, sent back verbatim.
		redirect_uri: Option<String>,
	},
	/// Exchange the current refresh token.
	RefreshToken {
		/// Refresh token held by the credential store.
		refresh_token: TokenSecret,
	},
}
impl TokenGrant {
	/// Returns the grant type label for this grant.
	pub fn grant_type(&self) -> GrantType {
		match self {
			Self::AuthorizationCode { .. } => GrantType::AuthorizationCode,
			Self::RefreshToken { .. } => GrantType::RefreshToken,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn resolved_grants_report_their_type() {
		let code = TokenGrant::AuthorizationCode { code: TokenSecret::new("c"), redirect_uri: None };
		let refresh = TokenGrant::RefreshToken { refresh_token: TokenSecret::new("r") };

		assert_eq!(code.grant_type(), GrantType::AuthorizationCode);
		assert_eq!(refresh.grant_type().to_string(), "refresh_token");
	}
}
