//! Provider tags, access tokens, and the account details providers report.

// self
use crate::_prelude::*;

/// Closed set of OAuth 2.0 identity providers a token can be issued by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
	/// Google accounts.
	Google,
	/// GitHub accounts.
	GitHub,
}
impl Provider {
	/// Every supported provider, in registration order.
	pub const ALL: [Provider; 2] = [Provider::Google, Provider::GitHub];

	/// Returns a stable lowercase label suitable for routes, logs, and env prefixes.
	pub const fn as_str(self) -> &'static str {
		match self {
			Provider::Google => "google",
			Provider::GitHub => "github",
		}
	}
}
impl Display for Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Provider {
	type Err = UnknownProvider;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Provider::ALL
			.into_iter()
			.find(|provider| provider.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| UnknownProvider(s.to_owned()))
	}
}

/// Error returned when a provider label does not name a supported provider.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown OAuth 2.0 provider `{0}`.")]
pub struct UnknownProvider(pub String);

/// Opaque access credential; formatting never reveals the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a credential string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw credential. Callers must keep it out of logs.
	pub fn secret(&self) -> &str {
		&self.0
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("AccessToken(<redacted>)")
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Access token tagged with the provider that issued it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
	/// Credential returned by the provider's token endpoint.
	pub access_token: AccessToken,
	/// Issuer of the credential.
	pub provider: Provider,
}
impl Token {
	/// Tags `access_token` with its issuer.
	pub fn new(access_token: AccessToken, provider: Provider) -> Self {
		Self { access_token, provider }
	}
}

/// Account details returned by a provider's user-info endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
	/// Email address of the signed-in account; empty when the provider withholds it.
	pub email: String,
}
