//! Provider credentials and the env-style loader that assembles them.

// self
use crate::{_prelude::*, auth::Provider, error::ConfigError};

/// Credentials and redirect settings for one OAuth 2.0 provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
	/// Client identifier issued by the provider.
	pub client_id: String,
	/// Client secret issued by the provider.
	pub client_secret: String,
	/// Callback URL the provider redirects to after consent.
	pub redirect_url: Url,
	/// Scopes requested on the authorization URL.
	#[serde(default)]
	pub scopes: Vec<String>,
}
impl ProviderConfig {
	/// Reads `{prefix}_OAUTH2_CLIENT_ID`, `_CLIENT_SECRET`, `_REDIRECT_URL`, and `_SCOPES`.
	///
	/// Returns `Ok(None)` unless both the client id and secret are present. Once they are, the
	/// redirect URL is required; scopes are comma-separated and optional. Blank values count as
	/// absent.
	pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Option<Self>>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |suffix: &str| {
			let key = format!("{prefix}_OAUTH2_{suffix}");
			let value = lookup(&key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

			(key, value)
		};
		let (Some(client_id), Some(client_secret)) = (read("CLIENT_ID").1, read("CLIENT_SECRET").1)
		else {
			return Ok(None);
		};
		let redirect_url = match read("REDIRECT_URL") {
			(_, Some(raw)) =>
				Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { source })?,
			(key, None) => return Err(ConfigError::Missing { key }.into()),
		};
		let scopes = read("SCOPES")
			.1
			.map(|raw| {
				raw.split(',')
					.map(str::trim)
					.filter(|scope| !scope.is_empty())
					.map(ToOwned::to_owned)
					.collect()
			})
			.unwrap_or_default();

		Ok(Some(Self { client_id, client_secret, redirect_url, scopes }))
	}
}
impl Debug for ProviderConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("redirect_url", &self.redirect_url.as_str())
			.field("scopes", &self.scopes)
			.finish()
	}
}

/// Per-provider configuration for the identity manager; unset providers stay unregistered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
	/// Google credentials.
	#[serde(default)]
	pub google: Option<ProviderConfig>,
	/// GitHub credentials.
	#[serde(default)]
	pub github: Option<ProviderConfig>,
}
impl IdentityConfig {
	/// Loads every provider from the process environment (`GOOGLE_OAUTH2_*`, `GITHUB_OAUTH2_*`).
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Loads every provider through `lookup`, using the upper-cased provider label as prefix.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let load = |provider: Provider| {
			ProviderConfig::from_lookup(&provider.as_str().to_ascii_uppercase(), &lookup)
		};

		Ok(Self { google: load(Provider::Google)?, github: load(Provider::GitHub)? })
	}

	/// Returns the configuration for `provider`, if set.
	pub fn get(&self, provider: Provider) -> Option<&ProviderConfig> {
		match provider {
			Provider::Google => self.google.as_ref(),
			Provider::GitHub => self.github.as_ref(),
		}
	}

	/// Iterates over configured providers in declaration order.
	pub fn configured(&self) -> impl Iterator<Item = (Provider, &ProviderConfig)> {
		Provider::ALL
			.into_iter()
			.filter_map(move |provider| self.get(provider).map(|config| (provider, config)))
	}
}
