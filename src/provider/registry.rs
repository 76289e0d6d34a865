//! Immutable provider-to-client registration map.

// self
use crate::{
	_prelude::*,
	auth::Provider,
	config::IdentityConfig,
	error::ConfigError,
	http::HttpTransport,
	oauth::OAuth2Client,
	provider::{ProviderClient, ProviderDescriptor},
};

/// Fixed mapping from [`Provider`] to its client, built once and shared read-only.
#[derive(Clone, Default)]
pub struct ProviderRegistry(Arc<HashMap<Provider, Arc<dyn ProviderClient>>>);
impl ProviderRegistry {
	/// Starts an empty registration.
	pub fn builder() -> ProviderRegistryBuilder {
		ProviderRegistryBuilder::default()
	}

	/// Registers an [`OAuth2Client`] for every provider configured in `config`.
	///
	/// Each provider uses its well-known descriptor; all clients share `transport`.
	pub fn from_config<T>(config: &IdentityConfig, transport: Arc<T>) -> Result<Self>
	where
		T: HttpTransport,
	{
		let mut builder = Self::builder();

		for (provider, provider_config) in config.configured() {
			let descriptor = ProviderDescriptor::well_known(provider).map_err(ConfigError::from)?;
			let client = OAuth2Client::<T>::new(descriptor, provider_config, transport.clone())?;

			builder = builder.register(client);
		}

		Ok(builder.build())
	}

	/// Returns the client registered for `provider`, if any.
	pub fn get(&self, provider: Provider) -> Option<&dyn ProviderClient> {
		self.0.get(&provider).map(Arc::as_ref)
	}

	/// Returns `true` when a client is registered for `provider`.
	pub fn contains(&self, provider: Provider) -> bool {
		self.0.contains_key(&provider)
	}

	/// Registered providers in declaration order.
	pub fn providers(&self) -> Vec<Provider> {
		Provider::ALL.into_iter().filter(|provider| self.contains(*provider)).collect()
	}
}
impl Debug for ProviderRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ProviderRegistry").field(&self.providers()).finish()
	}
}

/// Builder for [`ProviderRegistry`]; a later registration for the same provider wins.
#[derive(Default)]
pub struct ProviderRegistryBuilder {
	clients: HashMap<Provider, Arc<dyn ProviderClient>>,
}
impl ProviderRegistryBuilder {
	/// Registers `client` under the provider it reports.
	pub fn register(self, client: impl 'static + ProviderClient) -> Self {
		self.register_shared(Arc::new(client))
	}

	/// Registers an already shared client under the provider it reports.
	pub fn register_shared(mut self, client: Arc<dyn ProviderClient>) -> Self {
		self.clients.insert(client.provider(), client);

		self
	}

	/// Freezes the registration.
	pub fn build(self) -> ProviderRegistry {
		ProviderRegistry(Arc::new(self.clients))
	}
}
impl Debug for ProviderRegistryBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderRegistryBuilder").field("len", &self.clients.len()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::StubProviderClient;

	#[test]
	fn lookup_only_finds_registered_providers() {
		let registry = ProviderRegistry::builder()
			.register(StubProviderClient::new(Provider::Google, "x@x.x", "access"))
			.build();

		assert!(registry.contains(Provider::Google));
		assert!(registry.get(Provider::GitHub).is_none());
		assert_eq!(registry.providers(), vec![Provider::Google]);
		assert_eq!(
			registry.get(Provider::Google).map(|client| client.provider()),
			Some(Provider::Google)
		);
	}

	#[test]
	fn later_registration_replaces_earlier_one() {
		let registry = ProviderRegistry::builder()
			.register(StubProviderClient::new(Provider::GitHub, "a@x.x", "first"))
			.register(StubProviderClient::new(Provider::GitHub, "b@x.x", "second"))
			.build();

		assert_eq!(registry.providers(), vec![Provider::GitHub]);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn from_config_skips_unconfigured_providers() {
		let config = IdentityConfig::from_lookup(|key| match key {
			"GITHUB_OAUTH2_CLIENT_ID" => Some("id".into()),
			"GITHUB_OAUTH2_CLIENT_SECRET" => Some("secret".into()),
			"GITHUB_OAUTH2_REDIRECT_URL" => Some("https://app.example.com/oauth/github/callback".into()),
			_ => None,
		})
		.expect("GitHub-only configuration should load.");
		let transport = Arc::new(
			crate::http::ReqwestTransport::new(std::time::Duration::from_secs(5))
				.expect("Transport should build."),
		);
		let registry = ProviderRegistry::from_config(&config, transport)
			.expect("Registry should build from a valid configuration.");

		assert_eq!(registry.providers(), vec![Provider::GitHub]);
	}
}
