//! Doubles shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// self
use counters::{
	auth::{AccessToken, Provider, Token, UserInfo},
	error::Error,
	provider::{ProviderClient, ProviderFuture, ProviderRegistry},
	url::Url,
};

pub const STATE: &str = "fixed-state";

/// Provider client that accepts [`STATE`] plus any non-empty code and reports a fixed email.
#[derive(Debug)]
pub struct FakeProviderClient {
	pub provider: Provider,
	pub email: String,
	pub access_token: String,
	pub calls: AtomicUsize,
}
impl FakeProviderClient {
	pub fn new(provider: Provider, email: &str, access_token: &str) -> Self {
		Self {
			provider,
			email: email.into(),
			access_token: access_token.into(),
			calls: AtomicUsize::new(0),
		}
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl ProviderClient for FakeProviderClient {
	fn provider(&self) -> Provider {
		self.provider
	}

	fn auth_url(&self) -> Url {
		let mut url = Url::parse(&format!("https://{}.example.com/authorize", self.provider))
			.expect("Fake authorization URL should parse.");

		url.query_pairs_mut().append_pair("state", STATE);

		url
	}

	fn exchange<'a>(&'a self, state: &'a str, code: &'a str) -> ProviderFuture<'a, Token> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if state != STATE {
				return Err(Error::InvalidState);
			}
			if code.is_empty() {
				return Err(Error::InvalidCode);
			}

			Ok(Token::new(AccessToken::new(self.access_token.clone()), self.provider))
		})
	}

	fn user_info<'a>(&'a self, _token: &'a Token) -> ProviderFuture<'a, UserInfo> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Ok(UserInfo { email: self.email.clone() }) })
	}
}

pub fn registry(clients: impl IntoIterator<Item = FakeProviderClient>) -> ProviderRegistry {
	clients.into_iter().fold(ProviderRegistry::builder(), |builder, c| builder.register(c)).build()
}

pub fn shared_registry(clients: &[Arc<FakeProviderClient>]) -> ProviderRegistry {
	clients
		.iter()
		.fold(ProviderRegistry::builder(), |builder, c| builder.register_shared(c.clone()))
		.build()
}
