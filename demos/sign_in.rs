//! Walks through one interactive sign-in: prints the provider's authorization URL, then reads
//! the redirect URL pasted back from the browser and completes the flow with its `state` and
//! `code`.
//!
//! ```text
//! GITHUB_OAUTH2_CLIENT_ID=.. GITHUB_OAUTH2_CLIENT_SECRET=.. \
//! GITHUB_OAUTH2_REDIRECT_URL=http://localhost:10000/callback \
//! cargo run --example sign_in -- github
//! ```

// std
use std::{env, io, sync::Arc, time::Duration};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use counters::{
	auth::Provider,
	config::IdentityConfig,
	http::ReqwestTransport,
	iam::IdentityManager,
	provider::ProviderRegistry,
	store::MemoryUserStore,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let provider = env::args()
		.nth(1)
		.ok_or_else(|| eyre!("Usage: sign_in <google|github>."))?
		.parse::<Provider>()?;
	let config = IdentityConfig::from_env()?;
	let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(10))?);
	let registry = ProviderRegistry::from_config(&config, transport)?;
	let users = Arc::new(MemoryUserStore::default());
	let manager = IdentityManager::new(users, registry);

	println!("Send your user to {}.", manager.oauth2_url(provider)?);
	println!("Paste the full redirect URL:");

	let mut line = String::new();

	io::stdin().read_line(&mut line)?;

	let redirect = Url::parse(line.trim())?;
	let param = |key: &str| {
		redirect
			.query_pairs()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.into_owned())
			.ok_or_else(|| eyre!("Redirect URL has no `{key}` parameter."))
	};
	let (state, code) = (param("state")?, param("code")?);
	let sign_in = manager.sign_in_with_oauth2(provider, &state, &code);
	let token = tokio::time::timeout(Duration::from_secs(30), sign_in).await??;

	println!("Signed in through {}; token {}.", token.provider, token.access_token);

	Ok(())
}
