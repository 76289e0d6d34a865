//! OAuth 2.0 sign-in orchestration.

// self
use crate::{
	_prelude::*,
	auth::{Provider, Token},
	iam::User,
	obs::{self, OpKind, OpOutcome, OpSpan},
	provider::{ProviderClient, ProviderRegistry},
	store::{CompareAndSwapOutcome, UserStore},
};

/// Last stage a sign-in attempt completed.
///
/// Sign-ins move strictly forward through these stages; a failure aborts the attempt and is
/// reported with the stage it had reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignInStage {
	/// Nothing has happened yet.
	Start,
	/// A client is registered for the provider.
	ProviderResolved,
	/// The authorization code was exchanged for a token.
	TokenExchanged,
	/// The provider reported the account's email.
	EmailResolved,
	/// The user was loaded or created in memory.
	UserResolved,
	/// The new token was merged into the user.
	TokenMerged,
	/// The user was written back to the store.
	Persisted,
}
impl SignInStage {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignInStage::Start => "start",
			SignInStage::ProviderResolved => "provider_resolved",
			SignInStage::TokenExchanged => "token_exchanged",
			SignInStage::EmailResolved => "email_resolved",
			SignInStage::UserResolved => "user_resolved",
			SignInStage::TokenMerged => "token_merged",
			SignInStage::Persisted => "persisted",
		}
	}
}
impl Display for SignInStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Maps provider accounts onto local [`User`] records.
///
/// The user store is written exactly once per successful sign-in, after the new token is merged,
/// through [`UserStore::compare_and_swap`]. A concurrent sign-in for the same email that lands
/// first makes the later one fail with [`Error::Conflict`]; callers may retry with a fresh code.
#[derive(Clone)]
pub struct IdentityManager {
	users: Arc<dyn UserStore>,
	providers: ProviderRegistry,
}
impl IdentityManager {
	/// Creates a manager over `users` that signs in through `providers`.
	pub fn new(users: Arc<dyn UserStore>, providers: ProviderRegistry) -> Self {
		Self { users, providers }
	}

	/// Returns the authorization URL of `provider`'s client.
	pub fn oauth2_url(&self, provider: Provider) -> Result<Url> {
		let kind = OpKind::OAuth2Url;
		let _span = OpSpan::new(kind, kind.as_str()).entered();

		obs::record_op_outcome(kind, OpOutcome::Attempt);

		let result = self.client(provider).map(|client| client.auth_url());

		obs::finish(kind, kind.as_str(), &result);

		result
	}

	/// Completes the authorization-code flow and returns the freshly issued token.
	///
	/// Domain failures from the provider (`InvalidState`, `InvalidCode`) and infrastructure
	/// failures from the provider or the store are returned unchanged. Nothing is persisted unless
	/// every stage succeeds. Dropping the returned future abandons any in-flight provider request.
	pub async fn sign_in_with_oauth2(
		&self,
		provider: Provider,
		state: &str,
		code: &str,
	) -> Result<Token> {
		let kind = OpKind::SignIn;
		let span = OpSpan::new(kind, kind.as_str());
		let mut stage = SignInStage::Start;

		obs::record_op_outcome(kind, OpOutcome::Attempt);

		let result = span.instrument(self.run_sign_in(provider, state, code, &mut stage)).await;

		obs::finish(kind, stage.as_str(), &result);

		result
	}

	/// Returns the stored user for `email`.
	pub fn user(&self, email: &str) -> Result<User> {
		self.users.get(email)?.ok_or_else(|| Error::UserNotFound { email: email.into() })
	}

	fn client(&self, provider: Provider) -> Result<&dyn ProviderClient> {
		self.providers.get(provider).ok_or(Error::InvalidOAuth2Provider { provider })
	}

	async fn run_sign_in(
		&self,
		provider: Provider,
		state: &str,
		code: &str,
		stage: &mut SignInStage,
	) -> Result<Token> {
		let client = self.client(provider)?;

		*stage = SignInStage::ProviderResolved;

		let token = client.exchange(state, code).await?;

		*stage = SignInStage::TokenExchanged;

		let info = client.user_info(&token).await?;

		*stage = SignInStage::EmailResolved;

		let current = self.users.get(&info.email)?;
		let mut user = match &current {
			Some(user) => user.clone(),
			None => User::new(&info.email)?,
		};

		*stage = SignInStage::UserResolved;

		user.set_token(token.clone());

		*stage = SignInStage::TokenMerged;

		match self.users.compare_and_swap(current.as_ref(), user)? {
			CompareAndSwapOutcome::Updated => {},
			CompareAndSwapOutcome::Mismatch | CompareAndSwapOutcome::Missing =>
				return Err(Error::Conflict { key: info.email }),
		}

		*stage = SignInStage::Persisted;

		Ok(token)
	}
}
impl Debug for IdentityManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IdentityManager")
			.field("providers", &self.providers)
			.finish_non_exhaustive()
	}
}
