//! Durable local user records.

// self
use crate::{
	_prelude::*,
	auth::{Email, Provider, Token, UserId},
};

/// Local account keyed by email, holding at most one token per provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Identifier minted at creation; never changes.
	pub id: UserId,
	/// Validated email; the store key.
	pub email: Email,
	tokens: Vec<Token>,
}
impl User {
	/// Creates a user without tokens, failing with [`Error::InvalidEmail`] on a malformed address.
	pub fn new(email: &str) -> Result<Self> {
		Ok(Self { id: UserId::generate(), email: Email::parse(email)?, tokens: Vec::new() })
	}

	/// Tokens in the order their providers were first seen.
	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	/// Token issued by `provider`, if any.
	pub fn token(&self, provider: Provider) -> Option<&Token> {
		self.tokens.iter().find(|token| token.provider == provider)
	}

	/// Stores `token`, replacing in place any token from the same provider.
	pub fn set_token(&mut self, token: Token) {
		match self.tokens.iter_mut().find(|slot| slot.provider == token.provider) {
			Some(slot) => *slot = token,
			None => self.tokens.push(token),
		}
	}
}
