//! Provider-facing capability trait, descriptors (data), and the client registry.
//!
//! [`ProviderClient`] is the capability set the identity manager drives: build the
//! authorization URL, exchange an authorization code, and resolve the signed-in account.
//! `descriptor` exposes validated endpoint metadata for concrete clients, and `registry`
//! holds the immutable provider-to-client map built once at startup.

pub mod descriptor;
pub mod registry;

pub use descriptor::*;
pub use registry::*;

// self
use crate::{
	_prelude::*,
	auth::{Provider, Token, UserInfo},
};

/// Boxed future returned by [`ProviderClient`] network operations.
///
/// Dropping the future abandons the in-flight request, which is how callers cancel or bound a
/// sign-in (for example with `tokio::time::timeout`).
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Three-legged authorization-code flow against one external provider.
///
/// Each client instance owns a single anti-forgery `state` generated at construction, so every
/// authorization URL it builds carries the same value and only one flow at a time is
/// trustworthy per instance.
pub trait ProviderClient
where
	Self: Send + Sync,
{
	/// Provider this client talks to; tokens it mints are tagged with it.
	fn provider(&self) -> Provider;

	/// Authorization endpoint URL carrying the client's `state`.
	fn auth_url(&self) -> Url;

	/// Exchanges `code` for an access token after checking `state`.
	///
	/// Fails with [`Error::InvalidState`] before any network traffic when `state` differs from
	/// the client's, and with [`Error::InvalidCode`] for every exchange failure.
	fn exchange<'a>(&'a self, state: &'a str, code: &'a str) -> ProviderFuture<'a, Token>;

	/// Resolves the account behind `token`; failures are infrastructure errors, unclassified.
	fn user_info<'a>(&'a self, token: &'a Token) -> ProviderFuture<'a, UserInfo>;
}
