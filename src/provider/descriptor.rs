//! Provider descriptor data structures and the well-known Google and GitHub descriptors.
//!
//! Descriptors are transport-agnostic: they list the endpoints a provider exposes and how a
//! client must authenticate against them, and they are validated once when built.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::Provider};

const GOOGLE_AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USER_INFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const GITHUB_AUTHORIZATION_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_INFO_URL: &str = "https://api.github.com/user";

/// Client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// How the access token is presented to the user-info endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserInfoAuth {
	#[default]
	/// `Authorization: Bearer <token>` header.
	BearerHeader,
	/// `access_token` query parameter.
	QueryParameter,
}

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint the user is redirected to.
	pub authorization: Url,
	/// Token endpoint used for the code exchange.
	pub token: Url,
	/// Endpoint returning the signed-in account.
	pub user_info: Url,
}

/// Immutable provider descriptor consumed by [`crate::oauth::OAuth2Client`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Provider the descriptor belongs to.
	pub provider: Provider,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Client authentication mechanism for the token endpoint.
	pub client_auth_method: ClientAuthMethod,
	/// Token presentation for the user-info endpoint.
	pub user_info_auth: UserInfoAuth,
}
impl ProviderDescriptor {
	/// Creates a new builder for `provider`.
	pub fn builder(provider: Provider) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(provider)
	}

	/// Google's published endpoints.
	///
	/// Google's user-info endpoint takes the token as the `access_token` query parameter.
	pub fn google() -> Result<Self, ProviderDescriptorError> {
		Self::builder(Provider::Google)
			.authorization_endpoint(parse_endpoint("authorization", GOOGLE_AUTHORIZATION_URL)?)
			.token_endpoint(parse_endpoint("token", GOOGLE_TOKEN_URL)?)
			.user_info_endpoint(parse_endpoint("user_info", GOOGLE_USER_INFO_URL)?)
			.client_auth_method(ClientAuthMethod::ClientSecretBasic)
			.user_info_auth(UserInfoAuth::QueryParameter)
			.build()
	}

	/// GitHub's published endpoints.
	pub fn github() -> Result<Self, ProviderDescriptorError> {
		Self::builder(Provider::GitHub)
			.authorization_endpoint(parse_endpoint("authorization", GITHUB_AUTHORIZATION_URL)?)
			.token_endpoint(parse_endpoint("token", GITHUB_TOKEN_URL)?)
			.user_info_endpoint(parse_endpoint("user_info", GITHUB_USER_INFO_URL)?)
			.client_auth_method(ClientAuthMethod::ClientSecretPost)
			.user_info_auth(UserInfoAuth::BearerHeader)
			.build()
	}

	/// Returns the published descriptor for `provider`.
	pub fn well_known(provider: Provider) -> Result<Self, ProviderDescriptorError> {
		match provider {
			Provider::Google => Self::google(),
			Provider::GitHub => Self::github(),
		}
	}
}

fn parse_endpoint(endpoint: &'static str, raw: &str) -> Result<Url, ProviderDescriptorError> {
	Url::parse(raw).map_err(|source| ProviderDescriptorError::InvalidUrl { endpoint, source })
}
