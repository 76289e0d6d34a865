//! `oauth2`-backed provider client.
//!
//! [`OAuth2Client`] performs the authorization-code exchange through the `oauth2` crate and
//! resolves the signed-in account with a plain GET against the descriptor's user-info endpoint,
//! both over a pluggable [`HttpTransport`].

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet,
	EndpointSet, HttpClientError, RedirectUrl, TokenResponse, TokenUrl,
	basic::BasicClient,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, USER_AGENT},
	},
};
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Provider, Token, UserInfo},
	config::ProviderConfig,
	error::{ConfigError, TransportError},
	http::HttpTransport,
	obs::{self, OpKind},
	provider::{ClientAuthMethod, ProviderClient, ProviderDescriptor, ProviderFuture, UserInfoAuth},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

const STATE_LEN: usize = 32;
const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Provider client speaking the authorization-code flow over transport `T`.
pub struct OAuth2Client<T>
where
	T: HttpTransport,
{
	descriptor: ProviderDescriptor,
	oauth_client: ConfiguredBasicClient,
	client_id: String,
	redirect_url: Url,
	scopes: Vec<String>,
	state: String,
	transport: Arc<T>,
}
impl<T> OAuth2Client<T>
where
	T: HttpTransport,
{
	/// Builds a client for `descriptor` with a freshly generated anti-forgery state.
	pub fn new(
		descriptor: ProviderDescriptor,
		config: &ProviderConfig,
		transport: impl Into<Arc<T>>,
	) -> Result<Self> {
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.clone()))
			.set_auth_uri(AuthUrl::from_url(descriptor.endpoints.authorization.clone()))
			.set_token_uri(TokenUrl::from_url(descriptor.endpoints.token.clone()))
			.set_redirect_uri(RedirectUrl::from_url(config.redirect_url.clone()));

		if matches!(descriptor.client_auth_method, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self {
			descriptor,
			oauth_client,
			client_id: config.client_id.clone(),
			redirect_url: config.redirect_url.clone(),
			scopes: config.scopes.clone(),
			state: random_string(STATE_LEN),
			transport: transport.into(),
		})
	}

	/// Anti-forgery state embedded in every authorization URL this client builds.
	pub fn state(&self) -> &str {
		&self.state
	}

	/// Descriptor the client was built from.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	async fn exchange_code(&self, code: &str) -> Result<Token> {
		let handle = self.transport.handle();
		let response = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code.to_owned()))
			.request_async(&handle)
			.await
			.map_err(|err| {
				obs::record_cause(OpKind::SignIn, "token_exchange", &err);

				Error::InvalidCode
			})?;

		Ok(Token::new(
			AccessToken::new(response.access_token().secret().to_owned()),
			self.descriptor.provider,
		))
	}

	async fn fetch_user_info(&self, token: &Token) -> Result<UserInfo> {
		let mut url = self.descriptor.endpoints.user_info.clone();
		let mut request = Request::builder()
			.method(Method::GET)
			.header(ACCEPT, "application/json")
			.header(USER_AGENT, USER_AGENT_VALUE);

		match self.descriptor.user_info_auth {
			UserInfoAuth::BearerHeader => {
				request = request
					.header(AUTHORIZATION, format!("Bearer {}", token.access_token.secret()));
			},
			UserInfoAuth::QueryParameter => {
				url.query_pairs_mut().append_pair("access_token", token.access_token.secret());
			},
		}

		let request = request.uri(url.as_str()).body(Vec::new()).map_err(ConfigError::from)?;
		let handle = self.transport.handle();
		let response = handle.call(request).await.map_err(map_transport_error)?;
		let status = response.status();

		if !status.is_success() {
			return Err(TransportError::UnexpectedStatus { status: status.as_u16() }.into());
		}

		let mut deserializer = serde_json::Deserializer::from_slice(response.body());
		let body: UserInfoBody = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| TransportError::Decode { source })?;

		Ok(UserInfo { email: body.email.unwrap_or_default() })
	}
}
impl<T> ProviderClient for OAuth2Client<T>
where
	T: HttpTransport,
{
	fn provider(&self) -> Provider {
		self.descriptor.provider
	}

	fn auth_url(&self) -> Url {
		let mut url = self.descriptor.endpoints.authorization.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "code");
		pairs.append_pair("client_id", &self.client_id);
		pairs.append_pair("redirect_uri", self.redirect_url.as_str());

		if !self.scopes.is_empty() {
			pairs.append_pair("scope", &self.scopes.join(" "));
		}

		pairs.append_pair("state", &self.state);

		drop(pairs);

		url
	}

	fn exchange<'a>(&'a self, state: &'a str, code: &'a str) -> ProviderFuture<'a, Token> {
		Box::pin(async move {
			if state != self.state {
				return Err(Error::InvalidState);
			}

			self.exchange_code(code).await
		})
	}

	fn user_info<'a>(&'a self, token: &'a Token) -> ProviderFuture<'a, UserInfo> {
		Box::pin(self.fetch_user_info(token))
	}
}
impl<T> Debug for OAuth2Client<T>
where
	T: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Client")
			.field("provider", &self.descriptor.provider)
			.field("client_id", &self.client_id)
			.field("redirect_url", &self.redirect_url.as_str())
			.field("scopes", &self.scopes)
			.finish_non_exhaustive()
	}
}

#[derive(Deserialize)]
struct UserInfoBody {
	#[serde(default)]
	email: Option<String>,
}

fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unclassified transport failure".into() }.into(),
	}
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}
