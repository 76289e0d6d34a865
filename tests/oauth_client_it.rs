#![cfg(feature = "reqwest")]

// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::prelude::*;
// self
use counters::{
	auth::{AccessToken, Provider, Token},
	config::ProviderConfig,
	error::{Error, TransportError},
	http::ReqwestTransport,
	oauth::OAuth2Client,
	provider::{ClientAuthMethod, ProviderClient, ProviderDescriptor, UserInfoAuth},
	url::Url,
};

const CLIENT_ID: &str = "client-it";
const CLIENT_SECRET: &str = "secret-it";

fn url(server: &MockServer, path: &str) -> Url {
	Url::parse(&server.url(path)).expect("Mock endpoint should parse successfully.")
}

fn client(
	server: &MockServer,
	provider: Provider,
	client_auth: ClientAuthMethod,
	user_info_auth: UserInfoAuth,
) -> OAuth2Client<ReqwestTransport> {
	let descriptor = ProviderDescriptor::builder(provider)
		.authorization_endpoint(url(server, "/authorize"))
		.token_endpoint(url(server, "/token"))
		.user_info_endpoint(url(server, "/user"))
		.client_auth_method(client_auth)
		.user_info_auth(user_info_auth)
		.build()
		.expect("Loopback descriptor should build successfully.");
	let config = ProviderConfig {
		client_id: CLIENT_ID.into(),
		client_secret: CLIENT_SECRET.into(),
		redirect_url: Url::parse("https://app.example.com/callback")
			.expect("Redirect URL should parse successfully."),
		scopes: vec!["user:email".into()],
	};
	let transport =
		ReqwestTransport::new(Duration::from_secs(5)).expect("Transport should build.");

	OAuth2Client::new(descriptor, &config, Arc::new(transport)).expect("Client should build.")
}

fn github(server: &MockServer) -> OAuth2Client<ReqwestTransport> {
	client(server, Provider::GitHub, ClientAuthMethod::ClientSecretPost, UserInfoAuth::BearerHeader)
}

fn google(server: &MockServer) -> OAuth2Client<ReqwestTransport> {
	client(
		server,
		Provider::Google,
		ClientAuthMethod::ClientSecretBasic,
		UserInfoAuth::QueryParameter,
	)
}

#[tokio::test]
async fn exchange_returns_provider_tagged_token() {
	let server = MockServer::start_async().await;
	let client = github(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"gh-token\",\"token_type\":\"bearer\",\"scope\":\"user:email\"}");
		})
		.await;
	let token = client
		.exchange(client.state(), "good-code")
		.await
		.expect("Code exchange should succeed.");

	mock.assert_calls_async(1).await;

	assert_eq!(token, Token::new(AccessToken::new("gh-token"), Provider::GitHub));
}

#[tokio::test]
async fn state_mismatch_sends_no_request() {
	let server = MockServer::start_async().await;
	let client = github(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"unused\",\"token_type\":\"bearer\"}");
		})
		.await;
	let err = client
		.exchange("forged-state", "good-code")
		.await
		.expect_err("A foreign state should be rejected.");

	assert!(matches!(err, Error::InvalidState));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn rejected_code_collapses_to_invalid_code() {
	let server = MockServer::start_async().await;
	let client = google(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"bad code\"}");
		})
		.await;
	let err = client
		.exchange(client.state(), "stale-code")
		.await
		.expect_err("A rejected code should fail.");

	assert!(matches!(err, Error::InvalidCode));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn unreachable_token_endpoint_collapses_to_invalid_code() {
	let server = MockServer::start_async().await;
	let client = google(&server);

	drop(server);

	let err = client
		.exchange(client.state(), "code")
		.await
		.expect_err("An unreachable endpoint should fail.");

	assert!(matches!(err, Error::InvalidCode));
}

#[tokio::test]
async fn user_info_sends_bearer_header() {
	let server = MockServer::start_async().await;
	let client = github(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/user")
				.header("authorization", "Bearer gh-token")
				.header("accept", "application/json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"login\":\"octocat\",\"email\":\"octocat@x.com\"}");
		})
		.await;
	let token = Token::new(AccessToken::new("gh-token"), Provider::GitHub);
	let info = client.user_info(&token).await.expect("User info should resolve.");

	mock.assert_calls_async(1).await;

	assert_eq!(info.email, "octocat@x.com");
}

#[tokio::test]
async fn user_info_sends_query_parameter() {
	let server = MockServer::start_async().await;
	let client = google(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user").query_param("access_token", "g-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"1\",\"email\":\"new@x.com\",\"verified_email\":true}");
		})
		.await;
	let token = Token::new(AccessToken::new("g-token"), Provider::Google);
	let info = client.user_info(&token).await.expect("User info should resolve.");

	mock.assert_calls_async(1).await;

	assert_eq!(info.email, "new@x.com");
}

#[tokio::test]
async fn user_info_withheld_email_decodes_as_empty() {
	let server = MockServer::start_async().await;
	let client = github(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"login\":\"octocat\",\"email\":null}");
		})
		.await;
	let token = Token::new(AccessToken::new("gh-token"), Provider::GitHub);
	let info = client.user_info(&token).await.expect("User info should resolve.");

	assert!(info.email.is_empty());
}

#[tokio::test]
async fn user_info_propagates_unexpected_status() {
	let server = MockServer::start_async().await;
	let client = github(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(401).body("{\"message\":\"Bad credentials\"}");
		})
		.await;
	let token = Token::new(AccessToken::new("expired"), Provider::GitHub);
	let err = client.user_info(&token).await.expect_err("A 401 should fail.");

	assert!(matches!(err, Error::Transport(TransportError::UnexpectedStatus { status: 401 })));
	assert!(err.is_infrastructure());
}

#[tokio::test]
async fn user_info_propagates_decode_failures() {
	let server = MockServer::start_async().await;
	let client = github(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"email\":42}");
		})
		.await;
	let token = Token::new(AccessToken::new("gh-token"), Provider::GitHub);
	let err = client.user_info(&token).await.expect_err("A malformed body should fail.");

	match err {
		Error::Transport(TransportError::Decode { source }) => {
			assert_eq!(source.path().to_string(), "email");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}
