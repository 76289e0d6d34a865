//! Crate-level error types shared by managers, stores, and provider clients.

// self
use crate::{_prelude::*, auth::Provider};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Domain variants name conditions the managers recognize themselves. Everything else is an
/// infrastructure failure carried unchanged as the error source; see
/// [`Error::is_infrastructure`].
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure while talking to a provider.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// No counter is stored under the requested identifier.
	#[error("Counter `{id}` was not found.")]
	CounterNotFound {
		/// Requested counter identifier.
		id: String,
	},
	/// A counter already exists under the requested identifier.
	#[error("Counter `{id}` already exists.")]
	Exists {
		/// Conflicting counter identifier.
		id: String,
	},
	/// Counter already holds the largest representable value.
	#[error("Counter `{id}` cannot be incremented past its maximum.")]
	CounterOverflow {
		/// Saturated counter identifier.
		id: String,
	},
	/// No user is stored under the requested email.
	#[error("User `{email}` was not found.")]
	UserNotFound {
		/// Requested email address.
		email: String,
	},
	/// A concurrent writer changed the record between read and write.
	#[error("Record `{key}` was modified concurrently.")]
	Conflict {
		/// Store key of the contended record.
		key: String,
	},
	/// Email address failed syntax validation.
	#[error("Email is not valid.")]
	InvalidEmail,
	/// No client is registered for the requested provider.
	#[error("OAuth 2.0 provider `{provider}` is not registered.")]
	InvalidOAuth2Provider {
		/// Requested provider.
		provider: Provider,
	},
	/// Returned `state` does not match the client's anti-forgery token.
	#[error("Authorization state mismatch.")]
	InvalidState,
	/// Provider refused or failed to exchange the authorization code.
	#[error("Authorization code could not be exchanged.")]
	InvalidCode,
}
impl Error {
	/// Returns `true` for storage, transport, and configuration failures.
	///
	/// Domain errors describe the request; infrastructure errors describe the system and are
	/// usually reported as internal failures.
	pub fn is_infrastructure(&self) -> bool {
		matches!(self, Error::Storage(_) | Error::Config(_) | Error::Transport(_))
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Provider descriptor or configuration contains an invalid URL.
	#[error("Configured URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required configuration value is absent.
	#[error("Configuration value `{key}` is missing.")]
	Missing {
		/// Lookup key of the missing value.
		key: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures raised while calling provider endpoints.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured cause.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
	/// Provider answered with a non-success status.
	#[error("Provider responded with HTTP status {status}.")]
	UnexpectedStatus {
		/// HTTP status code returned by the provider.
		status: u16,
	},
	/// Provider returned a body that could not be decoded.
	#[error("Provider returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
