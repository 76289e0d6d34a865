//! Named counters and OAuth 2.0 sign-in, kept in-process behind CAS-safe stores.
//!
//! Two managers form the public surface:
//!
//! - [`counter::CounterManager`] creates, reads, increments, and deletes named counters held by a
//!   [`store::CounterStore`].
//! - [`iam::IdentityManager`] drives the authorization-code flow against a registered
//!   [`provider::ProviderClient`] and maps the resulting account onto a [`iam::User`] held by a
//!   [`store::UserStore`].
//!
//! Stores are plain handles created once at startup and shared by reference; nothing in the
//! crate keeps process-wide state.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod counter;
pub mod error;
pub mod http;
pub mod iam;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod store;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
