//! Strongly typed identifiers for user records.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use email_address::EmailAddress;
use uuid::Uuid;
// self
use crate::_prelude::*;

/// Opaque, immutable identifier minted when a user record is first created.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);
impl UserId {
	/// Generates a fresh random identifier.
	pub fn generate() -> Self {
		Self(Uuid::new_v4())
	}

	/// Returns the underlying UUID.
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}
impl Debug for UserId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "User({})", self.0)
	}
}
impl Display for UserId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0.hyphenated(), f)
	}
}

/// Syntactically valid email address used as the primary user lookup key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);
impl Email {
	/// Validates `value` and wraps it.
	pub fn parse(value: impl AsRef<str>) -> Result<Self> {
		let view = value.as_ref();

		if !EmailAddress::is_valid(view) {
			return Err(Error::InvalidEmail);
		}

		Ok(Self(view.to_owned()))
	}
}
impl Deref for Email {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Email {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for Email {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<Email> for String {
	fn from(value: Email) -> Self {
		value.0
	}
}
impl TryFrom<String> for Email {
	type Error = Error;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}
impl FromStr for Email {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl Debug for Email {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Email({})", self.0)
	}
}
impl Display for Email {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
