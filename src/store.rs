//! Storage contracts and built-in store implementations for counters and users.
//!
//! Every call on a store is linearizable with respect to every other call on the same store.
//! Managers never lock anything themselves, so composite read-then-write sequences finish with
//! [`CounterStore::compare_and_swap`] or [`UserStore::compare_and_swap`], which apply the write
//! only if the record still matches what the manager read.

pub mod memory;

pub use memory::{MemoryCounterStore, MemoryUserStore};

// self
use crate::{_prelude::*, counter::Counter, iam::User};

/// Storage backend contract for counter records, keyed by [`Counter::id`].
pub trait CounterStore
where
	Self: Send + Sync,
{
	/// Unconditionally inserts or replaces the whole record.
	fn set(&self, counter: Counter) -> Result<(), StoreError>;

	/// Fetches the record stored under `id`, if present.
	fn get(&self, id: &str) -> Result<Option<Counter>, StoreError>;

	/// Removes the record stored under `id`, returning it; absent ids are left untouched.
	fn delete(&self, id: &str) -> Result<Option<Counter>, StoreError>;

	/// Atomically replaces the record under `replacement.id` if it still equals `expected`.
	///
	/// `expected = None` means "only if absent" and turns the call into a create.
	fn compare_and_swap(
		&self,
		expected: Option<&Counter>,
		replacement: Counter,
	) -> Result<CompareAndSwapOutcome, StoreError>;
}

/// Storage backend contract for user records, keyed by [`User::email`].
pub trait UserStore
where
	Self: Send + Sync,
{
	/// Unconditionally inserts or replaces the record keyed by the user's email.
	fn set(&self, user: User) -> Result<(), StoreError>;

	/// Fetches the record stored under `email`, if present.
	fn get(&self, email: &str) -> Result<Option<User>, StoreError>;

	/// Atomically replaces the record under `replacement.email` if it still equals `expected`.
	///
	/// `expected = None` means "only if absent".
	fn compare_and_swap(
		&self,
		expected: Option<&User>,
		replacement: User,
	) -> Result<CompareAndSwapOutcome, StoreError>;
}

/// Result of a compare-and-swap attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareAndSwapOutcome {
	/// The stored state matched the expectation and the replacement was written.
	Updated,
	/// A record exists but differs from the expectation (or exists when absence was expected).
	Mismatch,
	/// A record was expected but none is stored.
	Missing,
}

/// Error type produced by [`CounterStore`] and [`UserStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use std::error::Error as StdError;

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("database unreachable"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the underlying store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn compare_and_swap_outcome_can_be_serialized() {
		let payload = serde_json::to_string(&CompareAndSwapOutcome::Mismatch)
			.expect("CompareAndSwapOutcome should serialize to JSON.");

		assert_eq!(payload, "\"Mismatch\"");
	}
}
