//! Thread-safe in-memory store implementations.
//!
//! Each store owns one readers-writer lock over its whole key space. Reads share the lock,
//! while writes and compare-and-swap hold it exclusively for the full check-then-write, so
//! single calls never observe torn records or lose updates.

// self
use crate::{
	_prelude::*,
	counter::Counter,
	iam::User,
	store::{CompareAndSwapOutcome, CounterStore, StoreError, UserStore},
};

type RecordMap<V> = Arc<RwLock<HashMap<String, V>>>;

/// Keyed record table shared by both memory stores.
#[derive(Debug)]
struct Records<V>(RecordMap<V>);
impl<V> Records<V>
where
	V: Clone + PartialEq,
{
	fn set_now(&self, key: String, record: V) {
		self.0.write().insert(key, record);
	}

	fn get_now(&self, key: &str) -> Option<V> {
		self.0.read().get(key).cloned()
	}

	fn delete_now(&self, key: &str) -> Option<V> {
		self.0.write().remove(key)
	}

	fn cas_now(&self, key: String, expected: Option<&V>, replacement: V) -> CompareAndSwapOutcome {
		let mut guard = self.0.write();
		let outcome = match (guard.get(&key), expected) {
			(None, None) => CompareAndSwapOutcome::Updated,
			(Some(current), Some(expected)) if current == expected => CompareAndSwapOutcome::Updated,
			(Some(_), _) => CompareAndSwapOutcome::Mismatch,
			(None, Some(_)) => CompareAndSwapOutcome::Missing,
		};

		if matches!(outcome, CompareAndSwapOutcome::Updated) {
			guard.insert(key, replacement);
		}

		outcome
	}

	fn len(&self) -> usize {
		self.0.read().len()
	}
}
impl<V> Clone for Records<V> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}
impl<V> Default for Records<V> {
	fn default() -> Self {
		Self(Default::default())
	}
}

/// Volatile counter storage; clones share the same table.
#[derive(Clone, Debug, Default)]
pub struct MemoryCounterStore(Records<Counter>);
impl MemoryCounterStore {
	/// Number of counters currently stored.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no counters are stored.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
impl CounterStore for MemoryCounterStore {
	fn set(&self, counter: Counter) -> Result<(), StoreError> {
		self.0.set_now(counter.id.clone(), counter);

		Ok(())
	}

	fn get(&self, id: &str) -> Result<Option<Counter>, StoreError> {
		Ok(self.0.get_now(id))
	}

	fn delete(&self, id: &str) -> Result<Option<Counter>, StoreError> {
		Ok(self.0.delete_now(id))
	}

	fn compare_and_swap(
		&self,
		expected: Option<&Counter>,
		replacement: Counter,
	) -> Result<CompareAndSwapOutcome, StoreError> {
		Ok(self.0.cas_now(replacement.id.clone(), expected, replacement))
	}
}

/// Volatile user storage keyed by email; clones share the same table.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserStore(Records<User>);
impl MemoryUserStore {
	/// Number of users currently stored.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no users are stored.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
impl UserStore for MemoryUserStore {
	fn set(&self, user: User) -> Result<(), StoreError> {
		self.0.set_now(user.email.to_string(), user);

		Ok(())
	}

	fn get(&self, email: &str) -> Result<Option<User>, StoreError> {
		Ok(self.0.get_now(email))
	}

	fn compare_and_swap(
		&self,
		expected: Option<&User>,
		replacement: User,
	) -> Result<CompareAndSwapOutcome, StoreError> {
		Ok(self.0.cas_now(replacement.email.to_string(), expected, replacement))
	}
}
