//! Named counters and the manager enforcing their create/read/increment/delete rules.

// self
use crate::{
	_prelude::*,
	obs::{self, OpKind, OpOutcome, OpSpan},
	store::{CompareAndSwapOutcome, CounterStore},
};

/// Named, monotonically incrementable counter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counter {
	/// Caller-supplied unique key.
	pub id: String,
	/// Current value; starts at zero and only grows.
	pub value: u64,
}
impl Counter {
	/// Creates a counter starting at zero.
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into(), value: 0 }
	}

	/// Returns a copy of the counter advanced by exactly one, or `None` at `u64::MAX`.
	pub fn incremented(&self) -> Option<Self> {
		Some(Self { id: self.id.clone(), value: self.value.checked_add(1)? })
	}
}

/// Enforces counter semantics over a shared [`CounterStore`].
///
/// The manager holds no state besides the store handle. Writes that depend on a prior read go
/// through [`CounterStore::compare_and_swap`], so two concurrent `add` calls for one id create it
/// once and two concurrent `inc` calls never lose an increment: the loser receives
/// [`Error::Exists`] or [`Error::Conflict`] and may retry.
#[derive(Clone)]
pub struct CounterManager {
	store: Arc<dyn CounterStore>,
}
impl CounterManager {
	/// Creates a manager over `store`.
	pub fn new(store: Arc<dyn CounterStore>) -> Self {
		Self { store }
	}

	/// Creates counter `id` with value zero.
	///
	/// Fails with [`Error::Exists`] when the id is taken and propagates store failures as-is.
	pub fn add(&self, id: &str) -> Result<()> {
		observe(OpKind::CounterAdd, || {
			if self.store.get(id)?.is_some() {
				return Err(Error::Exists { id: id.into() });
			}

			match self.store.compare_and_swap(None, Counter::new(id))? {
				CompareAndSwapOutcome::Updated => Ok(()),
				CompareAndSwapOutcome::Mismatch | CompareAndSwapOutcome::Missing =>
					Err(Error::Exists { id: id.into() }),
			}
		})
	}

	/// Returns counter `id`.
	pub fn get(&self, id: &str) -> Result<Counter> {
		observe(OpKind::CounterGet, || {
			self.store.get(id)?.ok_or_else(|| Error::CounterNotFound { id: id.into() })
		})
	}

	/// Increments counter `id` by one and returns the stored result.
	///
	/// A concurrent writer touching the same counter between the read and the write yields
	/// [`Error::Conflict`]; a concurrent delete yields [`Error::CounterNotFound`]. A counter at
	/// `u64::MAX` is left untouched and yields [`Error::CounterOverflow`].
	pub fn inc(&self, id: &str) -> Result<Counter> {
		observe(OpKind::CounterInc, || {
			let current =
				self.store.get(id)?.ok_or_else(|| Error::CounterNotFound { id: id.into() })?;
			let updated =
				current.incremented().ok_or_else(|| Error::CounterOverflow { id: id.into() })?;

			match self.store.compare_and_swap(Some(&current), updated.clone())? {
				CompareAndSwapOutcome::Updated => Ok(updated),
				CompareAndSwapOutcome::Mismatch => Err(Error::Conflict { key: id.into() }),
				CompareAndSwapOutcome::Missing => Err(Error::CounterNotFound { id: id.into() }),
			}
		})
	}

	/// Deletes counter `id`; the id may be added again afterwards.
	pub fn delete(&self, id: &str) -> Result<()> {
		observe(OpKind::CounterDelete, || {
			self.store
				.delete(id)?
				.map(|_| ())
				.ok_or_else(|| Error::CounterNotFound { id: id.into() })
		})
	}
}
impl Debug for CounterManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CounterManager").finish_non_exhaustive()
	}
}

fn observe<T>(kind: OpKind, op: impl FnOnce() -> Result<T>) -> Result<T> {
	let _span = OpSpan::new(kind, kind.as_str()).entered();

	obs::record_op_outcome(kind, OpOutcome::Attempt);

	let result = op();

	obs::finish(kind, kind.as_str(), &result);

	result
}

#[cfg(test)]
mod tests {
	// crates.io
	use parking_lot::Mutex;
	// self
	use super::*;
	use crate::store::StoreError;

	#[derive(Debug, PartialEq, Eq)]
	enum Call {
		Get(String),
		Delete(String),
		Cas(Option<Counter>, Counter),
	}

	/// Store double that answers every call from a fixed script and records what it saw.
	#[derive(Default)]
	struct ScriptedStore {
		get: Option<Result<Option<Counter>, StoreError>>,
		delete: Option<Result<Option<Counter>, StoreError>>,
		cas: Option<Result<CompareAndSwapOutcome, StoreError>>,
		calls: Mutex<Vec<Call>>,
	}
	impl ScriptedStore {
		fn answer<T>(slot: &Option<Result<T, StoreError>>, name: &str) -> Result<T, StoreError>
		where
			T: Clone,
		{
			slot.clone().unwrap_or_else(|| panic!("Unexpected `{name}` call."))
		}

		fn calls(&self) -> Vec<Call> {
			std::mem::take(&mut *self.calls.lock())
		}
	}
	impl CounterStore for ScriptedStore {
		fn set(&self, _counter: Counter) -> Result<(), StoreError> {
			panic!("Managers must not write through the unconditional `set`.");
		}

		fn get(&self, id: &str) -> Result<Option<Counter>, StoreError> {
			self.calls.lock().push(Call::Get(id.into()));

			Self::answer(&self.get, "get")
		}

		fn delete(&self, id: &str) -> Result<Option<Counter>, StoreError> {
			self.calls.lock().push(Call::Delete(id.into()));

			Self::answer(&self.delete, "delete")
		}

		fn compare_and_swap(
			&self,
			expected: Option<&Counter>,
			replacement: Counter,
		) -> Result<CompareAndSwapOutcome, StoreError> {
			self.calls.lock().push(Call::Cas(expected.cloned(), replacement));

			Self::answer(&self.cas, "compare_and_swap")
		}
	}

	fn unexpected() -> StoreError {
		StoreError::Backend { message: "unexpected error".into() }
	}

	fn counter(value: u64) -> Counter {
		Counter { id: "id".into(), value }
	}

	fn build(store: ScriptedStore) -> (CounterManager, Arc<ScriptedStore>) {
		let store = Arc::new(store);

		(CounterManager::new(store.clone()), store)
	}

	#[test]
	fn add_creates_counter_at_zero() {
		let (manager, store) = build(ScriptedStore {
			get: Some(Ok(None)),
			cas: Some(Ok(CompareAndSwapOutcome::Updated)),
			..Default::default()
		});

		manager.add("id").expect("Adding an absent counter should succeed.");

		assert_eq!(store.calls(), vec![Call::Get("id".into()), Call::Cas(None, counter(0))]);
	}

	#[test]
	fn add_rejects_existing_counter_without_writing() {
		let (manager, store) =
			build(ScriptedStore { get: Some(Ok(Some(counter(3)))), ..Default::default() });
		let err = manager.add("id").expect_err("Adding an existing counter should fail.");

		assert!(matches!(err, Error::Exists { ref id } if id == "id"));
		assert_eq!(store.calls(), vec![Call::Get("id".into())]);
	}

	#[test]
	fn add_reports_lost_creation_race_as_exists() {
		let (manager, _) = build(ScriptedStore {
			get: Some(Ok(None)),
			cas: Some(Ok(CompareAndSwapOutcome::Mismatch)),
			..Default::default()
		});

		assert!(matches!(manager.add("id"), Err(Error::Exists { .. })));
	}

	#[test]
	fn add_propagates_read_failures_verbatim() {
		let (manager, store) =
			build(ScriptedStore { get: Some(Err(unexpected())), ..Default::default() });
		let err = manager.add("id").expect_err("Storage failures should propagate.");

		assert!(matches!(err, Error::Storage(ref e) if *e == unexpected()));
		assert_eq!(store.calls(), vec![Call::Get("id".into())]);
	}

	#[test]
	fn get_passes_records_through() {
		let (manager, _) =
			build(ScriptedStore { get: Some(Ok(Some(counter(1)))), ..Default::default() });

		assert_eq!(manager.get("id").expect("Stored counter should be returned."), counter(1));

		let (manager, _) = build(ScriptedStore { get: Some(Ok(None)), ..Default::default() });

		assert!(matches!(manager.get("id"), Err(Error::CounterNotFound { .. })));
	}

	#[test]
	fn inc_writes_back_value_plus_one() {
		let (manager, store) = build(ScriptedStore {
			get: Some(Ok(Some(counter(1)))),
			cas: Some(Ok(CompareAndSwapOutcome::Updated)),
			..Default::default()
		});
		let updated = manager.inc("id").expect("Incrementing a stored counter should succeed.");

		assert_eq!(updated, counter(2));
		assert_eq!(
			store.calls(),
			vec![Call::Get("id".into()), Call::Cas(Some(counter(1)), counter(2))]
		);
	}

	#[test]
	fn inc_fails_for_absent_counter() {
		let (manager, store) = build(ScriptedStore { get: Some(Ok(None)), ..Default::default() });

		assert!(matches!(manager.inc("id"), Err(Error::CounterNotFound { .. })));
		assert_eq!(store.calls(), vec![Call::Get("id".into())]);
	}

	#[test]
	fn inc_propagates_write_failures_verbatim() {
		let (manager, _) = build(ScriptedStore {
			get: Some(Ok(Some(counter(1)))),
			cas: Some(Err(unexpected())),
			..Default::default()
		});

		assert!(matches!(manager.inc("id"), Err(Error::Storage(_))));
	}

	#[test]
	fn inc_surfaces_concurrent_writers() {
		let (manager, _) = build(ScriptedStore {
			get: Some(Ok(Some(counter(1)))),
			cas: Some(Ok(CompareAndSwapOutcome::Mismatch)),
			..Default::default()
		});

		assert!(matches!(manager.inc("id"), Err(Error::Conflict { ref key }) if key == "id"));

		let (manager, _) = build(ScriptedStore {
			get: Some(Ok(Some(counter(1)))),
			cas: Some(Ok(CompareAndSwapOutcome::Missing)),
			..Default::default()
		});

		assert!(matches!(manager.inc("id"), Err(Error::CounterNotFound { .. })));
	}

	#[test]
	fn delete_maps_absence_to_not_found() {
		let (manager, _) =
			build(ScriptedStore { delete: Some(Ok(Some(counter(4)))), ..Default::default() });

		manager.delete("id").expect("Deleting a stored counter should succeed.");

		let (manager, store) =
			build(ScriptedStore { delete: Some(Ok(None)), ..Default::default() });

		assert!(matches!(manager.delete("id"), Err(Error::CounterNotFound { .. })));
		assert_eq!(store.calls(), vec![Call::Delete("id".into())]);
	}

	#[test]
	fn increment_refuses_to_wrap() {
		let max = Counter { id: "id".into(), value: u64::MAX };

		assert_eq!(max.incremented(), None);
		assert_eq!(Counter::new("id").incremented(), Some(counter(1)));
	}

	#[test]
	fn inc_at_max_fails_without_writing() {
		let (manager, store) = build(ScriptedStore {
			get: Some(Ok(Some(counter(u64::MAX)))),
			..Default::default()
		});

		assert!(matches!(manager.inc("id"), Err(Error::CounterOverflow { ref id }) if id == "id"));
		assert_eq!(store.calls(), vec![Call::Get("id".into())]);
	}
}
