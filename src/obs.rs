//! Optional observability helpers for manager operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `counters.op` with the `op` and `stage`
//!   fields, plus one event per failed operation (`debug` for domain errors, `warn` for
//!   infrastructure errors).
//! - Enable `metrics` to increment the `counters_operation_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod meter;
mod span;

pub use meter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Manager operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// [`crate::counter::CounterManager::add`].
	CounterAdd,
	/// [`crate::counter::CounterManager::get`].
	CounterGet,
	/// [`crate::counter::CounterManager::inc`].
	CounterInc,
	/// [`crate::counter::CounterManager::delete`].
	CounterDelete,
	/// [`crate::iam::IdentityManager::oauth2_url`].
	OAuth2Url,
	/// [`crate::iam::IdentityManager::sign_in_with_oauth2`].
	SignIn,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::CounterAdd => "counter_add",
			OpKind::CounterGet => "counter_get",
			OpKind::CounterInc => "counter_inc",
			OpKind::CounterDelete => "counter_delete",
			OpKind::OAuth2Url => "oauth2_url",
			OpKind::SignIn => "sign_in",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a manager operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the final outcome of `kind`, reporting `err` together with the `stage` it hit.
pub fn finish<T>(kind: OpKind, stage: &'static str, result: &Result<T>) {
	match result {
		Ok(_) => record_op_outcome(kind, OpOutcome::Success),
		Err(err) => {
			record_failure(kind, stage, err);
			record_op_outcome(kind, OpOutcome::Failure);
		},
	}
}
