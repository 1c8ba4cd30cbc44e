use crate::value::{AttributeError, Value};
use crate::MaybeSendSync;
use std::fmt::Debug;
use thiserror::Error;

/// Computing a value's textual representation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ReprError(pub String);

/// A value of a type the crate knows nothing about.
///
/// Everything here may fail, and a failure never stops a trace from rendering: a failed
/// [`repr`](OpaqueValue::repr) falls back to [`display`](OpaqueValue::display), and if that
/// fails too a placeholder is shown.
pub trait OpaqueValue: Debug + MaybeSendSync {
	fn type_name(&self) -> &str;

	/// An unambiguous representation of the value.
	fn repr(&self) -> Result<String, ReprError>;

	/// A human-friendly representation of the value.
	fn display(&self) -> Result<String, ReprError> {
		self.repr()
	}

	/// Looks up the attribute `name`.
	fn attr(&self, name: &str) -> Result<Value, AttributeError> {
		Err(AttributeError::missing(self.type_name(), name))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug)]
	struct Unprintable;

	impl OpaqueValue for Unprintable {
		fn type_name(&self) -> &str {
			"Unprintable"
		}

		fn repr(&self) -> Result<String, ReprError> {
			Err(ReprError("nope".to_owned()))
		}
	}

	#[test]
	fn defaults() {
		assert_eq!(Unprintable.display(), Err(ReprError("nope".to_owned())));
		assert_eq!(
			Unprintable.attr("x").unwrap_err().to_string(),
			"AttributeError: 'Unprintable' object has no attribute 'x'"
		);
	}
}
