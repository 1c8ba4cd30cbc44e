//! Looking up the current values of the names found in source code.

use crate::config::Patterns;
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use thiserror::Error;

/// Why a name couldn't be looked up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
	/// The name isn't bound (yet) in this scope.
	#[error("name is not defined")]
	Undefined,

	/// The name is bound, but its value can't be read.
	#[error("value is unavailable: {0}")]
	Unavailable(String),
}

/// Something that maps variable names to their current values, such as a frame's locals.
pub trait NameResolver {
	fn get(&self, name: &str) -> Result<Value, LookupError>;
}

/// An ordered set of variables.
#[derive(Debug, Clone, Default)]
pub struct Scope(IndexMap<String, Value>);

impl Scope {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(name, value);
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.0.insert(name.into(), value.into());
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
		self.0.iter().map(|(name, value)| (name.as_str(), value))
	}
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Scope {
	fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect())
	}
}

impl NameResolver for Scope {
	fn get(&self, name: &str) -> Result<Value, LookupError> {
		self.0.get(name).cloned().ok_or(LookupError::Undefined)
	}
}

impl NameResolver for IndexMap<String, Value> {
	fn get(&self, name: &str) -> Result<Value, LookupError> {
		IndexMap::get(self, name).cloned().ok_or(LookupError::Undefined)
	}
}

impl NameResolver for HashMap<String, Value> {
	fn get(&self, name: &str) -> Result<Value, LookupError> {
		HashMap::get(self, name).cloned().ok_or(LookupError::Undefined)
	}
}

/// A [`NameResolver`] backed by a closure; see [`from_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FromFn<F>(F);

/// Creates a [`NameResolver`] that calls `func` for every lookup.
pub fn from_fn<F: Fn(&str) -> Result<Value, LookupError>>(func: F) -> FromFn<F> {
	FromFn(func)
}

impl<F: Fn(&str) -> Result<Value, LookupError>> NameResolver for FromFn<F> {
	fn get(&self, name: &str) -> Result<Value, LookupError> {
		(self.0)(name)
	}
}

/// A dotted name whose base resolved, but one of whose attributes didn't.
#[derive(Debug, Clone)]
pub struct UnresolvedAttribute {
	pub base: String,

	/// The attribute segments after the base.
	pub path: Vec<String>,

	/// How many segments of `path` resolved before the failure.
	pub resolved: usize,

	/// The value `base` plus the first `resolved` segments evaluated to.
	pub last_good: Value,

	pub failure_kind: String,
	pub failure_message: String,
}

impl UnresolvedAttribute {
	/// The dotted name of [`last_good`](Self::last_good).
	pub fn last_good_name(&self) -> String {
		std::iter::once(self.base.as_str())
			.chain(self.path[..self.resolved].iter().map(String::as_str))
			.collect::<Vec<_>>()
			.join(".")
	}

	/// The segment that failed.
	pub fn first_failed(&self) -> &str {
		&self.path[self.resolved]
	}
}

/// What a name is bound to.
#[derive(Debug, Clone)]
pub enum BoundValue {
	Value(Value),

	/// The name matched a suppression pattern; its value was never read.
	Censored,

	Unresolved(UnresolvedAttribute),
}

#[derive(Debug, Clone)]
pub struct Binding {
	pub name: String,
	pub value: BoundValue,
}

/// Looks up a (possibly dotted) name: the base in `local` then in `global`, then each
/// attribute from left to right. The first attribute that fails stops the walk.
pub fn lookup(
	name: &str,
	local: &dyn NameResolver,
	global: &dyn NameResolver,
) -> Result<BoundValue, LookupError> {
	let mut segments = name.split('.');
	let base = segments.next().unwrap_or(name);

	let mut value = match local.get(base) {
		Err(LookupError::Undefined) => global.get(base)?,
		other => other?,
	};

	for (idx, attr) in segments.clone().enumerate() {
		match value.attr(attr) {
			Ok(next) => value = next,
			Err(err) => {
				return Ok(BoundValue::Unresolved(UnresolvedAttribute {
					base: base.to_owned(),
					path: segments.map(str::to_owned).collect(),
					resolved: idx,
					last_good: value,
					failure_kind: err.kind,
					failure_message: err.message,
				}));
			}
		}
	}

	Ok(BoundValue::Value(value))
}

/// Resolves every name in `names`, keeping their order.
///
/// Names matching `suppressed_vars` are censored without being looked up; names that aren't
/// defined in either scope, or whose values can't be read, are left out.
pub fn resolve_bindings<'n>(
	names: impl IntoIterator<Item = &'n str>,
	local: &dyn NameResolver,
	global: &dyn NameResolver,
	suppressed_vars: &Patterns,
) -> IndexMap<String, Binding> {
	let mut bindings = IndexMap::new();

	for name in names {
		if bindings.contains_key(name) {
			continue;
		}

		let value = if suppressed_vars.is_match(name) {
			BoundValue::Censored
		} else {
			match lookup(name, local, global) {
				Ok(value) => value,
				Err(LookupError::Undefined) => continue,
				Err(LookupError::Unavailable(reason)) => {
					tracing::debug!(%name, %reason, "omitting unavailable variable");
					continue;
				}
			}
		};

		bindings.insert(name.to_owned(), Binding { name: name.to_owned(), value });
	}

	bindings
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;
	use std::cell::Cell;

	fn no_patterns() -> Patterns {
		Patterns::default()
	}

	#[test]
	fn locals_shadow_globals() {
		let local = Scope::new().with("x", 1);
		let global = Scope::new().with("x", 2).with("y", 3);

		let bindings = resolve_bindings(["y", "x", "z"], &local, &global, &no_patterns());

		assert_eq!(bindings.keys().collect::<Vec<_>>(), ["y", "x"]);
		assert_matches!(&bindings["x"].value, BoundValue::Value(Value::Integer(1)));
		assert_matches!(&bindings["y"].value, BoundValue::Value(Value::Integer(3)));
	}

	#[test]
	fn partial_attribute_paths() {
		let b = Value::dict([]);
		let a = Value::dict([("b".into(), b.clone())]);
		let local = Scope::new().with("a", a);

		let bound = lookup("a.b.c", &local, &Scope::new()).unwrap();
		assert_matches!(bound, BoundValue::Unresolved(unresolved) => {
			assert_eq!(unresolved.base, "a");
			assert_eq!(unresolved.path, ["b", "c"]);
			assert_eq!(unresolved.resolved, 1);
			assert!(unresolved.last_good.is(&b));
			assert_eq!(unresolved.failure_kind, "AttributeError");
			assert_eq!(unresolved.last_good_name(), "a.b");
			assert_eq!(unresolved.first_failed(), "c");
		});
	}

	#[test]
	fn full_attribute_paths() {
		let local = Scope::new().with("a", Value::dict([("b".into(), 5.into())]));
		assert_matches!(
			lookup("a.b", &local, &Scope::new()),
			Ok(BoundValue::Value(Value::Integer(5)))
		);
	}

	#[test]
	fn censoring_never_reads_values() {
		let reads = Cell::new(0);
		let local = from_fn(|_| {
			reads.set(reads.get() + 1);
			Ok(Value::from("hunter2"))
		});
		let patterns = Patterns::new(["pass"]).unwrap();

		let bindings = resolve_bindings(["password", "user"], &local, &Scope::new(), &patterns);

		assert_matches!(bindings["password"].value, BoundValue::Censored);
		assert_matches!(bindings["user"].value, BoundValue::Value(_));
		assert_eq!(reads.get(), 1);
	}

	#[test]
	fn unavailable_values_are_omitted() {
		let local = from_fn(|name| match name {
			"broken" => Err(LookupError::Unavailable("optimized out".to_owned())),
			_ => Err(LookupError::Undefined),
		});
		let global = Scope::new().with("broken", 1);

		assert!(resolve_bindings(["broken"], &local, &global, &no_patterns()).is_empty());
	}
}
