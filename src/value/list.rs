use crate::value::Value;
use crate::{Mutable, RefCount};
use std::fmt::{self, Debug, Formatter};

/// Which kind of sequence a [`List`] is, which decides its brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
	List,
	Tuple,
	Set,
}

impl ListKind {
	pub const fn type_name(self) -> &'static str {
		match self {
			Self::List => "list",
			Self::Tuple => "tuple",
			Self::Set => "set",
		}
	}

	pub const fn brackets(self) -> (&'static str, &'static str) {
		match self {
			Self::List => ("[", "]"),
			Self::Tuple => ("(", ")"),
			Self::Set => ("{", "}"),
		}
	}
}

/// An ordered sequence of values.
///
/// Lists are shared and stay mutable after they're created, so a list can end up containing
/// itself. Cloning a list clones the reference, not the elements.
#[derive(Clone)]
pub struct List(RefCount<Inner>);

struct Inner {
	kind: ListKind,
	type_name: Option<String>,
	items: Mutable<Vec<Value>>,
}

impl Debug for List {
	// Elements aren't printed, as the list might contain itself.
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(f, "List({}, len={})", self.type_name(), self.len())
	}
}

impl List {
	pub fn new(kind: ListKind, items: impl IntoIterator<Item = Value>) -> Self {
		let items = Mutable::from(items.into_iter().collect::<Vec<_>>());
		Self(Inner { kind, type_name: None, items }.into())
	}

	/// Creates a list of a user-defined sequence type called `type_name`.
	pub fn named(
		kind: ListKind,
		type_name: impl Into<String>,
		items: impl IntoIterator<Item = Value>,
	) -> Self {
		Self(
			Inner {
				kind,
				type_name: Some(type_name.into()),
				items: Mutable::from(items.into_iter().collect::<Vec<_>>()),
			}
			.into(),
		)
	}

	pub fn kind(&self) -> ListKind {
		self.0.kind
	}

	/// The name of the user-defined type, if this isn't a builtin sequence.
	pub fn custom_name(&self) -> Option<&str> {
		self.0.type_name.as_deref()
	}

	pub fn type_name(&self) -> &str {
		self.custom_name().unwrap_or_else(|| self.kind().type_name())
	}

	pub fn len(&self) -> usize {
		self.0.items.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn push(&self, value: impl Into<Value>) {
		self.0.items.write().push(value.into());
	}

	/// The first `limit` elements. The lock isn't held after this returns, so the elements can
	/// be rendered even when they're this list itself.
	pub fn head(&self, limit: usize) -> Vec<Value> {
		self.0.items.read().iter().take(limit).cloned().collect()
	}

	pub fn ptr_eq(&self, rhs: &Self) -> bool {
		self.0.ptr_eq(&rhs.0)
	}

	pub fn addr(&self) -> usize {
		self.0.addr()
	}
}
