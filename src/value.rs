//! The values that variables can be bound to.

mod array;
mod callable;
mod list;
mod map;
mod opaque;

pub use array::Array;
pub use callable::Callable;
pub use list::{List, ListKind};
pub use map::Map;
pub use opaque::{OpaqueValue, ReprError};

use crate::RefCount;
use std::fmt::Write;
use thiserror::Error;

/// A captured value.
///
/// The common shapes have their own variants so they can be rendered structurally; anything
/// else goes through [`OpaqueValue`]. Cloning is cheap: containers are shared.
#[derive(Debug, Clone, Default)]
pub enum Value {
	#[default]
	Null,
	Boolean(bool),
	Integer(i64),
	Float(f64),
	Text(RefCount<str>),
	List(List),
	Map(Map),
	Array(Array),
	Callable(RefCount<Callable>),
	Opaque(RefCount<dyn OpaqueValue>),
}

#[cfg(feature = "multithreaded")]
sa::assert_impl_all!(Value: Send, Sync);

/// Looking up an attribute failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct AttributeError {
	/// The kind of failure, eg `AttributeError`.
	pub kind: String,
	pub message: String,
}

impl AttributeError {
	pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
		Self { kind: kind.into(), message: message.into() }
	}

	/// The attribute doesn't exist.
	pub fn missing(type_name: &str, attr: &str) -> Self {
		Self::new("AttributeError", format!("'{type_name}' object has no attribute '{attr}'"))
	}
}

impl PartialEq for Value {
	/// Scalars compare by value, everything else by identity.
	fn eq(&self, rhs: &Self) -> bool {
		match (self, rhs) {
			(Self::Null, Self::Null) => true,
			(Self::Boolean(lbool), Self::Boolean(rbool)) => lbool == rbool,
			(Self::Integer(lint), Self::Integer(rint)) => lint == rint,
			(Self::Float(lfloat), Self::Float(rfloat)) => lfloat == rfloat,
			(Self::Text(ltext), Self::Text(rtext)) => **ltext == **rtext,
			_ => self.is(rhs),
		}
	}
}

impl Value {
	pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
		Self::List(List::new(ListKind::List, items))
	}

	pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
		Self::List(List::new(ListKind::Tuple, items))
	}

	pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
		Self::List(List::new(ListKind::Set, items))
	}

	pub fn dict(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
		Self::Map(Map::new(entries))
	}

	pub fn opaque<T: OpaqueValue + 'static>(value: T) -> Self {
		Self::Opaque(RefCount::from(Box::new(value) as Box<dyn OpaqueValue>))
	}

	/// Gets the name of the type, the way the source language would spell it.
	pub fn type_name(&self) -> &str {
		match self {
			Self::Null => "NoneType",
			Self::Boolean(_) => "bool",
			Self::Integer(_) => "int",
			Self::Float(_) => "float",
			Self::Text(_) => "str",
			Self::List(list) => list.type_name(),
			Self::Map(map) => map.type_name(),
			Self::Array(_) => "ndarray",
			Self::Callable(callable) => callable.type_name(),
			Self::Opaque(opaque) => opaque.type_name(),
		}
	}

	/// An identity for shared values, derived from their address.
	pub fn identity(&self) -> Option<usize> {
		match self {
			Self::Text(text) => Some(text.addr()),
			Self::List(list) => Some(list.addr()),
			Self::Map(map) => Some(map.addr()),
			Self::Array(array) => Some(array.addr()),
			Self::Callable(callable) => Some(callable.addr()),
			Self::Opaque(opaque) => Some(opaque.addr()),
			_ => None,
		}
	}

	/// Whether `self` and `rhs` are the same object.
	pub fn is(&self, rhs: &Self) -> bool {
		match (self, rhs) {
			(Self::Text(lhs), Self::Text(rhs)) => lhs.ptr_eq(rhs),
			(Self::List(lhs), Self::List(rhs)) => lhs.ptr_eq(rhs),
			(Self::Map(lhs), Self::Map(rhs)) => lhs.ptr_eq(rhs),
			(Self::Array(lhs), Self::Array(rhs)) => lhs.ptr_eq(rhs),
			(Self::Callable(lhs), Self::Callable(rhs)) => lhs.ptr_eq(rhs),
			(Self::Opaque(lhs), Self::Opaque(rhs)) => lhs.ptr_eq(rhs),
			(Self::Null, Self::Null) => true,
			(Self::Boolean(lhs), Self::Boolean(rhs)) => lhs == rhs,
			(Self::Integer(lhs), Self::Integer(rhs)) => lhs == rhs,
			_ => false,
		}
	}

	/// Looks up the attribute `name`.
	///
	/// Maps expose their text keys as attributes, callables their `__name__` and
	/// `__qualname__`, and arrays their `shape` and `ndim`.
	pub fn attr(&self, name: &str) -> Result<Self, AttributeError> {
		let found = match (self, name) {
			(Self::Map(map), _) => map.get_text(name),
			(Self::Opaque(opaque), _) => return opaque.attr(name),
			(Self::Callable(callable), "__name__") => Some(callable.name().into()),
			(Self::Callable(callable), "__qualname__") => Some(callable.qualname().into()),
			(Self::Array(array), "shape") => {
				Some(Self::tuple(array.shape().iter().map(|&len| len.into())))
			}
			(Self::Array(array), "ndim") => Some(array.ndim().into()),
			_ => None,
		};

		found.ok_or_else(|| AttributeError::missing(self.type_name(), name))
	}

	/// The value's representation, as the fallback renderer shows it.
	///
	/// # Errors
	/// Only [`Value::Opaque`]s can fail, when the type's own `repr` does.
	pub fn repr(&self) -> Result<String, ReprError> {
		Ok(match self {
			Self::Null => "None".to_owned(),
			Self::Boolean(true) => "True".to_owned(),
			Self::Boolean(false) => "False".to_owned(),
			Self::Integer(int) => int.to_string(),
			Self::Float(float) => float_repr(*float),
			Self::Text(text) => text_repr(text),
			Self::Callable(callable) => callable.bare_repr(),
			Self::Opaque(opaque) => return opaque.repr(),
			Self::List(_) | Self::Map(_) | Self::Array(_) => {
				crate::render::format_plain(self, &crate::render::FormatOptions::default())
			}
		})
	}
}

fn float_repr(float: f64) -> String {
	if float.is_nan() {
		"nan".to_owned()
	} else if float.is_infinite() {
		(if float < 0.0 { "-inf" } else { "inf" }).to_owned()
	} else if float.fract() == 0.0 && float.abs() < 1e16 {
		format!("{float:.1}")
	} else {
		float.to_string()
	}
}

/// Quotes `text` the way the source language's `repr` does: with single quotes, unless the
/// text contains only single quotes.
pub fn text_repr(text: &str) -> String {
	let quote = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
	let mut repr = String::with_capacity(text.len() + 2);
	repr.push(quote);

	for chr in text.chars() {
		match chr {
			'\\' => repr.push_str("\\\\"),
			'\n' => repr.push_str("\\n"),
			'\r' => repr.push_str("\\r"),
			'\t' => repr.push_str("\\t"),
			_ if chr == quote => {
				repr.push('\\');
				repr.push(chr);
			}
			_ if chr.is_control() => {
				let _ = write!(repr, "\\x{:02x}", chr as u32);
			}
			_ => repr.push(chr),
		}
	}

	repr.push(quote);
	repr
}

impl From<()> for Value {
	fn from(_: ()) -> Self {
		Self::Null
	}
}

impl From<bool> for Value {
	fn from(boolean: bool) -> Self {
		Self::Boolean(boolean)
	}
}

impl From<i64> for Value {
	fn from(int: i64) -> Self {
		Self::Integer(int)
	}
}

impl From<i32> for Value {
	fn from(int: i32) -> Self {
		Self::Integer(int.into())
	}
}

impl From<usize> for Value {
	fn from(int: usize) -> Self {
		i64::try_from(int).map_or(Self::Float(int as f64), Self::Integer)
	}
}

impl From<f64> for Value {
	fn from(float: f64) -> Self {
		Self::Float(float)
	}
}

impl From<&str> for Value {
	fn from(text: &str) -> Self {
		Self::Text(RefCount::from(Box::<str>::from(text)))
	}
}

impl From<String> for Value {
	fn from(text: String) -> Self {
		Self::Text(RefCount::from(text.into_boxed_str()))
	}
}

impl From<List> for Value {
	fn from(list: List) -> Self {
		Self::List(list)
	}
}

impl From<Map> for Value {
	fn from(map: Map) -> Self {
		Self::Map(map)
	}
}

impl From<Array> for Value {
	fn from(array: Array) -> Self {
		Self::Array(array)
	}
}

impl From<Callable> for Value {
	fn from(callable: Callable) -> Self {
		Self::Callable(callable.into())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn scalar_reprs() {
		assert_eq!(Value::Null.repr().unwrap(), "None");
		assert_eq!(Value::from(true).repr().unwrap(), "True");
		assert_eq!(Value::from(-3).repr().unwrap(), "-3");
		assert_eq!(Value::from(2.0).repr().unwrap(), "2.0");
		assert_eq!(Value::from(0.25).repr().unwrap(), "0.25");
		assert_eq!(Value::from(f64::NEG_INFINITY).repr().unwrap(), "-inf");
	}

	#[test]
	fn text_reprs() {
		assert_eq!(text_repr("abc"), "'abc'");
		assert_eq!(text_repr("it's"), "\"it's\"");
		assert_eq!(text_repr("'\""), "'\\'\"'");
		assert_eq!(text_repr("a\nb\\"), "'a\\nb\\\\'");
	}

	#[test]
	fn attributes() {
		let inner = Value::dict([("b".into(), 1.into())]);
		let outer = Value::dict([("a".into(), inner.clone())]);

		assert!(outer.attr("a").unwrap().is(&inner));
		assert_eq!(inner.attr("b"), Ok(Value::from(1)));
		assert_matches!(
			Value::from(3).attr("real"),
			Err(AttributeError { kind, message })
				if kind == "AttributeError" && message == "'int' object has no attribute 'real'"
		);

		let callable = Value::from(Callable::function("Spam.eggs"));
		assert_eq!(callable.attr("__name__"), Ok(Value::from("eggs")));

		let array = Value::from(Array::new([2, 3], vec![0.0; 6]).unwrap());
		assert_eq!(array.attr("ndim"), Ok(Value::from(2)));
	}

	#[test]
	fn equality_and_identity() {
		let list = Value::list([1.into()]);

		assert_eq!(Value::from("x"), Value::from("x"));
		assert!(!Value::from("x").is(&Value::from("x")));
		assert_ne!(list, Value::list([1.into()]));
		assert_eq!(list, list.clone());
		assert!(list.identity().is_some());
		assert_eq!(Value::from(1).identity(), None);
	}
}
