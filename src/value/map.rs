use crate::value::Value;
use crate::{Mutable, RefCount};
use std::fmt::{self, Debug, Formatter};

/// An insertion-ordered mapping of keys to values.
///
/// Like [`List`](crate::value::List)s, maps are shared and mutable, and so can be cyclic.
#[derive(Clone)]
pub struct Map(RefCount<Inner>);

struct Inner {
	type_name: Option<String>,
	entries: Mutable<Vec<(Value, Value)>>,
}

impl Debug for Map {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(f, "Map({}, len={})", self.type_name(), self.len())
	}
}

impl Default for Map {
	fn default() -> Self {
		Self::new([])
	}
}

impl Map {
	pub fn new(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
		Self(Inner { type_name: None, entries: Mutable::from(collect_unique(entries)) }.into())
	}

	/// Creates a map of a user-defined mapping type called `type_name`.
	pub fn named(
		type_name: impl Into<String>,
		entries: impl IntoIterator<Item = (Value, Value)>,
	) -> Self {
		let entries = Mutable::from(collect_unique(entries));
		Self(Inner { type_name: Some(type_name.into()), entries }.into())
	}

	pub fn custom_name(&self) -> Option<&str> {
		self.0.type_name.as_deref()
	}

	pub fn type_name(&self) -> &str {
		self.custom_name().unwrap_or("dict")
	}

	pub fn len(&self) -> usize {
		self.0.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Sets `key` to `value`, keeping the key's original position if it was already present.
	pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) {
		let (key, value) = (key.into(), value.into());
		let mut entries = self.0.entries.write();

		match entries.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, slot)) => *slot = value,
			None => entries.push((key, value)),
		}
	}

	pub fn get(&self, key: &Value) -> Option<Value> {
		self.0
			.entries
			.read()
			.iter()
			.find(|(existing, _)| existing == key)
			.map(|(_, value)| value.clone())
	}

	/// Looks up the value of the text key `key`.
	pub fn get_text(&self, key: &str) -> Option<Value> {
		self.0
			.entries
			.read()
			.iter()
			.find(|(existing, _)| matches!(existing, Value::Text(text) if &**text == key))
			.map(|(_, value)| value.clone())
	}

	/// The first `limit` entries, cloned out of the map.
	pub fn head(&self, limit: usize) -> Vec<(Value, Value)> {
		self.0.entries.read().iter().take(limit).cloned().collect()
	}

	pub fn ptr_eq(&self, rhs: &Self) -> bool {
		self.0.ptr_eq(&rhs.0)
	}

	pub fn addr(&self) -> usize {
		self.0.addr()
	}
}

fn collect_unique(entries: impl IntoIterator<Item = (Value, Value)>) -> Vec<(Value, Value)> {
	let mut unique = Vec::<(Value, Value)>::new();

	for (key, value) in entries {
		match unique.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, slot)) => *slot = value,
			None => unique.push((key, value)),
		}
	}

	unique
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_keeps_position() {
		let map = Map::new([("a".into(), 1.into()), ("b".into(), 2.into())]);
		map.insert("a", 3);

		let entries = map.head(10);
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0], (Value::from("a"), Value::from(3)));
		assert_eq!(map.get_text("b"), Some(Value::from(2)));
		assert_eq!(map.get(&Value::from(1)), None);
	}

	#[test]
	fn duplicate_keys_are_merged() {
		let map = Map::new([(1.into(), "x".into()), (1.into(), "y".into())]);

		assert_eq!(map.len(), 1);
		assert_eq!(map.get(&1.into()), Some(Value::from("y")));
	}
}
