use super::{
	format_plain, truncate, FormatOptions, ANNOTATE_THRESHOLD, MAXLEN_DICT_KEY_REPR, MAX_ITEMS,
};
use crate::value::{List, Map};

fn reached_limit(count: usize, chars: usize, opts: &FormatOptions) -> bool {
	count >= MAX_ITEMS || opts.truncation.is_some_and(|max| chars >= max)
}

/// Renders the elements of a sequence, comma separated. Elements spanning several lines are
/// put on lines of their own.
pub fn format_list(list: &List, opts: &FormatOptions) -> String {
	let (open, close) = list.kind().brackets();
	let len = list.len();
	let elided = opts.children_elided();

	let mut body = String::new();
	if elided {
		body.push_str("...");
	} else {
		let mut linebreak = false;
		let mut chars = 0;

		for (idx, item) in list.head(MAX_ITEMS + 1).iter().enumerate() {
			if reached_limit(idx, chars, opts) {
				body.push_str("...");
				break;
			}

			let entry = format_plain(item, &opts.nested(1));
			let sep = if idx + 1 < len { ", " } else { "" };

			let item_str = if entry.contains('\n') {
				linebreak = true;
				format!("\n {entry}{sep}")
			} else if std::mem::take(&mut linebreak) {
				format!("\n{entry}{sep}")
			} else {
				format!("{entry}{sep}")
			};

			chars += item_str.chars().count();
			body.push_str(&item_str);
		}
	}

	let form = format!("{open}{body}{close}");
	if elided || form.chars().count() > ANNOTATE_THRESHOLD {
		format!("{}({len}) {form}", list.type_name())
	} else if let Some(name) = list.custom_name() {
		format!("{name} {form}")
	} else {
		form
	}
}

/// Renders the entries of a mapping, one per line.
pub fn format_map(map: &Map, opts: &FormatOptions) -> String {
	let prefix = map.custom_name().map_or_else(|| "{".to_owned(), |name| format!("{name}\n{{"));

	if opts.children_elided() {
		return format!("{prefix}...}}");
	}

	let mut entries = Vec::new();
	let mut chars = 0;

	for (idx, (key, value)) in map.head(MAX_ITEMS + 1).iter().enumerate() {
		if reached_limit(idx, chars, opts) {
			entries.push("...".to_owned());
			break;
		}

		let key = truncate(&format_plain(key, &opts.nested(0)), MAXLEN_DICT_KEY_REPR);
		let value = format_plain(value, &opts.nested(key.chars().count() + 3));
		let entry = format!("{key}: {value}");

		chars += entry.chars().count();
		entries.push(entry);
	}

	format!("{prefix}{}}}", entries.join(",\n "))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::{ListKind, Value};

	fn plain(value: &Value) -> String {
		format_plain(value, &FormatOptions::default())
	}

	#[test]
	fn sequences() {
		let items = || [Value::from(1), Value::from("two"), Value::Null];

		assert_eq!(plain(&Value::list(items())), "[1, 'two', None]");
		assert_eq!(plain(&Value::tuple(items())), "(1, 'two', None)");
		assert_eq!(plain(&Value::set(items())), "{1, 'two', None}");
		assert_eq!(plain(&Value::list([])), "[]");
		let stack = List::named(ListKind::List, "Stack", items());
		assert_eq!(plain(&stack.into()), "Stack [1, 'two', None]");
	}

	#[test]
	fn nested_sequences_are_elided() {
		let value = Value::list([Value::list([Value::list([1.into(), 2.into(), 3.into()])])]);
		assert_eq!(plain(&value), "[[list(3) [...]]]");
	}

	#[test]
	fn long_sequences_are_annotated() {
		let value = Value::list((0..30).map(Value::from));
		let rendered = plain(&value);

		assert!(rendered.starts_with("list(30) [0, 1, 2"));
		assert!(rendered.ends_with("28, 29]"));
	}

	#[test]
	fn sequences_stop_at_the_truncation_bound() {
		let opts = FormatOptions { truncation: Some(10), ..FormatOptions::default() };
		let value = Value::list((0..30).map(Value::from));

		assert_eq!(format_plain(&value, &opts), "[0, 1, 2,...");
	}

	#[test]
	fn multiline_entries_get_their_own_lines() {
		let map = Value::dict([("a".into(), 1.into()), ("b".into(), 2.into())]);
		let value = Value::list([1.into(), map, 2.into()]);

		assert_eq!(plain(&value), "[1, \n {'a': 1,\n  'b': 2}, \n2]");
	}

	#[test]
	fn cycles_terminate() {
		let list = List::new(ListKind::List, [Value::from(1)]);
		list.push(list.clone());
		assert_eq!(plain(&list.into()), "[1, [1, list(2) [...]]]");

		let map = Map::new([]);
		map.insert("self", map.clone());
		assert_eq!(plain(&map.into()), "{'self': {'self': {...}}}");
	}

	#[test]
	fn maps() {
		let map = Value::dict([
			("a".into(), 1.into()),
			("a rather long key that goes on and on".into(), Value::list([1.into(), 2.into()])),
		]);

		assert_eq!(plain(&map), "{'a': 1,\n 'a rather long key that g...: [1, 2]}");
		let counter = Map::named("Counter", [("x".into(), 2.into())]);
		assert_eq!(plain(&counter.into()), "Counter\n{'x': 2}");
	}
}
