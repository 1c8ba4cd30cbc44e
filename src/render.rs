//! Turning values into bounded, human-readable text.

mod array;
mod iterable;

use crate::resolve::{BoundValue, UnresolvedAttribute};
use crate::value::Value;

/// Dict keys are cut to this many characters.
pub const MAXLEN_DICT_KEY_REPR: usize = 25;

/// No more than this many elements of a container are rendered.
pub const MAX_ITEMS: usize = 100;

/// Containers whose rendering is longer than this get their length prefixed.
pub const ANNOTATE_THRESHOLD: usize = 50;

/// What's shown in place of values whose names are suppressed.
pub const CENSORED: &str = "******";

/// What's shown when a value can't be turned into text at all.
pub const REPR_FAILED: &str = "# error calling repr and str";

/// How a value should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
	/// Every line after the first is indented by this many spaces.
	pub indent: usize,

	/// The maximum number of characters, or `None` for no limit.
	pub truncation: Option<usize>,

	/// Lines longer than this are wrapped; `0` disables wrapping.
	pub wrap: usize,

	/// Values nested this deep are replaced by `...`.
	pub max_depth: usize,

	pub depth: usize,
}

impl Default for FormatOptions {
	fn default() -> Self {
		Self { indent: 0, truncation: None, wrap: 0, max_depth: 3, depth: 0 }
	}
}

impl FormatOptions {
	/// The options for a value nested in this one.
	pub fn nested(&self, indent: usize) -> Self {
		Self { indent, depth: self.depth + 1, ..*self }
	}

	/// Whether the contents of a container rendered with these options would be elided.
	fn children_elided(&self) -> bool {
		self.depth + 1 >= self.max_depth
	}
}

/// Renders a bound value.
pub fn format_value(value: &BoundValue, opts: &FormatOptions) -> String {
	match value {
		BoundValue::Value(value) => format_plain(value, opts),
		BoundValue::Censored => CENSORED.to_owned(),
		BoundValue::Unresolved(_) if opts.depth >= opts.max_depth => "...".to_owned(),
		BoundValue::Unresolved(unresolved) => finish(format_unresolved(unresolved, opts), opts),
	}
}

/// Renders a value.
pub fn format_plain(value: &Value, opts: &FormatOptions) -> String {
	if opts.depth >= opts.max_depth {
		return "...".to_owned();
	}

	let rendered = match value {
		Value::List(list) => iterable::format_list(list, opts),
		Value::Map(map) => iterable::format_map(map, opts),
		Value::Array(array) => array::format_array(array, opts.depth > 0),
		Value::Callable(callable) => match (callable.file_name(), callable.line()) {
			(Some(file), Some(line)) => match callable.owner() {
				Some(owner) => {
					format!("<method '{}' of {owner} {file}:{line}>", callable.qualname())
				}
				None => format!("<function '{}' {file}:{line}>", callable.qualname()),
			},
			_ => callable.bare_repr(),
		},
		Value::Opaque(opaque) => opaque
			.repr()
			.or_else(|_| opaque.display())
			.unwrap_or_else(|_| REPR_FAILED.to_owned()),
		other => other.repr().unwrap_or_else(|_| REPR_FAILED.to_owned()),
	};

	finish(rendered, opts)
}

fn format_unresolved(unresolved: &UnresolvedAttribute, opts: &FormatOptions) -> String {
	let last_good = format_plain(&unresolved.last_good, &opts.nested(3));
	format!("# {}\n{} = {last_good}", unresolved.failure_kind, unresolved.last_good_name())
}

fn finish(rendered: String, opts: &FormatOptions) -> String {
	let mut rendered = match opts.truncation {
		Some(max) => truncate(&rendered, max),
		None => rendered,
	};

	if opts.depth == 0 {
		rendered = wrap_lines(&rendered, opts.wrap);
	}

	if opts.indent > 0 {
		rendered = rendered.replace('\n', &format!("\n{}", " ".repeat(opts.indent)));
	}

	rendered
}

/// Cuts `text` to `max` characters, marking the cut with `...`. A `max` of zero leaves the
/// text as it is.
pub fn truncate(text: &str, max: usize) -> String {
	if max == 0 {
		return text.to_owned();
	}

	match text.char_indices().nth(max) {
		Some((end, _)) => format!("{}...", text[..end].trim_end()),
		None => text.to_owned(),
	}
}

/// Splits every line longer than `width` characters into chunks of `width` characters; all but
/// the first chunk start with a space. A `width` of zero leaves the text as it is.
pub fn wrap_lines(text: &str, width: usize) -> String {
	if width == 0 {
		return text.to_owned();
	}

	let mut wrapped = Vec::new();
	for line in text.split('\n') {
		let chars = line.chars().collect::<Vec<_>>();

		if chars.len() <= width {
			wrapped.push(line.to_owned());
			continue;
		}

		for (idx, chunk) in chars.chunks(width).enumerate() {
			let prefix = if idx == 0 { "" } else { " " };
			wrapped.push(format!("{prefix}{}", chunk.iter().collect::<String>()));
		}
	}

	wrapped.join("\n")
}
