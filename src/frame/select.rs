use super::FrameRecord;
use crate::config::{Patterns, ShowVals, SourceLines};
use crate::resolve::{Binding, BoundValue};
use crate::source::SourceRegion;
use crate::value::Value;
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Picks the source lines of a frame to show.
///
/// The lines are a window of `source_lines` lines ending at the highlighted line, plus
/// `lines_after` lines after it, clamped to the lines the frame has source for. With
/// `show_signature`, the function's signature is always included.
pub fn visible_lines(
	record: &FrameRecord,
	source_lines: SourceLines,
	lines_after: usize,
	show_signature: bool,
) -> Vec<usize> {
	let Some((first, last)) = record.line_range() else {
		return Vec::new();
	};
	let highlighted = record.highlighted_line;

	let mut lines = match source_lines {
		SourceLines::Count(0) => BTreeSet::new(),
		SourceLines::Count(1) => BTreeSet::from([highlighted]),
		SourceLines::All => (first..=last).collect(),
		SourceLines::Count(count) => {
			let start = highlighted.saturating_sub(count - 1).max(first);
			let stop = (highlighted + lines_after).min(last);
			(start..=stop).collect()
		}
	};

	if show_signature && matches!(source_lines, SourceLines::Count(2..) | SourceLines::All) {
		lines.extend(record.header.iter().flat_map(|header| header.lines()));
	}

	lines.into_iter().filter(|line| record.line_map.contains_key(line)).collect()
}

/// Whether a binding adds nothing to the trace: builtin functions, functions bound to their own
/// name and functions from suppressed locations.
fn is_boring(binding: &Binding, suppressed_paths: &Patterns) -> bool {
	let BoundValue::Value(Value::Callable(callable)) = &binding.value else {
		return false;
	};

	callable.is_builtin()
		|| callable.qualname() == binding.name
		|| callable.file().is_some_and(|file| suppressed_paths.is_match(file))
}

/// Picks the variables of a frame to show, when `lines` are the visible source lines.
pub fn visible_bindings<'r>(
	record: &'r FrameRecord,
	lines: &[usize],
	show_vals: ShowVals,
	suppressed_paths: &Patterns,
) -> Vec<&'r Binding> {
	let occurs_on = |binding: &Binding, wanted: &[usize]| {
		record
			.names
			.lines_of(&binding.name)
			.is_some_and(|occurrences| wanted.iter().any(|line| occurrences.contains(line)))
	};

	record
		.bindings
		.values()
		.filter(|binding| match show_vals {
			ShowVals::All => true,
			ShowVals::LikeSource => occurs_on(binding, lines),
			ShowVals::Line => occurs_on(binding, &[record.highlighted_line]),
			ShowVals::None => false,
		})
		.filter(|binding| !is_boring(binding, suppressed_paths))
		.collect()
}

fn leading_whitespace(text: &str) -> &str {
	&text[..text.len() - text.trim_start_matches([' ', '\t']).len()]
}

/// Removes the indentation that all of `lines` share.
///
/// Lines with nothing but whitespace don't count towards the shared indentation.
///
/// # Errors
/// Returns [`Error::MixedIndentation`] if some of the lines are indented with tabs and others
/// with spaces.
pub fn trim_indentation(
	line_map: &BTreeMap<usize, Vec<SourceRegion>>,
	lines: &[usize],
) -> Result<BTreeMap<usize, Vec<SourceRegion>>> {
	let mut indent_char = None;
	let mut min_indent = usize::MAX;

	for &line in lines {
		let Some(first) = line_map.get(&line).and_then(|regions| regions.first()) else {
			continue;
		};

		if first.text.trim().is_empty() {
			continue;
		}

		let indent = leading_whitespace(&first.text);
		for chr in indent.chars() {
			match indent_char {
				Some(expected) if expected != chr => return Err(Error::MixedIndentation { line }),
				_ => indent_char = Some(chr),
			}
		}

		min_indent = min_indent.min(indent.len());
	}

	let min_indent = if min_indent == usize::MAX { 0 } else { min_indent };
	let mut trimmed = BTreeMap::new();

	for &line in lines {
		let Some(regions) = line_map.get(&line) else { continue };
		let mut regions = regions.clone();

		if let Some(first) = regions.first_mut() {
			let strip = leading_whitespace(&first.text).len().min(min_indent);
			first.text.drain(..strip);
		}

		trimmed.insert(line, regions);
	}

	Ok(trimmed)
}
