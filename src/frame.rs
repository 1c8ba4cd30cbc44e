//! Snapshots of execution contexts, and rendering them as frames of a trace.

mod formatter;
mod select;

pub use formatter::{FrameConfig, FrameFormatter};
pub use select::{trim_indentation, visible_bindings, visible_lines};

use crate::config::Patterns;
use crate::resolve::{resolve_bindings, Binding, NameResolver};
use crate::source::{annotate, Annotation, HeaderRange, LineMap, Lexicon, NameIndex};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::path::Path;

/// Scopes that aren't functions, and so have no signature.
pub const NON_FUNCTION_SCOPES: [&str; 6] =
	["<module>", "<lambda>", "<listcomp>", "<genexpr>", "<setcomp>", "<dictcomp>"];

/// Whether a scope called `scope_name` is a function with a signature.
pub fn is_function_scope(scope_name: &str) -> bool {
	!NON_FUNCTION_SCOPES.contains(&scope_name)
}

/// A block of source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
	/// The lines, including their terminators.
	pub lines: Vec<String>,

	/// The line number of `lines[0]`.
	pub first_line: usize,
}

impl SourceText {
	pub fn new(text: &str, first_line: usize) -> Self {
		Self { lines: text.split_inclusive('\n').map(str::to_owned).collect(), first_line }
	}

	/// Reads a whole file; its first line is line 1.
	///
	/// # Errors
	/// Returns [`Error::SourceUnavailable`] if the file can't be read.
	pub fn read(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();

		std::fs::read_to_string(path)
			.map(|text| Self::new(&text, 1))
			.map_err(|reason| Error::SourceUnavailable {
				location: path.display().to_string(),
				reason,
			})
	}

	pub fn last_line(&self) -> usize {
		(self.first_line + self.lines.len()).saturating_sub(1)
	}

	/// The innermost function definition containing `line`: from its header down to the last
	/// line indented deeper than the header. `None` if `line` isn't inside a function.
	pub fn enclosing_function(&self, line: usize, lexicon: &Lexicon) -> Option<Self> {
		let target = line.checked_sub(self.first_line).filter(|&idx| idx < self.lines.len())?;
		let indent_of = |idx: usize| block_indentation(&self.lines[idx], lexicon);

		let mut innermost = usize::MAX;
		let start = (0..=target).rev().find(|&idx| match indent_of(idx) {
			Some(indent) if indent < innermost && opens_header(&self.lines[idx], lexicon) => true,
			Some(indent) => {
				innermost = innermost.min(indent);
				false
			}
			None => false,
		})?;

		let header_indent = indent_of(start)?;
		let mut end = (target + 1..self.lines.len())
			.find(|&idx| indent_of(idx).is_some_and(|indent| indent <= header_indent))
			.unwrap_or(self.lines.len());

		while end > target + 1 && self.lines[end - 1].trim().is_empty() {
			end -= 1;
		}

		Some(Self { lines: self.lines[start..end].to_vec(), first_line: self.first_line + start })
	}
}

/// How far `line` is indented, or `None` if it doesn't affect which block it's in: blank
/// lines, comments and lines starting with a closing bracket.
fn block_indentation(line: &str, lexicon: &Lexicon) -> Option<usize> {
	let content = line.trim_start();

	match content.chars().next() {
		None | Some(')' | ']' | '}') => None,
		Some(chr) if chr == lexicon.comment() => None,
		Some(_) => Some(line.len() - content.len()),
	}
}

fn opens_header(line: &str, lexicon: &Lexicon) -> bool {
	let mut words = line
		.split(|chr: char| !chr.is_alphanumeric() && chr != '_')
		.filter(|word| !word.is_empty());

	match words.next() {
		Some("async") => words.next().is_some_and(|word| lexicon.is_header_keyword(word)),
		Some(word) => lexicon.is_header_keyword(word),
		None => false,
	}
}

/// Everything known about an execution context at one point in time.
pub struct Snapshot<'s> {
	/// Where the code lives, usually a file path.
	pub location: String,
	pub scope_name: String,

	/// The line being executed.
	pub highlighted_line: usize,

	pub source: Option<SourceText>,

	/// Why there's no source, if retrieving it failed.
	pub source_error: Option<String>,

	pub locals: &'s dyn NameResolver,
	pub globals: &'s dyn NameResolver,
}

impl<'s> Snapshot<'s> {
	pub fn new(
		location: impl Into<String>,
		scope_name: impl Into<String>,
		highlighted_line: usize,
		locals: &'s dyn NameResolver,
		globals: &'s dyn NameResolver,
	) -> Self {
		Self {
			location: location.into(),
			scope_name: scope_name.into(),
			highlighted_line,
			source: None,
			source_error: None,
			locals,
			globals,
		}
	}

	#[must_use]
	pub fn with_source(mut self, source: SourceText) -> Self {
		self.source = Some(source);
		self
	}

	/// Reads the source from the file at [`location`](Self::location). If that fails, the
	/// frame will be rendered without source.
	#[must_use]
	pub fn read_source(self) -> Self {
		self.read_source_with(&Lexicon::default())
	}

	/// Like [`read_source`](Self::read_source). Function scopes only keep the function
	/// containing the highlighted line, other scopes keep the whole file.
	#[must_use]
	pub fn read_source_with(mut self, lexicon: &Lexicon) -> Self {
		match SourceText::read(&self.location) {
			Ok(source) if is_function_scope(&self.scope_name) => {
				let function = source.enclosing_function(self.highlighted_line, lexicon);
				self.source = Some(function.unwrap_or(source));
			}
			Ok(source) => self.source = Some(source),
			Err(err) => {
				tracing::warn!(location = %self.location, %err, "source unavailable");
				self.source_error = Some(err.to_string());
			}
		}

		self
	}
}

/// One frame of a trace, with its source split into regions and its variables resolved.
#[derive(Debug, Clone)]
pub struct FrameRecord {
	pub location: String,
	pub scope_name: String,
	pub highlighted_line: usize,
	pub line_map: LineMap,
	pub names: NameIndex,
	pub header: Option<HeaderRange>,
	pub bindings: IndexMap<String, Binding>,

	/// Why the source couldn't be shown, if it can't.
	pub source_error: Option<String>,
}

impl FrameRecord {
	/// Inspects a snapshot, lexing its source as Python.
	pub fn inspect(snapshot: &Snapshot<'_>, suppressed_vars: &Patterns) -> Self {
		Self::inspect_with(snapshot, suppressed_vars, &Lexicon::default())
	}

	pub fn inspect_with(
		snapshot: &Snapshot<'_>,
		suppressed_vars: &Patterns,
		lexicon: &Lexicon,
	) -> Self {
		let mut source_error = snapshot.source_error.clone();
		let unannotated =
			|| Annotation { highlighted: snapshot.highlighted_line, ..Annotation::default() };

		let annotation = match &snapshot.source {
			Some(source) => {
				annotate(&source.lines, source.first_line, snapshot.highlighted_line, lexicon)
					.unwrap_or_else(|err| {
						tracing::warn!(location = %snapshot.location, %err, "couldn't lex source");
						source_error = Some(err.to_string());
						unannotated()
					})
			}
			None => unannotated(),
		};

		let header = annotation.header.filter(|_| is_function_scope(&snapshot.scope_name));
		let names = annotation.names.names();
		let bindings = resolve_bindings(names, snapshot.locals, snapshot.globals, suppressed_vars);

		Self {
			location: snapshot.location.clone(),
			scope_name: snapshot.scope_name.clone(),
			highlighted_line: annotation.highlighted,
			line_map: annotation.line_map,
			names: annotation.names,
			header,
			bindings,
			source_error,
		}
	}

	/// The first and last line of the frame's source, if it has any.
	pub fn line_range(&self) -> Option<(usize, usize)> {
		Some((*self.line_map.keys().next()?, *self.line_map.keys().next_back()?))
	}
}
