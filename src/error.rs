use std::io;
use thiserror::Error;

/// All errors that can occur while rendering stacks.
///
/// Most failures are expected and handled where they occur (undefined names are omitted,
/// failed attribute lookups are recorded as data, broken `repr`s get a placeholder); what's
/// left here is everything that stops a component from producing its output.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The source couldn't be split into tokens.
	#[error("line {line}: {kind}")]
	Lex { line: usize, kind: LexErrorKind },

	/// Tabs and spaces were both used to indent the selected source lines.
	#[error("line {line}: mixed tabs and spaces in indentation")]
	MixedIndentation { line: usize },

	/// The source text for a location couldn't be retrieved.
	#[error("no source for {location}: {reason}")]
	SourceUnavailable { location: String, reason: io::Error },

	/// A suppression pattern isn't a valid regex.
	#[error("invalid pattern: {0}")]
	InvalidPattern(#[from] regex::Error),

	/// A configuration option was given a value it doesn't accept.
	#[error("invalid value {value:?} for option `{option}`")]
	InvalidOption { option: &'static str, value: String },

	/// Rendering panicked; the payload's message, if it had one.
	#[error("panicked while rendering: {0}")]
	RenderPanic(String),
}

/// The reason a [`Error::Lex`] occurred.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LexErrorKind {
	/// A single-quoted string ran into the end of its line.
	#[error("unterminated {quote} string")]
	UnterminatedString { quote: char },

	/// A triple-quoted string ran into the end of the block.
	#[error("unterminated triple-quoted string")]
	UnterminatedTripleQuote,
}

impl LexErrorKind {
	/// Helper function to create a new [`Error`].
	pub fn error(self, line: usize) -> Error {
		Error::Lex { line, kind: self }
	}
}

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
