//! Everything that changes how traces are rendered.

mod builder;
mod patterns;

pub use builder::Builder;
pub use patterns::Patterns;

use crate::color::{ColorMode, Scheme};
use crate::source::Lexicon;
use crate::{Error, Result};
use std::str::FromStr;

/// How many source lines to show per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLines {
	/// Every line the frame's source covers.
	All,

	/// A window of this many lines, ending at the highlighted one.
	Count(usize),
}

impl Default for SourceLines {
	fn default() -> Self {
		Self::Count(5)
	}
}

impl FromStr for SourceLines {
	type Err = Error;

	fn from_str(lines: &str) -> Result<Self> {
		match lines {
			"all" => Ok(Self::All),
			_ => lines
				.parse()
				.map(Self::Count)
				.map_err(|_| Error::InvalidOption {
					option: "source_lines",
					value: lines.to_owned(),
				}),
		}
	}
}

/// Which variables to show per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum ShowVals {
	/// Every variable in the frame's source.
	All,

	/// Variables occurring in the visible source lines.
	#[default]
	LikeSource,

	/// Variables occurring on the highlighted line.
	Line,

	None,
}

impl FromStr for ShowVals {
	type Err = Error;

	fn from_str(show: &str) -> Result<Self> {
		match show {
			"all" => Ok(Self::All),
			"like_source" => Ok(Self::LikeSource),
			"line" => Ok(Self::Line),
			"none" => Ok(Self::None),
			_ => Err(Error::InvalidOption { option: "show_vals", value: show.to_owned() }),
		}
	}
}

impl TryFrom<String> for ShowVals {
	type Error = Error;

	fn try_from(show: String) -> Result<Self> {
		show.parse()
	}
}

/// When to add a compact summary of the stack after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddSummary {
	/// Only if the full trace is long.
	#[default]
	Auto,
	Always,
	Never,
}

impl FromStr for AddSummary {
	type Err = Error;

	fn from_str(add: &str) -> Result<Self> {
		match add {
			"auto" => Ok(Self::Auto),
			"always" | "true" => Ok(Self::Always),
			"never" | "false" => Ok(Self::Never),
			_ => Err(Error::InvalidOption { option: "add_summary", value: add.to_owned() }),
		}
	}
}

impl From<bool> for AddSummary {
	fn from(add: bool) -> Self {
		if add {
			Self::Always
		} else {
			Self::Never
		}
	}
}

/// Whether to print escape codes, and with which colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum Style {
	#[default]
	Plaintext,
	Color(Scheme),
}

impl Style {
	pub fn scheme(self) -> Option<Scheme> {
		match self {
			Self::Plaintext => None,
			Self::Color(scheme) => Some(scheme),
		}
	}
}

impl FromStr for Style {
	type Err = Error;

	fn from_str(style: &str) -> Result<Self> {
		match style {
			"plaintext" => Ok(Self::Plaintext),
			_ => style.parse().map(Self::Color),
		}
	}
}

impl TryFrom<String> for Style {
	type Error = Error;

	fn try_from(style: String) -> Result<Self> {
		style.parse()
	}
}

/// The options traces are rendered with; see [`Builder`] for their meanings and defaults.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Config {
	pub source_lines: SourceLines,
	pub source_lines_after: usize,
	pub show_signature: bool,
	pub show_vals: ShowVals,
	pub truncate_vals: Option<usize>,
	pub line_wrap: usize,
	pub reverse: bool,
	pub suppressed_paths: Patterns,
	pub suppressed_vars: Patterns,
	pub suppressed_error_types: Vec<String>,
	pub add_summary: AddSummary,
	pub style: Style,
	pub color_mode: ColorMode,
	pub debug: bool,

	#[cfg_attr(feature = "serde", serde(skip))]
	pub lexicon: Lexicon,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			source_lines: SourceLines::default(),
			source_lines_after: 1,
			show_signature: true,
			show_vals: ShowVals::default(),
			truncate_vals: Some(500),
			line_wrap: 60,
			reverse: false,
			suppressed_paths: Patterns::default(),
			suppressed_vars: Patterns::default(),
			suppressed_error_types: Vec::new(),
			add_summary: AddSummary::default(),
			style: Style::default(),
			color_mode: ColorMode::default(),
			debug: false,
			lexicon: Lexicon::default(),
		}
	}
}

impl Config {
	pub fn builder() -> Builder {
		Builder::default()
	}

	/// Whether failures while rendering should panic instead of falling back to a plain trace,
	/// either because [`debug`](Self::debug) is set or because `STACKRS_DEBUG` is.
	pub fn debug_enabled(&self) -> bool {
		self.debug
			|| std::env::var_os("STACKRS_DEBUG").is_some_and(|var| !var.is_empty() && var != "0")
	}
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SourceLines {
	fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(serde::Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Count(usize),
			Name(String),
		}

		match Repr::deserialize(deserializer)? {
			Repr::Count(count) => Ok(Self::Count(count)),
			Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
		}
	}
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AddSummary {
	fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(serde::Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Flag(bool),
			Name(String),
		}

		match Repr::deserialize(deserializer)? {
			Repr::Flag(flag) => Ok(flag.into()),
			Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn parses_options() {
		assert_eq!("all".parse::<SourceLines>().unwrap(), SourceLines::All);
		assert_eq!("3".parse::<SourceLines>().unwrap(), SourceLines::Count(3));
		assert_matches!(
			"lots".parse::<SourceLines>(),
			Err(Error::InvalidOption { option: "source_lines", .. })
		);

		assert_eq!("like_source".parse::<ShowVals>().unwrap(), ShowVals::LikeSource);
		assert_eq!("false".parse::<AddSummary>().unwrap(), AddSummary::Never);
		assert_eq!("plaintext".parse::<Style>().unwrap(), Style::Plaintext);
		assert_eq!("darkbg3".parse::<Style>().unwrap(), Style::Color(Scheme::DarkBg3));
		assert_matches!(
			"sepia".parse::<Style>(),
			Err(Error::InvalidOption { option: "style", .. })
		);
	}

	#[test]
	fn defaults() {
		let config = Config::default();

		assert_eq!(config.source_lines, SourceLines::Count(5));
		assert_eq!(config.source_lines_after, 1);
		assert_eq!(config.truncate_vals, Some(500));
		assert_eq!(config.line_wrap, 60);
		assert_eq!(config.show_vals, ShowVals::LikeSource);
		assert_eq!(config.add_summary, AddSummary::Auto);
		assert_eq!(config.color_mode, ColorMode::Id);
	}

	#[cfg(feature = "serde")]
	#[test]
	fn deserializes() {
		let config: Config = serde_json::from_str(
			r#"{
				"source_lines": "all",
				"show_vals": "line",
				"add_summary": false,
				"style": "lightbg",
				"suppressed_paths": ["site-packages"]
			}"#,
		)
		.unwrap();

		assert_eq!(config.source_lines, SourceLines::All);
		assert_eq!(config.show_vals, ShowVals::Line);
		assert_eq!(config.add_summary, AddSummary::Never);
		assert_eq!(config.style, Style::Color(Scheme::LightBg));
		assert!(config.suppressed_paths.is_match("/lib/site-packages/x.py"));
		assert_eq!(config.line_wrap, 60);

		assert!(serde_json::from_str::<Config>(r#"{"suppressed_vars": ["("]}"#).is_err());
	}
}
