use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

/// What a [`SourceRegion`] represents, used to pick its highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
	Keyword,
	Operator,
	Identifier,
	Call,
	Comment,
	Raw,
}

/// A slice of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegion {
	pub text: String,
	pub line: usize,
	pub kind: RegionKind,
}

impl SourceRegion {
	pub fn new(text: impl Into<String>, line: usize, kind: RegionKind) -> Self {
		Self { text: text.into(), line, kind }
	}
}

/// Every line of a block, split into regions.
pub type LineMap = BTreeMap<usize, Vec<SourceRegion>>;

/// Concatenates the regions of a line back into its text.
pub fn line_text(regions: &[SourceRegion]) -> String {
	regions.iter().map(|region| region.text.as_str()).collect()
}

/// Where variable names occur.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameIndex {
	names: IndexMap<String, BTreeSet<usize>>,
	lines: BTreeMap<usize, Vec<String>>,
}

impl NameIndex {
	pub fn insert(&mut self, name: &str, line: usize) {
		self.names.entry(name.to_owned()).or_default().insert(line);
		self.lines.entry(line).or_default().push(name.to_owned());
	}

	/// All names, in order of their first occurrence.
	pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
		self.names.keys().map(String::as_str)
	}

	/// The lines `name` occurs on.
	pub fn lines_of(&self, name: &str) -> Option<&BTreeSet<usize>> {
		self.names.get(name)
	}

	/// The names on `line`, in column order; names that occur twice are listed twice.
	pub fn names_on(&self, line: usize) -> &[String] {
		self.lines.get(&line).map_or(&[], Vec::as_slice)
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

/// The lines of a function's signature, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeaderRange {
	pub start: usize,
	pub end: usize,
}

impl HeaderRange {
	pub fn lines(&self) -> RangeInclusive<usize> {
		self.start..=self.end
	}
}
