use once_cell::sync::Lazy;
use std::collections::HashSet;

static PYTHON_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
	[
		"False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
		"continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
		"if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
		"try", "while", "with", "yield",
	]
	.into_iter()
	.collect()
});

/// The lexical vocabulary of the source being annotated.
///
/// Defaults to a Python-like language: `#` comments, `\` line continuations and `def` headers.
#[derive(Debug, Clone)]
pub struct Lexicon {
	keywords: HashSet<&'static str>,
	header_keywords: HashSet<&'static str>,
	comment: char,
	continuation: char,
	string_prefixes: &'static str,
}

impl Default for Lexicon {
	fn default() -> Self {
		Self::python()
	}
}

impl Lexicon {
	pub fn python() -> Self {
		Self {
			keywords: PYTHON_KEYWORDS.clone(),
			header_keywords: ["def"].into_iter().collect(),
			comment: '#',
			continuation: '\\',
			string_prefixes: "rRbBuUfF",
		}
	}

	/// Creates a lexicon with the given reserved words, and everything else like
	/// [`Lexicon::python`].
	pub fn with_keywords(keywords: impl IntoIterator<Item = &'static str>) -> Self {
		Self { keywords: keywords.into_iter().collect(), ..Self::python() }
	}

	/// Sets which keywords start a function header.
	pub fn header_keywords(mut self, keywords: impl IntoIterator<Item = &'static str>) -> Self {
		self.header_keywords = keywords.into_iter().collect();
		self
	}

	pub fn is_keyword(&self, word: &str) -> bool {
		self.keywords.contains(word)
	}

	pub fn is_header_keyword(&self, word: &str) -> bool {
		self.header_keywords.contains(word)
	}

	pub fn comment(&self) -> char {
		self.comment
	}

	pub fn continuation(&self) -> char {
		self.continuation
	}

	/// Whether `word` is made up only of string prefix letters (eg the `rb` in `rb"..."`).
	pub fn is_string_prefix(&self, word: &str) -> bool {
		word.len() <= 2 && word.chars().all(|chr| self.string_prefixes.contains(chr))
	}
}
