use crate::Result;
use regex::Regex;

/// A set of regexes, any of which may match anywhere in the text.
#[derive(Debug, Clone, Default)]
pub struct Patterns(Vec<Regex>);

impl Patterns {
	/// Compiles every pattern.
	///
	/// # Errors
	/// Returns [`Error::InvalidPattern`](crate::Error::InvalidPattern) for the first pattern
	/// that isn't a valid regex.
	pub fn new<I>(patterns: I) -> Result<Self>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		patterns
			.into_iter()
			.map(|pattern| Regex::new(pattern.as_ref()).map_err(crate::Error::InvalidPattern))
			.collect::<Result<Vec<_>>>()
			.map(Self)
	}

	pub fn is_match(&self, text: &str) -> bool {
		self.0.iter().any(|regex| regex.is_match(text))
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Patterns {
	fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let patterns = Vec::<String>::deserialize(deserializer)?;
		Self::new(patterns).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn matches_anywhere() {
		let patterns = Patterns::new([r"site-packages", r"^/usr/lib"]).unwrap();

		assert!(patterns.is_match("/home/me/.venv/site-packages/numpy/core.py"));
		assert!(patterns.is_match("/usr/lib/python3/os.py"));
		assert!(!patterns.is_match("/home/me/usr/lib/app.py"));
		assert!(!Patterns::default().is_match("anything"));
		assert!(Patterns::default().is_empty() && !patterns.is_empty());
	}

	#[test]
	fn invalid_patterns() {
		assert_matches!(Patterns::new(["(unclosed"]), Err(crate::Error::InvalidPattern(_)));
	}
}
