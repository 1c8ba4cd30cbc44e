use super::*;

/// A Builder for a [`Config`], validating its patterns when it's built.
#[must_use]
#[derive(Debug, Clone)]
pub struct Builder {
	config: Config,
	suppressed_paths: Vec<String>,
	suppressed_vars: Vec<String>,
}

impl Default for Builder {
	fn default() -> Self {
		Self {
			config: Config::default(),
			suppressed_paths: Vec::new(),
			suppressed_vars: Vec::new(),
		}
	}
}

impl Builder {
	/// How many lines of source to show per frame, ending at the highlighted line. Defaults to 5.
	pub fn source_lines(&mut self, lines: SourceLines) -> &mut Self {
		self.config.source_lines = lines;
		self
	}

	/// How many lines to show after the highlighted one. Defaults to 1.
	pub fn source_lines_after(&mut self, lines: usize) -> &mut Self {
		self.config.source_lines_after = lines;
		self
	}

	/// Whether function signatures are always shown, however far from the highlighted line they
	/// are. Defaults to `true`.
	pub fn show_signature(&mut self, show: bool) -> &mut Self {
		self.config.show_signature = show;
		self
	}

	pub fn show_vals(&mut self, show: ShowVals) -> &mut Self {
		self.config.show_vals = show;
		self
	}

	/// The maximum length of a rendered value, `None` (or 0) for unlimited. Defaults to 500.
	pub fn truncate_vals(&mut self, max: Option<usize>) -> &mut Self {
		self.config.truncate_vals = max;
		self
	}

	/// Where to wrap long lines of rendered values; 0 disables wrapping. Defaults to 60.
	pub fn line_wrap(&mut self, width: usize) -> &mut Self {
		self.config.line_wrap = width;
		self
	}

	/// Whether to show the innermost frame first.
	pub fn reverse(&mut self, reverse: bool) -> &mut Self {
		self.config.reverse = reverse;
		self
	}

	/// Frames whose location matches one of these regexes are rendered briefly.
	pub fn suppressed_paths<I>(&mut self, patterns: I) -> &mut Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		self.suppressed_paths.extend(patterns.into_iter().map(Into::into));
		self
	}

	/// Variables whose name matches one of these regexes have their value censored.
	pub fn suppressed_vars<I>(&mut self, patterns: I) -> &mut Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		self.suppressed_vars.extend(patterns.into_iter().map(Into::into));
		self
	}

	/// Errors of these types are only rendered as a summary.
	pub fn suppressed_error_types<I>(&mut self, types: I) -> &mut Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		self.config.suppressed_error_types.extend(types.into_iter().map(Into::into));
		self
	}

	pub fn add_summary(&mut self, add: AddSummary) -> &mut Self {
		self.config.add_summary = add;
		self
	}

	pub fn style(&mut self, style: Style) -> &mut Self {
		self.config.style = style;
		self
	}

	pub fn color_mode(&mut self, mode: ColorMode) -> &mut Self {
		self.config.color_mode = mode;
		self
	}

	/// Panic when rendering fails, instead of falling back to a plain trace.
	pub fn debug(&mut self, debug: bool) -> &mut Self {
		self.config.debug = debug;
		self
	}

	/// The vocabulary source code is lexed with.
	pub fn lexicon(&mut self, lexicon: Lexicon) -> &mut Self {
		self.config.lexicon = lexicon;
		self
	}

	/// # Errors
	/// Returns [`Error::InvalidPattern`] if any suppression pattern isn't a valid regex.
	pub fn build(&self) -> Result<Config> {
		let mut config = self.config.clone();
		config.suppressed_paths = Patterns::new(&self.suppressed_paths)?;
		config.suppressed_vars = Patterns::new(&self.suppressed_vars)?;
		config.truncate_vals = config.truncate_vals.filter(|&max| max > 0);
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	#[test]
	fn builds() {
		let config = Config::builder()
			.source_lines(SourceLines::All)
			.reverse(true)
			.suppressed_paths(["site-packages"])
			.suppressed_vars([r".*secret.*"])
			.build()
			.unwrap();

		assert_eq!(config.source_lines, SourceLines::All);
		assert!(config.reverse);
		assert!(config.suppressed_paths.is_match("/usr/lib/site-packages/x.py"));
		assert!(config.suppressed_vars.is_match("my_secret_key"));
		assert_eq!(config.line_wrap, 60);
	}

	#[test]
	fn zero_truncation_is_unlimited() {
		let truncation = |max| Config::builder().truncate_vals(max).build().unwrap().truncate_vals;

		assert_eq!(truncation(Some(0)), None);
		assert_eq!(truncation(Some(8)), Some(8));
		assert_eq!(truncation(None), None);
	}

	#[test]
	fn invalid_patterns_fail_the_build() {
		assert_matches!(
			Config::builder().suppressed_paths(["[oops"]).build(),
			Err(Error::InvalidPattern(_))
		);
	}
}
