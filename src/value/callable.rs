/// A function or method, described by where it was defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callable {
	qualname: String,
	file: Option<String>,
	line: Option<usize>,
	owner: Option<String>,
	builtin: bool,
}

impl Callable {
	/// A function with an unknown definition site.
	pub fn function(qualname: impl Into<String>) -> Self {
		Self { qualname: qualname.into(), file: None, line: None, owner: None, builtin: false }
	}

	/// A function provided by the runtime, rather than defined in source.
	pub fn builtin(qualname: impl Into<String>) -> Self {
		Self { builtin: true, ..Self::function(qualname) }
	}

	#[must_use]
	pub fn defined_at(mut self, file: impl Into<String>, line: usize) -> Self {
		self.file = Some(file.into());
		self.line = Some(line);
		self
	}

	/// Makes this a method bound to an instance of `owner`.
	#[must_use]
	pub fn method_of(mut self, owner: impl Into<String>) -> Self {
		self.owner = Some(owner.into());
		self
	}

	pub fn qualname(&self) -> &str {
		&self.qualname
	}

	/// The last segment of the qualified name.
	pub fn name(&self) -> &str {
		self.qualname.rsplit('.').next().unwrap_or(&self.qualname)
	}

	pub fn file(&self) -> Option<&str> {
		self.file.as_deref()
	}

	/// The file's name without any of its directories.
	pub fn file_name(&self) -> Option<&str> {
		self.file().map(|file| file.rsplit(['/', '\\']).next().unwrap_or(file))
	}

	pub fn line(&self) -> Option<usize> {
		self.line
	}

	pub fn owner(&self) -> Option<&str> {
		self.owner.as_deref()
	}

	pub fn is_builtin(&self) -> bool {
		self.builtin
	}

	pub fn is_method(&self) -> bool {
		self.owner.is_some()
	}

	pub fn type_name(&self) -> &'static str {
		match (self.builtin, self.is_method()) {
			(true, _) => "builtin_function_or_method",
			(false, true) => "method",
			(false, false) => "function",
		}
	}

	/// How the value would print without any definition site.
	pub fn bare_repr(&self) -> String {
		match (self.builtin, self.owner()) {
			(true, _) => format!("<built-in function {}>", self.name()),
			(false, Some(owner)) => format!("<bound method {} of {owner}>", self.qualname),
			(false, None) => format!("<function {}>", self.qualname),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_and_files() {
		let callable =
			Callable::function("Spam.eggs").defined_at("/src/pkg/mod.py", 12).method_of("Spam");

		assert_eq!(callable.name(), "eggs");
		assert_eq!(callable.file_name(), Some("mod.py"));
		assert_eq!(callable.type_name(), "method");
		assert_eq!(Callable::builtin("len").bare_repr(), "<built-in function len>");
	}
}
