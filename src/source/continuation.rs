use std::collections::BTreeMap;

/// Source lines after line continuations have been collapsed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Collapsed {
	/// The collapsed lines; exactly as many as went in.
	pub lines: Vec<String>,

	/// Maps the index of every line that was merged into a previous one to the index of the
	/// line it now lives in.
	pub corrections: BTreeMap<usize, usize>,
}

impl Collapsed {
	/// Where the content of line `index` ended up.
	pub fn corrected(&self, index: usize) -> usize {
		self.corrections.get(&index).copied().unwrap_or(index)
	}
}

/// Returns `line` without its trailing continuation marker and terminator, if it has them.
fn strip_continuation(line: &str, marker: char) -> Option<&str> {
	let body = line.strip_suffix('\n')?;
	let body = body.strip_suffix('\r').unwrap_or(body);
	body.strip_suffix(marker)
}

fn is_comment_line(line: &str, comment: char) -> bool {
	line.trim_start().starts_with(comment)
}

/// Merges every line ending in `marker` with the line after it.
///
/// The merged line keeps its place and the next line's leading whitespace is dropped. Each
/// line that got merged into its predecessor is replaced with a line holding just its
/// indentation and a newline, so everything after a continuation stays on its line number.
/// Comment lines are never continued.
pub fn collapse<S: AsRef<str>>(lines: &[S], marker: char, comment: char) -> Collapsed {
	let count = lines.len();
	let mut collapsed = Collapsed { lines: Vec::with_capacity(count), ..Collapsed::default() };
	let mut index = 0;

	while index < count {
		let run_start = index;
		let mut line = lines[index].as_ref().to_owned();
		let mut placeholders = Vec::new();

		while index + 1 < count && !is_comment_line(&line, comment) {
			let Some(body) = strip_continuation(&line, marker) else { break };

			index += 1;
			let next = lines[index].as_ref();
			let stripped = next.trim_start_matches([' ', '\t']);
			let indent = &next[..next.len() - stripped.len()];

			line = format!("{body}{stripped}");
			placeholders.push(format!("{indent}\n"));
			collapsed.corrections.insert(index, run_start);
		}

		collapsed.lines.push(line);
		collapsed.lines.append(&mut placeholders);
		index += 1;
	}

	debug_assert_eq!(collapsed.lines.len(), count);
	collapsed
}
