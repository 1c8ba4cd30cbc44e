//! Splitting source code into highlighted regions, and finding out where names live.

mod continuation;
mod lexer;
mod lexicon;
mod region;

pub use continuation::{collapse, Collapsed};
pub use lexer::{Lexer, Token, TokenKind};
pub use lexicon::Lexicon;
pub use region::{line_text, HeaderRange, LineMap, NameIndex, RegionKind, SourceRegion};

use crate::Result;
use std::collections::BTreeMap;

/// The result of [`annotate`]ing a block of source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Annotation {
	/// Every line of the block, split into regions.
	pub line_map: LineMap,

	/// Where each name occurs.
	pub names: NameIndex,

	/// The first signature in the block, if there is one.
	pub header: Option<HeaderRange>,

	/// The line of interest, moved to where its content went if it was part of a continuation.
	pub highlighted: usize,
}

/// A region-to-be, with columns into its line.
#[derive(Debug)]
struct Marked {
	kind: RegionKind,
	name: String,
	line: usize,
	start: usize,
	end: usize,
	indexed: bool,
}

/// Keeps the tokens that become regions.
///
/// Dotted attribute chains are merged into a single identifier (`a.b.c`) when the dots are
/// directly adjacent to the names on both sides; names after any other dot are attributes and
/// stay raw. Also finds the header: the first header keyword opens it, and the `)` that closes
/// the last open paren after it ends it.
fn mark(tokens: Vec<Token>, lexicon: &Lexicon) -> (Vec<Marked>, Option<(usize, usize)>) {
	let mut marked: Vec<Marked> = Vec::with_capacity(tokens.len());
	let mut name_end = None;
	let mut pending_dot = None;
	let mut after_dot = false;
	let mut after_header_keyword = false;
	let mut open_parens = 0isize;
	let mut header_start = None;
	let mut header_end = None;

	for token in tokens {
		let was_name = name_end.take();
		let dot = pending_dot.take();
		let attribute = std::mem::take(&mut after_dot);
		let names_header = std::mem::take(&mut after_header_keyword);

		match token.kind {
			TokenKind::Name if lexicon.is_keyword(&token.text) => {
				if header_start.is_none() && lexicon.is_header_keyword(&token.text) {
					header_start = Some(token.line);
					after_header_keyword = true;
				}

				marked.push(Marked {
					kind: RegionKind::Keyword,
					name: token.text,
					line: token.line,
					start: token.start,
					end: token.end,
					indexed: false,
				});
			}

			TokenKind::Name if dot == Some((token.line, token.start)) => {
				// `dot` is only set right after an identifier, so it's the last one marked.
				if let Some(prev) = marked.last_mut() {
					prev.name.push('.');
					prev.name.push_str(&token.text);
					prev.end = token.end;
				}
				name_end = Some((token.line, token.end));
			}

			TokenKind::Name if attribute || dot.is_some() => {}

			TokenKind::Name => {
				name_end = Some((token.line, token.end));
				marked.push(Marked {
					kind: RegionKind::Identifier,
					name: token.text,
					line: token.line,
					start: token.start,
					end: token.end,
					indexed: !names_header,
				});
			}

			TokenKind::Operator
				if token.text == "." && was_name == Some((token.line, token.start)) =>
			{
				pending_dot = Some((token.line, token.end));
			}

			TokenKind::Operator => {
				match token.text.as_str() {
					"(" => open_parens += 1,
					")" => {
						open_parens -= 1;
						if header_end.is_none() && open_parens == 0 && header_start.is_some() {
							header_end = Some(token.line);
						}
					}
					"." => after_dot = true,
					_ => {}
				}

				marked.push(Marked {
					kind: RegionKind::Operator,
					name: token.text,
					line: token.line,
					start: token.start,
					end: token.end,
					indexed: false,
				});
			}

			TokenKind::Comment => marked.push(Marked {
				kind: RegionKind::Comment,
				name: token.text,
				line: token.line,
				start: token.start,
				end: token.end,
				indexed: false,
			}),

			TokenKind::Number | TokenKind::String => {}
		}
	}

	for idx in 1..marked.len() {
		let (head, tail) = marked.split_at_mut(idx);
		let (prev, next) = (&mut head[idx - 1], &tail[0]);

		if prev.kind == RegionKind::Identifier
			&& next.kind == RegionKind::Operator
			&& next.name == "("
			&& next.line == prev.line
			&& next.start == prev.end
		{
			prev.kind = RegionKind::Call;
		}
	}

	(marked, header_start.zip(header_end))
}

/// Finds out where in a block of source code which names live.
///
/// `lines` are the block's lines including their terminators, `first_line` is the line number
/// of `lines[0]`, and `highlighted` is a line of particular interest: if it is swallowed by a
/// line continuation, the returned [`Annotation::highlighted`] is the line its content moved
/// to.
///
/// Concatenating the regions of a line reproduces it exactly, unless it was part of a
/// continuation (in which case the first line holds the merged text and the others hold only
/// their indentation).
///
/// # Errors
/// Returns [`Error::Lex`](crate::Error::Lex) when a string doesn't end where it has to.
pub fn annotate<S: AsRef<str>>(
	lines: &[S],
	first_line: usize,
	highlighted: usize,
	lexicon: &Lexicon,
) -> Result<Annotation> {
	if lines.is_empty() {
		return Ok(Annotation { highlighted, ..Annotation::default() });
	}

	let collapsed = collapse(lines, lexicon.continuation(), lexicon.comment());
	let highlighted = highlighted
		.checked_sub(first_line)
		.map_or(highlighted, |relative| collapsed.corrected(relative) + first_line);

	let tokens = Lexer::new(lexicon, first_line).tokenize(&collapsed.lines)?;
	let (marked, header) = mark(tokens, lexicon);

	let mut by_line = BTreeMap::<usize, Vec<&Marked>>::new();
	let mut names = NameIndex::default();
	for region in &marked {
		by_line.entry(region.line).or_default().push(region);

		if region.indexed {
			names.insert(&region.name, region.line + first_line);
		}
	}

	let mut line_map = LineMap::new();
	for (index, line) in collapsed.lines.iter().enumerate() {
		let lineno = index + first_line;
		let mut regions = Vec::new();
		let mut col = 0;

		for token in by_line.get(&index).into_iter().flatten() {
			if token.start > col {
				regions.push(SourceRegion::new(&line[col..token.start], lineno, RegionKind::Raw));
			}

			let text = &line[token.start..token.end];
			debug_assert_eq!(text, token.name, "token doesn't match its source on line {lineno}");
			regions.push(SourceRegion::new(text, lineno, token.kind));
			col = token.end;
		}

		if col < line.len() {
			regions.push(SourceRegion::new(&line[col..], lineno, RegionKind::Raw));
		}

		line_map.insert(lineno, regions);
	}

	let header =
		header.map(|(start, end)| HeaderRange { start: start + first_line, end: end + first_line });

	Ok(Annotation { line_map, names, header, highlighted })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lines(source: &str) -> Vec<&str> {
		source.split_inclusive('\n').collect()
	}

	fn kinds_on(annotation: &Annotation, line: usize) -> Vec<(&str, RegionKind)> {
		annotation.line_map[&line]
			.iter()
			.map(|region| (region.text.as_str(), region.kind))
			.collect()
	}

	const SAMPLE: &str = "\
def spam(thing,
         various=None,
         other=(1, 2)):
    \"\"\"
    some doc string
    \"\"\"
    bla = thing.attr.x  # comment
    foo = bla . other
    return do_something(foo, 'text', 3.5)
";

	#[test]
	fn reconstructs_every_line() {
		let source = lines(SAMPLE);
		let annotation = annotate(&source, 10, 16, &Lexicon::default()).unwrap();

		assert_eq!(annotation.line_map.len(), source.len());
		for (lineno, original) in (10..).zip(&source) {
			assert_eq!(&line_text(&annotation.line_map[&lineno]), original);
		}
	}

	#[test]
	fn finds_multiline_header() {
		let annotation = annotate(&lines(SAMPLE), 10, 16, &Lexicon::default()).unwrap();
		assert_eq!(annotation.header, Some(HeaderRange { start: 10, end: 12 }));
	}

	#[test]
	fn merges_attribute_chains() {
		let annotation = annotate(&lines(SAMPLE), 10, 16, &Lexicon::default()).unwrap();

		assert_eq!(annotation.names.names_on(16), ["bla", "thing.attr.x"]);
		assert!(annotation.names.lines_of("thing.attr").is_none());
		assert_eq!(
			kinds_on(&annotation, 16),
			[
				("    ", RegionKind::Raw),
				("bla", RegionKind::Identifier),
				(" ", RegionKind::Raw),
				("=", RegionKind::Operator),
				(" ", RegionKind::Raw),
				("thing.attr.x", RegionKind::Identifier),
				("  ", RegionKind::Raw),
				("# comment", RegionKind::Comment),
				("\n", RegionKind::Raw),
			]
		);
	}

	#[test]
	fn spaced_dots_are_not_merged() {
		let annotation = annotate(&lines(SAMPLE), 10, 16, &Lexicon::default()).unwrap();

		assert_eq!(annotation.names.names_on(17), ["foo", "bla"]);
		assert!(annotation.names.lines_of("other").unwrap().contains(&12));
		assert!(!annotation.names.lines_of("other").unwrap().contains(&17));
	}

	#[test]
	fn calls_are_tagged_and_header_name_is_not_indexed() {
		let annotation = annotate(&lines(SAMPLE), 10, 16, &Lexicon::default()).unwrap();

		assert_eq!(kinds_on(&annotation, 10)[2], ("spam", RegionKind::Call));
		assert!(annotation.names.lines_of("spam").is_none());

		let last = kinds_on(&annotation, 18);
		assert!(last.contains(&("do_something", RegionKind::Call)));
		assert!(last.contains(&("return", RegionKind::Keyword)));
		assert!(annotation.names.lines_of("do_something").unwrap().contains(&18));
	}

	#[test]
	fn simple_function_scenario() {
		let source = ["def f(x):\n", "    y = x + 1\n", "    return y\n"];
		let annotation = annotate(&source, 1, 2, &Lexicon::default()).unwrap();

		let lines_of = |name: &str| {
			annotation.names.lines_of(name).unwrap().iter().copied().collect::<Vec<_>>()
		};

		assert_eq!(annotation.header, Some(HeaderRange { start: 1, end: 1 }));
		assert_eq!(lines_of("x"), [1, 2]);
		assert_eq!(lines_of("y"), [2, 3]);
		assert_eq!(annotation.highlighted, 2);
	}

	#[test]
	fn continuations_move_the_highlighted_line() {
		let source = ["x = a.\\\n", "    b\n", "y = x\n"];
		let annotation = annotate(&source, 5, 6, &Lexicon::default()).unwrap();

		assert_eq!(annotation.highlighted, 5);
		assert_eq!(annotation.names.names_on(5), ["x", "a.b"]);
		assert_eq!(line_text(&annotation.line_map[&6]), "    \n");
		assert_eq!(line_text(&annotation.line_map[&7]), "y = x\n");
	}

	#[test]
	fn empty_input() {
		let annotation = annotate::<&str>(&[], 1, 3, &Lexicon::default()).unwrap();

		assert!(annotation.line_map.is_empty());
		assert!(annotation.names.is_empty());
		assert_eq!(annotation.header, None);
		assert_eq!(annotation.highlighted, 3);
	}

	#[test]
	fn empty_lines_have_no_regions() {
		let annotation = annotate(&["x = 1\n", "", "\n"], 1, 1, &Lexicon::default()).unwrap();

		assert!(annotation.line_map[&2].is_empty());
		assert_eq!(kinds_on(&annotation, 3), [("\n", RegionKind::Raw)]);
	}

	#[test]
	fn custom_lexicons() {
		let source = ["fn add(x, y)\n", "    return x + y\n"];
		let lexicon = Lexicon::with_keywords(["fn", "return"]).header_keywords(["fn"]);
		let annotation = annotate(&source, 1, 2, &lexicon).unwrap();

		assert_eq!(annotation.header, Some(HeaderRange { start: 1, end: 1 }));
		assert_eq!(kinds_on(&annotation, 1)[0], ("fn", RegionKind::Keyword));
		assert_eq!(annotation.names.names_on(1), ["x", "y"]);

		assert_eq!(annotate(&source, 1, 2, &Lexicon::default()).unwrap().header, None);
	}

	#[test]
	fn module_level_code_has_no_header() {
		let annotation = annotate(&["x = f(1)\n"], 1, 1, &Lexicon::default()).unwrap();
		assert_eq!(annotation.header, None);
	}
}
