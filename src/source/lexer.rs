use super::Lexicon;
use crate::error::{LexErrorKind, Result};

/// What kind of raw token was lexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	Name,
	Number,
	String,
	Operator,
	Comment,
}

/// A raw token. Columns are byte offsets into their line; `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	pub text: String,
	pub line: usize,
	pub start: usize,
	pub end_line: usize,
	pub end: usize,
}

#[rustfmt::skip]
const OPERATORS: [&str; 47] = [
	"**=", "//=", ">>=", "<<=", "...", "->", ":=",
	"**", "//", "<<", ">>", "<=", ">=", "==", "!=",
	"+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=",
	"+", "-", "*", "/", "%", "@", "&", "|", "^", "~",
	"<", ">", "(", ")", "[", "]", "{", "}", ",", ":", ".", ";", "=",
];

/// An open triple-quoted string, carried from one line to the next.
struct OpenString {
	quote: char,
	line: usize,
	start: usize,
}

/// Splits lines into [`Token`]s.
///
/// Only triple-quoted strings are allowed to span lines; everything else has to end on the
/// line it starts on.
#[must_use]
pub struct Lexer<'s> {
	lexicon: &'s Lexicon,
	line_offset: usize,
	tokens: Vec<Token>,
	open: Option<OpenString>,
}

/// Finds the end of a quoted string body in `rest`, returning the byte length consumed
/// including the closing quote(s).
fn find_closing(rest: &str, quote: char, triple: bool) -> Option<usize> {
	let mut chars = rest.char_indices();

	while let Some((idx, chr)) = chars.next() {
		match chr {
			'\\' => {
				chars.next();
			}
			'\n' | '\r' if !triple => return None,
			_ if chr == quote => {
				if !triple {
					return Some(idx + chr.len_utf8());
				}

				let tail = &rest[idx..];
				let closing = [quote; 3].iter().collect::<String>();
				if tail.starts_with(&closing) {
					return Some(idx + closing.len());
				}
			}
			_ => {}
		}
	}

	None
}

fn is_name_start(chr: char) -> bool {
	chr == '_' || chr.is_alphabetic()
}

fn is_name_body(chr: char) -> bool {
	chr == '_' || chr.is_alphanumeric()
}

fn number_len(rest: &str) -> usize {
	let mut prev = '\0';
	rest
		.char_indices()
		.find(|&(_, chr)| {
			let exponent_sign = matches!(chr, '+' | '-') && matches!(prev, 'e' | 'E');
			let is_part = exponent_sign || chr == '.' || is_name_body(chr);
			prev = chr;
			!is_part
		})
		.map_or(rest.len(), |(idx, _)| idx)
}

impl<'s> Lexer<'s> {
	/// `line_offset` is the line number of the first line, only used for error messages.
	pub fn new(lexicon: &'s Lexicon, line_offset: usize) -> Self {
		Self { lexicon, line_offset, tokens: Vec::new(), open: None }
	}

	pub fn tokenize<S: AsRef<str>>(mut self, lines: &[S]) -> Result<Vec<Token>> {
		for (index, line) in lines.iter().enumerate() {
			self.lex_line(index, line.as_ref())?;
		}

		if let Some(open) = self.open {
			return Err(LexErrorKind::UnterminatedTripleQuote.error(open.line + self.line_offset));
		}

		Ok(self.tokens)
	}

	fn push(&mut self, kind: TokenKind, text: &str, line: usize, start: usize) {
		self.tokens.push(Token {
			kind,
			text: text.to_owned(),
			line,
			start,
			end_line: line,
			end: start + text.len(),
		});
	}

	fn lex_line(&mut self, index: usize, line: &str) -> Result<()> {
		let mut pos = 0;

		if let Some(open) = self.open.take() {
			match find_closing(line, open.quote, true) {
				Some(len) => {
					pos = len;
					self.tokens.push(Token {
						kind: TokenKind::String,
						text: String::new(),
						line: open.line,
						start: open.start,
						end_line: index,
						end: len,
					});
				}
				None => {
					self.open = Some(open);
					return Ok(());
				}
			}
		}

		while let Some(chr) = line[pos..].chars().next() {
			let rest = &line[pos..];

			if chr.is_whitespace() {
				pos += chr.len_utf8();
			} else if chr == self.lexicon.comment() {
				let text = rest.trim_end_matches(['\r', '\n']);
				self.push(TokenKind::Comment, text, index, pos);
				pos += text.len();
			} else if is_name_start(chr) {
				let len = rest.find(|c: char| !is_name_body(c)).unwrap_or(rest.len());
				let word = &rest[..len];

				match rest[len..].chars().next() {
					Some(quote @ ('\'' | '"')) if self.lexicon.is_string_prefix(word) => {
						pos = self.lex_string(index, line, pos, pos + len, quote)?;
					}
					_ => {
						self.push(TokenKind::Name, word, index, pos);
						pos += len;
					}
				}
			} else if chr.is_ascii_digit()
				|| (chr == '.' && rest[1..].starts_with(|c: char| c.is_ascii_digit()))
			{
				let len = number_len(rest);
				self.push(TokenKind::Number, &rest[..len], index, pos);
				pos += len;
			} else if chr == '\'' || chr == '"' {
				pos = self.lex_string(index, line, pos, pos, chr)?;
			} else {
				let op = OPERATORS
					.iter()
					.find(|op| rest.starts_with(*op))
					.map_or(&rest[..chr.len_utf8()], |op| &rest[..op.len()]);
				self.push(TokenKind::Operator, op, index, pos);
				pos += op.len();
			}
		}

		Ok(())
	}

	/// Lexes a string whose prefix starts at `start` and whose opening quote is at `quote_at`.
	/// Returns the position just after the string on this line.
	fn lex_string(
		&mut self,
		index: usize,
		line: &str,
		start: usize,
		quote_at: usize,
		quote: char,
	) -> Result<usize> {
		let triple = [quote; 3].iter().collect::<String>();
		let is_triple = line[quote_at..].starts_with(&triple);
		let body_start = quote_at + if is_triple { 3 } else { 1 };

		match find_closing(&line[body_start..], quote, is_triple) {
			Some(len) => {
				let end = body_start + len;
				self.push(TokenKind::String, &line[start..end], index, start);
				Ok(end)
			}
			None if is_triple => {
				self.open = Some(OpenString { quote, line: index, start });
				Ok(line.len())
			}
			None => Err(LexErrorKind::UnterminatedString { quote }.error(index + self.line_offset)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	fn kinds(source: &str) -> Vec<(TokenKind, String)> {
		let lexicon = Lexicon::default();
		let lines = source.split_inclusive('\n').collect::<Vec<_>>();
		Lexer::new(&lexicon, 1)
			.tokenize(&lines)
			.unwrap()
			.into_iter()
			.map(|token| (token.kind, token.text))
			.collect()
	}

	#[test]
	fn lexes_basic_statement() {
		use TokenKind::*;

		assert_eq!(
			kinds("y = x + 1  # bump\n"),
			[
				(Name, "y".into()),
				(Operator, "=".into()),
				(Name, "x".into()),
				(Operator, "+".into()),
				(Number, "1".into()),
				(Comment, "# bump".into()),
			]
		);
	}

	#[test]
	fn longest_operator_wins() {
		let ops = kinds("a **= b // c -> d\n")
			.into_iter()
			.filter(|(kind, _)| *kind == TokenKind::Operator)
			.map(|(_, text)| text)
			.collect::<Vec<_>>();

		assert_eq!(ops, ["**=", "//", "->"]);
	}

	#[test]
	fn strings_with_prefixes_and_escapes() {
		assert_eq!(
			kinds("s = rb'a\\'b' + \"c\"\n")
				.into_iter()
				.filter(|(kind, _)| *kind == TokenKind::String)
				.map(|(_, text)| text)
				.collect::<Vec<_>>(),
			["rb'a\\'b'", "\"c\""]
		);
	}

	#[test]
	fn numbers_with_exponents_and_dots() {
		let numbers = kinds("x = 1.5e-3 + .5 + 0x1f\n")
			.into_iter()
			.filter(|(kind, _)| *kind == TokenKind::Number)
			.map(|(_, text)| text)
			.collect::<Vec<_>>();

		assert_eq!(numbers, ["1.5e-3", ".5", "0x1f"]);
	}

	#[test]
	fn triple_quoted_strings_span_lines() {
		let lexicon = Lexicon::default();
		let lines = ["x = \"\"\"doc\n", "more\n", "end\"\"\" + y\n"];
		let tokens = Lexer::new(&lexicon, 1).tokenize(&lines).unwrap();

		let string = tokens.iter().find(|token| token.kind == TokenKind::String).unwrap();
		assert_eq!((string.line, string.end_line), (0, 2));

		let y = tokens.last().unwrap();
		assert_eq!((y.text.as_str(), y.line, y.start), ("y", 2, 9));
	}

	#[test]
	fn unterminated_strings_are_errors() {
		let lexicon = Lexicon::default();

		assert_matches!(
			Lexer::new(&lexicon, 10).tokenize(&["x = 'abc\n"]),
			Err(crate::Error::Lex {
				line: 10,
				kind: LexErrorKind::UnterminatedString { quote: '\'' },
			})
		);

		assert_matches!(
			Lexer::new(&lexicon, 10).tokenize(&["x = 1\n", "'''abc\n"]),
			Err(crate::Error::Lex { line: 11, kind: LexErrorKind::UnterminatedTripleQuote })
		);
	}
}
