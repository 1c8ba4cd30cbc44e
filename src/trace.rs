//! Printing calls, returns and errors as they happen.
//!
//! There's no hook into a running program here: whatever instruments the program reports
//! [`TraceEvent`]s, along with the call depth they happened at, to a [`TracePrinter`].

use crate::config::{Config, Patterns, Style};
use crate::frame::{FrameConfig, FrameFormatter, FrameRecord};
use crate::render::{format_plain, FormatOptions};
use crate::stack::{format_exception_message, ErrorInfo};
use crate::value::Value;

/// Past this depth, the depth is written out instead of indenting further.
const MAX_INDENT_DEPTH: usize = 10;

/// Notes longer than this are cut for frames from suppressed locations.
const MAX_SUPPRESSED_NOTE: usize = 123;

/// Something that happened in an instrumented program.
#[derive(Debug, Clone)]
pub enum TraceEvent {
	/// `frame` was entered from `callsite`.
	Call { depth: usize, callsite: Option<FrameRecord>, frame: FrameRecord },

	/// `frame` returned `value`.
	Return { depth: usize, frame: FrameRecord, value: Value },

	/// `error` was raised in `frame`.
	Exception { depth: usize, frame: FrameRecord, error: ErrorInfo },
}

impl TraceEvent {
	/// The depth of the event's frame, relative to where tracing started.
	pub fn depth(&self) -> usize {
		match self {
			Self::Call { depth, .. } => *depth,
			Self::Return { depth, .. } | Self::Exception { depth, .. } => *depth,
		}
	}
}

/// Indents every line of `text` by `depth` levels.
fn add_indent(text: &str, depth: usize) -> String {
	let indent = if depth > MAX_INDENT_DEPTH {
		format!("{depth}   {}", "    ".repeat(depth % MAX_INDENT_DEPTH))
	} else {
		"    ".repeat(depth)
	};

	text.lines().map(|line| format!("{indent}{line}\n")).collect()
}

/// Renders [`TraceEvent`]s.
#[derive(Debug)]
pub struct TracePrinter {
	formatter: FrameFormatter,
	style: Style,
	suppressed_paths: Patterns,
	depth_limit: usize,
	stop_on_exception: bool,
	previous_depth: Option<usize>,
	stopped: bool,
}

impl TracePrinter {
	/// A printer ignoring events 20 levels deep or deeper, and stopping at the first error.
	pub fn new(config: &Config) -> Self {
		Self {
			formatter: FrameFormatter::new(FrameConfig::from(config), config.style),
			style: config.style,
			suppressed_paths: config.suppressed_paths.clone(),
			depth_limit: 20,
			stop_on_exception: true,
			previous_depth: None,
			stopped: false,
		}
	}

	#[must_use]
	pub fn depth_limit(mut self, limit: usize) -> Self {
		self.depth_limit = limit;
		self
	}

	#[must_use]
	pub fn stop_on_exception(mut self, stop: bool) -> Self {
		self.stop_on_exception = stop;
		self
	}

	/// Whether an error stopped the trace.
	pub fn is_stopped(&self) -> bool {
		self.stopped
	}

	/// Renders an event; events that are too deep or come after the trace stopped render as
	/// nothing.
	pub fn handle(&mut self, event: &TraceEvent) -> String {
		let depth = event.depth();
		if self.stopped || depth >= self.depth_limit {
			return String::new();
		}

		match event {
			TraceEvent::Call { callsite, frame, .. } => {
				let mut msg = String::new();
				if let Some(callsite) = callsite {
					msg.push_str(&self.show(callsite, depth.saturating_sub(1), ""));
				}
				msg.push_str(&self.show(frame, depth, ""));
				msg
			}
			TraceEvent::Return { frame, value, .. } => {
				let opts = FormatOptions {
					indent: 11,
					truncation: Some(1000),
					..FormatOptions::default()
				};
				let note = format!("    Return {}\n", format_plain(value, &opts));
				self.show(frame, depth, &note)
			}
			TraceEvent::Exception { frame, error, .. } => {
				let note = format_exception_message(error, self.style);
				let msg = self.show(frame, depth, &note);
				self.stopped = self.stop_on_exception;
				msg
			}
		}
	}

	fn show(&mut self, frame: &FrameRecord, depth: usize, note: &str) -> String {
		let (frame_msg, note) = if self.suppressed_paths.is_match(&frame.location) {
			let headline = format!(
				"File {}, line {}, in {}\n",
				frame.location, frame.highlighted_line, frame.scope_name
			);
			let note = if note.chars().count() > MAX_SUPPRESSED_NOTE {
				format!("{}...", note.chars().take(MAX_SUPPRESSED_NOTE - 3).collect::<String>())
			} else {
				note.to_owned()
			};
			(headline, note)
		} else {
			let frame_msg = self.formatter.format(frame).unwrap_or_else(|err| {
				tracing::warn!(location = %frame.location, %err, "frame rendered without source");
				self.formatter.format_degraded(frame, &err.to_string())
			});
			(frame_msg, note.to_owned())
		};

		let mut msg = String::new();
		match self.previous_depth {
			Some(previous) if depth > 0 && previous == depth - 1 => {
				msg.push_str(&add_indent(" └──┐\n", depth - 1));
			}
			Some(previous) if previous == depth + 1 => {
				msg.push_str(&add_indent("┌──────┘\n", depth));
			}
			_ => {}
		}

		msg.push_str(&add_indent(&(frame_msg + &note), depth));
		self.previous_depth = Some(depth);
		msg
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::SourceLines;
	use crate::frame::{SourceText, Snapshot};
	use crate::resolve::Scope;

	fn frame(location: &str, scope: &str, line: usize) -> FrameRecord {
		let locals = Scope::new();
		let snapshot = Snapshot::new(location, scope, line, &locals, &locals)
			.with_source(SourceText::new("def inner():\n    return 42\nprint(inner())\n", 1));
		FrameRecord::inspect(&snapshot, &Patterns::default())
	}

	fn printer() -> TracePrinter {
		let config = Config::builder()
			.source_lines(SourceLines::Count(1))
			.show_signature(false)
			.build()
			.unwrap();
		TracePrinter::new(&config)
	}

	#[test]
	fn indents() {
		assert_eq!(add_indent("a\nb\n", 0), "a\nb\n");
		assert_eq!(add_indent("a\nb", 2), "        a\n        b\n");
		assert_eq!(add_indent("a", 12), "12           a\n");
	}

	#[test]
	fn calls_and_returns() {
		let mut printer = printer();
		let call = TraceEvent::Call {
			depth: 1,
			callsite: Some(frame("demo.py", "<module>", 3)),
			frame: frame("demo.py", "inner", 2),
		};
		let ret =
			TraceEvent::Return { depth: 1, frame: frame("demo.py", "inner", 2), value: 42.into() };
		let back =
			TraceEvent::Call { depth: 0, callsite: None, frame: frame("demo.py", "<module>", 3) };

		assert_eq!(
			printer.handle(&call),
			"File \"demo.py\", line 3, in <module>\n    print(inner())\n └──┐\n\
			\x20   File \"demo.py\", line 2, in inner\n        return 42\n"
		);
		assert_eq!(
			printer.handle(&ret),
			"    File \"demo.py\", line 2, in inner\n        return 42\n        Return 42\n"
		);
		assert_eq!(
			printer.handle(&back),
			"┌──────┘\nFile \"demo.py\", line 3, in <module>\n    print(inner())\n"
		);
	}

	#[test]
	fn suppressed_locations_get_a_headline() {
		let config = Config::builder().suppressed_paths(["lib/"]).build().unwrap();
		let mut printer = TracePrinter::new(&config);
		let ret = |value: &str| TraceEvent::Return {
			depth: 0,
			frame: frame("lib/x.py", "inner", 2),
			value: value.into(),
		};

		let rendered = printer.handle(&ret(&"x".repeat(200)));
		assert!(rendered.starts_with("File lib/x.py, line 2, in inner\n    Return 'xxx"));
		assert!(rendered.ends_with("...\n"));
		assert_eq!(rendered.lines().nth(1).unwrap().chars().count(), MAX_SUPPRESSED_NOTE);

		let accented = "é".repeat(100);
		assert!(printer.handle(&ret(&accented)).ends_with(&format!("    Return '{accented}'\n")));
	}

	#[test]
	fn stops_at_errors() {
		let mut printer = printer();
		let error = TraceEvent::Exception {
			depth: 0,
			frame: frame("demo.py", "inner", 2),
			error: ErrorInfo::new("Oops", "no"),
		};

		assert!(printer.handle(&error).ends_with("Oops: no\n"));
		assert!(printer.is_stopped());
		assert_eq!(printer.handle(&error), "");

		let mut printer = self::printer().stop_on_exception(false);
		printer.handle(&error);
		assert!(!printer.is_stopped());
	}

	#[test]
	fn deep_events_are_ignored() {
		let mut printer = printer().depth_limit(2);
		let ret =
			TraceEvent::Return { depth: 2, frame: frame("demo.py", "inner", 2), value: ().into() };

		assert_eq!(printer.handle(&ret), "");
	}
}
