//! Composing frames into whole traces.

mod exception;

pub use exception::{format_exception, format_exception_message, ErrorInfo};

use crate::config::{Config, Patterns};
use crate::frame::{FrameConfig, FrameFormatter, FrameRecord};
use crate::{Error, Result};
use std::panic::{self, AssertUnwindSafe};

/// How much of a frame is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verbosity {
	/// Everything the config asks for.
	Verbose,

	/// At most the highlighted line, with its signature and variables.
	Reduced,

	/// At most the highlighted line.
	Minimal,
}

/// Picks the verbosity of each frame, outermost first.
///
/// Frames from suppressed locations are minimal, except for the first one below a frame that
/// isn't suppressed: that one is reduced, so the values passed into suppressed code stay visible.
pub fn verbosities(frames: &[FrameRecord], suppressed_paths: &Patterns) -> Vec<Verbosity> {
	let mut parent_was_suppressed = true;

	frames
		.iter()
		.map(|frame| {
			let suppressed = suppressed_paths.is_match(&frame.location);
			let verbosity = match (suppressed, parent_was_suppressed) {
				(false, _) => Verbosity::Verbose,
				(true, false) => Verbosity::Reduced,
				(true, true) => Verbosity::Minimal,
			};

			parent_was_suppressed = suppressed;
			verbosity
		})
		.collect()
}

struct Formatters {
	verbose: FrameFormatter,
	reduced: FrameFormatter,
	minimal: FrameFormatter,
}

impl Formatters {
	fn new(config: &Config) -> Self {
		let frame_config = FrameConfig::from(config);

		Self {
			reduced: FrameFormatter::new(frame_config.reduced(), config.style),
			minimal: FrameFormatter::new(frame_config.minimal(), config.style),
			verbose: FrameFormatter::new(frame_config, config.style),
		}
	}

	fn get(&self, verbosity: Verbosity) -> &FrameFormatter {
		match verbosity {
			Verbosity::Verbose => &self.verbose,
			Verbosity::Reduced => &self.reduced,
			Verbosity::Minimal => &self.minimal,
		}
	}
}

/// Renders one frame, degrading to its headline and a note if its source can't be shown.
fn format_frame(formatter: &FrameFormatter, record: &FrameRecord) -> String {
	formatter.format(record).unwrap_or_else(|err| {
		tracing::warn!(location = %record.location, %err, "frame rendered without source");
		formatter.format_degraded(record, &err.to_string())
	})
}

fn join(mut messages: Vec<String>, reverse: bool) -> String {
	if reverse {
		messages.reverse();
	}

	messages.concat()
}

/// Renders a stack of frames, outermost first unless [`Config::reverse`] is set.
///
/// # Errors
/// Frames that fail to render are shown degraded; this currently never fails.
#[tracing::instrument(skip_all, fields(frames = frames.len()))]
pub fn format_stack(frames: &[FrameRecord], config: &Config) -> Result<String> {
	let formatters = Formatters::new(config);

	let messages = frames
		.iter()
		.zip(verbosities(frames, &config.suppressed_paths))
		.map(|(record, verbosity)| {
			tracing::trace!(location = %record.location, ?verbosity, "rendering frame");
			format_frame(formatters.get(verbosity), record)
		})
		.collect();

	Ok(join(messages, config.reverse))
}

/// Renders every frame minimally.
///
/// # Errors
/// Frames that fail to render are shown degraded; this currently never fails.
pub fn format_summary(frames: &[FrameRecord], config: &Config) -> Result<String> {
	let formatter = Formatters::new(config).minimal;
	let messages = frames.iter().map(|record| format_frame(&formatter, record)).collect();

	Ok(join(messages, config.reverse))
}

/// Something that can be rendered as a trace.
#[derive(Debug, Clone)]
pub enum Renderable {
	Stack(Vec<FrameRecord>),
	Exception(ErrorInfo),
}

impl From<Vec<FrameRecord>> for Renderable {
	fn from(frames: Vec<FrameRecord>) -> Self {
		Self::Stack(frames)
	}
}

impl From<ErrorInfo> for Renderable {
	fn from(info: ErrorInfo) -> Self {
		Self::Exception(info)
	}
}

impl Renderable {
	/// The most basic rendering possible: a classic traceback of locations.
	pub fn plain(&self) -> String {
		match self {
			Self::Stack(frames) => exception::plain_traceback(frames),
			Self::Exception(info) => info.plain(),
		}
	}
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_owned()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic".to_owned()
	}
}

fn catching<F: FnOnce() -> Result<String>>(config: &Config, render: F) -> Result<String> {
	match panic::catch_unwind(AssertUnwindSafe(render)) {
		Ok(rendered) => rendered,
		Err(payload) if config.debug_enabled() => panic::resume_unwind(payload),
		Err(payload) => Err(Error::RenderPanic(panic_message(payload.as_ref()))),
	}
}

/// Renders `renderable`, turning panics into [`Error::RenderPanic`].
///
/// # Errors
/// Returns whatever went wrong while rendering.
///
/// # Panics
/// Rendering panics are passed on if [debugging](Config::debug_enabled) is enabled.
pub fn try_render(renderable: &Renderable, config: &Config) -> Result<String> {
	catching(config, || match renderable {
		Renderable::Stack(frames) => format_stack(frames, config),
		Renderable::Exception(info) => format_exception(info, config),
	})
}

fn fall_back(renderable: &Renderable, config: &Config, result: Result<String>) -> String {
	match result {
		Ok(rendered) => rendered,
		Err(err) if config.debug_enabled() => panic!("stack rendering failed: {err}"),
		Err(err) => {
			tracing::error!(%err, "stack rendering failed");
			format!("Stack rendering failed: {err}\n{}", renderable.plain())
		}
	}
}

/// Renders `renderable`. If that fails, the failure is reported along with a plain rendering.
///
/// # Panics
/// If [debugging](Config::debug_enabled) is enabled, failures panic instead.
pub fn render(renderable: &Renderable, config: &Config) -> String {
	fall_back(renderable, config, try_render(renderable, config))
}

/// Renders `renderable` minimally, the same way [`render`] does otherwise.
///
/// # Panics
/// If [debugging](Config::debug_enabled) is enabled, failures panic instead.
pub fn render_summary(renderable: &Renderable, config: &Config) -> String {
	let result = catching(config, || match renderable {
		Renderable::Stack(frames) => format_summary(frames, config),
		Renderable::Exception(info) => Ok(format_summary(&info.frames, config)?
			+ &format_exception_message(info, config.style)),
	});

	fall_back(renderable, config, result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::frame::{SourceText, Snapshot};
	use crate::resolve::Scope;
	use crate::value::{OpaqueValue, ReprError, Value};
	use assert_matches::assert_matches;
	use super::Verbosity::{Minimal, Reduced, Verbose};

	const SOURCE: &str = "\
def work(data):
    size = len(data)
    half = size // 2
    return data[half]
";

	fn frame(location: &str, locals: &Scope) -> FrameRecord {
		let snapshot = Snapshot::new(location, "work", 3, locals, locals)
			.with_source(SourceText::new(SOURCE, 1));
		FrameRecord::inspect(&snapshot, &Patterns::default())
	}

	fn locals() -> Scope {
		Scope::new().with("data", Value::list([1.into(), 2.into()])).with("size", 2).with("half", 1)
	}

	fn suppressing(pattern: &str) -> Config {
		Config::builder().suppressed_paths([pattern]).build().unwrap()
	}

	#[test]
	fn suppressed_frames_below_unsuppressed_ones_are_reduced() {
		let locals = locals();
		let patterns = Patterns::new(["lib/"]).unwrap();

		let frames = ["app.py", "lib/x.py", "app.py"].map(|location| frame(location, &locals));
		assert_eq!(verbosities(&frames, &patterns), [Verbose, Reduced, Verbose]);

		let frames = ["app.py", "lib/x.py", "lib/y.py"].map(|location| frame(location, &locals));
		assert_eq!(verbosities(&frames, &patterns), [Verbose, Reduced, Minimal]);
	}

	#[test]
	fn leading_suppressed_frames_are_minimal() {
		let locals = locals();
		let frames = [frame("lib/x.py", &locals), frame("app.py", &locals)];

		assert_eq!(verbosities(&frames, &Patterns::new(["lib/"]).unwrap()), [Minimal, Verbose]);
	}

	#[test]
	fn stacks() {
		let locals = locals();
		let frames = ["app.py", "lib/x.py", "lib/y.py"].map(|location| frame(location, &locals));
		let rendered = format_stack(&frames, &suppressing("lib/")).unwrap();

		assert!(rendered.starts_with("File \"app.py\", line 3, in work\n    1    def work(data):"));
		assert!(rendered.contains("File \"lib/x.py\", line 3, in work\n    half = size // 2\n"));
		assert!(rendered.contains("     half = 1\n"));
		assert!(rendered.ends_with("File \"lib/y.py\", line 3, in work\n    half = size // 2\n"));
		assert_eq!(rendered.matches("data = [1, 2]").count(), 1);
	}

	#[test]
	fn reversed_stacks() {
		let locals = locals();
		let frames = [frame("first.py", &locals), frame("second.py", &locals)];
		let config = Config::builder().reverse(true).build().unwrap();
		let rendered = format_stack(&frames, &config).unwrap();

		assert!(rendered.find("second.py").unwrap() < rendered.find("first.py").unwrap());
	}

	#[test]
	fn summaries() {
		let locals = locals();
		let frames = [frame("first.py", &locals), frame("second.py", &locals)];
		let rendered = format_summary(&frames, &Config::default()).unwrap();

		assert_eq!(
			rendered,
			"File \"first.py\", line 3, in work\n    half = size // 2\n\
			File \"second.py\", line 3, in work\n    half = size // 2\n"
		);
	}

	#[test]
	fn mixed_indentation_degrades_the_frame() {
		let locals = Scope::new().with("a", 1);
		let snapshot = Snapshot::new("tabs.py", "<module>", 2, &locals, &locals)
			.with_source(SourceText::new("if a:\n\ta = 1\n    a = 2\n", 1));
		let frames = [FrameRecord::inspect(&snapshot, &Patterns::default())];
		let rendered = format_stack(&frames, &Config::default()).unwrap();

		assert!(rendered.starts_with(
			"File \"tabs.py\", line 2, in <module>\n    # line 3: mixed tabs and spaces"
		));
		assert!(rendered.contains("     a = 1\n"));
	}

	#[derive(Debug)]
	struct Explosive;

	impl OpaqueValue for Explosive {
		fn type_name(&self) -> &str {
			"Explosive"
		}

		fn repr(&self) -> std::result::Result<String, ReprError> {
			panic!("kaboom")
		}
	}

	#[test]
	fn failures_fall_back_to_plain_traces() {
		let locals = Scope::new().with("data", Value::opaque(Explosive));
		let info =
			ErrorInfo::new("ValueError", "bad data").with_frames(vec![frame("app.py", &locals)]);
		let renderable = Renderable::from(info);

		assert_matches!(
			try_render(&renderable, &Config::default()),
			Err(Error::RenderPanic(msg)) if msg == "kaboom"
		);
		assert_eq!(
			render(&renderable, &Config::default()),
			"Stack rendering failed: panicked while rendering: kaboom\n\
			Traceback (most recent call last):\n  File \"app.py\", line 3, in work\n\
			ValueError: bad data\n"
		);
	}

	#[test]
	#[should_panic(expected = "kaboom")]
	fn failures_panic_when_debugging() {
		let locals = Scope::new().with("data", Value::opaque(Explosive));
		let renderable = Renderable::Stack(vec![frame("app.py", &locals)]);

		render(&renderable, &Config::builder().debug(true).build().unwrap());
	}

	#[test]
	fn exception_summaries() {
		let locals = locals();
		let info = ErrorInfo::new("IndexError", "list index out of range")
			.with_frames(vec![frame("app.py", &locals)]);

		assert_eq!(
			render_summary(&info.into(), &Config::default()),
			"File \"app.py\", line 3, in work\n    half = size // 2\n\
			IndexError: list index out of range"
		);
	}
}
