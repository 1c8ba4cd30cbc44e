use super::{format_stack, format_summary};
use crate::color::Role;
use crate::config::{AddSummary, Config, Style};
use crate::frame::FrameRecord;
use crate::Result;

/// Stacks longer than this many lines get a summary when [`AddSummary::Auto`] is used.
const SUMMARY_THRESHOLD: usize = 50;

const CAUSE_HINT: &str =
	"\n\nThe above exception was the direct cause of the following exception:\n\n";
const CONTEXT_HINT: &str =
	"\n\nWhile handling the above exception, another exception occurred:\n\n";

/// An error, the frames it passed through, and the errors it was chained to.
#[derive(Debug, Clone, Default)]
pub struct ErrorInfo {
	pub type_name: String,
	pub message: String,

	/// Outermost first.
	pub frames: Vec<FrameRecord>,

	/// The error that explicitly caused this one.
	pub cause: Option<Box<ErrorInfo>>,

	/// The error being handled when this one occurred.
	pub context: Option<Box<ErrorInfo>>,

	/// Whether [`context`](Self::context) should be left out.
	pub suppress_context: bool,
}

impl ErrorInfo {
	pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
		Self { type_name: type_name.into(), message: message.into(), ..Self::default() }
	}

	#[must_use]
	pub fn with_frames(mut self, frames: Vec<FrameRecord>) -> Self {
		self.frames = frames;
		self
	}

	#[must_use]
	pub fn caused_by(mut self, cause: Self) -> Self {
		self.cause = Some(Box::new(cause));
		self.suppress_context = true;
		self
	}

	#[must_use]
	pub fn during(mut self, context: Self) -> Self {
		self.context = Some(Box::new(context));
		self
	}

	/// The error rendered before this one, and the sentence connecting them.
	pub fn chained(&self) -> Option<(&Self, &'static str)> {
		if let Some(cause) = &self.cause {
			return Some((cause, CAUSE_HINT));
		}

		match &self.context {
			Some(context) if !self.suppress_context => Some((context, CONTEXT_HINT)),
			_ => None,
		}
	}

	/// A classic traceback without any source or variables, chained errors included.
	pub fn plain(&self) -> String {
		let mut msg = String::new();

		if let Some((chained, hint)) = self.chained() {
			msg.push_str(&chained.plain());
			msg.push_str(hint);
		}

		msg.push_str(&plain_traceback(&self.frames));
		msg.push_str(&format_exception_message(self, Style::Plaintext));
		msg.push('\n');
		msg
	}
}

pub(super) fn plain_traceback(frames: &[FrameRecord]) -> String {
	let mut msg = String::new();

	if frames.is_empty() {
		return msg;
	}

	msg.push_str("Traceback (most recent call last):\n");
	for frame in frames {
		msg.push_str(&format!(
			"  File \"{}\", line {}, in {}\n",
			frame.location, frame.highlighted_line, frame.scope_name
		));
	}

	msg
}

/// `<type>: <message>`, or just the type if there's no message.
pub fn format_exception_message(info: &ErrorInfo, style: Style) -> String {
	let type_name = if info.message.is_empty() {
		info.type_name.clone()
	} else {
		format!("{}: ", info.type_name)
	};

	match style.scheme() {
		None => type_name + &info.message,
		Some(scheme) => {
			let message = scheme.role(Role::ExceptionMsg).paint(&info.message);
			scheme.role(Role::ExceptionType).paint(&type_name) + &message
		}
	}
}

/// Renders an error: the errors it's chained to, its stack, possibly a summary of that stack,
/// and finally its type and message.
///
/// Errors whose type is in [`Config::suppressed_error_types`] only have their summary shown.
///
/// # Errors
/// Returns any error rendering the stacks produces.
#[tracing::instrument(skip_all, fields(error = %info.type_name, frames = info.frames.len()))]
pub fn format_exception(info: &ErrorInfo, config: &Config) -> Result<String> {
	let mut msg = String::new();

	if let Some((chained, hint)) = info.chained() {
		msg.push_str(&format_exception(chained, config)?);

		match config.style.scheme() {
			None => msg.push_str(hint),
			Some(scheme) => msg.push_str(&scheme.role(Role::ExceptionType).paint(hint)),
		}
	}

	let mut parts = Vec::new();
	if !info.frames.is_empty() {
		if config.suppressed_error_types.contains(&info.type_name) {
			parts.push(format_summary(&info.frames, config)?);
		} else {
			let stack = format_stack(&info.frames, config)?;
			let add_summary = match config.add_summary {
				AddSummary::Auto => stack.matches('\n').count() > SUMMARY_THRESHOLD,
				AddSummary::Always => true,
				AddSummary::Never => false,
			};

			parts.push(stack);

			if add_summary {
				let marker = if config.reverse {
					"---- (full traceback below) ----\n\n"
				} else {
					"---- (full traceback above) ----\n"
				};
				parts.push(marker.to_owned());
				parts.push(format_summary(&info.frames, config)? + "\n");
			}
		}
	}

	let spacer = if config.reverse { "\n\n" } else { "" };
	parts.push(spacer.to_owned());
	parts.push(format_exception_message(info, config.style));

	if config.reverse {
		parts.reverse();
	}

	msg.push_str(&parts.concat());
	Ok(msg)
}
