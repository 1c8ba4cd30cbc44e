use super::{trim_indentation, visible_bindings, visible_lines, FrameRecord};
use crate::color::{ColorMode, ColorSeed, Hsv, Role, Scheme};
use crate::config::{Config, Patterns, ShowVals, SourceLines, Style};
use crate::render::{format_value, FormatOptions};
use crate::resolve::Binding;
use crate::source::{RegionKind, SourceRegion};
use crate::Result;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Variable values are indented by the length of their name plus this.
const VAR_INDENT: usize = 5;

const GAP: &str = " (...)\n";

type Colors = IndexMap<String, (Hsv, Hsv)>;

/// The options of a single frame.
#[derive(Debug, Clone)]
pub struct FrameConfig {
	pub source_lines: SourceLines,
	pub source_lines_after: usize,
	pub show_signature: bool,
	pub show_vals: ShowVals,
	pub truncate_vals: Option<usize>,
	pub line_wrap: usize,
	pub suppressed_paths: Patterns,
	pub color_mode: ColorMode,
}

impl Default for FrameConfig {
	fn default() -> Self {
		Self::from(&Config::default())
	}
}

impl From<&Config> for FrameConfig {
	fn from(config: &Config) -> Self {
		Self {
			source_lines: config.source_lines,
			source_lines_after: config.source_lines_after,
			show_signature: config.show_signature,
			show_vals: config.show_vals,
			truncate_vals: config.truncate_vals,
			line_wrap: config.line_wrap,
			suppressed_paths: config.suppressed_paths.clone(),
			color_mode: config.color_mode,
		}
	}
}

impl FrameConfig {
	/// At most the highlighted line, no signature and no variables.
	#[must_use]
	pub fn minimal(&self) -> Self {
		Self {
			source_lines: self.source_lines.min_one(),
			show_signature: false,
			show_vals: ShowVals::None,
			..self.clone()
		}
	}

	/// At most the highlighted line, but variables and the signature as configured.
	#[must_use]
	pub fn reduced(&self) -> Self {
		Self { source_lines: self.source_lines.min_one(), ..self.clone() }
	}
}

impl SourceLines {
	fn min_one(self) -> Self {
		match self {
			Self::Count(0) => Self::Count(0),
			_ => Self::Count(1),
		}
	}
}

/// Renders [`FrameRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct FrameFormatter {
	config: FrameConfig,
	scheme: Option<Scheme>,
}

impl FrameFormatter {
	pub fn new(config: FrameConfig, style: Style) -> Self {
		Self { config, scheme: style.scheme() }
	}

	pub fn config(&self) -> &FrameConfig {
		&self.config
	}

	fn paint(&self, role: Role, text: &str) -> String {
		match self.scheme {
			Some(scheme) => scheme.role(role).paint(text),
			None => text.to_owned(),
		}
	}

	fn visible_lines(&self, record: &FrameRecord) -> Vec<usize> {
		let config = &self.config;
		visible_lines(record, config.source_lines, config.source_lines_after, config.show_signature)
	}

	/// `File "<location>", line <n>, in <scope>`
	pub fn headline(&self, record: &FrameRecord) -> String {
		let headline = format!(
			"File \"{}\", line {}, in {}\n",
			record.location, record.highlighted_line, record.scope_name
		);
		self.paint(Role::Header, &headline)
	}

	/// Renders a frame: its headline, its visible source lines and its visible variables.
	///
	/// # Errors
	/// Returns [`Error::MixedIndentation`](crate::Error::MixedIndentation) if the visible lines
	/// are indented inconsistently.
	pub fn format(&self, record: &FrameRecord) -> Result<String> {
		let config = &self.config;
		let lines = self.visible_lines(record);
		let trimmed = trim_indentation(&record.line_map, &lines)?;
		let bindings = visible_bindings(record, &lines, config.show_vals, &config.suppressed_paths);
		let colors = self.pick_colors(&bindings);

		let mut msg = self.headline(record);
		if let Some(error) = &record.source_error {
			msg.push_str(&self.paint(Role::SourceComment, &format!("    # {error}\n")));
		}

		msg.push_str(&self.format_listing(record, &trimmed, &colors));

		if !bindings.is_empty() {
			msg.push_str(&self.format_assignments(record, &bindings, &colors));
		} else if config.show_signature || !matches!(config.source_lines, SourceLines::Count(0 | 1))
		{
			msg.push('\n');
		}

		Ok(msg)
	}

	/// Renders a frame whose source couldn't be shown: its headline, a note saying why, and the
	/// variables of the lines that would have been visible.
	pub fn format_degraded(&self, record: &FrameRecord, note: &str) -> String {
		let config = &self.config;
		let lines = self.visible_lines(record);
		let bindings = visible_bindings(record, &lines, config.show_vals, &config.suppressed_paths);
		let colors = self.pick_colors(&bindings);

		let mut msg = self.headline(record);
		msg.push_str(&self.paint(Role::SourceComment, &format!("    # {note}\n")));

		if !bindings.is_empty() {
			msg.push_str(&self.format_assignments(record, &bindings, &colors));
		}

		msg
	}

	/// The color of each binding, once on the highlighted line and once elsewhere.
	fn pick_colors(&self, bindings: &[&Binding]) -> Colors {
		let Some(scheme) = self.scheme else {
			return Colors::new();
		};

		bindings
			.iter()
			.map(|binding| {
				let seed = ColorSeed::new(self.config.color_mode, &binding.name, &binding.value);
				let colors = (scheme.get_random(&seed, true), scheme.get_random(&seed, false));
				(binding.name.clone(), colors)
			})
			.collect()
	}

	fn format_region(
		&self,
		region: &SourceRegion,
		line: usize,
		highlighted: usize,
		colors: &Colors,
	) -> String {
		let Some(scheme) = self.scheme else {
			return region.text.clone();
		};

		let (text, newline) = match region.text.strip_suffix('\n') {
			Some(text) => (text, "\n"),
			None => (region.text.as_str(), ""),
		};

		let color = match region.kind {
			RegionKind::Keyword | RegionKind::Operator | RegionKind::Call => {
				scheme.role(Role::SourceBold)
			}
			RegionKind::Comment => scheme.role(Role::SourceComment),
			RegionKind::Identifier => match colors.get(&region.text) {
				Some(&(on_line, _)) if line == highlighted => on_line,
				Some(&(_, elsewhere)) => elsewhere,
				None => scheme.role(Role::SourceDefault),
			},
			RegionKind::Raw => scheme.role(Role::SourceDefault),
		};

		if text.is_empty() {
			return newline.to_owned();
		}

		format!("{}{newline}", color.paint(text))
	}

	fn format_listing(
		&self,
		record: &FrameRecord,
		trimmed: &BTreeMap<usize, Vec<SourceRegion>>,
		colors: &Colors,
	) -> String {
		let highlighted = record.highlighted_line;
		let mut msg = String::new();
		let mut previous = None;

		for (&line, regions) in trimmed {
			if previous.is_some_and(|previous| previous + 1 != line) {
				msg.push_str(&self.paint(Role::Dots, GAP));
			}
			previous = Some(line);

			let prefix = match (trimmed.len(), line == highlighted) {
				(1, _) => self.paint(Role::SourceDefault, "    "),
				(_, true) => self.paint(Role::ArrowLineno, &format!("--> {line:<3}  ")),
				(_, false) => self.paint(Role::Lineno, &format!("    {line:<3}  ")),
			};

			msg.push_str(&prefix);
			for region in regions {
				msg.push_str(&self.format_region(region, line, highlighted, colors));
			}

			if !msg.ends_with('\n') {
				msg.push('\n');
			}
		}

		msg
	}

	fn format_assignments(
		&self,
		record: &FrameRecord,
		bindings: &[&Binding],
		colors: &Colors,
	) -> String {
		let separator = self.paint(Role::Dots, &format!("    {}\n", ".".repeat(50)));
		let on_highlighted = record.names.names_on(record.highlighted_line);
		let mut msg = separator.clone();

		for binding in bindings {
			let opts = FormatOptions {
				indent: binding.name.chars().count() + VAR_INDENT + 3,
				truncation: self.config.truncate_vals,
				wrap: self.config.line_wrap,
				..FormatOptions::default()
			};

			let value = format_value(&binding.value, &opts);
			let assignment = format!("{}{} = {value}", " ".repeat(VAR_INDENT), binding.name);
			match colors.get(&binding.name) {
				Some(&(on_line, elsewhere)) => {
					let highlighted = on_highlighted.contains(&binding.name);
					let color = if highlighted { on_line } else { elsewhere };
					msg.push_str(&color.paint(&assignment));
				}
				None => msg.push_str(&assignment),
			}
			msg.push('\n');
		}

		msg.push_str(&separator);
		msg.push('\n');
		msg
	}
}
