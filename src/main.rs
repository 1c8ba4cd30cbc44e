use clap::Parser;
use stackrs::config::{ShowVals, SourceLines, Style};
use stackrs::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Renders a frame of a source file, as if execution were stopped at `--line`.
#[derive(Parser, Debug)]
#[command(name = "stackrs", version)]
struct Cli {
	/// The source file.
	#[arg(long)]
	file: PathBuf,

	/// The line being executed.
	#[arg(long)]
	line: usize,

	/// The name of the function being executed.
	#[arg(long, default_value = "<module>")]
	scope: String,

	/// A variable and its value, like `count=3` or `name='bob'`.
	#[arg(long = "var", value_name = "NAME=VALUE")]
	vars: Vec<String>,

	/// Render an error of this type raised at `--line`, like `ValueError: bad input`.
	#[arg(long)]
	error: Option<String>,

	/// `plaintext`, `color` or the name of a color scheme.
	#[arg(long, default_value = "plaintext")]
	style: Style,

	/// How many lines of source to show, or `all`.
	#[arg(long, default_value = "5")]
	source_lines: SourceLines,

	/// `all`, `like_source`, `line` or `none`.
	#[arg(long, default_value = "like_source")]
	show_vals: ShowVals,

	/// Censor the values of variables matching this regex.
	#[arg(long = "suppress-var", value_name = "REGEX")]
	suppressed_vars: Vec<String>,

	/// Show the innermost frame first.
	#[arg(long)]
	reverse: bool,
}

/// `True`, `False`, `None`, numbers and quoted strings are parsed; anything else is text.
fn parse_value(text: &str) -> Value {
	match text {
		"True" => return true.into(),
		"False" => return false.into(),
		"None" => return Value::Null,
		_ => {}
	}

	if let Ok(int) = text.parse::<i64>() {
		return int.into();
	}

	if let Ok(float) = text.parse::<f64>() {
		return float.into();
	}

	let unquoted = ['\'', '"']
		.into_iter()
		.find_map(|quote| text.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)));

	unquoted.unwrap_or(text).into()
}

fn scope(vars: &[String]) -> std::result::Result<Scope, String> {
	vars.iter()
		.map(|var| match var.split_once('=') {
			Some((name, value)) => Ok((name.trim().to_owned(), parse_value(value.trim()))),
			None => Err(format!("expected NAME=VALUE, got {var:?}")),
		})
		.collect()
}

fn run(cli: Cli) -> Result<String> {
	let config = Config::builder()
		.style(cli.style)
		.source_lines(cli.source_lines)
		.show_vals(cli.show_vals)
		.suppressed_vars(cli.suppressed_vars)
		.reverse(cli.reverse)
		.build()?;

	let locals = match scope(&cli.vars) {
		Ok(locals) => locals,
		Err(err) => return Err(Error::InvalidOption { option: "var", value: err }),
	};
	let globals = Scope::new();

	let location = cli.file.display().to_string();
	let snapshot = Snapshot::new(location, cli.scope, cli.line, &locals, &globals)
		.read_source_with(&config.lexicon);
	let record = FrameRecord::inspect_with(&snapshot, &config.suppressed_vars, &config.lexicon);
	let frames = vec![record];

	let renderable = match cli.error {
		Some(error) => {
			let (type_name, message) = error.split_once(':').unwrap_or((error.as_str(), ""));
			let info = ErrorInfo::new(type_name.trim(), message.trim());
			Renderable::Exception(info.with_frames(frames))
		}
		None => Renderable::Stack(frames),
	};

	Ok(render(&renderable, &config))
}

fn main() -> ExitCode {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| "stackrs=warn".into());

	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	match run(Cli::parse()) {
		Ok(rendered) => {
			println!("{rendered}");
			ExitCode::SUCCESS
		}
		Err(err) => {
			eprintln!("error: {err}");
			ExitCode::FAILURE
		}
	}
}
