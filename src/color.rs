//! Assigning colors to variables, and encoding them for terminals.

mod schemes;

pub use schemes::{Role, Scheme};

use crate::render::{format_value, FormatOptions};
use crate::resolve::BoundValue;
use crate::{Error, Result};
use std::str::FromStr;

/// Resets all attributes.
pub const RESET: &str = "\x1b[0m";

/// A color in hue, saturation and brightness, each in `0.0..=1.0`, plus whether it's bold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
	pub hue: f64,
	pub sat: f64,
	pub val: f64,
	pub bold: bool,
}

impl Hsv {
	pub const fn new(hue: f64, sat: f64, val: f64, bold: bool) -> Self {
		Self { hue, sat, val, bold }
	}

	/// Converts to red, green and blue.
	pub fn to_rgb(self) -> (f64, f64, f64) {
		let Self { hue, sat, val, .. } = self;
		if sat == 0.0 {
			return (val, val, val);
		}

		let sextant = (hue * 6.0).floor();
		let frac = hue * 6.0 - sextant;
		let p = val * (1.0 - sat);
		let q = val * (1.0 - sat * frac);
		let t = val * (1.0 - sat * (1.0 - frac));

		match sextant.rem_euclid(6.0) as u8 {
			0 => (val, t, p),
			1 => (q, val, p),
			2 => (p, val, t),
			3 => (p, q, val),
			4 => (t, p, val),
			_ => (val, p, q),
		}
	}

	/// The index of the closest color in the 256-color palette's 6x6x6 cube.
	pub fn to_ansi_index(self) -> u8 {
		let (red, green, blue) = self.to_rgb();
		let level = |channel: f64| (channel * 5.0).round().clamp(0.0, 5.0) as u8;

		16 + 36 * level(red) + 6 * level(green) + level(blue)
	}

	/// The escape sequence that switches to this color.
	pub fn escape(self) -> String {
		let bold = if self.bold { "1;" } else { "" };
		format!("\x1b[{bold}38;5;{}m", self.to_ansi_index())
	}

	/// Wraps `text` in this color.
	pub fn paint(self, text: &str) -> String {
		format!("{}{text}{RESET}", self.escape())
	}
}

/// What a variable's color is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColorSeed {
	Identity(usize),
	Text(String),
}

impl ColorSeed {
	/// Derives the seed for the variable `name` bound to `value`.
	pub fn new(mode: ColorMode, name: &str, value: &BoundValue) -> Self {
		let plain = || format_value(value, &FormatOptions::default());

		match (mode, value) {
			(ColorMode::Id, BoundValue::Value(value)) => {
				value.identity().map_or_else(|| Self::Text(plain()), Self::Identity)
			}
			(ColorMode::Repr, BoundValue::Value(value)) => {
				Self::Text(value.repr().unwrap_or_else(|_| crate::render::REPR_FAILED.to_owned()))
			}
			(ColorMode::Name, _) => Self::Text(name.to_owned()),
			_ => Self::Text(plain()),
		}
	}

	/// A hash that doesn't change between runs (FNV-1a).
	pub fn stable_hash(&self) -> u64 {
		const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
		const PRIME: u64 = 0x0100_0000_01b3;

		let (tag, bytes) = match self {
			Self::Identity(id) => (0u8, id.to_le_bytes().to_vec()),
			Self::Text(text) => (1u8, text.as_bytes().to_vec()),
		};

		std::iter::once(tag)
			.chain(bytes)
			.fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
	}
}

/// How variable colors are seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum ColorMode {
	/// By the value's identity: the same object gets the same color everywhere.
	#[default]
	Id,

	/// By the value's rendered text.
	Formatted,

	/// By the value's `repr`.
	Repr,

	/// By the variable's name.
	Name,
}

impl FromStr for ColorMode {
	type Err = Error;

	fn from_str(mode: &str) -> Result<Self> {
		match mode {
			"id" => Ok(Self::Id),
			"formatted" => Ok(Self::Formatted),
			"repr" => Ok(Self::Repr),
			"name" => Ok(Self::Name),
			_ => Err(Error::InvalidOption { option: "color_mode", value: mode.to_owned() }),
		}
	}
}

impl TryFrom<String> for ColorMode {
	type Error = Error;

	fn try_from(mode: String) -> Result<Self> {
		mode.parse()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::Value;

	#[test]
	fn ansi_encoding() {
		assert_eq!(Hsv::new(0.0, 0.0, 1.0, false).to_ansi_index(), 231);
		assert_eq!(Hsv::new(0.0, 0.0, 0.0, false).to_ansi_index(), 16);
		assert_eq!(Hsv::new(0.0, 1.0, 1.0, false).to_ansi_index(), 196);
		assert_eq!(Hsv::new(1.0 / 3.0, 1.0, 1.0, false).to_ansi_index(), 46);
		assert_eq!(Hsv::new(2.0 / 3.0, 1.0, 1.0, true).escape(), "\x1b[1;38;5;21m");
		assert_eq!(Hsv::new(0.0, 0.0, 1.0, false).paint("x"), "\x1b[38;5;231mx\x1b[0m");
	}

	#[test]
	fn seeds() {
		let list = Value::list([]);
		let bound = BoundValue::Value(list.clone());

		let seed = |mode| ColorSeed::new(mode, "x", &bound);

		assert_eq!(seed(ColorMode::Id), ColorSeed::Identity(list.identity().unwrap()));
		assert_eq!(seed(ColorMode::Name), ColorSeed::Text("x".to_owned()));
		assert_eq!(seed(ColorMode::Formatted), ColorSeed::Text("[]".to_owned()));
		assert_eq!(
			ColorSeed::new(ColorMode::Id, "x", &BoundValue::Value(5.into())),
			ColorSeed::Text("5".to_owned())
		);
	}

	#[test]
	fn stable_hash_is_stable() {
		let hash = |seed: ColorSeed| seed.stable_hash();

		assert_eq!(hash(ColorSeed::Text(String::new())), hash(ColorSeed::Text(String::new())));
		assert_ne!(hash(ColorSeed::Text("a".into())), hash(ColorSeed::Text("b".into())));
		assert_ne!(hash(ColorSeed::Identity(0)), hash(ColorSeed::Text(String::new())));
	}

	#[test]
	fn parses_modes() {
		assert_eq!("repr".parse::<ColorMode>().unwrap(), ColorMode::Repr);
		assert!("rainbow".parse::<ColorMode>().is_err());
	}
}
