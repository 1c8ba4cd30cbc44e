use super::{ColorSeed, Hsv};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::str::FromStr;

/// The parts of a trace that get a fixed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
	ExceptionType,
	ExceptionMsg,
	Highlight,
	Header,
	Lineno,
	ArrowLineno,
	Dots,
	SourceBold,
	SourceDefault,
	SourceComment,
	VarInvisible,
}

/// A color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum Scheme {
	DarkBg,
	#[default]
	DarkBg2,
	DarkBg3,
	LightBg,
	LightBg2,
	LightBg3,
}

type Palette = [Hsv; 11];

const fn hsv(hue: f64, sat: f64, val: f64, bold: bool) -> Hsv {
	Hsv::new(hue, sat, val, bold)
}

#[rustfmt::skip]
const DARKBG: Palette = [
	hsv(0.0, 0.9, 0.6, false), hsv(0.0, 0.9, 0.6, true), hsv(0.0, 0.0, 0.8, true),
	hsv(0.0, 0.0, 0.3, false), hsv(0.0, 0.0, 0.1, false), hsv(0.0, 0.0, 0.2, true),
	hsv(0.0, 0.0, 0.6, false), hsv(0.0, 0.0, 0.6, true), hsv(0.0, 0.0, 0.7, false),
	hsv(0.0, 0.0, 0.2, false), hsv(0.6, 0.4, 0.4, false),
];

#[rustfmt::skip]
const DARKBG2: Palette = [
	hsv(0.0, 1.0, 0.8, true), hsv(0.0, 1.0, 0.8, true), hsv(0.0, 0.0, 1.0, true),
	hsv(0.0, 0.0, 0.6, false), hsv(0.0, 0.0, 0.2, true), hsv(0.0, 0.0, 0.8, true),
	hsv(0.0, 0.0, 0.4, false), hsv(0.0, 0.0, 0.8, true), hsv(0.0, 0.0, 0.8, false),
	hsv(0.0, 0.0, 0.2, false), hsv(0.6, 0.4, 0.4, false),
];

#[rustfmt::skip]
const DARKBG3: Palette = [
	hsv(0.0, 1.0, 0.8, true), hsv(0.0, 1.0, 0.8, true), hsv(0.0, 1.0, 0.8, true),
	hsv(0.0, 0.0, 0.8, true), hsv(0.0, 0.0, 0.2, true), hsv(0.0, 0.0, 0.8, true),
	hsv(0.0, 0.0, 0.4, false), hsv(0.0, 0.0, 0.8, true), hsv(0.0, 0.0, 0.8, false),
	hsv(0.0, 0.0, 0.2, false), hsv(0.6, 0.4, 0.4, false),
];

#[rustfmt::skip]
const LIGHTBG: Palette = [
	hsv(0.0, 1.0, 0.6, false), hsv(0.0, 1.0, 0.6, true), hsv(0.0, 0.0, 0.0, true),
	hsv(0.0, 0.0, 0.2, false), hsv(0.0, 0.0, 0.8, true), hsv(0.0, 0.0, 0.3, true),
	hsv(0.0, 0.0, 0.4, false), hsv(0.0, 0.0, 0.2, true), hsv(0.0, 0.0, 0.1, false),
	hsv(0.0, 0.0, 0.6, false), hsv(0.6, 0.4, 0.2, false),
];

#[rustfmt::skip]
const LIGHTBG2: Palette = [
	hsv(0.0, 1.0, 0.6, false), hsv(0.0, 1.0, 0.6, true), hsv(0.0, 0.0, 0.0, true),
	hsv(0.0, 0.0, 0.1, false), hsv(0.0, 0.0, 0.5, true), hsv(0.0, 0.0, 0.1, true),
	hsv(0.0, 0.0, 0.4, false), hsv(0.0, 0.0, 0.1, true), hsv(0.0, 0.0, 0.0, false),
	hsv(0.0, 0.0, 0.6, false), hsv(0.6, 0.4, 0.2, false),
];

#[rustfmt::skip]
const LIGHTBG3: Palette = [
	hsv(0.0, 1.0, 0.7, false), hsv(0.0, 1.0, 0.7, true), hsv(0.0, 1.0, 0.6, true),
	hsv(0.0, 0.0, 0.1, true), hsv(0.0, 0.0, 0.5, true), hsv(0.0, 0.0, 0.1, true),
	hsv(0.0, 0.0, 0.4, false), hsv(0.0, 0.0, 0.0, true), hsv(0.0, 0.0, 0.0, false),
	hsv(0.0, 0.0, 0.6, false), hsv(0.6, 0.4, 0.2, false),
];

impl Scheme {
	pub const ALL: [Self; 6] =
		[Self::DarkBg, Self::DarkBg2, Self::DarkBg3, Self::LightBg, Self::LightBg2, Self::LightBg3];

	pub const fn name(self) -> &'static str {
		match self {
			Self::DarkBg => "darkbg",
			Self::DarkBg2 => "darkbg2",
			Self::DarkBg3 => "darkbg3",
			Self::LightBg => "lightbg",
			Self::LightBg2 => "lightbg2",
			Self::LightBg3 => "lightbg3",
		}
	}

	const fn palette(self) -> &'static Palette {
		match self {
			Self::DarkBg => &DARKBG,
			Self::DarkBg2 => &DARKBG2,
			Self::DarkBg3 => &DARKBG3,
			Self::LightBg => &LIGHTBG,
			Self::LightBg2 => &LIGHTBG2,
			Self::LightBg3 => &LIGHTBG3,
		}
	}

	/// The fixed color of `role`.
	pub fn role(self, role: Role) -> Hsv {
		self.palette()[role as usize]
	}

	/// Picks the color of a variable. The same seed always gets the same color.
	pub fn get_random(self, seed: &ColorSeed, highlight: bool) -> Hsv {
		let mut rng = StdRng::seed_from_u64(seed.stable_hash());
		let hue = rng.gen_range(0.05..0.7);

		let (val, bold) = match self {
			Self::DarkBg | Self::LightBg => (0.5, highlight),
			Self::DarkBg2 => (0.8, highlight),
			Self::DarkBg3 => (if highlight { 0.8 } else { 0.5 }, highlight),
			Self::LightBg2 | Self::LightBg3 => (0.5, true),
		};

		Hsv::new(hue, 1.0, val, bold)
	}
}

impl FromStr for Scheme {
	type Err = Error;

	fn from_str(name: &str) -> Result<Self> {
		if name == "color" {
			return Ok(Self::DarkBg2);
		}

		Self::ALL
			.into_iter()
			.find(|scheme| scheme.name() == name)
			.ok_or_else(|| Error::InvalidOption { option: "style", value: name.to_owned() })
	}
}

impl TryFrom<String> for Scheme {
	type Error = Error;

	fn try_from(name: String) -> Result<Self> {
		name.parse()
	}
}
