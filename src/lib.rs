//! Tracebacks that show the source around each frame and the values of the variables in it.
//!
//! Execution contexts are captured as [`frame::Snapshot`]s, inspected into [`FrameRecord`]s,
//! and rendered either one at a time with a [`FrameFormatter`] or as a whole with [`render`].
#![allow(clippy::module_inception)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate static_assertions as sa;

pub mod color;
pub mod config;
mod containers;
mod error;
pub mod frame;
pub mod render;
pub mod resolve;
pub mod source;
pub mod stack;
pub mod trace;
pub mod value;

pub use config::Config;
pub use containers::{MaybeSendSync, Mutable, RefCount};
pub use error::{Error, LexErrorKind, Result};
pub use frame::{FrameFormatter, FrameRecord, Snapshot, SourceText};
pub use resolve::{NameResolver, Scope};
pub use stack::{
	format_exception, format_stack, format_summary, render, render_summary, try_render, ErrorInfo,
	Renderable,
};
pub use trace::{TraceEvent, TracePrinter};
pub use value::Value;
