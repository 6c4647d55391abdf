//! Types and parsing for BGP messages.

pub mod framer;
pub mod message;

#[cfg(feature = "io")]
pub mod io;

pub use crate::util::parser::{FormError, ParseError};
pub use framer::{Framer, FramerConfig};
