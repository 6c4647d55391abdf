//! Framing and dispatch of BGP-4 messages.
//!
//! This crate finds message boundaries in a stream of octets received from
//! a BGP peer, validates the common 19 octet header and hands the complete
//! message to a decoder selected by its type code. See
//! [`bgp::framer::Framer`] for the entry point.

#[cfg(feature = "bgp")]
pub mod bgp;

//--- Private modules

mod util;
