#[cfg(feature = "bgp")]
#[macro_use]
pub(crate) mod macros;

#[cfg(feature = "bgp")]
pub(crate) mod parser;
