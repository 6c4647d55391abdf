use crate::bgp::message::{check_message, MsgType, MIN_MSG_SIZE};
use crate::util::parser::ParseError;
use octseq::Octets;

/// Smallest UPDATE: the withdrawn routes length and total path attribute
/// length fields, both zero.
const MIN_UPDATE_SIZE: usize = MIN_MSG_SIZE + 4;

/// BGP UPDATE message, variant of the [`Message`] enum.
///
/// Withdrawals, path attributes and NLRI are carried in the body as-is.
///
/// [`Message`]: crate::bgp::message::Message
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateMessage<Octs> {
    octets: Octs
}

message_common!(UpdateMessage);

impl<Octs: Octets> UpdateMessage<Octs> {
    pub fn from_octets(octets: Octs) -> Result<Self, ParseError> {
        Self::check(&octets)?;
        Ok(UpdateMessage { octets })
    }

    pub fn check(octets: &Octs) -> Result<(), ParseError> {
        let parser = check_message(octets, MsgType::Update)?;
        if parser.remaining() < MIN_UPDATE_SIZE - MIN_MSG_SIZE {
            return Err(ParseError::form_error("UPDATE of <23 bytes"));
        }
        Ok(())
    }

    /// Returns whether this is an End-of-RIB marker for IPv4 unicast.
    ///
    /// That is, an UPDATE without withdrawals, attributes or NLRI
    /// (RFC 4724).
    pub fn is_eor(&self) -> bool {
        self.as_ref().len() == MIN_UPDATE_SIZE
    }
}

//------------ Tests ---------------------------------------------------------
