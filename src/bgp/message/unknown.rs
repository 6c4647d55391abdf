use crate::bgp::message::{check_header, Message, MsgType};
use crate::util::parser::ParseError;
use octseq::{Octets, Parser};

/// A well-formed BGP message of a type without a dedicated variant.
///
/// Only the header is checked. Register [`UnknownMessage::decode`] for a
/// type code to receive such messages as [`Message::Unknown`] instead of
/// having them skipped, e.g. for ROUTE-REFRESH (RFC 2918).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownMessage<Octs> {
    octets: Octs
}

message_common!(UnknownMessage);

impl<Octs: Octets> UnknownMessage<Octs> {
    pub fn from_octets(octets: Octs) -> Result<Self, ParseError> {
        check_header(&mut Parser::from_ref(&octets))?;
        Ok(UnknownMessage { octets })
    }

    /// Decoder suitable for [`RegistryBuilder::register_type`].
    ///
    /// [`RegistryBuilder::register_type`]: crate::bgp::message::RegistryBuilder::register_type
    pub fn decode(octets: Octs) -> Result<Message<Octs>, ParseError> {
        Self::from_octets(octets).map(Message::Unknown)
    }

    /// Returns the message type.
    pub fn msg_type(&self) -> MsgType {
        self.header().msg_type()
    }
}

//------------ Tests ---------------------------------------------------------
