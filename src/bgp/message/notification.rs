use crate::bgp::message::{check_message, MsgType, MIN_MSG_SIZE};
use crate::util::parser::ParseError;
use octseq::Octets;

// Offset of the error code, right after the header.
const COFF: usize = MIN_MSG_SIZE;

/// BGP NOTIFICATION message, variant of the [`Message`] enum.
///
/// Only the error code and subcode are exposed. Mapping them onto the
/// codepoints of RFC 4271 and later is left to the session layer.
///
/// [`Message`]: crate::bgp::message::Message
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotificationMessage<Octs> {
    octets: Octs
}

message_common!(NotificationMessage);

impl<Octs: Octets> NotificationMessage<Octs> {
    pub fn from_octets(octets: Octs) -> Result<Self, ParseError> {
        Self::check(&octets)?;
        Ok(NotificationMessage { octets })
    }

    pub fn check(octets: &Octs) -> Result<(), ParseError> {
        let parser = check_message(octets, MsgType::Notification)?;
        if parser.remaining() < 2 {
            return Err(ParseError::form_error(
                "NOTIFICATION without error code"
            ));
        }
        Ok(())
    }

    pub fn code(&self) -> u8 {
        self.octets.as_ref()[COFF]
    }

    pub fn subcode(&self) -> u8 {
        self.octets.as_ref()[COFF+1]
    }

    /// Returns the diagnostic data, if any.
    pub fn data(&self) -> Option<&[u8]> {
        if self.as_ref().len() > COFF + 2 {
            Some(&self.as_ref()[COFF+2..])
        } else {
            None
        }
    }
}

//------------ Tests ---------------------------------------------------------
