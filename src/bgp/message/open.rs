use crate::bgp::message::{check_message, MsgType, MIN_MSG_SIZE};
use crate::util::parser::ParseError;
use octseq::Octets;

/// Smallest OPEN: version, my AS, hold time, BGP identifier and the
/// optional parameters length.
const MIN_OPEN_SIZE: usize = MIN_MSG_SIZE + 10;

/// BGP OPEN message, variant of the [`Message`] enum.
///
/// The body (version, AS, hold time, BGP identifier and capabilities) is
/// not interpreted here.
///
/// [`Message`]: crate::bgp::message::Message
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpenMessage<Octs> {
    octets: Octs
}

message_common!(OpenMessage);

impl<Octs: Octets> OpenMessage<Octs> {
    pub fn from_octets(octets: Octs) -> Result<Self, ParseError> {
        Self::check(&octets)?;
        Ok(OpenMessage { octets })
    }

    pub fn check(octets: &Octs) -> Result<(), ParseError> {
        let parser = check_message(octets, MsgType::Open)?;
        if parser.remaining() < MIN_OPEN_SIZE - MIN_MSG_SIZE {
            return Err(ParseError::form_error("OPEN of <29 bytes"));
        }
        Ok(())
    }
}

//------------ Tests ---------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn no_optional_parameters() {
        // BGP OPEN message, 2-octet ASN 64496, no opt params
        let buf = vec![
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0x00, 0x1d, 0x01, 0x04, 0xfb, 0xf0, 0x00, 0x5a,
            0xc0, 0x00, 0x02, 0x01, 0x00
        ];

        let bb = Bytes::from(buf);
        let open = OpenMessage::from_octets(bb).unwrap();
        assert_eq!(open.length(), 29);
        assert_eq!(open.header().msg_type(), MsgType::Open);
        assert_eq!(
            open.body(),
            Bytes::from_static(
                &[0x04, 0xfb, 0xf0, 0x00, 0x5a, 0xc0, 0x00, 0x02, 0x01, 0x00]
            )
        );
    }

    #[test]
    fn truncated() {
        let buf = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0x00, 0x17, 0x01, 0x04, 0xfb, 0xf0, 0x00
        ];
        assert_eq!(
            OpenMessage::from_octets(&buf[..]),
            Err(ParseError::form_error("OPEN of <29 bytes"))
        );
    }
}
