/// Implements the accessors shared by all message types.
///
/// Every message type wraps the octets of the entire message, header
/// included, in a field called `octets`.
macro_rules! message_common {
    ($name:ident) => {
        impl<Octs: octseq::Octets> $name<Octs> {
            /// Returns a reference to the underlying octets.
            pub fn octets(&self) -> &Octs {
                &self.octets
            }

            /// Consumes the message, returning the underlying octets.
            pub fn into_octets(self) -> Octs {
                self.octets
            }

            /// Returns the [`Header`] for this message.
            ///
            /// [`Header`]: crate::bgp::message::Header
            pub fn header(&self) -> $crate::bgp::message::Header<Octs::Range<'_>> {
                $crate::bgp::message::Header::for_slice(
                    self.octets.range(..$crate::bgp::message::MIN_MSG_SIZE)
                )
            }

            /// Returns the length in bytes of the entire BGP message.
            pub fn length(&self) -> u16 {
                self.header().length()
            }

            /// Returns the payload following the header.
            pub fn body(&self) -> Octs::Range<'_> {
                self.octets.range($crate::bgp::message::MIN_MSG_SIZE..)
            }
        }

        impl<Octs: octseq::Octets> AsRef<[u8]> for $name<Octs> {
            fn as_ref(&self) -> &[u8] {
                self.octets.as_ref()
            }
        }
    }
}

pub mod builder;
pub mod keepalive;
pub mod notification;
pub mod open;
pub mod registry;
pub mod unknown;
pub mod update;

use octseq::{Octets, OctetsBuilder, Parser};
use crate::util::parser::ParseError;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::error::Error;
use crate::typeenum; // from util::macros

pub use builder::MessageBuilder;
pub use keepalive::{KeepaliveBuilder, KeepaliveMessage};
pub use notification::NotificationMessage;
pub use open::OpenMessage;
pub use registry::{DecodeFn, Registry, RegistryBuilder};
pub use unknown::UnknownMessage;
pub use update::UpdateMessage;

/// Length of the BGP header, and thus the smallest possible message.
pub const MIN_MSG_SIZE: usize = 19;

/// Largest message allowed by RFC 4271.
pub const MAX_MSG_SIZE: usize = 4096;

/// Largest message allowed when Extended Messages (RFC 8654) are in use.
pub const MAX_EXTENDED_MSG_SIZE: usize = u16::MAX as usize;

const MARKER: [u8; 16] = [0xff; 16];

//--- Generic ----------------------------------------------------------------

/// BGP message enum.
///
/// Represents the full BGP message including the 16 byte marker, the message
/// header and the message payload.
///
/// The payload of the message is not interpreted beyond the sanity checks
/// each message type performs in its `from_octets`. Message types without a
/// dedicated variant can be carried in [`Message::Unknown`] by registering
/// [`UnknownMessage::decode`] for their type code, see [`RegistryBuilder`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message<Octs> {
    Open(OpenMessage<Octs>),
    Update(UpdateMessage<Octs>),
    Notification(NotificationMessage<Octs>),
    Keepalive(KeepaliveMessage<Octs>),
    Unknown(UnknownMessage<Octs>),
}

impl<Octs: Octets> AsRef<[u8]> for Message<Octs> {
    fn as_ref(&self) -> &[u8] {
        match self {
            Message::Open(m) => m.as_ref(),
            Message::Update(m) => m.as_ref(),
            Message::Notification(m) => m.as_ref(),
            Message::Keepalive(m) => m.as_ref(),
            Message::Unknown(m) => m.as_ref(),
        }
    }
}

impl<Octs: Octets> Message<Octs> {
    /// Returns a reference to the octets of the entire message.
    pub fn octets(&self) -> &Octs {
        match self {
            Message::Open(m) => m.octets(),
            Message::Update(m) => m.octets(),
            Message::Notification(m) => m.octets(),
            Message::Keepalive(m) => m.octets(),
            Message::Unknown(m) => m.octets(),
        }
    }

    /// Returns the [`Header`] of this message.
    pub fn header(&self) -> Header<Octs::Range<'_>> {
        Header::for_slice(self.octets().range(..MIN_MSG_SIZE))
    }

    /// Returns the length in bytes of the entire BGP message.
    pub fn length(&self) -> u16 {
        self.header().length()
    }

    /// Returns the message type.
    pub fn msg_type(&self) -> MsgType {
        self.header().msg_type()
    }

    /// Returns the uninterpreted payload following the header.
    pub fn body(&self) -> Octs::Range<'_> {
        self.octets().range(MIN_MSG_SIZE..)
    }

    /// Appends the wire representation of this message to `target`.
    pub fn compose<Target: OctetsBuilder>(
        &self,
        target: &mut Target
    ) -> Result<(), MessageError> {
        target.append_slice(self.as_ref()).map_err(|_| MessageError::ShortBuf)
    }

    /// Returns the wire representation of this message as a `Vec<u8>`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_ref().to_vec()
    }
}

impl<Octs: Octets> Message<Octs> {
    /// Create a Message from an octets sequence.
    ///
    /// The octets must hold exactly one message. Types other than OPEN,
    /// UPDATE, NOTIFICATION and KEEPALIVE result in
    /// [`ParseError::UnrecognizedType`]. Use a [`Registry`] to decode other
    /// types.
    pub fn from_octets(octets: Octs) -> Result<Message<Octs>, ParseError> {
        let msg_type = {
            let mut parser = Parser::from_ref(&octets);
            check_header(&mut parser)?
        };
        match msg_type {
            MsgType::Open =>
                Ok(Message::Open(OpenMessage::from_octets(octets)?)),
            MsgType::Update =>
                Ok(Message::Update(UpdateMessage::from_octets(octets)?)),
            MsgType::Notification =>
                Ok(Message::Notification(
                    NotificationMessage::from_octets(octets)?
                )),
            MsgType::Keepalive =>
                Ok(Message::Keepalive(
                        KeepaliveMessage::from_octets(octets)?
                )),
            MsgType::Unimplemented(t) => Err(ParseError::UnrecognizedType(t)),
        }
    }
}

impl<Octs: Octets> Display for Message<Octs> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{} message, length {}", self.msg_type(), self.length())
    }
}

typeenum!(
/// BGP Message types.
    MsgType, u8,
    1 => Open,
    2 => Update,
    3 => Notification,
    4 => Keepalive,
);

//--- From / TryFrom ---------------------------------------------------------

impl<Octs: Octets> TryFrom<Message<Octs>> for OpenMessage<Octs> {
    type Error = MessageError;

    fn try_from(msg: Message<Octs>) -> Result<Self, Self::Error> {
        match msg {
            Message::Open(u) => Ok(u),
            _ => Err(MessageError::InvalidMsgType),
        }
    }
}

impl<Octs: Octets> TryFrom<Message<Octs>> for UpdateMessage<Octs> {
    type Error = MessageError;

    fn try_from(msg: Message<Octs>) -> Result<Self, Self::Error> {
        match msg {
            Message::Update(u) => Ok(u),
            _ => Err(MessageError::InvalidMsgType),
        }
    }
}

impl<Octs: Octets> TryFrom<Message<Octs>> for NotificationMessage<Octs> {
    type Error = MessageError;

    fn try_from(msg: Message<Octs>) -> Result<Self, Self::Error> {
        match msg {
            Message::Notification(u) => Ok(u),
            _ => Err(MessageError::InvalidMsgType),
        }
    }
}

impl<Octs: Octets> TryFrom<Message<Octs>> for KeepaliveMessage<Octs> {
    type Error = MessageError;

    fn try_from(msg: Message<Octs>) -> Result<Self, Self::Error> {
        match msg {
            Message::Keepalive(u) => Ok(u),
            _ => Err(MessageError::InvalidMsgType),
        }
    }
}

//--- Header -----------------------------------------------------------------
// As per RFC4271:
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  |                                                               |
//  +                                                               +
//  |                                                               |
//  +                                                               +
//  |                           Marker                              |
//  +                                                               +
//  |                                                               |
//  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  |          Length               |      Type     |
//  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

/// BGP Message header.
///
/// Wraps the first [`MIN_MSG_SIZE`] octets of a message. A `Header` obtained
/// via [`decode_header`] has a verified marker; the length field is not
/// checked against any bounds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Header<Octs>(Octs);

impl<Octs: AsMut<[u8]>> Header<Octs> {
    pub fn set_type(&mut self, typ: MsgType) {
        self.0.as_mut()[18] = typ.into();
    }

    pub fn set_length(&mut self, len: u16) {
        self.0.as_mut()[16..=17].copy_from_slice( &(len.to_be_bytes()) );
    }
}

impl<Octs: AsRef<[u8]>> AsRef<[u8]> for Header<Octs> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Header<Vec<u8>> {
    /// Creates a header with a valid marker, the minimum length and the
    /// given type.
    pub fn with_type(typ: MsgType) -> Self {
        let mut buf = vec![0xff; MIN_MSG_SIZE]; // set marker
        buf[16] = 0;
        buf[17] = MIN_MSG_SIZE as u8;
        buf[18] = typ.into();
        Header(buf)
    }
}

impl<Octs: AsRef<[u8]>> Header<Octs> {
    /// Create a Header from an Octets.
    ///
    /// The octets must be at least [`MIN_MSG_SIZE`] long. No checks are
    /// done, use [`decode_header`] for untrusted input.
    pub fn for_slice(s: Octs) -> Self {
        Header(s)
    }

    /// Returns the marker octets.
    pub fn marker(&self) -> &[u8] {
        &self.0.as_ref()[..16]
    }

    /// Returns the value of the length field in this header.
    pub fn length(&self) -> u16 {
        u16::from_be_bytes([self.0.as_ref()[16], self.0.as_ref()[17]])
    }

    /// Returns the value of the message type field in this header.
    pub fn msg_type(&self) -> MsgType {
        self.0.as_ref()[18].into()
    }
}

/// Decodes the header at the start of `buf`.
///
/// Returns `Ok(None)` if `buf` is shorter than a header, in which case the
/// caller should wait for more data. A header with a marker other than
/// sixteen `0xff` octets results in [`ParseError::InvalidMarker`].
pub fn decode_header<'a, Src>(
    buf: &'a Src
) -> Result<Option<Header<Src::Range<'a>>>, ParseError>
where
    Src: Octets + ?Sized,
{
    if buf.as_ref().len() < MIN_MSG_SIZE {
        return Ok(None);
    }
    let mut parser = Parser::from_ref(buf);
    Marker::check(&mut parser)?;
    Ok(Some(Header(buf.range(..MIN_MSG_SIZE))))
}

/// Appends a complete message of type `typ` carrying `body` to `target`.
///
/// The length field is set to the length of `body` plus the header.
pub fn encode_header<Target: OctetsBuilder>(
    target: &mut Target,
    typ: MsgType,
    body: &[u8],
) -> Result<(), MessageError> {
    let typ = u8::from(typ);
    if typ == 0 {
        return Err(MessageError::InvalidMessageType);
    }
    let len = MIN_MSG_SIZE + body.len();
    let len = u16::try_from(len).map_err(|_| MessageError::LongMessage(len))?;
    target.append_slice(&MARKER).map_err(|_| MessageError::ShortBuf)?;
    target.append_slice(&len.to_be_bytes())
        .map_err(|_| MessageError::ShortBuf)?;
    target.append_slice(&[typ]).map_err(|_| MessageError::ShortBuf)?;
    target.append_slice(body).map_err(|_| MessageError::ShortBuf)
}

/// Checks the header of a message that is supposed to span the entire
/// remainder of `parser`, returning its type.
///
/// On success, the parser is positioned at the start of the body.
pub(crate) fn check_header<R>(
    parser: &mut Parser<'_, R>
) -> Result<MsgType, ParseError>
where
    R: AsRef<[u8]> + ?Sized,
{
    let available = parser.remaining();
    Marker::check(parser)?;
    let len = usize::from(parser.parse_u16_be()?);
    if len < MIN_MSG_SIZE || len != available {
        return Err(ParseError::form_error("invalid length"));
    }
    Ok(parser.parse_u8()?.into())
}

/// Like [`check_header`], but also requires the message to be of type
/// `expected`.
pub(crate) fn check_message<R>(
    octets: &R,
    expected: MsgType,
) -> Result<Parser<'_, R>, ParseError>
where
    R: AsRef<[u8]> + ?Sized,
{
    let mut parser = Parser::from_ref(octets);
    if check_header(&mut parser)? != expected {
        return Err(ParseError::form_error("unexpected message type"));
    }
    Ok(parser)
}

struct Marker;
impl Marker {
    fn check<R: AsRef<[u8]> + ?Sized>(parser: &mut Parser<'_, R>)
        -> Result<(), ParseError>
    {
        let mut buf = [0u8; 16];
        parser.parse_buf(&mut buf)?;
        if buf != MARKER {
            return Err(ParseError::InvalidMarker)
        }
        Ok(())
    }
}

//--- Errors -----------------------------------------------------------------

/// Errors related to BGP messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageError {
    /// The message is not of the requested type.
    InvalidMsgType,
    /// Type code 0 can not be used for a message.
    InvalidMessageType,
    /// The message would exceed the 16 bit length field.
    LongMessage(usize),
    /// The target buffer is too small.
    ShortBuf,
}

impl Display for MessageError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        use MessageError::*;
        match self {
            InvalidMsgType => write!(f, "invalid Message type"),
            InvalidMessageType => write!(f, "message type 0 is reserved"),
            LongMessage(len) => write!(f, "message of {} bytes too long", len),
            ShortBuf => write!(f, "buffer size exceeded"),
        }
    }
}

impl Error for MessageError { }

//------------ Tests ---------------------------------------------------------
