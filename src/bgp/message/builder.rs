use octseq::{FreezeBuilder, OctetsBuilder, Truncate};

use crate::bgp::message::{
    Header, Message, MessageError, MsgType, MAX_EXTENDED_MSG_SIZE,
    MIN_MSG_SIZE,
};
use crate::util::parser::ParseError;

/// Composes a single BGP message of any type into `Target`.
///
/// The header is written when the builder is created, with the length
/// field covering the header only. Body octets are appended with
/// [`append_body`] and the length field is updated on [`finish`].
///
/// [`append_body`]: MessageBuilder::append_body
/// [`finish`]: MessageBuilder::finish
#[derive(Clone, Debug)]
pub struct MessageBuilder<Target> {
    target: Target,
}

impl<Target> MessageBuilder<Target>
where
    Target: OctetsBuilder + Truncate + AsRef<[u8]> + AsMut<[u8]>,
{
    /// Starts a message of type `typ` in `target`.
    ///
    /// Any content already present in `target` is discarded.
    pub fn from_target(
        mut target: Target,
        typ: MsgType
    ) -> Result<Self, MessageError> {
        if u8::from(typ) == 0 {
            return Err(MessageError::InvalidMessageType);
        }
        target.truncate(0);
        target.append_slice(Header::with_type(typ).as_ref())
            .map_err(|_| MessageError::ShortBuf)?;
        Ok(MessageBuilder { target })
    }

    /// Appends `data` to the body of the message.
    ///
    /// Fails if the message would no longer fit the 16 bit length field,
    /// leaving the builder untouched.
    pub fn append_body(&mut self, data: &[u8]) -> Result<(), MessageError> {
        let new_len = self.target.as_ref().len() + data.len();
        if new_len > MAX_EXTENDED_MSG_SIZE {
            return Err(MessageError::LongMessage(new_len));
        }
        self.target.append_slice(data).map_err(|_| MessageError::ShortBuf)
    }

    /// Returns the length of the message composed so far.
    pub fn message_len(&self) -> usize {
        self.target.as_ref().len()
    }

    /// Sets the length field and returns the target.
    pub fn finish(mut self) -> Target {
        // append_body keeps the length within u16 range
        let len = self.target.as_ref().len() as u16;
        Header::for_slice(&mut self.target.as_mut()[..MIN_MSG_SIZE])
            .set_length(len);
        self.target
    }
}

impl<Target> MessageBuilder<Target> {
    /// Wraps a target that already holds a valid header and nothing else.
    pub(crate) fn for_header(target: Target) -> Self {
        MessageBuilder { target }
    }
}

impl<Target> MessageBuilder<Target>
where
    Target: OctetsBuilder + Truncate + AsRef<[u8]> + AsMut<[u8]>
        + FreezeBuilder,
    <Target as FreezeBuilder>::Octets: octseq::Octets,
{
    /// Finishes the message and decodes it with the built-in decoders.
    pub fn into_message(
        self
    ) -> Result<Message<<Target as FreezeBuilder>::Octets>, ParseError> {
        Message::from_octets(self.finish().freeze())
    }
}

//------------ Tests ---------------------------------------------------------
