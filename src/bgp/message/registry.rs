//! Mapping of message type codes to decoders.
//!
//! A [`Registry`] is assembled once with a [`RegistryBuilder`] and handed
//! to a [`Framer`]. It can not be changed afterwards, so a single registry
//! can be shared between any number of framers and threads.
//!
//! [`Framer`]: crate::bgp::framer::Framer

use std::collections::BTreeMap;

use log::{debug, warn};
use octseq::Octets;

use crate::bgp::message::{
    KeepaliveMessage, Message, MessageError, MsgType, NotificationMessage,
    OpenMessage, UpdateMessage,
};
use crate::util::parser::ParseError;

/// Decodes the octets of one complete message.
///
/// The octets passed in span exactly one message, header included.
pub type DecodeFn<Octs> = fn(Octs) -> Result<Message<Octs>, ParseError>;

//------------ Registry ------------------------------------------------------

/// Immutable mapping of message type codes to decoders.
///
/// The default registry knows OPEN, UPDATE, NOTIFICATION and KEEPALIVE.
#[derive(Clone, Debug)]
pub struct Registry<Octs> {
    decoders: BTreeMap<u8, DecodeFn<Octs>>,
}

impl<Octs> Registry<Octs> {
    /// Returns the decoder for type code `typ`, if any.
    pub fn get(&self, typ: u8) -> Option<DecodeFn<Octs>> {
        self.decoders.get(&typ).copied()
    }

    pub fn contains(&self, typ: u8) -> bool {
        self.decoders.contains_key(&typ)
    }

    /// Returns the registered types in ascending order.
    pub fn types(&self) -> impl Iterator<Item = MsgType> + '_ {
        self.decoders.keys().map(|&t| MsgType::from(t))
    }
}

impl<Octs: Octets> Registry<Octs> {
    /// Decodes a complete message with the decoder registered for its type.
    ///
    /// Fails with [`ParseError::UnrecognizedType`] if no decoder is
    /// registered. A decoder returning a message of a type other than the
    /// one it was registered for results in a form error.
    pub fn decode(&self, octets: Octs) -> Result<Message<Octs>, ParseError> {
        let typ = match octets.as_ref().get(18) {
            Some(typ) => *typ,
            None => return Err(ParseError::ShortInput),
        };
        let decode = match self.get(typ) {
            Some(decode) => decode,
            None => return Err(ParseError::UnrecognizedType(typ)),
        };
        let msg = decode(octets)?;
        if u8::from(msg.msg_type()) != typ {
            warn!(
                "decoder for type {} returned a {} message",
                typ, msg.msg_type()
            );
            return Err(ParseError::form_error(
                "decoder returned message of different type"
            ));
        }
        Ok(msg)
    }
}

impl<Octs: Octets> Default for Registry<Octs> {
    fn default() -> Self {
        RegistryBuilder::with_defaults().finish()
    }
}

//------------ RegistryBuilder -----------------------------------------------

/// Assembles a [`Registry`].
#[derive(Clone, Debug)]
pub struct RegistryBuilder<Octs> {
    decoders: BTreeMap<u8, DecodeFn<Octs>>,
}

impl<Octs> RegistryBuilder<Octs> {
    /// Creates a builder without any decoders.
    pub fn new() -> Self {
        RegistryBuilder { decoders: BTreeMap::new() }
    }

    /// Registers `decoder` for type code `typ`.
    ///
    /// A decoder registered earlier for the same type is replaced. Type
    /// code 0 is reserved and results in
    /// [`MessageError::InvalidMessageType`].
    pub fn register_type(
        &mut self,
        typ: u8,
        decoder: DecodeFn<Octs>,
    ) -> Result<&mut Self, MessageError> {
        if typ == 0 {
            return Err(MessageError::InvalidMessageType);
        }
        if self.decoders.insert(typ, decoder).is_some() {
            debug!("replaced decoder for {}", MsgType::from(typ));
        }
        Ok(self)
    }

    /// Removes the decoder for type code `typ`, if any.
    pub fn unregister_type(&mut self, typ: u8) -> &mut Self {
        self.decoders.remove(&typ);
        self
    }

    pub fn finish(self) -> Registry<Octs> {
        Registry { decoders: self.decoders }
    }
}

impl<Octs: Octets> RegistryBuilder<Octs> {
    /// Creates a builder holding the decoders for OPEN, UPDATE,
    /// NOTIFICATION and KEEPALIVE.
    pub fn with_defaults() -> Self {
        let mut decoders: BTreeMap<u8, DecodeFn<Octs>> = BTreeMap::new();
        decoders.insert(MsgType::Open.into(), decode_open);
        decoders.insert(MsgType::Update.into(), decode_update);
        decoders.insert(MsgType::Notification.into(), decode_notification);
        decoders.insert(MsgType::Keepalive.into(), decode_keepalive);
        RegistryBuilder { decoders }
    }
}

impl<Octs> Default for RegistryBuilder<Octs> {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_open<Octs: Octets>(
    octets: Octs
) -> Result<Message<Octs>, ParseError> {
    OpenMessage::from_octets(octets).map(Message::Open)
}

fn decode_update<Octs: Octets>(
    octets: Octs
) -> Result<Message<Octs>, ParseError> {
    UpdateMessage::from_octets(octets).map(Message::Update)
}

fn decode_notification<Octs: Octets>(
    octets: Octs
) -> Result<Message<Octs>, ParseError> {
    NotificationMessage::from_octets(octets).map(Message::Notification)
}

fn decode_keepalive<Octs: Octets>(
    octets: Octs
) -> Result<Message<Octs>, ParseError> {
    KeepaliveMessage::from_octets(octets).map(Message::Keepalive)
}

//------------ Tests ---------------------------------------------------------
