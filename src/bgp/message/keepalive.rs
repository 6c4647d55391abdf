use crate::bgp::message::{
    check_message, Header, MessageBuilder, MsgType, MIN_MSG_SIZE,
};
use crate::util::parser::ParseError;
use octseq::{FreezeBuilder, Octets, OctetsBuilder, Truncate};

use super::MessageError;

/// BGP Keepalive message, variant of the [`Message`] enum.
///
/// [`Message`]: crate::bgp::message::Message
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeepaliveMessage<Octs> {
    octets: Octs
}

message_common!(KeepaliveMessage);

impl<Octs: Octets> KeepaliveMessage<Octs> {
    pub fn from_octets(octets: Octs) -> Result<Self, ParseError> {
        Self::check(&octets)?;
        Ok(KeepaliveMessage { octets })
    }

    /// Checks that `octets` hold a KEEPALIVE, which is a header only.
    pub fn check(octets: &Octs) -> Result<(), ParseError> {
        let parser = check_message(octets, MsgType::Keepalive)?;
        if parser.remaining() > 0 {
            return Err(ParseError::form_error("KEEPALIVE of >19 bytes"));
        }
        Ok(())
    }
}

//--- Builder ----------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct KeepaliveBuilder<Target> {
    inner: MessageBuilder<Target>,
}

impl<Target> KeepaliveBuilder<Target>
where
    Target: OctetsBuilder + Truncate + AsRef<[u8]> + AsMut<[u8]>,
{
    pub fn from_target(target: Target) -> Result<Self, MessageError> {
        let inner = MessageBuilder::from_target(target, MsgType::Keepalive)?;
        Ok(KeepaliveBuilder { inner })
    }

    pub fn finish(self) -> Target {
        self.inner.finish()
    }
}

impl<Target> KeepaliveBuilder<Target>
where
    Target: OctetsBuilder + Truncate + AsRef<[u8]> + AsMut<[u8]>
        + FreezeBuilder,
{
    pub fn into_message(
        self
    ) -> KeepaliveMessage<<Target as FreezeBuilder>::Octets> {
        KeepaliveMessage { octets: self.finish().freeze() }
    }
}

impl KeepaliveBuilder<Vec<u8>> {
    pub fn new_vec() -> Self {
        let mut target = Vec::with_capacity(MIN_MSG_SIZE);
        target.extend_from_slice(
            Header::with_type(MsgType::Keepalive).as_ref()
        );
        KeepaliveBuilder { inner: MessageBuilder::for_header(target) }
    }
}

//--- Tests ------------------------------------------------------------------
