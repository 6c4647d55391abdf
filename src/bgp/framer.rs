//! Finding and decoding BGP messages in a stream of octets.
//!
//! BGP runs over TCP, so messages arrive as a stream of octets without any
//! boundaries. The [`Framer`] looks at the start of a buffer holding
//! octets received so far, and returns the first complete message in it
//! together with the number of octets it occupies. The caller is expected
//! to drop that many octets from the front of the buffer and try again.
//!
//! ```
//! use bgpframe::bgp::framer::Framer;
//! use bgpframe::bgp::message::{encode_header, Message, MsgType};
//!
//! let mut buf = Vec::new();
//! encode_header(&mut buf, MsgType::Keepalive, &[]).unwrap();
//! encode_header(&mut buf, MsgType::Keepalive, &[]).unwrap();
//!
//! let framer: Framer<&[u8]> = Framer::default();
//! let mut pos = 0;
//! while let (Some(msg), used) = framer.read_slice(&buf[pos..]).unwrap() {
//!     assert!(matches!(msg, Message::Keepalive(_)));
//!     pos += used;
//! }
//! assert_eq!(pos, 38);
//! ```

use bytes::{Bytes, BytesMut};
use log::{debug, warn};
use octseq::Octets;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use crate::bgp::message::{
    decode_header, Message, Registry, MAX_MSG_SIZE, MIN_MSG_SIZE,
};
use crate::util::parser::ParseError;

//------------ FramerConfig --------------------------------------------------

/// Limits applied while framing.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct FramerConfig {
    max_message_size: u16,
}

impl FramerConfig {
    /// Messages of at most 4096 octets, as per RFC 4271.
    pub const fn legacy() -> Self {
        Self { max_message_size: MAX_MSG_SIZE as u16 }
    }

    /// Messages of at most 65535 octets, for sessions that negotiated the
    /// Extended Message capability (RFC 8654).
    pub const fn extended() -> Self {
        Self { max_message_size: u16::MAX }
    }

    pub const fn max_message_size(&self) -> u16 {
        self.max_message_size
    }

    pub fn set_max_message_size(&mut self, size: u16) {
        self.max_message_size = size;
    }

    /// Checks the length field of a header, returning it as a `usize`.
    fn check_length(&self, len: u16) -> Result<usize, ParseError> {
        if usize::from(len) < MIN_MSG_SIZE || len > self.max_message_size {
            return Err(ParseError::InvalidLength(len));
        }
        Ok(len.into())
    }
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self::legacy()
    }
}

//------------ Framer --------------------------------------------------------

/// Splits a buffer into BGP messages and decodes them.
///
/// The framer holds no state besides its immutable [`Registry`] and
/// [`FramerConfig`], so it can be shared freely. The `Octs` type parameter
/// is the octets type the decoded messages refer to, typically `&[u8]` or
/// [`Bytes`].
#[derive(Clone, Debug)]
pub struct Framer<Octs> {
    registry: Registry<Octs>,
    config: FramerConfig,
}

impl<Octs> Framer<Octs> {
    pub fn new(registry: Registry<Octs>, config: FramerConfig) -> Self {
        Framer { registry, config }
    }

    pub fn registry(&self) -> &Registry<Octs> {
        &self.registry
    }

    pub fn config(&self) -> FramerConfig {
        self.config
    }

    /// Returns the length of the complete message at the start of `buf`.
    ///
    /// Returns `Ok(None)` if `buf` does not hold a complete message yet. A
    /// header with an invalid marker, or with a length field that is below
    /// [`MIN_MSG_SIZE`] or above the configured maximum, results in an
    /// error. These are checked as soon as the header is available, i.e.
    /// before the rest of the message arrived.
    pub fn frame_len(&self, buf: &[u8]) -> Result<Option<usize>, ParseError> {
        let header = match decode_header(&buf) {
            Ok(Some(header)) => header,
            Ok(None) => return Ok(None),
            Err(err) => {
                warn!("invalid BGP header: {}", err);
                return Err(err);
            }
        };
        let len = self.config.check_length(header.length()).map_err(|err| {
            warn!("invalid BGP header: {}", err);
            err
        })?;
        if buf.len() < len {
            return Ok(None);
        }
        Ok(Some(len))
    }
}

impl<Octs: Octets> Framer<Octs> {
    /// Reads the message at the start of `buf`.
    ///
    /// Returns the message and the number of octets it occupies. If `buf`
    /// does not hold a complete message, `(None, 0)` is returned and the
    /// call should be repeated once more data is available. A message of a
    /// type without a registered decoder is skipped: `(None, len)` is
    /// returned and the caller should drop `len` octets as usual.
    ///
    /// Only the first message in `buf` is looked at. Framing errors, see
    /// [`frame_len`], leave the stream in an unknown state and should end
    /// the session.
    ///
    /// `buf` is a reference to the octets sequence, so a slice is passed
    /// as `&&[u8]`. [`read_slice`] takes the slice directly.
    ///
    /// [`frame_len`]: Framer::frame_len
    /// [`read_slice`]: Framer::read_slice
    pub fn read_message<'a, Src>(
        &self,
        buf: &'a Src
    ) -> Result<(Option<Message<Octs>>, usize), ParseError>
    where
        Src: Octets<Range<'a> = Octs> + ?Sized,
    {
        let len = match self.frame_len(buf.as_ref())? {
            Some(len) => len,
            None => return Ok((None, 0)),
        };
        let typ = buf.as_ref()[18];
        if !self.registry.contains(typ) {
            debug!(
                "skipping BGP message of unrecognized type {} ({} octets)",
                typ, len
            );
            return Ok((None, len));
        }
        let msg = self.registry.decode(buf.range(..len)).map_err(|e| {
            debug!("failed to decode BGP message of type {}: {}", typ, e);
            e
        })?;
        Ok((Some(msg), len))
    }
}

impl<'a> Framer<&'a [u8]> {
    /// Reads the message at the start of the slice `buf`.
    ///
    /// This is [`read_message`] for plain slices. The returned message
    /// borrows from `buf`.
    ///
    /// [`read_message`]: Framer::read_message
    pub fn read_slice(
        &self,
        buf: &'a [u8]
    ) -> Result<(Option<Message<&'a [u8]>>, usize), ParseError> {
        self.read_message(&buf)
    }
}

impl Framer<Bytes> {
    /// Takes the next message off the front of `buf`.
    ///
    /// Messages of unrecognized types are removed from `buf` and skipped.
    /// Returns `Ok(None)` once `buf` does not start with a complete message
    /// anymore. If decoding a message fails, it has still been removed from
    /// `buf`.
    pub fn take_message(
        &self,
        buf: &mut BytesMut
    ) -> Result<Option<Message<Bytes>>, ParseError> {
        while let Some(len) = self.frame_len(&buf[..])? {
            let frame = buf.split_to(len).freeze();
            if let (Some(msg), _) = self.read_message(&frame)? {
                return Ok(Some(msg));
            }
        }
        Ok(None)
    }
}

impl<Octs: Octets> Default for Framer<Octs> {
    fn default() -> Self {
        Framer::new(Registry::default(), FramerConfig::default())
    }
}

//------------ Tests ---------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bgp::message::{
        encode_header, KeepaliveMessage, MsgType, RegistryBuilder,
        UnknownMessage,
    };

    const KEEPALIVE: [u8; 19] = [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0x00, 0x13, 0x04
    ];

    const ROUTE_REFRESH: [u8; 23] = [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0x00, 0x17, 0x05, 0x00, 0x01, 0x01, 0x01
    ];

    fn message(typ: MsgType, body: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_header(&mut buf, typ, body).unwrap();
        buf
    }

    #[test]
    fn single_keepalive() {
        let framer = Framer::default();
        let buf = &KEEPALIVE[..];
        let (msg, used) = framer.read_message(&buf).unwrap();
        assert_eq!(used, 19);
        let msg = msg.unwrap();
        assert!(matches!(msg, Message::Keepalive(_)));
        assert_eq!(msg.length(), 19);
        assert_eq!(msg.as_ref(), &KEEPALIVE);
    }

    #[test]
    fn two_keepalives() {
        let framer = Framer::default();
        let mut raw = KEEPALIVE.to_vec();
        raw.extend_from_slice(&KEEPALIVE);
        assert_eq!(raw.len(), 38);

        let (msg, used) = framer.read_message(&raw).unwrap();
        assert!(matches!(msg, Some(Message::Keepalive(_))));
        assert_eq!(used, 19);

        let rest = &raw[used..];
        let (msg, used2) = framer.read_message(&rest).unwrap();
        assert!(matches!(msg, Some(Message::Keepalive(_))));
        assert_eq!(used + used2, 38);

        let rest = &raw[used + used2..];
        assert_eq!(framer.read_message(&rest).unwrap(), (None, 0));
    }

    #[test]
    fn partial_header() {
        let framer = Framer::default();
        let raw: &'static [u8] = &KEEPALIVE;
        for len in 0..MIN_MSG_SIZE {
            let buf = &raw[..len];
            assert_eq!(framer.read_message(&buf).unwrap(), (None, 0));
        }
    }

    #[test]
    fn partial_body() {
        let framer = Framer::default();
        let raw = message(MsgType::Notification, &[6, 2, 0, 0, 0]);
        for len in 0..raw.len() {
            let buf = &raw[..len];
            assert_eq!(framer.read_message(&buf).unwrap(), (None, 0));
            assert_eq!(framer.frame_len(buf).unwrap(), None);
        }
        let (msg, used) = framer.read_message(&raw).unwrap();
        assert!(matches!(msg, Some(Message::Notification(_))));
        assert_eq!(used, raw.len());
    }

    #[test]
    fn trailing_data_untouched() {
        let framer = Framer::default();
        let mut raw = message(MsgType::Update, &[0, 0, 0, 0]);
        raw.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let (msg, used) = framer.read_message(&raw).unwrap();
        assert_eq!(used, 23);
        assert_eq!(msg.unwrap().as_ref(), &raw[..23]);
        assert_eq!(&raw[used..], &[0xde, 0xad, 0xbe, 0xef]);

        // Reading again from the same position gives the same result.
        let (again, used_again) = framer.read_message(&raw).unwrap();
        assert_eq!(used_again, used);
        assert!(matches!(again, Some(Message::Update(_))));
    }

    #[test]
    fn unknown_type_skipped() {
        let framer = Framer::default();
        let mut raw = ROUTE_REFRESH.to_vec();
        raw.extend_from_slice(&KEEPALIVE);

        assert_eq!(framer.read_message(&raw).unwrap(), (None, 23));
        let rest = &raw[23..];
        let (msg, used) = framer.read_message(&rest).unwrap();
        assert!(matches!(msg, Some(Message::Keepalive(_))));
        assert_eq!(used, 19);
    }

    #[test]
    fn unknown_type_registered() {
        let mut builder = RegistryBuilder::<&[u8]>::with_defaults();
        builder.register_type(5, UnknownMessage::decode).unwrap();
        let framer = Framer::new(builder.finish(), FramerConfig::default());

        let buf = &ROUTE_REFRESH[..];
        let (msg, used) = framer.read_message(&buf).unwrap();
        assert_eq!(used, 23);
        match msg {
            Some(Message::Unknown(m)) => {
                assert_eq!(m.msg_type(), MsgType::Unimplemented(5));
                assert_eq!(m.body(), &[0x00, 0x01, 0x01, 0x01][..]);
            }
            _ => panic!("expected Message::Unknown")
        }
    }

    #[test]
    fn empty_registry_skips_everything() {
        let framer = Framer::new(
            RegistryBuilder::new().finish(),
            FramerConfig::default()
        );
        let buf = &KEEPALIVE[..];
        assert_eq!(framer.read_message(&buf).unwrap(), (None, 19));
    }

    #[test]
    fn invalid_marker() {
        for i in 0..16 {
            let mut raw = KEEPALIVE;
            raw[i] = 0x00;
            let buf = &raw[..];
            let framer = Framer::default();
            assert_eq!(
                framer.read_message(&buf),
                Err(ParseError::InvalidMarker)
            );
        }
    }

    #[test]
    fn invalid_marker_before_body() {
        // The marker is checked as soon as the header is complete.
        let framer = Framer::default();
        let mut raw = message(MsgType::Update, &[0; 100]);
        raw[3] = 0x7f;
        let buf = &raw[..MIN_MSG_SIZE];
        assert_eq!(framer.read_message(&buf), Err(ParseError::InvalidMarker));
    }

    #[test]
    fn length_below_minimum() {
        let framer = Framer::default();
        let mut raw = KEEPALIVE;
        raw[17] = 18;
        let buf = &raw[..];
        assert_eq!(
            framer.read_message(&buf),
            Err(ParseError::InvalidLength(18))
        );
    }

    #[test]
    fn length_above_maximum() {
        let raw = message(MsgType::Update, &[0; 4096 - 19 + 1]);
        let buf = &raw[..MIN_MSG_SIZE];

        let framer = Framer::default();
        assert_eq!(
            framer.read_message(&buf),
            Err(ParseError::InvalidLength(4097))
        );

        let framer: Framer<&[u8]> = Framer::new(
            Registry::default(), FramerConfig::extended()
        );
        assert_eq!(framer.read_message(&buf).unwrap(), (None, 0));
        let (msg, used) = framer.read_message(&raw).unwrap();
        assert!(matches!(msg, Some(Message::Update(_))));
        assert_eq!(used, 4097);
    }

    #[test]
    fn decoder_error() {
        // KEEPALIVE with a body
        let framer = Framer::default();
        let raw = message(MsgType::Keepalive, &[0]);
        assert_eq!(
            framer.read_message(&raw),
            Err(ParseError::form_error("KEEPALIVE of >19 bytes"))
        );
    }

    #[test]
    fn decoder_type_mismatch() {
        fn always_keepalive(
            _octets: &[u8]
        ) -> Result<Message<&[u8]>, ParseError> {
            let raw: &'static [u8] = &KEEPALIVE;
            KeepaliveMessage::from_octets(raw).map(Message::Keepalive)
        }

        let mut builder = RegistryBuilder::new();
        builder.register_type(5, always_keepalive).unwrap();
        let framer = Framer::new(builder.finish(), FramerConfig::default());
        let buf = &ROUTE_REFRESH[..];
        assert_eq!(
            framer.read_message(&buf),
            Err(ParseError::form_error(
                "decoder returned message of different type"
            ))
        );
    }

    #[test]
    fn bytes_source() {
        let framer = Framer::<Bytes>::default();
        let raw = Bytes::from(message(MsgType::Open, &[
            0x04, 0xfb, 0xf0, 0x00, 0x5a, 0xc0, 0x00, 0x02, 0x01, 0x00
        ]));
        let (msg, used) = framer.read_message(&raw).unwrap();
        assert_eq!(used, 29);
        let msg = msg.unwrap();
        assert_eq!(msg.msg_type(), MsgType::Open);
        assert_eq!(msg.body().len(), 10);
    }

    #[test]
    fn take_message() {
        let framer = Framer::<Bytes>::default();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&ROUTE_REFRESH);
        buf.extend_from_slice(&KEEPALIVE);
        buf.extend_from_slice(&KEEPALIVE[..10]);

        let msg = framer.take_message(&mut buf).unwrap().unwrap();
        assert!(matches!(msg, Message::Keepalive(_)));
        assert_eq!(buf.len(), 10);
        assert_eq!(framer.take_message(&mut buf).unwrap(), None);
        assert_eq!(buf.len(), 10);

        buf.extend_from_slice(&KEEPALIVE[10..]);
        assert!(framer.take_message(&mut buf).unwrap().is_some());
        assert!(buf.is_empty());
    }

    #[test]
    fn take_message_decode_error() {
        let framer = Framer::<Bytes>::default();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&message(MsgType::Keepalive, &[0]));
        buf.extend_from_slice(&KEEPALIVE);

        assert_eq!(
            framer.take_message(&mut buf),
            Err(ParseError::form_error("KEEPALIVE of >19 bytes"))
        );
        assert_eq!(&buf[..], &KEEPALIVE[..]);

        let msg = framer.take_message(&mut buf).unwrap().unwrap();
        assert!(matches!(msg, Message::Keepalive(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn read_slice() {
        let framer: Framer<&[u8]> = Framer::default();
        let mut raw = ROUTE_REFRESH.to_vec();
        raw.extend_from_slice(&KEEPALIVE);
        raw.extend_from_slice(&KEEPALIVE[..5]);

        let mut pos = 0;
        let mut found = Vec::new();
        loop {
            match framer.read_slice(&raw[pos..]).unwrap() {
                (_, 0) => break,
                (msg, used) => {
                    found.push(msg.map(|m| m.msg_type()));
                    pos += used;
                }
            }
        }
        assert_eq!(found, vec![None, Some(MsgType::Keepalive)]);
        assert_eq!(pos, 42);
    }

    #[test]
    fn shared_between_threads() {
        let framer = Framer::default();
        let raw = KEEPALIVE.repeat(8);
        std::thread::scope(|s| {
            for offset in [0, 19, 38, 57] {
                let framer = &framer;
                let raw = &raw;
                s.spawn(move || {
                    let buf = &raw[offset..];
                    let (msg, used) = framer.read_message(&buf).unwrap();
                    assert!(msg.is_some());
                    assert_eq!(used, 19);
                });
            }
        });
    }

    #[test]
    fn config() {
        assert_eq!(FramerConfig::default().max_message_size(), 4096);
        assert_eq!(FramerConfig::extended().max_message_size(), 65535);
        let mut config = FramerConfig::legacy();
        config.set_max_message_size(1024);
        assert_eq!(config.check_length(1024), Ok(1024));
        assert_eq!(config.check_length(1025), Err(ParseError::InvalidLength(1025)));
        assert_eq!(config.check_length(0), Err(ParseError::InvalidLength(0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_serde() {
        use serde_test::{assert_tokens, Token};
        assert_tokens(
            &FramerConfig::legacy(),
            &[
                Token::Struct { name: "FramerConfig", len: 1 },
                Token::Str("max_message_size"),
                Token::U16(4096),
                Token::StructEnd,
            ]
        );
    }
}
