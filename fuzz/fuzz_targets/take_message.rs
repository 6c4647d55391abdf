#![no_main]

use bgpframe::bgp::framer::Framer;
use bytes::{Bytes, BytesMut};
use libfuzzer_sys::fuzz_target;

// Feeds the input in chunks of varying size, the way it would arrive from
// a socket.
fuzz_target!(|data: (&[u8], Vec<u8>)| {
    let (input, chunks) = data;
    let framer = Framer::<Bytes>::default();
    let mut buf = BytesMut::new();
    let mut input = input;
    for size in chunks.into_iter().chain(std::iter::repeat(255)) {
        if input.is_empty() {
            break;
        }
        let size = usize::from(size).clamp(1, input.len());
        buf.extend_from_slice(&input[..size]);
        input = &input[size..];
        loop {
            match framer.take_message(&mut buf) {
                Ok(Some(_)) => { }
                Ok(None) => break,
                Err(_) => return,
            }
        }
    }
});
