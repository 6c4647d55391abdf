#![no_main]

use bgpframe::bgp::framer::{Framer, FramerConfig};
use bgpframe::bgp::message::{Registry, MIN_MSG_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&[u8], FramerConfig)| {
    let (buf, config) = data;
    let framer: Framer<&[u8]> = Framer::new(Registry::default(), config);
    let mut pos = 0;
    loop {
        let rest = &buf[pos..];
        match framer.read_message(&rest) {
            Ok((_, 0)) | Err(_) => break,
            Ok((msg, used)) => {
                assert!(used >= MIN_MSG_SIZE);
                assert!(used <= rest.len());
                if let Some(msg) = msg {
                    assert_eq!(usize::from(msg.length()), used);
                }
                pos += used;
            }
        }
    }
});
