//! Encodes a KEEPALIVE, frames it back and checks that both agree.
//!
//! Set `RUST_LOG=debug` to see the framer's log output.

use std::error::Error;
use std::fmt::Write;
use std::process::ExitCode;

use bgpframe::bgp::framer::Framer;
use bgpframe::bgp::message::{KeepaliveBuilder, Message, MIN_MSG_SIZE};

fn hex(octets: &[u8]) -> String {
    let mut res = String::with_capacity(octets.len() * 3);
    for (i, octet) in octets.iter().enumerate() {
        if i > 0 {
            res.push(' ');
        }
        let _ = write!(res, "{:02x}", octet);
    }
    res
}

fn run() -> Result<bool, Box<dyn Error>> {
    let keepalive = Message::Keepalive(
        KeepaliveBuilder::new_vec().into_message()
    );
    let wire = keepalive.to_vec();
    println!("encoded {}", keepalive);
    println!("  {}", hex(&wire));

    let framer = Framer::default();
    let (decoded, used) = framer.read_message(&wire)?;
    let decoded = match decoded {
        Some(msg) => msg,
        None => {
            println!("framer did not return a message");
            return Ok(false);
        }
    };
    println!("decoded {} from {} octets", decoded, used);

    let mut ok = true;
    if used != MIN_MSG_SIZE {
        println!("consumed {} octets, expected {}", used, MIN_MSG_SIZE);
        ok = false;
    }
    if decoded.as_ref() != wire.as_slice() {
        println!("decoded message differs from encoded message");
        ok = false;
    }
    Ok(ok)
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(true) => {
            println!("ok");
            ExitCode::SUCCESS
        }
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
