#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub use ping_error::{GenericError, PingError, PingResult};
pub use resolve::resolve;
pub use session::{EchoSession, ProbeOutcome};

pub use icmp::v4::{SequenceNumber, Socket, SocketType};

pub mod cli;
pub mod icmp;
mod ping_error;
mod resolve;
mod session;
