mod icmpv4;
pub(crate) use icmpv4::{EchoReplyData, IcmpReceive, IcmpV4};

mod sequence_number;
pub use sequence_number::SequenceNumber;

mod socket;
pub use socket::{Socket, SocketType, TSocket};

#[cfg(test)]
pub(crate) use socket::tests::{OnReceive, OnSend, SocketMock};
