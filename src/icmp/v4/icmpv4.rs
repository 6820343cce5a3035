use super::{SequenceNumber, TSocket};
use crate::ping_error::PingError;
use pnet_packet::icmp::{
    echo_reply::EchoReplyPacket,
    echo_request::{
        EchoRequestPacket as EchoRequestPacketV4,
        MutableEchoRequestPacket as MutableEchoRequestPacketV4,
    },
    IcmpCode, IcmpPacket, IcmpTypes,
};
use pnet_packet::Packet;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::result::Result;
use std::time::Instant;

/// Fixed per-process echo identifier.
const ECHO_IDENTIFIER: u16 = 1337;
/// Fixed 8-byte payload carried by every echo request.
const PAYLOAD: &[u8; 8] = b"PingPong";
/// Replies are read into a buffer of this size; longer datagrams are truncated.
const RECV_BUFFER_SIZE: usize = 64;

/// One received ICMP datagram, classified for the session loop.
pub(crate) enum IcmpReceive {
    /// An echo reply addressed to us.
    Data(EchoReplyData),
    /// Some other ICMP type; the session discards these silently.
    Other,
    /// Nothing became ready within the socket read timeout.
    Timeout,
}

pub(crate) struct EchoReplyData {
    pub package_size: usize,
    pub ip_addr: IpAddr,
    pub sequence_number: SequenceNumber,
    pub receive_time: Instant,
}

/// Frames echo requests and parses echo replies on top of a socket.
pub(crate) struct IcmpV4<S> {
    socket: S,
}

impl<S> IcmpV4<S>
where
    S: TSocket + 'static,
{
    pub(crate) fn new(socket: S) -> IcmpV4<S> {
        IcmpV4 { socket }
    }

    /// Sends one echo request and returns the send timestamp. The timestamp
    /// is captured before the packet hits the socket so it always predates
    /// the matching reply.
    pub(crate) fn send_to(
        &self,
        ipv4: Ipv4Addr,
        sequence_number: SequenceNumber,
    ) -> Result<Instant, PingError> {
        let addr = std::net::SocketAddr::new(IpAddr::V4(ipv4), 0);

        let package = new_echo_request_package(sequence_number).ok_or(PingError::Packet {
            message: "could not create ICMP echo request".to_owned(),
        })?;

        let addr2: socket2::SockAddr = addr.into();
        let send_time = Instant::now();
        self.socket
            .send_to(package.packet(), &addr2)
            .map_err(|source| PingError::Send { source })?;
        tracing::trace!("icmpv4 sent seq={sequence_number}");

        Ok(send_time)
    }

    /// Waits for one datagram, bounded by the socket read timeout.
    pub(crate) fn try_receive(&self) -> Result<IcmpReceive, io::Error> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        match self.socket.recv_from(&mut buf) {
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(IcmpReceive::Timeout)
            }
            Err(e) => Err(e),
            Ok((package_size, ip_addr)) => {
                let receive_time = Instant::now();
                let received = &buf[..package_size.min(RECV_BUFFER_SIZE)];

                let is_echo_reply = IcmpPacket::new(received)
                    .map(|package| package.get_icmp_type() == IcmpTypes::EchoReply)
                    .unwrap_or(false);
                if !is_echo_reply {
                    return Ok(IcmpReceive::Other);
                }

                match EchoReplyPacket::new(received) {
                    None => Ok(IcmpReceive::Other),
                    Some(echo_reply_package) => {
                        let sequence_number: SequenceNumber =
                            echo_reply_package.get_sequence_number().into();
                        tracing::trace!("icmpv4 received seq={sequence_number}");
                        Ok(IcmpReceive::Data(EchoReplyData {
                            package_size,
                            ip_addr,
                            sequence_number,
                            receive_time,
                        }))
                    }
                }
            }
        }
    }
}

pub(crate) fn new_echo_request_package(
    sequence_number: SequenceNumber,
) -> Option<MutableEchoRequestPacketV4<'static>> {
    let buf = vec![0u8; EchoRequestPacketV4::minimum_packet_size() + PAYLOAD.len()];
    let mut package = MutableEchoRequestPacketV4::owned(buf)?;
    package.set_icmp_type(IcmpTypes::EchoRequest);
    package.set_icmp_code(IcmpCode::new(0));
    package.set_identifier(ECHO_IDENTIFIER);
    package.set_sequence_number(sequence_number.into());
    package.set_payload(PAYLOAD);

    package.set_checksum(0_u16);
    let checksum = pnet_packet::icmp::checksum(&IcmpPacket::new(package.packet())?);
    package.set_checksum(checksum);
    Some(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icmp::v4::{OnReceive, OnSend, SocketMock};

    #[test]
    fn echo_request_package_fields() {
        let package = new_echo_request_package(SequenceNumber::from(7)).unwrap();
        let bytes = package.packet();

        let parsed = EchoRequestPacketV4::new(bytes).unwrap();
        assert_eq!(IcmpTypes::EchoRequest, parsed.get_icmp_type());
        assert_eq!(IcmpCode::new(0), parsed.get_icmp_code());
        assert_eq!(ECHO_IDENTIFIER, parsed.get_identifier());
        assert_eq!(7u16, parsed.get_sequence_number());
        assert_eq!(PAYLOAD, parsed.payload());
    }

    #[test]
    fn echo_request_package_checksum_is_set() {
        let package = new_echo_request_package(SequenceNumber::from(1)).unwrap();
        let parsed = IcmpPacket::new(package.packet()).unwrap();
        assert_eq!(
            pnet_packet::icmp::checksum(&parsed),
            parsed.get_checksum()
        );
        assert_ne!(0, parsed.get_checksum());
    }

    #[test]
    fn send_one_echo_request() {
        let socket_mock = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnWouldBlock);
        let icmpv4 = IcmpV4::new(socket_mock.clone());

        let addr = Ipv4Addr::new(127, 0, 0, 1);
        let result = icmpv4.send_to(addr, SequenceNumber::from(1));

        assert!(result.is_ok());
        socket_mock
            .should_send_number_of_messages(1)
            .should_send_to_address(&IpAddr::V4(addr));
    }

    #[test]
    fn try_receive_returns_matching_sequence() {
        let socket_mock = SocketMock::new(OnSend::ReturnDefault, OnReceive::EchoReplies(1));
        let icmpv4 = IcmpV4::new(socket_mock.clone());

        icmpv4
            .send_to(Ipv4Addr::new(127, 0, 0, 1), SequenceNumber::from(3))
            .unwrap();
        let received = icmpv4.try_receive().unwrap();

        match received {
            IcmpReceive::Data(data) => {
                assert_eq!(SequenceNumber::from(3), data.sequence_number);
                assert!(data.package_size >= EchoReplyPacket::minimum_packet_size());
            }
            _ => panic!("expected an echo reply"),
        }
    }

    #[test]
    fn try_receive_classifies_foreign_types_as_other() {
        let socket_mock = SocketMock::new(OnSend::ReturnDefault, OnReceive::ForeignPackages(1));
        let icmpv4 = IcmpV4::new(socket_mock);

        let received = icmpv4.try_receive().unwrap();
        assert!(matches!(received, IcmpReceive::Other));
    }

    #[test]
    fn try_receive_maps_would_block_to_timeout() {
        let socket_mock = SocketMock::new(OnSend::ReturnDefault, OnReceive::ReturnWouldBlock);
        let icmpv4 = IcmpV4::new(socket_mock);

        let received = icmpv4.try_receive().unwrap();
        assert!(matches!(received, IcmpReceive::Timeout));
    }
}
