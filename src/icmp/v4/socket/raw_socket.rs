use super::TSocket;
use pnet_packet::{ipv4::Ipv4Packet, Packet};
use socket2::{Domain, Protocol, Type};
use std::{io, net::IpAddr, time::Duration};

/// Privileged ICMP socket (`SOCK_RAW`). Reads yield a full IP packet, so
/// the IP header is stripped before handing the ICMP content to the caller.
pub struct RawSocket {
    socket: socket2::Socket,
}

impl RawSocket {
    pub(crate) fn new(timeout: Duration) -> Result<Self, io::Error> {
        tracing::trace!("creating ICMP raw socket");
        let socket = socket2::Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        socket.set_read_timeout(Some(timeout))?;
        Ok(RawSocket { socket })
    }
}

impl TSocket for RawSocket {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize> {
        self.socket.send_to(buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, IpAddr)> {
        let mut recv_buf = [0u8; 128];

        // Socket2 guarantees it does not read from the buffer, which makes
        // the cast from `&mut [u8]` to `&mut [MaybeUninit<u8>]` sound.
        // https://docs.rs/socket2/0.4.7/socket2/struct.Socket.html#method.recv
        let (_, socket_addr) = socket2::Socket::recv_from(&self.socket, unsafe {
            &mut *(std::ptr::addr_of_mut!(recv_buf) as *mut [u8]
                as *mut [std::mem::MaybeUninit<u8>])
        })?;

        let ipv4_packet = Ipv4Packet::new(&recv_buf).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "could not parse IPv4 packet")
        })?;
        let ip_payload = ipv4_packet.payload();
        let n_bytes = ip_payload.len().min(buf.len());
        buf[..n_bytes].copy_from_slice(&ip_payload[..n_bytes]);

        let ip = socket_addr
            .as_socket_ipv4()
            .map(|addr| IpAddr::V4(*addr.ip()))
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "sender address is not IPv4")
            })?;
        Ok((n_bytes, ip))
    }
}
