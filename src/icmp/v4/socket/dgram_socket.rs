use super::TSocket;
use socket2::{Domain, Protocol, Type};
use std::{io, net::IpAddr, time::Duration};

/// Unprivileged ICMP socket (`SOCK_DGRAM`, `IPPROTO_ICMP`). The kernel
/// strips the IP header, so reads yield the bare ICMP message.
pub struct DgramSocket {
    socket: socket2::Socket,
}

impl DgramSocket {
    pub(crate) fn new(timeout: Duration) -> Result<Self, io::Error> {
        tracing::trace!("creating ICMP datagram socket");
        let socket = socket2::Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::ICMPV4))?;
        socket.set_read_timeout(Some(timeout))?;
        Ok(DgramSocket { socket })
    }
}

impl TSocket for DgramSocket {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize> {
        self.socket.send_to(buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, IpAddr)> {
        // Socket2 guarantees it does not read from the buffer, which makes
        // the cast from `&mut [u8]` to `&mut [MaybeUninit<u8>]` sound.
        // https://docs.rs/socket2/0.4.7/socket2/struct.Socket.html#method.recv
        let (n_bytes, socket_addr) = socket2::Socket::recv_from(&self.socket, unsafe {
            &mut *(std::ptr::addr_of_mut!(*buf) as *mut [u8]
                as *mut [std::mem::MaybeUninit<u8>])
        })?;
        let ip = socket_addr
            .as_socket_ipv4()
            .map(|addr| IpAddr::V4(*addr.ip()))
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "sender address is not IPv4")
            })?;
        Ok((n_bytes.min(buf.len()), ip))
    }
}
