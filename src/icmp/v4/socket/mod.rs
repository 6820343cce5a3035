use std::{io, time::Duration};

pub mod dgram_socket;
pub mod raw_socket;

use dgram_socket::DgramSocket;
use raw_socket::RawSocket;

/// Minimal socket surface the session needs; implemented by the real
/// sockets below and by `SocketMock` in tests.
pub trait TSocket: Send + Sync {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize>;
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, std::net::IpAddr)>;
}

#[derive(Clone, Copy)]
pub enum SocketType {
    DGRAM,
    RAW,
}

pub enum Socket {
    Dgram(DgramSocket),
    Raw(RawSocket),
}

impl Socket {
    /// The timeout becomes the socket read timeout; the bounded receive
    /// wait of every probe is implemented by the kernel through it.
    pub(crate) fn new(socket_type: SocketType, timeout: Duration) -> Result<Self, io::Error> {
        match socket_type {
            SocketType::DGRAM => Ok(Socket::Dgram(DgramSocket::new(timeout)?)),
            SocketType::RAW => Ok(Socket::Raw(RawSocket::new(timeout)?)),
        }
    }
}

impl TSocket for Socket {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize> {
        match self {
            Socket::Dgram(socket) => socket.send_to(buf, addr),
            Socket::Raw(socket) => socket.send_to(buf, addr),
        }
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, std::net::IpAddr)> {
        match self {
            Socket::Dgram(socket) => socket.recv_from(buf),
            Socket::Raw(socket) => socket.recv_from(buf),
        }
    }
}
