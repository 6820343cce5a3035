use crate::icmp::v4::{IcmpReceive, IcmpV4, SequenceNumber, Socket, SocketType, TSocket};
use crate::ping_error::{PingError, PingResult};
use crate::resolve::resolve;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};

/// Sequence numbers live in a 100-probe window. At the end of each window
/// the counter restarts and the whole probe table is dropped; this bounds
/// memory without per-entry eviction.
const SEQUENCE_WINDOW: u16 = 100;
/// Fixed delay between probes, independent of the configured timeout.
const PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// What a single loop iteration produced. Every variant is non-fatal; the
/// session keeps probing regardless.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// A matching echo reply arrived.
    Reply {
        package_size: usize,
        ip_addr: IpAddr,
        sequence_number: SequenceNumber,
        rtt: Duration,
    },
    /// No datagram became ready within the configured timeout.
    Timeout,
    /// The outbound send failed, e.g. the interface went down.
    SendFailed,
    /// A datagram arrived but is not a reply to an outstanding probe.
    Discarded,
}

/// Owns the socket, the outbound packet template and the in-flight
/// sequence-to-timestamp table, and drives the send/receive/report loop.
pub struct EchoSession<S> {
    icmpv4: IcmpV4<S>,
    target: Ipv4Addr,
    sequence: u16,
    echo_sent_times: HashMap<SequenceNumber, Instant>,
}

impl EchoSession<Socket> {
    /// Resolves the host and initializes the socket. Resolution runs first,
    /// so an invalid host never creates a socket.
    pub fn new(host: &str, timeout: Duration, socket_type: SocketType) -> PingResult<Self> {
        let target = resolve(host)?;
        let socket = Socket::new(socket_type, timeout)
            .map_err(|source| PingError::SocketInit { source })?;
        tracing::debug!("echo session to {target} with timeout {timeout:?}");
        Ok(Self::with_socket(target, socket))
    }
}

impl<S> EchoSession<S>
where
    S: TSocket + 'static,
{
    fn with_socket(target: Ipv4Addr, socket: S) -> Self {
        EchoSession {
            icmpv4: IcmpV4::new(socket),
            target,
            sequence: 0,
            echo_sent_times: HashMap::new(),
        }
    }

    /// Probes the target until the process is terminated. One console line
    /// per probe; discarded datagrams stay silent.
    pub fn start(&mut self) {
        loop {
            match self.probe_once() {
                ProbeOutcome::Reply {
                    package_size,
                    ip_addr,
                    sequence_number,
                    rtt,
                } => println!("{}", reply_line(package_size, ip_addr, sequence_number, rtt)),
                ProbeOutcome::Timeout => println!("Request timed out"),
                ProbeOutcome::SendFailed => println!("Ping failed."),
                ProbeOutcome::Discarded => {}
            }
            std::thread::sleep(PROBE_INTERVAL);
        }
    }

    /// One full iteration: send, bounded wait, correlate, window upkeep.
    fn probe_once(&mut self) -> ProbeOutcome {
        self.sequence += 1;
        let sequence_number = SequenceNumber::from(self.sequence);

        let outcome = self.send_and_receive(sequence_number);

        if self.sequence % SEQUENCE_WINDOW == 0 {
            self.sequence = 0;
            self.echo_sent_times.clear();
        }

        outcome
    }

    fn send_and_receive(&mut self, sequence_number: SequenceNumber) -> ProbeOutcome {
        match self.icmpv4.send_to(self.target, sequence_number) {
            Err(e) => {
                tracing::warn!("send failed for seq={sequence_number}: {e}");
                return ProbeOutcome::SendFailed;
            }
            Ok(send_time) => {
                self.echo_sent_times.insert(sequence_number, send_time);
            }
        }

        match self.icmpv4.try_receive() {
            Ok(IcmpReceive::Timeout) => ProbeOutcome::Timeout,
            Ok(IcmpReceive::Other) => ProbeOutcome::Discarded,
            Err(e) => {
                tracing::error!("socket receive failed: {e}");
                ProbeOutcome::Discarded
            }
            Ok(IcmpReceive::Data(reply)) => match self.echo_sent_times.get(&reply.sequence_number)
            {
                None => {
                    tracing::debug!(
                        "no send time recorded for seq={}, discarding reply",
                        reply.sequence_number
                    );
                    ProbeOutcome::Discarded
                }
                Some(&send_time) => ProbeOutcome::Reply {
                    package_size: reply.package_size,
                    ip_addr: reply.ip_addr,
                    sequence_number: reply.sequence_number,
                    rtt: reply.receive_time - send_time,
                },
            },
        }
    }
}

fn reply_line(
    package_size: usize,
    ip_addr: IpAddr,
    sequence_number: SequenceNumber,
    rtt: Duration,
) -> String {
    format!(
        "{} bytes from {}: icmp_seq={} time={:.2}",
        package_size,
        ip_addr,
        sequence_number,
        rtt.as_secs_f64() * 1000.0
    )
}
