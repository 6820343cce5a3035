use std::{error::Error, fmt, io};

pub type GenericError = Box<dyn Error + Send + Sync + 'static>;

pub type PingResult<T> = std::result::Result<T, PingError>;

/// Fatal, construction-time failures. Per-probe conditions are not errors;
/// they are reported through `ProbeOutcome` and never abort a session.
#[derive(Debug)]
pub enum PingError {
    /// The host string is neither a valid dotted-quad IPv4 literal nor a
    /// hostname that resolves to an IPv4 address.
    InvalidAddress { host: String },
    /// ICMP socket creation failed, commonly a privilege issue.
    SocketInit { source: io::Error },
    /// An outbound send failed. Non-fatal inside a running session.
    Send { source: io::Error },
    /// An echo request could not be framed.
    Packet { message: String },
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            PingError::InvalidAddress { host } => {
                write!(f, "invalid host address: {host:?}")
            }
            PingError::SocketInit { source } => {
                write!(f, "could not initialize ICMP socket: {source}")
            }
            PingError::Send { source } => {
                write!(f, "could not send echo request: {source}")
            }
            PingError::Packet { message } => {
                write!(f, "could not build ICMP package: {message}")
            }
        }
    }
}

impl Error for PingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PingError::SocketInit { source } | PingError::Send { source } => Some(source),
            PingError::InvalidAddress { .. } | PingError::Packet { .. } => None,
        }
    }
}
