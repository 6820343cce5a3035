use crate::ping_error::{PingError, PingResult};
use std::net::{IpAddr, Ipv4Addr};

/// Converts a user-supplied string into a concrete IPv4 address.
///
/// The number of `'.'` characters decides the branch: exactly three dots is
/// treated as an IPv4 literal and parsed strictly, anything else goes
/// through system name resolution. A hostname that happens to contain three
/// dots is therefore parsed as a literal and rejected there; this quirk is
/// kept on purpose.
pub fn resolve(host: &str) -> PingResult<Ipv4Addr> {
    let invalid = || PingError::InvalidAddress {
        host: host.to_string(),
    };

    let num_periods = host.matches('.').count();
    if num_periods == 3 {
        return host.parse::<Ipv4Addr>().map_err(|_| invalid());
    }

    let ips = dns_lookup::lookup_host(host).map_err(|_| invalid())?;
    ips.into_iter()
        .find_map(|ip| match ip {
            IpAddr::V4(ipv4) => Some(ipv4),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ipv4_literal() {
        assert_eq!(Ipv4Addr::new(8, 8, 8, 8), resolve("8.8.8.8").unwrap());
        assert_eq!(Ipv4Addr::new(0, 0, 0, 0), resolve("0.0.0.0").unwrap());
        assert_eq!(
            Ipv4Addr::new(255, 255, 255, 255),
            resolve("255.255.255.255").unwrap()
        );
    }

    #[test]
    fn octet_out_of_range_is_invalid() {
        let result = resolve("8.8.8.257");
        assert!(matches!(result, Err(PingError::InvalidAddress { .. })));
    }

    #[test]
    fn malformed_literal_is_invalid() {
        assert!(resolve("8.8.8.").is_err());
        assert!(resolve("1.2..3").is_err());
        assert!(resolve("a.b.c.d").is_err());
    }

    #[test]
    fn empty_string_is_invalid() {
        let result = resolve("");
        assert!(matches!(result, Err(PingError::InvalidAddress { .. })));
    }

    #[test]
    fn dot_com_is_invalid() {
        let result = resolve(".com");
        assert!(matches!(result, Err(PingError::InvalidAddress { .. })));
    }

    #[test]
    fn localhost_resolves() {
        assert_eq!(Ipv4Addr::new(127, 0, 0, 1), resolve("localhost").unwrap());
    }
}
