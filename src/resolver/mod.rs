
use crate::error::ErrorCode;
use crate::interrupt::InterruptSignal;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

/// Code reported when the host name could not be resolved to any address.
pub const RESOLUTION_FAILED: ErrorCode = -1;
/// Code reported when resolution was abandoned due to an interrupt.
pub const RESOLUTION_INTERRUPTED: ErrorCode = -2;

/// Name resolution contract consumed by the connection orchestrator.
///
/// `resolve` may block for network I/O; implementations should observe the
/// interrupt signal opportunistically and report
/// [`RESOLUTION_INTERRUPTED`] rather than completing a doomed lookup.
pub trait AddressResolver {
    fn resolve(
        &mut self,
        host: &str,
        port: u16,
        interrupt: &InterruptSignal,
    ) -> Result<SocketAddr, ErrorCode>;

    /// Classifies the resolved address as private/local-network versus
    /// public. Pure predicate; used to derive the locality when the caller
    /// requested automatic detection.
    fn is_private_network_address(&self, addr: &SocketAddr) -> bool {
        is_private_network_address(addr)
    }
}

/// [`AddressResolver`] backed by the operating system's resolver.
#[derive(Debug, Default)]
pub struct SystemResolver;

impl AddressResolver for SystemResolver {
    fn resolve(
        &mut self,
        host: &str,
        port: u16,
        interrupt: &InterruptSignal,
    ) -> Result<SocketAddr, ErrorCode> {
        if interrupt.is_raised() {
            return Err(RESOLUTION_INTERRUPTED);
        }

        let addrs = match (host, port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                log::warn!("resolving {host} failed: {e}");
                return Err(RESOLUTION_FAILED);
            }
        };

        // The lookup itself blocks uninterruptibly, so check again before
        // committing to an address.
        if interrupt.is_raised() {
            return Err(RESOLUTION_INTERRUPTED);
        }

        match addrs.into_iter().next() {
            Some(addr) => Ok(addr),
            None => {
                log::warn!("resolving {host} returned success without addresses");
                Err(RESOLUTION_FAILED)
            }
        }
    }
}

/// Returns true for addresses on a private or link-local network.
///
/// IPv4: 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16 and 169.254.0.0/16.
/// IPv6: fe80::/10, fec0::/10 and fc00::/7.
pub fn is_private_network_address(addr: &SocketAddr) -> bool {
    match addr.ip() {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            match octets[0] {
                10 => true,
                172 => (octets[1] & 0xF0) == 16,
                192 => octets[1] == 168,
                169 => octets[1] == 254,
                _ => false,
            }
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            // fe80::/10 and fec0::/10
            if (segments[0] & 0xFFC0) == 0xFE80 || (segments[0] & 0xFFC0) == 0xFEC0 {
                return true;
            }
            // fc00::/7
            (segments[0] & 0xFE00) == 0xFC00
        }
    }
}
