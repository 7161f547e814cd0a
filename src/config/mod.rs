#[cfg(test)]
mod config_test;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// FEC only works in 16 byte chunks, so packet sizes are rounded down to the
/// nearest multiple of this.
pub const FEC_BLOCK_SIZE: u32 = 16;

/// Cap applied to the packet size when streaming remotely, to avoid MTU
/// problems and fragmentation.
pub const MAX_REMOTE_PACKET_SIZE: u32 = 1024;

/// Whether the remote host is on the local network or reached over the
/// public internet. `Auto` defers the decision until the host name has been
/// resolved to an address.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locality {
    #[default]
    Auto,
    Local,
    Remote,
}

/// Stream parameters as requested by the caller, before negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfiguration {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Video bitrate in kilobits per second.
    pub bitrate: u32,
    /// Requested maximum transport packet size in bytes.
    pub packet_size: u32,
    pub locality: Locality,
}

impl Default for StreamConfiguration {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 60,
            bitrate: 10000,
            packet_size: 1024,
            locality: Locality::Auto,
        }
    }
}

/// Identity of the host to stream from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerInformation {
    /// Host name or address string to resolve and connect to.
    pub address: String,
    /// Dotted numeric server application version, e.g. "7.1.431.0".
    pub app_version: String,
}

/// Effective session parameters for one connection attempt.
///
/// Built once per attempt from the caller's [`StreamConfiguration`] and
/// [`ServerInformation`]. The locality classification (and the remote packet
/// size cap that may come with it) is applied separately after name
/// resolution via [`classify_locality`](Self::classify_locality); the config
/// is immutable for the rest of the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiatedConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bitrate: u32,
    /// Bitrate as originally requested by the caller.
    pub original_bitrate: u32,
    pub packet_size: u32,
    pub locality: Locality,
    pub app_version: [i32; 4],
}

impl NegotiatedConfig {
    pub fn new(config: &StreamConfiguration, server: &ServerInformation) -> Result<Self> {
        let packet_size = config.packet_size - (config.packet_size % FEC_BLOCK_SIZE);
        if packet_size == 0 {
            log::warn!("Invalid packet size specified");
            return Err(Error::ErrInvalidPacketSize);
        }

        let app_version = extract_version_quad(&server.app_version)?;

        Ok(Self {
            width: config.width,
            height: config.height,
            fps: config.fps,
            bitrate: config.bitrate,
            original_bitrate: config.bitrate,
            packet_size,
            locality: config.locality,
            app_version,
        })
    }

    /// Resolves an `Auto` locality request now that the remote address is
    /// known, capping the packet size for remote streaming. Must run after
    /// name resolution and before the handshake; a no-op when the caller
    /// specified the locality explicitly.
    pub fn classify_locality(&mut self, remote_is_private: bool) {
        if self.locality != Locality::Auto {
            return;
        }

        if remote_is_private {
            self.locality = Locality::Local;
        } else {
            self.locality = Locality::Remote;

            if self.packet_size > MAX_REMOTE_PACKET_SIZE {
                log::info!("Packet size capped at 1KB for remote streaming");
                self.packet_size = MAX_REMOTE_PACKET_SIZE;
            }
        }
    }
}

/// Extracts a fixed-width version quad from a dotted numeric string such as
/// "7.1.431.0". Missing trailing components are zero filled.
pub fn extract_version_quad(version: &str) -> Result<[i32; 4]> {
    let mut quad = [0i32; 4];
    let mut count = 0;

    for component in version.split('.') {
        if count == quad.len() {
            return Err(Error::ErrInvalidAppVersion(version.to_owned()));
        }
        quad[count] = component
            .parse::<i32>()
            .map_err(|_| Error::ErrInvalidAppVersion(version.to_owned()))?;
        count += 1;
    }

    Ok(quad)
}
