use super::*;
use crate::error::Result;

fn server() -> ServerInformation {
    ServerInformation {
        address: "192.168.1.50".to_owned(),
        app_version: "7.1.431.0".to_owned(),
    }
}

#[test]
fn test_packet_size_multiple_of_16_unchanged() -> Result<()> {
    let config = StreamConfiguration {
        packet_size: 16,
        ..Default::default()
    };
    let negotiated = NegotiatedConfig::new(&config, &server())?;
    assert_eq!(negotiated.packet_size, 16);
    Ok(())
}

#[test]
fn test_packet_size_rounded_down() -> Result<()> {
    let config = StreamConfiguration {
        packet_size: 20,
        ..Default::default()
    };
    let negotiated = NegotiatedConfig::new(&config, &server())?;
    assert_eq!(negotiated.packet_size, 16);

    let config = StreamConfiguration {
        packet_size: 1400,
        ..Default::default()
    };
    let negotiated = NegotiatedConfig::new(&config, &server())?;
    assert_eq!(negotiated.packet_size, 1392);
    Ok(())
}

#[test]
fn test_packet_size_too_small_rejected() {
    let config = StreamConfiguration {
        packet_size: 15,
        ..Default::default()
    };
    assert_eq!(
        NegotiatedConfig::new(&config, &server()),
        Err(Error::ErrInvalidPacketSize)
    );
}

#[test]
fn test_version_quad_extraction() -> Result<()> {
    assert_eq!(extract_version_quad("7.1.431.0")?, [7, 1, 431, 0]);
    assert_eq!(extract_version_quad("4.0")?, [4, 0, 0, 0]);
    assert_eq!(extract_version_quad("3")?, [3, 0, 0, 0]);
    Ok(())
}

#[test]
fn test_version_quad_malformed() {
    for bad in ["", "banana", "7.1.x.0", "7.1.431.0.2", "7..1"] {
        assert!(
            extract_version_quad(bad).is_err(),
            "expected {bad:?} to be rejected"
        );
    }
}

#[test]
fn test_malformed_version_fails_negotiation() {
    let server = ServerInformation {
        address: "host".to_owned(),
        app_version: "not-a-version".to_owned(),
    };
    assert_eq!(
        NegotiatedConfig::new(&StreamConfiguration::default(), &server),
        Err(Error::ErrInvalidAppVersion("not-a-version".to_owned()))
    );
}

#[test]
fn test_auto_locality_private_is_local_without_cap() -> Result<()> {
    let config = StreamConfiguration {
        packet_size: 1400,
        ..Default::default()
    };
    let mut negotiated = NegotiatedConfig::new(&config, &server())?;
    negotiated.classify_locality(true);
    assert_eq!(negotiated.locality, Locality::Local);
    assert_eq!(negotiated.packet_size, 1392);
    Ok(())
}

#[test]
fn test_auto_locality_public_caps_packet_size() -> Result<()> {
    let config = StreamConfiguration {
        packet_size: 1400,
        ..Default::default()
    };
    let mut negotiated = NegotiatedConfig::new(&config, &server())?;
    negotiated.classify_locality(false);
    assert_eq!(negotiated.locality, Locality::Remote);
    assert_eq!(negotiated.packet_size, MAX_REMOTE_PACKET_SIZE);
    Ok(())
}

#[test]
fn test_explicit_locality_never_capped() -> Result<()> {
    let config = StreamConfiguration {
        packet_size: 1400,
        locality: Locality::Remote,
        ..Default::default()
    };
    let mut negotiated = NegotiatedConfig::new(&config, &server())?;
    negotiated.classify_locality(false);
    assert_eq!(negotiated.locality, Locality::Remote);
    assert_eq!(negotiated.packet_size, 1392);
    Ok(())
}

#[test]
fn test_original_bitrate_retained() -> Result<()> {
    let config = StreamConfiguration {
        bitrate: 20000,
        ..Default::default()
    };
    let negotiated = NegotiatedConfig::new(&config, &server())?;
    assert_eq!(negotiated.bitrate, 20000);
    assert_eq!(negotiated.original_bitrate, 20000);
    Ok(())
}
