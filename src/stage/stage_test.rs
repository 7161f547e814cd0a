use super::*;

#[test]
fn test_ladder_advances_one_step_at_a_time() {
    let mut ladder = StageLadder::new();
    assert!(ladder.is_idle());

    for expected in LADDER {
        let reached = ladder.advance();
        assert_eq!(reached, expected);
        assert_eq!(ladder.current(), expected);
    }

    assert_eq!(ladder.current(), ConnectionStage::InputStreamStart);
}

#[test]
fn test_ladder_retreats_in_reverse_order() {
    let mut ladder = StageLadder::new();
    for _ in LADDER {
        ladder.advance();
    }

    for expected in LADDER.iter().rev() {
        let undone = ladder.retreat();
        assert_eq!(undone, *expected);
    }

    assert!(ladder.is_idle());
    assert_eq!(ladder.current(), ConnectionStage::None);
}

#[test]
fn test_stage_order_matches_declaration() {
    let mut prev = ConnectionStage::None;
    for stage in LADDER {
        assert!(stage > prev);
        prev = stage;
    }
}

#[test]
fn test_stage_labels() {
    assert_eq!(ConnectionStage::None.label(), "none");
    assert_eq!(
        ConnectionStage::PlatformInit.label(),
        "platform initialization"
    );
    assert_eq!(ConnectionStage::RtspHandshake.label(), "RTSP handshake");
    assert_eq!(
        ConnectionStage::InputStreamStart.label(),
        "input stream establishment"
    );
    assert_eq!(
        ConnectionStage::VideoStreamInit.to_string(),
        "video stream initialization"
    );
}

#[test]
fn test_stage_from_u8() {
    for stage in LADDER {
        assert_eq!(ConnectionStage::from(stage as u8), stage);
    }
    assert_eq!(ConnectionStage::from(0), ConnectionStage::None);
    assert_eq!(ConnectionStage::from(200), ConnectionStage::None);
}
