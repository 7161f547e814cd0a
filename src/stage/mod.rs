#[cfg(test)]
mod stage_test;

use serde::{Deserialize, Serialize};
use std::fmt;

/// One milestone in the fixed connection setup ladder.
///
/// Declaration order is significant: setup advances through the variants in
/// order, and teardown undoes them in exact reverse order. The live value of
/// a [`StageLadder`] always equals the highest milestone whose action has
/// successfully completed and not yet been undone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ConnectionStage {
    None = 0,
    PlatformInit,
    NameResolution,
    RtspHandshake,
    ControlStreamInit,
    VideoStreamInit,
    AudioStreamInit,
    InputStreamInit,
    ControlStreamStart,
    VideoStreamStart,
    AudioStreamStart,
    InputStreamStart,
}

/// The setup milestones in forward order. Teardown walks this backwards.
pub const LADDER: [ConnectionStage; 11] = [
    ConnectionStage::PlatformInit,
    ConnectionStage::NameResolution,
    ConnectionStage::RtspHandshake,
    ConnectionStage::ControlStreamInit,
    ConnectionStage::VideoStreamInit,
    ConnectionStage::AudioStreamInit,
    ConnectionStage::InputStreamInit,
    ConnectionStage::ControlStreamStart,
    ConnectionStage::VideoStreamStart,
    ConnectionStage::AudioStreamStart,
    ConnectionStage::InputStreamStart,
];

impl ConnectionStage {
    /// Human-readable label for diagnostics.
    pub fn label(&self) -> &'static str {
        match *self {
            Self::None => "none",
            Self::PlatformInit => "platform initialization",
            Self::NameResolution => "name resolution",
            Self::RtspHandshake => "RTSP handshake",
            Self::ControlStreamInit => "control stream initialization",
            Self::VideoStreamInit => "video stream initialization",
            Self::AudioStreamInit => "audio stream initialization",
            Self::InputStreamInit => "input stream initialization",
            Self::ControlStreamStart => "control stream establishment",
            Self::VideoStreamStart => "video stream establishment",
            Self::AudioStreamStart => "audio stream establishment",
            Self::InputStreamStart => "input stream establishment",
        }
    }

    fn succ(&self) -> Option<Self> {
        let next = (*self as u8) + 1;
        if next <= ConnectionStage::InputStreamStart as u8 {
            Some(Self::from(next))
        } else {
            None
        }
    }

    fn pred(&self) -> Option<Self> {
        match *self {
            Self::None => None,
            s => Some(Self::from(s as u8 - 1)),
        }
    }
}

impl Default for ConnectionStage {
    fn default() -> Self {
        Self::None
    }
}

impl fmt::Display for ConnectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<u8> for ConnectionStage {
    fn from(v: u8) -> Self {
        match v {
            1 => Self::PlatformInit,
            2 => Self::NameResolution,
            3 => Self::RtspHandshake,
            4 => Self::ControlStreamInit,
            5 => Self::VideoStreamInit,
            6 => Self::AudioStreamInit,
            7 => Self::InputStreamInit,
            8 => Self::ControlStreamStart,
            9 => Self::VideoStreamStart,
            10 => Self::AudioStreamStart,
            11 => Self::InputStreamStart,
            _ => Self::None,
        }
    }
}

/// Tracks the highest successfully completed milestone.
///
/// The pointer only ever moves by exactly one step: [`advance`](Self::advance)
/// after a stage action succeeds, [`retreat`](Self::retreat) per teardown
/// step. Skipping is a logic fault and asserts in debug builds.
#[derive(Debug, Default)]
pub struct StageLadder {
    current: ConnectionStage,
}

impl StageLadder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ConnectionStage {
        self.current
    }

    /// True when no milestone has been reached (or everything was undone).
    pub fn is_idle(&self) -> bool {
        self.current == ConnectionStage::None
    }

    /// Records that the next milestone's action succeeded. Returns the new
    /// current stage.
    pub fn advance(&mut self) -> ConnectionStage {
        debug_assert!(
            self.current.succ().is_some(),
            "stage ladder advanced past {}",
            self.current
        );
        if let Some(next) = self.current.succ() {
            self.current = next;
        }
        self.current
    }

    /// Steps back by one milestone and returns the milestone being undone.
    pub fn retreat(&mut self) -> ConnectionStage {
        debug_assert!(
            self.current != ConnectionStage::None,
            "stage ladder retreated below none"
        );
        let undone = self.current;
        if let Some(prev) = self.current.pred() {
            self.current = prev;
        }
        undone
    }
}
