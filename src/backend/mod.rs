//! Contracts for the subsystems driven by the connection orchestrator.
//!
//! Each trait mirrors one collaborator of the connection lifecycle: platform
//! bring-up, the RTSP handshake, and the four stream channels. The
//! orchestrator only calls these in the fixed ladder order and undoes them in
//! reverse; everything else about their behavior is the implementation's
//! business. Fallible operations report an implementation-defined nonzero
//! [`ErrorCode`].

use crate::config::NegotiatedConfig;
use crate::error::StageResult;
use crate::interrupt::InterruptSignal;
use std::net::SocketAddr;

/// Platform bring-up and teardown (sockets, codecs, input backends).
pub trait PlatformSupport {
    fn initialize(&mut self) -> StageResult;
    fn cleanup(&mut self);
}

/// The RTSP session negotiation with the remote host.
///
/// May block for network I/O; implementations should poll the interrupt
/// signal so cancellation is observed within a bounded delay.
pub trait RtspHandshake {
    fn perform_handshake(
        &mut self,
        remote: SocketAddr,
        config: &NegotiatedConfig,
        interrupt: &InterruptSignal,
    ) -> StageResult;
}

pub trait ControlStream {
    fn initialize(&mut self, config: &NegotiatedConfig) -> StageResult;
    fn destroy(&mut self);
    fn start(&mut self) -> StageResult;
    fn stop(&mut self);
}

pub trait VideoStream {
    /// Renderer state threaded through to `start`, opaque to the
    /// orchestrator.
    type RenderContext;

    fn initialize(&mut self, config: &NegotiatedConfig);
    fn destroy(&mut self);
    fn start(&mut self, context: &mut Self::RenderContext, flags: u32) -> StageResult;
    fn stop(&mut self);
}

pub trait AudioStream {
    /// Audio device state threaded through to `start`, opaque to the
    /// orchestrator.
    type AudioContext;

    fn initialize(&mut self, config: &NegotiatedConfig);
    fn destroy(&mut self);
    fn start(&mut self, context: &mut Self::AudioContext, flags: u32) -> StageResult;
    fn stop(&mut self);
}

pub trait InputStream {
    fn initialize(&mut self, config: &NegotiatedConfig);
    fn destroy(&mut self);
    fn start(&mut self) -> StageResult;
    fn stop(&mut self);

    /// Injects a synthetic relative pointer motion event. Used after a
    /// successful start to wake the remote display.
    fn send_mouse_move(&mut self, delta_x: i16, delta_y: i16);
}

/// One of each collaborator, handed to the orchestrator at construction.
pub struct StreamBundle<P, R, H, C, V, A, I> {
    pub platform: P,
    pub resolver: R,
    pub handshake: H,
    pub control: C,
    pub video: V,
    pub audio: A,
    pub input: I,
}
