pub mod listener;
pub mod termination;

#[cfg(test)]
mod termination_test;

use crate::backend::{
    AudioStream, ControlStream, InputStream, PlatformSupport, RtspHandshake, StreamBundle,
    VideoStream,
};
use crate::config::{NegotiatedConfig, ServerInformation, StreamConfiguration};
use crate::error::{Error, Result, StageResult};
use crate::interrupt::InterruptSignal;
use crate::resolver::AddressResolver;
use crate::stage::{self, ConnectionStage, StageLadder};
use listener::ConnectionListener;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use termination::TerminationNotifier;

/// Port used to validate resolved addresses for the host.
const DEFAULT_RESOLUTION_PORT: u16 = 47984;

/// Delay between the two synthetic pointer motions used to wake the remote
/// display after a successful start.
const WAKE_NUDGE_DELAY: Duration = Duration::from_millis(10);

/// Per-attempt connection state.
///
/// Reset at the start of every attempt and torn back down to its idle state
/// by [`Connection::stop`]. The owned remote address string is released
/// exactly once; a second teardown finds nothing to do.
#[derive(Debug, Default)]
struct ConnectionContext {
    ladder: StageLadder,
    remote_addr: Option<SocketAddr>,
    remote_addr_string: Option<String>,
    config: Option<NegotiatedConfig>,
}

impl ConnectionContext {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Drives a remote host through the fixed connection setup ladder.
///
/// [`start`](Self::start) walks the ladder forward one milestone at a time,
/// reporting progress through the caller's [`ConnectionListener`];
/// [`stop`](Self::stop) undoes every milestone reached in exact reverse
/// order. Taking `&mut self` for both encodes the single-attempt-in-flight
/// precondition: a second attempt cannot begin until the first call returns.
/// [`interrupt`](Self::interrupt) is the only operation safe to invoke
/// concurrently with an in-flight attempt.
pub struct Connection<P, R, H, C, V, A, I>
where
    V: VideoStream,
    A: AudioStream,
{
    streams: StreamBundle<P, R, H, C, V, A, I>,
    listener: Arc<TerminationNotifier>,
    interrupt: InterruptSignal,
    ctx: ConnectionContext,
}

impl<P, R, H, C, V, A, I> Connection<P, R, H, C, V, A, I>
where
    P: PlatformSupport,
    R: AddressResolver,
    H: RtspHandshake,
    C: ControlStream,
    V: VideoStream,
    A: AudioStream,
    I: InputStream,
{
    /// Creates a connection driver over the given collaborators.
    ///
    /// The caller's termination callback is wrapped by a
    /// [`TerminationNotifier`] here, once; internal components never see the
    /// raw listener. The interrupt signal is caller-supplied so clones of it
    /// can be handed to blocking collaborators and to other threads.
    pub fn new(
        streams: StreamBundle<P, R, H, C, V, A, I>,
        listener: Arc<dyn ConnectionListener>,
        interrupt: InterruptSignal,
    ) -> Self {
        let notifier = Arc::new(TerminationNotifier::new(listener, interrupt.clone()));
        Self {
            streams,
            listener: notifier,
            interrupt,
            ctx: ConnectionContext::default(),
        }
    }

    /// The milestone the connection currently holds.
    pub fn stage(&self) -> ConnectionStage {
        self.ctx.ladder.current()
    }

    /// The resolved remote address, once name resolution has completed.
    pub fn remote_address(&self) -> Option<SocketAddr> {
        self.ctx.remote_addr
    }

    /// The negotiated session parameters of a successfully started attempt.
    pub fn negotiated_config(&self) -> Option<&NegotiatedConfig> {
        self.ctx.config.as_ref()
    }

    /// The callback table internal stream components report through. The
    /// termination entry is the notifier's shim, never the caller's raw
    /// callback.
    pub fn listener(&self) -> Arc<dyn ConnectionListener> {
        self.listener.clone()
    }

    /// A cloneable handle for interrupting this connection from another
    /// thread.
    pub fn interrupt_handle(&self) -> InterruptSignal {
        self.interrupt.clone()
    }

    /// Interrupts a pending connection attempt. The interruption happens
    /// asynchronously, so it is not safe to start another connection until
    /// the in-flight `start()` has returned.
    pub fn interrupt(&self) {
        self.interrupt.raise();
    }

    /// Starts the connection to the streaming host.
    ///
    /// Milestones run strictly in ladder order, each bracketed by
    /// `stage_starting` and exactly one of `stage_complete` or
    /// `stage_failed`. The first failure triggers full teardown of
    /// everything reached so far before the error is returned. Configuration
    /// errors fail fast, before any stage callback fires.
    pub fn start(
        &mut self,
        server: &ServerInformation,
        stream_config: &StreamConfiguration,
        render_context: &mut V::RenderContext,
        video_flags: u32,
        audio_context: &mut A::AudioContext,
        audio_flags: u32,
    ) -> Result<()> {
        self.ctx.reset();
        self.ctx.remote_addr_string = Some(server.address.clone());

        let mut config = match NegotiatedConfig::new(stream_config, server) {
            Ok(config) => config,
            Err(e) => {
                // No stage has been reached, but the cleanup path still
                // releases the address string and suppresses callbacks.
                self.stop();
                return Err(e);
            }
        };

        self.listener.reset();
        self.interrupt.clear();

        for current in stage::LADDER {
            log::info!("Starting {}...", current.label());
            self.listener.stage_starting(current);

            match self.run_stage(
                current,
                &mut config,
                render_context,
                video_flags,
                audio_context,
                audio_flags,
            ) {
                Ok(()) => {
                    self.ctx.ladder.advance();
                    debug_assert_eq!(self.ctx.ladder.current(), current);
                    self.listener.stage_complete(current);
                    log::info!("{} done", current.label());
                }
                Err(code) => {
                    log::warn!("{} failed: {code}", current.label());
                    self.listener.stage_failed(current, code);
                    // Undo any work done so far before failing
                    self.stop();
                    return Err(Error::ErrStageFailed {
                        stage: current,
                        code,
                    });
                }
            }
        }

        self.ctx.config = Some(config);

        // Wiggle the mouse a bit to wake the display up
        self.streams.input.send_mouse_move(1, 1);
        thread::sleep(WAKE_NUDGE_DELAY);
        self.streams.input.send_mouse_move(-1, -1);
        thread::sleep(WAKE_NUDGE_DELAY);

        self.listener.connection_started();
        Ok(())
    }

    /// Stops the connection by undoing the milestone at the current stage
    /// and every one before it, in reverse order. Idempotent; safe to call
    /// with no attempt in flight.
    pub fn stop(&mut self) {
        // Disable termination callbacks now
        self.listener.disable();
        self.interrupt.raise();

        while !self.ctx.ladder.is_idle() {
            let undone = self.ctx.ladder.retreat();
            self.undo_stage(undone);
        }
        debug_assert!(self.ctx.ladder.is_idle());

        self.ctx.remote_addr = None;
        self.ctx.config = None;
        self.ctx.remote_addr_string = None;
    }

    /// Runs the forward action paired with `stage`.
    fn run_stage(
        &mut self,
        stage: ConnectionStage,
        config: &mut NegotiatedConfig,
        render_context: &mut V::RenderContext,
        video_flags: u32,
        audio_context: &mut A::AudioContext,
        audio_flags: u32,
    ) -> StageResult {
        match stage {
            ConnectionStage::PlatformInit => self.streams.platform.initialize(),
            ConnectionStage::NameResolution => {
                let host = self.ctx.remote_addr_string.clone().unwrap_or_default();
                let addr = self.streams.resolver.resolve(
                    &host,
                    DEFAULT_RESOLUTION_PORT,
                    &self.interrupt,
                )?;
                self.ctx.remote_addr = Some(addr);

                // Locality can only be derived once the address is known, so
                // this runs here rather than as a stage of its own.
                let private = self.streams.resolver.is_private_network_address(&addr);
                config.classify_locality(private);
                Ok(())
            }
            ConnectionStage::RtspHandshake => {
                let Some(remote) = self.ctx.remote_addr else {
                    debug_assert!(false, "handshake requires a resolved address");
                    return Err(-1);
                };
                self.streams
                    .handshake
                    .perform_handshake(remote, config, &self.interrupt)
            }
            ConnectionStage::ControlStreamInit => self.streams.control.initialize(config),
            ConnectionStage::VideoStreamInit => {
                self.streams.video.initialize(config);
                Ok(())
            }
            ConnectionStage::AudioStreamInit => {
                self.streams.audio.initialize(config);
                Ok(())
            }
            ConnectionStage::InputStreamInit => {
                self.streams.input.initialize(config);
                Ok(())
            }
            ConnectionStage::ControlStreamStart => self.streams.control.start(),
            ConnectionStage::VideoStreamStart => {
                self.streams.video.start(render_context, video_flags)
            }
            ConnectionStage::AudioStreamStart => {
                self.streams.audio.start(audio_context, audio_flags)
            }
            ConnectionStage::InputStreamStart => self.streams.input.start(),
            ConnectionStage::None => Ok(()),
        }
    }

    /// Runs the undo action paired with `stage`.
    fn undo_stage(&mut self, stage: ConnectionStage) {
        match stage {
            ConnectionStage::InputStreamStart => {
                log::info!("Stopping input stream...");
                self.streams.input.stop();
            }
            ConnectionStage::AudioStreamStart => {
                log::info!("Stopping audio stream...");
                self.streams.audio.stop();
            }
            ConnectionStage::VideoStreamStart => {
                log::info!("Stopping video stream...");
                self.streams.video.stop();
            }
            ConnectionStage::ControlStreamStart => {
                log::info!("Stopping control stream...");
                self.streams.control.stop();
            }
            ConnectionStage::InputStreamInit => {
                log::info!("Cleaning up input stream...");
                self.streams.input.destroy();
            }
            ConnectionStage::AudioStreamInit => {
                log::info!("Cleaning up audio stream...");
                self.streams.audio.destroy();
            }
            ConnectionStage::VideoStreamInit => {
                log::info!("Cleaning up video stream...");
                self.streams.video.destroy();
            }
            ConnectionStage::ControlStreamInit => {
                log::info!("Cleaning up control stream...");
                self.streams.control.destroy();
            }
            // Nothing to do
            ConnectionStage::RtspHandshake | ConnectionStage::NameResolution => {}
            ConnectionStage::PlatformInit => {
                log::info!("Cleaning up platform...");
                self.streams.platform.cleanup();
            }
            ConnectionStage::None => {}
        }
    }
}
