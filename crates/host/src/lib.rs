#![deny(unsafe_code)]
//! Host side of the dissolve effect: the render loop that drives a
//! [`ParticleField`], the command queue input sources write into, and
//! PNG input/output.
//!
//! The core crate has no notion of time. [`RenderLoop::tick`] is one display
//! refresh: apply queued commands, clear, draw, update. [`RenderLoop::run`]
//! repeats it until a frame limit, a [`CancelToken`], or the frame callback
//! stops it.

pub mod command;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use dissolve_core::{DissolveError, FieldConfig, ParticleField, PointerInput, Surface, Zone};
use log::{debug, info};

pub use command::Command;

/// Shared flag that stops a running [`RenderLoop`].
///
/// Clones share the same flag, so a handle can be passed to another thread
/// (or to surface teardown) and cancelled from there.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the loop to stop before its next tick.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Why [`RenderLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of frames was rendered.
    FrameLimit,
    /// The [`CancelToken`] was triggered.
    Cancelled,
    /// The frame callback returned `ControlFlow::Break`.
    Callback,
}

/// Drives a [`ParticleField`] one frame at a time.
///
/// Input sources hold a [`Sender<Command>`] from [`sender`](Self::sender);
/// queued commands are applied at the start of each tick, so the pointer the
/// particles see is fixed for the whole frame.
pub struct RenderLoop<S: Surface> {
    field: ParticleField<S>,
    input: PointerInput,
    commands: Receiver<Command>,
    sender: Sender<Command>,
    cancel: CancelToken,
    frame: u64,
}

impl<S: Surface> RenderLoop<S> {
    /// Wraps a field. The field is used as-is; call [`Command::Reinit`] (or
    /// `init` before wrapping) to sample an image.
    pub fn new(field: ParticleField<S>) -> Self {
        let (sender, commands) = mpsc::channel();
        Self {
            field,
            input: PointerInput::new(),
            commands,
            sender,
            cancel: CancelToken::new(),
            frame: 0,
        }
    }

    /// Registers a zone (menu, buttons) whose pointer movements are ignored.
    pub fn exclude(&mut self, zone: Zone) {
        self.input.exclude(zone);
    }

    /// A handle input sources use to queue commands.
    pub fn sender(&self) -> Sender<Command> {
        self.sender.clone()
    }

    /// A handle that stops [`run`](Self::run).
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Queues a command for the next tick.
    pub fn push(&self, command: Command) {
        // The loop owns the receiver, so sending cannot fail while `self` lives.
        let _ = self.sender.send(command);
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn field(&self) -> &ParticleField<S> {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField<S> {
        &mut self.field
    }

    pub fn into_field(self) -> ParticleField<S> {
        self.field
    }

    /// Applies every queued command in arrival order.
    ///
    /// Returns the number of commands applied.
    pub fn drain_commands(&mut self) -> Result<usize, DissolveError> {
        let mut applied = 0;
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    self.apply(command)?;
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(applied)
    }

    fn apply(&mut self, command: Command) -> Result<(), DissolveError> {
        debug!("frame {}: {}", self.frame, command.name());
        match command {
            Command::PointerMove { x, y } => {
                let sample = self.input.on_move(x, y);
                self.field.apply_pointer(sample);
            }
            Command::PointerLeave => {
                let sample = self.input.on_leave();
                self.field.apply_pointer(sample);
            }
            Command::Scatter => self.field.rand(),
            Command::Reinit(image) => self.field.init(image),
            Command::Configure(config) => self.configure(config)?,
        }
        Ok(())
    }

    fn configure(&mut self, config: FieldConfig) -> Result<(), DissolveError> {
        self.field.reconfigure(config.normalized())
    }

    /// One frame: apply commands, clear the surface, draw, then update.
    pub fn tick(&mut self) -> Result<(), DissolveError> {
        self.drain_commands()?;
        self.field.surface_mut().clear_all();
        self.field.draw();
        self.field.update();
        self.frame += 1;
        Ok(())
    }

    /// Ticks until `max_frames` more frames are rendered (forever if `None`),
    /// the cancel token fires, or `on_frame` breaks.
    ///
    /// `on_frame` sees the field right after each tick, with the surface
    /// holding that frame's drawing. Errors from a tick or the callback stop
    /// the loop and are returned.
    pub fn run<F>(
        &mut self,
        max_frames: Option<u64>,
        mut on_frame: F,
    ) -> Result<StopReason, DissolveError>
    where
        F: FnMut(u64, &ParticleField<S>) -> Result<ControlFlow<()>, DissolveError>,
    {
        info!(
            "render loop starting at frame {} ({} particles)",
            self.frame,
            self.field.len()
        );
        let start = self.frame;
        let reason = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            if max_frames.is_some_and(|max| self.frame - start >= max) {
                break StopReason::FrameLimit;
            }
            self.tick()?;
            if on_frame(self.frame, &self.field)?.is_break() {
                break StopReason::Callback;
            }
        };
        info!("render loop stopped at frame {}: {reason:?}", self.frame);
        Ok(reason)
    }
}
