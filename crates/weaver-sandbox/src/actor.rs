//! Sandbox actor wrapper.
//!
//! Runs a [`PreviewSandbox`] on its own task behind a single mailbox, so
//! the host and the preview share no memory: everything crosses the
//! boundary as a message, processed strictly in arrival order.

use crate::sandbox::PreviewSandbox;
use tokio::sync::mpsc;
use weaver_core::error::{Result, WeaverError};
use weaver_core::protocol::{PressTarget, PreviewCommand, PreviewEvent, SandboxInput};

/// Handle held by the host side of the preview boundary.
///
/// All sends are fire-and-forget. Dropping the handle closes the mailbox
/// and ends the actor task.
#[derive(Clone)]
pub struct SandboxHandle {
    input: mpsc::UnboundedSender<SandboxInput>,
}

impl SandboxHandle {
    /// Replaces the preview content with an instrumented document.
    pub fn render(&self, document: impl Into<String>) -> Result<()> {
        self.send_input(SandboxInput::Render(document.into()))
    }

    /// Simulates the user's primary-button press inside the preview.
    pub fn press(&self, target: PressTarget) -> Result<()> {
        self.send_input(SandboxInput::Press(target))
    }

    /// Sends a protocol command into the preview.
    pub fn send(&self, command: PreviewCommand) -> Result<()> {
        self.send_input(SandboxInput::Command(command))
    }

    fn send_input(&self, input: SandboxInput) -> Result<()> {
        self.input
            .send(input)
            .map_err(|_| WeaverError::bridge("preview sandbox is gone"))
    }

    /// A clone of the raw mailbox sender, for host components that speak
    /// the protocol directly.
    pub fn sender(&self) -> mpsc::UnboundedSender<SandboxInput> {
        self.input.clone()
    }
}

/// Spawns the sandbox actor.
///
/// Events the preview emits are forwarded on `events`; the actor stops
/// when either side of the boundary goes away.
pub fn spawn(events: mpsc::UnboundedSender<PreviewEvent>) -> SandboxHandle {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();

    // `PreviewSandbox` owns a scraper `Html`, whose tendrils use
    // non-atomic refcounts and are therefore `!Send`, so the drain loop
    // cannot live on a `tokio::spawn` task (which requires `Send`). Host
    // it on a dedicated thread instead and block on the mailbox; the
    // external contract — single mailbox, strict arrival order, drop
    // closes the mailbox and ends the task — is unchanged.
    std::thread::spawn(move || {
        let mut sandbox = PreviewSandbox::new();
        while let Some(input) = input_rx.blocking_recv() {
            if let Some(event) = sandbox.handle(input)
                && events.send(event).is_err()
            {
                tracing::debug!("host event channel closed, stopping sandbox actor");
                break;
            }
        }
    });

    SandboxHandle { input: input_tx }
}
