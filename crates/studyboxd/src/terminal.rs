//! Terminal stand-in for the device's LCD panel

use std::io::{self, Stdout, Write};
use studybox_api::RenderRequest;
use studybox_host_api::{Display, DisplayError, DisplayResult};
use tracing::warn;

/// Renders the status panel as three text lines
///
/// A frame is only written when it differs from the last one written, so
/// a 100 ms tick produces at most one panel per displayed second.
pub struct TerminalDisplay<W: Write> {
    out: W,
    powered: bool,
    pending: Option<RenderRequest>,
    shown: Option<RenderRequest>,
}

impl TerminalDisplay<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            powered: false,
            pending: None,
            shown: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) -> io::Result<()> {
        let Some(frame) = &self.pending else {
            return Ok(());
        };
        if self.shown.as_ref() == Some(frame) {
            return Ok(());
        }

        writeln!(self.out, "[{}]", frame.subject_name)?;
        writeln!(self.out, "  session {}", frame.session_elapsed)?;
        writeln!(self.out, "  total   {}", frame.subject_total)?;
        self.out.flush()?;

        self.shown = Some(frame.clone());
        Ok(())
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn init(&mut self) -> DisplayResult<()> {
        writeln!(self.out, "studybox: n = next subject, p = start/pause, x = stop, q = quit")
            .and_then(|()| self.out.flush())
            .map_err(|e| DisplayError::InitFailed(e.to_string()))?;
        self.powered = true;
        Ok(())
    }

    fn render(&mut self, request: &RenderRequest) {
        self.pending = Some(request.clone());
        if !self.powered {
            return;
        }
        if let Err(e) = self.draw() {
            warn!(error = %e, "Failed to draw panel");
        }
    }

    fn set_powered(&mut self, on: bool) {
        if on == self.powered {
            return;
        }
        self.powered = on;

        let result = if on {
            // Redraw whatever was last requested
            self.shown = None;
            self.draw()
        } else {
            writeln!(self.out, "(display off)").and_then(|()| self.out.flush())
        };
        if let Err(e) = result {
            warn!(error = %e, on, "Failed to switch display power");
        }
    }
}
