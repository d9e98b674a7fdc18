use crate::host::window::Window;

/// Handle for one pending display-frame callback.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameToken(pub u64);

/// Coalesces update requests so that at most one frame callback is outstanding.
///
/// Requests made while a frame is pending collapse into it; the work done when the frame fires
/// reads the live page state, so it reflects the last request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGate {
    pending: Option<FrameToken>,
}

impl FrameGate {
    /// Returns `true` when a new frame was requested, `false` when one was already pending.
    pub fn request(&mut self, window: &mut dyn Window) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(window.request_frame());
        true
    }

    /// Consumes `token` if it is the pending frame of this gate.
    pub fn fire(&mut self, token: FrameToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Cancels the pending frame, if any.
    pub fn cancel(&mut self, window: &mut dyn Window) {
        if let Some(token) = self.pending.take() {
            window.cancel_frame(token);
        }
    }

    /// Token of the outstanding frame.
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/frame.rs"]
mod tests;
