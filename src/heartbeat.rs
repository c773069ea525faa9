//! Heartbeat
//!
//! A stack of deferred-action frames. Code deep inside a nested operation can
//! defer work until the current logical unit completes without knowing how many
//! scopes are open. One heartbeat belongs to one request; it is deliberately `!Send`.

use crate::error::IllegalStateError;
use std::cell::RefCell;
use tracing::trace;

/// Zero-argument deferred action
pub type DeferredAction = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct Heartbeat {
    frames: RefCell<Vec<Vec<DeferredAction>>>,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new scope.
    pub fn begin(&self) {
        let mut frames = self.frames.borrow_mut();
        frames.push(Vec::new());
        trace!(depth = frames.len(), "heartbeat begin");
    }

    /// Queue `action` in the innermost open scope.
    pub fn defer(&self, action: impl FnOnce() + 'static) -> Result<(), IllegalStateError> {
        let mut frames = self.frames.borrow_mut();
        let top = frames
            .last_mut()
            .ok_or(IllegalStateError::DeferWithoutScope)?;
        top.push(Box::new(action));
        Ok(())
    }

    /// Close the innermost scope and run its actions in the order they were deferred.
    ///
    /// The frame is popped before any action runs, so actions deferred while
    /// draining land in whichever frame is current at that point.
    pub fn end(&self) -> Result<(), IllegalStateError> {
        let actions = {
            let mut frames = self.frames.borrow_mut();
            let actions = frames.pop().ok_or(IllegalStateError::Underflow)?;
            trace!(depth = frames.len(), deferred = actions.len(), "heartbeat end");
            actions
        };
        for action in actions {
            action();
        }
        Ok(())
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Run `f` inside its own scope.
    pub fn scoped<R>(&self, f: impl FnOnce() -> R) -> Result<R, IllegalStateError> {
        self.begin();
        let result = f();
        self.end()?;
        Ok(result)
    }
}

impl std::fmt::Debug for Heartbeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let frames = self.frames.borrow();
        f.debug_struct("Heartbeat")
            .field("depth", &frames.len())
            .field(
                "pending",
                &frames.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .finish()
    }
}
