//! Screen-scoped state.
//!
//! Every screen owns its data as an explicit value with defined
//! transitions; nothing here is shared between screens. The types are
//! plain Rust so they can be exercised without a browser.
//!
//! - [`LoadState`] - loading / ready / failed for a fetched resource
//! - [`RequestTracker`] - "last response wins" guard tied to a view
//! - [`upload`], [`lister`], [`review`], [`editor`] - per-screen state

pub mod editor;
pub mod lister;
pub mod review;
pub mod upload;

pub use editor::*;
pub use lister::*;
pub use review::*;
pub use upload::*;

use std::cell::Cell;
use std::rc::Rc;

use crate::types::AppResult;

/// State of a remote resource bound to a view.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

impl<T> LoadState<T> {
    /// Turn a request result into a state, showing `fallback` on error.
    ///
    /// The underlying error is logged, not displayed.
    pub fn from_result(result: AppResult<T>, fallback: &str) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => {
                log::error!("❌ {}: {}", fallback, e);
                LoadState::Failed(fallback.to_string())
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// The state without its payload.
    pub fn phase(&self) -> LoadPhase {
        match self {
            LoadState::Loading => LoadPhase::Loading,
            LoadState::Failed(msg) => LoadPhase::Failed(msg.clone()),
            LoadState::Ready(_) => LoadPhase::Ready,
        }
    }
}

/// Which of loading / ready / failed a [`LoadState`] is in.
///
/// Views switch on this so that edits to a ready payload do not rebuild
/// the whole screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Failed(String),
    Ready,
}

struct TrackerInner {
    open: Cell<bool>,
    generation: Cell<u64>,
}

/// Tracks the requests a view issues for one resource.
///
/// Each request takes a [`RequestTicket`]. A ticket stays current until
/// the view closes the tracker (unmount) or a newer request begins.
#[derive(Clone)]
pub struct RequestTracker {
    inner: Rc<TrackerInner>,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestTracker {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(TrackerInner {
                open: Cell::new(true),
                generation: Cell::new(0),
            }),
        }
    }

    /// Start a request, superseding any earlier one.
    pub fn begin(&self) -> RequestTicket {
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        RequestTicket {
            tracker: self.clone(),
            generation,
        }
    }

    /// Mark the owning view as gone; no ticket is current afterwards.
    pub fn close(&self) {
        self.inner.open.set(false);
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }
}

/// Proof that a request was started; see [`RequestTracker`].
pub struct RequestTicket {
    tracker: RequestTracker,
    generation: u64,
}

impl RequestTicket {
    /// Whether the result of this request may still be applied.
    pub fn is_current(&self) -> bool {
        self.tracker.is_open() && self.tracker.inner.generation.get() == self.generation
    }

    /// Hand `value` back only if the ticket is current.
    pub fn accept<T>(&self, value: T) -> Option<T> {
        if self.is_current() {
            Some(value)
        } else {
            log::debug!("Discarding stale response (request #{})", self.generation);
            None
        }
    }
}
