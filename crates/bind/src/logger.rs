//! Binder log sink
//!
//! The binder reports its own activity (bindings, startup, shutdown and
//! shutdown failures) through a [`Logger`]. A fresh binder discards
//! everything; register a `Handle<Logger>` to redirect output:
//!
//! ```rust
//! use bind::{handle, Binder, Logger};
//!
//! let mut binder = Binder::new();
//! binder.add_one(handle(Logger::stderr())).unwrap();
//! ```

use std::fmt;

use tracing::subscriber::NoSubscriber;
use tracing::{Dispatch, Subscriber};

use crate::component::Component;

/// A `tracing` dispatcher scoped to one binder.
///
/// Events are emitted with the dispatcher set as the thread's default only
/// while the binder is logging, so the global subscriber is left alone.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Route binder events to `subscriber`
    pub fn new<S>(subscriber: S) -> Self
    where
        S: Subscriber + Send + Sync + 'static,
    {
        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// A logger that drops every event
    pub fn discard() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Whatever dispatcher is the default for the calling thread
    pub fn current() -> Self {
        tracing::dispatcher::get_default(|dispatch| Self::from_dispatch(dispatch.clone()))
    }

    /// Plain text lines (no colors, no timestamps) at INFO and above
    #[cfg(feature = "fmt")]
    pub fn writer<W>(make_writer: W) -> Self
    where
        W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
    {
        Self::writer_at(make_writer, tracing::Level::INFO)
    }

    /// Plain text lines at `level` and above
    #[cfg(feature = "fmt")]
    pub fn writer_at<W>(make_writer: W, level: tracing::Level) -> Self
    where
        W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_max_level(level)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();
        Self::new(subscriber)
    }

    #[cfg(feature = "fmt")]
    pub fn stderr() -> Self {
        Self::writer(std::io::stderr)
    }

    pub fn is_discarding(&self) -> bool {
        self.dispatch.is::<NoSubscriber>()
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the thread's default dispatcher
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::discard()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("discarding", &self.is_discarding())
            .finish()
    }
}

impl Component for Logger {}
