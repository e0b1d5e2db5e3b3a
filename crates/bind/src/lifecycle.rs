//! Lifecycle capabilities
//!
//! A component opts into lifecycle management by implementing [`Startup`]
//! and/or [`Shutdown`] and announcing them through [`Component::hooks`]:
//!
//! ```rust
//! use bind::{Component, HookResult, Hooks, Shutdown, Startup};
//!
//! #[derive(Default)]
//! struct Pool {
//!     open: bool,
//! }
//!
//! impl Startup for Pool {
//!     fn startup(&mut self) -> HookResult {
//!         self.open = true;
//!         Ok(())
//!     }
//! }
//!
//! impl Shutdown for Pool {
//!     fn shutdown(&mut self) -> HookResult {
//!         self.open = false;
//!         Ok(())
//!     }
//! }
//!
//! impl Component for Pool {
//!     fn hooks() -> Hooks<Self> {
//!         Hooks::new().with_startup().with_shutdown()
//!     }
//! }
//! ```
//!
//! [`Component::hooks`]: crate::Component::hooks

use crate::error::BoxError;

/// Result returned by lifecycle hooks
pub type HookResult = Result<(), BoxError>;

/// Implemented by items that need initialization after their fields are bound.
///
/// Called once, synchronously, when the item is added to the binder. An error
/// aborts the registration of that item.
pub trait Startup {
    fn startup(&mut self) -> HookResult;
}

/// Implemented by items that need cleanup during shutdown.
///
/// Called once per registered item, in reverse registration order, when
/// [`Binder::shutdown`](crate::Binder::shutdown) runs. Errors are logged.
pub trait Shutdown {
    fn shutdown(&mut self) -> HookResult;
}

/// Hook function invoked with exclusive access to the component
pub type HookFn<T> = fn(&mut T) -> HookResult;

/// The lifecycle hooks a component type provides.
///
/// Filled once per type; the binder never probes for capabilities again.
pub struct Hooks<T> {
    startup: Option<HookFn<T>>,
    shutdown: Option<HookFn<T>>,
}

impl<T> Hooks<T> {
    /// No hooks
    pub fn new() -> Self {
        Self {
            startup: None,
            shutdown: None,
        }
    }

    /// Run [`Startup::startup`] when the component is added
    pub fn with_startup(mut self) -> Self
    where
        T: Startup,
    {
        self.startup = Some(<T as Startup>::startup);
        self
    }

    /// Run [`Shutdown::shutdown`] when the binder shuts down
    pub fn with_shutdown(mut self) -> Self
    where
        T: Shutdown,
    {
        self.shutdown = Some(<T as Shutdown>::shutdown);
        self
    }

    pub(crate) fn into_parts(self) -> (Option<HookFn<T>>, Option<HookFn<T>>) {
        (self.startup, self.shutdown)
    }
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self::new()
    }
}
