//! Binder error types

use thiserror::Error;

/// Boxed error returned by lifecycle hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while registering items with a [`Binder`](crate::Binder)
#[derive(Debug, Error)]
pub enum BindError {
    /// The absent value was registered
    #[error("cannot bind nil value")]
    NilValue,

    /// A plain value was registered instead of a handle
    #[error("cannot bind non-pointer type {type_name}, all items must be pointers")]
    NotPointer { type_name: &'static str },

    /// A typed handle was registered but holds nothing
    #[error("cannot bind nil pointer of type {type_name}")]
    NilPointer { type_name: &'static str },

    /// The item's startup hook failed; the item was not registered
    #[error("startup failed for {type_name}: {source}")]
    Startup {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },
}

impl BindError {
    /// Wrap a startup hook failure for the given item type
    pub fn startup(type_name: &'static str, source: BoxError) -> Self {
        Self::Startup { type_name, source }
    }
}

pub type BindResult<T> = Result<T, BindError>;
