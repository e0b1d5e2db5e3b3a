//! Register-and-wire Dependency Injection Container
//!
//! This crate provides a small container that wires components together by
//! type as they are registered, and drives a two-phase lifecycle: startup when
//! a component is added, shutdown in reverse registration order.
//!
//! ## Quick Start
//!
//! ```rust
//! use bind::{handle, items, Binder, Component, Field, Handle};
//!
//! #[derive(Default)]
//! struct Database {
//!     url: String,
//! }
//!
//! impl Component for Database {}
//!
//! #[derive(Default)]
//! struct UserService {
//!     db: Option<Handle<Database>>,
//! }
//!
//! impl Component for UserService {
//!     fn fields() -> Vec<Field<Self>> {
//!         vec![Field::handle("db", |s: &mut Self, db| s.db = Some(db))]
//!     }
//! }
//!
//! let db = handle(Database { url: "sqlite://memory".into() });
//! let users = handle(UserService::default());
//!
//! let mut binder = Binder::new();
//! binder.add(items![db.clone(), users.clone()]).unwrap();
//!
//! let bound = users.read().unwrap().db.clone().unwrap();
//! assert_eq!(bound.read().unwrap().url, "sqlite://memory");
//!
//! binder.shutdown();
//! ```
//!
//! ## Binding rules
//!
//! For every settable field of a new item, earlier items are scanned in
//! registration order and the first one that matches is bound:
//!
//! - a `Handle<A>` field takes a registered `A` handle ([`Field::handle`]),
//! - a plain `A` field takes a clone of a registered `A` ([`Field::value`]),
//! - a `Handle<dyn C>` field takes any registered type that declared
//!   capability `C` ([`Field::capability`], [`Capabilities::with`]).
//!
//! Private fields ([`Field::private`]) are never written. Fields with no match
//! keep their value. Binding never revisits earlier items, so registration
//! order decides what each component receives.

pub mod binder;
pub mod component;
pub mod error;
pub mod item;
pub mod lifecycle;
pub mod logger;

pub use binder::{Binder, BinderBuilder, MatchRule};
pub use component::{handle, Capabilities, Component, Field, FieldKind, Handle, TypeInfo};
pub use error::{BindError, BindResult, BoxError};
pub use item::{Bindable, Entry, Item, Nil};
pub use lifecycle::{HookResult, Hooks, Shutdown, Startup};
pub use logger::Logger;
