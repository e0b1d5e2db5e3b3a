//! The binder: registration, field wiring and ordered lifecycle

use std::fmt;
use std::sync::PoisonError;

use tracing::{debug, error, info};

use crate::component::{FieldKind, FieldSlot};
use crate::error::{BindError, BindResult};
use crate::item::{Bindable, Entry, Item};
use crate::logger::Logger;

/// How a field was matched to an earlier item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// The field holds a handle of exactly the registered type
    Exact,
    /// The field holds a plain value; it receives a copy of the registered value
    Dereferenced,
    /// The field holds a capability the registered type provides
    Capability,
}

impl MatchRule {
    fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Dereferenced => "dereferenced",
            Self::Capability => "capability",
        }
    }
}

/// Dependency injection container with lifecycle management.
///
/// Items are registered as handles. Each new item's settable fields are
/// filled from items registered before it, then its startup hook runs.
/// [`shutdown`](Binder::shutdown) runs shutdown hooks in reverse order.
pub struct Binder {
    logger: Logger,
    items: Vec<Item>,
}

impl Binder {
    /// Create an empty binder whose logger discards output.
    ///
    /// Replace the logger by adding a `Handle<Logger>`.
    pub fn new() -> Self {
        Self::with_logger(Logger::discard())
    }

    pub fn with_logger(logger: Logger) -> Self {
        Self {
            logger,
            items: Vec::new(),
        }
    }

    /// Register items in order, stopping at the first failure.
    ///
    /// Items before the failing one stay registered, items after it are
    /// never looked at.
    pub fn add<I>(&mut self, entries: I) -> BindResult<()>
    where
        I: IntoIterator<Item = Entry>,
    {
        for entry in entries {
            self.register(entry.into_item()?)?;
        }
        Ok(())
    }

    /// Register a single item
    pub fn add_one<B: Bindable>(&mut self, instance: B) -> BindResult<()> {
        self.register(instance.into_item()?)
    }

    /// Run every shutdown hook, last registered first, then forget all items.
    ///
    /// Failures are logged and do not stop the remaining hooks.
    pub fn shutdown(&mut self) {
        for item in self.items.iter().rev() {
            let name = item.type_info().name();
            if item.has_shutdown() {
                self.logger.in_scope(|| info!(item = name, "shutting down"));
            }
            if let Err(err) = item.run_shutdown() {
                self.logger
                    .in_scope(|| error!(item = name, error = %err, "shutdown error"));
            }
        }
        self.items.clear();
    }

    /// Number of registered items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an item of type `T` is registered
    pub fn contains<T: 'static>(&self) -> bool {
        self.items.iter().any(Item::is::<T>)
    }

    /// Registered type names, in registration order
    pub fn type_names(&self) -> Vec<&'static str> {
        self.items
            .iter()
            .map(|item| item.type_info().name())
            .collect()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    fn register(&mut self, item: Item) -> BindResult<()> {
        if let Some(logger) = item.downcast::<Logger>() {
            self.logger = logger.read().unwrap_or_else(PoisonError::into_inner).clone();
            self.logger.in_scope(|| debug!("logger replaced"));
        }

        for field in item.fields() {
            self.bind_field(&item, field);
        }

        let name = item.type_info().name();
        if item.has_startup() {
            self.logger.in_scope(|| info!(item = name, "starting"));
        }
        item.run_startup()
            .map_err(|source| BindError::startup(name, source))?;

        self.items.push(item);
        Ok(())
    }

    fn bind_field(&self, item: &Item, field: &FieldSlot) {
        if !field.is_settable() {
            return;
        }

        for dep in &self.items {
            let Some(rule) = match_rule(field, dep) else {
                continue;
            };
            if field.assign(dep) {
                self.logger.in_scope(|| {
                    debug!(
                        item = item.type_info().name(),
                        field = field.name(),
                        dependency = dep.type_info().name(),
                        rule = rule.as_str(),
                        "bound field"
                    )
                });
                break;
            }
        }
    }
}

/// Decide whether `dep` satisfies `field`, and by which rule
fn match_rule(field: &FieldSlot, dep: &Item) -> Option<MatchRule> {
    let wants = field.wants();
    match field.kind() {
        FieldKind::Handle if dep.type_info() == wants => Some(MatchRule::Exact),
        FieldKind::Value if dep.type_info() == wants => Some(MatchRule::Dereferenced),
        FieldKind::Capability if dep.provides_type(wants) => Some(MatchRule::Capability),
        _ => None,
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("logger", &self.logger)
            .field("items", &self.items)
            .finish()
    }
}

/// Builder pattern for configuring a binder
pub struct BinderBuilder {
    binder: Binder,
}

impl BinderBuilder {
    pub fn new() -> Self {
        Self {
            binder: Binder::new(),
        }
    }

    /// Start with `logger` instead of the discarding one
    pub fn logger(mut self, logger: Logger) -> Self {
        self.binder.logger = logger;
        self
    }

    /// Register items
    pub fn add<I>(mut self, entries: I) -> BindResult<Self>
    where
        I: IntoIterator<Item = Entry>,
    {
        self.binder.add(entries)?;
        Ok(self)
    }

    /// Build the binder
    pub fn build(self) -> Binder {
        self.binder
    }
}

impl Default for BinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
