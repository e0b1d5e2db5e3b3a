//! Component descriptors
//!
//! The binder never inspects memory layouts. Instead each registrable type
//! implements [`Component`] and describes, once per type:
//!
//! - its settable fields, in declaration order ([`Field`]),
//! - the capability sets (trait objects) it can be viewed as ([`Capabilities`]),
//! - its lifecycle hooks ([`Hooks`]).
//!
//! Every method has an empty default, so leaf types only need `impl Component for T {}`.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::item::Item;
use crate::lifecycle::Hooks;

/// Shared handle to a registered instance.
///
/// This is the only form the binder accepts: callers keep a clone, the binder
/// keeps another, and both observe the same value.
pub type Handle<T> = Arc<RwLock<T>>;

/// Wrap a value into a new [`Handle`]
pub fn handle<T>(value: T) -> Handle<T> {
    Arc::new(RwLock::new(value))
}

/// Type-erased handle as stored by the binder
pub(crate) type AnyHandle = Arc<dyn Any + Send + Sync>;

/// Describes how the binder may wire and drive a type.
pub trait Component: Sized + Send + Sync + 'static {
    /// Fields the binder may fill, in declaration order
    fn fields() -> Vec<Field<Self>> {
        Vec::new()
    }

    /// Capability sets this type satisfies
    fn capabilities() -> Capabilities<Self> {
        Capabilities::new()
    }

    /// Lifecycle hooks this type implements
    fn hooks() -> Hooks<Self> {
        Hooks::new()
    }
}

/// Runtime identity of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declared shape of a field, which decides the matching rule that applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `Handle<A>`: takes a registered `A` handle as is
    Handle,
    /// Plain `A`: takes a copy of a registered `A`
    Value,
    /// `Handle<dyn C>`: takes any registered type providing capability `C`
    Capability,
}

type Assign<T> = Box<dyn Fn(&mut T, &Item) -> bool + Send + Sync>;

/// A settable field of component `T`
pub struct Field<T> {
    name: &'static str,
    kind: FieldKind,
    wants: TypeInfo,
    settable: bool,
    assign: Assign<T>,
}

impl<T: Component> Field<T> {
    /// A `Handle<A>` field
    pub fn handle<A>(name: &'static str, set: fn(&mut T, Handle<A>)) -> Self
    where
        A: Send + Sync + 'static,
    {
        Self {
            name,
            kind: FieldKind::Handle,
            wants: TypeInfo::of::<A>(),
            settable: true,
            assign: Box::new(move |component: &mut T, dep: &Item| match dep.downcast::<A>() {
                Some(dep) => {
                    set(component, dep);
                    true
                }
                None => false,
            }),
        }
    }

    /// A plain `A` field, filled with a clone of the registered value
    pub fn value<A>(name: &'static str, set: fn(&mut T, A)) -> Self
    where
        A: Clone + Send + Sync + 'static,
    {
        Self {
            name,
            kind: FieldKind::Value,
            wants: TypeInfo::of::<A>(),
            settable: true,
            assign: Box::new(move |component: &mut T, dep: &Item| match dep.downcast::<A>() {
                Some(dep) => {
                    let value = dep.read().unwrap_or_else(PoisonError::into_inner).clone();
                    set(component, value);
                    true
                }
                None => false,
            }),
        }
    }

    /// A `Handle<C>` field where `C` is a trait object type such as `dyn Store`
    pub fn capability<C>(name: &'static str, set: fn(&mut T, Handle<C>)) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        Self {
            name,
            kind: FieldKind::Capability,
            wants: TypeInfo::of::<C>(),
            settable: true,
            assign: Box::new(move |component: &mut T, dep: &Item| match dep.cast::<C>() {
                Some(dep) => {
                    set(component, dep);
                    true
                }
                None => false,
            }),
        }
    }

    /// Mark the field as not externally settable; the binder will never write it
    pub fn private(mut self) -> Self {
        self.settable = false;
        self
    }

    pub(crate) fn attach(self, target: Handle<T>) -> FieldSlot {
        let assign = self.assign;
        FieldSlot {
            name: self.name,
            kind: self.kind,
            wants: self.wants,
            settable: self.settable,
            assign: Box::new(move |dep: &Item| {
                let mut component = target.write().unwrap_or_else(PoisonError::into_inner);
                assign(&mut *component, dep)
            }),
        }
    }
}

impl<T> Field<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The declared type: `A` for handle and value fields, `dyn C` for capabilities
    pub fn wants(&self) -> TypeInfo {
        self.wants
    }

    pub fn is_settable(&self) -> bool {
        self.settable
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("wants", &self.wants.name)
            .field("settable", &self.settable)
            .finish()
    }
}

/// A field attached to one registered instance
pub(crate) struct FieldSlot {
    name: &'static str,
    kind: FieldKind,
    wants: TypeInfo,
    settable: bool,
    assign: Box<dyn Fn(&Item) -> bool + Send + Sync>,
}

impl FieldSlot {
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn kind(&self) -> FieldKind {
        self.kind
    }

    pub(crate) fn wants(&self) -> TypeInfo {
        self.wants
    }

    pub(crate) fn is_settable(&self) -> bool {
        self.settable
    }

    /// Write `dep` into the field. Returns false if `dep` has the wrong shape.
    pub(crate) fn assign(&self, dep: &Item) -> bool {
        (self.assign)(dep)
    }
}

type Cast<T> = Box<dyn Fn(Handle<T>) -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// The capability sets a component type satisfies.
///
/// ```rust
/// use bind::{Capabilities, Component};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// impl Component for English {
///     fn capabilities() -> Capabilities<Self> {
///         Capabilities::new().with::<dyn Greeter>(|h| h)
///     }
/// }
/// ```
pub struct Capabilities<T> {
    casts: Vec<(TypeInfo, Cast<T>)>,
}

impl<T: Send + Sync + 'static> Capabilities<T> {
    pub fn new() -> Self {
        Self { casts: Vec::new() }
    }

    /// Declare that `T` can be viewed as `C`. `cast` is normally `|h| h`.
    pub fn with<C>(mut self, cast: fn(Handle<T>) -> Handle<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let cast: Cast<T> =
            Box::new(move |target: Handle<T>| Box::new(cast(target)) as Box<dyn Any + Send + Sync>);
        self.casts.push((TypeInfo::of::<C>(), cast));
        self
    }

    pub fn len(&self) -> usize {
        self.casts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.casts.is_empty()
    }

    pub(crate) fn attach(self, target: &Handle<T>) -> Vec<CapabilitySlot> {
        self.casts
            .into_iter()
            .map(|(provides, cast)| {
                let target = Arc::clone(target);
                CapabilitySlot {
                    provides,
                    cast: Box::new(move || cast(Arc::clone(&target))),
                }
            })
            .collect()
    }
}

impl<T: Send + Sync + 'static> Default for Capabilities<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A capability attached to one registered instance
pub(crate) struct CapabilitySlot {
    provides: TypeInfo,
    cast: Box<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>,
}

impl CapabilitySlot {
    pub(crate) fn provides(&self) -> TypeInfo {
        self.provides
    }

    /// The upcast handle, boxed as `Handle<C>`
    pub(crate) fn cast(&self) -> Box<dyn Any + Send + Sync> {
        (self.cast)()
    }
}

macro_rules! leaf_components {
    ($($ty:ty),* $(,)?) => {
        $(impl Component for $ty {})*
    };
}

leaf_components!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);

impl<T: Send + Sync + 'static> Component for Vec<T> {}

impl<K, V, S> Component for HashMap<K, V, S>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
}

impl<K, V> Component for BTreeMap<K, V>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
}
