//! Registered item wrapper

use std::any::{type_name, Any};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::component::{AnyHandle, CapabilitySlot, Component, FieldSlot, Handle, TypeInfo};
use crate::error::{BindError, BindResult};
use crate::lifecycle::HookResult;

type BoundHook = Box<dyn Fn() -> HookResult + Send + Sync>;

/// One registered instance together with its type metadata, settable field
/// view, capabilities and lifecycle hooks.
pub struct Item {
    target: AnyHandle,
    type_info: TypeInfo,
    fields: Vec<FieldSlot>,
    capabilities: Vec<CapabilitySlot>,
    on_startup: Option<BoundHook>,
    on_shutdown: Option<BoundHook>,
}

impl Item {
    /// Wrap a handle. The handle is shared, never copied.
    pub fn new<T: Component>(target: Handle<T>) -> Self {
        let fields = T::fields()
            .into_iter()
            .map(|field| field.attach(Arc::clone(&target)))
            .collect();
        let capabilities = T::capabilities().attach(&target);
        let (startup, shutdown) = T::hooks().into_parts();

        Self {
            on_startup: startup.map(|hook| bind_hook(&target, hook)),
            on_shutdown: shutdown.map(|hook| bind_hook(&target, hook)),
            type_info: TypeInfo::of::<T>(),
            target: target as AnyHandle,
            fields,
            capabilities,
        }
    }

    /// Validate and wrap anything that can be registered
    pub fn build<B: Bindable>(instance: B) -> BindResult<Self> {
        instance.into_item()
    }

    /// The original handle, type-erased
    pub fn target(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.target
    }

    /// The registered type (the handle's pointee)
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_info == TypeInfo::of::<T>()
    }

    /// The original handle, if the registered type is `T`
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Handle<T>> {
        Arc::clone(&self.target).downcast::<RwLock<T>>().ok()
    }

    /// Whether the registered type declared capability `C`
    pub fn provides<C: ?Sized + 'static>(&self) -> bool {
        self.provides_type(TypeInfo::of::<C>())
    }

    /// The original handle viewed as capability `C`
    pub fn cast<C: ?Sized + Send + Sync + 'static>(&self) -> Option<Handle<C>> {
        let wanted = TypeInfo::of::<C>();
        self.capabilities
            .iter()
            .find(|slot| slot.provides() == wanted)
            .and_then(|slot| slot.cast().downcast::<Handle<C>>().ok())
            .map(|handle| *handle)
    }

    /// Names of the fields the binder may write, in declaration order
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.is_settable())
            .map(|field| field.name())
            .collect()
    }

    pub fn has_startup(&self) -> bool {
        self.on_startup.is_some()
    }

    pub fn has_shutdown(&self) -> bool {
        self.on_shutdown.is_some()
    }

    /// Run the startup hook if the item has one
    pub fn run_startup(&self) -> HookResult {
        match &self.on_startup {
            Some(hook) => hook(),
            None => Ok(()),
        }
    }

    /// Run the shutdown hook if the item has one
    pub fn run_shutdown(&self) -> HookResult {
        match &self.on_shutdown {
            Some(hook) => hook(),
            None => Ok(()),
        }
    }

    pub(crate) fn fields(&self) -> &[FieldSlot] {
        &self.fields
    }

    pub(crate) fn provides_type(&self, capability: TypeInfo) -> bool {
        self.capabilities
            .iter()
            .any(|slot| slot.provides() == capability)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("type", &self.type_info.name())
            .field("fields", &self.field_names())
            .field("capabilities", &self.capabilities.len())
            .field("startup", &self.has_startup())
            .field("shutdown", &self.has_shutdown())
            .finish()
    }
}

fn bind_hook<T: Component>(target: &Handle<T>, hook: fn(&mut T) -> HookResult) -> BoundHook {
    let target = Arc::clone(target);
    Box::new(move || {
        let mut component = target.write().unwrap_or_else(PoisonError::into_inner);
        hook(&mut *component)
    })
}

/// Anything that may be passed to [`Binder::add`](crate::Binder::add).
///
/// Only handles produce an [`Item`]; the other implementations exist so that
/// absent and plain values are rejected with a descriptive error.
pub trait Bindable {
    fn into_item(self) -> BindResult<Item>;
}

impl<T: Component> Bindable for Handle<T> {
    fn into_item(self) -> BindResult<Item> {
        Ok(Item::new(self))
    }
}

impl<T: Component> Bindable for &Handle<T> {
    fn into_item(self) -> BindResult<Item> {
        Ok(Item::new(Arc::clone(self)))
    }
}

impl<T: Component> Bindable for Option<Handle<T>> {
    fn into_item(self) -> BindResult<Item> {
        match self {
            Some(target) => Ok(Item::new(target)),
            None => Err(BindError::NilPointer {
                type_name: type_name::<T>(),
            }),
        }
    }
}

/// The absent value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nil;

impl Bindable for Nil {
    fn into_item(self) -> BindResult<Item> {
        Err(BindError::NilValue)
    }
}

impl Bindable for () {
    fn into_item(self) -> BindResult<Item> {
        Err(BindError::NilValue)
    }
}

macro_rules! plain_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Bindable for $ty {
                fn into_item(self) -> BindResult<Item> {
                    Err(BindError::NotPointer {
                        type_name: type_name::<$ty>(),
                    })
                }
            }
        )*
    };
}

plain_values!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
    &'static str,
);

impl<T: 'static> Bindable for Vec<T> {
    fn into_item(self) -> BindResult<Item> {
        Err(BindError::NotPointer {
            type_name: type_name::<Vec<T>>(),
        })
    }
}

/// A validated (or rejected) instance waiting to be registered
#[derive(Debug)]
pub struct Entry(BindResult<Item>);

impl Entry {
    pub fn new<B: Bindable>(instance: B) -> Self {
        Self(instance.into_item())
    }

    pub(crate) fn into_item(self) -> BindResult<Item> {
        self.0
    }
}

/// Collect heterogeneous instances for [`Binder::add`](crate::Binder::add).
///
/// ```rust
/// use bind::{handle, items, Binder};
///
/// let mut binder = Binder::new();
/// let port = handle(8080_u16);
/// let name = handle(String::from("api"));
/// binder.add(items![port.clone(), name.clone()]).unwrap();
/// assert_eq!(binder.len(), 2);
/// ```
#[macro_export]
macro_rules! items {
    () => {
        ::std::vec::Vec::<$crate::Entry>::new()
    };
    ($($instance:expr),+ $(,)?) => {
        ::std::vec![$($crate::Entry::new($instance)),+]
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::component::handle;
    use crate::lifecycle::{Hooks, Shutdown, Startup};
    use crate::Logger;

    #[derive(Default)]
    struct LifecycleTest {
        err: Option<String>,
    }

    impl LifecycleTest {
        fn take_error(&mut self) -> HookResult {
            match self.err.take() {
                Some(message) => Err(message.into()),
                None => Ok(()),
            }
        }
    }

    impl Startup for LifecycleTest {
        fn startup(&mut self) -> HookResult {
            self.take_error()
        }
    }

    impl Shutdown for LifecycleTest {
        fn shutdown(&mut self) -> HookResult {
            self.take_error()
        }
    }

    impl Component for LifecycleTest {
        fn hooks() -> Hooks<Self> {
            Hooks::new().with_startup().with_shutdown()
        }
    }

    #[test]
    fn test_build_item() {
        let err = Item::build(()).unwrap_err();
        assert!(err.to_string().contains("cannot bind nil value"));

        let err = Item::build(Nil).unwrap_err();
        assert!(matches!(err, BindError::NilValue));

        let err = Item::build(0_i32).unwrap_err();
        assert!(err
            .to_string()
            .contains("cannot bind non-pointer type i32, all items must be pointers"));

        let nil: Option<Handle<LifecycleTest>> = None;
        let err = Item::build(nil).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("cannot bind nil pointer of type"));
        assert!(message.contains("LifecycleTest"));

        let target = handle(LifecycleTest::default());
        let item = Item::build(Arc::clone(&target)).unwrap();
        assert!(item.is::<LifecycleTest>());
        assert_eq!(item.type_info(), TypeInfo::of::<LifecycleTest>());
        assert!(Arc::ptr_eq(&item.downcast::<LifecycleTest>().unwrap(), &target));
        assert!(item.downcast::<Logger>().is_none());
    }

    #[test]
    fn test_plain_values_rejected() {
        let err = Item::build(String::from("db")).unwrap_err();
        assert!(err.to_string().contains("non-pointer type alloc::string::String"));

        let err = Item::build(vec![1_u8]).unwrap_err();
        assert!(matches!(err, BindError::NotPointer { .. }));

        let err = Item::build("literal").unwrap_err();
        assert!(err.to_string().contains("non-pointer type &str"));
    }

    #[test]
    fn test_lifecycle() {
        let target = handle(LifecycleTest {
            err: Some("startup error".to_string()),
        });
        let item = Item::new(Arc::clone(&target));
        assert!(item.has_startup());
        assert!(item.has_shutdown());

        let err = item.run_startup().unwrap_err();
        assert!(err.to_string().contains("startup error"));
        assert!(item.run_startup().is_ok());

        target.write().unwrap().err = Some("shutdown error".to_string());
        let err = item.run_shutdown().unwrap_err();
        assert!(err.to_string().contains("shutdown error"));
        assert!(item.run_shutdown().is_ok());
        assert!(item.run_shutdown().is_ok());

        let item = Item::new(handle(Logger::discard()));
        assert!(!item.has_startup());
        assert!(!item.has_shutdown());
        assert!(item.run_startup().is_ok());
        assert!(item.run_shutdown().is_ok());
    }

    #[test]
    fn test_hook_sees_shared_state() {
        struct Journal {
            lines: Arc<Mutex<Vec<&'static str>>>,
        }

        impl Startup for Journal {
            fn startup(&mut self) -> HookResult {
                self.lines.lock().unwrap().push("started");
                Ok(())
            }
        }

        impl Component for Journal {
            fn hooks() -> Hooks<Self> {
                Hooks::new().with_startup()
            }
        }

        let lines = Arc::new(Mutex::new(Vec::new()));
        let item = Item::new(handle(Journal {
            lines: Arc::clone(&lines),
        }));
        item.run_startup().unwrap();
        item.run_startup().unwrap();
        assert!(item.run_shutdown().is_ok());

        assert_eq!(*lines.lock().unwrap(), ["started", "started"]);
    }

    #[test]
    fn test_entry_defers_error() {
        let entry = Entry::new(None::<Handle<u32>>);
        assert!(matches!(
            entry.into_item(),
            Err(BindError::NilPointer { type_name: "u32" })
        ));
    }
}
