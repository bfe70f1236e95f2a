//! A single mapping entry together with its lazily filled instance slot.
//!
//! Each binding guards its own slot with a `Mutex` that is held across the
//! check-then-construct sequence, so a dependency is constructed at most once
//! even when several threads request it for the first time simultaneously.
//! Requests for different dependencies never contend with each other.
//!
//! The thread running a factory is recorded while it runs. If that factory
//! (directly or through other dependencies) requests the same binding again,
//! the request fails with [`ResolveError::Reentrant`] instead of blocking
//! forever on the slot it already holds.

use std::any::{Any, TypeId};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use crate::registry_error::BoxError;

/// Type-erased cached instance. Always holds an `Arc<T>` for the bound `T`.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

type Factory = Box<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

#[derive(Debug)]
pub(crate) enum ResolveError {
    /// The binding was requested by the thread that is currently constructing it.
    Reentrant,
    /// The factory returned an error.
    Factory(BoxError),
}

pub(crate) struct Binding {
    pub(crate) type_id: TypeId,
    pub(crate) dependency: &'static str,
    pub(crate) implementation: &'static str,
    /// `None` for eager bindings, whose slot starts filled and is never cleared.
    factory: Option<Factory>,
    instance: Mutex<Option<Instance>>,
    constructing: Mutex<Option<ThreadId>>,
}

/// Clears the constructing marker when the factory returns or unwinds.
struct ConstructingGuard<'a>(&'a Mutex<Option<ThreadId>>);

impl Drop for ConstructingGuard<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Binding {
    /// Binding whose instance is built by `factory` on first request.
    pub(crate) fn lazy<T, F, E>(implementation: &'static str, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Binding {
            type_id: TypeId::of::<T>(),
            dependency: std::any::type_name::<T>(),
            implementation,
            factory: Some(Box::new(move || {
                let instance = factory().map_err(Into::into)?;
                Ok(Arc::new(instance) as Instance)
            })),
            instance: Mutex::new(None),
            constructing: Mutex::new(None),
        }
    }

    /// Binding that starts out instantiated with `instance`.
    pub(crate) fn eager<T>(implementation: &'static str, instance: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Binding {
            type_id: TypeId::of::<T>(),
            dependency: std::any::type_name::<T>(),
            implementation,
            factory: None,
            instance: Mutex::new(Some(Arc::new(instance) as Instance)),
            constructing: Mutex::new(None),
        }
    }

    /// Returns the cached instance, constructing it first if needed.
    ///
    /// The boolean is `true` when this call performed the construction.
    /// A failed construction leaves the slot empty so a later call retries.
    pub(crate) fn resolve(&self) -> Result<(Instance, bool), ResolveError> {
        let current = thread::current().id();
        if *self.constructing.lock().unwrap_or_else(PoisonError::into_inner) == Some(current) {
            return Err(ResolveError::Reentrant);
        }

        // A factory that panicked never wrote the slot, so the guarded value
        // is still consistent after poisoning.
        let mut slot = self.instance.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(instance) = slot.as_ref() {
            return Ok((Arc::clone(instance), false));
        }

        let Some(factory) = self.factory.as_ref() else {
            unreachable!("eager binding for {} has an empty slot", self.dependency);
        };

        *self.constructing.lock().unwrap_or_else(PoisonError::into_inner) = Some(current);
        let _constructing = ConstructingGuard(&self.constructing);

        let instance = factory().map_err(ResolveError::Factory)?;
        *slot = Some(Arc::clone(&instance));
        Ok((instance, true))
    }

    pub(crate) fn is_instantiated(&self) -> bool {
        self.instance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("dependency", &self.dependency)
            .field("implementation", &self.implementation)
            .field("instantiated", &self.is_instantiated())
            .finish()
    }
}
