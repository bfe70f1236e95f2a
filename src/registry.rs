//! The service registry: a fixed dependency mapping plus a lazily filled
//! singleton cache.
//!
//! A registry is built once at startup by a [`RegistryBuilder`](crate::RegistryBuilder)
//! and then shared with consumers, usually as `Arc<ServiceRegistry>`.
//!
//! # Examples
//!
//! ```
//! use basic_ioc::{bind, ErrorKind, RegistryBuilder};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, line: &str) -> String;
//! }
//!
//! #[derive(Default)]
//! struct ConsoleLogger;
//!
//! impl Logger for ConsoleLogger {
//!     fn log(&self, line: &str) -> String {
//!         format!("[console] {line}")
//!     }
//! }
//!
//! trait Mailer: Send + Sync {}
//!
//! let mut builder = RegistryBuilder::new();
//! bind!(builder, dyn Logger => ConsoleLogger).unwrap();
//! let registry = builder.build();
//!
//! let first: Arc<dyn Logger> = registry.get_instance().unwrap();
//! let second: Arc<dyn Logger> = registry.get_instance().unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//!
//! let missing = registry.get_instance::<dyn Mailer>();
//! assert_eq!(missing.err().map(|e| e.kind()), Some(ErrorKind::Configuration));
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::binding::{Binding, ResolveError};
use crate::{RegistryError, RegistryEvent, TraceCallback};

/// Maps dependency types to their implementations and caches one instance
/// per dependency.
///
/// The set of bindings never changes after construction. Each dependency is
/// constructed at most once, on its first successful [`get_instance`](Self::get_instance),
/// even when that first request happens on several threads at once.
pub struct ServiceRegistry {
    bindings: HashMap<TypeId, Binding>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl ServiceRegistry {
    pub(crate) fn new(
        bindings: HashMap<TypeId, Binding>,
        trace: Option<Arc<TraceCallback>>,
    ) -> Self {
        ServiceRegistry {
            bindings,
            trace: Mutex::new(trace),
        }
    }

    /// Shorthand for [`RegistryBuilder::new`](crate::RegistryBuilder::new).
    pub fn builder() -> crate::RegistryBuilder {
        crate::RegistryBuilder::new()
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked after the operation has released every
    /// internal lock, so it may call back into this registry.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------------------------------

    /// Return the singleton bound to dependency `T`, constructing it on the
    /// first request.
    ///
    /// Every successful call for the same `T` returns the same instance
    /// (`Arc::ptr_eq` holds between them).
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotRegistered`] if `T` has no binding.
    /// - [`RegistryError::Instantiation`] if the factory failed. Nothing is
    ///   cached, so a later call tries the factory again.
    /// - [`RegistryError::CircularDependency`] if `T` is requested from inside
    ///   its own factory, directly or through other dependencies.
    pub fn get_instance<T>(&self) -> Result<Arc<T>, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let dependency = std::any::type_name::<T>();

        let Some(binding) = self.bindings.get(&TypeId::of::<T>()) else {
            tracing::debug!(dependency, "no implementation registered");
            self.emit_event(&RegistryEvent::Get {
                dependency,
                found: false,
            });
            return Err(RegistryError::NotRegistered {
                type_name: dependency,
            });
        };

        self.emit_event(&RegistryEvent::Get {
            dependency,
            found: true,
        });

        let implementation = binding.implementation;
        let (instance, constructed) = match binding.resolve() {
            Ok(resolved) => resolved,
            Err(ResolveError::Reentrant) => {
                tracing::warn!(
                    dependency,
                    implementation,
                    "dependency requested again while it was being constructed"
                );
                return Err(RegistryError::CircularDependency {
                    type_name: dependency,
                });
            }
            Err(ResolveError::Factory(source)) => {
                tracing::warn!(
                    dependency,
                    implementation,
                    error = %source,
                    "failed to construct dependency"
                );
                self.emit_event(&RegistryEvent::ConstructFailed {
                    dependency,
                    implementation,
                });
                return Err(RegistryError::Instantiation {
                    type_name: dependency,
                    implementation,
                    source,
                });
            }
        };

        if constructed {
            tracing::debug!(dependency, implementation, "constructed dependency");
            self.emit_event(&RegistryEvent::Construct {
                dependency,
                implementation,
            });
        } else {
            tracing::trace!(dependency, "returning cached dependency");
        }

        (*instance)
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(RegistryError::TypeMismatch {
                type_name: dependency,
            })
    }

    /// Check if dependency `T` has a binding.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        let found = self.bindings.contains_key(&TypeId::of::<T>());

        self.emit_event(&RegistryEvent::Contains {
            dependency: std::any::type_name::<T>(),
            found,
        });

        found
    }

    /// Check if the singleton for `T` has already been constructed.
    ///
    /// Returns `false` for unbound dependencies.
    pub fn is_instantiated<T: ?Sized + 'static>(&self) -> bool {
        self.bindings
            .get(&TypeId::of::<T>())
            .is_some_and(Binding::is_instantiated)
    }

    /// `(dependency, implementation)` name pairs, sorted by dependency.
    pub fn bindings(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs: Vec<_> = self
            .bindings
            .values()
            .map(|binding| (binding.dependency, binding.implementation))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut bound: Vec<&Binding> = self.bindings.values().collect();
        bound.sort_by_key(|binding| binding.dependency);
        f.debug_struct("ServiceRegistry")
            .field("bindings", &bound)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
