//! Startup-time population of the dependency mapping.
//!
//! The mapping can only be written through a [`RegistryBuilder`]. Calling
//! [`RegistryBuilder::build`] consumes the builder, so the resulting
//! [`ServiceRegistry`] has a fixed set of bindings for its whole lifetime.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::binding::Binding;
use crate::registry_error::BoxError;
use crate::{RegistryError, RegistryEvent, ServiceRegistry, TraceCallback};

/// Collects dependency bindings and produces a [`ServiceRegistry`].
///
/// # Examples
///
/// ```rust
/// use basic_ioc::{bind, RegistryBuilder};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn name(&self) -> &'static str;
/// }
///
/// #[derive(Default)]
/// struct ConsoleLogger;
///
/// impl Logger for ConsoleLogger {
///     fn name(&self) -> &'static str {
///         "console"
///     }
/// }
///
/// let mut builder = RegistryBuilder::new();
/// bind!(builder, dyn Logger => ConsoleLogger).unwrap();
/// let registry = builder.build();
///
/// let logger: Arc<dyn Logger> = registry.get_instance().unwrap();
/// assert_eq!(logger.name(), "console");
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    bindings: HashMap<TypeId, Binding>,
    trace: Option<Arc<TraceCallback>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind dependency `T` to a factory invoked on the first request for `T`.
    ///
    /// `implementation` names the concrete type for diagnostics. The factory
    /// takes no arguments; it may fail, in which case the request fails with
    /// [`RegistryError::Instantiation`] and nothing is cached.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateBinding`] if `T` is already bound.
    pub fn bind<T, F, E>(
        &mut self,
        implementation: &'static str,
        factory: F,
    ) -> Result<&mut Self, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.insert(Binding::lazy::<T, F, E>(implementation, factory))
    }

    /// Bind dependency `T` to an already constructed singleton.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateBinding`] if `T` is already bound.
    pub fn bind_instance<T>(
        &mut self,
        implementation: &'static str,
        instance: Arc<T>,
    ) -> Result<&mut Self, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.insert(Binding::eager(implementation, instance))
    }

    /// Set the trace callback the built registry starts with.
    ///
    /// The callback also receives one [`RegistryEvent::Bind`] per binding
    /// when [`build`](Self::build) runs.
    pub fn with_trace_callback(
        &mut self,
        callback: impl Fn(&RegistryEvent) + Send + Sync + 'static,
    ) -> &mut Self {
        self.trace = Some(Arc::new(callback));
        self
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Fails if the dependency of `binding` is already bound in this builder.
    pub(crate) fn ensure_unbound(&self, binding: &Binding) -> Result<(), RegistryError> {
        match self.bindings.get(&binding.type_id) {
            Some(existing) => Err(RegistryError::DuplicateBinding {
                type_name: existing.dependency.to_string(),
                implementation: existing.implementation.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn insert(&mut self, binding: Binding) -> Result<&mut Self, RegistryError> {
        self.ensure_unbound(&binding)?;

        tracing::debug!(
            dependency = binding.dependency,
            implementation = binding.implementation,
            "bound dependency"
        );

        self.bindings.insert(binding.type_id, binding);
        Ok(self)
    }

    /// Freeze the mapping into a [`ServiceRegistry`].
    pub fn build(self) -> ServiceRegistry {
        if let Some(callback) = self.trace.as_ref() {
            let mut bound: Vec<&Binding> = self.bindings.values().collect();
            bound.sort_by_key(|binding| binding.dependency);
            for binding in bound {
                callback(&RegistryEvent::Bind {
                    dependency: binding.dependency,
                    implementation: binding.implementation,
                });
            }
        }

        ServiceRegistry::new(self.bindings, self.trace)
    }
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("bindings", &self.bindings.len())
            .field("traced", &self.trace.is_some())
            .finish()
    }
}
