//! Named candidate implementations, selected at startup by a [`BindingConfig`].
//!
//! A catalog lets an application ship several implementations of the same
//! dependency and pick one per deployment without recompiling. Only the
//! selected candidates become bindings; the rest are dropped unconstructed.

use std::any::TypeId;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::binding::Binding;
use crate::registry_error::BoxError;
use crate::{BindingConfig, RegistryBuilder, RegistryError};

struct Offer {
    type_id: TypeId,
    type_name: &'static str,
    candidates: BTreeMap<&'static str, Binding>,
}

#[derive(Default)]
pub struct Catalog {
    offers: BTreeMap<&'static str, Offer>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `factory` as implementation `implementation` of the dependency
    /// known as `dependency` in configuration files.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateOffer`] if the same pair was offered before.
    /// - [`RegistryError::OfferTypeMismatch`] if `dependency` was already offered
    ///   for a different type than `T`.
    pub fn offer<T, F, E>(
        &mut self,
        dependency: &'static str,
        implementation: &'static str,
        factory: F,
    ) -> Result<&mut Self, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let type_name = std::any::type_name::<T>();
        let offer = self.offers.entry(dependency).or_insert_with(|| Offer {
            type_id: TypeId::of::<T>(),
            type_name,
            candidates: BTreeMap::new(),
        });

        if offer.type_id != TypeId::of::<T>() {
            return Err(RegistryError::OfferTypeMismatch {
                dependency,
                offered: offer.type_name,
                requested: type_name,
            });
        }
        if offer.candidates.contains_key(implementation) {
            return Err(RegistryError::DuplicateOffer {
                dependency,
                implementation,
                type_name,
            });
        }

        offer
            .candidates
            .insert(implementation, Binding::lazy::<T, F, E>(implementation, factory));
        Ok(self)
    }

    /// Dependency keys that have at least one candidate.
    pub fn dependencies(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.offers.keys().copied()
    }

    /// Implementation keys offered for `dependency`, in sorted order.
    pub fn implementations(&self, dependency: &str) -> Vec<&'static str> {
        self.offers
            .get(dependency)
            .map(|offer| offer.candidates.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Bind every dependency named in `config` to its selected candidate.
    ///
    /// Dependencies the configuration does not mention stay unbound.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownDependency`] for a key no candidate was offered under.
    /// - [`RegistryError::UnknownImplementation`] for a selection that was not offered.
    pub fn into_builder(self, config: &BindingConfig) -> Result<RegistryBuilder, RegistryError> {
        let mut builder = RegistryBuilder::new();
        self.apply(config, &mut builder)?;
        Ok(builder)
    }

    /// Like [`into_builder`](Self::into_builder), adding to an existing builder
    /// that may already carry code-level bindings.
    ///
    /// Every selection is checked before anything is added, so on error the
    /// builder is left exactly as it was.
    ///
    /// # Errors
    ///
    /// As [`into_builder`](Self::into_builder), plus
    /// [`RegistryError::DuplicateBinding`] if a selected dependency is already
    /// bound in `builder` or selected twice under different keys.
    pub fn apply(
        mut self,
        config: &BindingConfig,
        builder: &mut RegistryBuilder,
    ) -> Result<(), RegistryError> {
        let mut selected: Vec<Binding> = Vec::with_capacity(config.bindings.len());

        for (dependency, implementation) in &config.bindings {
            let offer = self
                .offers
                .get_mut(dependency.as_str())
                .ok_or_else(|| RegistryError::UnknownDependency {
                    dependency: dependency.clone(),
                })?;

            let binding = offer
                .candidates
                .remove(implementation.as_str())
                .ok_or_else(|| RegistryError::UnknownImplementation {
                    dependency: dependency.clone(),
                    implementation: implementation.clone(),
                })?;

            builder.ensure_unbound(&binding)?;
            if let Some(earlier) = selected.iter().find(|b| b.type_id == binding.type_id) {
                return Err(RegistryError::DuplicateBinding {
                    type_name: earlier.dependency.to_string(),
                    implementation: earlier.implementation.to_string(),
                });
            }

            tracing::debug!(
                dependency = dependency.as_str(),
                implementation = implementation.as_str(),
                "selected implementation from configuration"
            );
            selected.push(binding);
        }

        for binding in selected {
            builder.insert(binding)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (dependency, offer) in &self.offers {
            map.entry(dependency, &offer.candidates.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}
