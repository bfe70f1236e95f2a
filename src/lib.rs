//! # basic-ioc
//!
//! A thread-safe service locator mapping interface types to lazily constructed singletons.
//!
//! Dependencies are identified by type, usually a trait object such as `dyn Logger`.
//! Each dependency is bound once, at startup, to a concrete implementation. The first
//! request for a dependency constructs its implementation; every later request returns
//! that same instance.
//!
//! ## Quick Start
//!
//! ```rust
//! use basic_ioc::{bind, RegistryBuilder};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn name(&self) -> &'static str;
//! }
//!
//! #[derive(Default)]
//! struct ConsoleLogger;
//!
//! impl Logger for ConsoleLogger {
//!     fn name(&self) -> &'static str {
//!         "console"
//!     }
//! }
//!
//! // Bind the dependency once at startup
//! let mut builder = RegistryBuilder::new();
//! bind!(builder, dyn Logger => ConsoleLogger).unwrap();
//! let registry = Arc::new(builder.build());
//!
//! // Every request yields the same singleton
//! let first: Arc<dyn Logger> = registry.get_instance().unwrap();
//! let second: Arc<dyn Logger> = registry.get_instance().unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! ```
//!
//! ## Features
//!
//! - **Thread-safe**: At most one construction per dependency, even under concurrent first access
//! - **Fail fast**: Duplicate bindings are rejected while building
//! - **No poisoned cache**: A failed construction caches nothing and can be retried
//! - **Configurable**: Pick implementations from a [`Catalog`] with a TOML [`BindingConfig`]
//! - **Tracing support**: `tracing` diagnostics plus an optional per-registry event callback
//!
//! ## Main Types
//!
//! - [`RegistryBuilder`] - Bind dependencies (see also [`bind!`])
//! - [`ServiceRegistry`] - Resolve singletons with [`ServiceRegistry::get_instance`]
//! - [`Catalog`] / [`BindingConfig`] - Declarative selection of implementations
//!   (see also [`offer!`])
//! - [`RegistryError`] - Failures, classified by [`ErrorKind`]
//! - [`RegistryEvent`] - Events passed to the trace callback

mod binding;
mod builder;
mod catalog;
mod config;
mod macros;
mod registry;
mod registry_error;
mod registry_event;

pub use builder::RegistryBuilder;
pub use catalog::Catalog;
pub use config::BindingConfig;
pub use registry::ServiceRegistry;
pub use registry_error::{BoxError, ErrorKind, RegistryError};
pub use registry_event::{RegistryEvent, TraceCallback};
