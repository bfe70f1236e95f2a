//! Macros for binding interface types to concrete implementations.
//!
//! Turning an `Arc<Concrete>` into an `Arc<dyn Trait>` is an unsizing coercion
//! that generic code cannot express on stable Rust. These macros write the
//! factory closure at the call site, where both types are known.

/// Binds a dependency type to a concrete implementation on a
/// [`RegistryBuilder`](crate::RegistryBuilder).
///
/// Evaluates to the `Result` returned by
/// [`RegistryBuilder::bind`](crate::RegistryBuilder::bind).
///
/// - `bind!(builder, dyn Trait => Concrete)` constructs with `Concrete::default()`.
/// - `bind!(builder, dyn Trait => Concrete, constructor)` constructs with a
///   fallible no-argument `constructor` returning `Result<Concrete, E>`.
///
/// # Examples
///
/// ```rust
/// use basic_ioc::{bind, ErrorKind, RegistryBuilder};
/// use std::sync::Arc;
///
/// trait Store: Send + Sync {
///     fn path(&self) -> &str;
/// }
///
/// struct DiskStore {
///     path: String,
/// }
///
/// impl DiskStore {
///     fn open() -> Result<Self, std::io::Error> {
///         Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no data dir"))
///     }
/// }
///
/// impl Store for DiskStore {
///     fn path(&self) -> &str {
///         &self.path
///     }
/// }
///
/// let mut builder = RegistryBuilder::new();
/// bind!(builder, dyn Store => DiskStore, DiskStore::open).unwrap();
/// let registry = builder.build();
///
/// let err = registry.get_instance::<dyn Store>().err().unwrap();
/// assert_eq!(err.kind(), ErrorKind::Instantiation);
/// assert!(!registry.is_instantiated::<dyn Store>());
/// ```
#[macro_export]
macro_rules! bind {
    ($builder:expr, $dependency:ty => $implementation:ty) => {
        $builder.bind::<$dependency, _, ::std::convert::Infallible>(
            ::std::any::type_name::<$implementation>(),
            || {
                let instance: ::std::sync::Arc<$dependency> = ::std::sync::Arc::new(
                    <$implementation as ::std::default::Default>::default(),
                );
                ::std::result::Result::Ok(instance)
            },
        )
    };
    ($builder:expr, $dependency:ty => $implementation:ty, $constructor:expr) => {
        {
            let constructor = $constructor;
            $builder.bind::<$dependency, _, _>(
                ::std::any::type_name::<$implementation>(),
                move || {
                    constructor().map(|concrete: $implementation| {
                        let instance: ::std::sync::Arc<$dependency> =
                            ::std::sync::Arc::new(concrete);
                        instance
                    })
                },
            )
        }
    };
}

/// Offers a concrete implementation as a named candidate on a
/// [`Catalog`](crate::Catalog).
///
/// Same construction forms as [`bind!`], prefixed by the dependency and
/// implementation keys used in a [`BindingConfig`](crate::BindingConfig).
///
/// # Examples
///
/// ```rust
/// use basic_ioc::{offer, BindingConfig, Catalog};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> &'static str;
/// }
///
/// #[derive(Default)]
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> &'static str { "hello" }
/// }
///
/// #[derive(Default)]
/// struct Czech;
/// impl Greeter for Czech {
///     fn greet(&self) -> &'static str { "ahoj" }
/// }
///
/// let mut catalog = Catalog::new();
/// offer!(catalog, "greeter" => "en", dyn Greeter => English).unwrap();
/// offer!(catalog, "greeter" => "cs", dyn Greeter => Czech).unwrap();
///
/// let config: BindingConfig = "[bindings]\ngreeter = \"cs\"".parse().unwrap();
/// let registry = catalog.into_builder(&config).unwrap().build();
///
/// let greeter: Arc<dyn Greeter> = registry.get_instance().unwrap();
/// assert_eq!(greeter.greet(), "ahoj");
/// ```
#[macro_export]
macro_rules! offer {
    ($catalog:expr, $key:literal => $name:literal, $dependency:ty => $implementation:ty) => {
        $catalog.offer::<$dependency, _, ::std::convert::Infallible>($key, $name, || {
            let instance: ::std::sync::Arc<$dependency> = ::std::sync::Arc::new(
                <$implementation as ::std::default::Default>::default(),
            );
            ::std::result::Result::Ok(instance)
        })
    };
    (
        $catalog:expr,
        $key:literal => $name:literal,
        $dependency:ty => $implementation:ty,
        $constructor:expr
    ) => {
        {
            let constructor = $constructor;
            $catalog.offer::<$dependency, _, _>($key, $name, move || {
                constructor().map(|concrete: $implementation| {
                    let instance: ::std::sync::Arc<$dependency> = ::std::sync::Arc::new(concrete);
                    instance
                })
            })
        }
    };
}
