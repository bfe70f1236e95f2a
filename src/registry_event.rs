/// Events emitted by a [`ServiceRegistry`](crate::ServiceRegistry) during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use basic_ioc::RegistryEvent;
///
/// let event = RegistryEvent::Get { dependency: "dyn app::Logger", found: true };
/// assert_eq!(event.to_string(), "get { dependency: dyn app::Logger, found: true }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A dependency was bound to an implementation while building the registry.
    Bind {
        dependency: &'static str,
        implementation: &'static str,
    },

    /// An instance was requested.
    Get {
        /// The dependency type name that was requested
        dependency: &'static str,
        /// Whether the dependency is bound in the registry
        found: bool,
    },

    /// The first request for a dependency constructed its singleton.
    Construct {
        dependency: &'static str,
        implementation: &'static str,
    },

    /// A factory failed; the dependency stays uninstantiated.
    ConstructFailed {
        dependency: &'static str,
        implementation: &'static str,
    },

    /// A binding existence check was performed.
    Contains {
        dependency: &'static str,
        found: bool,
    },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Bind {
                dependency,
                implementation,
            } => write!(f, "bind {{ {dependency} => {implementation} }}"),
            RegistryEvent::Get { dependency, found } => {
                write!(f, "get {{ dependency: {dependency}, found: {found} }}")
            }
            RegistryEvent::Construct {
                dependency,
                implementation,
            } => write!(f, "construct {{ {dependency} => {implementation} }}"),
            RegistryEvent::ConstructFailed {
                dependency,
                implementation,
            } => write!(
                f,
                "construct failed {{ {dependency} => {implementation} }}"
            ),
            RegistryEvent::Contains { dependency, found } => {
                write!(f, "contains {{ dependency: {dependency}, found: {found} }}")
            }
        }
    }
}

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every [`RegistryEvent`]. It must be thread-safe because
/// the registry is shared across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;
