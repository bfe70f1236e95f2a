use thiserror::Error;

/// Boxed error returned by fallible factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Broad classification of a [`RegistryError`].
///
/// Both kinds are fatal to the call that produced them. The registry never
/// retries or substitutes a default instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The registry (or its declarative configuration) does not describe the
    /// requested dependency correctly.
    Configuration,
    /// A bound factory failed to produce an instance.
    Instantiation,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no implementation registered for {type_name}")]
    NotRegistered { type_name: &'static str },

    #[error("{type_name} is already bound to {implementation}")]
    DuplicateBinding {
        type_name: String,
        implementation: String,
    },

    #[error("`{implementation}` is already offered for `{dependency}` ({type_name})")]
    DuplicateOffer {
        dependency: &'static str,
        implementation: &'static str,
        type_name: &'static str,
    },

    #[error("`{dependency}` is offered for {offered}, not {requested}")]
    OfferTypeMismatch {
        dependency: &'static str,
        offered: &'static str,
        requested: &'static str,
    },

    #[error("{type_name} was requested again while it was being constructed")]
    CircularDependency { type_name: &'static str },

    #[error("no dependency named `{dependency}` is offered by the catalog")]
    UnknownDependency { dependency: String },

    #[error("no implementation named `{implementation}` is offered for `{dependency}`")]
    UnknownImplementation {
        dependency: String,
        implementation: String,
    },

    #[error("type mismatch in registry for {type_name}")]
    TypeMismatch { type_name: &'static str },

    #[error("invalid binding configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("failed to read binding configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to instantiate {implementation} for {type_name}: {source}")]
    Instantiation {
        type_name: &'static str,
        implementation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::Instantiation { .. } => ErrorKind::Instantiation,
            _ => ErrorKind::Configuration,
        }
    }
}
