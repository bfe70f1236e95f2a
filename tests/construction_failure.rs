//! Integration tests for failing factories.
//!
//! A failed construction is reported as an instantiation error, caches nothing,
//! and does not stop a later request from trying again.

use basic_ioc::{bind, BoxError, ErrorKind, RegistryBuilder, RegistryError, ServiceRegistry};
use std::error::Error as _;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, Weak};

trait Storage: Send + Sync {
    fn root(&self) -> &str;
}

struct DiskStorage {
    root: String,
}

impl Storage for DiskStorage {
    fn root(&self) -> &str {
        &self.root
    }
}

#[derive(Debug)]
struct MountError(&'static str);

impl std::fmt::Display for MountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mount failed: {}", self.0)
    }
}

impl std::error::Error for MountError {}

#[test]
fn test_failure_is_instantiation_error_with_source() {
    let mut builder = RegistryBuilder::new();
    bind!(builder, dyn Storage => DiskStorage, || {
        Err::<DiskStorage, _>(MountError("/data is read-only"))
    })
    .unwrap();
    let registry = builder.build();

    let err = registry.get_instance::<dyn Storage>().err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Instantiation);

    match &err {
        RegistryError::Instantiation {
            type_name,
            implementation,
            ..
        } => {
            assert!(type_name.ends_with("Storage"));
            assert!(implementation.ends_with("DiskStorage"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let source = err.source().unwrap();
    assert_eq!(source.to_string(), "mount failed: /data is read-only");
    assert!(source.downcast_ref::<MountError>().is_some());
}

#[test]
fn test_retry_after_corrected_environment() {
    let mounted = Arc::new(AtomicBool::new(false));
    let attempts = Arc::new(AtomicUsize::new(0));

    let mut builder = RegistryBuilder::new();
    {
        let mounted = mounted.clone();
        let attempts = attempts.clone();
        bind!(builder, dyn Storage => DiskStorage, move || {
            attempts.fetch_add(1, Ordering::SeqCst);
            if mounted.load(Ordering::SeqCst) {
                Ok(DiskStorage {
                    root: "/data".to_string(),
                })
            } else {
                Err(MountError("not mounted"))
            }
        })
        .unwrap();
    }
    let registry = builder.build();

    // Failing attempts are not short-circuited by a cached failure
    for _ in 0..3 {
        assert!(registry.get_instance::<dyn Storage>().is_err());
        assert!(!registry.is_instantiated::<dyn Storage>());
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 3);

    mounted.store(true, Ordering::SeqCst);

    let first = registry.get_instance::<dyn Storage>().unwrap();
    let second = registry.get_instance::<dyn Storage>().unwrap();
    assert_eq!(first.root(), "/data");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[test]
fn test_failure_does_not_affect_other_bindings() {
    #[derive(Default)]
    struct MemoryStorage;

    impl Storage for MemoryStorage {
        fn root(&self) -> &str {
            ":memory:"
        }
    }

    let mut builder = RegistryBuilder::new();
    bind!(builder, dyn Storage => DiskStorage, || {
        Err::<DiskStorage, _>(MountError("offline"))
    })
    .unwrap();
    bind!(builder, MemoryStorage => MemoryStorage).unwrap();
    let registry = builder.build();

    assert!(registry.get_instance::<dyn Storage>().is_err());
    assert_eq!(registry.get_instance::<MemoryStorage>().unwrap().root(), ":memory:");
}

#[test]
fn test_panicking_factory_can_be_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));

    let mut builder = RegistryBuilder::new();
    {
        let attempts = attempts.clone();
        bind!(builder, dyn Storage => DiskStorage, move || {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("driver crashed");
            }
            Ok::<_, MountError>(DiskStorage {
                root: "/recovered".to_string(),
            })
        })
        .unwrap();
    }
    let registry = Arc::new(builder.build());

    let crashing = registry.clone();
    let outcome = std::thread::spawn(move || {
        let _ = crashing.get_instance::<dyn Storage>();
    })
    .join();
    assert!(outcome.is_err());

    let storage = registry.get_instance::<dyn Storage>().unwrap();
    assert_eq!(storage.root(), "/recovered");
}

trait Index: Send + Sync {}

struct StorageIndex;

impl Index for StorageIndex {}

#[test]
fn test_dependency_cycle_fails_instead_of_hanging() {
    let handle: Arc<OnceLock<Weak<ServiceRegistry>>> = Arc::new(OnceLock::new());

    let mut builder = RegistryBuilder::new();
    {
        let handle = handle.clone();
        builder
            .bind("DiskStorage", move || -> Result<Arc<dyn Storage>, BoxError> {
                let registry = handle.get().and_then(Weak::upgrade).ok_or("registry dropped")?;
                registry.get_instance::<dyn Index>()?;
                Ok(Arc::new(DiskStorage {
                    root: "/data".to_string(),
                }))
            })
            .unwrap();
    }
    {
        let handle = handle.clone();
        builder
            .bind("StorageIndex", move || -> Result<Arc<dyn Index>, BoxError> {
                let registry = handle.get().and_then(Weak::upgrade).ok_or("registry dropped")?;
                registry.get_instance::<dyn Storage>()?;
                Ok(Arc::new(StorageIndex))
            })
            .unwrap();
    }
    let registry = Arc::new(builder.build());
    handle.set(Arc::downgrade(&registry)).unwrap();

    // Storage -> Index -> Storage: the innermost request is the one rejected.
    let err = registry.get_instance::<dyn Storage>().err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Instantiation);

    let index_err = err
        .source()
        .and_then(|source| source.downcast_ref::<RegistryError>())
        .unwrap();
    assert!(matches!(index_err, RegistryError::Instantiation { .. }));

    let cycle_err = index_err
        .source()
        .and_then(|source| source.downcast_ref::<RegistryError>())
        .unwrap();
    match cycle_err {
        RegistryError::CircularDependency { type_name } => {
            assert!(type_name.ends_with("Storage"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(cycle_err.kind(), ErrorKind::Configuration);

    assert!(!registry.is_instantiated::<dyn Storage>());
    assert!(!registry.is_instantiated::<dyn Index>());

    // The construction markers were cleared, so another thread is not blocked.
    let other = registry.clone();
    let again = std::thread::spawn(move || other.get_instance::<dyn Storage>().is_err())
        .join()
        .unwrap();
    assert!(again);
}
