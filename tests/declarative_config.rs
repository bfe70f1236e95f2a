//! Integration tests for selecting implementations from a binding configuration.

use basic_ioc::{bind, offer, BindingConfig, Catalog, ErrorKind, RegistryBuilder, RegistryError};
use std::path::PathBuf;
use std::sync::Arc;

trait Logger: Send + Sync {
    fn get_name(&self) -> &str;
}

#[derive(Default)]
struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn get_name(&self) -> &str {
        "console"
    }
}

struct FileLogger {
    path: String,
}

impl FileLogger {
    fn open() -> Result<Self, std::io::Error> {
        Ok(FileLogger {
            path: "/var/log/app.log".to_string(),
        })
    }
}

impl Logger for FileLogger {
    fn get_name(&self) -> &str {
        &self.path
    }
}

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Default)]
struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        1
    }
}

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    offer!(catalog, "logger" => "console", dyn Logger => ConsoleLogger).unwrap();
    offer!(catalog, "logger" => "file", dyn Logger => FileLogger, FileLogger::open).unwrap();
    catalog
}

fn config_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "basic-ioc-{}-{}.toml",
        name,
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_config_file_selects_implementation() {
    let path = config_file("select", "[bindings]\nlogger = \"file\"\n");
    let config = BindingConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let registry = catalog().into_builder(&config).unwrap().build();

    let logger = registry.get_instance::<dyn Logger>().unwrap();
    assert_eq!(logger.get_name(), "/var/log/app.log");
    assert_eq!(registry.bindings().len(), 1);
    assert!(registry.bindings()[0].0.ends_with("Logger"));
    assert_eq!(registry.bindings()[0].1, "file");
}

#[test]
fn test_switching_implementation_is_configuration_only() {
    for (selection, expected) in [("console", "console"), ("file", "/var/log/app.log")] {
        let mut config = BindingConfig::default();
        config.select("logger", selection);

        let registry = catalog().into_builder(&config).unwrap().build();
        let first: Arc<dyn Logger> = registry.get_instance().unwrap();
        let second: Arc<dyn Logger> = registry.get_instance().unwrap();

        assert_eq!(first.get_name(), expected);
        assert!(Arc::ptr_eq(&first, &second));
    }
}

#[test]
fn test_mixing_code_and_config_bindings() {
    let mut builder = RegistryBuilder::new();
    bind!(builder, dyn Clock => SystemClock).unwrap();

    let config: BindingConfig = "[bindings]\nlogger = \"console\"".parse().unwrap();
    catalog().apply(&config, &mut builder).unwrap();
    let registry = builder.build();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get_instance::<dyn Clock>().unwrap().now(), 1);
    assert_eq!(registry.get_instance::<dyn Logger>().unwrap().get_name(), "console");
}

#[test]
fn test_misconfiguration_fails_at_startup() {
    let config: BindingConfig = "[bindings]\nlogger = \"syslog\"".parse().unwrap();
    let err = catalog().into_builder(&config).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(
        err.to_string(),
        "no implementation named `syslog` is offered for `logger`"
    );
}

#[test]
fn test_malformed_config_file() {
    let path = config_file("malformed", "[bindings\nlogger = \"file\"\n");
    let err = BindingConfig::from_file(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(err, RegistryError::InvalidConfig(_)));
    assert!(err.to_string().starts_with("invalid binding configuration"));
}
