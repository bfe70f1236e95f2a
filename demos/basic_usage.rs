//! Basic usage example for basic-ioc.
//!
//! Demonstrates:
//! - Binding trait contracts to concrete implementations at startup
//! - Lazy, once-only construction on first request
//! - Handing the registry to components explicitly
//! - Handling unregistered dependencies and failing constructors
//!
//! Run with: `cargo run --example basic_usage`

use basic_ioc::{bind, ErrorKind, RegistryBuilder, RegistryError, ServiceRegistry};
use std::sync::Arc;

// =============================================================================
// Contract Definitions (Traits)
// =============================================================================

trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn name(&self) -> &str;
}

trait Notifier: Send + Sync {
    fn notify(&self, recipient: &str, message: &str);
}

trait Metrics: Send + Sync {}

// =============================================================================
// Concrete Implementations
// =============================================================================

struct ConsoleLogger;

impl Default for ConsoleLogger {
    fn default() -> Self {
        println!("   (constructing ConsoleLogger)");
        ConsoleLogger
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("   [CONSOLE] {}", message);
    }

    fn name(&self) -> &str {
        "ConsoleLogger"
    }
}

struct EmailNotifier {
    smtp_server: String,
}

impl EmailNotifier {
    fn connect() -> Result<Self, std::io::Error> {
        std::env::var("SMTP_SERVER")
            .map(|smtp_server| EmailNotifier { smtp_server })
            .map_err(|_| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "SMTP_SERVER is not set")
            })
    }
}

impl Notifier for EmailNotifier {
    fn notify(&self, recipient: &str, message: &str) {
        println!("   [EMAIL via {}] To: {} - {}", self.smtp_server, recipient, message);
    }
}

// =============================================================================
// A consumer that receives the registry explicitly
// =============================================================================

struct OrderService {
    registry: Arc<ServiceRegistry>,
}

impl OrderService {
    fn place(&self, order: u32) -> Result<(), RegistryError> {
        let logger = self.registry.get_instance::<dyn Logger>()?;
        logger.log(&format!("placed order #{}", order));
        Ok(())
    }
}

fn main() -> Result<(), RegistryError> {
    tracing_subscriber::fmt()
        .with_env_filter("basic_ioc=debug")
        .init();

    println!("=== basic-ioc: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Bind contracts once at startup
    // -------------------------------------------------------------------------
    println!("1. Binding dependencies...");

    let mut builder = RegistryBuilder::new();
    bind!(builder, dyn Logger => ConsoleLogger)?;
    bind!(builder, dyn Notifier => EmailNotifier, EmailNotifier::connect)?;
    let registry = Arc::new(builder.build());

    for (dependency, implementation) in registry.bindings() {
        println!("   {} => {}", dependency, implementation);
    }

    // -------------------------------------------------------------------------
    // 2. First request constructs, later requests reuse
    // -------------------------------------------------------------------------
    println!("\n2. Requesting the logger twice...");

    let first = registry.get_instance::<dyn Logger>()?;
    let second = registry.get_instance::<dyn Logger>()?;
    println!("   {} shared: {}", first.name(), Arc::ptr_eq(&first, &second));

    // -------------------------------------------------------------------------
    // 3. Components locate their dependencies through the registry they were given
    // -------------------------------------------------------------------------
    println!("\n3. Using a component...");

    let orders = OrderService {
        registry: registry.clone(),
    };
    orders.place(42)?;

    // -------------------------------------------------------------------------
    // 4. Errors
    // -------------------------------------------------------------------------
    println!("\n4. Handling errors...");

    match registry.get_instance::<dyn Metrics>() {
        Err(err) if err.kind() == ErrorKind::Configuration => println!("   configuration: {}", err),
        Err(err) => return Err(err),
        Ok(_) => unreachable!("Metrics is never bound"),
    }

    match registry.get_instance::<dyn Notifier>() {
        Ok(notifier) => notifier.notify("ops@example.com", "deployed"),
        Err(err) => println!("   instantiation: {}", err),
    }
    println!(
        "   notifier instantiated: {}",
        registry.is_instantiated::<dyn Notifier>()
    );

    println!("\n=== Example completed ===");
    Ok(())
}
