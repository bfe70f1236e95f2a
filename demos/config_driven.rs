//! Configuration-driven example for basic-ioc.
//!
//! Demonstrates:
//! - Offering several implementations of one contract in a `Catalog`
//! - Selecting one per deployment with a TOML `BindingConfig`
//! - Rejecting a bad selection at startup
//!
//! Run with: `cargo run --example config_driven`

use basic_ioc::{offer, BindingConfig, Catalog, RegistryError};

trait Cache: Send + Sync {
    fn describe(&self) -> String;
}

#[derive(Default)]
struct InMemoryCache;

impl Cache for InMemoryCache {
    fn describe(&self) -> String {
        "in-process LRU".to_string()
    }
}

struct RedisCache {
    url: String,
}

impl RedisCache {
    fn from_env() -> Result<Self, std::env::VarError> {
        std::env::var("REDIS_URL").map(|url| RedisCache { url })
    }
}

impl Cache for RedisCache {
    fn describe(&self) -> String {
        format!("redis at {}", self.url)
    }
}

fn catalog() -> Result<Catalog, RegistryError> {
    let mut catalog = Catalog::new();
    offer!(catalog, "cache" => "memory", dyn Cache => InMemoryCache)?;
    offer!(catalog, "cache" => "redis", dyn Cache => RedisCache, RedisCache::from_env)?;
    Ok(catalog)
}

fn main() -> Result<(), RegistryError> {
    tracing_subscriber::fmt()
        .with_env_filter("basic_ioc=debug")
        .init();

    println!("=== basic-ioc: Configuration-Driven Bindings ===\n");

    for profile in ["[bindings]\ncache = \"memory\"", "[bindings]\ncache = \"redis\""] {
        let config: BindingConfig = profile.parse()?;
        let registry = catalog()?.into_builder(&config)?.build();

        println!("profile {:?}", config.bindings);
        match registry.get_instance::<dyn Cache>() {
            Ok(cache) => println!("   cache: {}", cache.describe()),
            Err(err) => println!("   {} ({:?})", err, err.kind()),
        }
    }

    println!("\nUnknown selection:");
    let config: BindingConfig = "[bindings]\ncache = \"memcached\"".parse()?;
    let catalog = catalog()?;
    println!("   offered: {:?}", catalog.implementations("cache"));
    if let Err(err) = catalog.into_builder(&config) {
        println!("   {}", err);
    }

    println!("\n=== Example completed ===");
    Ok(())
}
