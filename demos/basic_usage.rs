// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the envspec crate.
//!
//! This example demonstrates:
//! - Declaring a specification with a prefix, defaults and a nested section
//! - Reading a deprecated alias (the notice is logged as a warning)
//! - Derived values and validators
//! - Printing help rows for every variable
//!
//! To run this example:
//! ```bash
//! export MYAPP_DEBUG="yes"
//! export MYAPP_SERVICE_PORT="8080"
//! export MYAPP_SERVICE_HOSTNAME="example.com"
//!
//! cargo run --example basic_usage --features env
//! ```

use envspec::prelude::*;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== envspec: Basic Usage ===\n");

    let spec = Spec::builder()
        .prefix("myapp")
        .var(
            "debug",
            EnvVariable::new(ValueKind::Bool, "debug")
                .default(false)
                .help("Enable debug mode"),
        )
        .var(
            "log_level",
            EnvVariable::new(ValueKind::Str, "log.level")
                .default("info")
                .validator(validators::choice(["debug", "info", "warn", "error"]))
                .help("Minimum level of log records"),
        )
        .section("service", |s| {
            s.var(
                "host",
                EnvVariable::new(ValueKind::Str, "host")
                    .default("localhost")
                    .deprecation(Deprecation::new("hostname").since("0.2").removed_in("1.0"))
                    .help("Address to bind"),
            )
            .var(
                "port",
                EnvVariable::new(ValueKind::Int, "port")
                    .default(3000)
                    .validator(validators::range(1, 65535))
                    .help("Port to bind"),
            )
        })
        .derived(
            "listen",
            DerivedVariable::new(ValueKind::Str, |c| {
                let service = c.section("service")?;
                Ok(Value::from(format!(
                    "{}:{}",
                    service.get_str("host")?,
                    service.get_int("port")?
                )))
            }),
        )
        .build()?;

    let config = spec.from_env()?;

    println!("--- Resolved values ---");
    println!("debug     = {}", config.get_bool("debug")?);
    println!("log_level = {}", config.get_str("log_level")?);
    println!("listen    = {}", config.get_str("listen")?);

    println!("\n--- Variables ---");
    for row in spec.help_rows(true) {
        println!(
            "{:<28} {:<6} {:<10} {}",
            row.name, row.type_label, row.default, row.description
        );
    }

    Ok(())
}
