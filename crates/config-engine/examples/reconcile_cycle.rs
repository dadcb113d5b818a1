//! Read cycle demonstration.
//!
//! Walks through what a resource manager does with a plugin configuration
//! that holds a secret:
//! 1. Validate the declared configuration before submitting it
//! 2. Reconcile the server's response with the declared plaintext
//! 3. Read again after someone rotated the secret out-of-band
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --example reconcile_cycle
//! ```

use anyhow::Result;
use plugin_config_core::{ClassName, EngineConfig, PluginFamily};
use plugin_config_engine::{CachingDescriptorSource, ConfigEngine, StaticDescriptorSource};
use plugin_config_secrets::FingerprintLedger;
use serde_json::json;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DESCRIPTORS: &str = r#"{
  "items": [
    {
      "className": "com.example.auth.BasicAuthenticator",
      "label": "Basic authentication",
      "configurationFields": [
        { "name": "loginUrl", "type": "TEXT", "required": true },
        { "name": "password", "type": "CONCEALED", "required": true },
        {
          "name": "proxy",
          "type": "COMPOSITE",
          "required": false,
          "fields": [
            { "name": "host", "type": "TEXT", "required": true },
            { "name": "token", "type": "CONCEALED", "required": false }
          ]
        }
      ]
    }
  ]
}"#;

const ENGINE_CONFIG: &str = r"
pass_through_unknown_fields = true
clear_rotated_plaintext = true
";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let family = PluginFamily::new("siteAuthenticators");
    let class = ClassName::new("com.example.auth.BasicAuthenticator");

    let source = StaticDescriptorSource::new().with_family_json(family.clone(), DESCRIPTORS)?;
    let source = CachingDescriptorSource::with_capacity(source, 16)?;
    let engine = ConfigEngine::with_config(source, EngineConfig::from_toml_str(ENGINE_CONFIG)?);

    println!("━━━ Step 1: Validate ━━━\n");

    let incomplete = json!({"loginUrl": "https://example.com/login", "proxy": {}});
    let report = engine.validate(&family, &class, &incomplete).await?;
    println!("{report}\n");

    let declared = json!({
        "loginUrl": "https://example.com/login",
        "password": "secret1",
        "proxy": {"host": "proxy.local", "token": "t0ken"}
    });
    engine.check(&family, &class, &declared).await?;
    println!("Declared configuration is valid");
    println!(
        "Redacted: {}\n",
        engine.redact(&family, &class, &declared).await?
    );

    println!("━━━ Step 2: First read ━━━\n");

    let server = json!({
        "loginUrl": "https://example.com/login",
        "password": {"fingerprint": "abc"},
        "proxy": {"host": "proxy.local", "token": {"fingerprint": "p1"}},
        "createdBy": "admin"
    });
    let first = engine
        .reconcile(&family, &class, &declared, &server, &FingerprintLedger::new())
        .await?;
    println!(
        "Current state: {}",
        engine.redact(&family, &class, &first.document).await?
    );
    println!("Ledger: {}\n", serde_json::to_string(&first.fingerprints)?);

    println!("━━━ Step 3: Read after out-of-band rotation ━━━\n");

    let rotated = json!({
        "loginUrl": "https://example.com/login",
        "password": {"fingerprint": "xyz"},
        "proxy": {"host": "proxy.local", "token": {"fingerprint": "p1"}},
        "createdBy": "admin"
    });
    let second = engine
        .reconcile(&family, &class, &first.document, &rotated, &first.fingerprints)
        .await?;
    for report in &second.drift {
        println!("  {report}");
    }
    println!(
        "Current state: {}",
        engine.redact(&family, &class, &second.document).await?
    );

    let stats = engine.source().stats().await;
    println!(
        "\nDescriptor cache: {} hit(s), {} miss(es)",
        stats.hits, stats.misses
    );

    Ok(())
}
