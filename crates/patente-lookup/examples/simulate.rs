//! Run a few lookups against the deterministic synthetic provider.
//!
//! ```sh
//! cargo run -p patente-lookup --example simulate
//! ```

use patente_lookup::LookupService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patente_lookup=debug".into()),
        )
        .init();

    let service =
        LookupService::simulated().with_disclaimer("Esta información es solo para fines informativos.");

    for raw in ["JVJV-20", "ab-1234", "HHKL55"] {
        let report = service.lookup(raw).await?;
        println!("--- {raw}");
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
