//! # Folio server
//!
//! ```bash
//! ADMIN_USER=me@example.com ADMIN_PASSWORD=... cargo run -p folio-server
//! ```
//!
//! Pass `--migrate` or `--rollback [N]` to run migrations and exit.
//! Set `LOG_FORMAT=json` for structured logs.

use folio_core::App;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => folio_core::logging::init_logging_json(),
        _ => folio_core::logging::init_logging(),
    }

    let app = App::new().await?;
    app.run().await?;

    Ok(())
}
