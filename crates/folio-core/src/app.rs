use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::get;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::auth::AdminCredentials;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::controllers::{self, AppState};
use crate::guard::{AbuseGuard, CaptchaVerifier, TurnstileVerifier};
use crate::migrations::Migrator;
use crate::openapi::ApiDoc;
use crate::storage::LocalStorage;
use crate::store::DbMessageStore;

/// Headroom for multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// The Folio application.
pub struct App {
    pub config: Config,
    pub db: DatabaseConnection,
    admin: Arc<AdminCredentials>,
    clock: Arc<dyn Clock>,
    captcha: Arc<dyn CaptchaVerifier>,
    api_docs_path: String,
}

impl App {
    /// Create the application from environment configuration.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::from_env()?;
        Self::with_config(config).await
    }

    /// Create the application with a given config.
    ///
    /// Connects to the database and runs pending migrations. `--migrate`
    /// and `--rollback [N]` on the command line run the migration and exit.
    pub async fn with_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let db = crate::db::connect(&config).await?;

        Self::handle_db_cli_args(&db).await?;

        tracing::info!("Running pending database migrations...");
        Migrator::up(&db, None).await?;
        tracing::info!("Migrations complete.");

        let admin = Arc::new(AdminCredentials::from_config(&config)?);
        let captcha = Arc::new(TurnstileVerifier::from_config(&config.guard)?);

        Ok(App {
            config,
            db,
            admin,
            clock: Arc::new(SystemClock),
            captcha,
            api_docs_path: "/api-docs".to_string(),
        })
    }

    async fn handle_db_cli_args(db: &DatabaseConnection) -> Result<(), Box<dyn std::error::Error>> {
        let args: Vec<String> = std::env::args().collect();

        if args.iter().any(|a| a == "--migrate") {
            tracing::info!("Running pending database migrations...");
            Migrator::up(db, None).await?;
            tracing::info!("Migrations complete.");
            std::process::exit(0);
        }

        if let Some(pos) = args.iter().position(|a| a == "--rollback") {
            let steps = args
                .get(pos + 1)
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(1);
            tracing::info!("Rolling back {} migration(s)...", steps);
            Migrator::down(db, Some(steps)).await?;
            tracing::info!("Rollback complete.");
            std::process::exit(0);
        }

        Ok(())
    }

    /// Use a different time source for throttling and timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the Turnstile verifier.
    pub fn with_captcha(mut self, verifier: Arc<dyn CaptchaVerifier>) -> Self {
        self.captcha = verifier;
        self
    }

    /// Customize the URL path where API docs are served.
    ///
    /// Default: `/api-docs` (Scalar UI) and `/api-docs/openapi.json` (raw spec).
    pub fn api_docs_url(mut self, path: &str) -> Self {
        self.api_docs_path = path.to_string();
        self
    }

    fn state(&self, config: Arc<Config>) -> AppState {
        let guard = AbuseGuard::with_clock(
            &self.config.guard,
            self.clock.clone(),
            self.captcha.clone(),
        );

        AppState {
            db: self.db.clone(),
            config,
            guard: Arc::new(guard),
            messages: Arc::new(DbMessageStore::new(self.db.clone())),
            storage: Arc::new(LocalStorage::new(&self.config.upload_dir)),
            admin: self.admin.clone(),
        }
    }

    /// Build the Axum router with every route, CORS and the API docs.
    ///
    /// Each call builds fresh throttling state.
    pub fn router(&self) -> Router {
        let config = Arc::new(self.config.clone());
        let state = self.state(config.clone());

        let openapi_spec = ApiDoc::openapi();
        let openapi_json = openapi_spec.clone();
        let docs_path = self.api_docs_path.clone();
        let json_path = format!("{}/openapi.json", docs_path);

        let body_limit = usize::try_from(self.config.max_upload_size)
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD);

        let mut router = controllers::routes()
            .with_state(state)
            .merge(Scalar::with_url(docs_path, openapi_spec))
            .route(
                &json_path,
                get(move || {
                    let spec = openapi_json.clone();
                    async move { axum::Json(spec) }
                }),
            )
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(cors_layer(&self.config.allowed_origins))
            .layer(axum::Extension(config));

        if self.config.is_dev() {
            use tower_http::LatencyUnit;
            use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse};

            let x_request_id = HeaderName::from_static("x-request-id");
            router = router.layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                    .layer(
                        TraceLayer::new_for_http()
                            .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                            .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                            .on_response(
                                DefaultOnResponse::new()
                                    .level(tracing::Level::INFO)
                                    .latency_unit(LatencyUnit::Millis),
                            ),
                    )
                    .layer(PropagateRequestIdLayer::new(x_request_id)),
            );
        }

        router
    }

    /// Run the application server until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.server_addr();
        let router = self.router();

        println!("\n📁 Folio server is running!");
        println!("   → Server:   http://{}", addr);
        println!("   → API docs: http://{}{}", addr, self.api_docs_path);
        println!();

        tracing::info!(
            origins = ?self.config.allowed_origins,
            admin_configured = self.admin.is_configured(),
            "Folio server running on http://{}",
            addr
        );

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

/// CORS for the configured origins. A `*` entry allows any origin, without
/// credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(allowed).allow_credentials(true)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down Folio server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_accepts_wildcard_and_lists() {
        // Building must not panic: credentials are only enabled for explicit lists.
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&[
            "https://example.com".to_string(),
            "http://localhost:5173".to_string(),
        ]);
    }
}
