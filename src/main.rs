//! Back-office gate server.
//!
//! Serves the sign-in API under `/api/v1`, guards `/admin` and
//! `/api/v1/admin`, and optionally serves the admin frontend build.

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{App, HttpRequest, HttpServer, Result as ActixResult, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use backoffice_gate::api::{self, ApiDoc};
use backoffice_gate::auth::{CredentialVerifier, SessionTokens, VerificationCodeStore};
use backoffice_gate::config::Config;
use backoffice_gate::middleware::{RequestLogger, RouteGuard};
use backoffice_gate::services::{AdminAuth, TelegramChannel};

/// Admin frontend dev server origins allowed in development.
const DEV_FRONTEND_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Warn about settings that leave sign-in unusable outside production.
fn report_missing_settings(config: &Config) {
    if config.admin.login.is_none() || config.admin.password_hash.is_none() {
        warn!("ADMIN_LOGIN/ADMIN_PASSWORD_HASH not set: every sign-in will fail with 500");
    }
    if config.telegram.bot_token.is_none() || config.telegram.chat_id.is_none() {
        warn!("TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID not set: codes cannot be delivered");
    }
}

/// The frontend dev server runs on another origin and needs the session
/// cookie; production is same-origin only.
fn cors(is_development: bool) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);

    if is_development {
        DEV_FRONTEND_ORIGINS
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
            .supports_credentials()
    } else {
        cors
    }
}

/// Client-side routes of the admin frontend all resolve to index.html.
async fn spa_fallback(req: HttpRequest) -> ActixResult<NamedFile> {
    let static_dir = req
        .app_data::<web::Data<PathBuf>>()
        .ok_or_else(|| actix_web::error::ErrorNotFound("Static dir not configured"))?;
    Ok(NamedFile::open(static_dir.join("index.html"))?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("JWT_SECRET and RUST_ENV are always required; production also needs ADMIN_* and TELEGRAM_*");
            std::process::exit(1);
        }
    };

    info!("Back-office gate starting ({})", config.environment);
    if config.is_development() {
        warn!("Running in DEVELOPMENT mode: session cookies are not marked Secure");
    }
    report_missing_settings(&config);

    let channel = match TelegramChannel::new(&config.telegram) {
        Ok(channel) => Arc::new(channel),
        Err(e) => {
            error!("Failed to set up Telegram channel: {}", e);
            std::process::exit(1);
        }
    };

    let tokens = SessionTokens::new(config.jwt_secret.clone());
    let admin_auth = AdminAuth::new(
        CredentialVerifier::from_settings(&config.admin),
        tokens.clone(),
        Arc::new(VerificationCodeStore::new()),
        channel,
    );

    let bind_address = config.bind_address();
    let static_dir = config.static_dir.clone();
    let is_development = config.is_development();
    let workers = if is_development { 4 } else { num_cpus::get() };

    if let Some(dir) = &static_dir {
        info!("Serving admin frontend from {:?}", dir);
    }
    info!("Listening on http://{} ({} workers)", bind_address, workers);

    let config = web::Data::new(config);
    let admin_auth = web::Data::new(admin_auth);
    let tokens = web::Data::new(tokens);

    HttpServer::new(move || {
        let mut app = App::new()
            // Innermost: the guard sees requests after CORS preflight handling
            .wrap(RouteGuard::default())
            .wrap(cors(is_development))
            .wrap(RequestLogger)
            .app_data(config.clone())
            .app_data(admin_auth.clone())
            .app_data(tokens.clone())
            .configure(api::configure_api);

        if is_development {
            app = app.service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
        }

        if let Some(dir) = &static_dir {
            app = app
                .app_data(web::Data::new(dir.clone()))
                .service(Files::new("/assets", dir.join("assets")).prefer_utf8(true))
                .default_service(web::route().to(spa_fallback));
        }

        app
    })
    .workers(workers)
    .bind(&bind_address)?
    .run()
    .await
}
