use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use courtside::config::AppConfig;
use courtside::repo::bookings_repo::BookingsRepo;
use courtside::repo::fields_repo::FieldsRepo;
use courtside::repo::refresh_tokens_repo::RefreshTokensRepo;
use courtside::repo::users_repo::UsersRepo;
use courtside::service::auth_service::AuthService;
use courtside::service::booking_service::BookingService;
use courtside::service::expiry_sweep::ExpirySweep;
use courtside::AppState;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let bookings_repo = BookingsRepo { pool: pool.clone() };
    let fields_repo = FieldsRepo { pool: pool.clone() };
    let users_repo = UsersRepo { pool: pool.clone() };
    let refresh_tokens_repo = RefreshTokensRepo { pool: pool.clone() };

    let booking_service = BookingService {
        pool: pool.clone(),
        bookings_repo: bookings_repo.clone(),
    };
    let auth_service = AuthService {
        users_repo: users_repo.clone(),
        refresh_tokens_repo: refresh_tokens_repo.clone(),
        jwt_secret: cfg.jwt_secret.clone(),
        access_token_ttl_secs: cfg.access_token_ttl_secs,
        refresh_token_ttl_days: cfg.refresh_token_ttl_days,
    };

    let sweep = ExpirySweep {
        bookings_repo: bookings_repo.clone(),
        refresh_tokens_repo: refresh_tokens_repo.clone(),
        interval: std::time::Duration::from_secs(cfg.expiry_sweep_secs),
    };
    tokio::spawn(sweep.run());

    let state = AppState {
        booking_service,
        auth_service: auth_service.clone(),
        bookings_repo,
        fields_repo,
        users_repo,
        pool,
    };

    let public_routes = Router::new()
        .route("/auth/register", post(courtside::http::handlers::auth::register))
        .route("/auth/login", post(courtside::http::handlers::auth::login))
        .route("/auth/refresh", post(courtside::http::handlers::auth::refresh))
        .route("/fields", get(courtside::http::handlers::fields::list_fields))
        .route("/fields/:field_id", get(courtside::http::handlers::fields::get_field));

    let authed_routes = Router::new()
        .route("/auth/profile", get(courtside::http::handlers::auth::profile))
        .route("/bookings", post(courtside::http::handlers::bookings::create_booking))
        .route("/bookings", get(courtside::http::handlers::bookings::list_my_bookings))
        .route(
            "/bookings/:booking_id",
            get(courtside::http::handlers::bookings::get_booking),
        )
        .route(
            "/bookings/:booking_id/cancel",
            post(courtside::http::handlers::bookings::cancel_booking),
        )
        .layer(from_fn_with_state(
            auth_service.clone(),
            courtside::http::middleware::auth::require_auth,
        ));

    let admin_routes = Router::new()
        .route(
            "/admin/bookings",
            get(courtside::http::handlers::bookings::admin_list_bookings),
        )
        .route(
            "/admin/bookings/stats",
            get(courtside::http::handlers::bookings::admin_booking_stats),
        )
        .route(
            "/admin/bookings/:booking_id",
            patch(courtside::http::handlers::bookings::admin_update_booking),
        )
        .route("/admin/fields", post(courtside::http::handlers::fields::create_field))
        .route(
            "/admin/fields/:field_id",
            patch(courtside::http::handlers::fields::update_field),
        )
        .route(
            "/admin/fields/:field_id",
            delete(courtside::http::handlers::fields::deactivate_field),
        )
        .layer(from_fn_with_state(
            auth_service,
            courtside::http::middleware::auth::require_admin,
        ));

    let api = public_routes.merge(authed_routes).merge(admin_routes);

    let app = Router::new()
        .route("/health", get(courtside::http::handlers::ops::health))
        .route("/ops/readiness", get(courtside::http::handlers::ops::readiness))
        .route("/ops/liveness", get(courtside::http::handlers::ops::liveness))
        .nest("/api/v1", api)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
