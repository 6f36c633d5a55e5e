use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use school_core::error::AppError;
use school_core::middleware::{
    make_request_span, metrics_middleware, request_id_middleware, security_headers_middleware,
};
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{SchoolConfig, StoreBackend};
use crate::handlers;
use crate::services::{seed, Clock, MongoDb, Store, SystemClock, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub config: SchoolConfig,
    pub store: Store,
    /// Present when backed by MongoDB; readiness pings it.
    pub db: Option<MongoDb>,
    pub tokens: TokenService,
    pub clock: Arc<dyn Clock>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: SchoolConfig) -> Result<Self, AppError> {
        let clock = Arc::new(SystemClock::new(config.utc_offset()));
        Self::build_with_clock(config, clock).await
    }

    pub async fn build_with_clock(
        config: SchoolConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let (store, db) = match config.store {
            StoreBackend::Mongo => {
                let db = MongoDb::connect(
                    config.mongodb.uri.expose_secret(),
                    &config.mongodb.database,
                )
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to MongoDB: {}", e);
                    e
                })?;
                db.initialize_indexes().await.map_err(|e| {
                    tracing::error!("Failed to initialize database indexes: {}", e);
                    e
                })?;
                (Store::mongo(&db), Some(db))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                (Store::in_memory(), None)
            }
        };

        seed::ensure_admin(&store, &config.seed).await?;

        let state = AppState {
            tokens: TokenService::new(&config.auth),
            config: config.clone(),
            store,
            db,
            clock,
        };

        let app = router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub fn router(state: AppState) -> Router {
    use handlers::*;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_endpoint))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/dashboard", get(dashboard::dashboard))
        .route(
            "/teachers",
            get(users::list_teachers).post(users::create_teacher),
        )
        .route("/users/:id", get(users::get_user))
        .route("/users/:id/status", put(users::update_status))
        .route("/users/:id/credentials", put(users::update_credentials))
        .route("/students", get(students::list_students))
        .route("/students/check-id/:id", get(students::check_id))
        .route(
            "/students/:id",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/students/:id/fee-plan", get(fees::fee_plan))
        .route("/students/:id/fee-plan/pay", post(fees::pay_fee_plan))
        .route("/fees", get(fees::list_fees).post(fees::create_fee))
        .route("/fees/student/:id", get(fees::student_fees))
        .route("/fees/:id", axum::routing::delete(fees::delete_fee))
        .route("/fees/:id/pay", put(fees::pay_fee))
        .route("/fees/:id/status", put(fees::update_fee_status))
        .route(
            "/admissions",
            get(admissions::list_enquiries).post(admissions::create_enquiry),
        )
        .route(
            "/admissions/:id/status",
            put(admissions::update_enquiry_status),
        )
        .route(
            "/applications",
            get(admissions::list_applications).post(admissions::create_application),
        )
        .route("/enroll", post(admissions::enroll))
        .route("/attendance", post(attendance::mark_attendance))
        .route("/attendance/:id", get(attendance::student_attendance))
        .route(
            "/notices",
            get(notices::list_notices).post(notices::create_notice),
        )
        .route("/notices/:id/read", put(notices::mark_read))
        .route(
            "/batches",
            get(batches::list_batches).post(batches::create_batch),
        )
        .route("/batches/:id", put(batches::update_batch))
        .route(
            "/homework",
            get(homework::list_homework).post(homework::create_homework),
        )
        .route("/homework/:id/submit", put(homework::submit_homework))
        .route(
            "/landing-config",
            get(landing::get_landing).put(landing::update_landing),
        )
        .route_layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
