use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post, put};
use axum::Router;
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use matchmaker::services::notify_service::{NoopNotifier, Notifier, WebhookNotifier};
use matchmaker::services::result_cache::ResultCache;
use matchmaker::services::session_service::SessionStore;
use matchmaker::web::routes::{admirers, browse, health, preferences};
use matchmaker::web::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    println!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(5))
        .connect(&db_url)
        .await
        .expect("Cannot connect to the database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Cannot run migrations");

    let notifier: Arc<dyn Notifier> = match WebhookNotifier::from_env() {
        Some(webhook) => Arc::new(webhook),
        None => {
            println!("NOTIFY_WEBHOOK_URL not set, match notifications disabled");
            Arc::new(NoopNotifier)
        }
    };

    let state = AppState {
        pool,
        cache: Arc::new(ResultCache::new()),
        sessions: Arc::new(SessionStore::new()),
        notifier,
    };

    // Expired sessions reset lazily on access; this sweep just frees slots
    // of users who never came back.
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(3600));
        loop {
            tick.tick().await;
            sessions.prune_expired();
        }
    });

    let app = Router::new()
        .route("/health", get(health::health_handler))
        .route("/users/:user_id/browse/next", get(browse::browse_next_handler))
        .route("/users/:user_id/swipe", post(browse::swipe_handler))
        .route(
            "/users/:user_id/admirers/next",
            get(admirers::next_admirer_handler),
        )
        .route(
            "/users/:user_id/admirers/swipe",
            post(admirers::swipe_admirer_handler),
        )
        .route(
            "/users/:user_id/preferences",
            put(preferences::update_preferences_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state);

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "Could not bind {}: {}. Trying fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind fallback port")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    println!("Matchmaker listening on http://{}", bound_addr);

    axum::serve(listener, app).await.unwrap();
}
