use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use redis::Client as RedisClient;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homeboard_api::{config::Config, db, middleware::auth::JwtSecret, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let redis_client = RedisClient::open(config.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    info!("Redis connected");

    let state = AppState {
        db: pool,
        redis: redis_conn,
        config: config.clone(),
    };

    // Build CORS: allow the configured app origin; localhost is always allowed
    // for local development.
    let base_url = config.app_base_url.clone();
    let cors_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
            return true;
        }
        o == base_url
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(cors_origin);

    let jwt_secret = JwtSecret(config.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh_token))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        .route("/auth/change-password", post(routes::auth::change_password))
        // Profile
        .route("/profile", get(routes::profile::get_profile).put(routes::profile::update_profile))
        // Family setup
        .route("/family/status", get(routes::family::status))
        .route("/family", post(routes::family::create))
        .route("/family/join", post(routes::family::join))
        // Events
        .route("/events", get(routes::events::list_events).post(routes::events::create_event))
        .route("/events/{id}", put(routes::events::update_event).delete(routes::events::delete_event))
        // Budget
        .route("/budget/overview", get(routes::budget::overview))
        .route("/budget/categories", get(routes::budget::list_categories).post(routes::budget::create_category))
        .route("/budget/categories/{id}", put(routes::budget::update_category).delete(routes::budget::delete_category))
        .route("/budget/transactions", get(routes::budget::list_transactions).post(routes::budget::create_transaction))
        .route("/budget/transactions/{id}", delete(routes::budget::delete_transaction))
        // Shopping lists
        .route("/shopping/{list}", get(routes::shopping::list_items).post(routes::shopping::add_item))
        .route("/shopping/{list}/clear-completed", post(routes::shopping::clear_completed))
        .route("/shopping/items/{id}/toggle", post(routes::shopping::toggle_item))
        .route("/shopping/items/{id}", delete(routes::shopping::delete_item))
        // Weekly meal plan
        .route("/meals", get(routes::meals::get_week).put(routes::meals::upsert_entry))
        .route("/meals/clear", post(routes::meals::clear_entry))
        // Goals
        .route("/goals", get(routes::goals::list_goals).post(routes::goals::create_goal))
        .route("/goals/{id}", delete(routes::goals::delete_goal))
        .route("/goals/{id}/contributions", post(routes::goals::add_contribution))
        // Message boards
        .route("/messages/boards", get(routes::messages::list_boards).post(routes::messages::create_board))
        .route("/messages/boards/{id}", delete(routes::messages::delete_board))
        .route("/messages/boards/{id}/messages", get(routes::messages::list_messages).post(routes::messages::post_message))
        // Tasks
        .route("/tasks", get(routes::tasks::list_tasks).post(routes::tasks::create_task))
        .route("/tasks/categories", post(routes::tasks::create_category))
        .route("/tasks/categories/{id}", delete(routes::tasks::delete_category))
        .route("/tasks/{id}", put(routes::tasks::update_task).delete(routes::tasks::delete_task))
        .route("/tasks/{id}/toggle", post(routes::tasks::toggle_task))
        // Recipes
        .route("/recipes", get(routes::recipes::list_recipes).post(routes::recipes::create_recipe))
        .route("/recipes/{id}", get(routes::recipes::get_recipe).put(routes::recipes::update_recipe).delete(routes::recipes::delete_recipe))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("homeboard API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
