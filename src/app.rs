// app.rs - Shared state and router assembly
//
// Public:    /, /health
// Protected: /todo/*, /person/me  (person_auth_middleware)

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::database::memory::MemoryRepository;
use crate::database::models::{person::Person, todo::Todo};
use crate::database::repository::PgRepository;
use crate::handlers::{protected, public};
use crate::middleware::person_auth_middleware;
use crate::services::{PersonService, TodoService};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<TodoService>,
    pub people: Arc<PersonService>,
}

impl AppState {
    pub fn new(todos: TodoService, people: PersonService) -> Self {
        Self {
            todos: Arc::new(todos),
            people: Arc::new(people),
        }
    }

    /// Process-local storage; contents are lost on exit
    pub fn in_memory() -> Self {
        Self::new(
            TodoService::new(Arc::new(MemoryRepository::<Todo>::new())),
            PersonService::new(Arc::new(MemoryRepository::<Person>::new())),
        )
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            TodoService::new(Arc::new(PgRepository::<Todo>::new(pool.clone()))),
            PersonService::new(Arc::new(PgRepository::<Person>::new(pool))),
        )
    }
}

pub fn app(state: AppState) -> Router {
    let config = crate::config::config();
    let security = &config.security;

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected
        .merge(protected_routes(state.clone()))
        .fallback(public::not_found)
        .with_state(state);

    if security.enable_cors {
        router = router.layer(cors_layer(security));
    }

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{person, todo};

    Router::new()
        .route("/todo", get(todo::todo_list).post(todo::todo_create))
        .route("/todo/", get(todo::todo_list).post(todo::todo_create))
        .route("/todo/bulk/activate", post(todo::bulk_activate))
        .route("/todo/bulk/deactivate", post(todo::bulk_deactivate))
        .route("/todo/bulk/delete", post(todo::bulk_delete))
        .route("/todo/:entity_id", patch(todo::todo_update).delete(todo::todo_delete))
        .route("/person/me", get(person::person_me).patch(person::person_update))
        .route_layer(middleware::from_fn_with_state(state, person_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
}
