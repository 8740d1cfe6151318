/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
/// The state carries the explicitly constructed database pool; nothing in
/// the process holds a global store handle.
///
/// # Example
///
/// ```no_run
/// use corkboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = corkboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use corkboard_shared::auth::{jwt, middleware::AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                           # Health check (public)
/// └── /v1/                              # API v1 (versioned)
///     ├── /auth/                        # register, login, refresh, logout (public)
///     ├── /invitations/accept           # invitation acceptance (public)
///     ├── /users/                       # self-service + admin user management
///     ├── /kanbans/                     # boards, board snapshot, members,
///     │                                 # nested columns/labels/invitations
///     ├── /columns/                     # column updates + nested cards
///     ├── /cards/                       # cards, reorder batch, labels,
///     │                                 # assignees, checklist, comments,
///     │                                 # attachments
///     ├── /labels/ /checklist-items/
///     ├── /comments/ /attachments/      # id-scoped child resources
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Authentication (per-route-group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/logout", post(routes::auth::logout));

    // Invitation acceptance is public: the invited user has no session yet
    let public_invitation_routes =
        Router::new().route("/accept", post(routes::invitations::accept_invitation));

    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/me", get(routes::users::get_me))
        .route("/me", put(routes::users::update_me))
        .route("/me/password", put(routes::users::change_password))
        .route("/:id", delete(routes::users::delete_user));

    let kanban_routes = Router::new()
        .route("/", post(routes::kanbans::create_kanban))
        .route("/", get(routes::kanbans::list_kanbans))
        .route("/:id", get(routes::kanbans::get_kanban))
        .route("/:id", put(routes::kanbans::update_kanban))
        .route("/:id", delete(routes::kanbans::delete_kanban))
        .route("/:id/board", get(routes::kanbans::get_board))
        .route("/:id/members", get(routes::kanbans::list_members))
        .route(
            "/:id/members/:user_id",
            delete(routes::kanbans::remove_member),
        )
        .route("/:id/columns", post(routes::columns::create_column))
        .route("/:id/columns", get(routes::columns::list_columns))
        .route("/:id/labels", post(routes::labels::create_label))
        .route("/:id/labels", get(routes::labels::list_labels))
        .route(
            "/:id/invitations",
            post(routes::invitations::issue_invitation),
        )
        .route(
            "/:id/invitations",
            get(routes::invitations::list_invitations),
        );

    let column_routes = Router::new()
        .route("/:id", put(routes::columns::update_column))
        .route("/:id", delete(routes::columns::delete_column))
        .route("/:id/cards", post(routes::cards::create_card));

    let card_routes = Router::new()
        .route("/reorder", post(routes::cards::reorder_cards))
        .route("/:id", get(routes::cards::get_card))
        .route("/:id", put(routes::cards::update_card))
        .route("/:id", delete(routes::cards::delete_card))
        .route("/:id/labels/:label_id", post(routes::cards::add_label))
        .route("/:id/labels/:label_id", delete(routes::cards::remove_label))
        .route(
            "/:id/assignees/:user_id",
            post(routes::cards::add_assignee),
        )
        .route(
            "/:id/assignees/:user_id",
            delete(routes::cards::remove_assignee),
        )
        .route(
            "/:id/checklist",
            post(routes::checklist_items::create_checklist_item),
        )
        .route("/:id/comments", post(routes::comments::create_comment))
        .route("/:id/comments", get(routes::comments::list_comments))
        .route(
            "/:id/attachments",
            post(routes::attachments::upload_attachment),
        )
        .route(
            "/:id/attachments",
            get(routes::attachments::list_attachments),
        );

    let label_routes = Router::new()
        .route("/:id", put(routes::labels::update_label))
        .route("/:id", delete(routes::labels::delete_label));

    let checklist_routes = Router::new()
        .route("/:id", put(routes::checklist_items::update_checklist_item))
        .route(
            "/:id",
            delete(routes::checklist_items::delete_checklist_item),
        );

    let comment_routes = Router::new()
        .route("/:id", put(routes::comments::update_comment))
        .route("/:id", delete(routes::comments::delete_comment));

    let attachment_routes =
        Router::new().route("/:id", delete(routes::attachments::delete_attachment));

    // Everything except auth, health, and invitation acceptance requires a
    // valid access token
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/kanbans", kanban_routes)
        .nest("/columns", column_routes)
        .nest("/cards", card_routes)
        .nest("/labels", label_routes)
        .nest("/checklist-items", checklist_routes)
        .nest("/comments", comment_routes)
        .nest("/attachments", attachment_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/invitations", public_invitation_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects an [`AuthContext`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_jwt(claims.sub, claims.role);

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_app_state_creation() {
        // This is just a compile test to ensure AppState is properly structured
        // Real integration tests use actual database connections
    }
}
