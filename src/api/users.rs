use actix_web::{error::InternalError, web, HttpResponse, Responder};
use serde::Serialize;

use crate::{
    models::{UserInput, UserResponse},
    services::UserStore,
    utils::error::GatewayError,
};

pub const NOT_FOUND_MESSAGE: &str = "User not found";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already exists";
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    pub data: UserResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListEnvelope {
    pub success: bool,
    pub count: usize,
    pub data: Vec<UserResponse>,
}

/// A single message, or the full list of validation messages.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Messages(Vec<String>),
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorDetail,
}

impl ErrorEnvelope {
    fn message(msg: &str) -> Self {
        ErrorEnvelope { success: false, error: ErrorDetail::Message(msg.to_string()) }
    }
}

/// Maps a gateway failure onto its fixed status and envelope. Store-native
/// text is logged, never returned.
fn error_response(err: GatewayError, action: &str) -> HttpResponse {
    match err {
        GatewayError::NotFound => {
            log::warn!("⚠️ {}: user not found", action);
            HttpResponse::NotFound().json(ErrorEnvelope::message(NOT_FOUND_MESSAGE))
        }
        GatewayError::Validation(messages) => {
            log::warn!("⚠️ {}: validation failed ({})", action, messages.join(", "));
            HttpResponse::BadRequest().json(ErrorEnvelope {
                success: false,
                error: ErrorDetail::Messages(messages),
            })
        }
        GatewayError::DuplicateKey => {
            log::warn!("⚠️ {}: duplicate email", action);
            HttpResponse::BadRequest().json(ErrorEnvelope::message(DUPLICATE_EMAIL_MESSAGE))
        }
        GatewayError::Internal(detail) => {
            log::error!("❌ Error {}: {}", action, detail);
            HttpResponse::InternalServerError().json(ErrorEnvelope::message(SERVER_ERROR_MESSAGE))
        }
    }
}

/// Malformed or mistyped JSON bodies get the error envelope instead of actix's plain text.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("⚠️ Rejected request body: {}", err);
        let response = HttpResponse::BadRequest().json(ErrorEnvelope::message(INVALID_BODY_MESSAGE));
        InternalError::from_response(err, response).into()
    })
}

/// Mounts the user resource under `/api/users`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .app_data(json_config())
            .route("", web::get().to(get_users))
            .route("", web::post().to(create_user))
            .route("/", web::get().to(get_users))
            .route("/", web::post().to(create_user))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}

/// GET /api/users - Lista todos os usuários
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = UserListEnvelope),
        (status = 500, description = "Server error", body = ErrorEnvelope)
    )
)]
pub async fn get_users(store: web::Data<dyn UserStore>) -> impl Responder {
    log::info!("📋 GET /api/users");

    match store.list().await {
        Ok(users) => {
            let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            log::info!("✅ Listed {} users", data.len());
            HttpResponse::Ok().json(UserListEnvelope { success: true, count: data.len(), data })
        }
        Err(e) => error_response(e, "listing users"),
    }
}

/// GET /api/users/{id} - Busca um usuário
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "User found", body = UserEnvelope),
        (status = 404, description = "Missing or malformed id", body = ErrorEnvelope),
        (status = 500, description = "Server error", body = ErrorEnvelope)
    )
)]
pub async fn get_user(store: web::Data<dyn UserStore>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    log::info!("🔍 GET /api/users/{}", id);

    match store.fetch(&id).await {
        Ok(user) => HttpResponse::Ok().json(UserEnvelope { success: true, data: user.into() }),
        Err(e) => error_response(e, "fetching user"),
    }
}

/// POST /api/users - Cria usuário
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = UserInput,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, description = "Validation failure or duplicate email", body = ErrorEnvelope),
        (status = 500, description = "Server error", body = ErrorEnvelope)
    )
)]
pub async fn create_user(
    store: web::Data<dyn UserStore>,
    body: web::Json<UserInput>,
) -> impl Responder {
    log::info!("📝 POST /api/users");

    match store.insert(body.into_inner()).await {
        Ok(user) => {
            let data = UserResponse::from(user);
            log::info!("✅ User created: {}", data.id);
            HttpResponse::Created().json(UserEnvelope { success: true, data })
        }
        Err(e) => error_response(e, "creating user"),
    }
}

/// PUT /api/users/{id} - Atualiza apenas os campos enviados
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    request_body = UserInput,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 400, description = "Validation failure or duplicate email", body = ErrorEnvelope),
        (status = 404, description = "Missing or malformed id", body = ErrorEnvelope),
        (status = 500, description = "Server error", body = ErrorEnvelope)
    )
)]
pub async fn update_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("🔧 PUT /api/users/{}", id);

    // Existence first: an absent user is always 404, never a validation error.
    // The body is only decoded into fields once the user is known to exist.
    if let Err(e) = store.fetch(&id).await {
        return error_response(e, "updating user");
    }

    let input: UserInput = match serde_json::from_value(body.into_inner()) {
        Ok(input) => input,
        Err(e) => {
            log::warn!("⚠️ Rejected request body: {}", e);
            return HttpResponse::BadRequest().json(ErrorEnvelope::message(INVALID_BODY_MESSAGE));
        }
    };

    match store.modify(&id, input).await {
        Ok(user) => {
            log::info!("✅ User updated: {}", id);
            HttpResponse::Ok().json(UserEnvelope { success: true, data: user.into() })
        }
        Err(e) => error_response(e, "updating user"),
    }
}

/// DELETE /api/users/{id} - Remove usuário permanentemente
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "User deleted, data is an empty object"),
        (status = 404, description = "Missing or malformed id", body = ErrorEnvelope),
        (status = 500, description = "Server error", body = ErrorEnvelope)
    )
)]
pub async fn delete_user(store: web::Data<dyn UserStore>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    log::info!("🗑️  DELETE /api/users/{}", id);

    if let Err(e) = store.fetch(&id).await {
        return error_response(e, "deleting user");
    }

    match store.remove(&id).await {
        Ok(()) => {
            log::info!("✅ User deleted: {}", id);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "data": {}
            }))
        }
        Err(e) => error_response(e, "deleting user"),
    }
}
