use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        version = "1.0.0",
        description = "CRUD over the user resource. Every response body carries a `success` flag; failures carry `error` (a message or a list of validation messages)."
    ),
    paths(
        // Users
        crate::api::users::get_users,
        crate::api::users::get_user,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::Geo,
            crate::models::Address,
            crate::models::GeoInput,
            crate::models::AddressInput,
            crate::models::UserInput,
            crate::models::UserResponse,
            crate::api::users::UserEnvelope,
            crate::api::users::UserListEnvelope,
            crate::api::users::ErrorEnvelope,
            crate::api::users::ErrorDetail,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "Create, read, update and delete users."),
        (name = "Health", description = "Service and database health."),
    )
)]
pub struct ApiDoc;
