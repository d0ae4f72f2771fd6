use utoipa::OpenApi;

use crate::users::{dto, handlers};

/// OpenAPI document introspected from the user routes, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_users,
        handlers::create_user,
        handlers::get_user,
        handlers::update_user,
        handlers::delete_user,
    ),
    components(schemas(
        dto::UserPayload,
        dto::UserView,
        dto::UserListResponse,
        dto::PageMeta,
    )),
    tags(
        (name = "users", description = "User account management"),
    ),
    info(
        title = "User Entity Management",
        version = "1.0.0",
        description = "A service to manage user account records",
    )
)]
pub struct ApiDoc;
