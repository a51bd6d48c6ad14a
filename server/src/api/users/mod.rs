pub mod avatar;
pub mod create;
pub mod get;
pub mod list;
pub mod set_password;
pub mod subscriptions;
pub mod view;

use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints (mounted at /api/users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_users).post(create::create_user))
        .route("/me", get(get::me))
        .route(
            "/me/avatar",
            put(avatar::set_avatar).delete(avatar::delete_avatar),
        )
        .route("/set_password", post(set_password::set_password))
        .route("/subscriptions", get(subscriptions::list_subscriptions))
        .route("/{id}", get(get::get_user))
        .route(
            "/{id}/subscribe",
            post(subscriptions::subscribe).delete(subscriptions::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_user,
        list::list_users,
        get::get_user,
        get::me,
        set_password::set_password,
        avatar::set_avatar,
        avatar::delete_avatar,
        subscriptions::list_subscriptions,
        subscriptions::subscribe,
        subscriptions::unsubscribe,
    ),
    components(schemas(
        view::UserResponse,
        view::SubscriptionResponse,
        create::CreateUserRequest,
        list::UserPage,
        set_password::SetPasswordRequest,
        avatar::SetAvatarRequest,
        avatar::AvatarResponse,
        subscriptions::SubscriptionPage,
    ))
)]
pub struct ApiDoc;
