use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::storefront::{Credentials, Order, ProfileUpdate, Registration, User};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: User,
    pub orders: Vec<Order>,
}

async fn require_token(state: &web::Data<AppState>) -> Result<String, AppError> {
    let state = state.clone();
    web::block(move || state.auth.token())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Sign in to view your profile".to_string()))
}

/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Signed in", body = User),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "account"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, AppError> {
    let auth = state.api.login(&body).await?;
    let user = auth.user.clone();
    web::block(move || state.auth.save(&auth)).await??;
    Ok(HttpResponse::Ok().json(user))
}

/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = Registration,
    responses(
        (status = 201, description = "Account created and signed in", body = User),
        (status = 502, description = "Registration refused"),
    ),
    tag = "account"
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<Registration>,
) -> Result<HttpResponse, AppError> {
    let auth = state.api.register(&body).await?;
    let user = auth.user.clone();
    web::block(move || state.auth.save(&auth)).await??;
    Ok(HttpResponse::Created().json(user))
}

/// POST /auth/logout
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Signed out")),
    tag = "account"
)]
pub async fn logout(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    web::block(move || state.auth.logout()).await??;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /profile
///
/// The signed-in user together with their order history.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Not signed in"),
    ),
    tag = "account"
)]
pub async fn get_profile(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let token = require_token(&state).await?;
    let user = state.api.current_user(&token).await?;
    let orders = state.api.list_user_orders(&token).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse { user, orders }))
}

/// PUT /profile
#[utoipa::path(
    put,
    path = "/profile",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Nothing to update"),
        (status = 401, description = "Not signed in"),
    ),
    tag = "account"
)]
pub async fn update_profile(
    state: web::Data<AppState>,
    body: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, AppError> {
    let token = require_token(&state).await?;
    let update = body.into_inner().normalized();
    if update.username.is_none() && update.email.is_none() && update.new_password.is_none() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let user = state.api.update_profile(&token, &update).await?;
    let stored = user.clone();
    web::block(move || state.auth.refresh_user(&stored)).await??;

    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use crate::handlers::test_state;
    use crate::test_support::FakeApi;

    fn login(password: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": "ada@example.com", "password": password}))
    }

    #[actix_web::test]
    async fn wrong_password_is_401_with_remote_message() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let resp = test::call_service(&app, login("nope").to_request()).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[actix_web::test]
    async fn profile_requires_sign_in_and_logout_ends_it() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let anonymous =
            test::call_service(&app, test::TestRequest::get().uri("/profile").to_request()).await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let user: Value =
            test::call_and_read_body_json(&app, login(FakeApi::PASSWORD).to_request()).await;
        assert_eq!(user["email"], "ada@example.com");

        let profile: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/profile").to_request())
                .await;
        assert_eq!(profile["user"]["username"], "ada");
        assert_eq!(profile["orders"].as_array().map(Vec::len), Some(0));

        let out =
            test::call_service(&app, test::TestRequest::post().uri("/auth/logout").to_request())
                .await;
        assert_eq!(out.status(), StatusCode::NO_CONTENT);

        let after =
            test::call_service(&app, test::TestRequest::get().uri("/profile").to_request()).await;
        assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn register_then_update_profile() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/auth/register")
                .set_json(json!({"username": "ada", "email": "ada@example.com", "password": "pw"}))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let empty = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/profile")
                .set_json(json!({"username": ""}))
                .to_request(),
        )
        .await;
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

        let updated: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::put()
                .uri("/profile")
                .set_json(json!({"username": "countess"}))
                .to_request(),
        )
        .await;
        assert_eq!(updated["username"], "countess");
    }
}
