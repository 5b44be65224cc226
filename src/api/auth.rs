use std::sync::Arc;

use poem::http::{StatusCode, header};
use poem::web::cookie::{Cookie, SameSite};
use poem::web::{Data, Json};
use poem::{Request, Response, handler};

use crate::AppData;
use crate::api::helpers::json_body;
use crate::coordinators::{LoginCoordinator, UserCoordinator};
use crate::pipeline::{Reply, RouteOptions};
use crate::providers::authentication_provider::AUTHORIZATION_COOKIE;
use crate::types::dto::user::LoginRequest;

/// POST /users/login
///
/// 204 with the bearer token in both the `Authorization` header and an
/// HttpOnly cookie of the same name.
#[handler]
pub async fn login(
    req: &Request,
    Data(app): Data<&Arc<AppData>>,
    body: poem::Result<Json<LoginRequest>>,
) -> Response {
    let coordinator = LoginCoordinator::new(app);
    let already_authenticated = req.headers().contains_key(header::AUTHORIZATION);
    let secure_cookies = app.api_settings.secure_cookies();

    app.pipeline()
        .run(req, RouteOptions::db(), |scope| async move {
            let request = json_body(body)?;
            let token = coordinator
                .login(&scope.ctx, scope.txn()?, already_authenticated, request)
                .await?;

            let bearer = format!("Bearer {}", token);
            let mut cookie = Cookie::new_with_str(AUTHORIZATION_COOKIE, &bearer);
            cookie.set_http_only(true);
            cookie.set_secure(secure_cookies);
            cookie.set_path("/");
            cookie.set_same_site(SameSite::Strict);

            Ok(Reply::empty()
                .status(StatusCode::NO_CONTENT)
                .header(header::AUTHORIZATION, bearer)
                .cookie(cookie))
        })
        .await
}

/// GET /me
#[handler]
pub async fn me(req: &Request, Data(app): Data<&Arc<AppData>>) -> Response {
    let coordinator = UserCoordinator::new(app);

    app.pipeline()
        .run(req, RouteOptions::user(), |scope| async move {
            Ok(Reply::new(coordinator.me(&scope.ctx, scope.txn()?).await?))
        })
        .await
}
