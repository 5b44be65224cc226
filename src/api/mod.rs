// API layer - route table and HTTP handlers
//
// Handlers only extract request parts and hand a closure to the pipeline;
// the closure calls one coordinator operation and describes the reply.

pub mod auth;
pub mod health;
pub mod helpers;
pub mod hosts;
pub mod incidents;
pub mod providers;
pub mod teams;
pub mod users;

use std::sync::Arc;

use poem::middleware::CatchPanic;
use poem::{Endpoint, EndpointExt, Route, get, post};

use crate::AppData;

/// Every route, with `app_data` attached as shared data
pub fn routes(app_data: Arc<AppData>) -> impl Endpoint {
    Route::new()
        .at("/health", get(health::health))
        .at("/users/login", post(auth::login))
        .at("/me", get(auth::me))
        .at("/users", get(users::list).post(users::create))
        .at("/users/:user_id", get(users::get).put(users::update).delete(users::delete))
        .at("/teams", get(teams::list).post(teams::create))
        .at("/teams/:team_id", get(teams::get).put(teams::update).delete(teams::delete))
        .at("/hosts", get(hosts::list).post(hosts::create))
        .at("/hosts/:host_id", get(hosts::get).put(hosts::update).delete(hosts::delete))
        .at("/providers", get(providers::list).post(providers::create))
        .at(
            "/providers/:provider_id",
            get(providers::get).put(providers::update).delete(providers::delete),
        )
        .at("/incidents", get(incidents::list).post(incidents::create))
        .at(
            "/incidents/:incident_id",
            get(incidents::get).put(incidents::update).delete(incidents::delete),
        )
        .at("/incidents/:incident_id/comments", post(incidents::add_comment))
        .at(
            "/incidents/:incident_id/comments/:comment_id",
            poem::delete(incidents::delete_comment),
        )
        .data(app_data)
        .with(CatchPanic::new())
}
