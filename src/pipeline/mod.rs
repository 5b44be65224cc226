// Request pipeline - one transaction, one gate, one handler, one response
//
// Every route handler runs through `Pipeline::run`. Phases run in order:
// context, transaction, auth gate, handler, commit or rollback, response.
// The last two always run, including after a handler panic.

mod options;
mod reply;
mod response;

pub use options::RouteOptions;
pub use reply::Reply;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use poem::http::HeaderValue;
use poem::{Request, Response};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Serialize;
use tracing::Instrument;

use crate::errors::ApiError;
use crate::errors::internal::{DatabaseError, InternalError};
use crate::providers::AuthenticationProvider;
use crate::types::db::user;
use crate::types::internal::RequestContext;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
pub const TIMING_HEADER: &str = "X-Timing";

/// What a handler gets: the request context and, when asked for, the transaction
pub struct Scope {
    pub ctx: RequestContext,
    txn: Option<Arc<DatabaseTransaction>>,
}

impl Scope {
    /// The request's transaction; routes without `use_db` have none
    pub fn txn(&self) -> Result<&DatabaseTransaction, ApiError> {
        self.txn.as_deref().ok_or_else(|| {
            tracing::error!(request_id = %self.ctx.request_id, "handler asked for a transaction on a route without one");
            ApiError::internal()
        })
    }

    pub fn user(&self) -> Result<&user::Model, ApiError> {
        self.ctx.user.as_ref().ok_or_else(ApiError::missing_token)
    }
}

#[derive(Clone)]
pub struct Pipeline {
    db: DatabaseConnection,
    gate: Arc<AuthenticationProvider>,
}

impl Pipeline {
    pub fn new(db: DatabaseConnection, gate: Arc<AuthenticationProvider>) -> Self {
        Self { db, gate }
    }

    /// Run `handler` for `req` and format exactly one response
    pub async fn run<T, F, Fut>(&self, req: &Request, options: RouteOptions, handler: F) -> Response
    where
        T: Serialize,
        F: FnOnce(Scope) -> Fut,
        Fut: Future<Output = Result<Reply<T>, ApiError>>,
    {
        let ctx = RequestContext::from_request(req);
        let span = tracing::info_span!(
            "request",
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path,
        );

        async move {
            let request_id = ctx.request_id;
            let method = ctx.method.clone();
            let started_at = ctx.started_at;
            let credential = options
                .needs_gate()
                .then(|| AuthenticationProvider::credential_from_request(req))
                .flatten();

            let mut response = match self.execute(ctx, options, credential, handler).await {
                Ok(reply) => response::reply_response(reply, &method),
                Err(err) => {
                    if response::internal_status_code(&err) {
                        tracing::error!(error = %err, "request failed");
                    } else {
                        tracing::debug!(status = %err.status(), error = %err, "request rejected");
                    }
                    response::error_response(&err)
                }
            };

            let elapsed = started_at.elapsed().as_micros();
            let headers = response.headers_mut();
            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                headers.insert(REQUEST_ID_HEADER, value);
            }
            if let Ok(value) = HeaderValue::from_str(&elapsed.to_string()) {
                headers.insert(TIMING_HEADER, value);
            }

            tracing::info!(status = response.status().as_u16(), elapsed_us = elapsed as u64, "request complete");
            response
        }
        .instrument(span)
        .await
    }

    async fn execute<T, F, Fut>(
        &self,
        ctx: RequestContext,
        options: RouteOptions,
        credential: Option<String>,
        handler: F,
    ) -> Result<Reply<T>, ApiError>
    where
        F: FnOnce(Scope) -> Fut,
        Fut: Future<Output = Result<Reply<T>, ApiError>>,
    {
        let txn = if options.needs_transaction() {
            let txn = self.db.begin().await.map_err(|source| {
                ApiError::from(InternalError::Database(DatabaseError::TransactionBegin { source }))
            })?;
            Some(Arc::new(txn))
        } else {
            None
        };

        let outcome = AssertUnwindSafe(self.dispatch(ctx, options, credential, txn.clone(), handler))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                tracing::error!(panic = %message, "handler panicked");
                Err(ApiError::internal())
            });

        match txn {
            Some(txn) => close(txn, outcome).await,
            None => outcome,
        }
    }

    /// Gate then handler; a gate failure means the handler never runs
    async fn dispatch<T, F, Fut>(
        &self,
        ctx: RequestContext,
        options: RouteOptions,
        credential: Option<String>,
        txn: Option<Arc<DatabaseTransaction>>,
        handler: F,
    ) -> Result<Reply<T>, ApiError>
    where
        F: FnOnce(Scope) -> Fut,
        Fut: Future<Output = Result<Reply<T>, ApiError>>,
    {
        let mut scope = Scope { ctx, txn };

        if options.needs_gate() {
            let user = self.gate.authenticate(scope.txn()?, credential.as_deref()).await?;
            if options.use_admin && !user.admin {
                tracing::warn!(user_uuid = %user.uuid, "admin route refused");
                return Err(ApiError::admin_required());
            }
            tracing::debug!(user_uuid = %user.uuid, "authenticated");
            scope.ctx = scope.ctx.with_user(user);
        }

        handler(scope).await
    }
}

/// Commit on success, roll back otherwise; a failed commit overrides the reply
async fn close<T>(txn: Arc<DatabaseTransaction>, outcome: Result<Reply<T>, ApiError>) -> Result<Reply<T>, ApiError> {
    let txn = match Arc::try_unwrap(txn) {
        Ok(txn) => txn,
        Err(_) => {
            // a clone escaped the handler; dropping ours rolls back once the last one goes
            tracing::error!("transaction still shared at close");
            return Err(ApiError::internal());
        }
    };

    match outcome {
        Ok(reply) => {
            txn.commit()
                .await
                .map_err(|source| ApiError::from(InternalError::Database(DatabaseError::TransactionCommit { source })))?;
            Ok(reply)
        }
        Err(err) => {
            if let Err(source) = txn.rollback().await {
                return Err(ApiError::from(InternalError::Database(DatabaseError::TransactionRollback {
                    source,
                })));
            }
            Err(err)
        }
    }
}
