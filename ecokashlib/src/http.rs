//! HTTP-маршруты `/api/*` поверх `RewardService`.
//!
//! `route` обобщён по типу тела запроса: сервер отдаёт `hyper::body::Incoming`,
//! тесты передают `Full<Bytes>`.

use crate::{
    model::UserId,
    service::{ApiError, DepositRequest, RewardService, TransferRequest},
    store::Store,
    traits::TransactionAttestor,
};
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{
    body::Body,
    header::{self, HeaderValue},
    Method, Request, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::error::Error as StdError;

pub const DEPOSITS: &str = "/api/deposits";
pub const TRANSFERS: &str = "/api/transfers";
pub const NOTIFICATIONS: &str = "/api/notifications";

/// Тела запросов больше этого отвергаются с 413.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

type BoxError = Box<dyn StdError + Send + Sync>;

pub async fn route<S, A, B>(service: &RewardService<S, A>, req: Request<B>) -> Response<Full<Bytes>>
where
    S: Store,
    A: TransactionAttestor,
    B: Body,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    tracing::debug!(%method, %path, "request");

    let result = match (&method, path.as_str()) {
        (&Method::POST, DEPOSITS) => deposit(service, bearer.as_deref(), req).await,
        (&Method::POST, TRANSFERS) => transfer(service, bearer.as_deref(), req).await,
        (&Method::GET, NOTIFICATIONS) => {
            let user = service.authenticate(bearer.as_deref());
            service.notifications(user.as_ref()).map(|r| json(StatusCode::OK, &r))
        }
        (_, DEPOSITS | TRANSFERS | NOTIFICATIONS) => Err(ApiError::MethodNotAllowed),
        _ => Err(ApiError::NotFound),
    };

    let resp = result.unwrap_or_else(|e| error_response(&e));
    tracing::debug!(%method, %path, status = %resp.status(), "response");
    resp
}

// сессия проверяется до чтения тела
async fn deposit<S, A, B>(
    service: &RewardService<S, A>,
    bearer: Option<&str>,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, ApiError>
where
    S: Store,
    A: TransactionAttestor,
    B: Body,
    B::Error: Into<BoxError>,
{
    let user = require_user(service, bearer)?;
    let body: DepositRequest = read_json(req).await?;
    service.create_deposit(Some(&user), body).map(|r| json(StatusCode::OK, &r))
}

async fn transfer<S, A, B>(
    service: &RewardService<S, A>,
    bearer: Option<&str>,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, ApiError>
where
    S: Store,
    A: TransactionAttestor,
    B: Body,
    B::Error: Into<BoxError>,
{
    let user = require_user(service, bearer)?;
    let body: TransferRequest = read_json(req).await?;
    service.create_transfer(Some(&user), body).map(|r| json(StatusCode::OK, &r))
}

fn require_user<S: Store, A: TransactionAttestor>(
    service: &RewardService<S, A>,
    bearer: Option<&str>,
) -> Result<UserId, ApiError> {
    service.authenticate(bearer).ok_or(ApiError::Unauthorized)
}

async fn read_json<T, B>(req: Request<B>) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    B: Body,
    B::Error: Into<BoxError>,
{
    let bytes = Limited::new(req.into_body(), MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                return ApiError::PayloadTooLarge;
            }
            ApiError::BadRequest(format!("Failed to read body: {e}"))
        })?
        .to_bytes();
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!(error = %e, "malformed request body");
        ApiError::BadRequest("Invalid request body".into())
    })
}

pub fn status_of(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        ApiError::RecipientNotFound | ApiError::NotFound => StatusCode::NOT_FOUND,
        ApiError::InsufficientBalance | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &ApiError) -> Response<Full<Bytes>> {
    json(status_of(err), &serde_json::json!({ "error": err.to_string() }))
}

fn json<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let (status, bytes) = match serde_json::to_vec(body) {
        Ok(v) => (status, Bytes::from(v)),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response");
            (StatusCode::INTERNAL_SERVER_ERROR, Bytes::from_static(br#"{"error":"Internal error"}"#))
        }
    };
    let mut resp = Response::new(Full::new(bytes));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}
