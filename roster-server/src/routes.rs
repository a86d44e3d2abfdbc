//! Request routing and handlers

use std::sync::Arc;

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::header;
use hyper::header::HeaderValue;
use log::debug;
use log::warn;
use roster_lib::api::COLUMN_INFO_PATH;
use roster_lib::api::LOGIN_PATH;
use roster_lib::api::LoginRequest;
use roster_lib::api::LoginResponse;
use roster_lib::api::TABLE_DATA_PATH;
use roster_lib::auth::CookieOptions;
use roster_lib::filter::FilterState;
use serde::Serialize;

use crate::error::HttpError;
use crate::jwt::Claims;
use crate::jwt::JwtSigner;
use crate::repository::EmployeeRepository;
use crate::users::UserDirectory;

pub const MISSING_TOKEN: &str = "인증 토큰이 필요합니다.";
pub const INVALID_TOKEN: &str = "유효하지 않은 토큰입니다.";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const LOGIN_SUCCESS: &str = "로그인 성공";

/// Everything a handler needs, shared across connections.
pub struct AppState {
    pub repository: Arc<dyn EmployeeRepository>,
    pub users: UserDirectory,
    pub signer: JwtSigner,
    pub cookie: CookieOptions,
}

pub type HttpResponse = Response<Full<Bytes>>;

/// Routes one request. Never fails: errors become [`ErrorBody`] responses.
///
/// [`ErrorBody`]: roster_lib::api::ErrorBody
pub async fn handle(state: Arc<AppState>, req: Request<Incoming>) -> HttpResponse {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let result = match path.as_str() {
        LOGIN_PATH if method == Method::POST => login(&state, req).await,
        TABLE_DATA_PATH if method == Method::GET => table_data(&state, &req).await,
        COLUMN_INFO_PATH if method == Method::GET => column_info(&state, &req).await,
        LOGIN_PATH | TABLE_DATA_PATH | COLUMN_INFO_PATH => {
            Err(HttpError::method_not_allowed(&method, &path))
        }
        _ => Err(HttpError::not_found(&method, &path)),
    };

    result.unwrap_or_else(|e| error_response(&e))
}

async fn login(state: &AppState, req: Request<Incoming>) -> Result<HttpResponse, HttpError> {
    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|e| HttpError::bad_request(format!("Failed to read body: {}", e)))?
        .to_bytes();
    let credentials: LoginRequest = serde_json::from_slice(&body)
        .map_err(|e| HttpError::bad_request(format!("Invalid login body: {}", e)))?;

    let Some(user) = state
        .users
        .authenticate(&credentials.username, &credentials.password)
    else {
        warn!("Rejected login for {}", credentials.username);
        return Err(HttpError::unauthorized(INVALID_CREDENTIALS));
    };

    let token = state
        .signer
        .issue(user)
        .map_err(|e| HttpError::internal(e.to_string()))?;
    debug!("Issued token for {}", user.username);

    let mut response = json_response(
        StatusCode::CREATED,
        &LoginResponse {
            success: true,
            message: LOGIN_SUCCESS.to_string(),
            access_token: token.clone(),
        },
    );
    let max_age = state.signer.ttl().as_secs() as i64;
    match HeaderValue::from_str(&state.cookie.set_cookie(&token, max_age)) {
        Ok(cookie) => {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
        Err(e) => warn!("Cannot set token cookie: {}", e),
    }
    Ok(response)
}

async fn table_data(state: &AppState, req: &Request<Incoming>) -> Result<HttpResponse, HttpError> {
    authorize(state, req)?;
    let query = req.uri().query().unwrap_or("");
    let filters = FilterState::from_query_pairs(
        url::form_urlencoded::parse(query.as_bytes()),
        state.repository.schema(),
    );
    debug!("Listing with {} active filter(s)", filters.active().count());
    let listing = state.repository.list(&filters).await;
    Ok(json_response(StatusCode::OK, &listing))
}

async fn column_info(state: &AppState, req: &Request<Incoming>) -> Result<HttpResponse, HttpError> {
    authorize(state, req)?;
    let columns = state.repository.columns().await;
    Ok(json_response(StatusCode::OK, &columns))
}

/// Verifies the bearer token of a request.
fn authorize<B>(state: &AppState, req: &Request<B>) -> Result<Claims, HttpError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| HttpError::unauthorized(MISSING_TOKEN))?;
    let value = header
        .to_str()
        .map_err(|_| HttpError::unauthorized(INVALID_TOKEN))?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    state.signer.verify(token).map_err(|e| {
        warn!("Rejected token: {}", e);
        HttpError::unauthorized(INVALID_TOKEN)
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            let mut response = Response::new(Full::new(Bytes::from(bytes)));
            *response.status_mut() = status;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            );
            response
        }
        Err(e) => {
            warn!("Failed to serialize response: {}", e);
            let mut response = Response::new(Full::new(Bytes::new()));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

fn error_response(error: &HttpError) -> HttpResponse {
    json_response(error.status, &error.body())
}
