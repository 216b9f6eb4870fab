//! Connection handling

use crate::api::{dispatch, ApiResponse};
use crate::router::RouteError;
use crate::static_files::{serve_file, FileResponse};
use crate::ServerState;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Handle an incoming HTTP request
pub async fn handle_request(
    state: Arc<ServerState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let mut response = match state.router.route(&path) {
        Ok(route) => {
            let body = req.into_body().collect().await?.to_bytes();
            let api = dispatch(&state, &method, &route, query.as_deref(), &body).await;
            tracing::debug!(%method, %path, status = api.status.as_u16(), "api request");
            into_response(api)
        }
        Err(RouteError::BadPlaceId) => {
            into_response(ApiResponse::text(StatusCode::BAD_REQUEST, "Invalid placeId"))
        }
        Err(RouteError::NoMatch) => static_or_not_found(&state, &path).await,
    };

    let headers = response.headers_mut();
    for (name, value) in &state.extra_headers {
        headers.insert(name.clone(), value.clone());
    }
    Ok(response)
}

async fn static_or_not_found(state: &ServerState, path: &str) -> Response<Full<Bytes>> {
    let Some(root) = state.config.static_root.as_deref() else {
        return into_response(ApiResponse::text(StatusCode::NOT_FOUND, "Not found"));
    };
    match serve_file(root, path, &state.config.index).await {
        FileResponse::Found(response) => response,
        FileResponse::NotFound => into_response(ApiResponse::text(StatusCode::NOT_FOUND, "Not found")),
        FileResponse::Forbidden => into_response(ApiResponse::text(StatusCode::FORBIDDEN, "Forbidden")),
        FileResponse::Error(e) => {
            tracing::warn!(%path, error = %e, "static file error");
            into_response(ApiResponse::text(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ))
        }
    }
}

fn into_response(api: ApiResponse) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(api.body));
    *response.status_mut() = api.status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(api.content_type));
    for (name, value) in api.headers {
        headers.insert(name, value);
    }
    response
}

/// Accept connections on `listener` until the task is dropped
pub async fn serve(listener: TcpListener, state: Arc<ServerState>) {
    loop {
        let (stream, remote_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "accept error");
                continue;
            }
        };

        let state = state.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let state = state.clone();
                async move { handle_request(state, req).await }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                tracing::warn!(%remote_addr, error = %e, "connection error");
            }
        });
    }
}
