use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::metrics;
use crate::prober::http::probe_http;
use crate::report::build_report;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckResponse {
    result: String,
}

#[derive(Debug, Serialize)]
struct ErrorMessage {
    message: String,
}

pub fn routes(
    client: Client,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let check = warp::path!("check")
        .and(warp::post())
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with_client(client))
        .and_then(handle_check);

    check
        .or(metrics::metrics_route())
        .recover(handle_rejection)
}

fn with_client(
    client: Client,
) -> impl Filter<Extract = (Client,), Error = Infallible> + Clone {
    warp::any().map(move || client.clone())
}

async fn handle_check(
    req: CheckRequest,
    client: Client,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    let url = match req.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            return Ok(json_with_status(
                StatusCode::BAD_REQUEST,
                &ErrorMessage {
                    message: "URL no proporcionada en el cuerpo de la solicitud.".to_string(),
                },
            ));
        }
    };

    let result = probe_http(&client, &url).await;
    match &result.failure {
        Some(failure) => info!(url = %url, failure = ?failure, "probe failed"),
        None => info!(
            url = %url,
            status = result.status.unwrap_or_default(),
            elapsed_ms = result.elapsed_ms.unwrap_or_default(),
            "probe completed"
        ),
    }

    let diagnosis = build_report(&url, &result);
    metrics::observe_check(diagnosis.outcome.as_label(), result.elapsed_ms);

    // Probe failures are part of the report; the outer reply stays 200.
    Ok(json_with_status(
        StatusCode::OK,
        &CheckResponse {
            result: diagnosis.text,
        },
    ))
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (
            StatusCode::BAD_REQUEST,
            "Cuerpo de la solicitud JSON inválido.".to_string(),
        )
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Ruta no encontrada.".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Método no permitido.".to_string(),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Cuerpo de la solicitud demasiado grande.".to_string(),
        )
    } else {
        error!(rejection = ?err, "unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error interno del servidor: {err:?}"),
        )
    };
    Ok(json_with_status(status, &ErrorMessage { message }))
}

fn json_with_status<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}
