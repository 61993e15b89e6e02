//! HTTP surface: coordinates in, one consolidated JSON document out.

use actix_web::{App, HttpResponse, HttpServer, web};
use serde::{Deserialize, Serialize};
use skyreport_core::{Aggregator, Coordinate};
use tracing::{error, info};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/weather/{lat}/{lon}", web::get().to(weather_by_path))
        .route("/weather", web::post().to(weather_by_body));
}

pub async fn run(aggregator: Aggregator, bind: &str) -> anyhow::Result<()> {
    let state = web::Data::new(aggregator);

    info!(%bind, "skyreport listening");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind(bind)?
        .run()
        .await?;

    Ok(())
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn weather_by_path(
    aggregator: web::Data<Aggregator>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (lat, lon) = path.into_inner();
    respond(&aggregator, Coordinate::new(lat, lon)).await
}

async fn weather_by_body(aggregator: web::Data<Aggregator>, body: web::Bytes) -> HttpResponse {
    match serde_json::from_slice::<Coordinate>(&body) {
        Ok(coord) => respond(&aggregator, coord).await,
        Err(_) => HttpResponse::BadRequest().json(ErrorBody {
            error: "Invalid request body".to_string(),
        }),
    }
}

async fn respond(aggregator: &Aggregator, coord: Coordinate) -> HttpResponse {
    info!(lat = %coord.lat, lon = %coord.lon, "consolidated request");

    match aggregator.aggregate(&coord).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(err) => {
            error!(error = %err, upstream = %err.upstream(), "aggregation failed");
            HttpResponse::InternalServerError().json(ErrorBody {
                error: err.user_message(),
            })
        }
    }
}
