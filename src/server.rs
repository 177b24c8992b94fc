//! REST API for ragstore.
//!
//! Serves one in-memory [`SharedStore`] over JSON. Searches run concurrently;
//! additions are serialized by the store's write lock. Nothing is persisted.
//!
//! ## Endpoints
//!
//! - `POST /add` - Add raw vectors with payloads
//! - `POST /search` - Search with raw query vectors
//! - `POST /ingest` - Embed and add text documents
//! - `POST /ask` - Answer a question from the closest documents
//! - `GET /stats` - Record count and dimension
//!
//! ## Usage
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpServer};
//! use ragstore::{server::AppState, Settings};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let state = web::Data::new(AppState::from_settings(&Settings::default()).unwrap());
//!     HttpServer::new(move || App::new().app_data(state.clone()).configure(ragstore::server::config))
//!         .bind("127.0.0.1:7878")?
//!         .run()
//!         .await
//! }
//! ```

use actix_web::{web, HttpResponse, Responder};
use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::answer::ExtractiveSynthesizer;
use crate::config::Settings;
use crate::embed::HashingEmbedder;
use crate::error::{Result, StoreError};
use crate::pipeline::{DefaultPipeline, RagPipeline};


/// Everything the handlers share across workers.
///
/// Raw-vector requests use the pipeline's store directly, so `/add` and
/// `/ingest` write into the same records.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: DefaultPipeline,
    pub default_top_k: usize,
}

impl AppState {
    pub fn new(pipeline: DefaultPipeline, default_top_k: usize) -> Self {
        Self { pipeline, default_top_k }
    }

    /// Builds an empty store with the configured embedder.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let pipeline = RagPipeline::new(
            HashingEmbedder::new(settings.embedding_dimension)?,
            ExtractiveSynthesizer,
        );
        Ok(Self::new(pipeline, settings.default_top_k))
    }
}


// --- Request structs ---

#[derive(Deserialize)]
struct RecordEntry {
    payload: String,
    vector: Vec<f64>,
}

#[derive(Deserialize)]
struct Query {
    vector: Vec<f64>,
    top_k: Option<usize>,
}

#[derive(Deserialize)]
struct AddRequest {
    records: Vec<RecordEntry>,
}

#[derive(Deserialize)]
struct SearchRequest {
    queries: Vec<Query>,
}

#[derive(Deserialize)]
struct IngestRequest {
    documents: Vec<String>,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
    top_k: Option<usize>,
}

// --- Response structs ---

#[derive(Serialize)]
struct AddResponse {
    added: usize,
    results: Vec<AddResult>,
}

#[derive(Serialize)]
struct AddResult {
    payload: String,
    status: String,
    message: String,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchResultGroup>,
}

#[derive(Serialize)]
struct SearchResultGroup {
    matches: Vec<MatchResult>,
    message: String,
}

#[derive(Serialize)]
struct MatchResult {
    payload: String,
    score: f64,
}

#[derive(Serialize)]
struct IngestResponse {
    added: usize,
}

#[derive(Serialize)]
struct StatsResponse {
    count: usize,
    dimension: Option<usize>,
}


fn error_response(e: &StoreError) -> HttpResponse {
    let body = serde_json::json!({"error": e.to_string()});
    if e.is_caller_error() {
        HttpResponse::BadRequest().json(body)
    } else {
        HttpResponse::InternalServerError().json(body)
    }
}

// --- Handlers ---

async fn add_handler(state: web::Data<AppState>, body: web::Json<AddRequest>) -> impl Responder {
    let mut results = Vec::new();
    let mut added = 0;

    for entry in &body.records {
        match state.pipeline.store().add(entry.vector.clone(), entry.payload.clone()) {
            Ok(()) => {
                added += 1;
                results.push(AddResult {
                    payload: entry.payload.clone(),
                    status: "ok".to_string(),
                    message: "Added".to_string(),
                });
            }
            Err(e) => {
                warn!(error = %e, "add rejected");
                results.push(AddResult {
                    payload: entry.payload.clone(),
                    status: "error".to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    HttpResponse::Ok().json(AddResponse { added, results })
}

async fn search_handler(state: web::Data<AppState>, body: web::Json<SearchRequest>) -> impl Responder {
    let mut results = Vec::new();

    for query in &body.queries {
        let top_k = query.top_k.unwrap_or(state.default_top_k);
        match state.pipeline.store().search_scored_owned(&query.vector, top_k) {
            Ok(hits) => {
                results.push(SearchResultGroup {
                    matches: hits.into_iter()
                        .map(|(payload, score)| MatchResult { payload, score })
                        .collect(),
                    message: "Search Success".to_string(),
                });
            }
            Err(e) => {
                results.push(SearchResultGroup {
                    matches: Vec::new(),
                    message: e.to_string(),
                });
            }
        }
    }

    HttpResponse::Ok().json(SearchResponse { results })
}

async fn ingest_handler(state: web::Data<AppState>, body: web::Json<IngestRequest>) -> impl Responder {
    match state.pipeline.ingest(&body.documents) {
        Ok(added) => HttpResponse::Ok().json(IngestResponse { added }),
        Err(e) => {
            warn!(error = %e, "ingest failed");
            error_response(&e)
        }
    }
}

async fn ask_handler(state: web::Data<AppState>, body: web::Json<AskRequest>) -> impl Responder {
    let top_k = body.top_k.unwrap_or(state.default_top_k);
    match state.pipeline.ask(&body.question, top_k) {
        Ok(answer) => HttpResponse::Ok().json(answer),
        Err(e) => {
            warn!(error = %e, "ask failed");
            error_response(&e)
        }
    }
}

async fn stats_handler(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(StatsResponse {
        count: state.pipeline.store().len(),
        dimension: state.pipeline.store().dimension(),
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/add").route(web::post().to(add_handler)))
       .service(web::resource("/search").route(web::post().to(search_handler)))
       .service(web::resource("/ingest").route(web::post().to(ingest_handler)))
       .service(web::resource("/ask").route(web::post().to(ask_handler)))
       .service(web::resource("/stats").route(web::get().to(stats_handler)));
}
