use actix_files::Files;
use actix_web::error::InternalError;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

use crate::event::{validate_settings, EventSettings};
use crate::export::write_slots_csv;
use crate::slots::{validate_with, BoardError, Slot, SlotBoard, SlotEdit, ValidationReport};

// In-memory form state, one board per running server
pub struct AppState {
    pub settings: Mutex<EventSettings>,
    pub board: Mutex<SlotBoard>,
}

impl AppState {
    pub fn new(board: SlotBoard) -> Self {
        Self {
            settings: Mutex::new(EventSettings::default()),
            board: Mutex::new(board),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    slots: Vec<Slot>,
    report: Option<ValidationReport>,
    warnings: Vec<&'static str>,
    error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    settings: EventSettings,
    settings_error: Option<String>,
    board: BoardResponse,
}

#[derive(Deserialize)]
pub struct ValidateQuery {
    strict: Option<bool>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("state lock poisoned"))
}

fn board_response(board: &mut SlotBoard) -> BoardResponse {
    match board.report() {
        Ok(report) => BoardResponse {
            slots: board.slots().to_vec(),
            warnings: crate::display::report_warnings(&report),
            report: Some(report),
            error: None,
        },
        Err(e) => BoardResponse {
            slots: board.slots().to_vec(),
            report: None,
            warnings: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

fn error_json(message: String) -> serde_json::Value {
    serde_json::json!({"success": false, "error": message})
}

// Malformed bodies, paths and queries answer 400 with the same JSON shape as handler errors
fn reject_payload<E>(err: E, req: &HttpRequest) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    tracing::warn!(path = %req.path(), error = %err, "rejected request");
    let response = HttpResponse::BadRequest().json(error_json(err.to_string()));
    InternalError::from_response(err, response).into()
}

// Event settings endpoints
async fn get_event(state: web::Data<AppState>) -> Result<HttpResponse> {
    let settings = lock(&state.settings)?.clone();
    let mut board = lock(&state.board)?;
    Ok(HttpResponse::Ok().json(SettingsResponse {
        settings_error: validate_settings(&settings).err(),
        settings,
        board: board_response(&mut board),
    }))
}

async fn put_event(
    req: web::Json<EventSettings>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let new_settings = req.into_inner();
    let mut settings = lock(&state.settings)?;
    let mut board = lock(&state.board)?;

    // renaming the event must not wipe the slots; only a count change does
    let new_count = new_settings.slot_count();
    if new_count != settings.slot_count() {
        if let Err(e) = board.resize(new_count) {
            tracing::warn!(slots = new_count, error = %e, "rejected slots per day");
            return Ok(HttpResponse::UnprocessableEntity().json(error_json(e.to_string())));
        }
        tracing::info!(slots = new_count, "slots per day changed");
    }
    *settings = new_settings;

    Ok(HttpResponse::Ok().json(SettingsResponse {
        settings_error: validate_settings(&settings).err(),
        settings: settings.clone(),
        board: board_response(&mut board),
    }))
}

// Slot endpoints
async fn get_slots(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut board = lock(&state.board)?;
    Ok(HttpResponse::Ok().json(board_response(&mut board)))
}

async fn patch_slot(
    index: web::Path<usize>,
    edit: web::Json<SlotEdit>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let index = index.into_inner();
    let mut board = lock(&state.board)?;

    match board.update(index, edit.into_inner()) {
        Ok(()) => Ok(HttpResponse::Ok().json(board_response(&mut board))),
        Err(e @ BoardError::NoSuchSlot { .. }) => {
            Ok(HttpResponse::NotFound().json(error_json(e.to_string())))
        }
        Err(e) => {
            tracing::warn!(index, error = %e, "rejected slot edit");
            Ok(HttpResponse::UnprocessableEntity().json(error_json(e.to_string())))
        }
    }
}

async fn get_validation(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut board = lock(&state.board)?;
    match board.report() {
        Ok(report) => Ok(HttpResponse::Ok().json(report)),
        Err(e) => Ok(HttpResponse::UnprocessableEntity().json(error_json(e.to_string()))),
    }
}

// Stateless validation of a posted slot list
async fn post_validate(
    slots: web::Json<Vec<Slot>>,
    query: web::Query<ValidateQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let policy = match query.strict {
        Some(true) => crate::slots::TimePolicy::Strict,
        Some(false) => crate::slots::TimePolicy::Lenient,
        None => lock(&state.board)?.time_policy(),
    };
    match validate_with(&slots, policy) {
        Ok(report) => Ok(HttpResponse::Ok().json(report)),
        Err(e) => Ok(HttpResponse::UnprocessableEntity().json(error_json(e.to_string()))),
    }
}

async fn export_slots(state: web::Data<AppState>) -> Result<HttpResponse> {
    let board = lock(&state.board)?;
    let mut body = Vec::new();
    write_slots_csv(board.slots(), &mut body)
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to export: {}", e)))?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(("Content-Disposition", "attachment; filename=\"slots.csv\""))
        .body(body))
}

// HTML page handler
async fn dashboard() -> Result<HttpResponse> {
    let html = include_str!("../templates/dashboard.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// JSON API routes, shared by the server and the handler tests
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(reject_payload))
        .app_data(web::PathConfig::default().error_handler(reject_payload))
        .app_data(web::QueryConfig::default().error_handler(reject_payload))
        .route("/api/event", web::get().to(get_event))
        .route("/api/event", web::put().to(put_event))
        .route("/api/slots", web::get().to(get_slots))
        .route("/api/slots/validation", web::get().to(get_validation))
        .route("/api/slots/export", web::get().to(export_slots))
        .route("/api/slots/{index}", web::patch().to(patch_slot))
        .route("/api/validate", web::post().to(post_validate));
}

pub async fn start_server(bind_address: String, port: u16, board: SlotBoard) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(board));

    tracing::info!(%bind_address, port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .route("/", web::get().to(dashboard))
            .configure(api_routes)
    })
    .bind((bind_address.as_str(), port))?
    .run()
    .await
}
