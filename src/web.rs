use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use serde::Deserialize;

use crate::backend::ResetMode;
use crate::display::write_matrix_csv;
use crate::error::ScheduleError;
use crate::orchestrator::{GenerateOptions, ScheduleData};

pub struct AppState {
    pub schedule: ScheduleData,
    pub admin_password: String,
}

#[derive(Deserialize)]
pub struct LoadRequest {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
pub struct ResetBody {
    mode: ResetMode,
    #[serde(default)]
    confirm: bool,
}

/// Maps an orchestrator error to a JSON error response
fn error_response(err: &ScheduleError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    match err {
        ScheduleError::Busy | ScheduleError::Superseded => HttpResponse::Conflict().json(body),
        ScheduleError::NoPreview | ScheduleError::ConfirmationRequired | ScheduleError::NotLoaded => {
            HttpResponse::BadRequest().json(body)
        }
        ScheduleError::Transport(_) | ScheduleError::Status { .. } | ScheduleError::InvalidResponse(_) => {
            HttpResponse::BadGateway().json(body)
        }
        ScheduleError::Csv(_) | ScheduleError::Io(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn is_admin(req: &HttpRequest, state: &AppState) -> bool {
    let password = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    password == state.admin_password
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"}))
}

/// Current matrix view model
async fn get_matrix(state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.schedule.view() {
        Ok(view) => Ok(HttpResponse::Ok().json(&*view)),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn get_status(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "phase": state.schedule.phase(),
        "busy": state.schedule.is_busy(),
        "last_error": state.schedule.last_error(),
        "pending_preview": state.schedule.pending_preview(),
    })))
}

async fn load_month(req: web::Json<LoadRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.schedule.load(req.year, req.month).await {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn generate(req: web::Json<GenerateOptions>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.schedule.generate(req.into_inner()).await {
        Ok(pinned) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "request": pinned}))),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn shuffle(state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.schedule.shuffle().await {
        Ok(pinned) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "request": pinned}))),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn save(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }
    match state.schedule.save().await {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn reset(req: HttpRequest, body: web::Json<ResetBody>, state: web::Data<AppState>) -> Result<HttpResponse> {
    if !is_admin(&req, &state) {
        return Ok(unauthorized());
    }
    let result = match body.mode {
        ResetMode::Soft => state.schedule.reset_soft(body.confirm).await,
        ResetMode::Hard => state.schedule.reset_hard(body.confirm).await,
    };
    match result {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Err(err) => Ok(error_response(&err)),
    }
}

async fn validate(state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.schedule.validate().await {
        Ok(report) => Ok(HttpResponse::Ok().json(report)),
        Err(err) => Ok(error_response(&err)),
    }
}

/// Local CSV rendering of the matrix on screen, preview included
async fn export_csv(state: web::Data<AppState>) -> Result<HttpResponse> {
    let view = match state.schedule.view() {
        Ok(view) => view,
        Err(err) => return Ok(error_response(&err)),
    };
    let mut out = Vec::new();
    if let Err(err) = write_matrix_csv(&view, &mut out) {
        return Ok(error_response(&err));
    }
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"lich-{}-{:02}.csv\"", view.year, view.month),
        ))
        .body(out))
}

/// Registers the API routes on an app
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/matrix", web::get().to(get_matrix))
        .route("/api/status", web::get().to(get_status))
        .route("/api/load", web::post().to(load_month))
        .route("/api/generate", web::post().to(generate))
        .route("/api/shuffle", web::post().to(shuffle))
        .route("/api/save", web::post().to(save))
        .route("/api/reset", web::post().to(reset))
        .route("/api/validate", web::get().to(validate))
        .route("/api/export.csv", web::get().to(export_csv));
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
