//! HTTP surface: router, handlers, and the JSON records they speak.
//!
//! Every handler follows the same shape: lock the workspace, resolve the
//! active file, run one raster primitive, reply with a small JSON receipt.
//! The mutex is held across the whole decode → mutate → encode sequence, so
//! concurrent edit requests serialize instead of interleaving partial
//! reads and writes on the shared image file.
//!
//! ## Endpoints
//!
//! | Route | Primitive | Ink |
//! |---|---|---|
//! | POST `/save` | upload + workspace cleanup | — |
//! | POST `/pencil_point` | disc | mark |
//! | POST `/pencil_line` | stroke | mark |
//! | POST `/draw_square` | block | mark |
//! | POST `/eraser_click` | disc | erase |
//! | POST `/eraser_line` | stroke | erase |
//! | POST `/eraser_square` | block | erase |
//! | POST `/cut_out` | extract → `cut_image.jpg` | — |
//! | POST `/fillArea` | flood → `filled_image<ext>` | highlight |
//! | POST `/copyCutImage` | transcode crop over active | — |
//!
//! Simple scalar inputs arrive as query parameters; point pairs arrive as
//! JSON bodies (`start_point` / `end_point` as `[x, y]` arrays).

use crate::raster::{
    crop_window, truncate_point, BlockParams, DiscParams, ExtractParams, FloodParams,
    RasterBackend, RasterError, StrokeParams, ERASE, FILL_TOLERANCE, HIGHLIGHT, MARK,
};
use crate::workspace::{Removal, Workspace, WorkspaceError};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Receipt message shared by all successful edit operations.
const MODIFIED: &str = "Image modified successfully";

/// Shared handler state: the workspace behind its single mutex, and the
/// raster backend doing the pixel work.
#[derive(Clone)]
pub struct AppState {
    workspace: Arc<Mutex<Workspace>>,
    raster: Arc<dyn RasterBackend>,
}

/// Build the service router around a workspace and a raster backend.
pub fn router(workspace: Workspace, raster: impl RasterBackend + 'static) -> Router {
    let state = AppState {
        workspace: Arc::new(Mutex::new(workspace)),
        raster: Arc::new(raster),
    };
    Router::new()
        .route("/save", post(save))
        .route("/pencil_point", post(pencil_point))
        .route("/pencil_line", post(pencil_line))
        .route("/draw_square", post(draw_square))
        .route("/eraser_click", post(eraser_click))
        .route("/eraser_line", post(eraser_line))
        .route("/eraser_square", post(eraser_square))
        .route("/cut_out", post(cut_out))
        .route("/fillArea", post(fill_area))
        .route("/copyCutImage", post(copy_cut_image))
        .with_state(state)
}

// ============================================================================
// Errors
// ============================================================================

/// Handler-level error, rendered as `{"detail": ...}` JSON.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl From<WorkspaceError> for ApiError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::NoActiveImage => ApiError::NotFound("Image not found".into()),
            WorkspaceError::InvalidName(name) => {
                ApiError::BadRequest(format!("Invalid upload name {name:?}"))
            }
            WorkspaceError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<RasterError> for ApiError {
    fn from(err: RasterError) -> Self {
        match err {
            // an active path that no longer decodes is as good as missing
            RasterError::Decode { .. } => ApiError::NotFound("Failed to load image".into()),
            RasterError::SeedOutOfBounds(x, y) => ApiError::BadRequest(format!(
                "Invalid coordinates: point ({x}, {y}) is outside the image."
            )),
            RasterError::Io(e) => ApiError::Internal(e.to_string()),
            e @ RasterError::Encode { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(detail) => {
                tracing::error!("request failed: {detail}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let detail = self.to_string();
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

// ============================================================================
// Request and response records
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PointQuery {
    pub x: f64,
    pub y: f64,
    pub thickness: i32,
}

#[derive(Debug, Deserialize)]
pub struct SeedQuery {
    pub x: f64,
    pub y: f64,
}

/// A stroke request: two corner points plus a width.
#[derive(Debug, Deserialize)]
pub struct SegmentRequest {
    pub start_point: (f64, f64),
    pub end_point: (f64, f64),
    pub thickness: i32,
}

/// A rectangle or crop request: just the two corner points.
#[derive(Debug, Deserialize)]
pub struct CornersRequest {
    pub start_point: (f64, f64),
    pub end_point: (f64, f64),
}

/// Outcome of an upload, success or not.
///
/// Cleanup failures are reported through this record with `success: false`
/// rather than as an HTTP error, so the client always gets the same shape
/// back from `/save`.
#[derive(Debug, Serialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub location: String,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EditReceipt {
    pub message: String,
}

impl EditReceipt {
    fn modified() -> Self {
        Self {
            message: MODIFIED.into(),
        }
    }
}

/// Eraser clicks echo the truncated coordinates back to the client.
#[derive(Debug, Serialize)]
pub struct EraseReceipt {
    pub message: String,
    pub x: i32,
    pub y: i32,
}

/// Flood fill reports where the filled copy was written.
#[derive(Debug, Serialize)]
pub struct FillReceipt {
    pub message: String,
    pub image_path: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Build the `success: false` receipt for a failed cleanup removal.
fn upload_failure_receipt(removal: &Removal) -> UploadReceipt {
    let reason = match &removal.result {
        Err(e) => e.to_string(),
        Ok(()) => String::new(),
    };
    UploadReceipt {
        filename: String::new(),
        location: String::new(),
        success: false,
        message: format!(
            "Failed to delete {}. Reason: {reason}",
            removal.path.display()
        ),
    }
}

/// POST /save — store a new active image, clearing the workspace first.
async fn save(
    State(state): State<AppState>,
    Query(query): Query<SaveQuery>,
    body: Bytes,
) -> Result<Json<UploadReceipt>, ApiError> {
    let mut ws = state.workspace.lock().await;

    // best-effort cleanup of every prior file; report the first failure
    // in-band and leave the new upload unwritten
    let removals = ws.clear();
    if let Some(failed) = removals.iter().find(|r| r.failed()) {
        tracing::warn!(path = %failed.path.display(), "workspace cleanup failed");
        return Ok(Json(upload_failure_receipt(failed)));
    }

    let location = ws.store_active(&query.name, &body)?;
    tracing::info!(path = %location.display(), "image path set");

    Ok(Json(UploadReceipt {
        filename: query.name.clone(),
        location: location.display().to_string(),
        success: true,
        message: format!(
            "Upload of {} in {} successful",
            query.name,
            location.display()
        ),
    }))
}

/// POST /pencil_point — filled disc in mark ink.
async fn pencil_point(
    State(state): State<AppState>,
    Query(query): Query<PointQuery>,
) -> Result<Json<EditReceipt>, ApiError> {
    let ws = state.workspace.lock().await;
    let image = ws.active_file()?.to_path_buf();

    state.raster.disc(&DiscParams {
        image,
        center: truncate_point((query.x, query.y)),
        radius: query.thickness,
        ink: MARK,
    })?;
    Ok(Json(EditReceipt::modified()))
}

/// POST /pencil_line — stroke in mark ink.
async fn pencil_line(
    State(state): State<AppState>,
    Json(request): Json<SegmentRequest>,
) -> Result<Json<EditReceipt>, ApiError> {
    tracing::info!(start = ?request.start_point, end = ?request.end_point, "pencil line");
    let ws = state.workspace.lock().await;
    let image = ws.active_file()?.to_path_buf();

    state.raster.stroke(&StrokeParams {
        image,
        start: truncate_point(request.start_point),
        end: truncate_point(request.end_point),
        width: request.thickness,
        ink: MARK,
    })?;
    Ok(Json(EditReceipt::modified()))
}

/// POST /draw_square — filled rectangle in mark ink.
async fn draw_square(
    State(state): State<AppState>,
    Json(request): Json<CornersRequest>,
) -> Result<Json<EditReceipt>, ApiError> {
    tracing::info!(start = ?request.start_point, end = ?request.end_point, "draw square");
    let ws = state.workspace.lock().await;
    let image = ws.active_file()?.to_path_buf();

    state.raster.block(&BlockParams {
        image,
        corner_a: truncate_point(request.start_point),
        corner_b: truncate_point(request.end_point),
        ink: MARK,
    })?;
    Ok(Json(EditReceipt::modified()))
}

/// POST /eraser_click — filled disc in erase ink, echoing the point.
async fn eraser_click(
    State(state): State<AppState>,
    Query(query): Query<PointQuery>,
) -> Result<Json<EraseReceipt>, ApiError> {
    let ws = state.workspace.lock().await;
    let image = ws.active_file()?.to_path_buf();

    let (x, y) = truncate_point((query.x, query.y));
    state.raster.disc(&DiscParams {
        image,
        center: (x, y),
        radius: query.thickness,
        ink: ERASE,
    })?;
    Ok(Json(EraseReceipt {
        message: MODIFIED.into(),
        x,
        y,
    }))
}

/// POST /eraser_line — stroke in erase ink.
async fn eraser_line(
    State(state): State<AppState>,
    Json(request): Json<SegmentRequest>,
) -> Result<Json<EditReceipt>, ApiError> {
    tracing::info!(start = ?request.start_point, end = ?request.end_point, "eraser line");
    let ws = state.workspace.lock().await;
    let image = ws.active_file()?.to_path_buf();

    state.raster.stroke(&StrokeParams {
        image,
        start: truncate_point(request.start_point),
        end: truncate_point(request.end_point),
        width: request.thickness,
        ink: ERASE,
    })?;
    Ok(Json(EditReceipt::modified()))
}

/// POST /eraser_square — filled rectangle in erase ink.
async fn eraser_square(
    State(state): State<AppState>,
    Json(request): Json<CornersRequest>,
) -> Result<Json<EditReceipt>, ApiError> {
    tracing::info!(start = ?request.start_point, end = ?request.end_point, "eraser square");
    let ws = state.workspace.lock().await;
    let image = ws.active_file()?.to_path_buf();

    state.raster.block(&BlockParams {
        image,
        corner_a: truncate_point(request.start_point),
        corner_b: truncate_point(request.end_point),
        ink: ERASE,
    })?;
    Ok(Json(EditReceipt::modified()))
}

/// POST /cut_out — extract the spanned window to `cut_image.jpg`.
async fn cut_out(
    State(state): State<AppState>,
    Json(request): Json<CornersRequest>,
) -> Result<Json<EditReceipt>, ApiError> {
    let mut ws = state.workspace.lock().await;
    let source = ws.active_file()?.to_path_buf();

    let dims = state.raster.identify(&source)?;
    let window = crop_window(
        truncate_point(request.start_point),
        truncate_point(request.end_point),
        (dims.width, dims.height),
    );
    tracing::info!(
        center_x = window.center_x,
        center_y = window.center_y,
        width = window.width,
        height = window.height,
        "cut out"
    );

    if window.is_empty() {
        return Err(ApiError::BadRequest(
            "Invalid coordinates: width or height cannot be zero.".into(),
        ));
    }

    let output = ws.cut_output_path();
    state.raster.extract(&ExtractParams {
        source,
        output: output.clone(),
        window,
    })?;
    ws.set_cut(output);
    Ok(Json(EditReceipt::modified()))
}

/// POST /fillArea — flood-fill a copy of the active image.
async fn fill_area(
    State(state): State<AppState>,
    Query(query): Query<SeedQuery>,
) -> Result<Json<FillReceipt>, ApiError> {
    let ws = state.workspace.lock().await;
    let source = ws.active_file()?.to_path_buf();
    let output = ws.filled_output_path()?;

    state.raster.flood(&FloodParams {
        source,
        output: output.clone(),
        seed: truncate_point((query.x, query.y)),
        tolerance: FILL_TOLERANCE,
        ink: HIGHLIGHT,
    })?;
    Ok(Json(FillReceipt {
        message: MODIFIED.into(),
        image_path: output.display().to_string(),
    }))
}

/// POST /copyCutImage — overwrite the active image with the last crop.
///
/// Fire-and-forget: without a prior crop (or without an upload to write
/// over) there is nothing to do and the request still succeeds.
async fn copy_cut_image(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let ws = state.workspace.lock().await;
    if let (Some(cut), Some(active)) = (ws.cut_file(), ws.active_slot()) {
        state.raster.transcode(cut, active)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::backend::tests::{MockRaster, RecordedOp};
    use crate::raster::Dimensions;
    use std::io;
    use std::path::Path;

    /// State over a temp workspace and a recording mock backend.
    fn mock_state(dims: Vec<Dimensions>) -> (tempfile::TempDir, AppState, Arc<MockRaster>) {
        let tmp = tempfile::TempDir::new().unwrap();
        let workspace = Workspace::open(tmp.path().join("workspace")).unwrap();
        let raster = Arc::new(MockRaster::with_dimensions(dims));
        let state = AppState {
            workspace: Arc::new(Mutex::new(workspace)),
            raster: raster.clone(),
        };
        (tmp, state, raster)
    }

    async fn upload(state: &AppState, name: &str) {
        state
            .workspace
            .lock()
            .await
            .store_active(name, b"pixels")
            .unwrap();
    }

    #[tokio::test]
    async fn pencil_point_truncates_and_uses_mark_ink() {
        let (_tmp, state, raster) = mock_state(vec![]);
        upload(&state, "map.png").await;

        pencil_point(
            State(state),
            Query(PointQuery {
                x: 10.9,
                y: 3.7,
                thickness: 5,
            }),
        )
        .await
        .unwrap();

        let ops = raster.recorded();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Disc(p) if p.center == (10, 3) && p.radius == 5 && p.ink == MARK
        ));
    }

    #[tokio::test]
    async fn eraser_click_echoes_truncated_coordinates() {
        let (_tmp, state, raster) = mock_state(vec![]);
        upload(&state, "map.png").await;

        let Json(receipt) = eraser_click(
            State(state),
            Query(PointQuery {
                x: 4.2,
                y: 8.9,
                thickness: 2,
            }),
        )
        .await
        .unwrap();

        assert_eq!((receipt.x, receipt.y), (4, 8));
        assert_eq!(receipt.message, MODIFIED);
        assert!(matches!(
            &raster.recorded()[0],
            RecordedOp::Disc(p) if p.ink == ERASE
        ));
    }

    #[tokio::test]
    async fn edit_without_upload_is_not_found() {
        let (_tmp, state, raster) = mock_state(vec![]);

        let result = pencil_line(
            State(state),
            Json(SegmentRequest {
                start_point: (0.0, 0.0),
                end_point: (5.0, 5.0),
                thickness: 1,
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(raster.recorded().is_empty());
    }

    #[tokio::test]
    async fn cut_out_with_coincident_corners_is_rejected_before_pixel_work() {
        let (_tmp, state, raster) = mock_state(vec![Dimensions {
            width: 64,
            height: 64,
        }]);
        upload(&state, "map.png").await;

        let result = cut_out(
            State(state),
            Json(CornersRequest {
                start_point: (3.0, 3.0),
                end_point: (3.0, 3.0),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        // only the identify call; no extraction happened
        assert_eq!(raster.recorded().len(), 1);
        assert!(matches!(&raster.recorded()[0], RecordedOp::Identify(_)));
    }

    #[tokio::test]
    async fn cut_out_records_the_output_in_the_cut_slot() {
        let (_tmp, state, raster) = mock_state(vec![Dimensions {
            width: 64,
            height: 64,
        }]);
        upload(&state, "map.png").await;

        cut_out(
            State(state.clone()),
            Json(CornersRequest {
                start_point: (0.0, 0.0),
                end_point: (10.0, 10.0),
            }),
        )
        .await
        .unwrap();

        let ws = state.workspace.lock().await;
        let expected = ws.cut_output_path();
        assert!(matches!(
            &raster.recorded()[1],
            RecordedOp::Extract(p) if p.output == expected
        ));
    }

    #[tokio::test]
    async fn fill_area_targets_the_filled_output() {
        let (_tmp, state, raster) = mock_state(vec![]);
        upload(&state, "map.png").await;

        let Json(receipt) = fill_area(
            State(state),
            Query(SeedQuery { x: 7.5, y: 2.0 }),
        )
        .await
        .unwrap();

        assert!(receipt.image_path.ends_with("filled_image.png"));
        assert!(matches!(
            &raster.recorded()[0],
            RecordedOp::Flood(p)
                if p.seed == (7, 2) && p.tolerance == FILL_TOLERANCE && p.ink == HIGHLIGHT
        ));
    }

    #[tokio::test]
    async fn copy_cut_image_without_a_crop_is_a_no_op() {
        let (_tmp, state, raster) = mock_state(vec![]);
        upload(&state, "map.png").await;

        let status = copy_cut_image(State(state)).await.unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(raster.recorded().is_empty());
    }

    #[test]
    fn upload_failure_receipt_names_path_and_reason() {
        let removal = Removal {
            path: Path::new("/w/stale.png").to_path_buf(),
            result: Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
        };

        let receipt = upload_failure_receipt(&removal);
        assert!(!receipt.success);
        assert!(receipt.filename.is_empty());
        assert!(receipt.message.contains("/w/stale.png"));
        assert!(receipt.message.contains("denied"));
    }
}
