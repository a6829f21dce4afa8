use axum::extract::{Extension, State};

use crate::database::models::Car;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/cars - every car of the caller
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Car>> {
    let cars = state.cars.list_by_owner(user.owner_id).await?;
    Ok(ApiResponse::success(cars))
}
