use axum::extract::{Extension, Path, State};

use crate::database::models::Car;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/cars/search/:query - text search over the caller's cars
pub async fn search(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(query): Path<String>,
) -> ApiResult<Vec<Car>> {
    let cars = state.cars.search(user.owner_id, &query).await?;
    Ok(ApiResponse::success(cars))
}
