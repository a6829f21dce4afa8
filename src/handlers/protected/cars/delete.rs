use axum::extract::{Extension, Path, State};

use crate::database::models::Car;
use crate::database::parse_car_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// DELETE /api/cars/:id - returns the removed record
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Car> {
    let id = parse_car_id(&id)?;
    let car = state.cars.delete(user.owner_id, id).await?;
    Ok(ApiResponse::success(car))
}
