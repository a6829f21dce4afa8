use axum::extract::{Extension, Path, State};

use crate::database::models::Car;
use crate::database::parse_car_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/cars/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Car> {
    let id = parse_car_id(&id)?;
    let car = state.cars.get_by_id(user.owner_id, id).await?;
    Ok(ApiResponse::success(car))
}
