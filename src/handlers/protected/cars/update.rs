use axum::extract::{Extension, Path, State};

use crate::database::models::Car;
use crate::database::parse_car_id;
use crate::database::record::CarUpdate;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::CarForm;

/// PATCH /api/cars/:id - allow-listed partial update, optionally replacing images
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    form: CarForm,
) -> ApiResult<Car> {
    // Allow-list check comes first: a rejected body never reaches the store
    let update = CarUpdate::from_fields(&form.fields)?;
    let id = parse_car_id(&id)?;

    let images = state.images.store_all(form.images).await?;
    let update = update.with_images(images.clone());

    match state.cars.update(user.owner_id, id, update).await {
        Ok(car) => Ok(ApiResponse::success(car)),
        Err(e) => {
            state.images.discard(&images).await;
            Err(e.into())
        }
    }
}
