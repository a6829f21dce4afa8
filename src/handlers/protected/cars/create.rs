use axum::extract::{Extension, State};

use crate::database::models::Car;
use crate::database::record::CarDraft;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::CarForm;

/// POST /api/cars - create a car owned by the caller
///
/// Fields are validated before any upload is written; uploads are discarded
/// again if the insert fails.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    form: CarForm,
) -> ApiResult<Car> {
    let draft = CarDraft::from_fields(&form.fields)?;
    let images = state.images.store_all(form.images).await?;

    match state.cars.create(user.owner_id, draft, images.clone()).await {
        Ok(car) => Ok(ApiResponse::created(car)),
        Err(e) => {
            state.images.discard(&images).await;
            Err(e.into())
        }
    }
}
