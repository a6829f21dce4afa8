//! PostgreSQL car store.
//!
//! Text search runs against a GIN index over the same `to_tsvector` expression
//! used in queries, so the planner can use it.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::database::models::{Car, CarRow};
use crate::database::record::{CarChange, CarUpdate};
use crate::database::search::tsquery_expression;
use crate::database::store::{CarStore, NewCar, StoreError, StoreResult};

const CAR_COLUMNS: &str = "id, title, description, images, \
    tag_car_type, tag_company, tag_dealer, owner, created_at, updated_at";

const SEARCH_VECTOR: &str = "to_tsvector('english', \
    coalesce(title, '') || ' ' || coalesce(description, '') || ' ' || \
    coalesce(tag_car_type, '') || ' ' || coalesce(tag_company, '') || ' ' || \
    coalesce(tag_dealer, ''))";

pub struct PgCarStore {
    pool: PgPool,
}

impl PgCarStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `cars` table and its indexes if missing.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> StoreResult<()> {
        debug!("Running car store migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cars (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL CHECK (length(btrim(title)) > 0),
                description TEXT NOT NULL CHECK (length(btrim(description)) > 0),
                images TEXT[] NOT NULL DEFAULT '{}',
                tag_car_type TEXT,
                tag_company TEXT,
                tag_dealer TEXT,
                owner UUID NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(format!("Failed to create cars table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS cars_owner_idx ON cars (owner)")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(format!("Failed to create owner index: {e}")))?;

        let text_index = format!(
            "CREATE INDEX IF NOT EXISTS cars_text_idx ON cars USING GIN ({SEARCH_VECTOR})"
        );
        sqlx::query(&text_index)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(format!("Failed to create text index: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl CarStore for PgCarStore {
    #[instrument(skip(self, car), fields(owner = %car.owner))]
    async fn insert(&self, car: NewCar) -> StoreResult<Car> {
        let sql = format!(
            "INSERT INTO cars \
             (id, title, description, images, tag_car_type, tag_company, tag_dealer, owner) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {CAR_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CarRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(car.title)
            .bind(car.description)
            .bind(car.images)
            .bind(car.tags.car_type)
            .bind(car.tags.company)
            .bind(car.tags.dealer)
            .bind(car.owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn find_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Car>> {
        let sql = format!("SELECT {CAR_COLUMNS} FROM cars WHERE owner = $1 ORDER BY created_at");
        let rows = sqlx::query_as::<_, CarRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn find_one(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Car>> {
        let sql = format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = $1 AND owner = $2");
        let row = sqlx::query_as::<_, CarRow>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Car::from))
    }

    #[instrument(skip(self, update))]
    async fn find_one_and_update(
        &self,
        owner: Uuid,
        id: Uuid,
        update: &CarUpdate,
    ) -> StoreResult<Option<Car>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE cars SET updated_at = NOW()");

        for change in update.changes() {
            match change {
                CarChange::Title(title) => {
                    builder.push(", title = ").push_bind(title.clone());
                }
                CarChange::Description(description) => {
                    builder.push(", description = ").push_bind(description.clone());
                }
                CarChange::Tags(tags) => {
                    builder.push(", tag_car_type = ").push_bind(tags.car_type.clone());
                    builder.push(", tag_company = ").push_bind(tags.company.clone());
                    builder.push(", tag_dealer = ").push_bind(tags.dealer.clone());
                }
            }
        }
        if let Some(images) = update.images() {
            builder.push(", images = ").push_bind(images.to_vec());
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" AND owner = ").push_bind(owner);
        builder.push(" RETURNING ").push(CAR_COLUMNS);

        let row = builder
            .build_query_as::<CarRow>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Car::from))
    }

    async fn find_one_and_delete(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Car>> {
        let sql = format!("DELETE FROM cars WHERE id = $1 AND owner = $2 RETURNING {CAR_COLUMNS}");
        let row = sqlx::query_as::<_, CarRow>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Car::from))
    }

    async fn search(&self, owner: Uuid, terms: &[String]) -> StoreResult<Vec<Car>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {CAR_COLUMNS} FROM cars \
             WHERE owner = $1 AND {SEARCH_VECTOR} @@ to_tsquery('english', $2) \
             ORDER BY created_at"
        );
        let rows = sqlx::query_as::<_, CarRow>(&sql)
            .bind(owner)
            .bind(tsquery_expression(terms))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
