use async_trait::async_trait;
use chrono::Utc;
use konsul_core::errors::StorageError;
use konsul_core::models::{NewSlot, Slot, Weekday};
use konsul_core::repositories::AvailabilityRepository;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::classify;
use crate::models::DbAvailabilitySlot;

/// Deletes every slot of `owner_id` and inserts `slots` in one transaction.
///
/// The transaction is committed only after both statements succeed. Any
/// early return drops it uncommitted, which rolls the delete back.
pub async fn replace_all(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    slots: &[NewSlot],
) -> Result<(), StorageError> {
    let mut tx = pool.begin().await.map_err(classify)?;

    let deleted = sqlx::query(
        r#"
        DELETE FROM availability_slots
        WHERE owner_id = $1
        "#,
    )
    .bind(owner_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        error!(%owner_id, error = %e, "Failed to delete old availability slots");
        classify(e)
    })?
    .rows_affected();

    if !slots.is_empty() {
        let now = Utc::now();
        let mut insert = QueryBuilder::<Postgres>::new(
            "INSERT INTO availability_slots (id, owner_id, day, start_time, end_time, created_at) ",
        );
        insert.push_values(slots, |mut row, slot| {
            row.push_bind(Uuid::new_v4())
                .push_bind(owner_id)
                .push_bind(slot.day.as_str())
                .push_bind(slot.start_time)
                .push_bind(slot.end_time)
                .push_bind(now);
        });

        insert.build().execute(&mut *tx).await.map_err(|e| {
            error!(%owner_id, error = %e, "Failed to create new availability slots");
            classify(e)
        })?;
    }

    tx.commit().await.map_err(classify)?;

    debug!(
        %owner_id,
        deleted,
        inserted = slots.len(),
        "Availability slots replaced"
    );
    Ok(())
}

pub async fn get_slots_by_owner(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
) -> Result<Vec<Slot>, StorageError> {
    let rows = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        SELECT id, owner_id, day, start_time, end_time, created_at
        FROM availability_slots
        WHERE owner_id = $1
        ORDER BY array_position($2::text[], day::text) ASC, start_time ASC
        "#,
    )
    .bind(owner_id)
    .bind(Weekday::labels())
    .fetch_all(pool)
    .await
    .map_err(classify)?;

    into_slots(rows)
}

pub async fn get_slots_by_owner_and_day(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    day: Weekday,
) -> Result<Vec<Slot>, StorageError> {
    let rows = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        SELECT id, owner_id, day, start_time, end_time, created_at
        FROM availability_slots
        WHERE owner_id = $1 AND day = $2
        ORDER BY start_time ASC
        "#,
    )
    .bind(owner_id)
    .bind(day.as_str())
    .fetch_all(pool)
    .await
    .map_err(classify)?;

    into_slots(rows)
}

fn into_slots(rows: Vec<DbAvailabilitySlot>) -> Result<Vec<Slot>, StorageError> {
    rows.into_iter()
        .map(|row| Slot::try_from(row).map_err(StorageError::Database))
        .collect()
}

/// [`AvailabilityRepository`] backed by Postgres.
#[derive(Clone)]
pub struct PgAvailabilityRepository {
    pool: Pool<Postgres>,
}

impl PgAvailabilityRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PgAvailabilityRepository {
    async fn replace_all(&self, owner_id: Uuid, slots: Vec<NewSlot>) -> Result<(), StorageError> {
        replace_all(&self.pool, owner_id, &slots).await
    }

    async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<Slot>, StorageError> {
        get_slots_by_owner(&self.pool, owner_id).await
    }

    async fn get_by_owner_and_day(
        &self,
        owner_id: Uuid,
        day: Weekday,
    ) -> Result<Vec<Slot>, StorageError> {
        get_slots_by_owner_and_day(&self.pool, owner_id, day).await
    }
}
