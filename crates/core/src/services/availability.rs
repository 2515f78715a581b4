use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::{KonsulError, KonsulResult};
use crate::models::{NewSlot, ProposedSlot, Slot, Weekday};
use crate::repositories::AvailabilityRepository;
use crate::schedule::{self, ScheduleError, SlotError};

/// Validates proposed schedules and hands them to the repository for an
/// atomic replace.
#[derive(Clone)]
pub struct AvailabilityService {
    repository: Arc<dyn AvailabilityRepository>,
}

impl AvailabilityService {
    pub fn new(repository: Arc<dyn AvailabilityRepository>) -> Self {
        Self { repository }
    }

    /// Replaces the owner's whole weekly schedule with `proposed`.
    ///
    /// An empty list is rejected; use [`Self::clear_availability`] to remove
    /// every slot. Returns the number of slots written.
    pub async fn set_availability(
        &self,
        owner_id: Uuid,
        proposed: &[ProposedSlot],
    ) -> KonsulResult<usize> {
        if proposed.is_empty() {
            warn!(%owner_id, "Rejected empty availability payload");
            return Err(ScheduleError::Empty.into());
        }

        let slots = schedule::validate_schedule(proposed).map_err(|err| {
            warn!(%owner_id, error = %err, "Availability payload failed validation");
            err
        })?;

        let slots_count = slots.len();
        self.replace(owner_id, slots).await?;
        Ok(slots_count)
    }

    /// Removes every slot of the owner.
    pub async fn clear_availability(&self, owner_id: Uuid) -> KonsulResult<()> {
        self.replace(owner_id, Vec::new()).await
    }

    pub async fn get_availability(&self, owner_id: Uuid) -> KonsulResult<Vec<Slot>> {
        let slots = self.repository.get_by_owner(owner_id).await.map_err(|err| {
            error!(%owner_id, error = %err, "Failed to get availability");
            KonsulError::from(err)
        })?;

        if slots.is_empty() {
            info!(%owner_id, "No availability found for owner");
        }

        Ok(slots)
    }

    /// Rejects an unknown day label before touching storage.
    pub async fn get_availability_by_day(
        &self,
        owner_id: Uuid,
        day: &str,
    ) -> KonsulResult<Vec<Slot>> {
        let day: Weekday = day
            .parse()
            .map_err(|_| SlotError::InvalidDay(day.to_string()))?;

        self.repository
            .get_by_owner_and_day(owner_id, day)
            .await
            .map_err(|err| {
                error!(%owner_id, %day, error = %err, "Failed to get availability by day");
                KonsulError::from(err)
            })
    }

    async fn replace(&self, owner_id: Uuid, slots: Vec<NewSlot>) -> KonsulResult<()> {
        let slots_count = slots.len();
        self.repository
            .replace_all(owner_id, slots)
            .await
            .map_err(|err| {
                error!(%owner_id, error = %err, "Failed to replace availability slots");
                KonsulError::from(err)
            })?;

        info!(%owner_id, slots_count, "Replaced availability slots");
        Ok(())
    }
}
