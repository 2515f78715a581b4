//! Storage contracts implemented by `konsul-db`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::StorageError;
use crate::models::{NewSlot, NewUser, Slot, User, Weekday};

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Atomically discards every slot of `owner_id` and installs `slots`.
    ///
    /// On error the previous schedule is left exactly as it was. An empty
    /// `slots` leaves the owner with no availability.
    async fn replace_all(&self, owner_id: Uuid, slots: Vec<NewSlot>) -> Result<(), StorageError>;

    /// All slots of an owner, ordered by canonical weekday then start time.
    async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<Slot>, StorageError>;

    /// Slots of an owner on one day, ordered by start time.
    async fn get_by_owner_and_day(
        &self,
        owner_id: Uuid,
        day: Weekday,
    ) -> Result<Vec<Slot>, StorageError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with [`StorageError::DuplicateKey`] when the email or username is taken.
    async fn create(&self, user: NewUser) -> Result<User, StorageError>;

    async fn get_by_email(&self, email: String) -> Result<Option<User>, StorageError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError>;
}
