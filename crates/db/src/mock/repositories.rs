use async_trait::async_trait;
use konsul_core::errors::StorageError;
use konsul_core::models::{NewSlot, NewUser, Slot, User, Weekday};
use konsul_core::repositories::{AvailabilityRepository, UserRepository};
use mockall::mock;
use uuid::Uuid;

// Mock repositories for testing
mock! {
    pub AvailabilityRepo {}

    #[async_trait]
    impl AvailabilityRepository for AvailabilityRepo {
        async fn replace_all(&self, owner_id: Uuid, slots: Vec<NewSlot>) -> Result<(), StorageError>;

        async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<Slot>, StorageError>;

        async fn get_by_owner_and_day(
            &self,
            owner_id: Uuid,
            day: Weekday,
        ) -> Result<Vec<Slot>, StorageError>;
    }
}

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn create(&self, user: NewUser) -> Result<User, StorageError>;

        async fn get_by_email(&self, email: String) -> Result<Option<User>, StorageError>;

        async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError>;
    }
}
