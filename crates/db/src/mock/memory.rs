use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use eyre::eyre;
use konsul_core::errors::StorageError;
use konsul_core::models::user::normalize_email;
use konsul_core::models::{NewSlot, NewUser, Slot, User, Weekday};
use konsul_core::repositories::{AvailabilityRepository, UserRepository};
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-memory availability store with the same transactional contract as the
/// Postgres repository.
///
/// `replace_all` stages its delete and insert on a working copy that only
/// replaces the committed rows once every step succeeded. Faults can be
/// injected to exercise the rollback path.
#[derive(Default)]
pub struct InMemoryAvailabilityRepository {
    slots: Mutex<Vec<Slot>>,
    fail_inserts: AtomicBool,
    unavailable: AtomicBool,
}

impl InMemoryAvailabilityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the insert phase of every following replace fail after the
    /// delete phase has run.
    pub fn fail_inserts(&self, enabled: bool) {
        self.fail_inserts.store(enabled, Ordering::SeqCst);
    }

    /// Makes every operation fail as if the database were unreachable.
    pub fn set_unavailable(&self, enabled: bool) {
        self.unavailable.store(enabled, Ordering::SeqCst);
    }

    /// Number of committed rows across all owners.
    pub async fn row_count(&self) -> usize {
        self.slots.lock().await.len()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Database(eyre!("connection refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl AvailabilityRepository for InMemoryAvailabilityRepository {
    async fn replace_all(&self, owner_id: Uuid, slots: Vec<NewSlot>) -> Result<(), StorageError> {
        self.check_available()?;
        let mut committed = self.slots.lock().await;

        let mut staged: Vec<Slot> = committed
            .iter()
            .filter(|slot| slot.owner_id != owner_id)
            .cloned()
            .collect();

        if !slots.is_empty() {
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(StorageError::Database(eyre!(
                    "failed to create new availability slots"
                )));
            }

            let now = Utc::now();
            for slot in slots {
                // Mirrors the valid_time_range CHECK constraint.
                if slot.end_time <= slot.start_time {
                    return Err(StorageError::Database(eyre!(
                        "new row violates check constraint \"valid_time_range\""
                    )));
                }
                staged.push(Slot {
                    id: Uuid::new_v4(),
                    owner_id,
                    day: slot.day,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    created_at: now,
                });
            }
        }

        *committed = staged;
        Ok(())
    }

    async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<Slot>, StorageError> {
        self.check_available()?;
        let mut slots: Vec<Slot> = self
            .slots
            .lock()
            .await
            .iter()
            .filter(|slot| slot.owner_id == owner_id)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| (slot.day, slot.start_time));
        Ok(slots)
    }

    async fn get_by_owner_and_day(
        &self,
        owner_id: Uuid,
        day: Weekday,
    ) -> Result<Vec<Slot>, StorageError> {
        self.check_available()?;
        let mut slots: Vec<Slot> = self
            .slots
            .lock()
            .await
            .iter()
            .filter(|slot| slot.owner_id == owner_id && slot.day == day)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| slot.start_time);
        Ok(slots)
    }
}

/// In-memory user store enforcing the same uniqueness rules as the schema.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, StorageError> {
        let mut users = self.users.lock().await;
        let email = normalize_email(&user.email);
        let username = user.username.trim().to_string();

        if users.iter().any(|existing| existing.email == email) {
            return Err(StorageError::DuplicateKey {
                constraint: Some("users_email_key".to_string()),
            });
        }
        if users.iter().any(|existing| existing.username == username) {
            return Err(StorageError::DuplicateKey {
                constraint: Some("users_username_key".to_string()),
            });
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn get_by_email(&self, email: String) -> Result<Option<User>, StorageError> {
        let email = normalize_email(&email);
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }
}
