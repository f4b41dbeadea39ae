//! Screen Registry
//!
//! Holds the kitchen screen configuration: which register a screen serves and
//! which product categories it may display. At most one active screen per
//! register; screens are archived, never deleted.

use crate::db::{KitchenStorage, StorageError};
use crate::services::CatalogService;
use redb::WriteTransaction;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AllowedCategories, KitchenScreen, NEW_SEQUENCE, Register, ScreenCreate, ScreenLaunch,
    ScreenUpdate,
};
use thiserror::Error;

/// Sequence code used for screen names
pub const SCREEN_SEQUENCE_CODE: &str = "kitchen.screen";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Register {register_id} already has kitchen screen {sequence}")]
    RegisterAlreadyBound { register_id: i64, sequence: String },

    #[error("Kitchen screen not found: {0}")]
    ScreenNotFound(i64),

    #[error("Register not found: {0}")]
    RegisterNotFound(i64),
}

impl From<redb::CommitError> for RegistryError {
    fn from(err: redb::CommitError) -> Self {
        Self::Storage(err.into())
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Storage(e) => e.into(),
            RegistryError::RegisterAlreadyBound {
                register_id,
                ref sequence,
            } => AppError::with_message(ErrorCode::RegisterAlreadyBound, err.to_string())
                .with_detail("register_id", register_id)
                .with_detail("sequence", sequence.clone()),
            RegistryError::ScreenNotFound(id) => {
                AppError::with_message(ErrorCode::ScreenNotFound, err.to_string())
                    .with_detail("screen_id", id)
            }
            RegistryError::RegisterNotFound(id) => {
                AppError::with_message(ErrorCode::RegisterNotFound, err.to_string())
                    .with_detail("register_id", id)
            }
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Kitchen screen configuration store
#[derive(Debug, Clone)]
pub struct ScreenRegistry {
    storage: KitchenStorage,
}

impl ScreenRegistry {
    pub fn new(storage: KitchenStorage) -> Self {
        Self { storage }
    }

    /// Create a screen for a register that has no active screen yet
    pub fn register(&self, create: ScreenCreate) -> RegistryResult<KitchenScreen> {
        let txn = self.storage.begin_write()?;
        self.ensure_unbound(&txn, create.register_id, None)?;

        let sequence = match create.sequence {
            Some(seq) if !seq.is_empty() && seq != NEW_SEQUENCE => seq,
            _ => {
                let n = self.storage.next_sequence(&txn, SCREEN_SEQUENCE_CODE)?;
                format!("KS{:04}", n)
            }
        };

        let screen = KitchenScreen {
            id: self.storage.next_screen_id(&txn)?,
            sequence,
            register_id: create.register_id,
            category_ids: normalize(create.category_ids),
            is_active: true,
            created_at: shared::util::now_millis(),
        };
        self.storage.store_screen(&txn, &screen)?;
        txn.commit()?;

        tracing::info!(
            screen_id = screen.id,
            sequence = %screen.sequence,
            register_id = screen.register_id,
            categories = screen.category_ids.len(),
            "Kitchen screen registered"
        );
        Ok(screen)
    }

    /// Categories the screen may display
    pub fn allowed_categories(&self, screen: &KitchenScreen) -> AllowedCategories {
        AllowedCategories::from_ids(&screen.category_ids)
    }

    /// Active screen serving the register
    pub fn find_by_register(&self, register_id: i64) -> RegistryResult<Option<KitchenScreen>> {
        Ok(self
            .storage
            .all_screens()?
            .into_iter()
            .find(|s| s.is_active && s.register_id == register_id))
    }

    /// Restaurant registers with no active screen bound
    pub fn candidate_registers(&self, catalog: &CatalogService) -> RegistryResult<Vec<Register>> {
        let bound: Vec<i64> = self
            .storage
            .all_screens()?
            .into_iter()
            .filter(|s| s.is_active)
            .map(|s| s.register_id)
            .collect();

        Ok(catalog
            .list_registers()
            .into_iter()
            .filter(|r| r.is_restaurant && !bound.contains(&r.id))
            .collect())
    }

    pub fn list(&self, include_inactive: bool) -> RegistryResult<Vec<KitchenScreen>> {
        Ok(self
            .storage
            .all_screens()?
            .into_iter()
            .filter(|s| include_inactive || s.is_active)
            .collect())
    }

    pub fn get(&self, id: i64) -> RegistryResult<KitchenScreen> {
        self.storage
            .get_screen(id)?
            .ok_or(RegistryError::ScreenNotFound(id))
    }

    /// Change the allow-list or re-bind the screen to another register
    pub fn update(&self, id: i64, update: ScreenUpdate) -> RegistryResult<KitchenScreen> {
        let txn = self.storage.begin_write()?;
        let mut screen = self.screen_txn(&txn, id)?;

        if let Some(register_id) = update.register_id
            && register_id != screen.register_id
        {
            if screen.is_active {
                self.ensure_unbound(&txn, register_id, Some(id))?;
            }
            screen.register_id = register_id;
        }
        if let Some(category_ids) = update.category_ids {
            screen.category_ids = normalize(category_ids);
        }

        self.storage.store_screen(&txn, &screen)?;
        txn.commit()?;

        tracing::info!(screen_id = id, register_id = screen.register_id, "Kitchen screen updated");
        Ok(screen)
    }

    /// Soft delete: the register becomes free for another screen
    pub fn archive(&self, id: i64) -> RegistryResult<KitchenScreen> {
        self.set_active(id, false)
    }

    /// Re-activate an archived screen if its register is still free
    pub fn restore(&self, id: i64) -> RegistryResult<KitchenScreen> {
        self.set_active(id, true)
    }

    /// Title and register a screen client needs to open its view
    pub fn launch_info(&self, id: i64, catalog: &CatalogService) -> RegistryResult<ScreenLaunch> {
        let screen = self.get(id)?;
        let register = catalog
            .get_register(screen.register_id)
            .ok_or(RegistryError::RegisterNotFound(screen.register_id))?;

        Ok(ScreenLaunch {
            screen_id: screen.id,
            register_id: register.id,
            title: format!("Kitchen Screen: {}", register.name),
        })
    }

    fn set_active(&self, id: i64, is_active: bool) -> RegistryResult<KitchenScreen> {
        let txn = self.storage.begin_write()?;
        let mut screen = self.screen_txn(&txn, id)?;
        if screen.is_active == is_active {
            return Ok(screen);
        }
        if is_active {
            self.ensure_unbound(&txn, screen.register_id, Some(id))?;
        }

        screen.is_active = is_active;
        self.storage.store_screen(&txn, &screen)?;
        txn.commit()?;

        tracing::info!(screen_id = id, is_active, "Kitchen screen active flag changed");
        Ok(screen)
    }

    fn screen_txn(&self, txn: &WriteTransaction, id: i64) -> RegistryResult<KitchenScreen> {
        self.storage
            .all_screens_txn(txn)?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(RegistryError::ScreenNotFound(id))
    }

    /// Fails when another active screen already serves the register
    fn ensure_unbound(
        &self,
        txn: &WriteTransaction,
        register_id: i64,
        except: Option<i64>,
    ) -> RegistryResult<()> {
        let existing = self
            .storage
            .all_screens_txn(txn)?
            .into_iter()
            .find(|s| s.is_active && s.register_id == register_id && Some(s.id) != except);

        match existing {
            Some(screen) => {
                tracing::warn!(
                    register_id,
                    existing_screen = screen.id,
                    "Register already bound to a kitchen screen"
                );
                Err(RegistryError::RegisterAlreadyBound {
                    register_id,
                    sequence: screen.sequence,
                })
            }
            None => Ok(()),
        }
    }
}

fn normalize(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ScreenRegistry {
        ScreenRegistry::new(KitchenStorage::open_in_memory().unwrap())
    }

    fn create(register_id: i64, category_ids: Vec<i64>) -> ScreenCreate {
        ScreenCreate {
            register_id,
            category_ids,
            sequence: None,
        }
    }

    #[test]
    fn test_register_generates_sequence() {
        let registry = registry();
        let first = registry.register(create(1, vec![])).unwrap();
        let second = registry
            .register(ScreenCreate {
                sequence: Some(NEW_SEQUENCE.to_string()),
                ..create(2, vec![])
            })
            .unwrap();
        let named = registry
            .register(ScreenCreate {
                sequence: Some("BAR".to_string()),
                ..create(3, vec![])
            })
            .unwrap();

        assert_eq!(first.sequence, "KS0001");
        assert_eq!(second.sequence, "KS0002");
        assert_eq!(named.sequence, "BAR");
    }

    #[test]
    fn test_second_active_screen_for_register_fails() {
        let registry = registry();
        registry.register(create(1, vec![])).unwrap();

        let err = registry.register(create(1, vec![5])).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::RegisterAlreadyBound { register_id: 1, .. }
        ));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::RegisterAlreadyBound);
        assert_eq!(registry.list(true).unwrap().len(), 1);
    }

    #[test]
    fn test_archive_frees_register_and_restore_is_validated() {
        let registry = registry();
        let old = registry.register(create(1, vec![])).unwrap();

        registry.archive(old.id).unwrap();
        assert!(registry.find_by_register(1).unwrap().is_none());

        let new = registry.register(create(1, vec![])).unwrap();
        assert_eq!(registry.find_by_register(1).unwrap().unwrap().id, new.id);

        assert!(matches!(
            registry.restore(old.id),
            Err(RegistryError::RegisterAlreadyBound { .. })
        ));
        assert_eq!(registry.list(false).unwrap().len(), 1);
        assert_eq!(registry.list(true).unwrap().len(), 2);
    }

    #[test]
    fn test_allowed_categories_empty_means_all() {
        let registry = registry();
        let open = registry.register(create(1, vec![])).unwrap();
        let grill = registry.register(create(2, vec![7, 3, 7])).unwrap();

        assert_eq!(registry.allowed_categories(&open), AllowedCategories::All);
        assert_eq!(grill.category_ids, vec![3, 7]);
        let allowed = registry.allowed_categories(&grill);
        assert!(allowed.contains(3));
        assert!(!allowed.contains(4));
    }

    #[test]
    fn test_update_rebinding_checks_target_register() {
        let registry = registry();
        let a = registry.register(create(1, vec![])).unwrap();
        registry.register(create(2, vec![])).unwrap();

        assert!(matches!(
            registry.update(
                a.id,
                ScreenUpdate {
                    register_id: Some(2),
                    category_ids: None
                }
            ),
            Err(RegistryError::RegisterAlreadyBound { register_id: 2, .. })
        ));

        let moved = registry
            .update(
                a.id,
                ScreenUpdate {
                    register_id: Some(3),
                    category_ids: Some(vec![9]),
                },
            )
            .unwrap();
        assert_eq!(moved.register_id, 3);
        assert_eq!(moved.category_ids, vec![9]);
        assert_eq!(moved.sequence, a.sequence);
    }

    #[test]
    fn test_candidate_registers_excludes_bound_and_non_restaurant() {
        let registry = registry();
        let catalog = CatalogService::in_memory();
        catalog
            .replace_registers(vec![
                Register { id: 1, name: "Front".to_string(), is_restaurant: true },
                Register { id: 2, name: "Terrace".to_string(), is_restaurant: true },
                Register { id: 3, name: "Shop".to_string(), is_restaurant: false },
            ])
            .unwrap();
        registry.register(create(1, vec![])).unwrap();

        let ids: Vec<i64> = registry
            .candidate_registers(&catalog)
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_launch_info_title() {
        let registry = registry();
        let catalog = CatalogService::in_memory();
        catalog
            .replace_registers(vec![Register {
                id: 4,
                name: "Main Bar".to_string(),
                is_restaurant: true,
            }])
            .unwrap();
        let screen = registry.register(create(4, vec![])).unwrap();
        let orphan = registry.register(create(5, vec![])).unwrap();

        let launch = registry.launch_info(screen.id, &catalog).unwrap();
        assert_eq!(launch.title, "Kitchen Screen: Main Bar");
        assert_eq!(launch.register_id, 4);
        assert!(matches!(
            registry.launch_info(orphan.id, &catalog),
            Err(RegistryError::RegisterNotFound(5))
        ));
        assert!(matches!(
            registry.get(99),
            Err(RegistryError::ScreenNotFound(99))
        ));
    }
}
