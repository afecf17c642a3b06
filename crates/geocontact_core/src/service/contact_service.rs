//! Contact use-case service.
//!
//! # Responsibility
//! - Expose the caller-facing create/remove/modify/fetch surface.
//! - Reduce repository outcomes to success flags for mutations.
//!
//! # Invariants
//! - `Ok(false)` means nothing was written: a non-finite coordinate or a
//!   storage constraint refused the change. It is always logged.
//! - Any other failure propagates as `Err`, distinct from `Ok(false)`.
//! - `remove`/`modify` on an unknown id report `Ok(true)`; the zero-row case
//!   is logged and available through the repository's affected-row count.

use crate::model::contact::{Contact, ContactDraft, ContactId, ContactSummary};
use crate::repo::contact_repo::{ContactRepository, RepoError, RepoResult};
use log::{error, warn};

/// Use-case service wrapper for contact CRUD operations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Stores a new contact. Returns `Ok(false)` when the row was refused.
    pub fn create(
        &self,
        name: &str,
        email: &str,
        latitude: f64,
        longitude: f64,
    ) -> RepoResult<bool> {
        let draft = ContactDraft::new(name, email, latitude, longitude);
        match self.create_contact(&draft) {
            Ok(_) => Ok(true),
            Err(err) => rejected_as_false("contact_create", None, err),
        }
    }

    /// Stores a new contact and returns its id.
    ///
    /// Unlike [`ContactService::create`], refusals surface as `Err`.
    pub fn create_contact(&self, draft: &ContactDraft) -> RepoResult<ContactId> {
        self.repo.insert(draft)
    }

    /// Deletes the contact with `id`.
    ///
    /// Returns `Ok(true)` even when no row had that id.
    pub fn remove(&self, id: ContactId) -> RepoResult<bool> {
        match self.repo.delete(id) {
            Ok(changed) => {
                warn_if_unmatched("contact_remove", id, changed);
                Ok(true)
            }
            Err(err) => rejected_as_false("contact_remove", Some(id), err),
        }
    }

    /// Replaces all fields of the contact with `id`.
    ///
    /// Returns `Ok(true)` even when no row had that id.
    pub fn modify(
        &self,
        id: ContactId,
        name: &str,
        email: &str,
        latitude: f64,
        longitude: f64,
    ) -> RepoResult<bool> {
        let draft = ContactDraft::new(name, email, latitude, longitude);
        match self.repo.update(id, &draft) {
            Ok(changed) => {
                warn_if_unmatched("contact_modify", id, changed);
                Ok(true)
            }
            Err(err) => rejected_as_false("contact_modify", Some(id), err),
        }
    }

    /// Gets one contact by id.
    pub fn fetch_one(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        self.repo.find_by_id(id)
    }

    /// Lists every contact (without ids) in insertion order.
    pub fn fetch_all(&self) -> RepoResult<Vec<ContactSummary>> {
        self.repo.load_all()
    }

    /// Lists every contact with ids in insertion order.
    pub fn fetch_all_with_ids(&self) -> RepoResult<Vec<Contact>> {
        self.repo.list_contacts()
    }
}

fn rejected_as_false(event: &str, id: Option<ContactId>, err: RepoError) -> RepoResult<bool> {
    if !err.is_rejection() {
        return Err(err);
    }

    match id {
        Some(id) => error!(
            "event={event} module=service status=rejected contact_id={id} error={err}"
        ),
        None => error!("event={event} module=service status=rejected error={err}"),
    }
    Ok(false)
}

fn warn_if_unmatched(event: &str, id: ContactId, changed: usize) {
    if changed == 0 {
        warn!("event={event} module=service status=no_match contact_id={id}");
    }
}

#[cfg(test)]
mod tests {
    use super::ContactService;
    use crate::db::DbError;
    use crate::model::contact::{Contact, ContactDraft, ContactId, ContactSummary};
    use crate::repo::contact_repo::{ContactRepository, RepoError, RepoResult};
    use rusqlite::ffi;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryRepo {
        rows: RefCell<Vec<Contact>>,
        fail_with: Option<i32>,
    }

    impl MemoryRepo {
        fn failing(code: i32) -> Self {
            Self {
                fail_with: Some(code),
                ..Self::default()
            }
        }

        fn check(&self) -> RepoResult<()> {
            match self.fail_with {
                Some(code) => Err(RepoError::Db(DbError::Sqlite(
                    rusqlite::Error::SqliteFailure(ffi::Error::new(code), None),
                ))),
                None => Ok(()),
            }
        }
    }

    impl ContactRepository for MemoryRepo {
        fn insert(&self, draft: &ContactDraft) -> RepoResult<ContactId> {
            draft.validate()?;
            self.check()?;
            let mut rows = self.rows.borrow_mut();
            let id = rows.last().map_or(1, |row| row.id + 1);
            rows.push(Contact {
                id,
                name: draft.name.clone(),
                email: draft.email.clone(),
                latitude: draft.latitude,
                longitude: draft.longitude,
            });
            Ok(id)
        }

        fn delete(&self, id: ContactId) -> RepoResult<usize> {
            self.check()?;
            let mut rows = self.rows.borrow_mut();
            let before = rows.len();
            rows.retain(|row| row.id != id);
            Ok(before - rows.len())
        }

        fn update(&self, id: ContactId, draft: &ContactDraft) -> RepoResult<usize> {
            draft.validate()?;
            self.check()?;
            let mut rows = self.rows.borrow_mut();
            let mut changed = 0;
            for row in rows.iter_mut().filter(|row| row.id == id) {
                row.name = draft.name.clone();
                row.email = draft.email.clone();
                row.latitude = draft.latitude;
                row.longitude = draft.longitude;
                changed += 1;
            }
            Ok(changed)
        }

        fn find_by_id(&self, id: ContactId) -> RepoResult<Option<Contact>> {
            self.check()?;
            Ok(self.rows.borrow().iter().find(|row| row.id == id).cloned())
        }

        fn load_all(&self) -> RepoResult<Vec<ContactSummary>> {
            Ok(self
                .list_contacts()?
                .into_iter()
                .map(Contact::into_summary)
                .collect())
        }

        fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
            self.check()?;
            Ok(self.rows.borrow().clone())
        }

        fn count(&self) -> RepoResult<u64> {
            self.check()?;
            Ok(self.rows.borrow().len() as u64)
        }
    }

    #[test]
    fn create_reports_true_and_persists_row() {
        let service = ContactService::new(MemoryRepo::default());

        assert!(service.create("Ana", "ana@x.com", -23.55, -46.63).unwrap());

        let all = service.fetch_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Ana");
    }

    #[test]
    fn validation_failure_reports_false_without_writing() {
        let service = ContactService::new(MemoryRepo::default());

        assert!(!service.create("Ana", "ana@x.com", f64::NAN, 0.0).unwrap());
        assert!(service.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn blank_text_and_out_of_range_coordinates_report_true() {
        let service = ContactService::new(MemoryRepo::default());

        assert!(service.create("A", "a@x.com", 91.0, 0.0).unwrap());
        assert!(service.create("", "a@x.com", 1.0, 0.0).unwrap());
        assert_eq!(service.repository().count().unwrap(), 2);
    }

    #[test]
    fn constraint_violation_reports_false() {
        let service = ContactService::new(MemoryRepo::failing(ffi::SQLITE_CONSTRAINT));

        assert!(!service.create("Ana", "ana@x.com", 0.0, 0.0).unwrap());
        assert!(!service.modify(1, "Ana", "ana@x.com", 0.0, 0.0).unwrap());
        assert!(!service.remove(1).unwrap());
    }

    #[test]
    fn other_storage_faults_propagate_as_errors() {
        let service = ContactService::new(MemoryRepo::failing(ffi::SQLITE_IOERR));

        let err = service.create("Ana", "ana@x.com", 0.0, 0.0).unwrap_err();
        assert!(matches!(err, RepoError::Db(_)));
        assert!(service.remove(1).is_err());
        assert!(service.fetch_one(1).is_err());
    }

    #[test]
    fn remove_and_modify_of_unknown_id_still_report_true() {
        let service = ContactService::new(MemoryRepo::default());
        service.create("Ana", "ana@x.com", 1.0, 2.0).unwrap();

        assert!(service.remove(404).unwrap());
        assert!(service.modify(404, "Bia", "bia@x.com", 3.0, 4.0).unwrap());
        assert_eq!(service.repository().count().unwrap(), 1);
        assert_eq!(service.fetch_all().unwrap()[0].name, "Ana");
    }
}
