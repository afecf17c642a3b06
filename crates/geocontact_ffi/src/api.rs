//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the contact create/remove/modify/fetch surface to Dart via FRB.
//! - Keep error semantics simple for UI integration.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens its own provider; no connection is kept between calls.

use geocontact_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Contact,
    ContactDraft, ContactService, ContactSummary, RepoResult, SqliteContactRepository,
    SqliteSchemaProvider, StoreConfig,
};
use log::warn;
use std::sync::OnceLock;

static STORE_CONFIG: OnceLock<StoreConfig> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Contact row as seen by Dart.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactItem {
    /// Storage id; `None` for `contact_fetch_all` rows, which omit ids.
    pub contact_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Result envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    /// Whether the change was accepted.
    pub ok: bool,
    /// Created contact id (create only).
    pub contact_id: Option<i64>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: Option<i64>) -> Self {
        Self {
            ok: true,
            contact_id,
            message: message.into(),
        }
    }

    fn from_flag(ok: bool, accepted: &str) -> Self {
        if ok {
            Self::success(accepted, None)
        } else {
            Self::failure("Contact was rejected.")
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            message: message.into(),
        }
    }
}

/// Result envelope for single-contact lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactFetchResponse {
    /// `None` when no contact has the requested id or the lookup failed.
    pub item: Option<ContactItem>,
    pub message: String,
}

/// Result envelope for list calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactListResponse {
    /// Contacts in insertion order.
    pub items: Vec<ContactItem>,
    pub message: String,
}

/// Creates a contact.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - `ok=false` with a message when input is rejected or storage fails.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_create(
    name: String,
    email: String,
    latitude: f64,
    longitude: f64,
) -> ContactActionResponse {
    let draft = ContactDraft::new(name.trim(), email.trim(), latitude, longitude);
    match with_contact_service(|service| service.create_contact(&draft)) {
        Ok(id) => ContactActionResponse::success("Contact created.", Some(id)),
        Err(err) => ContactActionResponse::failure(format!("contact_create failed: {err}")),
    }
}

/// Removes a contact by id.
///
/// `ok=true` is also reported when no contact had the id.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_remove(contact_id: i64) -> ContactActionResponse {
    match with_contact_service(|service| service.remove(contact_id)) {
        Ok(ok) => ContactActionResponse::from_flag(ok, "Contact removed."),
        Err(err) => ContactActionResponse::failure(format!("contact_remove failed: {err}")),
    }
}

/// Replaces every field of a contact.
///
/// `ok=true` is also reported when no contact had the id.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_modify(
    contact_id: i64,
    name: String,
    email: String,
    latitude: f64,
    longitude: f64,
) -> ContactActionResponse {
    match with_contact_service(|service| {
        service.modify(contact_id, name.trim(), email.trim(), latitude, longitude)
    }) {
        Ok(ok) => ContactActionResponse::from_flag(ok, "Contact updated."),
        Err(err) => ContactActionResponse::failure(format!("contact_modify failed: {err}")),
    }
}

/// Looks up one contact by id.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_fetch_one(contact_id: i64) -> ContactFetchResponse {
    match with_contact_service(|service| service.fetch_one(contact_id)) {
        Ok(Some(contact)) => ContactFetchResponse {
            item: Some(contact_to_item(contact)),
            message: "Contact found.".to_string(),
        },
        Ok(None) => ContactFetchResponse {
            item: None,
            message: "No contact with that id.".to_string(),
        },
        Err(err) => ContactFetchResponse {
            item: None,
            message: format!("contact_fetch_one failed: {err}"),
        },
    }
}

/// Lists every contact without ids (name, email, coordinates).
#[flutter_rust_bridge::frb(sync)]
pub fn contact_fetch_all() -> ContactListResponse {
    list_response(
        "contact_fetch_all",
        with_contact_service(|service| service.fetch_all()).map(|rows| {
            rows.into_iter().map(summary_to_item).collect::<Vec<_>>()
        }),
    )
}

/// Lists every contact including ids, for screens that edit or delete.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_fetch_all_with_ids() -> ContactListResponse {
    list_response(
        "contact_fetch_all_with_ids",
        with_contact_service(|service| service.fetch_all_with_ids()).map(|rows| {
            rows.into_iter().map(contact_to_item).collect::<Vec<_>>()
        }),
    )
}

fn list_response(op: &str, result: Result<Vec<ContactItem>, String>) -> ContactListResponse {
    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No contacts.".to_string()
            } else {
                format!("Found {} contact(s).", items.len())
            };
            ContactListResponse { items, message }
        }
        Err(err) => ContactListResponse {
            items: Vec::new(),
            message: format!("{op} failed: {err}"),
        },
    }
}

// Resolved once per process. Tests in this crate therefore all share
// `<temp_dir>/geocontact.sqlite3` (or `GEOCONTACT_DB_PATH`) and must only
// assert on rows they created themselves.
fn store_config() -> &'static StoreConfig {
    STORE_CONFIG.get_or_init(StoreConfig::from_env)
}

fn with_contact_service<T>(
    f: impl FnOnce(&ContactService<SqliteContactRepository<SqliteSchemaProvider>>) -> RepoResult<T>,
) -> Result<T, String> {
    let provider = SqliteSchemaProvider::open(store_config().clone()).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error error_code=db_open_failed error={err}");
        format!("contact DB open failed: {err}")
    })?;
    let repo = SqliteContactRepository::try_new(provider)
        .map_err(|err| format!("contact repo init failed: {err}"))?;
    let service = ContactService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

fn contact_to_item(contact: Contact) -> ContactItem {
    ContactItem {
        contact_id: Some(contact.id),
        name: contact.name,
        email: contact.email,
        latitude: contact.latitude,
        longitude: contact.longitude,
    }
}

fn summary_to_item(summary: ContactSummary) -> ContactItem {
    ContactItem {
        contact_id: None,
        name: summary.name,
        email: summary.email,
        latitude: summary.latitude,
        longitude: summary.longitude,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        contact_create, contact_fetch_all, contact_fetch_all_with_ids, contact_fetch_one,
        contact_modify, contact_remove, core_version, init_logging,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn create_fetch_modify_remove_flow() {
        let email = format!("{}@x.com", unique_token("flow"));
        let created = contact_create("Ana".to_string(), email.clone(), -23.55, -46.63);
        assert!(created.ok, "{}", created.message);
        let id = created.contact_id.expect("create should return contact_id");

        let fetched = contact_fetch_one(id);
        let item = fetched.item.expect("created contact should be found");
        assert_eq!(item.email, email);
        assert_eq!(item.latitude, Some(-23.55));

        let listed = contact_fetch_all();
        assert!(listed.items.iter().any(|row| row.email == email));
        assert!(listed.items.iter().all(|row| row.contact_id.is_none()));

        let listed_with_ids = contact_fetch_all_with_ids();
        assert!(listed_with_ids
            .items
            .iter()
            .any(|row| row.contact_id == Some(id)));

        let modified = contact_modify(id, "Ana".to_string(), email.clone(), 1.0, 2.0);
        assert!(modified.ok, "{}", modified.message);
        assert_eq!(contact_fetch_one(id).item.unwrap().longitude, Some(2.0));

        let removed = contact_remove(id);
        assert!(removed.ok, "{}", removed.message);
        assert!(contact_fetch_one(id).item.is_none());
    }

    #[test]
    fn create_accepts_blank_name() {
        let response = contact_create("  ".to_string(), "x@x.com".to_string(), 0.0, 0.0);
        assert!(response.ok, "{}", response.message);
        let id = response.contact_id.expect("create should return contact_id");
        assert!(contact_remove(id).ok);
    }

    #[test]
    fn create_rejects_nan_latitude() {
        let response = contact_create("A".to_string(), "a@x.com".to_string(), f64::NAN, 0.0);
        assert!(!response.ok);
        assert!(response.contact_id.is_none());
        assert!(response.message.contains("latitude"));
    }

    #[test]
    fn modify_rejects_infinite_longitude() {
        let response =
            contact_modify(1, "A".to_string(), "a@x.com".to_string(), 0.0, f64::INFINITY);
        assert!(!response.ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
