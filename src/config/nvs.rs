//! NVS persistence for the monitor configuration with schema versioning.
//!
//! The whole [`MonitorConfig`] is stored as one blob (see
//! [`MonitorConfig::to_record`]) next to a schema version stamp.
//!
//! # Version History
//!
//! - **v1** (current): link, parser, reporter and loop settings, 19 bytes
//!
//! # Future Migration
//!
//! When the record layout changes:
//! 1. Increment CURRENT_SCHEMA_VERSION
//! 2. Add the `(old, new)` arm to `migrate_config()`
//! 3. Write the upgraded record and the new version stamp

use super::{MonitorConfig, RecordError};
use core::cmp::Ordering;

#[cfg(target_os = "espidf")]
use super::RECORD_LEN;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::*;
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

/// Current NVS schema version for the configuration record
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// NVS namespace for monitor configuration
pub const NVS_NAMESPACE: &str = "parking_cfg";

/// NVS key for schema version
#[cfg(target_os = "espidf")]
const VERSION_KEY: &str = "schema_ver";

/// NVS key for the configuration blob
#[cfg(target_os = "espidf")]
const CONFIG_KEY: &str = "config";

/// Migration result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationResult {
    /// Fresh install, no migration needed (using defaults)
    FreshInstall,
    /// Schema up-to-date, loaded successfully
    UpToDate,
    /// Migrated from older version
    Migrated { from_version: u32, to_version: u32 },
}

/// NVS operation errors
#[derive(Debug)]
pub enum NvsError {
    /// NVS initialization failed
    #[cfg(target_os = "espidf")]
    InitFailed(EspError),
    /// Schema version too new (downgrade not supported)
    TooNew { stored_version: u32 },
    /// NVS read/write error
    #[cfg(target_os = "espidf")]
    IoError(EspError),
    /// Unsupported migration path
    UnsupportedMigration { from: u32, to: u32 },
    /// Stored record failed validation
    Corrupt(RecordError),
    /// Feature not available on this platform
    #[cfg(not(target_os = "espidf"))]
    NotAvailable,
}

#[cfg(target_os = "espidf")]
impl From<EspError> for NvsError {
    fn from(e: EspError) -> Self {
        NvsError::IoError(e)
    }
}

impl From<RecordError> for NvsError {
    fn from(e: RecordError) -> Self {
        NvsError::Corrupt(e)
    }
}

/// What to do with a stored schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCheck {
    /// Nothing stored yet.
    Fresh,
    /// Stored version matches, read directly.
    Current,
    /// Stored version is older, migrate first.
    Migrate { from: u32 },
}

/// Classify a stored schema version against [`CURRENT_SCHEMA_VERSION`].
pub fn check_version(stored_version: u32) -> Result<VersionCheck, NvsError> {
    match stored_version.cmp(&CURRENT_SCHEMA_VERSION) {
        Ordering::Equal => Ok(VersionCheck::Current),
        Ordering::Less if stored_version == 0 => Ok(VersionCheck::Fresh),
        Ordering::Less => Ok(VersionCheck::Migrate { from: stored_version }),
        Ordering::Greater => Err(NvsError::TooNew { stored_version }),
    }
}

/// Load the configuration from NVS with automatic migration
///
/// # Returns
///
/// - `Ok((config, MigrationResult::FreshInstall))`: nothing stored, defaults
/// - `Ok((config, MigrationResult::UpToDate))`: loaded as stored
/// - `Err(NvsError::TooNew)`: schema version too new (downgrade not supported)
/// - `Err(NvsError)`: other NVS errors
#[cfg(target_os = "espidf")]
pub fn load_config_from_nvs() -> Result<(MonitorConfig, MigrationResult), NvsError> {
    let nvs_default = EspDefaultNvsPartition::take()
        .map_err(NvsError::InitFailed)?;
    let mut storage = EspNvs::new(nvs_default, NVS_NAMESPACE, true)
        .map_err(NvsError::InitFailed)?;

    let stored_version = storage
        .get_u32(VERSION_KEY)?
        .unwrap_or(0);

    match check_version(stored_version)? {
        VersionCheck::Fresh => Ok((MonitorConfig::DEFAULT, MigrationResult::FreshInstall)),
        VersionCheck::Current => {
            let config = load_v1_config(&storage)?;
            Ok((config, MigrationResult::UpToDate))
        }
        VersionCheck::Migrate { from } => {
            let config = migrate_config(&mut storage, from, CURRENT_SCHEMA_VERSION)?;
            Ok((config, MigrationResult::Migrated {
                from_version: from,
                to_version: CURRENT_SCHEMA_VERSION,
            }))
        }
    }
}

/// Stub for non-ESP platforms
#[cfg(not(target_os = "espidf"))]
pub fn load_config_from_nvs() -> Result<(MonitorConfig, MigrationResult), NvsError> {
    Err(NvsError::NotAvailable)
}

/// Save the configuration to NVS with version stamp
#[cfg(target_os = "espidf")]
pub fn save_config_to_nvs(config: &MonitorConfig) -> Result<(), NvsError> {
    let nvs_default = EspDefaultNvsPartition::take()
        .map_err(NvsError::InitFailed)?;
    let mut storage = EspNvs::new(nvs_default, NVS_NAMESPACE, true)
        .map_err(NvsError::InitFailed)?;

    // Write version first
    storage.set_u32(VERSION_KEY, CURRENT_SCHEMA_VERSION)?;
    storage.set_blob(CONFIG_KEY, &config.to_record())?;

    Ok(())
}

/// Stub for non-ESP platforms
#[cfg(not(target_os = "espidf"))]
pub fn save_config_to_nvs(_config: &MonitorConfig) -> Result<(), NvsError> {
    Err(NvsError::NotAvailable)
}

// ========================================
// v1 Schema Load
// ========================================

#[cfg(target_os = "espidf")]
fn load_v1_config(storage: &EspNvs<NvsDefault>) -> Result<MonitorConfig, NvsError> {
    let mut buf = [0u8; RECORD_LEN];
    match storage.get_blob(CONFIG_KEY, &mut buf)? {
        Some(rec) => Ok(MonitorConfig::from_record(rec)?),
        // Version stamped but blob missing: treat as defaults
        None => Ok(MonitorConfig::DEFAULT),
    }
}

// ========================================
// Migration Logic
// ========================================

#[cfg(target_os = "espidf")]
fn migrate_config(
    _storage: &mut EspNvs<NvsDefault>,
    from_version: u32,
    to_version: u32,
) -> Result<MonitorConfig, NvsError> {
    // Only v1 exists; any older stamp is unknown.
    Err(NvsError::UnsupportedMigration {
        from: from_version,
        to: to_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version_constant() {
        assert_eq!(CURRENT_SCHEMA_VERSION, 1);
        assert_eq!(crate::config::RECORD_LEN, MonitorConfig::DEFAULT.to_record().len());
    }

    #[test]
    fn test_check_version() {
        assert_eq!(check_version(0).ok(), Some(VersionCheck::Fresh));
        assert_eq!(check_version(1).ok(), Some(VersionCheck::Current));
        assert!(matches!(
            check_version(2),
            Err(NvsError::TooNew { stored_version: 2 })
        ));
    }

    #[cfg(not(target_os = "espidf"))]
    #[test]
    fn test_host_stub_not_available() {
        assert!(matches!(load_config_from_nvs(), Err(NvsError::NotAvailable)));
        assert!(matches!(
            save_config_to_nvs(&MonitorConfig::DEFAULT),
            Err(NvsError::NotAvailable)
        ));
    }

    #[test]
    fn test_nvs_namespace_constant() {
        assert_eq!(NVS_NAMESPACE, "parking_cfg");
    }
}
