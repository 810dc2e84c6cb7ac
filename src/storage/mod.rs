use log::{info, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::data::farms::{seed_field_yu_farm, seed_sfc_farm};
use crate::error::StorageError;
use crate::logic::merge::repair_groups;
use crate::models::{crop::Crop, farm::Farm};

pub mod json;
pub mod memory;

const CUSTOM_CROPS_KEY: &str = "yaofuji_custom_crops";

/// A string-keyed store of opaque text blobs.
pub trait BlobStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// The farms tracked by the club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FarmKey {
    Sfc,
    FieldYu,
}

impl FarmKey {
    pub const ALL: [FarmKey; 2] = [FarmKey::Sfc, FarmKey::FieldYu];

    pub fn as_str(&self) -> &'static str {
        match self {
            FarmKey::Sfc => "sfc",
            FarmKey::FieldYu => "field-yu",
        }
    }

    pub fn storage_key(&self) -> &'static str {
        match self {
            FarmKey::Sfc => "yaofuji_farm_data",
            FarmKey::FieldYu => "yaofuji_farm_data_field_yu",
        }
    }

    pub fn seed(&self) -> Farm {
        match self {
            FarmKey::Sfc => seed_sfc_farm(),
            FarmKey::FieldYu => seed_field_yu_farm(),
        }
    }
}

/// Loads and saves whole farms (and the custom crop list) as JSON blobs.
pub struct FarmRepository {
    store: Box<dyn BlobStore>,
}

impl FarmRepository {
    pub fn new(store: impl BlobStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Returns the saved farm, or the key's seed when nothing usable is stored.
    pub fn load(&self, key: FarmKey) -> Farm {
        let blob = match self.store.get(key.storage_key()) {
            Ok(Some(blob)) => blob,
            Ok(None) => return key.seed(),
            Err(e) => {
                warn!("Reading farm '{}' failed, using seed: {e}", key.as_str());
                return key.seed();
            }
        };
        let farm: Farm = match serde_json::from_str(&blob) {
            Ok(farm) => farm,
            Err(e) => {
                warn!("Stored farm '{}' is unreadable, using seed: {e}", key.as_str());
                return key.seed();
            }
        };
        match farm.validate() {
            Ok(()) => farm,
            Err(e) if e.is_group_error() => {
                let repaired = repair_groups(&farm);
                match repaired.validate() {
                    Ok(()) => {
                        warn!("Stored farm '{}' had broken merge groups, repaired: {e}", key.as_str());
                        repaired
                    }
                    Err(still) => {
                        warn!("Stored farm '{}' could not be repaired, using seed: {still}", key.as_str());
                        key.seed()
                    }
                }
            }
            Err(e) => {
                warn!("Stored farm '{}' is invalid, using seed: {e}", key.as_str());
                key.seed()
            }
        }
    }

    pub fn save(&mut self, key: FarmKey, farm: &Farm) -> Result<(), StorageError> {
        let blob = serde_json::to_string(farm)?;
        self.store.set(key.storage_key(), blob)?;
        info!("Saved farm '{}' ({} plots)", key.as_str(), farm.plots.len());
        Ok(())
    }

    pub fn load_custom_crops(&self) -> Vec<Crop> {
        match self.store.get(CUSTOM_CROPS_KEY) {
            Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                warn!("Stored custom crops are unreadable, ignoring them: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Reading custom crops failed: {e}");
                Vec::new()
            }
        }
    }

    pub fn save_custom_crops(&mut self, crops: &[Crop]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(crops)?;
        self.store.set(CUSTOM_CROPS_KEY, blob)
    }
}
