//! Asset registry over an [`AssetStore`].

use std::sync::Arc;

use armory_shared::types::{AssetId, BaseId};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::error::AssetError;
use super::types::{Asset, AssetRecord, AssetStatus, AssetTransition};
use crate::ledger::EventId;
use crate::store::AssetStore;

/// Keyed view of every enrolled asset.
///
/// Reads are public. Writes are crate-private and only issued by the ledger
/// engine after the causing record has been appended.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    store: Arc<dyn AssetStore>,
}

impl AssetRegistry {
    /// Creates a registry over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    /// Returns the current state of an asset.
    pub fn get_asset(&self, id: AssetId) -> Result<Asset, AssetError> {
        Ok(self.load(id)?.asset)
    }

    /// Returns the asset's transition trail, oldest first.
    pub fn history(&self, id: AssetId) -> Result<Vec<AssetTransition>, AssetError> {
        Ok(self.load(id)?.history)
    }

    /// Lists assets in id order, optionally restricted to one base.
    pub fn list(&self, base_id: Option<BaseId>) -> Result<Vec<Asset>, AssetError> {
        let mut assets: Vec<Asset> = self
            .store
            .list()?
            .into_iter()
            .map(|record| record.asset)
            .filter(|asset| base_id.is_none_or(|base| asset.base_id == base))
            .collect();
        assets.sort_by_key(|asset| asset.id);
        Ok(assets)
    }

    /// Checks that `asset` may move to `to` without touching the store.
    pub fn check_transition(asset: &Asset, to: AssetStatus) -> Result<(), AssetError> {
        if asset.status.can_transition_to(to) {
            Ok(())
        } else {
            Err(AssetError::InvalidTransition {
                asset_id: asset.id,
                from: asset.status,
                to,
            })
        }
    }

    /// Registers a new asset as `available`.
    pub(crate) fn enrol(
        &self,
        mut asset: Asset,
        causing_event: EventId,
        at: DateTime<Utc>,
    ) -> Result<Asset, AssetError> {
        if self.store.get(asset.id)?.is_some() {
            return Err(AssetError::AlreadyRegistered(asset.id));
        }

        asset.status = AssetStatus::Available;
        let record = AssetRecord {
            asset: asset.clone(),
            history: vec![AssetTransition {
                from: None,
                to: AssetStatus::Available,
                causing_event,
                at,
            }],
        };
        self.store.put(record)?;
        debug!(asset_id = %asset.id, %causing_event, "asset enrolled");
        Ok(asset)
    }

    /// Moves an asset to `new_status`, recording the causing ledger record.
    pub(crate) fn apply_status_change(
        &self,
        id: AssetId,
        new_status: AssetStatus,
        causing_event: EventId,
        at: DateTime<Utc>,
    ) -> Result<Asset, AssetError> {
        let mut record = self.load(id)?;
        Self::check_transition(&record.asset, new_status)?;

        record.history.push(AssetTransition {
            from: Some(record.asset.status),
            to: new_status,
            causing_event,
            at,
        });
        record.asset.status = new_status;
        let asset = record.asset.clone();
        self.store.put(record)?;
        debug!(asset_id = %id, status = %new_status, %causing_event, "asset status changed");
        Ok(asset)
    }

    /// Overwrites stored assets with records rebuilt from the ledger.
    pub(crate) fn restore(&self, records: Vec<AssetRecord>) -> Result<usize, AssetError> {
        let count = records.len();
        for record in records {
            self.store.put(record)?;
        }
        Ok(count)
    }

    fn load(&self, id: AssetId) -> Result<AssetRecord, AssetError> {
        self.store.get(id)?.ok_or(AssetError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::types::{AssetCondition, AssetType};
    use crate::store::InMemoryAssetStore;
    use armory_shared::types::Money;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn registry() -> AssetRegistry {
        AssetRegistry::new(Arc::new(InMemoryAssetStore::new()))
    }

    fn rifle(base_id: BaseId) -> Asset {
        Asset {
            id: AssetId::new(),
            name: "M4A1 Rifle".to_string(),
            asset_type: AssetType::Weapon,
            serial_number: Some("W123456".to_string()),
            condition: AssetCondition::Excellent,
            status: AssetStatus::Available,
            base_id,
            value: Money::usd(dec!(1200)),
            acquired_on: None,
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_get_unknown_asset() {
        let id = AssetId::new();
        assert!(matches!(
            registry().get_asset(id),
            Err(AssetError::NotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_enrol_then_apply_records_history() {
        let registry = registry();
        let asset = registry.enrol(rifle(BaseId::new()), EventId(1), at()).unwrap();

        let assigned = registry
            .apply_status_change(asset.id, AssetStatus::Assigned, EventId(2), at())
            .unwrap();
        assert_eq!(assigned.status, AssetStatus::Assigned);

        let history = registry.history(asset.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].from, None);
        assert_eq!(history[1].from, Some(AssetStatus::Available));
        assert_eq!(history[1].to, AssetStatus::Assigned);
        assert_eq!(history[1].causing_event, EventId(2));
    }

    #[test]
    fn test_enrol_twice_is_rejected() {
        let registry = registry();
        let asset = rifle(BaseId::new());
        registry.enrol(asset.clone(), EventId(1), at()).unwrap();
        assert!(matches!(
            registry.enrol(asset, EventId(2), at()),
            Err(AssetError::AlreadyRegistered(_))
        ));
    }

    #[test]
    fn test_retired_asset_rejects_assignment() {
        let registry = registry();
        let asset = registry.enrol(rifle(BaseId::new()), EventId(1), at()).unwrap();
        registry
            .apply_status_change(asset.id, AssetStatus::Retired, EventId(2), at())
            .unwrap();

        let err = registry
            .apply_status_change(asset.id, AssetStatus::Assigned, EventId(3), at())
            .unwrap_err();
        assert!(matches!(
            err,
            AssetError::InvalidTransition {
                from: AssetStatus::Retired,
                to: AssetStatus::Assigned,
                ..
            }
        ));
        assert_eq!(registry.history(asset.id).unwrap().len(), 2);
    }

    #[test]
    fn test_list_filters_by_base() {
        let registry = registry();
        let home = BaseId::new();
        registry.enrol(rifle(home), EventId(1), at()).unwrap();
        registry.enrol(rifle(home), EventId(2), at()).unwrap();
        registry.enrol(rifle(BaseId::new()), EventId(3), at()).unwrap();

        assert_eq!(registry.list(None).unwrap().len(), 3);
        assert_eq!(registry.list(Some(home)).unwrap().len(), 2);
    }
}
