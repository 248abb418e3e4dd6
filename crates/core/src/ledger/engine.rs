//! The ledger engine: the only writer of ledger records.
//!
//! Every mutation runs the same pipeline:
//! 1. Validate the request on its own
//! 2. Resolve referenced bases, assets and records (`NotFound`)
//! 3. Check the actor's capability (`Forbidden`)
//! 4. Take the mutation queues of every balance pair or asset it touches
//! 5. Replay the ledger at its head and run state checks
//!    (`InsufficientBalance`, `InvalidTransition`)
//! 6. Append exactly one record, then apply registry side effects
//!
//! A rejection at any step appends nothing. Business timestamps may lie in
//! the past but never after the engine clock; a backdated draw must fit the
//! stock held at its date and at every later effect.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use armory_shared::config::LedgerConfig;
use armory_shared::types::{AssetId, BaseId, PageRequest, PageResponse};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::error::LedgerError;
use super::event::{
    AssetEnrolmentDetails, AssetStatusChangeDetails, AssignmentDetails, EventPayload,
    ExpenditureDetails, LedgerRecord, PurchaseDetails, RecordDraft, StatusChangeDetails,
    TransferDetails,
};
use super::locks::{LockKey, LockTable};
use super::query::{EventFilter, EventView};
use super::replay::LedgerView;
use super::request::{
    AssetStatusRequest, AssignmentRequest, EnrolAssetRequest, EventRequest, ExpenditureRequest,
    PurchaseRequest, StatusChangeRequest, TransferRequest,
};
use super::types::{EventId, EventKind, EventStatus, LedgerCursor};
use super::validation::validate_request;
use super::workflow::StatusWorkflow;
use crate::asset::{
    Asset, AssetError, AssetRecord, AssetRegistry, AssetStatus, AssetTransition, AssetType,
};
use crate::auth::{Action, Actor, AuthorizationGate, Target};
use crate::balance::{AssetTypeFilter, BalanceProjector, BalanceSnapshot, BaseScope, DateRange, Position};
use crate::base::BaseDirectory;
use crate::clock::{Clock, SystemClock};
use crate::store::{AssetStore, EventStore, InMemoryAssetStore, InMemoryEventStore};

/// Append-only asset ledger with conservation checks.
#[derive(Debug)]
pub struct LedgerEngine {
    events: Arc<dyn EventStore>,
    registry: AssetRegistry,
    bases: BaseDirectory,
    locks: LockTable,
    clock: Arc<dyn Clock>,
    config: LedgerConfig,
}

/// Builder for [`LedgerEngine`]; defaults to in-memory stores and the system clock.
#[derive(Debug)]
pub struct LedgerEngineBuilder {
    bases: BaseDirectory,
    config: LedgerConfig,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventStore>,
    assets: Arc<dyn AssetStore>,
}

impl LedgerEngineBuilder {
    /// Sets lock timeout and page size limits.
    #[must_use]
    pub fn config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the time source.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the ledger log backend.
    #[must_use]
    pub fn event_store(mut self, events: Arc<dyn EventStore>) -> Self {
        self.events = events;
        self
    }

    /// Sets the asset registry backend.
    #[must_use]
    pub fn asset_store(mut self, assets: Arc<dyn AssetStore>) -> Self {
        self.assets = assets;
        self
    }

    /// Builds the engine.
    #[must_use]
    pub fn build(self) -> LedgerEngine {
        LedgerEngine {
            events: self.events,
            registry: AssetRegistry::new(self.assets),
            bases: self.bases,
            locks: LockTable::new(self.config.lock_timeout()),
            clock: self.clock,
            config: self.config,
        }
    }
}

impl LedgerEngine {
    /// Starts building an engine over `bases`.
    #[must_use]
    pub fn builder(bases: BaseDirectory) -> LedgerEngineBuilder {
        LedgerEngineBuilder {
            bases,
            config: LedgerConfig::default(),
            clock: Arc::new(SystemClock),
            events: Arc::new(InMemoryEventStore::new()),
            assets: Arc::new(InMemoryAssetStore::new()),
        }
    }

    /// In-memory engine with the system clock.
    #[must_use]
    pub fn new(bases: BaseDirectory, config: LedgerConfig) -> Self {
        Self::builder(bases).config(config).build()
    }

    /// Known bases.
    #[must_use]
    pub const fn bases(&self) -> &BaseDirectory {
        &self.bases
    }

    /// Read access to the asset registry.
    #[must_use]
    pub const fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Current ledger version.
    pub fn cursor(&self) -> Result<LedgerCursor, LedgerError> {
        Ok(self.events.head()?)
    }

    // ========== Mutations ==========

    /// Records a new event occurring now.
    pub fn record(&self, actor: &Actor, request: EventRequest) -> Result<EventId, LedgerError> {
        self.record_at(actor, request, self.clock.now())
    }

    /// Records a new event with an explicit business timestamp.
    pub fn record_at(
        &self,
        actor: &Actor,
        request: EventRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<EventId, LedgerError> {
        let kind = request.kind();
        let result = self.record_inner(actor, request, occurred_at);
        Self::finish(actor, kind, result)
    }

    /// Moves an earlier movement to a new status, effective now.
    pub fn transition(
        &self,
        actor: &Actor,
        request: StatusChangeRequest,
    ) -> Result<EventId, LedgerError> {
        self.transition_at(actor, request, self.clock.now())
    }

    /// Moves an earlier movement to a new status with an explicit timestamp.
    pub fn transition_at(
        &self,
        actor: &Actor,
        request: StatusChangeRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<EventId, LedgerError> {
        let result = self.transition_inner(actor, &request, occurred_at);
        Self::finish(actor, EventKind::StatusChange, result)
    }

    fn finish(
        actor: &Actor,
        kind: EventKind,
        result: Result<LedgerRecord, LedgerError>,
    ) -> Result<EventId, LedgerError> {
        match result {
            Ok(record) => {
                info!(
                    event_id = %record.id,
                    %kind,
                    base_id = %record.base_id,
                    actor = %actor.id,
                    role = %actor.role,
                    "ledger event recorded"
                );
                Ok(record.id)
            }
            Err(err) => {
                warn!(
                    %kind,
                    actor = %actor.id,
                    role = %actor.role,
                    code = err.error_code(),
                    error = %err,
                    "ledger event rejected"
                );
                Err(err)
            }
        }
    }

    fn record_inner(
        &self,
        actor: &Actor,
        request: EventRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerError> {
        validate_request(&request, occurred_at.date_naive())?;
        self.ensure_not_future(occurred_at)?;

        match request {
            EventRequest::Purchase(r) => self.record_purchase(actor, r, occurred_at),
            EventRequest::Transfer(r) => self.record_transfer(actor, r, occurred_at),
            EventRequest::Assignment(r) => self.record_assignment(actor, r, occurred_at),
            EventRequest::Expenditure(r) => self.record_expenditure(actor, r, occurred_at),
            EventRequest::EnrolAsset(r) => self.record_enrolment(actor, r, occurred_at),
            EventRequest::ChangeAssetStatus(r) => {
                self.record_asset_status_change(actor, r, occurred_at)
            }
        }
    }

    fn record_purchase(
        &self,
        actor: &Actor,
        r: PurchaseRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerError> {
        self.bases.require(r.base_id)?;
        AuthorizationGate::authorize(actor, Action::Purchase, Target::base(r.base_id))?;

        // Purchases never draw on stock, so creation needs no queue.
        let payload = EventPayload::Purchase(PurchaseDetails {
            asset_name: r.asset_name,
            asset_type: r.asset_type,
            quantity: r.quantity,
            unit_price: r.unit_price,
            vendor: r.vendor,
            notes: r.notes,
        });
        self.append(actor, r.base_id, occurred_at, payload)
    }

    fn record_transfer(
        &self,
        actor: &Actor,
        r: TransferRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerError> {
        self.bases.require(r.from_base)?;
        self.bases.require(r.to_base)?;
        AuthorizationGate::authorize(
            actor,
            Action::Transfer,
            Target::transfer(r.from_base, r.to_base),
        )?;

        let _locks = self
            .locks
            .acquire(vec![LockKey::Balance(r.from_base, r.asset_type)])?;
        let (_, view) = self.replay_head()?;
        Self::ensure_available(&view, r.from_base, r.asset_type, r.quantity, occurred_at)?;

        let payload = EventPayload::Transfer(TransferDetails {
            asset_name: r.asset_name,
            asset_type: r.asset_type,
            quantity: r.quantity,
            to_base: r.to_base,
            estimated_arrival: r.estimated_arrival,
            notes: r.notes,
        });
        self.append(actor, r.from_base, occurred_at, payload)
    }

    fn record_expenditure(
        &self,
        actor: &Actor,
        r: ExpenditureRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerError> {
        self.bases.require(r.base_id)?;
        AuthorizationGate::authorize(actor, Action::Expenditure, Target::base(r.base_id))?;

        let _locks = self
            .locks
            .acquire(vec![LockKey::Balance(r.base_id, r.asset_type)])?;
        let (_, view) = self.replay_head()?;
        Self::ensure_available(&view, r.base_id, r.asset_type, r.quantity, occurred_at)?;

        let payload = EventPayload::Expenditure(ExpenditureDetails {
            asset_name: r.asset_name,
            asset_type: r.asset_type,
            quantity: r.quantity,
            reason: r.reason,
            cost: r.cost,
            notes: r.notes,
        });
        self.append(actor, r.base_id, occurred_at, payload)
    }

    fn record_assignment(
        &self,
        actor: &Actor,
        r: AssignmentRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerError> {
        let asset = self.registry.get_asset(r.asset_id)?;
        self.bases.require(asset.base_id)?;
        AuthorizationGate::authorize(actor, Action::Assignment, Target::base(asset.base_id))?;

        let _locks = self.locks.acquire(vec![LockKey::Asset(asset.id)])?;
        let asset = self.registry.get_asset(r.asset_id)?;
        AssetRegistry::check_transition(&asset, AssetStatus::Assigned)?;
        // An asset moved out of `assigned` by hand still has its custody open.
        let (_, view) = self.replay_head()?;
        if let Some(assignment) = view.open_assignment(asset.id) {
            return Err(LedgerError::AssignmentOpen {
                asset_id: asset.id,
                assignment,
            });
        }

        let payload = EventPayload::Assignment(AssignmentDetails {
            asset_id: asset.id,
            asset_type: asset.asset_type,
            assigned_to: r.assigned_to,
            purpose: r.purpose,
            expected_return_date: r.expected_return_date,
            notes: r.notes,
        });
        let record = self.append(actor, asset.base_id, occurred_at, payload)?;
        Self::sync_registry(
            &record,
            self.registry
                .apply_status_change(asset.id, AssetStatus::Assigned, record.id, occurred_at),
        );
        Ok(record)
    }

    fn record_enrolment(
        &self,
        actor: &Actor,
        r: EnrolAssetRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerError> {
        self.bases.require(r.base_id)?;
        AuthorizationGate::authorize(actor, Action::RegistryEdit, Target::base(r.base_id))?;

        let asset = Asset {
            id: AssetId::new(),
            name: r.name,
            asset_type: r.asset_type,
            serial_number: r.serial_number,
            condition: r.condition,
            status: AssetStatus::Available,
            base_id: r.base_id,
            value: r.value,
            acquired_on: r.acquired_on,
        };

        let _locks = self.locks.acquire(vec![LockKey::Asset(asset.id)])?;
        let payload = EventPayload::AssetEnrolment(AssetEnrolmentDetails {
            asset: asset.clone(),
        });
        let record = self.append(actor, r.base_id, occurred_at, payload)?;
        Self::sync_registry(&record, self.registry.enrol(asset, record.id, occurred_at));
        Ok(record)
    }

    fn record_asset_status_change(
        &self,
        actor: &Actor,
        r: AssetStatusRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerError> {
        let asset = self.registry.get_asset(r.asset_id)?;
        AuthorizationGate::authorize(actor, Action::RegistryEdit, Target::base(asset.base_id))?;

        let _locks = self.locks.acquire(vec![LockKey::Asset(asset.id)])?;
        let asset = self.registry.get_asset(r.asset_id)?;
        if asset.status == AssetStatus::Assigned && r.to == AssetStatus::Available {
            return Err(LedgerError::ReturnRequired(asset.id));
        }
        AssetRegistry::check_transition(&asset, r.to)?;

        let payload = EventPayload::AssetStatusChange(AssetStatusChangeDetails {
            asset_id: asset.id,
            from: asset.status,
            to: r.to,
            reason: r.reason,
        });
        let record = self.append(actor, asset.base_id, occurred_at, payload)?;
        Self::sync_registry(
            &record,
            self.registry
                .apply_status_change(asset.id, r.to, record.id, occurred_at),
        );
        Ok(record)
    }

    fn transition_inner(
        &self,
        actor: &Actor,
        request: &StatusChangeRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<LedgerRecord, LedgerError> {
        self.ensure_not_future(occurred_at)?;
        let target = self
            .events
            .get(request.target)?
            .ok_or(LedgerError::EventNotFound(request.target))?;
        let kind = target.kind();

        let (action, scope, keys) = match &target.payload {
            EventPayload::Purchase(d) => (
                Action::Purchase,
                Target::base(target.base_id),
                vec![LockKey::Balance(target.base_id, d.asset_type)],
            ),
            EventPayload::Transfer(d) => (
                Action::Transfer,
                Target::transfer(target.base_id, d.to_base),
                vec![
                    LockKey::Balance(target.base_id, d.asset_type),
                    LockKey::Balance(d.to_base, d.asset_type),
                ],
            ),
            EventPayload::Assignment(d) => (
                Action::Assignment,
                Target::base(target.base_id),
                vec![LockKey::Asset(d.asset_id)],
            ),
            EventPayload::Expenditure(d) => (
                Action::Expenditure,
                Target::base(target.base_id),
                vec![LockKey::Balance(target.base_id, d.asset_type)],
            ),
            EventPayload::StatusChange(_)
            | EventPayload::AssetEnrolment(_)
            | EventPayload::AssetStatusChange(_) => {
                return Err(LedgerError::NotTransitionable(target.id));
            }
        };
        if occurred_at < target.occurred_at {
            return Err(LedgerError::ChangePrecedesEvent { target: target.id });
        }

        AuthorizationGate::authorize(actor, action, scope)?;

        let _locks = self.locks.acquire(keys)?;
        let (_, view) = self.replay_head()?;
        let state = view
            .movement(target.id)
            .ok_or(LedgerError::EventNotFound(target.id))?;
        if state.steps.last().is_some_and(|step| occurred_at < step.at) {
            return Err(LedgerError::ChangePrecedesEvent { target: target.id });
        }
        StatusWorkflow::validate(target.id, kind, state.status, request.to)?;

        if let EventPayload::Transfer(d) = &target.payload
            && request.to == EventStatus::Completed
        {
            // The reservation covers the live count; a backdated completion
            // must also fit the stock held at its date and after.
            let position =
                BalanceProjector::position_from(&view, target.base_id, d.asset_type, occurred_at);
            if position.on_hand < i64::from(d.quantity) {
                return Err(LedgerError::InsufficientBalance {
                    base_id: target.base_id,
                    asset_type: d.asset_type,
                    requested: d.quantity,
                    available: position.on_hand,
                });
            }
        }

        let payload = EventPayload::StatusChange(StatusChangeDetails {
            target: target.id,
            target_kind: kind,
            from: state.status,
            to: request.to,
            note: request.note.clone(),
        });
        let record = self.append(actor, target.base_id, occurred_at, payload)?;

        if let EventPayload::Assignment(d) = &target.payload
            && request.to == EventStatus::Returned
        {
            self.release_asset(&record, d.asset_id, occurred_at);
        }
        Ok(record)
    }

    /// Returns an assigned asset to stock. Assets moved elsewhere by hand
    /// while assigned (e.g. into maintenance) stay where they are.
    fn release_asset(&self, record: &LedgerRecord, asset_id: AssetId, at: DateTime<Utc>) {
        let result = self.registry.get_asset(asset_id).and_then(|asset| {
            if asset.status == AssetStatus::Assigned {
                self.registry
                    .apply_status_change(asset_id, AssetStatus::Available, record.id, at)
            } else {
                Ok(asset)
            }
        });
        Self::sync_registry(record, result);
    }

    fn append(
        &self,
        actor: &Actor,
        base_id: BaseId,
        occurred_at: DateTime<Utc>,
        payload: EventPayload,
    ) -> Result<LedgerRecord, LedgerError> {
        let draft = RecordDraft {
            base_id,
            actor: actor.id,
            occurred_at,
            recorded_at: self.clock.now(),
            payload,
        };
        self.events.append(draft).map_err(|err| {
            error!(error = %err, "failed to append ledger record");
            LedgerError::from(err)
        })
    }

    /// Registry writes happen after the append. A failure here leaves the
    /// committed record authoritative; `reconcile_registry` restores the
    /// registry from the log.
    fn sync_registry(record: &LedgerRecord, result: Result<Asset, AssetError>) {
        if let Err(err) = result {
            error!(
                event_id = %record.id,
                error = %err,
                "registry side effect failed; run reconcile_registry"
            );
        }
    }

    fn ensure_not_future(&self, occurred_at: DateTime<Utc>) -> Result<(), LedgerError> {
        let now = self.clock.now();
        if occurred_at > now {
            return Err(LedgerError::FutureDated { occurred_at, now });
        }
        Ok(())
    }

    /// Admits a draw of `requested` units dated `at`.
    fn ensure_available(
        view: &LedgerView,
        base_id: BaseId,
        asset_type: AssetType,
        requested: u32,
        at: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let position = BalanceProjector::position_from(view, base_id, asset_type, at);
        debug!(
            %base_id,
            %asset_type,
            %at,
            requested,
            on_hand = position.on_hand,
            available = position.available,
            "admission check"
        );
        if i64::from(requested) > position.available {
            return Err(LedgerError::InsufficientBalance {
                base_id,
                asset_type,
                requested,
                available: position.available,
            });
        }
        Ok(())
    }

    // ========== Reads ==========

    fn replay_at(
        &self,
        cursor: LedgerCursor,
    ) -> Result<(Vec<LedgerRecord>, LedgerView), LedgerError> {
        let records = self.events.scan_range(EventId::FIRST, cursor)?;
        let view = LedgerView::replay(&records, cursor);
        Ok((records, view))
    }

    fn replay_head(&self) -> Result<(Vec<LedgerRecord>, LedgerView), LedgerError> {
        self.replay_at(self.events.head()?)
    }

    /// Returns one record with its effective status.
    pub fn get_event(&self, id: EventId) -> Result<EventView, LedgerError> {
        let record = self.events.get(id)?.ok_or(LedgerError::EventNotFound(id))?;
        let (_, view) = self.replay_head()?;
        Ok(EventView::build(&record, &view, self.clock.today()))
    }

    /// Effective status of a movement, `overdue` included.
    pub fn effective_status(&self, id: EventId) -> Result<EventStatus, LedgerError> {
        self.get_event(id)?
            .status
            .ok_or(LedgerError::NotTransitionable(id))
    }

    /// Lists records newest first, filtered and paginated.
    ///
    /// Page size is capped at `ledger.max_page_size`.
    pub fn list_events(
        &self,
        filter: &EventFilter,
        page: PageRequest,
    ) -> Result<PageResponse<EventView>, LedgerError> {
        let page = page.clamped(self.config.max_page_size);
        let (records, view) = self.replay_head()?;
        let today = self.clock.today();

        let items: Vec<EventView> = records
            .iter()
            .rev()
            .map(|record| EventView::build(record, &view, today))
            .filter(|event| filter.matches(event))
            .collect();
        Ok(PageResponse::paginate(items, page))
    }

    /// Live on-hand and available figures for one pair.
    pub fn position(&self, base_id: BaseId, asset_type: AssetType) -> Result<Position, LedgerError> {
        self.bases.require(base_id)?;
        let (_, view) = self.replay_head()?;
        Ok(BalanceProjector::position(&view, base_id, asset_type))
    }

    /// Projects dashboard figures at the current ledger head.
    pub fn project(
        &self,
        scope: BaseScope,
        asset_type: AssetTypeFilter,
        range: DateRange,
    ) -> Result<BalanceSnapshot, LedgerError> {
        self.project_at(self.events.head()?, scope, asset_type, range)
    }

    /// Projects dashboard figures at an explicit ledger version.
    pub fn project_at(
        &self,
        cursor: LedgerCursor,
        scope: BaseScope,
        asset_type: AssetTypeFilter,
        range: DateRange,
    ) -> Result<BalanceSnapshot, LedgerError> {
        if let BaseScope::Base(base_id) = scope {
            self.bases.require(base_id)?;
        }
        let (_, view) = self.replay_at(cursor)?;
        let snapshot =
            BalanceProjector::project(&view, scope, asset_type, range, self.clock.today());
        debug!(%cursor, %scope, %asset_type, closing = snapshot.closing_balance, "balance projected");
        Ok(snapshot)
    }

    // ========== Maintenance ==========

    /// Rebuilds every registry-affecting record into the asset store.
    ///
    /// Replays enrolments, assignments, returns and manual status changes
    /// in id order. Running it twice yields the same registry. Intended for
    /// startup or after a logged registry side-effect failure.
    ///
    /// Holds the registry exclusively, so no asset mutation can land between
    /// the replay and the restore.
    pub fn reconcile_registry(&self) -> Result<usize, LedgerError> {
        let _registry = self.locks.acquire_registry()?;
        let (records, _) = self.replay_head()?;

        let mut assets: BTreeMap<AssetId, AssetRecord> = BTreeMap::new();
        let mut assignment_assets: HashMap<EventId, AssetId> = HashMap::new();

        for record in &records {
            match &record.payload {
                EventPayload::AssetEnrolment(d) => {
                    let mut asset = d.asset.clone();
                    asset.status = AssetStatus::Available;
                    let history = vec![AssetTransition {
                        from: None,
                        to: AssetStatus::Available,
                        causing_event: record.id,
                        at: record.occurred_at,
                    }];
                    assets.insert(asset.id, AssetRecord { asset, history });
                }
                EventPayload::Assignment(d) => {
                    assignment_assets.insert(record.id, d.asset_id);
                    Self::push_transition(&mut assets, d.asset_id, AssetStatus::Assigned, record);
                }
                EventPayload::StatusChange(change) if change.to == EventStatus::Returned => {
                    if let Some(&asset_id) = assignment_assets.get(&change.target)
                        && assets
                            .get(&asset_id)
                            .is_some_and(|stored| stored.asset.status == AssetStatus::Assigned)
                    {
                        Self::push_transition(&mut assets, asset_id, AssetStatus::Available, record);
                    }
                }
                EventPayload::AssetStatusChange(d) => {
                    Self::push_transition(&mut assets, d.asset_id, d.to, record);
                }
                _ => {}
            }
        }

        let count = self.registry.restore(assets.into_values().collect())?;
        info!(count, "asset registry reconciled");
        Ok(count)
    }

    fn push_transition(
        assets: &mut BTreeMap<AssetId, AssetRecord>,
        asset_id: AssetId,
        to: AssetStatus,
        record: &LedgerRecord,
    ) {
        if let Some(stored) = assets.get_mut(&asset_id) {
            stored.history.push(AssetTransition {
                from: Some(stored.asset.status),
                to,
                causing_event: record.id,
                at: record.occurred_at,
            });
            stored.asset.status = to;
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
