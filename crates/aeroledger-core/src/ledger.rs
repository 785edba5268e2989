//! The provenance ledger
//!
//! `Ledger` owns every table: the stakeholder registry, part records, the two
//! per-part history logs, the owner index and the event journal.
//!
//! Mutation is two-phase. `validate` checks a command against the current
//! state and produces the `ValidatedEvent` it would cause without touching
//! anything; `commit` folds that event into the tables and appends it to the
//! journal. `execute` does both. A rejected command leaves no trace.
//!
//! Events only enter the tables through `commit` or `replay`, so every
//! journal entry has passed the same guards.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

use crate::access;
use crate::command::Command;
use crate::error::{LedgerError, Result};
use crate::event::{JournalEntry, LedgerEvent};
use crate::types::{
    Address, CustodyRecord, MaintenanceRecord, Part, PartId, PartStatus, Role, Stakeholder,
};

/// An event checked against the ledger at one journal position
///
/// Only `Ledger::validate` creates these. `Ledger::commit` accepts one only
/// while the ledger is still at the position it was checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    seq: u64,
    event: LedgerEvent,
}

impl ValidatedEvent {
    /// Sequence number the event will take in the journal
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn event(&self) -> &LedgerEvent {
        &self.event
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    /// Administrator fixed at construction
    admin: Address,
    stakeholders: HashMap<Address, Stakeholder>,
    parts: BTreeMap<PartId, Part>,
    custody: HashMap<PartId, Vec<CustodyRecord>>,
    maintenance: HashMap<PartId, Vec<MaintenanceRecord>>,
    /// current owner -> ids of the parts it holds
    owner_index: HashMap<Address, BTreeSet<PartId>>,
    next_part_id: PartId,
    journal: Vec<JournalEntry>,
}

impl Ledger {
    /// Create an empty ledger administered by `admin`
    pub fn new(admin: impl Into<Address>) -> Self {
        let admin = admin.into();
        info!(admin = %admin, "Ledger initialized");

        Self {
            admin,
            stakeholders: HashMap::new(),
            parts: BTreeMap::new(),
            custody: HashMap::new(),
            maintenance: HashMap::new(),
            owner_index: HashMap::new(),
            next_part_id: PartId::FIRST,
            journal: Vec::new(),
        }
    }

    /// Rebuild a ledger from a journal
    ///
    /// Each event is re-validated against the state built so far, so a
    /// journal that could not have been produced by this ledger is rejected.
    pub fn replay<I>(admin: impl Into<Address>, events: I) -> Result<Self>
    where
        I: IntoIterator<Item = LedgerEvent>,
    {
        let mut ledger = Self::new(admin);

        for event in events {
            let seq = ledger.last_seq() + 1;
            let (caller, command) = event.to_command(&ledger.admin);

            let expected = ledger
                .validate(&caller, &command, event.at())
                .map_err(|e| LedgerError::Journal { seq, reason: e.to_string() })?;

            if expected.event != event {
                return Err(LedgerError::Journal {
                    seq,
                    reason: format!("{} does not match ledger state", event.kind()),
                });
            }

            ledger.apply(expected.event);
        }

        info!(
            events = ledger.last_seq(),
            parts = ledger.part_count(),
            stakeholders = ledger.stakeholder_count(),
            "Ledger replayed from journal"
        );

        Ok(ledger)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Check `command` from `caller` against the current state
    ///
    /// Returns the event the command would produce at time `at`.
    pub fn validate(
        &self,
        caller: &Address,
        command: &Command,
        at: DateTime<Utc>,
    ) -> Result<ValidatedEvent> {
        let event = self.check(caller, command, at)?;
        Ok(ValidatedEvent {
            seq: self.last_seq() + 1,
            event,
        })
    }

    fn check(
        &self,
        caller: &Address,
        command: &Command,
        at: DateTime<Utc>,
    ) -> Result<LedgerEvent> {
        match command {
            Command::RegisterStakeholder { identity, name, role } => {
                access::admin_only(&self.admin, caller)?;
                if self.stakeholders.contains_key(identity) {
                    return Err(LedgerError::AlreadyRegistered(identity.clone()));
                }
                Ok(LedgerEvent::StakeholderRegistered {
                    identity: identity.clone(),
                    name: name.clone(),
                    role: *role,
                    at,
                })
            }

            Command::DeactivateStakeholder { identity } => {
                access::admin_only(&self.admin, caller)?;
                if !self.stakeholders.contains_key(identity) {
                    return Err(LedgerError::stakeholder_not_found(identity));
                }
                // owners must stay active
                if let Some(held) = self.owner_index.get(identity).filter(|h| !h.is_empty()) {
                    return Err(LedgerError::HoldsParts {
                        identity: identity.clone(),
                        count: held.len(),
                    });
                }
                Ok(LedgerEvent::StakeholderDeactivated {
                    identity: identity.clone(),
                    at,
                })
            }

            Command::RegisterPart {
                part_number,
                serial_number,
                part_name,
                certificate_ref,
            } => {
                access::role_only(self.stakeholders.get(caller), caller, Role::Manufacturer)?;
                Ok(LedgerEvent::PartRegistered {
                    id: self.next_part_id,
                    part_number: part_number.clone(),
                    serial_number: serial_number.clone(),
                    part_name: part_name.clone(),
                    certificate_ref: certificate_ref.clone(),
                    manufacturer: caller.clone(),
                    at,
                })
            }

            Command::UpdateStatus { part_id, status } => {
                let part = self.get_part(*part_id)?;
                access::owner_only(part, caller)?;
                Ok(LedgerEvent::PartStatusUpdated {
                    id: *part_id,
                    status: *status,
                    by: caller.clone(),
                    at,
                })
            }

            Command::TransferCustody { part_id, to, reason } => {
                let part = self.get_part(*part_id)?;
                access::owner_only(part, caller)?;
                if !access::is_active(self.stakeholders.get(to)) {
                    return Err(LedgerError::InvalidRecipient(to.clone()));
                }
                Ok(LedgerEvent::CustodyTransferred {
                    id: *part_id,
                    from: part.current_owner.clone(),
                    to: to.clone(),
                    reason: reason.clone(),
                    at,
                })
            }

            Command::RecordMaintenance {
                part_id,
                maintenance_type,
                report_ref,
                notes,
            } => {
                access::role_only(self.stakeholders.get(caller), caller, Role::Mro)?;
                self.get_part(*part_id)?;
                Ok(LedgerEvent::MaintenanceRecorded {
                    id: *part_id,
                    record_index: self.maintenance_len(*part_id) + 1,
                    performer: caller.clone(),
                    maintenance_type: maintenance_type.clone(),
                    report_ref: report_ref.clone(),
                    notes: notes.clone(),
                    at,
                })
            }
        }
    }

    /// Apply an event produced by `validate` against the current state
    ///
    /// Fails with `LedgerError::Journal` if the ledger has moved since the
    /// event was validated.
    pub fn commit(&mut self, validated: ValidatedEvent) -> Result<JournalEntry> {
        if validated.seq != self.last_seq() + 1 {
            return Err(LedgerError::Journal {
                seq: validated.seq,
                reason: format!(
                    "validated for seq {}, ledger is at seq {}",
                    validated.seq,
                    self.last_seq()
                ),
            });
        }
        Ok(self.apply(validated.event))
    }

    /// Fold a checked event into the tables and append it to the journal
    fn apply(&mut self, event: LedgerEvent) -> JournalEntry {
        match &event {
            LedgerEvent::StakeholderRegistered { identity, name, role, at } => {
                info!(identity = %identity, name = %name, role = %role, "Registered stakeholder");
                self.stakeholders.insert(
                    identity.clone(),
                    Stakeholder {
                        identity: identity.clone(),
                        name: name.clone(),
                        role: *role,
                        active: true,
                        registered_at: *at,
                    },
                );
            }

            LedgerEvent::StakeholderDeactivated { identity, .. } => {
                if let Some(stakeholder) = self.stakeholders.get_mut(identity) {
                    info!(identity = %identity, "Deactivated stakeholder");
                    stakeholder.active = false;
                }
            }

            LedgerEvent::PartRegistered {
                id,
                part_number,
                serial_number,
                part_name,
                certificate_ref,
                manufacturer,
                at,
            } => {
                info!(
                    part_id = %id,
                    part_number = %part_number,
                    manufacturer = %manufacturer,
                    "Registered part"
                );
                self.parts.insert(
                    *id,
                    Part {
                        id: *id,
                        part_number: part_number.clone(),
                        serial_number: serial_number.clone(),
                        part_name: part_name.clone(),
                        manufacturer: manufacturer.clone(),
                        current_owner: manufacturer.clone(),
                        status: PartStatus::Manufactured,
                        certificate_ref: certificate_ref.clone(),
                        manufactured_at: *at,
                    },
                );
                self.owner_index
                    .entry(manufacturer.clone())
                    .or_default()
                    .insert(*id);
                self.custody.entry(*id).or_default();
                self.maintenance.entry(*id).or_default();
                if *id >= self.next_part_id {
                    self.next_part_id = id.next();
                }
            }

            LedgerEvent::PartStatusUpdated { id, status, .. } => {
                if let Some(part) = self.parts.get_mut(id) {
                    info!(part_id = %id, from = %part.status, to = %status, "Updated part status");
                    part.status = *status;
                }
            }

            LedgerEvent::CustodyTransferred { id, from, to, reason, at } => {
                if let Some(part) = self.parts.get_mut(id) {
                    info!(part_id = %id, from = %from, to = %to, "Transferred custody");
                    part.current_owner = to.clone();
                    part.status = PartStatus::InTransit;
                    self.reindex_owner(*id, from, to);
                    self.custody.entry(*id).or_default().push(CustodyRecord {
                        from: from.clone(),
                        to: to.clone(),
                        reason: reason.clone(),
                        timestamp: *at,
                    });
                }
            }

            LedgerEvent::MaintenanceRecorded {
                id,
                record_index,
                performer,
                maintenance_type,
                report_ref,
                notes,
                at,
            } => {
                if self.parts.contains_key(id) {
                    info!(
                        part_id = %id,
                        record_index = record_index,
                        performer = %performer,
                        maintenance_type = %maintenance_type,
                        "Recorded maintenance"
                    );
                    self.maintenance.entry(*id).or_default().push(MaintenanceRecord {
                        performed_by: performer.clone(),
                        maintenance_type: maintenance_type.clone(),
                        report_ref: report_ref.clone(),
                        notes: notes.clone(),
                        timestamp: *at,
                    });
                }
            }
        }

        let entry = JournalEntry {
            seq: self.last_seq() + 1,
            event,
        };
        debug!(seq = entry.seq, kind = entry.event.kind(), "Appended journal entry");
        self.journal.push(entry.clone());
        entry
    }

    /// Validate and apply `command` at the current time
    pub fn execute(&mut self, caller: &Address, command: Command) -> Result<JournalEntry> {
        self.execute_at(caller, command, Utc::now())
    }

    /// Validate and apply `command` at time `at`
    pub fn execute_at(
        &mut self,
        caller: &Address,
        command: Command,
        at: DateTime<Utc>,
    ) -> Result<JournalEntry> {
        let validated = self.validate(caller, &command, at)?;
        self.commit(validated)
    }

    fn reindex_owner(&mut self, id: PartId, from: &Address, to: &Address) {
        if let Some(ids) = self.owner_index.get_mut(from) {
            ids.remove(&id);
            if ids.is_empty() {
                self.owner_index.remove(from);
            }
        }
        self.owner_index.entry(to.clone()).or_default().insert(id);
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Register a stakeholder; admin only
    pub fn register_stakeholder(
        &mut self,
        caller: &Address,
        identity: impl Into<Address>,
        name: impl Into<String>,
        role: Role,
    ) -> Result<()> {
        self.execute(
            caller,
            Command::RegisterStakeholder {
                identity: identity.into(),
                name: name.into(),
                role,
            },
        )?;
        Ok(())
    }

    /// Mark a stakeholder inactive; admin only
    pub fn deactivate_stakeholder(
        &mut self,
        caller: &Address,
        identity: impl Into<Address>,
    ) -> Result<()> {
        self.execute(
            caller,
            Command::DeactivateStakeholder {
                identity: identity.into(),
            },
        )?;
        Ok(())
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    pub fn get_stakeholder(&self, identity: &Address) -> Option<&Stakeholder> {
        self.stakeholders.get(identity)
    }

    pub fn stakeholder_count(&self) -> usize {
        self.stakeholders.len()
    }

    // =========================================================================
    // Parts
    // =========================================================================

    /// Register a part as the calling manufacturer, returning its id
    pub fn register_part(
        &mut self,
        caller: &Address,
        part_number: impl Into<String>,
        serial_number: impl Into<String>,
        part_name: impl Into<String>,
        certificate_ref: impl Into<String>,
    ) -> Result<PartId> {
        let id = self.next_part_id;
        self.execute(
            caller,
            Command::RegisterPart {
                part_number: part_number.into(),
                serial_number: serial_number.into(),
                part_name: part_name.into(),
                certificate_ref: certificate_ref.into(),
            },
        )?;
        Ok(id)
    }

    /// Set a part's status; current owner only, any status accepted
    pub fn update_status(
        &mut self,
        caller: &Address,
        part_id: PartId,
        status: PartStatus,
    ) -> Result<()> {
        self.execute(caller, Command::UpdateStatus { part_id, status })?;
        Ok(())
    }

    pub fn get_part(&self, part_id: PartId) -> Result<&Part> {
        self.parts
            .get(&part_id)
            .ok_or_else(|| LedgerError::part_not_found(part_id))
    }

    /// Number of parts ever registered
    pub fn part_count(&self) -> u64 {
        self.parts.len() as u64
    }

    /// Ids of the parts `identity` currently holds, ascending
    pub fn get_stakeholder_parts(&self, identity: &Address) -> Vec<PartId> {
        self.owner_index
            .get(identity)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether the part's manufacturer is still an active stakeholder;
    /// regulators only
    pub fn verify_authenticity(&self, caller: &Address, part_id: PartId) -> Result<bool> {
        access::role_only(self.stakeholders.get(caller), caller, Role::Regulator)?;
        let part = self.get_part(part_id)?;
        Ok(access::is_active(self.stakeholders.get(&part.manufacturer)))
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Move a part to `to`; current owner only
    pub fn transfer_custody(
        &mut self,
        caller: &Address,
        part_id: PartId,
        to: impl Into<Address>,
        reason: impl Into<String>,
    ) -> Result<()> {
        self.execute(
            caller,
            Command::TransferCustody {
                part_id,
                to: to.into(),
                reason: reason.into(),
            },
        )?;
        Ok(())
    }

    /// Append a maintenance record; MROs only
    ///
    /// Returns the 1-based index of the new record.
    pub fn record_maintenance(
        &mut self,
        caller: &Address,
        part_id: PartId,
        maintenance_type: impl Into<String>,
        report_ref: impl Into<String>,
        notes: impl Into<String>,
    ) -> Result<u64> {
        self.execute(
            caller,
            Command::RecordMaintenance {
                part_id,
                maintenance_type: maintenance_type.into(),
                report_ref: report_ref.into(),
                notes: notes.into(),
            },
        )?;
        Ok(self.maintenance_len(part_id))
    }

    pub fn get_custody_history(&self, part_id: PartId) -> Result<&[CustodyRecord]> {
        self.get_part(part_id)?;
        Ok(self.custody.get(&part_id).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn get_maintenance_history(&self, part_id: PartId) -> Result<&[MaintenanceRecord]> {
        self.get_part(part_id)?;
        Ok(self.maintenance.get(&part_id).map(Vec::as_slice).unwrap_or(&[]))
    }

    fn maintenance_len(&self, part_id: PartId) -> u64 {
        self.maintenance.get(&part_id).map(Vec::len).unwrap_or(0) as u64
    }

    // =========================================================================
    // Journal
    // =========================================================================

    /// Sequence number of the newest journal entry, 0 when empty
    pub fn last_seq(&self) -> u64 {
        self.journal.len() as u64
    }

    /// Journal entries with a sequence number greater than `since`
    pub fn events_since(&self, since: u64) -> &[JournalEntry] {
        let start = usize::try_from(since)
            .unwrap_or(usize::MAX)
            .min(self.journal.len());
        &self.journal[start..]
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{ADMIN_ONLY, OWNER_ONLY};

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    /// Ledger with one stakeholder per role
    fn seeded() -> Ledger {
        let admin = addr("admin");
        let mut ledger = Ledger::new(admin.clone());
        ledger
            .register_stakeholder(&admin, "m", "Boeing Manufacturing", Role::Manufacturer)
            .unwrap();
        ledger
            .register_stakeholder(&admin, "a", "Delta Airlines", Role::Airline)
            .unwrap();
        ledger
            .register_stakeholder(&admin, "mro", "AAR Corp MRO", Role::Mro)
            .unwrap();
        ledger
            .register_stakeholder(&admin, "faa", "FAA", Role::Regulator)
            .unwrap();
        ledger
    }

    #[test]
    fn test_register_stakeholder() {
        let ledger = seeded();
        let m = ledger.get_stakeholder(&addr("m")).unwrap();
        assert_eq!(m.name, "Boeing Manufacturing");
        assert_eq!(m.role, Role::Manufacturer);
        assert!(m.active);
        assert_eq!(ledger.stakeholder_count(), 4);
        assert!(ledger.get_stakeholder(&addr("nobody")).is_none());
    }

    #[test]
    fn test_register_stakeholder_requires_admin() {
        let mut ledger = seeded();
        let err = ledger
            .register_stakeholder(&addr("m"), "x", "Unauthorized", Role::Manufacturer)
            .unwrap_err();
        assert_eq!(err, LedgerError::Unauthorized(ADMIN_ONLY.into()));
        assert!(ledger.get_stakeholder(&addr("x")).is_none());
    }

    #[test]
    fn test_register_stakeholder_twice() {
        let mut ledger = seeded();
        let before = ledger.last_seq();
        let err = ledger
            .register_stakeholder(&addr("admin"), "m", "Duplicate", Role::Airline)
            .unwrap_err();
        assert_eq!(err, LedgerError::AlreadyRegistered(addr("m")));
        assert_eq!(ledger.get_stakeholder(&addr("m")).unwrap().role, Role::Manufacturer);
        assert_eq!(ledger.last_seq(), before);
    }

    #[test]
    fn test_register_part() {
        let mut ledger = seeded();
        let m = addr("m");
        let id = ledger
            .register_part(&m, "ENG-001", "SN123456", "Turbine Blade", "QmTest123")
            .unwrap();
        assert_eq!(id, PartId(1));

        let part = ledger.get_part(id).unwrap();
        assert_eq!(part.part_number, "ENG-001");
        assert_eq!(part.serial_number, "SN123456");
        assert_eq!(part.manufacturer, m);
        assert_eq!(part.current_owner, m);
        assert_eq!(part.status, PartStatus::Manufactured);
        assert_eq!(part.certificate_ref, "QmTest123");

        match &ledger.journal().last().unwrap().event {
            LedgerEvent::PartRegistered { id, part_number, manufacturer, .. } => {
                assert_eq!(*id, PartId(1));
                assert_eq!(part_number, "ENG-001");
                assert_eq!(*manufacturer, m);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_register_part_requires_manufacturer() {
        let mut ledger = seeded();
        let err = ledger
            .register_part(&addr("a"), "ENG-001", "SN1", "Turbine Blade", "Qm1")
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::Unauthorized("only manufacturers can perform this action".into())
        );
        assert_eq!(ledger.part_count(), 0);

        // rejected attempts do not consume ids
        let id = ledger
            .register_part(&addr("m"), "ENG-001", "SN1", "Turbine Blade", "Qm1")
            .unwrap();
        assert_eq!(id, PartId(1));
    }

    #[test]
    fn test_duplicate_part_numbers_allowed() {
        let mut ledger = seeded();
        let m = addr("m");
        let first = ledger.register_part(&m, "ENG-001", "SN1", "Blade", "Qm1").unwrap();
        let second = ledger.register_part(&m, "ENG-001", "SN1", "Blade", "Qm1").unwrap();
        assert_eq!(first, PartId(1));
        assert_eq!(second, PartId(2));
    }

    #[test]
    fn test_update_status() {
        let mut ledger = seeded();
        let m = addr("m");
        let id = ledger.register_part(&m, "ENG-001", "SN1", "Blade", "Qm1").unwrap();

        ledger.update_status(&m, id, PartStatus::Retired).unwrap();
        assert_eq!(ledger.get_part(id).unwrap().status, PartStatus::Retired);

        // no transition table
        ledger.update_status(&m, id, PartStatus::Manufactured).unwrap();
        assert_eq!(ledger.get_part(id).unwrap().status, PartStatus::Manufactured);

        let err = ledger.update_status(&addr("a"), id, PartStatus::Installed).unwrap_err();
        assert_eq!(err, LedgerError::Unauthorized(OWNER_ONLY.into()));

        let err = ledger.update_status(&m, PartId(99), PartStatus::Installed).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
    }

    #[test]
    fn test_transfer_custody() {
        let mut ledger = seeded();
        let (m, a, mro) = (addr("m"), addr("a"), addr("mro"));
        let id = ledger.register_part(&m, "ENG-001", "SN1", "Blade", "Qm1").unwrap();

        ledger.transfer_custody(&m, id, a.clone(), "Sale").unwrap();
        ledger.transfer_custody(&a, id, mro.clone(), "Maintenance").unwrap();

        let part = ledger.get_part(id).unwrap();
        assert_eq!(part.current_owner, mro);
        assert_eq!(part.status, PartStatus::InTransit);
        assert_eq!(part.manufacturer, m);

        let history = ledger.get_custody_history(id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!((&history[0].from, &history[0].to), (&m, &a));
        assert_eq!((&history[1].from, &history[1].to), (&a, &mro));
        assert_eq!(history[1].reason, "Maintenance");
    }

    #[test]
    fn test_transfer_rejections_leave_state_unchanged() {
        let mut ledger = seeded();
        let (m, a) = (addr("m"), addr("a"));
        let id = ledger.register_part(&m, "ENG-001", "SN1", "Blade", "Qm1").unwrap();
        let snapshot = ledger.clone();

        let err = ledger.transfer_custody(&a, id, addr("mro"), "Steal").unwrap_err();
        assert_eq!(err, LedgerError::Unauthorized(OWNER_ONLY.into()));

        let err = ledger.transfer_custody(&m, id, addr("stranger"), "Invalid").unwrap_err();
        assert_eq!(err, LedgerError::InvalidRecipient(addr("stranger")));

        ledger.deactivate_stakeholder(&addr("admin"), "a").unwrap();
        let snapshot_after_deactivate = ledger.clone();
        let err = ledger.transfer_custody(&m, id, a.clone(), "Sale").unwrap_err();
        assert_eq!(err, LedgerError::InvalidRecipient(a));

        let err = ledger.transfer_custody(&m, PartId(7), addr("mro"), "x").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);

        assert_eq!(ledger, snapshot_after_deactivate);
        assert_eq!(ledger.get_part(id).unwrap(), snapshot.get_part(id).unwrap());
        assert!(ledger.get_custody_history(id).unwrap().is_empty());
    }

    #[test]
    fn test_record_maintenance() {
        let mut ledger = seeded();
        let (m, mro) = (addr("m"), addr("mro"));
        let id = ledger.register_part(&m, "ENG-001", "SN1", "Blade", "Qm1").unwrap();

        // any MRO may record, custody not required
        let first = ledger
            .record_maintenance(&mro, id, "Inspection", "QmReport1", "First inspection")
            .unwrap();
        let second = ledger
            .record_maintenance(&mro, id, "Repair", "QmReport2", "Minor repair")
            .unwrap();
        assert_eq!((first, second), (1, 2));

        let history = ledger.get_maintenance_history(id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].maintenance_type, "Inspection");
        assert_eq!(history[1].maintenance_type, "Repair");
        assert_eq!(history[0].performed_by, mro);

        match &ledger.journal().last().unwrap().event {
            LedgerEvent::MaintenanceRecorded { id: part, record_index, performer, .. } => {
                assert_eq!((*part, *record_index), (id, 2));
                assert_eq!(*performer, mro);
            }
            other => panic!("unexpected event {:?}", other),
        }

        let err = ledger
            .record_maintenance(&addr("a"), id, "Inspection", "Qm", "Unauthorized")
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::Unauthorized("only MROs can perform this action".into())
        );

        let err = ledger
            .record_maintenance(&mro, PartId(5), "Inspection", "Qm", "")
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
    }

    #[test]
    fn test_histories_empty_for_new_part() {
        let mut ledger = seeded();
        let id = ledger.register_part(&addr("m"), "ENG-001", "SN1", "Blade", "Qm1").unwrap();
        assert!(ledger.get_custody_history(id).unwrap().is_empty());
        assert!(ledger.get_maintenance_history(id).unwrap().is_empty());
        assert!(ledger.get_custody_history(PartId(2)).is_err());
    }

    #[test]
    fn test_verify_authenticity() {
        let mut ledger = seeded();
        let (m, faa) = (addr("m"), addr("faa"));
        let id = ledger.register_part(&m, "ENG-001", "SN1", "Blade", "Qm1").unwrap();

        assert!(ledger.verify_authenticity(&faa, id).unwrap());

        let err = ledger.verify_authenticity(&addr("a"), id).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Unauthorized("only regulators can perform this action".into())
        );

        let err = ledger.verify_authenticity(&faa, PartId(42)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);

        ledger.transfer_custody(&m, id, addr("a"), "Sale").unwrap();
        ledger.deactivate_stakeholder(&addr("admin"), "m").unwrap();
        assert!(!ledger.verify_authenticity(&faa, id).unwrap());
    }

    #[test]
    fn test_deactivation() {
        let mut ledger = seeded();
        let admin = addr("admin");

        let err = ledger.deactivate_stakeholder(&addr("m"), "a").unwrap_err();
        assert_eq!(err, LedgerError::Unauthorized(ADMIN_ONLY.into()));

        let err = ledger.deactivate_stakeholder(&admin, "ghost").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);

        ledger.deactivate_stakeholder(&admin, "mro").unwrap();
        let mro = ledger.get_stakeholder(&addr("mro")).unwrap();
        assert!(!mro.active);
        assert_eq!(mro.role, Role::Mro);

        let id = ledger.register_part(&addr("m"), "ENG-001", "SN1", "Blade", "Qm1").unwrap();
        assert!(ledger
            .record_maintenance(&addr("mro"), id, "Inspection", "Qm", "")
            .is_err());
    }

    #[test]
    fn test_deactivation_refused_while_holding_parts() {
        let mut ledger = seeded();
        let (admin, m, a) = (addr("admin"), addr("m"), addr("a"));
        let p1 = ledger.register_part(&m, "ENG-001", "SN1", "Blade", "Qm1").unwrap();
        let p2 = ledger.register_part(&m, "ENG-002", "SN2", "Mount", "Qm2").unwrap();
        let snapshot = ledger.clone();

        let err = ledger.deactivate_stakeholder(&admin, "m").unwrap_err();
        assert_eq!(
            err,
            LedgerError::HoldsParts {
                identity: m.clone(),
                count: 2
            }
        );
        assert_eq!(ledger, snapshot);
        assert!(ledger.get_stakeholder(&m).unwrap().active);

        ledger.transfer_custody(&m, p1, a.clone(), "Sale").unwrap();
        let err = ledger.deactivate_stakeholder(&admin, "m").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::HoldsParts);

        ledger.transfer_custody(&m, p2, a.clone(), "Sale").unwrap();
        ledger.deactivate_stakeholder(&admin, "m").unwrap();

        // the airline now holds both, so it stays active
        let err = ledger.deactivate_stakeholder(&admin, "a").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::HoldsParts);
        for id in ledger.get_stakeholder_parts(&a) {
            let owner = &ledger.get_part(id).unwrap().current_owner;
            assert!(ledger.get_stakeholder(owner).unwrap().active);
        }
    }

    #[test]
    fn test_commit_rejects_stale_validation() {
        let mut ledger = seeded();
        let m = addr("m");
        let register = Command::RegisterPart {
            part_number: "ENG-001".into(),
            serial_number: "SN1".into(),
            part_name: "Blade".into(),
            certificate_ref: "Qm1".into(),
        };

        let first = ledger.validate(&m, &register, Utc::now()).unwrap();
        let second = ledger.validate(&m, &register, Utc::now()).unwrap();
        assert_eq!(first.seq(), 5);
        assert!(matches!(
            first.event(),
            LedgerEvent::PartRegistered { id: PartId(1), .. }
        ));

        let entry = ledger.commit(first).unwrap();
        assert_eq!(entry.seq, 5);

        // both claimed part 1; the second no longer fits
        let snapshot = ledger.clone();
        let err = ledger.commit(second).unwrap_err();
        assert!(matches!(err, LedgerError::Journal { seq: 5, .. }));
        assert_eq!(ledger, snapshot);
        assert_eq!(ledger.part_count(), 1);
    }

    #[test]
    fn test_stakeholder_parts_follow_transfers() {
        let mut ledger = seeded();
        let (m, a) = (addr("m"), addr("a"));
        let p1 = ledger.register_part(&m, "ENG-001", "SN1", "Blade", "Qm1").unwrap();
        let p2 = ledger.register_part(&m, "ENG-002", "SN2", "Mount", "Qm2").unwrap();
        let p3 = ledger.register_part(&m, "LG-003", "SN3", "Strut", "Qm3").unwrap();

        assert_eq!(ledger.get_stakeholder_parts(&m), vec![p1, p2, p3]);

        ledger.transfer_custody(&m, p2, a.clone(), "Sale").unwrap();
        assert_eq!(ledger.get_stakeholder_parts(&m), vec![p1, p3]);
        assert_eq!(ledger.get_stakeholder_parts(&a), vec![p2]);
        assert!(ledger.get_stakeholder_parts(&addr("mro")).is_empty());
    }

    #[test]
    fn test_reference_scenario() {
        let admin = addr("admin");
        let (m, a) = (addr("M"), addr("A"));
        let mut ledger = Ledger::new(admin.clone());
        ledger.register_stakeholder(&admin, m.clone(), "M", Role::Manufacturer).unwrap();
        ledger.register_stakeholder(&admin, a.clone(), "A", Role::Airline).unwrap();

        let id = ledger.register_part(&m, "ENG-001", "SN1", "Turbine Blade", "Qm1").unwrap();
        assert_eq!(id, PartId(1));
        assert_eq!(ledger.get_part(id).unwrap().current_owner, m);
        assert_eq!(ledger.get_part(id).unwrap().status, PartStatus::Manufactured);

        ledger.transfer_custody(&m, id, a.clone(), "Sale").unwrap();
        assert_eq!(ledger.get_part(id).unwrap().status, PartStatus::InTransit);

        ledger.update_status(&a, id, PartStatus::Installed).unwrap();

        let part = ledger.get_part(id).unwrap();
        assert_eq!(part.current_owner, a);
        assert_eq!(part.status, PartStatus::Installed);
        assert_eq!(part.manufacturer, m);
        let custody = ledger.get_custody_history(id).unwrap();
        assert_eq!(custody.len(), 1);
        assert_eq!((&custody[0].from, &custody[0].to), (&m, &a));
    }

    #[test]
    fn test_events_since() {
        let ledger = seeded();
        assert_eq!(ledger.last_seq(), 4);
        assert_eq!(ledger.events_since(0).len(), 4);

        let tail = ledger.events_since(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].seq, 3);
        assert!(ledger.events_since(4).is_empty());
        assert!(ledger.events_since(u64::MAX).is_empty());
    }

    #[test]
    fn test_replay_rebuilds_identical_ledger() {
        let mut ledger = seeded();
        let (m, a, mro) = (addr("m"), addr("a"), addr("mro"));
        let id = ledger.register_part(&m, "ENG-001", "SN1", "Blade", "Qm1").unwrap();
        ledger.transfer_custody(&m, id, a.clone(), "Sale").unwrap();
        ledger.update_status(&a, id, PartStatus::Installed).unwrap();
        ledger.record_maintenance(&mro, id, "Inspection", "Qm", "ok").unwrap();
        ledger.deactivate_stakeholder(&addr("admin"), "mro").unwrap();

        let events = ledger.journal().iter().map(|e| e.event.clone());
        let rebuilt = Ledger::replay(addr("admin"), events).unwrap();
        assert_eq!(rebuilt, ledger);
    }

    #[test]
    fn test_replay_rejects_forged_event() {
        let ledger = seeded();
        let mut events: Vec<LedgerEvent> =
            ledger.journal().iter().map(|e| e.event.clone()).collect();

        // airline cannot register parts
        events.push(LedgerEvent::PartRegistered {
            id: PartId(1),
            part_number: "FAKE".into(),
            serial_number: "X".into(),
            part_name: "Counterfeit".into(),
            certificate_ref: "Qm".into(),
            manufacturer: addr("a"),
            at: Utc::now(),
        });

        let err = Ledger::replay(addr("admin"), events).unwrap_err();
        assert!(matches!(err, LedgerError::Journal { seq: 5, .. }));
    }

    #[test]
    fn test_replay_rejects_out_of_sequence_id() {
        let ledger = seeded();
        let mut events: Vec<LedgerEvent> =
            ledger.journal().iter().map(|e| e.event.clone()).collect();
        events.push(LedgerEvent::PartRegistered {
            id: PartId(9),
            part_number: "ENG-001".into(),
            serial_number: "SN1".into(),
            part_name: "Blade".into(),
            certificate_ref: "Qm1".into(),
            manufacturer: addr("m"),
            at: Utc::now(),
        });

        let err = Ledger::replay(addr("admin"), events).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Journal);
    }
}
