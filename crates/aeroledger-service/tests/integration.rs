//! Integration Tests for the Ledger Store
//!
//! These tests drive a hosted ledger through the `LedgerStore` trait:
//! - Full part lifecycle from registration to regulator verification
//! - Journal ordering and paging
//! - Deactivation effects on transfers, verification and maintenance
//! - Rebuilding a ledger from its journal

use aeroledger_core::{
    Address, Command, ErrorKind, Ledger, LedgerEvent, PartId, PartStatus, Role,
};
use aeroledger_service::{LedgerStore, MemoryStore, StorageError};

// =============================================================================
// Test Helpers
// =============================================================================

struct Actors {
    admin: Address,
    manufacturer: Address,
    airline: Address,
    mro: Address,
    regulator: Address,
}

fn actors() -> Actors {
    Actors {
        admin: Address::new("0xadmin"),
        manufacturer: Address::new("0xmanufacturer"),
        airline: Address::new("0xairline"),
        mro: Address::new("0xmro"),
        regulator: Address::new("0xregulator"),
    }
}

/// Store with one stakeholder per role
async fn registered_store(a: &Actors) -> MemoryStore {
    let store = MemoryStore::new(a.admin.clone());
    for (identity, name, role) in [
        (&a.manufacturer, "Boeing Manufacturing", Role::Manufacturer),
        (&a.airline, "Delta Airlines", Role::Airline),
        (&a.mro, "AAR Corp MRO", Role::Mro),
        (&a.regulator, "FAA", Role::Regulator),
    ] {
        store
            .execute(
                &a.admin,
                Command::RegisterStakeholder {
                    identity: identity.clone(),
                    name: name.into(),
                    role,
                },
            )
            .await
            .expect("registration should succeed");
    }
    store
}

fn register_part(part_number: &str) -> Command {
    Command::RegisterPart {
        part_number: part_number.into(),
        serial_number: format!("SN-{}", part_number),
        part_name: "Turbine Blade".into(),
        certificate_ref: format!("Qm{}", part_number),
    }
}

fn transfer(id: u64, to: &Address, reason: &str) -> Command {
    Command::TransferCustody {
        part_id: PartId(id),
        to: to.clone(),
        reason: reason.into(),
    }
}

fn maintenance(id: u64, kind: &str) -> Command {
    Command::RecordMaintenance {
        part_id: PartId(id),
        maintenance_type: kind.into(),
        report_ref: format!("Qm{}Report", kind),
        notes: String::new(),
    }
}

fn error_kind(err: StorageError) -> ErrorKind {
    match err {
        StorageError::Ledger(e) => e.kind(),
        other => panic!("expected a ledger rejection, got {:?}", other),
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_full_part_lifecycle() {
    let a = actors();
    let store = registered_store(&a).await;

    for number in ["ENG-001", "ENG-002", "LG-003"] {
        store.execute(&a.manufacturer, register_part(number)).await.unwrap();
    }

    store
        .execute(&a.manufacturer, transfer(1, &a.airline, "Initial sale to airline"))
        .await
        .unwrap();
    let part = store.get_part(PartId(1)).await.unwrap();
    assert_eq!(part.current_owner, a.airline);
    assert_eq!(part.status, PartStatus::InTransit);

    store
        .execute(
            &a.airline,
            Command::UpdateStatus {
                part_id: PartId(1),
                status: PartStatus::Installed,
            },
        )
        .await
        .unwrap();

    store
        .execute(&a.airline, transfer(1, &a.mro, "Scheduled maintenance"))
        .await
        .unwrap();

    let first = store.execute(&a.mro, maintenance(1, "Inspection")).await.unwrap();
    let second = store.execute(&a.mro, maintenance(1, "Repair")).await.unwrap();
    assert!(matches!(
        first.event,
        LedgerEvent::MaintenanceRecorded { record_index: 1, .. }
    ));
    assert!(matches!(
        second.event,
        LedgerEvent::MaintenanceRecorded { record_index: 2, .. }
    ));

    store
        .execute(&a.mro, transfer(1, &a.airline, "Maintenance completed"))
        .await
        .unwrap();

    let custody = store.get_custody_history(PartId(1)).await.unwrap();
    assert_eq!(custody.len(), 3);
    assert_eq!(custody[0].from, a.manufacturer);
    assert_eq!(custody[2].to, a.airline);
    assert_eq!(custody[2].reason, "Maintenance completed");
    for pair in custody.windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }

    let maintenance = store.get_maintenance_history(PartId(1)).await.unwrap();
    assert_eq!(
        maintenance.iter().map(|r| r.maintenance_type.as_str()).collect::<Vec<_>>(),
        vec!["Inspection", "Repair"]
    );
    assert!(maintenance.iter().all(|r| r.performed_by == a.mro));

    assert!(store.verify_authenticity(&a.regulator, PartId(1)).await.unwrap());

    assert_eq!(
        store.get_stakeholder_parts(&a.manufacturer).await.unwrap(),
        vec![PartId(2), PartId(3)]
    );
    assert_eq!(
        store.get_stakeholder_parts(&a.airline).await.unwrap(),
        vec![PartId(1)]
    );
    assert!(store.get_stakeholder_parts(&a.mro).await.unwrap().is_empty());

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.stakeholder_count, 4);
    assert_eq!(stats.part_count, 3);
    // 4 registrations, 3 parts, 3 transfers, 1 status change, 2 maintenance
    assert_eq!(stats.last_seq, 13);
}

#[tokio::test]
async fn test_status_is_freely_settable_by_owner() {
    let a = actors();
    let store = registered_store(&a).await;
    store.execute(&a.manufacturer, register_part("ENG-001")).await.unwrap();

    for status in [PartStatus::Retired, PartStatus::Manufactured, PartStatus::Installed] {
        store
            .execute(
                &a.manufacturer,
                Command::UpdateStatus {
                    part_id: PartId(1),
                    status,
                },
            )
            .await
            .unwrap();
        assert_eq!(store.get_part(PartId(1)).await.unwrap().status, status);
    }
}

#[tokio::test]
async fn test_maintenance_does_not_require_custody() {
    let a = actors();
    let store = registered_store(&a).await;
    store.execute(&a.manufacturer, register_part("ENG-001")).await.unwrap();

    store.execute(&a.mro, maintenance(1, "Inspection")).await.unwrap();

    let part = store.get_part(PartId(1)).await.unwrap();
    assert_eq!(part.current_owner, a.manufacturer);
    assert_eq!(part.status, PartStatus::Manufactured);
}

// =============================================================================
// Deactivation
// =============================================================================

#[tokio::test]
async fn test_deactivated_manufacturer_fails_authenticity() {
    let a = actors();
    let store = registered_store(&a).await;
    store.execute(&a.manufacturer, register_part("ENG-001")).await.unwrap();
    store
        .execute(&a.manufacturer, transfer(1, &a.airline, "sale"))
        .await
        .unwrap();

    store
        .execute(
            &a.admin,
            Command::DeactivateStakeholder {
                identity: a.manufacturer.clone(),
            },
        )
        .await
        .unwrap();

    assert!(!store.verify_authenticity(&a.regulator, PartId(1)).await.unwrap());

    let stakeholder = store.get_stakeholder(&a.manufacturer).await.unwrap().unwrap();
    assert!(!stakeholder.active);
    assert_eq!(stakeholder.role, Role::Manufacturer);
}

#[tokio::test]
async fn test_deactivated_recipient_is_invalid() {
    let a = actors();
    let store = registered_store(&a).await;
    store.execute(&a.manufacturer, register_part("ENG-001")).await.unwrap();
    store
        .execute(
            &a.admin,
            Command::DeactivateStakeholder {
                identity: a.airline.clone(),
            },
        )
        .await
        .unwrap();

    let err = store
        .execute(&a.manufacturer, transfer(1, &a.airline, "sale"))
        .await
        .unwrap_err();
    assert_eq!(error_kind(err), ErrorKind::InvalidRecipient);
}

#[tokio::test]
async fn test_owner_cannot_be_deactivated_while_holding_parts() {
    let a = actors();
    let store = registered_store(&a).await;
    store.execute(&a.manufacturer, register_part("ENG-001")).await.unwrap();
    store
        .execute(&a.manufacturer, transfer(1, &a.airline, "sale"))
        .await
        .unwrap();
    let before = store.stats().await.unwrap().last_seq;

    let deactivate = Command::DeactivateStakeholder {
        identity: a.airline.clone(),
    };
    let err = store.execute(&a.admin, deactivate.clone()).await.unwrap_err();
    assert_eq!(error_kind(err), ErrorKind::HoldsParts);
    assert!(store.get_stakeholder(&a.airline).await.unwrap().unwrap().active);
    assert_eq!(store.stats().await.unwrap().last_seq, before);

    // once the part moves on, the airline can be retired
    store
        .execute(&a.airline, transfer(1, &a.mro, "hand-off"))
        .await
        .unwrap();
    store.execute(&a.admin, deactivate).await.unwrap();

    let part = store.get_part(PartId(1)).await.unwrap();
    assert_eq!(part.current_owner, a.mro);
    assert!(store.get_stakeholder(&part.current_owner).await.unwrap().unwrap().active);
}

#[tokio::test]
async fn test_deactivated_mro_cannot_record_maintenance() {
    let a = actors();
    let store = registered_store(&a).await;
    store.execute(&a.manufacturer, register_part("ENG-001")).await.unwrap();
    store
        .execute(
            &a.admin,
            Command::DeactivateStakeholder {
                identity: a.mro.clone(),
            },
        )
        .await
        .unwrap();

    let err = store.execute(&a.mro, maintenance(1, "Inspection")).await.unwrap_err();
    assert_eq!(error_kind(err), ErrorKind::Unauthorized);
    assert!(store.get_maintenance_history(PartId(1)).await.unwrap().is_empty());
}

// =============================================================================
// Journal
// =============================================================================

#[tokio::test]
async fn test_journal_pages_in_order() {
    let a = actors();
    let store = registered_store(&a).await;
    for number in ["A", "B", "C"] {
        store.execute(&a.manufacturer, register_part(number)).await.unwrap();
    }

    let mut seen = Vec::new();
    let mut since = 0;
    loop {
        let page = store.events_since(since, 2).await.unwrap().events;
        if page.is_empty() {
            break;
        }
        assert!(page.len() <= 2);
        since = page.last().unwrap().seq;
        seen.extend(page);
    }

    assert_eq!(seen.len(), 7);
    assert!(seen.iter().enumerate().all(|(i, e)| e.seq == i as u64 + 1));
    assert_eq!(seen[0].event.kind(), "StakeholderRegistered");
    assert_eq!(seen[6].event.part_id(), Some(PartId(3)));
}

#[tokio::test]
async fn test_rejections_are_not_journaled() {
    let a = actors();
    let store = registered_store(&a).await;
    let before = store.stats().await.unwrap().last_seq;

    let err = store.execute(&a.airline, register_part("X")).await.unwrap_err();
    assert_eq!(error_kind(err), ErrorKind::Unauthorized);

    let err = store
        .execute(
            &a.admin,
            Command::RegisterStakeholder {
                identity: a.airline.clone(),
                name: "Again".into(),
                role: Role::Regulator,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error_kind(err), ErrorKind::AlreadyRegistered);

    assert_eq!(store.stats().await.unwrap().last_seq, before);
    let page = store.events_since(before, 10).await.unwrap();
    assert!(page.events.is_empty());
    assert_eq!(page.last_seq, before);
}

#[tokio::test]
async fn test_journal_rebuilds_identical_ledger() {
    let a = actors();
    let store = registered_store(&a).await;
    store.execute(&a.manufacturer, register_part("ENG-001")).await.unwrap();
    store
        .execute(&a.manufacturer, transfer(1, &a.mro, "repair"))
        .await
        .unwrap();
    store.execute(&a.mro, maintenance(1, "Repair")).await.unwrap();

    let journal = store.events_since(0, usize::MAX).await.unwrap().events;
    let rebuilt = Ledger::replay(a.admin.clone(), journal.into_iter().map(|e| e.event)).unwrap();
    let restored = MemoryStore::from_ledger(rebuilt);

    assert_eq!(restored.stats().await.unwrap(), store.stats().await.unwrap());
    assert_eq!(
        restored.get_part(PartId(1)).await.unwrap(),
        store.get_part(PartId(1)).await.unwrap()
    );
    assert_eq!(
        restored.get_maintenance_history(PartId(1)).await.unwrap(),
        store.get_maintenance_history(PartId(1)).await.unwrap()
    );
}
