//! Ledger walkthrough
//!
//! Drives an in-memory ledger through the life of a turbine blade: four
//! stakeholders are registered, three parts manufactured, and part 1 sold,
//! installed, serviced and returned before a regulator verifies it.

use std::error::Error;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use aeroledger_core::{Address, Command, PartId, PartStatus, Role};
use aeroledger_service::{LedgerStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let admin = Address::from("0xadmin");
    let manufacturer = Address::from("0xmanufacturer");
    let airline = Address::from("0xairline");
    let mro = Address::from("0xmro");
    let regulator = Address::from("0xregulator");

    let store = MemoryStore::new(admin.clone());

    info!("Step 1: register stakeholders");
    for (identity, name, role) in [
        (&manufacturer, "Boeing Manufacturing", Role::Manufacturer),
        (&airline, "Delta Airlines", Role::Airline),
        (&mro, "AAR Corp MRO", Role::Mro),
        (&regulator, "FAA", Role::Regulator),
    ] {
        store
            .execute(
                &admin,
                Command::RegisterStakeholder {
                    identity: identity.clone(),
                    name: name.into(),
                    role,
                },
            )
            .await?;
        info!(identity = %identity, role = %role, "Registered {}", name);
    }

    info!("Step 2: manufacturer registers parts");
    for (part_number, serial_number, part_name, certificate_ref) in [
        ("ENG-001", "SN123456", "Turbine Blade", "QmTurbineBladeHash123"),
        ("ENG-002", "SN789012", "Engine Mount", "QmEngineMountHash456"),
        ("LG-003", "SN345678", "Landing Gear Strut", "QmLandingGearHash789"),
    ] {
        store
            .execute(
                &manufacturer,
                Command::RegisterPart {
                    part_number: part_number.into(),
                    serial_number: serial_number.into(),
                    part_name: part_name.into(),
                    certificate_ref: certificate_ref.into(),
                },
            )
            .await?;
        info!(part_number, part_name, "Part registered");
    }

    let blade = PartId(1);

    info!("Step 3: query part details");
    let part = store.get_part(blade).await?;
    info!("{}", serde_json::to_string_pretty(&part)?);

    info!("Step 4: transfer custody to airline");
    transfer(&store, &manufacturer, blade, &airline, "Initial sale to airline").await?;
    let part = store.get_part(blade).await?;
    info!(owner = %part.current_owner, status = %part.status, "Ownership updated");

    info!("Step 5: airline installs part");
    store
        .execute(
            &airline,
            Command::UpdateStatus {
                part_id: blade,
                status: PartStatus::Installed,
            },
        )
        .await?;

    info!("Step 6: transfer to MRO for maintenance");
    transfer(&store, &airline, blade, &mro, "Scheduled maintenance").await?;

    info!("Step 7: MRO records maintenance");
    for (maintenance_type, report_ref, notes) in [
        (
            "Inspection",
            "QmInspectionReportHash",
            "Routine 500-hour inspection completed. No issues found.",
        ),
        (
            "Repair",
            "QmRepairReportHash",
            "Minor surface crack repaired and re-certified.",
        ),
    ] {
        store
            .execute(
                &mro,
                Command::RecordMaintenance {
                    part_id: blade,
                    maintenance_type: maintenance_type.into(),
                    report_ref: report_ref.into(),
                    notes: notes.into(),
                },
            )
            .await?;
        info!(maintenance_type, "Maintenance recorded");
    }

    info!("Step 8: return to airline");
    transfer(&store, &mro, blade, &airline, "Maintenance completed").await?;

    info!("Step 9: part history");
    for (i, record) in store.get_custody_history(blade).await?.iter().enumerate() {
        info!(
            transfer = i + 1,
            from = %record.from,
            to = %record.to,
            at = %record.timestamp,
            reason = %record.reason,
            "Custody"
        );
    }
    for (i, record) in store.get_maintenance_history(blade).await?.iter().enumerate() {
        info!(
            record = i + 1,
            maintenance_type = %record.maintenance_type,
            mro = %record.performed_by,
            at = %record.timestamp,
            report = %record.report_ref,
            "Maintenance: {}",
            record.notes
        );
    }

    info!("Step 10: regulator verification");
    let authentic = store.verify_authenticity(&regulator, blade).await?;
    info!(authentic, "Part authenticity verified");

    info!("Step 11: parts by stakeholder");
    for (label, identity) in [
        ("manufacturer", &manufacturer),
        ("airline", &airline),
        ("mro", &mro),
    ] {
        let parts = store.get_stakeholder_parts(identity).await?;
        info!(stakeholder = label, parts = ?parts, "Holdings");
    }

    let stats = store.stats().await?;
    let summary = serde_json::json!({
        "parts_registered": stats.part_count,
        "stakeholders": stats.stakeholder_count,
        "custody_transfers": store.get_custody_history(blade).await?.len(),
        "maintenance_records": store.get_maintenance_history(blade).await?.len(),
        "journal_entries": stats.last_seq,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

async fn transfer(
    store: &MemoryStore,
    from: &Address,
    id: PartId,
    to: &Address,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    store
        .execute(
            from,
            Command::TransferCustody {
                part_id: id,
                to: to.clone(),
                reason: reason.into(),
            },
        )
        .await?;
    info!(part_id = %id, from = %from, to = %to, reason, "Custody transferred");
    Ok(())
}
