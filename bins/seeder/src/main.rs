//! Demo ledger seeder for Armory development and testing.
//!
//! Seeds three bases, a registry of tracked assets and a month of
//! purchases, transfers, assignments and expenditures through the ledger
//! engine, then prints dashboard figures and recent activity as JSON.
//!
//! Usage: cargo run --bin seeder -- --base FTLB --asset-type ammunition

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use armory_core::asset::{AssetCondition, AssetType};
use armory_core::auth::Actor;
use armory_core::balance::{AssetTypeFilter, BalanceSnapshot, BaseScope, DateRange};
use armory_core::base::{Base, BaseDirectory};
use armory_core::clock::FixedClock;
use armory_core::ledger::{
    AssignmentRequest, EnrolAssetRequest, EventFilter, EventId, EventPayload, EventRequest,
    EventStatus, EventView, ExpenditureRequest, LedgerEngine, PurchaseRequest,
    StatusChangeRequest, TransferRequest,
};
use armory_shared::AppConfig;
use armory_shared::types::{ActorId, AssetId, BaseId, Money, PageRequest, PageResponse};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::Parser;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Seed a demo armory ledger and print dashboard figures.
#[derive(Debug, Parser)]
#[command(name = "seeder", version)]
struct Args {
    /// Directory holding `default.toml` and per-mode overrides.
    #[arg(long, env = "ARMORY_CONFIG_DIR", default_value = "config")]
    config_dir: String,

    /// Restrict figures to one base code (e.g. FTLB).
    #[arg(long)]
    base: Option<String>,

    /// Restrict figures to one asset type.
    #[arg(long)]
    asset_type: Option<AssetType>,

    /// First day of the reporting range.
    #[arg(long, default_value = "2024-01-01")]
    from: NaiveDate,

    /// Last day of the reporting range.
    #[arg(long, default_value = "2024-01-31")]
    to: NaiveDate,

    /// Instant the dashboard is evaluated at.
    #[arg(long, default_value = "2024-01-20T18:00:00Z")]
    as_of: DateTime<Utc>,

    /// Number of recent activity rows to print.
    #[arg(long, default_value_t = 10)]
    recent: u32,
}

#[derive(Serialize)]
struct Report {
    as_of: DateTime<Utc>,
    snapshot: BalanceSnapshot,
    recent_activity: PageResponse<EventView>,
}

struct Bases {
    fort: BaseId,
    camp: BaseId,
    lewis: BaseId,
}

struct Staff {
    general: Actor,
    roberts: Actor,
    davis: Actor,
    chen: Actor,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load_from(&args.config_dir).context("failed to load configuration")?;
    init_tracing(&config);

    let (directory, bases) = seed_bases();
    let clock = Arc::new(FixedClock::new(args.as_of));
    let engine = LedgerEngine::builder(directory)
        .config(config.ledger.clone())
        .clock(clock)
        .build();

    let staff = Staff {
        general: Actor::admin(ActorId::new()),
        roberts: Actor::base_commander(ActorId::new(), bases.fort),
        davis: Actor::base_commander(ActorId::new(), bases.fort),
        chen: Actor::logistics_officer(ActorId::new(), bases.camp),
    };

    seed_opening_stock(&engine, &staff, &bases)?;
    seed_purchases(&engine, &staff, &bases)?;
    seed_transfers(&engine, &staff, &bases)?;
    seed_assignments(&engine, &staff, &bases)?;
    seed_expenditures(&engine, &staff, &bases)?;
    info!(cursor = %engine.cursor()?, "seeding complete");

    let scope = match &args.base {
        Some(code) => match engine.bases().by_code(code) {
            Some(base) => BaseScope::Base(base.id),
            None => bail!("unknown base code: {code}"),
        },
        None => BaseScope::All,
    };
    let range = DateRange::new(args.from, args.to)?;
    let snapshot = engine.project(scope, AssetTypeFilter::from(args.asset_type), range)?;

    let filter = EventFilter {
        base_id: match scope {
            BaseScope::Base(id) => Some(id),
            BaseScope::All => None,
        },
        asset_type: args.asset_type,
        ..EventFilter::default()
    };
    let recent_activity = engine.list_events(&filter, PageRequest::new(1, args.recent))?;

    let report = Report {
        as_of: args.as_of,
        snapshot,
        recent_activity,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the report; logs go to stderr.
    if config.logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn at(day: u32, hour: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0)
        .single()
        .with_context(|| format!("invalid seed timestamp: 2024-01-{day:02} {hour:02}:00"))
}

fn date(month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, month, day)
}

/// Seeds the three installations shown on the dashboard.
fn seed_bases() -> (BaseDirectory, Bases) {
    let fort = Base::new("Fort Liberty", "North Carolina", "FTLB");
    let camp = Base::new("Camp Pendleton", "California", "CPEN");
    let lewis = Base::new("Joint Base Lewis", "Washington", "JBLM");
    let ids = Bases {
        fort: fort.id,
        camp: camp.id,
        lewis: lewis.id,
    };
    (BaseDirectory::new([fort, camp, lewis]), ids)
}

#[allow(clippy::too_many_arguments)]
fn purchase(
    engine: &LedgerEngine,
    actor: &Actor,
    base_id: BaseId,
    asset_name: &str,
    asset_type: AssetType,
    quantity: u32,
    unit_price: Decimal,
    vendor: &str,
    occurred_at: DateTime<Utc>,
) -> Result<EventId> {
    let id = engine.record_at(
        actor,
        EventRequest::Purchase(PurchaseRequest {
            base_id,
            asset_name: asset_name.to_string(),
            asset_type,
            quantity,
            unit_price: Money::usd(unit_price),
            vendor: vendor.to_string(),
            notes: None,
        }),
        occurred_at,
    )?;
    Ok(id)
}

fn advance(
    engine: &LedgerEngine,
    actor: &Actor,
    id: EventId,
    to: EventStatus,
    occurred_at: DateTime<Utc>,
) -> Result<()> {
    engine.transition_at(actor, StatusChangeRequest::new(id, to), occurred_at)?;
    Ok(())
}

/// Delivered stock on hand before the month's activity.
fn seed_opening_stock(engine: &LedgerEngine, staff: &Staff, bases: &Bases) -> Result<()> {
    let opening = [
        (bases.fort, "M1A2 Abrams Tank", AssetType::Vehicle, 12, dec!(6200000), "General Dynamics"),
        (bases.fort, "5.56mm Ammunition", AssetType::Ammunition, 20000, dec!(0.45), "Federal Premium"),
        (bases.fort, "Tactical Vest", AssetType::Equipment, 40, dec!(225), "Point Blank"),
        (bases.camp, "Communication Equipment Set", AssetType::Equipment, 30, dec!(18000), "L3Harris"),
    ];
    for (base_id, name, asset_type, quantity, price, vendor) in opening {
        let id = purchase(engine, &staff.general, base_id, name, asset_type, quantity, price, vendor, at(2, 8)?)?;
        advance(engine, &staff.general, id, EventStatus::Delivered, at(2, 16)?)?;
    }
    Ok(())
}

fn seed_purchases(engine: &LedgerEngine, staff: &Staff, bases: &Bases) -> Result<()> {
    let rifles = purchase(
        engine,
        &staff.roberts,
        bases.fort,
        "M4A1 Rifle",
        AssetType::Weapon,
        50,
        dec!(1200),
        "Colt Defense",
        at(10, 9)?,
    )?;
    advance(engine, &staff.general, rifles, EventStatus::Approved, at(11, 9)?)?;
    advance(engine, &staff.roberts, rifles, EventStatus::Delivered, at(15, 14)?)?;

    let humvees = purchase(
        engine,
        &staff.general,
        bases.camp,
        "Humvee M1151",
        AssetType::Vehicle,
        3,
        dec!(85000),
        "AM General",
        at(10, 10)?,
    )?;
    advance(engine, &staff.general, humvees, EventStatus::Approved, at(12, 10)?)?;

    purchase(
        engine,
        &staff.roberts,
        bases.fort,
        "5.56mm Ammunition",
        AssetType::Ammunition,
        10000,
        dec!(0.45),
        "Federal Premium",
        at(12, 11)?,
    )?;
    Ok(())
}

fn seed_transfers(engine: &LedgerEngine, staff: &Staff, bases: &Bases) -> Result<()> {
    let request = |from_base, to_base, asset_name: &str, asset_type, quantity, notes: &str| {
        EventRequest::Transfer(TransferRequest {
            from_base,
            to_base,
            asset_name: asset_name.to_string(),
            asset_type,
            quantity,
            estimated_arrival: None,
            notes: Some(notes.to_string()),
        })
    };

    let equipment = engine.record_at(
        &staff.chen,
        request(
            bases.camp,
            bases.fort,
            "Communication Equipment Set",
            AssetType::Equipment,
            15,
            "Field exercise equipment return",
        ),
        at(12, 8)?,
    )?;
    advance(engine, &staff.chen, equipment, EventStatus::InTransit, at(12, 12)?)?;
    advance(engine, &staff.roberts, equipment, EventStatus::Completed, at(13, 15)?)?;

    let tanks = engine.record_at(
        &staff.roberts,
        request(
            bases.fort,
            bases.camp,
            "M1A2 Abrams Tank",
            AssetType::Vehicle,
            2,
            "Emergency deployment support",
        ),
        at(14, 7)?,
    )?;
    advance(engine, &staff.general, tanks, EventStatus::InTransit, at(14, 13)?)?;

    engine.record_at(
        &staff.roberts,
        request(
            bases.fort,
            bases.lewis,
            "Bradley Fighting Vehicle",
            AssetType::Vehicle,
            4,
            "Joint training rotation",
        ),
        at(16, 9)?,
    )?;
    Ok(())
}

fn enrol(
    engine: &LedgerEngine,
    staff: &Staff,
    base_id: BaseId,
    name: &str,
    asset_type: AssetType,
    serial_number: &str,
    value: Decimal,
) -> Result<AssetId> {
    let id = engine.record_at(
        &staff.general,
        EventRequest::EnrolAsset(EnrolAssetRequest {
            base_id,
            name: name.to_string(),
            asset_type,
            serial_number: Some(serial_number.to_string()),
            condition: AssetCondition::Good,
            value: Money::usd(value),
            acquired_on: date(1, 2),
        }),
        at(2, 9)?,
    )?;
    match engine.get_event(id)?.payload {
        EventPayload::AssetEnrolment(details) => Ok(details.asset.id),
        other => bail!("enrolment {id} produced a {} record", other.kind()),
    }
}

fn seed_assignments(engine: &LedgerEngine, staff: &Staff, bases: &Bases) -> Result<()> {
    let rifle = enrol(engine, staff, bases.fort, "M4A1 Rifle", AssetType::Weapon, "M4-FTLB-0001", dec!(1200))?;
    let goggles = enrol(engine, staff, bases.fort, "Night Vision Goggles", AssetType::Equipment, "NVG-FTLB-0117", dec!(3500))?;
    let humvee = enrol(engine, staff, bases.fort, "Humvee M1151", AssetType::Vehicle, "HMV-FTLB-0042", dec!(85000))?;

    let assign = |actor: &Actor, asset_id, assigned_to: &str, purpose: &str, due, occurred_at| {
        engine.record_at(
            actor,
            EventRequest::Assignment(AssignmentRequest {
                asset_id,
                assigned_to: assigned_to.to_string(),
                purpose: purpose.to_string(),
                expected_return_date: due,
                notes: None,
            }),
            occurred_at,
        )
    };

    assign(&staff.roberts, rifle, "Sgt. John Martinez", "Training Exercise Alpha", date(2, 10), at(10, 8)?)?;

    let patrol = assign(&staff.davis, goggles, "Cpl. Sarah Davis", "Night Patrol Duty", date(1, 18), at(8, 18)?)?;
    advance(engine, &staff.davis, patrol, EventStatus::Returned, at(17, 7)?)?;

    // Due on the 15th and never returned: reads as overdue on the 20th.
    assign(&staff.davis, humvee, "Lt. Kevin Brown", "Convoy Escort", date(1, 15), at(5, 6)?)?;
    Ok(())
}

fn seed_expenditures(engine: &LedgerEngine, staff: &Staff, bases: &Bases) -> Result<()> {
    let expenditures = [
        ("5.56mm Ammunition", AssetType::Ammunition, 1500, "Live Fire Training Exercise", dec!(675), at(14, 10)?),
        ("Tactical Vest", AssetType::Equipment, 2, "Damaged during operations", dec!(450), at(12, 16)?),
    ];
    for (name, asset_type, quantity, reason, cost, occurred_at) in expenditures {
        engine.record_at(
            &staff.roberts,
            EventRequest::Expenditure(ExpenditureRequest {
                base_id: bases.fort,
                asset_name: name.to_string(),
                asset_type,
                quantity,
                reason: reason.to_string(),
                cost: Money::usd(cost),
                notes: None,
            }),
            occurred_at,
        )?;
    }
    Ok(())
}
