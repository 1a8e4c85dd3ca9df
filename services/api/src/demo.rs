use crate::infra::{parse_date, seed_inventory, InMemoryShelterStore};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use shelter_ops::error::AppError;
use shelter_ops::workflows::adoption::{
    AdoptionRepository, AdoptionStatus, AdoptionWorkflowService, AnimalId, ProcessDecision, UserId,
};
use shelter_ops::workflows::inventory::{self, InventoryAlerts, InventoryItem};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the demo date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Optional inventory CSV export to use instead of the seed data
    #[arg(long)]
    pub(crate) inventory_csv: Option<PathBuf>,
    /// Expiry window in days for the inventory portion of the demo
    #[arg(long, default_value_t = 30)]
    pub(crate) expiry_days: u32,
    /// Skip the inventory alerting portion of the demo
    #[arg(long)]
    pub(crate) skip_inventory: bool,
}

#[derive(Args, Debug)]
pub(crate) struct InventoryAlertsArgs {
    /// Inventory CSV export (defaults to the built-in seed data)
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Expiry window in days
    #[arg(long, default_value_t = 30)]
    pub(crate) expiry_days: u32,
    /// Evaluation date for expiry buckets (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let adopter = UserId(9);
    let staff = UserId(42);

    let store = Arc::new(InMemoryShelterStore::seeded());
    let service = AdoptionWorkflowService::new(store.clone());

    println!("== Adoption lifecycle ==");
    let request = service.submit(AnimalId(1), adopter)?;
    println!(
        "submitted request #{} for animal #{} ({})",
        request.id.0,
        request.animal_id.0,
        request.status
    );

    let interview = (today + Duration::days(3))
        .and_hms_opt(10, 0, 0)
        .expect("valid interview time");
    let request = service.process(
        request.id,
        ProcessDecision {
            status: AdoptionStatus::InterviewScheduled,
            comments: Some("meet and greet booked".to_string()),
            interview_at: Some(interview),
            processed_by: staff,
        },
    )?;
    println!("interview scheduled for {interview} ({})", request.status);

    for target in [AdoptionStatus::Approved, AdoptionStatus::Completed] {
        let request = service.process(
            request.id,
            ProcessDecision {
                status: target,
                comments: None,
                interview_at: None,
                processed_by: staff,
            },
        )?;
        let animal = store
            .animal(request.animal_id)?
            .expect("demo animal exists");
        println!(
            "request #{} is now {}; animal '{}' is {}",
            request.id.0, request.status, animal.name, animal.status
        );
    }

    println!("\n== Activity log ==");
    for entry in store.activity()? {
        println!(
            "[{}] {} ({})",
            entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            entry.description,
            entry.action.label()
        );
    }

    if !args.skip_inventory {
        println!("\n== Inventory alerts ==");
        let items = load_inventory(args.inventory_csv.as_deref())?;
        print_alerts(&InventoryAlerts::build(&items, today, args.expiry_days));
    }

    Ok(())
}

pub(crate) fn run_inventory_alerts(args: InventoryAlertsArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let items = load_inventory(args.csv.as_deref())?;
    print_alerts(&InventoryAlerts::build(&items, today, args.expiry_days));
    Ok(())
}

fn load_inventory(path: Option<&std::path::Path>) -> Result<Vec<InventoryItem>, AppError> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            Ok(inventory::from_reader(file)?)
        }
        None => Ok(seed_inventory()),
    }
}

fn print_alerts(alerts: &InventoryAlerts) {
    if alerts.low_stock.is_empty() {
        println!("low stock: none");
    } else {
        println!("low stock:");
        for alert in &alerts.low_stock {
            println!(
                "  {} ({}): {} on hand, reorder at {}, short {}",
                alert.sku, alert.name, alert.on_hand, alert.reorder_level, alert.shortage
            );
        }
    }

    if alerts.expiring_soon.is_empty() {
        println!("expiring soon: none");
    } else {
        println!("expiring soon:");
        for alert in &alerts.expiring_soon {
            println!("  {} ({}): expires {}", alert.sku, alert.name, alert.expires_on);
        }
    }

    if !alerts.expired.is_empty() {
        println!("already expired:");
        for alert in &alerts.expired {
            println!("  {} ({}): expired {}", alert.sku, alert.name, alert.expires_on);
        }
    }
}
