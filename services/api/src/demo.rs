use crate::infra::{seeded_donation_history, starter_inventory, KitchenScale};
use chrono::{Local, NaiveDate};
use clap::Args;
use pantrix::collaborators::{DemoCollaborators, Language, RecipeSuggester, ShoppingAdvisor};
use pantrix::error::AppError;
use pantrix::pantry::{DonationSelection, Pantry, PantryError};
use pantrix::profile::{HotelProfile, Profile};
use pantrix::workflows::donation::{
    DeliveryType, InMemoryDonationRepository, TransitionOutcome, TransitionPolicy,
};
use pantrix::workflows::inventory::{
    ExpiryClassification, InventoryCsvImporter, InventoryEngine, InventoryItem,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Reject out-of-order donation transitions instead of ignoring them.
    #[arg(long)]
    pub(crate) strict: bool,
}

#[derive(Args, Debug)]
pub(crate) struct InventoryReportArgs {
    /// CSV export with name,expiry_date,quantity,category columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_inventory_report(args: InventoryReportArgs) -> Result<(), AppError> {
    let InventoryReportArgs { csv, today } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let items = InventoryCsvImporter::from_path(&csv)?;
    let engine = InventoryEngine::with_items(items);

    println!("Inventory report for {}", csv.display());
    render_classification(&engine.classify(today), engine.len());
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, strict } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let policy = if strict {
        TransitionPolicy::Strict
    } else {
        TransitionPolicy::Lenient
    };
    let collaborators = DemoCollaborators::instant();

    println!("Pantrix walkthrough ({today}, {policy:?} transitions)");
    let inventory =
        InventoryEngine::with_items(starter_inventory(today, KitchenScale::Restaurant));
    let mut pantry = Pantry::with_inventory(
        Arc::new(InMemoryDonationRepository::default()),
        policy,
        inventory,
    );
    pantry
        .donations()
        .import_history(seeded_donation_history())
        .map_err(PantryError::from)?;

    let hotel = Profile::Hotel(HotelProfile {
        name: "The Grand Eatery".to_string(),
        location: "New York, USA".to_string(),
        email: "contact@grandeatery.com".to_string(),
        cuisine_type: Some("Italian".to_string()),
        contact_number: Some("555-0199".to_string()),
        latitude: Some(40.7128),
        longitude: Some(-74.0060),
    });
    pantry.sign_in(hotel, 0)?;

    let classification = pantry.classify(today);
    render_classification(&classification, pantry.inventory().len());

    if let Some(first) = classification.priority_items.first() {
        println!("\nRecipe ideas for {}", first.name);
        match collaborators
            .suggest_recipes(&first.name, None, Language::En)
            .await
        {
            Ok(recipes) => {
                for recipe in recipes {
                    println!("- {}: {}", recipe.name, recipe.description);
                }
            }
            Err(err) => println!("  Recipes unavailable: {err}"),
        }
    }

    let bulk: Vec<InventoryItem> = classification.bulk_expiring.into_iter().take(2).collect();
    if bulk.is_empty() {
        println!("\nNo bulk stock to donate today");
        return Ok(());
    }

    println!("\nDonating bulk stock to City Harvest");
    let request = pantry.donate(DonationSelection {
        item_ids: bulk.iter().map(|item| item.id.clone()).collect(),
        ngo_name: "City Harvest".to_string(),
        delivery_type: DeliveryType::Dropoff,
        pickup_date_time: None,
        notes: Some("Keep refrigerated".to_string()),
    })?;
    println!(
        "- Request {} ({} items) -> {}",
        request.id,
        request.items.len(),
        request.status
    );
    print_membership(&pantry);

    println!("\nFood bank actions");
    let early = pantry.complete(&request.id, today);
    report_transition("complete before accept", early);
    report_transition("accept", pantry.accept(&request.id));
    report_transition("complete", pantry.complete(&request.id, today));
    report_transition("decline after completion", pantry.decline(&request.id));

    println!("\nPartner standings");
    for partner in pantry.partner_summaries()? {
        let tier = partner.tier.map(|tier| tier.label()).unwrap_or("None");
        println!(
            "- {} ({}) | {} completed | tier {}",
            partner.name, partner.location, partner.completed_donations, tier
        );
    }

    println!("\nRestock suggestions");
    match collaborators
        .shopping_suggestions(pantry.inventory().items())
        .await
    {
        Ok(suggestions) => {
            let added = pantry.shopping_mut().apply_suggestions(suggestions);
            for item in pantry.shopping().items() {
                println!("- {} ({}): {}", item.name, item.quantity, item.reason);
            }
            println!("  {added} suggestions added to the shopping list");
        }
        Err(err) => println!("  Suggestions unavailable: {err}"),
    }

    Ok(())
}

fn render_classification(classification: &ExpiryClassification, total: usize) {
    let summary = classification.summary(total);
    println!(
        "Evaluated {} | {} items | {} expired | {} expiring soon | {} bulk",
        classification.reference_date,
        summary.total,
        summary.expired_count,
        summary.expiring_soon_count,
        summary.bulk_expiring_count
    );

    let sections = [
        ("Expired", &classification.expired),
        ("Expiring soon", &classification.expiring_soon),
        ("Bulk expiring within a week", &classification.bulk_expiring),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        println!("\n{title}");
        for item in items.iter() {
            println!(
                "- {} | {} | {} | expires {} ({} days)",
                item.name,
                item.category.label(),
                item.quantity,
                item.expiry_date,
                item.days_until_expiry(classification.reference_date)
            );
        }
    }

    if !classification.priority_items.is_empty() {
        let names: Vec<&str> = classification
            .priority_items
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        println!("\nUse first: {}", names.join(", "));
    }
}

fn print_membership(pantry: &Pantry<InMemoryDonationRepository>) {
    match pantry.membership() {
        Some(status) => {
            let tier = status.tier.map(|tier| tier.label()).unwrap_or("None");
            let next = match status.remaining_to_next {
                Some(remaining) => format!("{remaining} more to the next tier"),
                None => "top tier reached".to_string(),
            };
            println!(
                "  Membership: {} donations | tier {} | {}",
                status.donation_count, tier, next
            );
        }
        None => println!("  Membership: not available for this session"),
    }
}

fn report_transition(label: &str, outcome: Result<TransitionOutcome, PantryError>) {
    match outcome {
        Ok(TransitionOutcome::Applied(request)) => {
            println!("- {label}: now {}", request.status)
        }
        Ok(TransitionOutcome::Ignored(request)) => {
            println!("- {label}: ignored, still {}", request.status)
        }
        Ok(TransitionOutcome::Missing) => println!("- {label}: request not found"),
        Err(err) => println!("- {label}: rejected ({err})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn demo_runs_in_both_policies() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 15);
        run_demo(DemoArgs {
            today,
            strict: false,
        })
        .await
        .expect("lenient demo");
        run_demo(DemoArgs {
            today,
            strict: true,
        })
        .await
        .expect("strict demo");
    }

    #[test]
    fn inventory_report_reads_csv_exports() {
        let path = std::env::temp_dir().join(format!(
            "pantrix-report-{}.csv",
            std::process::id()
        ));
        {
            let mut file = std::fs::File::create(&path).expect("temp file");
            writeln!(file, "name,expiry_date,quantity,category").unwrap();
            writeln!(file, "Milk,2024-07-18,1 gallon,Dairy").unwrap();
            writeln!(file, "Bread,2024-07-10,1 loaf,Bakery").unwrap();
        }

        let result = run_inventory_report(InventoryReportArgs {
            csv: path.clone(),
            today: NaiveDate::from_ymd_opt(2024, 7, 15),
        });
        std::fs::remove_file(&path).ok();
        result.expect("report renders");
    }

    #[test]
    fn missing_exports_surface_import_errors() {
        let err = run_inventory_report(InventoryReportArgs {
            csv: PathBuf::from("/nonexistent/pantrix.csv"),
            today: None,
        })
        .expect_err("missing file");
        assert!(matches!(err, AppError::Import(_)));
    }
}
