use crate::infra::{load_catalog, parse_category, parse_date, parse_plan, wire_service};
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use visa_flow::config::AppConfig;
use visa_flow::error::AppError;
use visa_flow::workflows::applicants::{
    ApplicantServiceError, ContactDetails, IntakeViolation, NewStaff, PassportDetails,
    ProfileSubmission, TrackerList,
};
use visa_flow::workflows::finance::InvoiceRequest;
use visa_flow::workflows::catalog::{Destination, DestinationCatalog, DestinationId};
use visa_flow::workflows::pricing::{
    build_installments, format_money, DiscountCategory, Installment, PlanTier, PricingOption,
};

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Destination id (e.g. c1)
    #[arg(long)]
    pub(crate) destination: String,
    /// Discount category applied to the base price
    #[arg(long, value_parser = parse_category, default_value = "Standard")]
    pub(crate) category: DiscountCategory,
    /// CSV destination export to quote from instead of the configured catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScheduleArgs {
    /// Destination id (e.g. c1)
    #[arg(long)]
    pub(crate) destination: String,
    /// Discount category applied to the base price
    #[arg(long, value_parser = parse_category, default_value = "Standard")]
    pub(crate) category: DiscountCategory,
    /// Payment plan (full_payment, two_part, three_part, four_part)
    #[arg(long, value_parser = parse_plan)]
    pub(crate) plan: PlanTier,
    /// Application date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// CSV destination export to schedule from instead of the configured catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Application date used for the demo profile (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let catalog = catalog_for(args.catalog)?;
    let destination = find_destination(&catalog, &args.destination)?;
    let options = destination.available_options(args.category);
    print!("{}", render_options(destination, args.category, &options));
    Ok(())
}

pub(crate) fn run_schedule(args: ScheduleArgs) -> Result<(), AppError> {
    let catalog = catalog_for(args.catalog)?;
    let destination = find_destination(&catalog, &args.destination)?;

    if args.plan.is_split() && !destination.allow_installments {
        return Err(ApplicantServiceError::Intake(IntakeViolation::InstallmentsNotOffered {
            destination: destination.name.clone(),
            plan: args.plan,
        })
        .into());
    }

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let installments = build_installments(&destination.fees, args.category, args.plan, date);
    println!(
        "{} / {} / {} ({})",
        destination.name,
        args.plan.label(),
        args.category.label(),
        date
    );
    print!("{}", render_schedule(&installments));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = DestinationCatalog::standard();
    let wiring = wire_service(&config, catalog);
    let service = wiring.service;
    let application_date = args.date.unwrap_or_else(|| Local::now().date_naive());

    println!("EuroVisa Flow demo");
    for destination in service.catalog().all() {
        println!(
            "- {} [{}] {} | base {} | reg {} | VAT {}%{}",
            destination.name,
            destination.id.as_str(),
            destination.visa_type,
            format_money(destination.fees.base_price),
            format_money(destination.fees.registration_fee),
            destination.fees.vat_percent,
            if destination.allow_installments {
                ""
            } else {
                " | full payment only"
            }
        );
    }

    let sweden = DestinationId::new("c1");
    let options = service.quote(&sweden, DiscountCategory::Couple)?;
    let destination = service.destination(&sweden)?;
    println!();
    print!("{}", render_options(&destination, DiscountCategory::Couple, &options));

    println!("\nProfile creation");
    let created = service.create_profile(demo_submission(application_date))?;
    let applicant = created.applicant;
    println!(
        "  {} registered as {} ({}, {})",
        applicant.full_name(),
        applicant.id.0,
        applicant.plan.label(),
        applicant.discount.label()
    );
    print!("{}", render_schedule(&applicant.installments));
    println!(
        "  Tracker sync: {} pushed, {} failed",
        created.sync.synced.len(),
        created.sync.failures.len()
    );

    println!("\nDocument review");
    for document in destination.docs_app_stage.iter() {
        service.begin_document_scan(&applicant.id, document, "scan.pdf", Utc::now())?;
        service.complete_document_scan(&applicant.id, document)?;
    }
    let readiness = service.document_readiness(&applicant.id)?;
    println!(
        "  Application-stage documents ready: {}/{}",
        readiness.ready, readiness.required
    );

    let steps = destination.timeline_steps();
    let progressed = service.advance_progress(&applicant.id, 1)?;
    println!(
        "  Progress: step {} of {} ({})",
        progressed.progress_step,
        steps.len(),
        steps[1]
    );

    let approved = service.approve(&applicant.id)?;
    println!("  Status: {}", approved.applicant.status.label());

    println!("\nFinance");
    let entry = applicant.installments.first().map_or(0.0, |first| first.amount);
    let invoice = service.create_invoice(
        InvoiceRequest {
            applicant_id: applicant.id.clone(),
            amount: entry,
            description: Some("Entry Payment".to_string()),
            due_date: Some(application_date),
        },
        application_date,
    )?;
    service.verify_payment(&invoice.id)?;
    let totals = service.ledger_totals();
    println!(
        "  {} ({}) verified: revenue {}, pending {}, {} active payer(s)",
        invoice.id,
        invoice.reference,
        format_money(totals.revenue),
        format_money(totals.pending),
        totals.active_payers
    );

    println!("\nStaff");
    let staff = service.add_staff(NewStaff {
        name: "Dana Iqbal".to_string(),
        email: "dana@eurovisa.com".to_string(),
        designation: "Visa Consultant".to_string(),
        role: None,
    })?;
    println!(
        "  {} {} ({}, {})",
        staff.member.id,
        staff.member.name,
        staff.member.role.label(),
        staff.member.designation
    );

    println!("\nNotifications (newest first)");
    for notification in wiring.notifications.events() {
        println!("  [{:?}] {}: {}", notification.kind, notification.title, notification.message);
    }

    println!("\nTracker tasks");
    for list in [TrackerList::ProfileCreation, TrackerList::User, TrackerList::Visa] {
        for task in wiring.tracker.tasks_for(list) {
            println!("  {:?}: {} ({} fields)", list, task.name, task.custom_fields.len());
        }
    }

    Ok(())
}

fn catalog_for(path: Option<PathBuf>) -> Result<DestinationCatalog, AppError> {
    let mut config = AppConfig::load()?;
    if path.is_some() {
        config.catalog_path = path;
    }
    load_catalog(&config)
}

fn find_destination<'a>(
    catalog: &'a DestinationCatalog,
    raw: &str,
) -> Result<&'a Destination, AppError> {
    let id = DestinationId::new(raw.trim());
    catalog
        .get(&id)
        .ok_or_else(|| ApplicantServiceError::DestinationNotFound(id).into())
}

fn demo_submission(application_date: NaiveDate) -> ProfileSubmission {
    ProfileSubmission {
        name: "Alex".to_string(),
        surname: "Mercer".to_string(),
        contact: ContactDetails {
            email: "alex.mercer@example.com".to_string(),
            mobile: "+381 64 555 0101".to_string(),
            alternative_mobile: None,
            whatsapp: None,
        },
        date_of_birth: NaiveDate::from_ymd_opt(1992, 6, 3),
        application_date,
        passport: PassportDetails {
            number: "P4432190".to_string(),
            expiry: NaiveDate::from_ymd_opt(2031, 4, 30),
            nationality: "Indian".to_string(),
        },
        profession: "Welder".to_string(),
        destination_id: DestinationId::new("c1"),
        visa_name: None,
        discount: DiscountCategory::Couple,
        plan: PlanTier::ThreePart,
    }
}

pub(crate) fn render_options(
    destination: &Destination,
    category: DiscountCategory,
    options: &[PricingOption],
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) with {} discount",
        destination.name,
        destination.visa_type,
        category.label()
    );
    for option in options {
        let marker = if option.is_popular { " *" } else { "" };
        let _ = writeln!(
            out,
            "  {}{}: total {}, entry {}",
            option.name,
            marker,
            format_money(option.total_contract_value),
            format_money(option.entry_payment_amount)
        );
        let _ = writeln!(out, "    {}", option.breakdown_text);
    }
    out
}

pub(crate) fn render_schedule(installments: &[Installment]) -> String {
    let mut out = String::new();
    for installment in installments {
        let _ = writeln!(
            out,
            "  {}  {:<24} {:>10}  {}",
            installment.due_date,
            installment.label,
            installment.display_amount(),
            installment.status.label()
        );
    }
    out
}
