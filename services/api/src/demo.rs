use crate::infra::InMemoryCertificateRepository;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use survey_scheduler::config::AppConfig;
use survey_scheduler::error::AppError;
use survey_scheduler::workflows::register::CertificateRegisterImporter;
use survey_scheduler::workflows::survey::{
    Certificate, CertificateDateUpdate, CertificateId, CertificateInput, RegisterCertificate,
    ShipContext, ShipId, ShipSurveyReport, SurveyResult, SurveyScheduleService, SurveyScheduler,
    ValidationError,
};

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// Certificate name as printed on the certificate
    #[arg(long)]
    pub(crate) name: String,
    /// Issue date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) issue_date: Option<NaiveDate>,
    /// Expiry date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) valid_date: Option<NaiveDate>,
    /// Date of the latest endorsement
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) last_endorse: Option<NaiveDate>,
    /// Next survey designation from the certificate, e.g. "Initial"
    #[arg(long)]
    pub(crate) designation: Option<String>,
    /// Free text from the certificate body used to detect annual survey markers
    #[arg(long)]
    pub(crate) content_hint: Option<String>,
    /// Certificate is an interim issue
    #[arg(long)]
    pub(crate) interim: bool,
    /// Certificate is a condition of class or other time-limited item
    #[arg(long)]
    pub(crate) condition: bool,
    /// Date of the ship's last intermediate survey
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) last_intermediate: Option<NaiveDate>,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct RegisterArgs {
    /// Certificate register export (CSV)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Only report on this ship
    #[arg(long)]
    pub(crate) ship: Option<String>,
    /// Date of the last intermediate survey, applied to every reported ship
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) last_intermediate: Option<NaiveDate>,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn configured_scheduler() -> Result<SurveyScheduler, AppError> {
    let config = AppConfig::load()?;
    Ok(config.scheduling.scheduler()?)
}

fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn run_calculate(args: CalculateArgs) -> Result<(), AppError> {
    let scheduler = configured_scheduler()?;
    let today = resolve_today(args.today);

    let mut certificate =
        Certificate::named(args.name).with_dates(args.issue_date, args.valid_date, args.last_endorse);
    certificate.next_survey_designation = args.designation;
    certificate.content_hint = args.content_hint;
    certificate.is_interim = args.interim;
    certificate.is_condition = args.condition;

    let ship = ShipContext {
        last_intermediate_survey: args.last_intermediate,
    };
    let result = scheduler.recalculate(&certificate, &ship, today)?;

    println!("{}", certificate.name);
    println!("Evaluated on {today}");
    render_result(&result);
    Ok(())
}

pub(crate) fn run_register_report(args: RegisterArgs) -> Result<(), AppError> {
    let RegisterArgs {
        csv,
        ship,
        last_intermediate,
        today,
    } = args;

    let scheduler = configured_scheduler()?;
    let today = resolve_today(today);
    let entries = CertificateRegisterImporter::from_path(&csv)?;
    let context = ShipContext {
        last_intermediate_survey: last_intermediate,
    };

    let mut ships: BTreeMap<ShipId, ShipRows> = BTreeMap::new();
    for entry in entries {
        if ship.as_deref().is_some_and(|wanted| wanted != entry.ship_id.0) {
            continue;
        }
        let name = entry.input.name.clone();
        let outcome = Certificate::try_from(entry.input)
            .and_then(|certificate| scheduler.recalculate(&certificate, &context, today));
        ships
            .entry(entry.ship_id)
            .or_default()
            .push((CertificateId(format!("row-{}", entry.row)), name, outcome));
    }

    if ships.is_empty() {
        println!("No certificates found in {}", csv.display());
        return Ok(());
    }

    for (ship_id, rows) in ships {
        let mut builder = ShipSurveyReport::builder(ship_id, today);
        for (id, name, outcome) in &rows {
            builder.record(id.clone(), name, outcome.as_ref());
        }
        render_report(&builder.finish());
    }

    Ok(())
}

type ShipRows = Vec<(CertificateId, String, Result<SurveyResult, ValidationError>)>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = resolve_today(args.today);
    let scheduler = configured_scheduler()?;
    let service = SurveyScheduleService::new(
        Arc::new(InMemoryCertificateRepository::default()),
        scheduler,
    );
    let ship_id = ShipId("IMO9321483".to_string());

    println!("Survey scheduling demo");
    let mut equipment_id = None;
    for input in sample_fleet(today) {
        let record = service.register(
            RegisterCertificate {
                ship_id: ship_id.clone(),
                certificate: input,
            },
            today,
        )?;
        if record.certificate.name.contains("Safety Equipment") {
            equipment_id = Some(record.id.clone());
        }
        println!(
            "- registered {} as {} ({})",
            record.certificate.name,
            record.id,
            record.result.category.label()
        );
    }

    println!("\nInitial schedule");
    render_report(&service.recalculate_ship(&ship_id, today)?);

    if let Some(id) = equipment_id {
        let endorsement = today.format("%Y-%m-%d").to_string();
        let outcome = service.update_dates(
            &id,
            CertificateDateUpdate {
                last_endorse: Some(endorsement),
                ..CertificateDateUpdate::default()
            },
            today,
        )?;
        println!(
            "\nEndorsed {} today: next survey now {} ({})",
            outcome.record.certificate.name,
            outcome.record.result.next_survey_display,
            outcome.record.result.next_survey_type
        );
    }

    let context = ShipContext {
        last_intermediate_survey: Some(today),
    };
    println!("\nRecorded an intermediate survey on {today}");
    render_report(&service.update_ship_context(&ship_id, context, today)?);

    Ok(())
}

/// Sample certificates positioned around `today` so every status band shows up.
fn sample_fleet(today: NaiveDate) -> Vec<CertificateInput> {
    let iso = |date: NaiveDate| Some(date.format("%Y-%m-%d").to_string());
    let days = chrono::Duration::days;

    let equipment_valid = today + days(365 * 2 + 170);
    let condition_valid = today + days(11);

    vec![
        CertificateInput {
            name: "Cargo Ship Safety Equipment Certificate".to_string(),
            issue_date: iso(equipment_valid - days(365 * 5)),
            valid_date: iso(equipment_valid),
            ..CertificateInput::default()
        },
        CertificateInput {
            name: "International Tonnage Certificate (1969)".to_string(),
            issue_date: iso(today - days(3650)),
            valid_date: iso(today + days(1825)),
            ..CertificateInput::default()
        },
        CertificateInput {
            name: "Condition of Class - Hull".to_string(),
            issue_date: iso(today - days(60)),
            valid_date: iso(condition_valid),
            is_condition: true,
            ..CertificateInput::default()
        },
        CertificateInput {
            name: "Safety Management Certificate".to_string(),
            next_survey_designation: Some("Initial".to_string()),
            is_interim: true,
            issue_date: iso(today - days(170)),
            valid_date: iso(today + days(5)),
            ..CertificateInput::default()
        },
    ]
}

fn render_result(result: &SurveyResult) {
    println!("Category: {}", result.category.label());
    println!(
        "Next survey: {} | {}",
        result.next_survey_display, result.next_survey_type
    );
    println!("Status: {}", result.status.label());
    if let (Some(open), Some(close)) = (result.window_open, result.window_close) {
        println!("Window: {open} to {close}");
    }
    if let Some(days) = result.days_to_window_close {
        println!("Days to window close: {days}");
    }
}

fn render_report(report: &ShipSurveyReport) {
    println!("\nShip {} as of {}", report.ship_id, report.today);
    println!("Status summary:");
    for entry in &report.status_counts {
        println!("  - {}: {}", entry.status_label, entry.count);
    }

    if report.upcoming.is_empty() {
        println!("No surveys pending.");
    } else {
        println!("Upcoming surveys:");
        for view in &report.upcoming {
            let days = view
                .days_to_window_close
                .map(|days| format!("{days} days to window close"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  - {} | {} | {} | {} ({})",
                view.certificate_name,
                view.next_survey_type,
                view.next_survey_display,
                view.status_label,
                days
            );
        }
    }

    let attention = report.attention().count();
    if attention > 0 {
        println!("{attention} survey(s) need attention.");
    }

    if !report.failures.is_empty() {
        println!("Certificates with unusable dates:");
        for failure in &report.failures {
            println!(
                "  - {} [{}]: {}",
                failure.certificate_name, failure.field, failure.error
            );
        }
    }
}
