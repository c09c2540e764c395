use chrono::NaiveDate;
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use owo_colors::OwoColorize;

use zorg_core::daily::{ClientDayTasks, DailyOverview, TaskSummary};
use zorg_core::models::{CareDomain, DayStatus, TaskInstance, TaskStatus};
use zorg_core::scan::{MissedDaysReport, MissedDose, MissingMedicationReport};

fn domain_label(domain: CareDomain) -> &'static str {
    match domain {
        CareDomain::Medication => "medicatie",
        CareDomain::TubeFeeding => "sondevoeding",
        CareDomain::FluidIntake => "vocht",
        CareDomain::Meal => "voeding",
        CareDomain::Nursing => "verpleegtechnisch",
        CareDomain::WoundCare => "wondzorg",
    }
}

fn status_cell(item: &TaskInstance) -> Cell {
    if item.is_overdue && item.status.is_unmet() {
        return Cell::new("achterstallig").fg(Color::Red).add_attribute(Attribute::Bold);
    }
    match item.status {
        TaskStatus::Given => Cell::new("gegeven").fg(Color::Green),
        TaskStatus::Skipped => Cell::new("overgeslagen").fg(Color::DarkGrey),
        TaskStatus::Pending => Cell::new("open").fg(Color::Yellow),
        TaskStatus::Missing => Cell::new("gemist").fg(Color::Red),
    }
}

fn item_row(item: &TaskInstance) -> Row {
    let mut row = Row::new();
    row.add_cell(Cell::new(domain_label(item.domain)));
    row.add_cell(Cell::new(item.date.to_string()));
    row.add_cell(Cell::new(
        item.scheduled_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default(),
    ));
    row.add_cell(Cell::new(&item.name));
    row.add_cell(Cell::new(item.dose.as_deref().unwrap_or_default()));
    row.add_cell(status_cell(item));
    row.add_cell(Cell::new(item.skip_reason.as_deref().unwrap_or_default()));
    row
}

fn summary_line(summary: &TaskSummary) -> String {
    let badge = match summary.status {
        DayStatus::AllDone => "alles gedaan".green().bold().to_string(),
        DayStatus::Pending => "nog open".yellow().bold().to_string(),
        DayStatus::Overdue => "achterstallig".red().bold().to_string(),
    };
    format!(
        "{} - {} taken, {} afgerond, {} open, {} achterstallig",
        badge, summary.total_tasks, summary.completed, summary.pending, summary.overdue
    )
}

fn client_items(client: &ClientDayTasks) -> impl Iterator<Item = &TaskInstance> {
    client
        .medication
        .items
        .iter()
        .chain(&client.tube_feeding.items)
        .chain(&client.fluid_intake.items)
        .chain(&client.meals.items)
        .chain(&client.nursing.items)
        .chain(&client.wound_care.items)
}

pub fn display_overview(overview: &DailyOverview) {
    if overview.clients.is_empty() {
        println!("No shifts on {}.", overview.date);
        return;
    }

    for client in &overview.clients {
        let overnight = if client.shift.overnight { " (overnight)" } else { "" };
        println!(
            "{} {} - shift {}-{}{}",
            "Client".bold(),
            client.client_id,
            client.shift.start_time.format("%H:%M"),
            client.shift.end_time.format("%H:%M"),
            overnight
        );

        let mut table = Table::new();
        table.set_header(vec!["Domein", "Datum", "Tijd", "Taak", "Dosis", "Status", "Reden"]);
        for item in client_items(client) {
            table.add_row(item_row(item));
        }
        if client.reports.count == 0 {
            println!("{}", "No shift report written for this date yet.".yellow());
        }
        println!("{table}");
        println!("{}", summary_line(&client.summary));
        println!();
    }

    if overview.clients.len() > 1 {
        println!("Total: {}", summary_line(&overview.global_summary));
    }
}

pub fn display_missed(report: &MissedDaysReport) {
    if report.missed_days.is_empty() {
        println!("Nothing missed in the scanned window.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Datum",
        "Client",
        "Medicatie",
        "Sondevoeding",
        "Vocht",
        "Voeding",
        "Rapportage",
    ]);
    for day in &report.missed_days {
        for client in &day.clients {
            let mut row = Row::new();
            row.add_cell(Cell::new(&day.date_label));
            row.add_cell(Cell::new(&client.client_id.to_string()[..8]));

            let medication = format!("{}/{}", client.pending_medications, client.total_medications);
            row.add_cell(if client.pending_medications > 0 {
                Cell::new(medication).fg(Color::Red)
            } else {
                Cell::new(medication)
            });
            let tube = format!("{}/{}", client.pending_sondevoeding, client.total_sondevoeding);
            row.add_cell(if client.pending_sondevoeding > 0 {
                Cell::new(tube).fg(Color::Red)
            } else {
                Cell::new(tube)
            });
            row.add_cell(Cell::new(client.pending_io.to_string()));
            row.add_cell(Cell::new(client.pending_voeding.to_string()));
            row.add_cell(if client.has_report {
                Cell::new("ja").fg(Color::Green)
            } else {
                Cell::new("nee").fg(Color::Red)
            });
            table.add_row(row);
        }
    }
    println!("{table}");
}

fn dose_table(doses: &[MissedDose], with_reason: bool) -> Table {
    let mut table = Table::new();
    let mut header = vec!["Datum", "Tijd", "Medicatie", "Dosis"];
    if with_reason {
        header.push("Reden");
    }
    table.set_header(header);
    for dose in doses {
        let mut row = Row::new();
        row.add_cell(Cell::new(dose.date.to_string()));
        row.add_cell(Cell::new(dose.time.format("%H:%M").to_string()));
        row.add_cell(Cell::new(&dose.name));
        row.add_cell(Cell::new(dose.dose.as_deref().unwrap_or_default()));
        if with_reason {
            row.add_cell(Cell::new(dose.skip_reason.as_deref().unwrap_or_default()));
        }
        table.add_row(row);
    }
    table
}

pub fn display_medication(report: &MissingMedicationReport, today: NaiveDate) {
    let summary = &report.summary;
    if summary.total_missing == 0 && summary.total_skipped == 0 {
        println!("{}", "All scheduled medication is accounted for.".green());
        return;
    }

    println!(
        "{} doses never administered, {} skipped with a reason",
        summary.total_missing.to_string().red().bold(),
        summary.total_skipped
    );
    println!(
        "{} medications affected over {} days",
        summary.unique_medications, summary.unique_days
    );
    if let Some(oldest) = summary.oldest_missing {
        let ago = HumanTime::from(oldest.signed_duration_since(today));
        println!("Oldest missing dose: {} ({})", oldest, ago);
    }

    if let Some(missing) = &report.missing_administrations {
        if !missing.is_empty() {
            println!();
            println!("{}", "Missing:".bold());
            println!("{}", dose_table(missing, false));
        }
    }
    if let Some(skipped) = &report.skipped_administrations {
        if !skipped.is_empty() {
            println!();
            println!("{}", "Skipped:".bold());
            println!("{}", dose_table(skipped, true));
        }
    }
}
