//! NHS report renderer: five sheets covering the executive summary,
//! demographics, clinical conditions, prescribing patterns and QOF
//! performance.

use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::{
    age_band_distribution, column_index, count_where, distinct_count, filtered_frequency,
    frequency, mean, mean_by, monthly_counts, rate_pct, top_k, TargetCheck,
};
use crate::config::NhsKpiTargets;
use crate::dataset::table::{Table, DATETIME_FMT, DATE_FMT};
use crate::models::{condition_name, medication_name, ModelError, NhsGender};

use super::charts;
use super::sheet::{apply_column_widths, Cell, SheetWriter};
use super::style::Theme;
use super::{find_table, ReportError};

pub fn render(
    tables: &[Table],
    generated_at: NaiveDateTime,
    targets: &NhsKpiTargets,
    path: &Path,
) -> Result<(), ReportError> {
    let demographics = find_table(tables, "demographics")?;
    let diagnoses = find_table(tables, "diagnoses")?;
    let medications = find_table(tables, "medications")?;
    let appointments = find_table(tables, "appointments")?;
    let admissions = find_table(tables, "admissions")?;
    let qof_metrics = find_table(tables, "qof_metrics")?;

    let mut workbook = Workbook::new();
    let mut widths = Vec::new();
    widths.push(executive_summary(
        workbook.add_worksheet(),
        generated_at,
        targets,
        demographics,
        appointments,
        admissions,
    )?);
    widths.push(patient_demographics(
        workbook.add_worksheet(),
        generated_at,
        demographics,
    )?);
    widths.push(clinical_conditions(workbook.add_worksheet(), diagnoses)?);
    widths.push(medication_analysis(workbook.add_worksheet(), medications)?);
    widths.push(qof_performance(workbook.add_worksheet(), qof_metrics)?);

    apply_column_widths(&mut workbook, &widths)?;
    workbook.save(path)?;
    Ok(())
}

fn executive_summary(
    sheet: &mut Worksheet,
    generated_at: NaiveDateTime,
    targets: &NhsKpiTargets,
    demographics: &Table,
    appointments: &Table,
    admissions: &Table,
) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "Executive Summary", Theme::nhs())?;
    sw.title("NHS Integration Platform - Clinical Dashboard Report", 8)?;
    sw.caption(
        "Report Generated:",
        &generated_at.format(DATETIME_FMT).to_string(),
    )?;
    sw.caption(
        "Reporting Period:",
        &format!(
            "{} to {}",
            (generated_at - Duration::days(365)).format(DATE_FMT),
            generated_at.format(DATE_FMT)
        ),
    )?;
    sw.blank(1);
    sw.section("KEY PERFORMANCE INDICATORS")?;

    let registered = demographics.len() as u64;
    let active = distinct_count(appointments, "patient_id")?;
    let total_appointments = appointments.len() as u64;
    let completed = count_where(appointments, "status", "2")?;
    let completion = rate_pct("appointment completion rate", completed, total_appointments)?;
    let avg_wait = mean(appointments, "wait_time_days")?;
    let readmissions = count_where(admissions, "readmission_flag", "1")?;
    let readmission_rate = rate_pct(
        "30-day readmission rate",
        readmissions,
        admissions.len() as u64,
    )?;

    let checks = [
        TargetCheck::at_least(
            "Total Registered Patients",
            registered.to_string(),
            registered as f64,
            targets.registered_patients,
        ),
        TargetCheck::at_least(
            "Active Patients (with appointments)",
            active.to_string(),
            active as f64,
            targets.active_patients,
        ),
        TargetCheck::at_least(
            "Total Appointments",
            total_appointments.to_string(),
            total_appointments as f64,
            targets.appointments,
        ),
        TargetCheck::at_least(
            "Appointment Completion Rate",
            format!("{completion:.1}%"),
            completion,
            targets.completion_pct,
        ),
        TargetCheck::at_most(
            "Average Wait Time (days)",
            format!("{avg_wait:.1}"),
            avg_wait,
            targets.max_wait_days,
        ),
        TargetCheck::at_most(
            "30-Day Readmission Rate",
            format!("{readmission_rate:.1}%"),
            readmission_rate,
            targets.max_readmission_pct,
        ),
    ];
    let rows: Vec<Vec<Cell>> = checks
        .iter()
        .map(|check| {
            vec![
                Cell::text(&check.metric),
                Cell::text(&check.value),
                Cell::text(&check.target),
                Cell::flag(if check.met { "✓" } else { "✗" }, check.met),
            ]
        })
        .collect();
    let kpi_block = sw.table(&["Metric", "Value", "Target", "Status"], &rows)?;

    let trend = monthly_counts(appointments, "appointment_date", 6)?;
    let trend_rows: Vec<Vec<Cell>> = trend
        .iter()
        .map(|point| vec![Cell::text(&point.bucket), Cell::int(point.count)])
        .collect();
    let data_block = sw.block_at(
        kpi_block.header_row,
        5,
        Some("Chart Data"),
        &["Month", "Appointments"],
        &trend_rows,
    )?;
    let chart = charts::line_chart(
        "6-Month Appointment Trends",
        "Month",
        "Appointments",
        &data_block,
        0,
        1,
        "Appointments",
    );
    sw.insert_chart(sw.next_row(), 0, &chart)?;
    Ok(sw.finish())
}

fn patient_demographics(
    sheet: &mut Worksheet,
    generated_at: NaiveDateTime,
    demographics: &Table,
) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "Patient Demographics", Theme::nhs())?;
    sw.title("PATIENT DEMOGRAPHICS ANALYSIS", 6)?;
    sw.section("Age Distribution")?;

    let bands = age_band_distribution(demographics, "dob", generated_at.date())?;
    let rows: Vec<Vec<Cell>> = bands
        .iter()
        .map(|band| {
            vec![
                Cell::text(&band.label),
                Cell::int(band.count),
                Cell::pct1(band.share_pct),
            ]
        })
        .collect();
    let age_block = sw.table(&["Age Group", "Count", "Percentage"], &rows)?;

    let genders = frequency(demographics, "gender_code")?;
    let gender_rows: Vec<Vec<Cell>> = genders
        .iter()
        .map(|row| -> Result<Vec<Cell>, ReportError> {
            let code: u8 = row.label.parse().map_err(|_| ModelError::InvalidEnum {
                field: "gender_code".into(),
                value: row.label.clone(),
            })?;
            let gender = NhsGender::from_code(code)?;
            Ok(vec![
                Cell::text(gender.label()),
                Cell::int(row.count),
                Cell::pct1(row.share_pct),
            ])
        })
        .collect::<Result<_, _>>()?;
    sw.block_at(
        age_block.header_row,
        4,
        Some("Gender Distribution"),
        &["Gender", "Count", "Percentage"],
        &gender_rows,
    )?;

    let chart_rows: Vec<Vec<Cell>> = bands
        .iter()
        .map(|band| vec![Cell::text(&band.label), Cell::int(band.count)])
        .collect();
    let data_block = sw.block_at(
        age_block.header_row,
        9,
        Some("Chart Data"),
        &["Age Group", "Count"],
        &chart_rows,
    )?;
    let pie = charts::pie_chart("Patient Age Distribution", &data_block, 0, 1);
    sw.insert_chart(sw.next_row(), 0, &pie)?;
    Ok(sw.finish())
}

fn clinical_conditions(sheet: &mut Worksheet, diagnoses: &Table) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "Clinical Conditions", Theme::nhs())?;
    sw.title("TOP 10 CLINICAL CONDITIONS", 4)?;
    sw.blank(1);

    let conditions = frequency(diagnoses, "snomed_code")?;
    let diagnosed_patients = distinct_count(diagnoses, "patient_id")?;
    let rows: Vec<Vec<Cell>> = top_k(&conditions, 10)
        .iter()
        .enumerate()
        .map(|(rank, row)| -> Result<Vec<Cell>, ReportError> {
            let prevalence = rate_pct(
                &format!("prevalence of {}", row.label),
                row.count,
                diagnosed_patients,
            )?;
            Ok(vec![
                Cell::int(rank as u64 + 1),
                Cell::text(display_condition(&row.label)),
                Cell::int(row.count),
                Cell::pct1(prevalence),
            ])
        })
        .collect::<Result<_, _>>()?;
    let table_block = sw.table(&["Rank", "Condition", "Patient Count", "Prevalence %"], &rows)?;

    let chart_rows: Vec<Vec<Cell>> = top_k(&conditions, 5)
        .iter()
        .map(|row| {
            vec![
                Cell::text(clip(display_condition(&row.label), 20)),
                Cell::int(row.count),
            ]
        })
        .collect();
    let data_block = sw.block_at(
        table_block.header_row,
        5,
        Some("Chart Data"),
        &["Condition", "Count"],
        &chart_rows,
    )?;
    let bar = charts::column_chart(
        "Top 5 Clinical Conditions",
        "Condition",
        "Number of Patients",
        &data_block,
        0,
        1,
        "Count",
    );
    sw.insert_chart(sw.next_row(), 0, &bar)?;
    Ok(sw.finish())
}

fn medication_analysis(
    sheet: &mut Worksheet,
    medications: &Table,
) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "Medication Analysis", Theme::nhs())?;
    sw.title("MEDICATION PRESCRIBING PATTERNS", 5)?;
    sw.blank(1);

    let prescriptions = frequency(medications, "dm_d_code")?;
    let adherence = mean_by(medications, "dm_d_code", "adherence_score")?;
    let active = filtered_frequency(medications, "dm_d_code", "status", "1")?;
    let rows: Vec<Vec<Cell>> = top_k(&prescriptions, 10)
        .iter()
        .enumerate()
        .map(|(rank, row)| {
            let avg_adherence = adherence
                .iter()
                .find(|(label, _)| *label == row.label)
                .map_or(0.0, |(_, mean)| *mean);
            let active_count = active
                .iter()
                .find(|(label, _)| *label == row.label)
                .map_or(0, |(_, count)| *count);
            vec![
                Cell::int(rank as u64 + 1),
                Cell::text(display_medication(&row.label)),
                Cell::int(row.count),
                Cell::pct1(avg_adherence * 100.0),
                Cell::text(format!("{active_count}/{} Active", row.count)),
            ]
        })
        .collect();
    let table_block = sw.table(
        &["Rank", "Medication", "Prescriptions", "Avg Adherence", "Status"],
        &rows,
    )?;

    let chart_rows: Vec<Vec<Cell>> = top_k(&prescriptions, 6)
        .iter()
        .map(|row| {
            vec![
                Cell::text(clip(display_medication(&row.label), 25)),
                Cell::int(row.count),
            ]
        })
        .collect();
    let data_block = sw.block_at(
        table_block.header_row,
        6,
        Some("Chart Data"),
        &["Medication", "Count"],
        &chart_rows,
    )?;
    let pie = charts::pie_chart("Top Prescribed Medications", &data_block, 0, 1);
    sw.insert_chart(sw.next_row(), 0, &pie)?;
    Ok(sw.finish())
}

fn qof_performance(sheet: &mut Worksheet, qof_metrics: &Table) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "QOF Performance", Theme::nhs())?;
    sw.title("QUALITY OUTCOMES FRAMEWORK (QOF) PERFORMANCE", 6)?;
    sw.blank(1);

    let code_index = column_index(qof_metrics, "indicator_code")?;
    let numerator_index = column_index(qof_metrics, "numerator")?;
    let denominator_index = column_index(qof_metrics, "denominator")?;
    let points_index = column_index(qof_metrics, "achievement_points")?;
    let target_index = column_index(qof_metrics, "target_percentage")?;
    let exception_index = column_index(qof_metrics, "exception_reporting")?;

    struct Indicator {
        code: String,
        achievement: f64,
        target: f64,
        points: f64,
        exception: f64,
    }

    let indicators: Vec<Indicator> = qof_metrics
        .rows
        .iter()
        .map(|row| -> Result<Indicator, ReportError> {
            let code = row[code_index].label();
            let numerator = row[numerator_index].as_number().unwrap_or(0.0) as u64;
            let denominator = row[denominator_index].as_number().unwrap_or(0.0) as u64;
            let achievement = rate_pct(&format!("QOF {code} achievement"), numerator, denominator)?;
            Ok(Indicator {
                code,
                achievement,
                target: row[target_index].as_number().unwrap_or(0.0),
                points: row[points_index].as_number().unwrap_or(0.0),
                exception: row[exception_index].as_number().unwrap_or(0.0),
            })
        })
        .collect::<Result<_, _>>()?;

    let rows: Vec<Vec<Cell>> = indicators
        .iter()
        .map(|ind| {
            let met = ind.achievement >= ind.target;
            vec![
                Cell::text(&ind.code),
                Cell::pct1(ind.achievement),
                Cell::pct1(ind.target),
                Cell::num1(ind.points),
                Cell::pct1(ind.exception),
                Cell::flag(if met { "✓ Met" } else { "✗ Not Met" }, met),
            ]
        })
        .collect();
    let table_block = sw.table(
        &["Indicator", "Achievement", "Target", "Points", "Exception %", "Status"],
        &rows,
    )?;

    let chart_rows: Vec<Vec<Cell>> = indicators
        .iter()
        .take(5)
        .map(|ind| {
            vec![
                Cell::text(&ind.code),
                Cell::num1(ind.achievement),
                Cell::num1(ind.target),
            ]
        })
        .collect();
    let data_block = sw.block_at(
        table_block.header_row,
        7,
        Some("Chart Data"),
        &["Indicator", "Achievement", "Target"],
        &chart_rows,
    )?;
    let chart = charts::comparison_chart(
        "QOF Performance vs Targets",
        "Indicator",
        "Percentage",
        &data_block,
        0,
        (1, "Achievement"),
        (2, "Target"),
    );
    sw.insert_chart(sw.next_row(), 0, &chart)?;
    Ok(sw.finish())
}

fn display_condition(code: &str) -> String {
    condition_name(code).map_or_else(|| code.to_string(), str::to_string)
}

fn display_medication(code: &str) -> String {
    medication_name(code).map_or_else(|| code.to_string(), str::to_string)
}

fn clip(s: String, max: usize) -> String {
    s.chars().take(max).collect()
}
