//! LIMS report renderer: six sheets of KPI tables, category breakdowns
//! and charts derived from the reloaded raw tables.

use std::path::Path;

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::{
    count_where, crosstab, filtered_frequency, frequency, mean, rate_pct, sum_by, turnaround_by,
    column_series, KpiRow,
};
use crate::config::LimsKpiTargets;
use crate::dataset::table::{Table, DATETIME_FMT};

use super::charts;
use super::sheet::{apply_column_widths, Cell, SheetWriter};
use super::style::Theme;
use super::{find_table, ReportError};

pub fn render(
    tables: &[Table],
    generated_at: NaiveDateTime,
    targets: &LimsKpiTargets,
    path: &Path,
) -> Result<(), ReportError> {
    let patients = find_table(tables, "RAW_PATIENTS")?;
    let orders = find_table(tables, "RAW_ORDERS")?;
    let specimens = find_table(tables, "RAW_SPECIMENS")?;
    let results = find_table(tables, "RAW_RESULTS")?;
    let sync_logs = find_table(tables, "SYNC_LOGS")?;
    let metrics = find_table(tables, "PERF_METRICS")?;

    let mut workbook = Workbook::new();
    let mut widths = Vec::new();
    widths.push(executive_summary(
        workbook.add_worksheet(),
        generated_at,
        targets,
        patients,
        orders,
        results,
        sync_logs,
        metrics,
    )?);
    widths.push(test_volume(workbook.add_worksheet(), orders)?);
    widths.push(tat_performance(workbook.add_worksheet(), targets, orders, metrics)?);
    widths.push(integration_status(workbook.add_worksheet(), sync_logs)?);
    widths.push(specimen_tracking(workbook.add_worksheet(), specimens)?);
    widths.push(tenant_analytics(workbook.add_worksheet(), patients, sync_logs)?);

    apply_column_widths(&mut workbook, &widths)?;
    workbook.save(path)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn executive_summary(
    sheet: &mut Worksheet,
    generated_at: NaiveDateTime,
    targets: &LimsKpiTargets,
    patients: &Table,
    orders: &Table,
    results: &Table,
    sync_logs: &Table,
    metrics: &Table,
) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "Executive Summary", Theme::lims())?;
    sw.title("Epic System Integration - Laboratory Management Dashboard", 6)?;
    sw.caption(
        "Report Generated:",
        &generated_at.format(DATETIME_FMT).to_string(),
    )?;
    sw.blank(1);
    sw.section("KEY PERFORMANCE INDICATORS")?;

    let total_patients = patients.len() as u64;
    let total_orders = orders.len() as u64;
    let resulted = count_where(orders, "Status", "RESULTED")?;
    let avg_tat = mean(metrics, "AverageTAT")?;
    let successes = count_where(sync_logs, "Status", "SUCCESS")?;
    let sync_success = rate_pct("sync success rate", successes, sync_logs.len() as u64)?;
    let critical = count_where(results, "Status", "Critical")?;

    let kpis = [
        KpiRow::higher(
            "Total Active Patients",
            total_patients.to_string(),
            total_patients as f64,
            targets.active_patients,
        ),
        KpiRow::higher(
            "Total Lab Orders",
            total_orders.to_string(),
            total_orders as f64,
            targets.lab_orders,
        ),
        KpiRow::higher(
            "Tests Completed",
            resulted.to_string(),
            resulted as f64,
            targets.resulted_orders,
        ),
        KpiRow::lower(
            "Average TAT (hours)",
            format!("{avg_tat:.2}"),
            avg_tat,
            targets.avg_tat_hours,
        ),
        KpiRow::higher(
            "Sync Success Rate",
            format!("{sync_success:.1}%"),
            sync_success,
            targets.sync_success_pct,
        ),
        KpiRow::informational("Critical Values Reported", critical.to_string()),
    ];
    let rows: Vec<Vec<Cell>> = kpis.iter().map(kpi_cells).collect();
    sw.table(
        &["Metric", "Value", "Target", "Achievement", "Status"],
        &rows,
    )?;
    Ok(sw.finish())
}

fn kpi_cells(kpi: &KpiRow) -> Vec<Cell> {
    vec![
        Cell::text(&kpi.metric),
        Cell::text(&kpi.value),
        Cell::text(kpi.target.clone().unwrap_or_else(|| "N/A".into())),
        match kpi.achievement_pct {
            Some(pct) => Cell::pct1(pct),
            None => Cell::text("N/A"),
        },
        match kpi.grade {
            Some(grade) => Cell::text(grade.label()),
            None => Cell::text("Tracked"),
        },
    ]
}

fn test_volume(sheet: &mut Worksheet, orders: &Table) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "Test Volume Analysis", Theme::lims())?;
    sw.title("Laboratory Test Volume Analysis", 4)?;
    sw.section("Test Type Distribution")?;

    let volumes = frequency(orders, "TestName")?;
    let stat_counts = filtered_frequency(orders, "TestName", "Priority", "STAT")?;
    let rows: Vec<Vec<Cell>> = volumes
        .iter()
        .map(|row| {
            let stat = stat_counts
                .iter()
                .find(|(label, _)| *label == row.label)
                .map_or(0, |(_, count)| *count);
            vec![
                Cell::text(&row.label),
                Cell::int(row.count),
                Cell::int(stat),
                Cell::pct1(stat as f64 * 100.0 / row.count as f64),
            ]
        })
        .collect();
    let block = sw.table(&["Test Type", "Total Orders", "STAT Orders", "% STAT"], &rows)?;

    let chart = charts::column_chart(
        "Test Volume by Type",
        "Test Type",
        "Number of Orders",
        &block,
        0,
        1,
        "Total Orders",
    );
    sw.insert_chart(block.header_row, 5, &chart)?;
    Ok(sw.finish())
}

fn tat_performance(
    sheet: &mut Worksheet,
    targets: &LimsKpiTargets,
    orders: &Table,
    metrics: &Table,
) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "TAT Performance", Theme::lims())?;
    sw.title("Turnaround Time Performance", 5)?;
    sw.section("Department-wise TAT Analysis")?;

    let mut departments = turnaround_by(
        orders,
        "Department",
        "OrderDateTime",
        "ResultDateTime",
        targets.avg_tat_hours,
    )?;
    departments.sort_by(|a, b| b.total.cmp(&a.total));
    let rows: Vec<Vec<Cell>> = departments
        .iter()
        .map(|dept| {
            vec![
                Cell::text(&dept.label),
                Cell::int(dept.total),
                match dept.avg_hours {
                    Some(hours) => Cell::num2(hours),
                    None => Cell::text("n/a"),
                },
                match dept.within_target_pct {
                    Some(pct) => Cell::pct1(pct),
                    None => Cell::text("n/a"),
                },
            ]
        })
        .collect();
    sw.table(
        &["Department", "Total Orders", "Avg TAT (hrs)", "Within Target"],
        &rows,
    )?;

    sw.section("Daily TAT Trend")?;
    let series = column_series(metrics, "Date", "AverageTAT")?;
    let rows: Vec<Vec<Cell>> = series
        .iter()
        .map(|(date, tat)| vec![Cell::text(date), Cell::num2(*tat)])
        .collect();
    let block = sw.table(&["Date", "Avg TAT"], &rows)?;
    let chart = charts::line_chart(
        "Daily Average TAT Trend",
        "Date",
        "TAT (hours)",
        &block,
        0,
        1,
        "Avg TAT",
    );
    sw.insert_chart(block.header_row, 5, &chart)?;
    Ok(sw.finish())
}

fn integration_status(sheet: &mut Worksheet, sync_logs: &Table) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "Integration Status", Theme::lims())?;
    sw.title("Epic-LIMS Integration Status", 5)?;
    sw.section("Synchronization Performance by Type")?;

    let breakdown = crosstab(sync_logs, "SyncType", "Status")?;
    let mut headers = vec!["Sync Type".to_string()];
    headers.extend(breakdown.columns.iter().cloned());
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let rows: Vec<Vec<Cell>> = breakdown
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::text(&row.label)];
            cells.extend(row.counts.iter().map(|count| Cell::int(*count)));
            cells
        })
        .collect();
    sw.table(&header_refs, &rows)?;

    sw.section("Overall Sync Status")?;
    let statuses = frequency(sync_logs, "Status")?;
    let rows: Vec<Vec<Cell>> = statuses
        .iter()
        .map(|row| vec![Cell::text(&row.label), Cell::int(row.count)])
        .collect();
    let block = sw.table(&["Status", "Count"], &rows)?;
    let chart = charts::pie_chart("Overall Sync Status Distribution", &block, 0, 1);
    sw.insert_chart(block.header_row, 3, &chart)?;
    Ok(sw.finish())
}

fn specimen_tracking(sheet: &mut Worksheet, specimens: &Table) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "Specimen Tracking", Theme::lims())?;
    sw.title("Specimen Chain of Custody Analysis", 4)?;
    sw.section("Current Specimen Locations")?;

    let locations = frequency(specimens, "CurrentLocation")?;
    let rows: Vec<Vec<Cell>> = locations
        .iter()
        .map(|row| {
            vec![
                Cell::text(&row.label),
                Cell::int(row.count),
                Cell::pct1(row.share_pct),
            ]
        })
        .collect();
    sw.table(&["Location", "Count", "Percentage"], &rows)?;
    Ok(sw.finish())
}

fn tenant_analytics(
    sheet: &mut Worksheet,
    patients: &Table,
    sync_logs: &Table,
) -> Result<Vec<usize>, ReportError> {
    let mut sw = SheetWriter::new(sheet, "Multi-Tenant Analytics", Theme::lims())?;
    sw.title("Multi-Tenant System Usage", 4)?;
    sw.section("Tenant Usage Statistics")?;

    let tenants = frequency(patients, "TenantID")?;
    let processed = sum_by(sync_logs, "TenantID", "RecordsProcessed")?;
    let rows: Vec<Vec<Cell>> = tenants
        .iter()
        .map(|tenant| {
            let records = processed
                .iter()
                .find(|(label, _)| *label == tenant.label)
                .map_or(0.0, |(_, sum)| *sum);
            // Every tenant label comes from the patient table, so the
            // patient count is at least one.
            vec![
                Cell::text(&tenant.label),
                Cell::int(tenant.count),
                Cell::int(records as u64),
                Cell::num1(records / tenant.count as f64),
            ]
        })
        .collect();
    sw.table(
        &[
            "Tenant",
            "Patient Count",
            "Records Processed",
            "Avg Records/Patient",
        ],
        &rows,
    )?;
    Ok(sw.finish())
}
