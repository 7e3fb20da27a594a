//! Chart constructors. Every chart binds by cell-range reference to a
//! `TableBlock` that has already been written, so the references always
//! point at populated cells.

use rust_xlsxwriter::{Chart, ChartType};

use super::sheet::TableBlock;

const CHART_WIDTH: u32 = 460;
const CHART_HEIGHT: u32 = 300;

pub fn column_chart(
    title: &str,
    x_title: &str,
    y_title: &str,
    block: &TableBlock,
    category_col: u16,
    value_col: u16,
    series_name: &str,
) -> Chart {
    let mut chart = Chart::new(ChartType::Column);
    add_series(&mut chart, block, category_col, value_col, series_name);
    chart.title().set_name(title);
    chart.x_axis().set_name(x_title);
    chart.y_axis().set_name(y_title);
    chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);
    chart
}

pub fn line_chart(
    title: &str,
    x_title: &str,
    y_title: &str,
    block: &TableBlock,
    category_col: u16,
    value_col: u16,
    series_name: &str,
) -> Chart {
    let mut chart = Chart::new(ChartType::Line);
    add_series(&mut chart, block, category_col, value_col, series_name);
    chart.title().set_name(title);
    chart.x_axis().set_name(x_title);
    chart.y_axis().set_name(y_title);
    chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);
    chart
}

pub fn pie_chart(title: &str, block: &TableBlock, category_col: u16, value_col: u16) -> Chart {
    let mut chart = Chart::new(ChartType::Pie);
    add_series(&mut chart, block, category_col, value_col, title);
    chart.title().set_name(title);
    chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);
    chart
}

/// Two value series against one category column (achievement vs target).
pub fn comparison_chart(
    title: &str,
    x_title: &str,
    y_title: &str,
    block: &TableBlock,
    category_col: u16,
    first: (u16, &str),
    second: (u16, &str),
) -> Chart {
    let mut chart = Chart::new(ChartType::Column);
    add_series(&mut chart, block, category_col, first.0, first.1);
    add_series(&mut chart, block, category_col, second.0, second.1);
    chart.title().set_name(title);
    chart.x_axis().set_name(x_title);
    chart.y_axis().set_name(y_title);
    chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);
    chart
}

fn add_series(
    chart: &mut Chart,
    block: &TableBlock,
    category_col: u16,
    value_col: u16,
    name: &str,
) {
    chart
        .add_series()
        .set_categories((
            block.sheet.as_str(),
            block.first_row,
            block.col(category_col),
            block.last_row,
            block.col(category_col),
        ))
        .set_values((
            block.sheet.as_str(),
            block.first_row,
            block.col(value_col),
            block.last_row,
            block.col(value_col),
        ))
        .set_name(name);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> TableBlock {
        TableBlock {
            sheet: "Probe".into(),
            header_row: 4,
            first_row: 5,
            last_row: 9,
            first_col: 5,
        }
    }

    #[test]
    fn charts_construct_without_panicking() {
        let block = block();
        column_chart("t", "x", "y", &block, 0, 1, "s");
        line_chart("t", "x", "y", &block, 0, 1, "s");
        pie_chart("t", &block, 0, 1);
        comparison_chart("t", "x", "y", &block, 0, (1, "a"), (2, "b"));
    }

    #[test]
    fn block_offsets_resolve_against_first_col() {
        let block = block();
        assert_eq!(block.col(0), 5);
        assert_eq!(block.col(2), 7);
    }
}
