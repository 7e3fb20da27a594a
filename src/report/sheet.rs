//! Layout cursor for report sheets. Tracks the next free row per sheet
//! and the rendered width of every column touched, so tables never
//! overlap and the final width pass has exact measurements. All cell
//! addressing goes through this type.

use rust_xlsxwriter::{Chart, Workbook, Worksheet, XlsxError};

use super::style::{self, Theme, COLUMN_PADDING, MAX_COLUMN_WIDTH};

/// One rendered report cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// Pass/fail text rendered green or red.
    Flag { text: String, met: bool },
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn int(n: u64) -> Self {
        Self::Number(n as f64)
    }

    pub fn num1(n: f64) -> Self {
        Self::Number((n * 10.0).round() / 10.0)
    }

    pub fn num2(n: f64) -> Self {
        Self::Number((n * 100.0).round() / 100.0)
    }

    pub fn pct1(pct: f64) -> Self {
        Self::Text(format!("{pct:.1}%"))
    }

    pub fn flag(text: impl Into<String>, met: bool) -> Self {
        Self::Flag { text: text.into(), met }
    }

    fn display_len(&self) -> usize {
        match self {
            Self::Text(s) => s.chars().count(),
            Self::Number(n) => format!("{n}").len(),
            Self::Flag { text, .. } => text.chars().count(),
        }
    }
}

/// Position of a written table, used to bind chart ranges to the cells
/// that already hold the data.
#[derive(Debug, Clone)]
pub struct TableBlock {
    pub sheet: String,
    pub header_row: u32,
    pub first_row: u32,
    pub last_row: u32,
    pub first_col: u16,
}

impl TableBlock {
    pub fn col(&self, offset: u16) -> u16 {
        self.first_col + offset
    }
}

pub struct SheetWriter<'a> {
    sheet: &'a mut Worksheet,
    name: String,
    theme: Theme,
    next_row: u32,
    widths: Vec<usize>,
}

impl<'a> SheetWriter<'a> {
    pub fn new(sheet: &'a mut Worksheet, name: &str, theme: Theme) -> Result<Self, XlsxError> {
        sheet.set_name(name)?;
        Ok(Self {
            sheet,
            name: name.into(),
            theme,
            next_row: 0,
            widths: Vec::new(),
        })
    }

    /// Merged title line spanning `span` columns, followed by a blank
    /// row.
    pub fn title(&mut self, text: &str, span: u16) -> Result<(), XlsxError> {
        self.sheet.merge_range(
            self.next_row,
            0,
            self.next_row,
            span.saturating_sub(1),
            text,
            &style::title(&self.theme),
        )?;
        self.next_row += 2;
        Ok(())
    }

    /// `label: value` line, value in italics.
    pub fn caption(&mut self, label: &str, value: &str) -> Result<(), XlsxError> {
        self.sheet.write_string(self.next_row, 0, label)?;
        self.sheet
            .write_string_with_format(self.next_row, 1, value, &style::caption())?;
        self.track(0, label.chars().count());
        self.track(1, value.chars().count());
        self.next_row += 1;
        Ok(())
    }

    pub fn blank(&mut self, rows: u32) {
        self.next_row += rows;
    }

    /// Section heading followed by a blank row.
    pub fn section(&mut self, text: &str) -> Result<(), XlsxError> {
        self.sheet
            .write_string_with_format(self.next_row, 0, text, &style::section(&self.theme))?;
        self.track(0, text.chars().count());
        self.next_row += 2;
        Ok(())
    }

    /// Header + data table at the cursor, then advances past it leaving
    /// one blank row.
    pub fn table(&mut self, headers: &[&str], rows: &[Vec<Cell>]) -> Result<TableBlock, XlsxError> {
        let at = self.next_row;
        let block = self.write_block(at, 0, None, headers, rows)?;
        self.next_row = block.last_row + 2;
        Ok(block)
    }

    /// Side block at a fixed anchor (chart data, companion tables).
    /// Does not move the cursor.
    pub fn block_at(
        &mut self,
        row: u32,
        col: u16,
        caption: Option<&str>,
        headers: &[&str],
        rows: &[Vec<Cell>],
    ) -> Result<TableBlock, XlsxError> {
        self.write_block(row, col, caption, headers, rows)
    }

    /// Chart anchored at a fixed cell, distinct from its data block. The
    /// data block must already be written.
    pub fn insert_chart(&mut self, row: u32, col: u16, chart: &Chart) -> Result<(), XlsxError> {
        self.sheet.insert_chart(row, col, chart)?;
        Ok(())
    }

    pub fn next_row(&self) -> u32 {
        self.next_row
    }

    /// Hands back the measured column widths for the final layout pass.
    pub fn finish(self) -> Vec<usize> {
        self.widths
    }

    fn write_block(
        &mut self,
        row: u32,
        col: u16,
        caption: Option<&str>,
        headers: &[&str],
        rows: &[Vec<Cell>],
    ) -> Result<TableBlock, XlsxError> {
        let mut at = row;
        if let Some(text) = caption {
            self.sheet
                .write_string_with_format(at, col, text, &style::bold())?;
            self.track(col, text.chars().count());
            at += 1;
        }

        let header_row = at;
        let header_format = style::header(&self.theme);
        for (i, header) in headers.iter().enumerate() {
            let c = col + i as u16;
            self.sheet
                .write_string_with_format(header_row, c, *header, &header_format)?;
            self.track(c, header.chars().count());
        }
        at += 1;

        let first_row = at;
        let text_format = style::cell();
        let number_format = style::cell_centered();
        let met_format = style::met();
        let missed_format = style::missed();
        for cells in rows {
            for (i, cell) in cells.iter().enumerate() {
                let c = col + i as u16;
                match cell {
                    Cell::Text(s) => {
                        self.sheet.write_string_with_format(at, c, s, &text_format)?;
                    }
                    Cell::Number(n) => {
                        self.sheet
                            .write_number_with_format(at, c, *n, &number_format)?;
                    }
                    Cell::Flag { text, met } => {
                        let format = if *met { &met_format } else { &missed_format };
                        self.sheet.write_string_with_format(at, c, text, format)?;
                    }
                }
                self.track(c, cell.display_len());
            }
            at += 1;
        }

        Ok(TableBlock {
            sheet: self.name.clone(),
            header_row,
            first_row,
            last_row: at.saturating_sub(1),
            first_col: col,
        })
    }

    fn track(&mut self, col: u16, len: usize) {
        let col = col as usize;
        if self.widths.len() <= col {
            self.widths.resize(col + 1, 0);
        }
        self.widths[col] = self.widths[col].max(len);
    }
}

/// The one layout pass: runs after every sheet is fully written
/// (content and charts), applying each column's measured width plus
/// padding, capped at the maximum.
pub fn apply_column_widths(
    workbook: &mut Workbook,
    widths: &[Vec<usize>],
) -> Result<(), XlsxError> {
    for (sheet, columns) in workbook.worksheets_mut().iter_mut().zip(widths) {
        for (i, width) in columns.iter().enumerate() {
            if *width == 0 {
                continue;
            }
            let adjusted = (width + COLUMN_PADDING).min(MAX_COLUMN_WIDTH);
            sheet.set_column_width(i as u16, adjusted as f64)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Vec<Cell>> {
        vec![
            vec![Cell::text("a rather long label"), Cell::int(12)],
            vec![Cell::text("b"), Cell::num2(3.456)],
        ]
    }

    #[test]
    fn cursor_advances_past_each_table() {
        let mut sheet = Worksheet::new();
        let mut sw = SheetWriter::new(&mut sheet, "Probe", Theme::lims()).unwrap();
        sw.title("Title", 4).unwrap();
        assert_eq!(sw.next_row(), 2);
        let block = sw.table(&["Label", "Count"], &rows()).unwrap();
        assert_eq!(block.header_row, 2);
        assert_eq!(block.first_row, 3);
        assert_eq!(block.last_row, 4);
        assert_eq!(sw.next_row(), 6);
    }

    #[test]
    fn side_blocks_do_not_move_the_cursor() {
        let mut sheet = Worksheet::new();
        let mut sw = SheetWriter::new(&mut sheet, "Probe", Theme::nhs()).unwrap();
        let before = sw.next_row();
        let block = sw
            .block_at(3, 6, Some("Chart Data"), &["Label", "Count"], &rows())
            .unwrap();
        assert_eq!(sw.next_row(), before);
        assert_eq!(block.header_row, 4);
        assert_eq!(block.first_col, 6);
    }

    #[test]
    fn widths_record_the_longest_rendered_string() {
        let mut sheet = Worksheet::new();
        let mut sw = SheetWriter::new(&mut sheet, "Probe", Theme::lims()).unwrap();
        sw.table(&["Label", "Count"], &rows()).unwrap();
        let widths = sw.finish();
        assert_eq!(widths[0], "a rather long label".len());
        assert_eq!(widths[1], "Count".len());
    }

    #[test]
    fn rounded_cells_render_trimmed() {
        assert_eq!(Cell::num2(3.456), Cell::Number(3.46));
        assert_eq!(Cell::num1(3.456), Cell::Number(3.5));
        assert_eq!(Cell::pct1(33.333), Cell::Text("33.3%".into()));
    }

    #[test]
    fn width_pass_caps_at_maximum() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let mut sw = SheetWriter::new(sheet, "Probe", Theme::lims()).unwrap();
        let long = "x".repeat(80);
        sw.table(&["Label"], &[vec![Cell::text(long)]]).unwrap();
        let widths = vec![sw.finish()];
        apply_column_widths(&mut workbook, &widths).unwrap();
    }
}
