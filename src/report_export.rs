use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{
    Color, ConditionalFormatCell, ConditionalFormatCellRule, Format, FormatAlign, Formula,
    Workbook, Worksheet,
};

use crate::dataset::TeamDataset;
use crate::derive::{COLUMNS, DerivedRow};

// Rules run to Excel's last row so rows pasted in by hand still pick up the
// coloring.
const LAST_FORMAT_ROW: u32 = 1_048_575;
const SHEET_NAME_LIMIT: usize = 31;

const RESULT_COL: u16 = 0;
const OVER_UNDER_COL: u16 = 1;
const BTTS_COL: u16 = 9;
const PARITY_COLS: [u16; 3] = [6, 7, 8];
const ASIAN_COL: u16 = 14;
const HEAD_START_COL: u16 = 15;
const DATE_COL: u16 = 16;

pub struct ExportReport {
    pub sheets: usize,
    pub rows: usize,
    pub skipped: Vec<String>,
}

struct ColumnFills {
    loss: Format,
    win: Format,
    draw: Format,
    under: Format,
    over: Format,
    btts_no: Format,
    btts_yes: Format,
    odd: Format,
    even: Format,
    nil: Format,
}

impl ColumnFills {
    fn new() -> Self {
        Self {
            loss: fill(0xF4CCCC),
            win: fill(0xC6EFCE),
            draw: fill(0xD9D9D9),
            under: fill(0xFCE4D6),
            over: fill(0xD9EAD3),
            btts_no: fill(0xF8CBAD),
            btts_yes: fill(0xC9E2B3),
            odd: fill(0xBDD7EE),
            even: fill(0xE5D0FF),
            nil: fill(0xFCE4EC),
        }
    }
}

fn fill(rgb: u32) -> Format {
    Format::new().set_background_color(Color::RGB(rgb))
}

/// Write one sheet per team with data. Empty teams are skipped and listed in
/// the report so the caller can mention them.
pub fn save_workbook(path: &Path, datasets: &[TeamDataset]) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_background_color(Color::RGB(0xFFEB3B))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let body_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let fills = ColumnFills::new();

    let mut sheets = 0usize;
    let mut rows_written = 0usize;
    let mut skipped = Vec::new();

    for dataset in datasets {
        if dataset.rows.is_empty() {
            skipped.push(dataset.team.clone());
            continue;
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(&dataset.team))?;

        for (col, title) in COLUMNS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header_format)?;
            sheet.set_column_width(col as u16, (title.len() + 2).max(12) as f64)?;
        }

        for (idx, row) in dataset.rows.iter().enumerate() {
            write_row(sheet, idx as u32 + 1, row, &body_format)?;
        }

        apply_column_rules(sheet, &fills)?;

        sheets += 1;
        rows_written += dataset.rows.len();
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        sheets,
        rows: rows_written,
        skipped,
    })
}

fn write_row(sheet: &mut Worksheet, row: u32, data: &DerivedRow, body: &Format) -> Result<()> {
    sheet.write_string_with_format(row, RESULT_COL, data.result.as_str(), body)?;
    sheet.write_string_with_format(row, OVER_UNDER_COL, data.over_under.as_str(), body)?;
    sheet.write_number_with_format(row, 2, data.total_goals as f64, body)?;
    sheet.write_string_with_format(row, 3, data.home_away.as_str(), body)?;
    sheet.write_string_with_format(row, 4, &data.correct_score, body)?;
    sheet.write_string_with_format(row, 5, &data.ht_score, body)?;
    sheet.write_string_with_format(row, 6, data.total_goal_oe.as_str(), body)?;
    sheet.write_string_with_format(row, 7, data.team_score_oe.as_str(), body)?;
    sheet.write_string_with_format(row, 8, data.concede_oe.as_str(), body)?;
    sheet.write_string_with_format(row, BTTS_COL, data.btts.as_str(), body)?;

    let optional_pairs = [
        (10u16, &data.corners_total),
        (11, &data.cards_total),
        (12, &data.corners_ht),
        (13, &data.cards_ht),
    ];
    for (col, value) in optional_pairs {
        if let Some(value) = value {
            sheet.write_string_with_format(row, col, value, body)?;
        }
    }

    sheet.write_formula_with_format(row, ASIAN_COL, Formula::new(asian_formula(row + 1)), body)?;
    if let Some(head_start) = data.handicap_value {
        sheet.write_number_with_format(row, HEAD_START_COL, head_start, body)?;
    }
    sheet.write_string_with_format(row, DATE_COL, &data.match_date, body)?;
    Ok(())
}

/// W/D/L of the Correct Score column (E) once the Head Start column (P) is
/// added to the team's goals; editable in the sheet after the fact.
fn asian_formula(excel_row: u32) -> String {
    format!(
        "=IF(VALUE(LEFT(E{r},FIND(\"-\",E{r})-1))+P{r}>VALUE(MID(E{r},FIND(\"-\",E{r})+1,LEN(E{r}))),\"W\",\
         IF(VALUE(LEFT(E{r},FIND(\"-\",E{r})-1))+P{r}=VALUE(MID(E{r},FIND(\"-\",E{r})+1,LEN(E{r}))),\"D\",\"L\"))",
        r = excel_row
    )
}

fn apply_column_rules(sheet: &mut Worksheet, fills: &ColumnFills) -> Result<()> {
    for col in [RESULT_COL, ASIAN_COL] {
        add_equal_rules(
            sheet,
            col,
            &[("L", &fills.loss), ("W", &fills.win), ("D", &fills.draw)],
        )?;
    }
    add_equal_rules(
        sheet,
        OVER_UNDER_COL,
        &[("X", &fills.under), ("T", &fills.over)],
    )?;
    add_equal_rules(
        sheet,
        BTTS_COL,
        &[("N", &fills.btts_no), ("Y", &fills.btts_yes)],
    )?;
    for col in PARITY_COLS {
        add_equal_rules(
            sheet,
            col,
            &[("O", &fills.odd), ("E", &fills.even), ("EN", &fills.nil)],
        )?;
    }
    Ok(())
}

fn add_equal_rules(sheet: &mut Worksheet, col: u16, rules: &[(&str, &Format)]) -> Result<()> {
    for (value, format) in rules {
        let rule = ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::EqualTo(value.to_string()))
            .set_format(*format);
        sheet.add_conditional_format(1, col, LAST_FORMAT_ROW, col, &rule)?;
    }
    Ok(())
}

/// Worksheet names may not contain `/` or `?` and cap at 31 characters.
fn sheet_name(team: &str) -> String {
    let cleaned = team.replace('/', "-").replace('?', "");
    cleaned.chars().take(SHEET_NAME_LIMIT).collect()
}
