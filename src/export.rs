use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::format::{Clock, or_dash};
use crate::models::{Submission, SubmissionType, User};

/// A rectangular sheet: header row plus data rows. The first column is always `No`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Xlsx,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

pub fn submissions_table(kind: SubmissionType, items: &[&Submission], clock: &Clock) -> Table {
    let mut headers = vec![
        "No".to_string(),
        "Tanggal".to_string(),
        kind.export_name_label().to_string(),
        "Email".to_string(),
    ];
    headers.extend(kind.export_columns().iter().map(|c| c.label.to_string()));
    headers.push("Status".to_string());

    let rows = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let mut row = vec![
                (index + 1).to_string(),
                clock.date_time(item.created_at),
                or_dash(item.applicant_name()),
                or_dash(item.applicant_email()),
            ];
            row.extend(
                kind.export_columns()
                    .iter()
                    .map(|c| or_dash(item.field(c.keys).as_deref())),
            );
            row.push(or_dash(item.status.as_deref()));
            row
        })
        .collect();

    Table { headers, rows }
}

pub fn users_table(users: &[&User]) -> Table {
    let headers = [
        "No",
        "ID User",
        "Card ID",
        "Nama Lengkap",
        "Email",
        "Telepon",
        "Role",
        "Wilayah Tugas",
        "Provinsi",
        "Kabupaten",
        "Kecamatan",
        "Kelurahan",
    ]
    .map(String::from)
    .to_vec();

    let rows = users
        .iter()
        .enumerate()
        .map(|(index, u)| {
            vec![
                (index + 1).to_string(),
                or_dash(Some(&u.id)),
                or_dash(u.card_uid.as_deref()),
                or_dash(Some(&u.full_name)),
                or_dash(Some(&u.email)),
                or_dash(u.phone.as_deref()),
                or_dash(Some(&u.role)),
                or_dash(u.wilayah_tugas.as_deref()),
                or_dash(u.provinsi.as_deref()),
                or_dash(u.kabupaten.as_deref()),
                or_dash(u.kecamatan.as_deref()),
                or_dash(u.kelurahan.as_deref()),
            ]
        })
        .collect();

    Table { headers, rows }
}

/// Single-sheet workbook with a bold header row. `No` is written as a number.
pub fn xlsx(sheet_name: &str, table: &Table) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &bold)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match (col, cell.parse::<f64>()) {
                (0, Ok(n)) => worksheet.write_number(r, 0, n)?,
                _ => worksheet.write_string(r, col as u16, cell)?,
            };
        }
    }

    workbook.save_to_buffer()
}

pub fn csv(table: &Table) -> String {
    use std::fmt::Write;
    let mut csv = String::new();

    let header: Vec<String> = table.headers.iter().map(|h| csv_escape(h)).collect();
    let _ = writeln!(csv, "{}", header.join(","));

    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|c| csv_escape(c)).collect();
        let _ = writeln!(csv, "{}", cells.join(","));
    }

    csv
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
