//! Display formatting in the `id-ID` style the admins are used to.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

#[derive(Debug, Clone, Copy)]
pub struct Clock {
    offset: FixedOffset,
}

impl Clock {
    pub fn new(utc_offset_hours: i32) -> Self {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    /// `31/12/2024`
    pub fn date(&self, at: Option<DateTime<Utc>>) -> String {
        at.map(|t| t.with_timezone(&self.offset).format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// `31/12/2024 13.05`
    pub fn date_time(&self, at: Option<DateTime<Utc>>) -> String {
        at.map(|t| t.with_timezone(&self.offset).format("%d/%m/%Y %H.%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// `13.05.09`
    pub fn time(&self, at: Option<DateTime<Utc>>) -> String {
        at.map(|t| t.with_timezone(&self.offset).format("%H.%M.%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }
}

/// `Rp 1.234.567`, rounded to whole rupiah.
pub fn rupiah(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("Rp -{grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Empty values render as a dash.
pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "-".to_string(),
    }
}
