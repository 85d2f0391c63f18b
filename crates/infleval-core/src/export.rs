//! CSV serialization of a sorted report.
//!
//! The document starts with a UTF-8 byte-order mark so spreadsheet tools pick
//! the right encoding, and records are separated by `\n`.

use chrono::NaiveDate;

use crate::error::ExportError;
use crate::report::{BriefId, ScoredInfluencer};

pub const CSV_HEADER: [&str; 6] = [
    "handle",
    "authenticity",
    "relevance",
    "resonance",
    "expected_roas",
    "trust_index",
];

const UTF8_BOM: &str = "\u{FEFF}";

/// A rendered export, ready to be written wherever the caller downloads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
    rows: usize,
}

impl CsvExport {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    /// Number of data rows, excluding the header.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows
    }
}

/// `influencer_report_brief_<briefId>_<YYYY-MM-DD>.csv`
#[must_use]
pub fn export_filename(brief_id: BriefId, date: NaiveDate) -> String {
    format!(
        "influencer_report_brief_{brief_id}_{}.csv",
        date.format("%Y-%m-%d")
    )
}

/// Serializes `rows` in the order given.
///
/// # Errors
///
/// Returns [`ExportError::NothingToExport`] when `rows` is empty, and
/// [`ExportError::Csv`] if the writer fails.
pub fn export_csv<'a, I>(
    brief_id: BriefId,
    rows: I,
    date: NaiveDate,
) -> Result<CsvExport, ExportError>
where
    I: IntoIterator<Item = &'a ScoredInfluencer>,
{
    let mut rows = rows.into_iter().peekable();
    if rows.peek().is_none() {
        return Err(ExportError::NothingToExport);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(UTF8_BOM.as_bytes().to_vec());

    writer.write_record(CSV_HEADER)?;
    let mut count = 0usize;
    for row in rows {
        writer.write_record([
            row.handle.clone(),
            format!("{:.1}", row.authenticity),
            format!("{:.1}", row.relevance),
            format!("{:.1}", row.resonance),
            format!("{:.2}", row.expected_roas),
            format!("{:.1}", row.trust_index),
        ])?;
        count += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    // Every field written above is valid UTF-8.
    let content = String::from_utf8_lossy(&bytes).into_owned();

    tracing::debug!(brief_id = %brief_id, rows = count, "rendered CSV export");

    Ok(CsvExport {
        filename: export_filename(brief_id, date),
        content,
        rows: count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::row;
    use crate::report::{sort_report, SortKey};

    fn brief() -> BriefId {
        BriefId::new(42).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    #[test]
    fn empty_view_exports_nothing() {
        let rows: Vec<ScoredInfluencer> = Vec::new();
        let result = export_csv(brief(), &rows, date());
        assert!(matches!(result, Err(ExportError::NothingToExport)));
    }

    #[test]
    fn document_starts_with_bom_and_header() {
        let rows = vec![row(1, "alice", [1.0, 2.0, 3.0, 4.0, 5.0])];
        let export = export_csv(brief(), &rows, date()).unwrap();
        assert!(export.content.starts_with('\u{FEFF}'));
        let first = export.content.trim_start_matches('\u{FEFF}').lines().next();
        assert_eq!(
            first,
            Some("handle,authenticity,relevance,resonance,expected_roas,trust_index")
        );
    }

    #[test]
    fn numbers_are_rounded_to_fixed_precision() {
        let rows = vec![row(1, "alice", [82.345, 50.0, 49.96, 3.456, 71.24])];
        let export = export_csv(brief(), &rows, date()).unwrap();
        let data = export.content.lines().nth(1).unwrap();
        assert_eq!(data, "alice,82.3,50.0,50.0,3.46,71.2");
    }

    #[test]
    fn fields_with_separators_are_quoted() {
        let rows = vec![
            row(1, "a,b", [1.0, 1.0, 1.0, 1.0, 1.0]),
            row(2, "say \"hi\"", [1.0, 1.0, 1.0, 1.0, 1.0]),
        ];
        let export = export_csv(brief(), &rows, date()).unwrap();
        let lines: Vec<&str> = export.content.lines().collect();
        assert_eq!(lines[1], "\"a,b\",1.0,1.0,1.0,1.00,1.0");
        assert_eq!(lines[2], "\"say \"\"hi\"\"\",1.0,1.0,1.0,1.00,1.0");
    }

    #[test]
    fn line_breaks_inside_fields_are_quoted_and_not_counted_as_rows() {
        let rows = vec![
            row(1, "a\nb", [1.0, 1.0, 1.0, 1.0, 1.0]),
            row(2, "c\rd", [1.0, 1.0, 1.0, 1.0, 1.0]),
        ];
        let export = export_csv(brief(), &rows, date()).unwrap();
        let body = export.content.trim_start_matches('\u{FEFF}');
        let (_, data) = body.split_once('\n').unwrap();
        assert_eq!(
            data,
            "\"a\nb\",1.0,1.0,1.0,1.00,1.0\n\"c\rd\",1.0,1.0,1.0,1.00,1.0\n"
        );
        assert_eq!(export.row_count(), 2);

        let mut reader = csv::Reader::from_reader(body.as_bytes());
        let handles: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(handles, ["a\nb", "c\rd"]);
    }

    #[test]
    fn rows_follow_the_sorted_order_and_count() {
        let rows = vec![
            row(1, "low", [10.0, 10.0, 10.0, 1.0, 10.0]),
            row(2, "high", [90.0, 90.0, 90.0, 9.0, 90.0]),
            row(3, "mid", [50.0, 50.0, 50.0, 5.0, 50.0]),
        ];
        let sorted = sort_report(&rows, SortKey::Trust);
        let export = export_csv(brief(), sorted.iter().copied(), date()).unwrap();
        assert_eq!(export.content.lines().count(), rows.len() + 1);
        assert_eq!(export.row_count(), 3);
        let handles: Vec<&str> = export
            .content
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(handles, ["high", "mid", "low"]);
    }

    #[test]
    fn numeric_fields_read_back_at_stated_precision() {
        let rows = vec![
            row(1, "alice", [12.34, 56.78, 90.12, 1.234, 45.67]),
            row(2, "bob", [0.04, 99.99, 33.333, 7.005, 0.0]),
        ];
        let export = export_csv(brief(), &rows, date()).unwrap();
        let body = export.content.trim_start_matches('\u{FEFF}');
        let mut reader = csv::ReaderBuilder::new().from_reader(body.as_bytes());
        for (record, source) in reader.records().zip(&rows) {
            let record = record.unwrap();
            let field = |i: usize| -> f64 { record[i].parse().unwrap() };
            let checks = [
                (field(1), source.authenticity, 0.05),
                (field(2), source.relevance, 0.05),
                (field(3), source.resonance, 0.05),
                (field(4), source.expected_roas, 0.005),
                (field(5), source.trust_index, 0.05),
            ];
            for (parsed, original, half_step) in checks {
                assert!(
                    (parsed - original).abs() <= half_step + 1e-9,
                    "{parsed} is not {original} at the stated precision"
                );
            }
        }
    }

    #[test]
    fn filename_embeds_brief_and_date() {
        assert_eq!(
            export_filename(brief(), date()),
            "influencer_report_brief_42_2025-03-09.csv"
        );
    }
}
