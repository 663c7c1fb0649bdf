//! Column-driven CSV serializer.
//!
//! The legacy dialect joins raw values with commas and rows with `\n` and
//! performs no quoting: a value containing a comma or newline corrupts the
//! row. That is the documented download format; `Rfc4180` quoting is
//! available behind [`CsvDialect`] for consumers that do not need byte
//! compatibility.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::error::{LogError, Result};
use crate::logging::structured::LogContext;

pub const CSV_MIME_TYPE: &str = "text/csv";

/// Field escaping policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvDialect {
    /// No quoting or escaping at all.
    #[default]
    Legacy,
    /// Quote fields containing `,`, `"`, CR or LF; double embedded quotes.
    Rfc4180,
}

impl FromStr for CsvDialect {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(CsvDialect::Legacy),
            "rfc4180" | "strict" => Ok(CsvDialect::Rfc4180),
            other => Err(LogError::validation(
                "csv_dialect",
                &format!("unknown dialect {:?}, expected legacy or rfc4180", other),
            )),
        }
    }
}

impl CsvDialect {
    /// Lay out rows (header first) as one document without a trailing
    /// newline.
    fn write(&self, rows: &[Vec<String>]) -> Result<String> {
        match self {
            CsvDialect::Legacy => Ok(rows
                .iter()
                .map(|cells| cells.join(","))
                .collect::<Vec<_>>()
                .join("\n")),
            CsvDialect::Rfc4180 => {
                let mut wtr = ::csv::WriterBuilder::new()
                    .quote_style(::csv::QuoteStyle::Necessary)
                    .terminator(::csv::Terminator::Any(b'\n'))
                    .from_writer(Vec::new());
                for cells in rows {
                    wtr.write_record(cells)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                let mut content = String::from_utf8(bytes)
                    .map_err(|e| LogError::Serialization(e.to_string()))?;
                if content.ends_with('\n') {
                    content.pop();
                }
                Ok(content)
            }
        }
    }
}

type Accessor<R> = Box<dyn Fn(&R) -> Result<String> + Send + Sync>;

/// One output column: header text and how to read the cell from a record.
pub struct Column<R> {
    pub header: String,
    accessor: Accessor<R>,
}

impl<R> Column<R> {
    pub fn new(
        header: &str,
        accessor: impl Fn(&R) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            header: header.to_string(),
            accessor: Box::new(accessor),
        }
    }

    pub fn value(&self, record: &R) -> Result<String> {
        (self.accessor)(record)
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column").field("header", &self.header).finish()
    }
}

/// A generated download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// `<prefix>_<epochMillis>.csv`
    pub file_name: String,
    pub content: String,
    pub mime_type: &'static str,
    /// Data rows, header excluded.
    pub row_count: usize,
    /// SHA-256 of `content`, hex encoded.
    pub content_hash: String,
}

/// `<prefix>_<epochMillis>.csv`
pub fn suggested_file_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}.csv", prefix, now.timestamp_millis())
}

/// Compute SHA256 hash of content.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Serializer over a fixed, ordered column list.
#[derive(Debug)]
pub struct CsvExporter<R> {
    columns: Vec<Column<R>>,
    dialect: CsvDialect,
}

impl<R> CsvExporter<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            dialect: CsvDialect::default(),
        }
    }

    pub fn with_dialect(mut self, dialect: CsvDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> CsvDialect {
        self.dialect
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Header line plus one line per record, joined by `\n`.
    ///
    /// Any cell that fails to render fails the whole document; no partial
    /// row is ever produced.
    pub fn render<'a>(&self, records: impl IntoIterator<Item = &'a R>) -> Result<String>
    where
        R: 'a,
    {
        let mut rows: Vec<Vec<String>> =
            vec![self.columns.iter().map(|c| c.header.clone()).collect()];

        for record in records {
            let cells = self
                .columns
                .iter()
                .map(|c| c.value(record))
                .collect::<Result<Vec<String>>>()?;
            rows.push(cells);
        }

        self.dialect.write(&rows)
    }

    /// Build the download artifact, or `Ok(None)` when there is nothing to
    /// export.
    pub fn export<'a>(
        &self,
        records: impl IntoIterator<Item = &'a R>,
        prefix: &str,
        now: DateTime<Utc>,
        ctx: &LogContext,
    ) -> Result<Option<ExportArtifact>>
    where
        R: 'a,
    {
        let records: Vec<&R> = records.into_iter().collect();
        if records.is_empty() {
            log::debug!("{} EXPORT_SKIPPED reason=empty prefix={}", ctx, prefix);
            return Ok(None);
        }

        let content = match self.render(records.iter().copied()) {
            Ok(content) => content,
            Err(e) => {
                log::error!("{} EXPORT_FAILED prefix={} error={}", ctx, prefix, e);
                return Err(e);
            }
        };

        let artifact = ExportArtifact {
            file_name: suggested_file_name(prefix, now),
            content_hash: compute_hash(&content),
            content,
            mime_type: CSV_MIME_TYPE,
            row_count: records.len(),
        };

        log::info!(
            "{} EXPORT_COMPLETE file={} rows={} bytes={}",
            ctx,
            artifact.file_name,
            artifact.row_count,
            artifact.content.len()
        );

        Ok(Some(artifact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug)]
    struct Row {
        name: &'static str,
        qty: u32,
    }

    fn exporter() -> CsvExporter<Row> {
        CsvExporter::new(vec![
            Column::new("name", |r: &Row| Ok(r.name.to_string())),
            Column::new("qty", |r: &Row| Ok(r.qty.to_string())),
        ])
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_704_448_800_000).unwrap()
    }

    #[test]
    fn test_render_layout() {
        let rows = vec![Row { name: "a", qty: 1 }, Row { name: "b", qty: 2 }];
        let csv = exporter().render(&rows).unwrap();
        assert_eq!(csv, "name,qty\na,1\nb,2");
    }

    #[test]
    fn test_export_artifact() {
        let rows = vec![Row { name: "a", qty: 1 }];
        let ctx = LogContext::new("s");
        let artifact = exporter().export(&rows, "history", now(), &ctx).unwrap().unwrap();

        assert_eq!(artifact.file_name, "history_1704448800000.csv");
        assert_eq!(artifact.mime_type, "text/csv");
        assert_eq!(artifact.row_count, 1);
        assert_eq!(artifact.content_hash, compute_hash("name,qty\na,1"));
        assert_eq!(artifact.content_hash.len(), 64);
    }

    #[test]
    fn test_empty_export_is_skipped() {
        let rows: Vec<Row> = Vec::new();
        let ctx = LogContext::new("s");
        assert_eq!(exporter().export(&rows, "history", now(), &ctx), Ok(None));
    }

    #[test]
    fn test_legacy_dialect_does_not_escape() {
        let rows = vec![Row { name: "a,b", qty: 1 }];
        let csv = exporter().render(&rows).unwrap();
        assert_eq!(csv, "name,qty\na,b,1");
    }

    #[test]
    fn test_rfc4180_dialect_quotes() {
        let rows = vec![Row { name: "say \"hi\", ok", qty: 1 }];
        let csv = exporter()
            .with_dialect(CsvDialect::Rfc4180)
            .render(&rows)
            .unwrap();
        assert_eq!(csv, "name,qty\n\"say \"\"hi\"\", ok\",1");
    }

    #[test]
    fn test_rfc4180_dialect_quotes_newlines_only_where_needed() {
        let rows = vec![Row { name: "two\nlines", qty: 3 }, Row { name: "plain", qty: 4 }];
        let csv = exporter()
            .with_dialect(CsvDialect::Rfc4180)
            .render(&rows)
            .unwrap();
        assert_eq!(csv, "name,qty\n\"two\nlines\",3\nplain,4");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_dialects_agree_on_plain_values() {
        let rows = vec![Row { name: "a", qty: 1 }, Row { name: "b", qty: 2 }];
        let legacy = exporter().render(&rows).unwrap();
        let strict = exporter()
            .with_dialect(CsvDialect::Rfc4180)
            .render(&rows)
            .unwrap();
        assert_eq!(legacy, strict);
    }

    #[test]
    fn test_failing_cell_fails_whole_export() {
        let exporter = CsvExporter::new(vec![
            Column::new("name", |r: &Row| Ok(r.name.to_string())),
            Column::new("qty", |r: &Row| {
                if r.qty == 0 {
                    Err(LogError::Serialization("qty".to_string()))
                } else {
                    Ok(r.qty.to_string())
                }
            }),
        ]);
        let rows = vec![Row { name: "a", qty: 1 }, Row { name: "b", qty: 0 }];
        let ctx = LogContext::new("s");
        assert!(exporter.export(&rows, "x", now(), &ctx).is_err());
    }

    #[test]
    fn test_dialect_parse() {
        assert_eq!("legacy".parse::<CsvDialect>(), Ok(CsvDialect::Legacy));
        assert_eq!("RFC4180".parse::<CsvDialect>(), Ok(CsvDialect::Rfc4180));
        assert!("excel".parse::<CsvDialect>().is_err());
    }
}
