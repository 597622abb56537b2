//! Export of cached observations
//!
//! Supports:
//! - CSV with a `date,value` header
//! - Pretty-printed JSON array of `{date, value}`

use std::io::Write;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{DateRange, ExportFormat, Observation};

impl Database {
    /// Render the cached observations of `code` within `range`
    pub fn export_observations(
        &self,
        code: i64,
        range: DateRange,
        format: ExportFormat,
    ) -> Result<String> {
        let series = self
            .get_series(code)?
            .ok_or_else(|| Error::NotFound(format!("Series {} not found", code)))?;
        let observations = self.get_observations(series.id, range)?;

        let mut buf = Vec::new();
        write_observations(&mut buf, &observations, format)?;
        String::from_utf8(buf).map_err(|e| Error::InvalidData(e.to_string()))
    }
}

/// Write observations to `writer` in `format`
pub fn write_observations<W: Write>(
    writer: W,
    observations: &[Observation],
    format: ExportFormat,
) -> Result<()> {
    match format {
        ExportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            csv_writer.write_record(["date", "value"])?;
            for obs in observations {
                csv_writer.write_record([obs.date.to_string(), obs.value.to_string()])?;
            }
            csv_writer.flush()?;
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(writer, observations)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn seeded() -> Database {
        let db = Database::in_memory().unwrap();
        let batch = vec![
            Observation::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 11.75),
            Observation::new(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 11.65),
        ];
        db.upsert_observations(432, "Selic", &batch).unwrap();
        db
    }

    #[test]
    fn test_export_csv() {
        let db = seeded();
        let csv = db
            .export_observations(432, DateRange::all(), ExportFormat::Csv)
            .unwrap();
        assert_eq!(csv, "date,value\n2024-01-02,11.75\n2024-01-03,11.65\n");
    }

    #[test]
    fn test_export_json() {
        let db = seeded();
        let json = db
            .export_observations(432, DateRange::all(), ExportFormat::Json)
            .unwrap();

        let parsed: Vec<Observation> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].value, 11.75);
        assert!(json.contains("\"date\": \"2024-01-02\""));
    }

    #[test]
    fn test_export_range() {
        let db = seeded();
        let range = DateRange::new(NaiveDate::from_ymd_opt(2024, 1, 3), None);
        let csv = db.export_observations(432, range, ExportFormat::Csv).unwrap();
        assert_eq!(csv, "date,value\n2024-01-03,11.65\n");
    }

    #[test]
    fn test_export_unknown_series() {
        let db = Database::in_memory().unwrap();
        let err = db
            .export_observations(1, DateRange::all(), ExportFormat::Csv)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_write_empty_csv_has_header() {
        let mut buf = Vec::new();
        write_observations(&mut buf, &[], ExportFormat::Csv).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "date,value\n");
    }
}
