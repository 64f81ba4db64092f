//! Text rendering of records, counts and form errors.
//!
//! Every function writes to any [`Write`] so the shell and tests can capture
//! output.

use std::io::Write;

use crate::error::Result;
use crate::filter::ViewStats;
use crate::record::{AssignmentRecord, Field, RecordFields};
use crate::validation::ValidationErrors;

use super::OutputFormat;

/// Columns for the table: the summary, or every field.
#[must_use]
pub fn columns(show_details: bool) -> Vec<Field> {
    if show_details {
        Field::ALL.to_vec()
    } else {
        Field::SUMMARY.to_vec()
    }
}

/// Write records in the requested format.
///
/// # Errors
///
/// Returns an error if writing or JSON encoding fails.
pub fn write_records<W: Write>(
    out: &mut W,
    records: &[&AssignmentRecord],
    format: OutputFormat,
    show_details: bool,
) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(out, records, &columns(show_details)),
        OutputFormat::Plain => write_plain(out, records, &columns(show_details)),
        OutputFormat::Json => write_json(out, records),
    }
}

/// Write an aligned table with a header row.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W: Write>(
    out: &mut W,
    records: &[&AssignmentRecord],
    columns: &[Field],
) -> Result<()> {
    let ids: Vec<String> = records.iter().map(|r| r.id.to_string()).collect();
    let id_width = ids.iter().map(|id| id.len()).max().unwrap_or(0).max("ID".len());

    let widths: Vec<usize> = columns
        .iter()
        .map(|&field| {
            records
                .iter()
                .map(|r| r.display(field).chars().count())
                .max()
                .unwrap_or(0)
                .max(field.label().chars().count())
        })
        .collect();

    write!(out, "{:<id_width$}", "ID")?;
    for (field, &width) in columns.iter().zip(&widths) {
        write!(out, "  {:<width$}", field.label())?;
    }
    writeln!(out)?;

    let rule = id_width + widths.iter().map(|w| w + 2).sum::<usize>();
    writeln!(out, "{}", "-".repeat(rule))?;

    for (record, id) in records.iter().zip(&ids) {
        write!(out, "{id:<id_width$}")?;
        for (&field, &width) in columns.iter().zip(&widths) {
            write!(out, "  {:<width$}", record.display(field))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write one tab-separated line per record, id first, no header.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_plain<W: Write>(
    out: &mut W,
    records: &[&AssignmentRecord],
    columns: &[Field],
) -> Result<()> {
    for record in records {
        write!(out, "{}", record.id)?;
        for &field in columns {
            write!(out, "\t{}", record.display(field))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write records as a pretty JSON array.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_json<W: Write>(out: &mut W, records: &[&AssignmentRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, records)?;
    writeln!(out)?;
    Ok(())
}

/// Write every field of one record, labels aligned.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_record<W: Write>(out: &mut W, record: &AssignmentRecord) -> Result<()> {
    let width = label_width();
    writeln!(out, "{:>width$}: {}", "ID", record.id)?;
    for field in Field::ALL {
        writeln!(out, "{:>width$}: {}", field.label(), record.display(field))?;
    }
    for (key, value) in record.extra() {
        writeln!(out, "{key:>width$}: {value}")?;
    }
    Ok(())
}

/// Write the form being edited. Required fields are starred and rejected
/// fields carry their message.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_form<W: Write>(
    out: &mut W,
    title: &str,
    draft: &RecordFields,
    errors: Option<&ValidationErrors>,
) -> Result<()> {
    let width = label_width() + 1;
    writeln!(out, "{title}")?;
    for field in Field::ALL {
        let label = if field.is_required() {
            format!("{}*", field.label())
        } else {
            field.label().to_string()
        };
        let value = draft.get(field).unwrap_or_default();
        write!(out, "{label:>width$}: {value}")?;
        if let Some(message) = errors.and_then(|e| e.get(field)) {
            write!(out, "   <- {message}")?;
        }
        writeln!(out, "   [{}]", field.key())?;
    }
    Ok(())
}

/// Write the per-field messages of a rejected save.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_field_errors<W: Write>(out: &mut W, errors: &ValidationErrors) -> Result<()> {
    for (field, message) in errors.iter() {
        writeln!(out, "  {}: {message}", field.key())?;
    }
    Ok(())
}

/// Write total and filtered counts.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_stats<W: Write>(out: &mut W, stats: ViewStats) -> Result<()> {
    writeln!(out, "Total de registros: {}", stats.total)?;
    writeln!(out, "Registros filtrados: {}", stats.filtered)?;
    Ok(())
}

/// Write the counts followed by the table, or the empty-view message.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_view<W: Write>(
    out: &mut W,
    stats: ViewStats,
    records: &[&AssignmentRecord],
    show_details: bool,
) -> Result<()> {
    write_stats(out, stats)?;
    writeln!(out)?;
    match stats.empty_message() {
        Some(message) => writeln!(out, "{message}")?,
        None => write_table(out, records, &columns(show_details))?,
    }
    Ok(())
}

fn label_width() -> usize {
    Field::ALL
        .iter()
        .map(|f| f.label().chars().count())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NOT_AVAILABLE;

    fn record(id: u64, usuario: &str, sede: &str) -> AssignmentRecord {
        AssignmentRecord::from_fields(
            id,
            &RecordFields::new()
                .with(Field::Usuario, usuario)
                .with(Field::Sede, sede),
        )
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let a = record(1, "jdoe", "Cota");
        let b = record(12, "asmith", "Cali");
        let text = render(|out| write_table(out, &[&a, &b], &columns(false)));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[0].contains(Field::Usuario.label()));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].starts_with("1 "));
        assert!(lines[2].contains("jdoe"));
        assert!(lines[3].starts_with("12"));
    }

    #[test]
    fn test_table_shows_sentinel_for_blanks() {
        let a = record(1, "jdoe", "");
        let text = render(|out| write_table(out, &[&a], &[Field::Sede]));
        assert!(text.contains(NOT_AVAILABLE));
    }

    #[test]
    fn test_table_columns_are_aligned() {
        let a = record(1, "ñandú", "Cota");
        let b = record(2, "x", "Cali");
        let text = render(|out| write_table(out, &[&a, &b], &[Field::Usuario, Field::Sede]));

        let lines: Vec<&str> = text.lines().collect();
        let sede_col = |line: &str| line.chars().position(|c| c == 'C').unwrap();
        assert_eq!(sede_col(lines[2]), sede_col(lines[3]));
    }

    #[test]
    fn test_plain_output() {
        let a = record(3, "jdoe", "Cota");
        let text = render(|out| write_plain(out, &[&a], &[Field::Usuario, Field::Sede]));
        assert_eq!(text, "3\tjdoe\tCota\n");
    }

    #[test]
    fn test_json_output() {
        let a = record(3, "jdoe", "Cota");
        let text = render(|out| write_json(out, &[&a]));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["id"], 3);
        assert_eq!(value[0]["usuario"], "jdoe");
    }

    #[test]
    fn test_record_detail_lists_every_field() {
        let a = record(5, "jdoe", "Cota");
        let text = render(|out| write_record(out, &a));
        assert_eq!(text.lines().count(), 1 + Field::ALL.len());
        assert!(text.contains("jdoe"));
    }

    #[test]
    fn test_form_marks_required_and_errors() {
        let mut errors = ValidationErrors::default();
        errors.insert(Field::Usuario, "El usuario es requerido");
        let draft = RecordFields::new().with(Field::Sede, "Cota");

        let text = render(|out| write_form(out, "Nueva asignación", &draft, Some(&errors)));
        assert!(text.starts_with("Nueva asignación"));
        assert!(text.contains(&format!("{}*", Field::Usuario.label())));
        assert!(text.contains("<- El usuario es requerido"));
        assert!(text.contains("[sede]"));
    }

    #[test]
    fn test_view_empty_messages() {
        let text = render(|out| write_view(out, ViewStats::default(), &[], false));
        assert!(text.contains("No hay datos para mostrar"));

        let stats = ViewStats { total: 2, filtered: 0 };
        let text = render(|out| write_view(out, stats, &[], false));
        assert!(text.contains("Total de registros: 2"));
        assert!(text.contains("No se encontraron registros con los filtros aplicados"));
    }

    #[test]
    fn test_columns() {
        assert_eq!(columns(false).len(), Field::SUMMARY.len());
        assert_eq!(columns(true).len(), Field::ALL.len());
    }
}
