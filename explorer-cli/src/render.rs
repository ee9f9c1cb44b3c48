//! Plain-text rendering of an explorer.

use std::io;
use std::io::Write;

use explorer_lib::Explorer;
use explorer_lib::model::Record;

/// Writes the rendered rows as tab-separated lines under a header of labels.
pub fn write_rows<R: Record>(
    out: &mut impl Write,
    explorer: &Explorer<R>,
) -> Result<(), Box<dyn std::error::Error>> {
    let columns = explorer.visible_columns();
    let header: Vec<_> = columns.iter().map(|f| f.label()).collect();
    writeln!(out, "{}", header.join("\t"))?;

    for record in explorer.rows()? {
        let cells: Vec<_> = columns.iter().map(|f| f.value(record).display()).collect();
        writeln!(out, "{}", cells.join("\t"))?;
    }
    Ok(())
}

/// Writes per-option counts for every facet the toolbar offers.
pub fn write_counts<R: Record>(
    out: &mut impl Write,
    explorer: &Explorer<R>,
) -> Result<(), Box<dyn std::error::Error>> {
    for facet in explorer.visible_facets() {
        let counts = explorer.facet_counts(facet.key())?;
        let parts: Vec<_> = counts
            .iter()
            .map(|c| {
                let mark = if c.selected { "*" } else { "" };
                format!("{}{} ({})", mark, c.label, c.count)
            })
            .collect();
        writeln!(out, "{}: {}", facet.label(), parts.join(", "))?;
    }
    Ok(())
}

/// Writes the detail panel, every field of the selected record.
pub fn write_panel<R: Record>(out: &mut impl Write, explorer: &Explorer<R>) -> io::Result<()> {
    let Some(record) = explorer.selection().record() else {
        return Ok(());
    };
    writeln!(out, "[{}]", record.id())?;
    for field in explorer.registry().iter() {
        writeln!(out, "  {}: {}", field.label(), field.value(record))?;
    }
    Ok(())
}
