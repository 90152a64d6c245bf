//! Human-readable report.

use std::io::{self, Write};

use bytesize::ByteSize;

use super::Report;

/// Renders a [`Report`] as plain text.
#[derive(Debug)]
pub struct TextOutput<'a> {
    report: &'a Report,
}

impl<'a> TextOutput<'a> {
    /// Wrap a report for text rendering.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Write the report to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let report = self.report;
        let summary = &report.summary;

        if let Some(items) = &report.items {
            for item in items {
                writeln!(writer, "{}", item.path)?;
                if let Some(size) = item.size {
                    writeln!(writer, "  size:       {} ({})", size, ByteSize::b(size))?;
                }
                if let Some(quick) = &item.quick_hash {
                    writeln!(writer, "  quick hash: {quick}")?;
                }
                if let Some(full) = &item.full_hash {
                    writeln!(writer, "  full hash:  {full}")?;
                }
            }
            if let Some(duplicates) = &report.duplicates {
                if !duplicates.is_empty() {
                    writeln!(writer)?;
                    writeln!(writer, "Duplicates:")?;
                    for path in duplicates {
                        writeln!(writer, "  {path}")?;
                    }
                }
            }
            writeln!(writer)?;
        }

        writeln!(writer, "Library:    {}", summary.directory.display())?;
        writeln!(
            writer,
            "Items:      {} ({})",
            summary.items,
            ByteSize::b(summary.total_size)
        )?;
        writeln!(
            writer,
            "Duplicates: {} ({})",
            summary.duplicates,
            ByteSize::b(summary.duplicate_size)
        )?;
        writeln!(writer, "Skipped:    {}", summary.skipped)?;
        if summary.corrupt_cache_lines > 0 {
            writeln!(writer, "Corrupt cache lines: {}", summary.corrupt_cache_lines)?;
        }
        writeln!(writer, "Renamed:    {}", summary.renamed)?;

        if let Some(import) = &report.import {
            writeln!(
                writer,
                "Imported:   {} copied, {} already in library, {} failed ({} found)",
                import.copied, import.already_placed, import.failed, import.discovered
            )?;
        }

        if !report.failures.is_empty() {
            writeln!(writer, "Failures:   {}", report.failures.len())?;
            for failure in &report.failures {
                writeln!(writer, "  {failure}")?;
            }
        }
        Ok(())
    }

    /// Render the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
