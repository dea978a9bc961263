use super::OutputWriter;
use crate::coverage::Coverage;
use crate::formatting::{Palette, FAIR_COVERAGE, GOOD_COVERAGE};
use crate::testrun::{Outcome, Test, TestRun};
use comfy_table::{presets, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::io::Write;

pub struct TerminalWriter<W: Write> {
    writer: W,
    palette: Palette,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, palette: Palette) -> Self {
        Self { writer, palette }
    }

    fn table(&self, header: Vec<&str>) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header);
        table
    }

    fn percent_cell(&self, pct: f64) -> Cell {
        let cell = Cell::new(format!("{:.1}%", pct)).set_alignment(CellAlignment::Right);
        if !self.palette.enabled() {
            return cell;
        }
        let color = if pct >= GOOD_COVERAGE {
            Color::Green
        } else if pct >= FAIR_COVERAGE {
            Color::Yellow
        } else {
            Color::Red
        };
        cell.fg(color)
    }
}

fn number_cell(n: u64) -> Cell {
    Cell::new(n).set_alignment(CellAlignment::Right)
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_coverage(&mut self, coverage: &Coverage) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {} ({}/{} statements)",
            self.palette.header("Coverage:"),
            self.palette.percent(coverage.percent),
            coverage.covered_stmts,
            coverage.stmts
        )?;

        let mut files = self.table(vec!["Package", "File", "Statements", "Covered", "Percent"]);
        let mut functions = self.table(vec!["File", "Line", "Function", "Percent", "Visibility"]);
        let mut function_rows = 0;

        for pkg in &coverage.packages {
            for file in &pkg.files {
                files.add_row(vec![
                    Cell::new(&pkg.name),
                    Cell::new(&file.name),
                    number_cell(file.stmts),
                    number_cell(file.covered_stmts),
                    self.percent_cell(file.percent),
                ]);
                for func in &file.functions {
                    functions.add_row(vec![
                        Cell::new(&func.file),
                        number_cell(u64::from(func.line)),
                        Cell::new(&func.name),
                        self.percent_cell(func.percent),
                        Cell::new(if func.internal { "internal" } else { "exported" }),
                    ]);
                    function_rows += 1;
                }
            }
        }

        writeln!(self.writer, "{}", files)?;
        if function_rows > 0 {
            writeln!(self.writer, "{}", functions)?;
        }
        Ok(())
    }

    fn write_tests(&mut self, run: &TestRun) -> anyhow::Result<()> {
        let counts = run.count();
        writeln!(
            self.writer,
            "{} {} passed, {} failed, {} skipped, {} unknown",
            self.palette.header("Tests:"),
            counts.passed,
            counts.failed,
            counts.skipped,
            counts.unknown
        )?;

        for pkg in &run.packages {
            writeln!(
                self.writer,
                "{}  {} ({:.2}s)",
                self.palette.outcome(pkg.outcome),
                pkg.name,
                pkg.elapsed
            )?;
            for test in &pkg.tests {
                self.write_test(test, 1)?;
            }
        }

        let failed = run.failed();
        if !failed.is_empty() {
            writeln!(self.writer, "\n{}", self.palette.header("Failures:"))?;
            for test in failed {
                writeln!(self.writer, "--- {} ({})", test.full_name, test.package)?;
                for line in &test.output {
                    writeln!(self.writer, "    {}", line)?;
                }
            }
        }
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_test(&mut self, test: &Test, depth: usize) -> anyhow::Result<()> {
        let elapsed = match test.outcome {
            Outcome::Unknown => String::new(),
            _ => format!(" ({:.2}s)", test.elapsed),
        };
        writeln!(
            self.writer,
            "{}{}  {}{}",
            "  ".repeat(depth),
            self.palette.outcome(test.outcome),
            test.name,
            elapsed
        )?;
        for sub in &test.subtests {
            self.write_test(sub, depth + 1)?;
        }
        Ok(())
    }
}
