use super::OutputWriter;
use crate::coverage::Coverage;
use crate::testrun::TestRun;
use std::io::Write;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_coverage(&mut self, coverage: &Coverage) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, coverage)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_tests(&mut self, run: &TestRun) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, run)?;
        writeln!(self.writer)?;
        Ok(())
    }
}
