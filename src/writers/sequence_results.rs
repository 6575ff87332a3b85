use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::data_types::sequence_result::SequenceResult;
use crate::writers::eval_synchronizer::ResultSink;

/// Streams per-sequence results as JSON lines, one sequence per line.
/// The output is gzip compressed if the filename ends with ".gz".
pub struct SequenceResultWriter {
    /// The output path, for messages
    filename: PathBuf,
    /// The open handle
    writer: BufWriter<Box<dyn Write + Send>>
}

impl SequenceResultWriter {
    /// Creates the output file
    /// # Arguments
    /// * `filename` - the output path
    /// # Errors
    /// * if the file cannot be created
    pub fn new(filename: &Path) -> anyhow::Result<Self> {
        let file = File::create(filename)
            .with_context(|| format!("Error while creating {filename:?}:"))?;
        let handle: Box<dyn Write + Send> = if filename.extension().unwrap_or_default() == "gz" {
            Box::new(flate2::write::GzEncoder::new(file, flate2::Compression::best()))
        } else {
            Box::new(file)
        };
        Ok(Self {
            filename: filename.to_path_buf(),
            writer: BufWriter::new(handle)
        })
    }
}

impl ResultSink for SequenceResultWriter {
    fn write_result(&mut self, result: &SequenceResult) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, result)
            .with_context(|| format!("Error while serializing {} to {:?}:", result.name, self.filename))?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.writer.flush()
            .with_context(|| format!("Error while flushing output to {:?}:", self.filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_json_lines() {
        let filename = std::env::temp_dir().join(format!("haplosync_results_{}.jsonl.gz", std::process::id()));
        let mut writer = SequenceResultWriter::new(&filename).unwrap();
        writer.write_result(&SequenceResult::new("chr1".to_string())).unwrap();
        writer.write_result(&SequenceResult::new("chr2".to_string())).unwrap();
        writer.finish().unwrap();
        drop(writer);

        let mut text = String::new();
        flate2::read::MultiGzDecoder::new(File::open(&filename).unwrap())
            .read_to_string(&mut text).unwrap();
        std::fs::remove_file(&filename).unwrap();

        let lines: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["name"], "chr2");
        assert_eq!(lines[0]["phasing"]["misphasings"], 0);
    }
}
