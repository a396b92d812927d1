//! Destinations for the exported pose graph.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Receives the serialized graph once, at shutdown.
pub trait GraphSink {
    /// Write the serialized graph.
    fn write_graph(&mut self, serialized: &str) -> Result<()>;

    /// Sink name for logging.
    fn name(&self) -> &'static str;
}

/// Sink over any [`Write`] implementation (stdout, a buffer, a socket).
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<std::io::Stdout> {
    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> GraphSink for WriterSink<W> {
    fn write_graph(&mut self, serialized: &str) -> Result<()> {
        self.writer.write_all(serialized.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "writer"
    }
}

/// Sink writing the graph to a file, replacing any previous content.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphSink for FileSink {
    fn write_graph(&mut self, serialized: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serialized)?;
        log::info!(
            "Wrote pose graph to {} ({} bytes)",
            self.path.display(),
            serialized.len()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writer_sink_buffers_output() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_graph("graph G {\n}\n").unwrap();
        assert_eq!(sink.into_inner(), b"graph G {\n}\n");
    }

    #[test]
    fn test_file_sink_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("graph.dot");
        let mut sink = FileSink::new(&path);

        sink.write_graph("graph G {\n  0 [pose=\"0,0,0\"];\n}\n").unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("0 [pose"));
        assert_eq!(sink.name(), "file");
    }
}
