use crate::log::{write_record, Direction, Header, HeaderLog};
use std::io::{self, BufWriter, Write};
use tracing::warn;

/// Writes header records to any `Write`, buffered.
pub struct TextLog<W: Write> {
    log_writer: BufWriter<W>,
}

impl<W: Write> TextLog<W> {
    pub fn new(writer: W) -> TextLog<W> {
        TextLog {
            log_writer: BufWriter::new(writer),
        }
    }

    pub fn record(&mut self, header: Header<'_>, direction: Direction) -> io::Result<()> {
        write_record(&mut self.log_writer, header, direction)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.log_writer.flush()
    }

    /// The underlying writer. Records still sitting in the buffer are not visible here until
    /// `flush` is called.
    pub fn get_ref(&self) -> &W {
        self.log_writer.get_ref()
    }
}

/// BufWriter swallows errors when it flushes on drop, so flush here and say so if it fails.
impl<W: Write> Drop for TextLog<W> {
    fn drop(&mut self) {
        if let Err(err) = self.log_writer.flush() {
            warn!("failed to flush header log: {}", err);
        }
    }
}

impl<W: Write> HeaderLog for TextLog<W> {
    fn log(&mut self, header: Header<'_>, direction: Direction) {
        if let Err(err) = self.record(header, direction) {
            warn!("failed to write {:?} header record: {}", header.kind(), err);
        }
    }
}
