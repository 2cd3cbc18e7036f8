use super::{classify_line, Event};
use crate::logging::{event_names, Stage};
use std::io::BufRead;
use tracing::trace;

/// Streams classified events out of a line-oriented reader.
///
/// Lines that are not valid UTF-8 or do not have the base shape are
/// counted and skipped.
pub struct LogReader<R> {
    inner: R,
    buf: Vec<u8>,
    lines_total: u64,
    lines_skipped: u64,
}

impl<R: BufRead> LogReader<R> {
    pub fn new(inner: R) -> Self {
        LogReader {
            inner,
            buf: Vec::with_capacity(256),
            lines_total: 0,
            lines_skipped: 0,
        }
    }

    pub fn lines_total(&self) -> u64 {
        self.lines_total
    }

    pub fn lines_skipped(&self) -> u64 {
        self.lines_skipped
    }
}

impl<R: BufRead> Iterator for LogReader<R> {
    type Item = std::io::Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
            self.lines_total += 1;

            let event = std::str::from_utf8(&self.buf).ok().and_then(classify_line);
            match event {
                Some(event) => return Some(Ok(event)),
                None => {
                    self.lines_skipped += 1;
                    trace!(
                        event = event_names::INGEST_LINE_SKIPPED,
                        stage = %Stage::Ingest,
                        line = self.lines_total,
                        "skipped unparseable line"
                    );
                }
            }
        }
    }
}
