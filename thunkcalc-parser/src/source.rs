// Thunkcalc Line Sources
// Where input lines come from: readers, in-memory text, or several sources in a row

use std::collections::VecDeque;
use std::io::{self, BufRead, Cursor};

/// A producer of successive raw input lines
pub trait LineSource {
    /// The next line without its terminator, or `None` at end of input
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line()
    }
}

/// Lines read from any buffered reader (stdin, files, byte buffers)
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl ReaderSource<Cursor<Vec<u8>>> {
    pub fn from_text(text: &str) -> Self {
        Self::new(Cursor::new(text.as_bytes().to_vec()))
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    /// Bytes that are not UTF-8 come through as U+FFFD, which lexes as an
    /// unknown character instead of ending the input.
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

/// Several sources read one after the other, as if concatenated
#[derive(Default)]
pub struct ChainedSource {
    sources: VecDeque<Box<dyn LineSource + Send>>,
}

impl ChainedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: impl LineSource + Send + 'static) {
        self.sources.push_back(Box::new(source));
    }
}

impl LineSource for ChainedSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        while let Some(source) = self.sources.front_mut() {
            if let Some(line) = source.next_line()? {
                return Ok(Some(line));
            }
            self.sources.pop_front();
        }
        Ok(None)
    }
}
