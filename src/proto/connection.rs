use std::io::{
    BufRead,
    Write,
};

use log::*;

use super::{
    messages::ClientMessage,
    Error,
    ErrorCode,
};

/// A blocking, line oriented duplex stream to the server.
///
/// Reading is pull based: `recv_line` returns `Ok(None)` at the end of the
/// input and after `cancel` has been called.
pub struct Connection<R: BufRead, W: Write> {
    reader: R,
    writer: W,

    /// Prefix outbound lines with `OH: `/`OB: `.
    testing: bool,
    cancelled: bool,
    raw: Vec<u8>,
    buffer: String,
}

impl<R: BufRead, W: Write> Connection<R, W> {
    pub fn new(reader: R, writer: W, testing: bool) -> Self {
        Self {
            reader,
            writer,
            testing,
            cancelled: false,
            raw: Vec::new(),
            buffer: String::new(),
        }
    }

    /// Reads the next raw line, newline included. A line that is not valid
    /// UTF-8 is a protocol violation rather than a network failure.
    pub fn recv_line(&mut self) -> Result<Option<&str>, Error> {
        if self.cancelled {
            return Ok(None);
        }
        self.raw.clear();
        let size = self.reader.read_until(b'\n', &mut self.raw)?;
        if size == 0 {
            debug!("Reached the end of the input");
            return Ok(None);
        }
        self.buffer = String::from_utf8(std::mem::take(&mut self.raw)).map_err(|e| {
            Error::new(
                ErrorCode::ProtocolViolation,
                format!("Received a line that is not valid UTF-8: {}", e),
            )
        })?;
        trace!("Read line: {}", self.buffer.trim_end());
        Ok(Some(self.buffer.as_str()))
    }

    pub fn send(&mut self, message: &ClientMessage) -> Result<(), Error> {
        for line in message.to_lines(self.testing) {
            writeln!(self.writer, "{}", line)?;
        }
        self.writer.flush()?;
        debug!("Sent: {}", message);
        Ok(())
    }

    /// Stops consuming input. Used once the session hits a fatal error.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            warn!("Connection cancelled, no more input will be read");
        }
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}
