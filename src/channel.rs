//! Response channels — the caller-facing side of the pipeline.
//!
//! A channel does two things: it stages ordinary process output (so the
//! shutdown hook can discard partial output that would otherwise precede a
//! failure response) and it presents the failure body for its context:
//! terminal highlighting for an attended CLI, or a minimal `500` response
//! head for a request-serving host.

use std::io::{self, Write};

use console::Style;

use crate::errors::{Result, TrapError};

/// Response head written by [`HttpChannel`] when the host has not yet sent
/// headers of its own.
const RESPONSE_HEAD: &str = "HTTP/1.0 500 Unknown Error\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
Cache-Control: private, no-cache, no-store, must-revalidate\r\n\
Pragma: no-cache\r\n\
Expires: Sat, 01 Jan 2000 00:00:00 GMT\r\n\
\r\n";

/// Output channel a failure response is written to.
pub trait ResponseChannel: Send {
    /// Drop output staged through the channel but not yet flushed to the
    /// underlying stream. The shutdown hook calls this before handling a
    /// fatal condition so partial prior output never precedes the response.
    fn discard_buffered(&mut self);

    /// Present and write `body`, then flush the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns [`TrapError::Channel`] when the underlying stream rejects the
    /// write; the caller treats this as best-effort.
    fn send_failure(&mut self, body: &str) -> Result<()>;
}

/// Channel for command-line contexts.
///
/// When an interactive terminal is attached the body is wrapped in the
/// failure highlight (red background, bold bright-white foreground) and
/// newline-terminated; otherwise the bare body is written.
pub struct TerminalChannel<W: Write + Send> {
    out: W,
    staged: Vec<u8>,
    styled: bool,
}

impl TerminalChannel<io::Stdout> {
    /// Channel over the process's standard output, styled only when an
    /// interactive terminal is attached.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout(), console::user_attended())
    }
}

impl<W: Write + Send> TerminalChannel<W> {
    /// Channel over an arbitrary stream with styling forced on or off.
    #[must_use]
    pub fn new(out: W, styled: bool) -> Self {
        Self {
            out,
            staged: Vec::new(),
            styled,
        }
    }
}

impl<W: Write + Send> Write for TerminalChannel<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.staged.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.write_all(&self.staged)?;
        self.staged.clear();
        self.out.flush()
    }
}

impl<W: Write + Send> ResponseChannel for TerminalChannel<W> {
    fn discard_buffered(&mut self) {
        self.staged.clear();
    }

    fn send_failure(&mut self, body: &str) -> Result<()> {
        let payload = if self.styled {
            let highlight = Style::new()
                .force_styling(true)
                .on_red()
                .bold()
                .bright()
                .white();
            format!("{}\n", highlight.apply_to(format!(" {body} ")))
        } else {
            body.to_owned()
        };
        self.out
            .write_all(payload.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|err| TrapError::Channel(format!("terminal write failed: {err}")))
    }
}

/// Channel for request-serving contexts.
///
/// Writes the fixed `500` response head before the body unless the host
/// already sent headers, in which case the body alone is appended to
/// whatever response is in flight.
pub struct HttpChannel<W: Write + Send> {
    out: W,
    staged: Vec<u8>,
    headers_sent: bool,
}

impl<W: Write + Send> HttpChannel<W> {
    /// Channel over the connection stream. `headers_sent` reflects whether
    /// other code already produced a response head on this connection.
    #[must_use]
    pub fn new(out: W, headers_sent: bool) -> Self {
        Self {
            out,
            staged: Vec::new(),
            headers_sent,
        }
    }
}

impl<W: Write + Send> Write for HttpChannel<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.staged.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.write_all(&self.staged)?;
        self.staged.clear();
        self.out.flush()
    }
}

impl<W: Write + Send> ResponseChannel for HttpChannel<W> {
    fn discard_buffered(&mut self) {
        self.staged.clear();
    }

    fn send_failure(&mut self, body: &str) -> Result<()> {
        let channel_err = |err: io::Error| TrapError::Channel(format!("response write failed: {err}"));
        if !self.headers_sent {
            self.out.write_all(RESPONSE_HEAD.as_bytes()).map_err(channel_err)?;
            self.headers_sent = true;
        }
        self.out.write_all(body.as_bytes()).map_err(channel_err)?;
        self.out.flush().map_err(channel_err)
    }
}
