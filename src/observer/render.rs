//! Log rendering for observed requests.
//!
//! # Responsibilities
//! - Drain the observer queue on a single long-lived task
//! - Print one colorized summary line per request
//! - Optionally dump headers as an aligned block
//!
//! # Design Decisions
//! - Styling is a [`Palette`] passed at construction; no global style state
//! - Generic over the output writer so tests capture real output
//! - Render failures are contained here and reported via `tracing`; they
//!   never cross back into the serving path

use ansi_term::{Colour, Style};
use chrono::{SecondsFormat, Utc};
use std::io::{self, Write};
use tokio::sync::mpsc;

use super::record::RequestRecord;

/// Column width the method field is padded to in summary lines.
const METHOD_WIDTH: usize = 7;
/// Minimum label column width in header dumps.
const LABEL_MIN_WIDTH: usize = 8;
/// Indentation in front of every dumped header line.
const DUMP_INDENT: &str = "        ";

/// Styles used for log output, fixed at construction.
#[derive(Debug, Clone)]
pub struct Palette {
    pub method: Style,
    pub url: Style,
    pub header: Style,
    pub error: Style,
    pub banner: Style,
}

impl Palette {
    /// The default colorized palette.
    pub fn colored() -> Self {
        Self {
            method: Colour::Cyan.normal(),
            url: Style::new().fg(Colour::White).bold(),
            header: Colour::Yellow.normal(),
            error: Style::new().fg(Colour::Red).bold(),
            banner: Style::new().fg(Colour::Cyan).bold(),
        }
    }

    /// A style-free palette, for tests asserting on plain output.
    pub fn plain() -> Self {
        Self {
            method: Style::new(),
            url: Style::new(),
            header: Style::new(),
            error: Style::new(),
            banner: Style::new(),
        }
    }
}

/// The single consumer draining the observer queue.
pub struct Renderer<W> {
    rx: mpsc::Receiver<RequestRecord>,
    out: W,
    palette: Palette,
    dump_headers: bool,
}

impl Renderer<io::Stdout> {
    /// A renderer printing to stdout, as the server uses it.
    pub fn stdout(
        rx: mpsc::Receiver<RequestRecord>,
        palette: Palette,
        dump_headers: bool,
    ) -> Self {
        Self::new(rx, io::stdout(), palette, dump_headers)
    }
}

impl<W: Write> Renderer<W> {
    pub fn new(
        rx: mpsc::Receiver<RequestRecord>,
        out: W,
        palette: Palette,
        dump_headers: bool,
    ) -> Self {
        Self {
            rx,
            out,
            palette,
            dump_headers,
        }
    }

    /// Drain the queue until every sender is gone.
    ///
    /// In the server this never returns: the dispatcher holds a sender for
    /// the lifetime of the process. Running on a dedicated task also means
    /// a panic here cannot take the serving path down with it.
    pub async fn run(mut self) {
        while let Some(record) = self.rx.recv().await {
            if let Err(error) = self.render(&record) {
                tracing::warn!(%error, "failed to render request log entry");
            }
        }
    }

    fn render(&mut self, record: &RequestRecord) -> io::Result<()> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        writeln!(
            self.out,
            "{} {} - {} {}",
            self.palette
                .method
                .paint(format!("{:<width$}", record.method, width = METHOD_WIDTH)),
            timestamp,
            record.protocol,
            self.palette.url.paint(&record.uri),
        )?;

        if self.dump_headers {
            self.dump(record)?;
        }
        self.out.flush()
    }

    /// Print the header block, aligned over the whole block and followed by
    /// a blank separator line.
    fn dump(&mut self, record: &RequestRecord) -> io::Result<()> {
        let mut rows: Vec<(String, String)> = Vec::new();

        // An absolute request URI already carries the host inline.
        if !record.absolute_uri && !record.host.is_empty() {
            rows.push(("Host:".to_owned(), record.host.clone()));
        }
        if !record.transfer_encoding.is_empty() {
            rows.push((
                "Transfer-Encoding:".to_owned(),
                record.transfer_encoding.join(","),
            ));
        }
        if record.connection_close {
            rows.push(("Connection:".to_owned(), "close".to_owned()));
        }
        for (key, values) in &record.headers {
            rows.push((format!("{}:", canonical_key(key)), values.join(", ")));
        }

        // Label column width is computed over the whole block so the values
        // line up.
        let width = rows
            .iter()
            .map(|(label, _)| label.len() + 1)
            .max()
            .unwrap_or(0)
            .max(LABEL_MIN_WIDTH);

        for (label, value) in &rows {
            let padding = " ".repeat(width - label.len());
            writeln!(
                self.out,
                "{}{}{}{}",
                DUMP_INDENT,
                self.palette.header.paint(label),
                padding,
                value
            )?;
        }
        writeln!(self.out)
    }
}

/// Render a (lowercased on the wire) header name in canonical HTTP form,
/// e.g. `content-type` → `Content-Type`.
fn canonical_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = true;
    for c in key.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        upper = c == '-';
    }
    out
}
