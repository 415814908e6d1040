//! Stdio message framing.
//!
//! A client may send bare JSON lines or LSP-style `Content-Length` frames;
//! each response goes back in the framing its request used.

use std::io::{self, BufRead, Read, Write};

use serde::Serialize;

/// Largest frame body accepted from a client.
pub const MAX_FRAME_BYTES: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Line,
    ContentLength,
}

/// One unit read off the wire.
#[derive(Debug, PartialEq, Eq)]
pub enum Incoming {
    Payload { body: Vec<u8>, frame: Frame },
    /// The framing itself was unusable; the reader is positioned after it.
    Malformed { reason: String, frame: Frame },
}

/// Reads the next message, skipping blank lines. `None` at end of input.
pub fn read_frame<R: BufRead>(reader: &mut R) -> io::Result<Option<Incoming>> {
    let mut line = String::new();
    let first = loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            break trimmed.to_string();
        }
    };

    if !is_header(&first) {
        return Ok(Some(Incoming::Payload {
            body: first.into_bytes(),
            frame: Frame::Line,
        }));
    }

    let declared = match read_headers(reader, &first)? {
        Some(len) => len,
        None => {
            return Ok(Some(Incoming::Malformed {
                reason: "missing content-length header".to_string(),
                frame: Frame::Line,
            }))
        }
    };

    let limit = u64::try_from(declared).unwrap_or(u64::MAX);
    if declared > MAX_FRAME_BYTES {
        io::copy(&mut reader.by_ref().take(limit), &mut io::sink())?;
        return Ok(Some(Incoming::Malformed {
            reason: format!("frame of {declared} bytes exceeds {MAX_FRAME_BYTES}"),
            frame: Frame::ContentLength,
        }));
    }

    let mut body = Vec::with_capacity(declared);
    reader.by_ref().take(limit).read_to_end(&mut body)?;
    if body.len() < declared {
        return Ok(Some(Incoming::Malformed {
            reason: format!("frame truncated at {} of {declared} bytes", body.len()),
            frame: Frame::ContentLength,
        }));
    }
    Ok(Some(Incoming::Payload {
        body,
        frame: Frame::ContentLength,
    }))
}

/// Consumes header lines up to the blank separator and returns the last
/// `Content-Length` seen. End of input inside the headers counts as missing.
fn read_headers<R: BufRead>(reader: &mut R, first: &str) -> io::Result<Option<usize>> {
    let mut length = content_length(first);
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let header = line.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            return Ok(length);
        }
        length = content_length(header).or(length);
    }
}

fn is_header(line: &str) -> bool {
    line.split_once(':').is_some_and(|(name, _)| {
        let name = name.trim();
        name.eq_ignore_ascii_case("content-length") || name.eq_ignore_ascii_case("content-type")
    })
}

fn content_length(line: &str) -> Option<usize> {
    let (name, value) = line.split_once(':')?;
    if name.trim().eq_ignore_ascii_case("content-length") {
        value.trim().parse().ok()
    } else {
        None
    }
}

pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, message: &T, frame: Frame) -> io::Result<()> {
    let body = serde_json::to_vec(message)?;
    match frame {
        Frame::Line => {
            writer.write_all(&body)?;
            writer.write_all(b"\n")?;
        }
        Frame::ContentLength => {
            write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
            writer.write_all(&body)?;
        }
    }
    writer.flush()
}
