use std::io::BufRead;

use crate::error::{AppError, AppResult, ValidationError};

use super::{Header, Target, Targets};

impl Targets {
    /// Reads target lines from `source`.
    ///
    /// Blank lines and `//` comments are skipped before parsing.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be read or a line is malformed.
    pub fn from_reader<R: BufRead>(source: R, body: &[u8], header: &Header) -> AppResult<Self> {
        let mut lines = Vec::new();
        for line in source.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            lines.push(trimmed.to_owned());
        }
        Self::from_lines(&lines, body, header)
    }

    /// Parses already filtered target lines.
    ///
    /// Every target starts from its own copy of `header` and `body`. Tokens
    /// between the method and the first token containing `http` are
    /// `key:value` headers; tokens that do not split into exactly two parts
    /// are ignored. A line that never reaches a URL token is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error when a line has fewer than two tokens.
    pub fn from_lines<S: AsRef<str>>(lines: &[S], body: &[u8], header: &Header) -> AppResult<Self> {
        let mut targets = Vec::with_capacity(lines.len());
        for line in lines {
            if let Some(target) = parse_line(line.as_ref(), body, header)? {
                targets.push(target);
            }
        }
        Ok(Self(targets))
    }
}

fn parse_line(line: &str, body: &[u8], base_header: &Header) -> AppResult<Option<Target>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [method, rest @ ..] = tokens.as_slice() else {
        return Err(invalid_format(line));
    };
    if rest.is_empty() {
        return Err(invalid_format(line));
    }

    let mut header = base_header.clone();
    let mut remaining = rest.iter();
    let mut url = None;
    for token in remaining.by_ref() {
        if token.contains("http") {
            url = Some(*token);
            break;
        }
        if let [key, value] = token.split(':').collect::<Vec<_>>().as_slice() {
            header.set(key, value);
        }
    }
    let file_spec = remaining.next().copied().unwrap_or_default();

    // Lines without a URL are skipped rather than rejected.
    let Some(url) = url.filter(|url| !url.is_empty()) else {
        tracing::debug!("Skipping target line without URL: `{}`", line);
        return Ok(None);
    };

    Ok(Some(Target {
        method: (*method).to_owned(),
        url: url.to_owned(),
        body: body.to_vec(),
        file_spec: file_spec.to_owned(),
        header,
    }))
}

fn invalid_format(line: &str) -> AppError {
    AppError::validation(ValidationError::InvalidTargetFormat {
        line: line.to_owned(),
    })
}
