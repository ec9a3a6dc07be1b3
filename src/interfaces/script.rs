//! JSON-lines request scripts.
//!
//! Each non-blank line holds one request,
//! `{"method": "POST", "path": "/api/v1/banks", "headers": {..}, "body": {..}}`.
//! Lines starting with `#` are comments. Responses are written back one JSON
//! object per line.

use crate::error::{PayStreamError, Result};
use crate::interfaces::api::{ApiRequest, ApiResponse};
use std::io::{BufRead, Write};

/// Reads requests from a JSON-lines source.
pub struct RequestReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> RequestReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Lazily parses one request per line. A malformed line yields an error
    /// and the iterator moves on to the next one.
    pub fn requests(self) -> impl Iterator<Item = Result<ApiRequest>> {
        self.source
            .lines()
            .filter_map(|line| -> Option<Result<ApiRequest>> {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => return Some(Err(PayStreamError::from(e))),
                };
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    return None;
                }
                Some(serde_json::from_str(trimmed).map_err(PayStreamError::from))
            })
    }
}

/// Writes responses as JSON lines.
pub struct ResponseWriter<W: Write> {
    sink: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_response(&mut self, response: &ApiResponse) -> Result<()> {
        serde_json::to_writer(&mut self.sink, response)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::api::Method;
    use serde_json::json;

    #[test]
    fn test_reader_skips_comments_and_blanks() {
        let script = "# setup\n\n{\"method\":\"GET\",\"path\":\"/health\"}\n  # trailing\n";
        let requests: Vec<_> = RequestReader::new(script.as_bytes()).requests().collect();

        assert_eq!(requests.len(), 1);
        let request = requests[0].as_ref().unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/health");
    }

    #[test]
    fn test_reader_reports_malformed_line_and_continues() {
        let script = "{not json}\n{\"method\":\"PATCH\",\"path\":\"/x\"}\n{\"method\":\"GET\",\"path\":\"/health\"}";
        let requests: Vec<_> = RequestReader::new(script.as_bytes()).requests().collect();

        assert_eq!(requests.len(), 3);
        assert!(matches!(requests[0], Err(PayStreamError::JsonError(_))));
        assert!(requests[1].is_err());
        assert!(requests[2].is_ok());
    }

    #[test]
    fn test_writer_one_line_per_response() {
        let mut out = Vec::new();
        {
            let mut writer = ResponseWriter::new(&mut out);
            writer
                .write_response(&ApiResponse::created(
                    "http://h/api/v1/banks/1".to_string(),
                    json!({"bank": {"id": 1}}),
                ))
                .unwrap();
            writer.write_response(&ApiResponse::no_content()).unwrap();
            writer.flush().unwrap();
        }

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(lines[0]).unwrap(),
            json!({"status": 201, "location": "http://h/api/v1/banks/1", "body": {"bank": {"id": 1}}})
        );
        assert_eq!(lines[1], r#"{"status":204,"body":null}"#);
    }
}
