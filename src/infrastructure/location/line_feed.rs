//! Position feed read line by line from a file or stdin

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

use crate::application::ports::PositionSource;
use crate::domain::geo::Position;

/// Reads one reading per line.
///
/// Accepts `lat,lon` or a JSON object with `latitude`, `longitude` and an
/// optional RFC 3339 `timestamp`. Blank lines and `#` comments are ignored;
/// malformed lines are logged and skipped.
pub struct LinePositionFeed<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: AsyncBufRead + Unpin + Send> LinePositionFeed<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

/// Parse a single feed line. `None` for lines that carry no reading.
pub fn parse_reading(line: &str) -> Option<Result<Position, String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let parsed = if line.starts_with('{') {
        serde_json::from_str::<Position>(line).map_err(|e| e.to_string())
    } else {
        line.parse::<Position>().map_err(|e| e.to_string())
    };

    Some(parsed.and_then(|position| {
        if position.is_valid() {
            Ok(position)
        } else {
            Err(format!("coordinates out of range: {}", position))
        }
    }))
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> PositionSource for LinePositionFeed<R> {
    async fn next_position(&mut self) -> Option<Position> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    warn!(error = %e, "Position feed read failed");
                    return None;
                }
            };
            self.line_number += 1;

            match parse_reading(&line) {
                Some(Ok(position)) => return Some(position),
                Some(Err(reason)) => {
                    warn!(line = self.line_number, %reason, "Skipping malformed position");
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn reads_both_formats_and_skips_noise() {
        let input = "# walk\n37.7749,-122.4194\n\nnot a position\n{\"latitude\": 37.78, \"longitude\": -122.41}\n91,0\n";
        let mut feed = LinePositionFeed::new(BufReader::new(input.as_bytes()));

        let first = feed.next_position().await.unwrap();
        assert_eq!(first.coordinates(), (37.7749, -122.4194));

        let second = feed.next_position().await.unwrap();
        assert_eq!(second.coordinates(), (37.78, -122.41));

        assert!(feed.next_position().await.is_none());
    }

    #[test]
    fn parse_reading_with_timestamp() {
        let reading =
            parse_reading(r#"{"latitude":1.5,"longitude":2.5,"timestamp":"2024-05-01T12:00:00Z"}"#)
                .unwrap()
                .unwrap();
        assert_eq!(reading.timestamp.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn parse_reading_ignores_comments() {
        assert!(parse_reading("  # note").is_none());
        assert!(parse_reading("").is_none());
        assert!(parse_reading("abc").unwrap().is_err());
    }
}
