//! JSON-lines frame input.
//!
//! Each line holds one frame: `null` when no pose was detected, an object
//! keyed by landmark name, an index-ordered array of points, or an object
//! whose `landmarks` field holds one of those (extra fields such as a
//! timestamp are ignored).

use std::io::{BufRead, Lines};

use log::{trace, warn};
use serde::de::Error as _;
use serde_json::Value;

use super::{Landmark, LandmarkSnapshot};
use crate::error::{LimberError, Result};

pub fn parse_frame(line: &str) -> Result<Option<LandmarkSnapshot>> {
    let value: Value = serde_json::from_str(line)?;

    let points = match value {
        Value::Null => return Ok(None),
        Value::Object(mut map) if map.contains_key("landmarks") => {
            map.remove("landmarks").unwrap_or(Value::Null)
        }
        other => other,
    };

    let snapshot = match points {
        Value::Null => return Ok(None),
        Value::Array(_) => {
            let points: Vec<Landmark> = serde_json::from_value(points)?;
            LandmarkSnapshot::from_indexed(points)
        }
        Value::Object(_) => serde_json::from_value(points)?,
        other => {
            return Err(serde_json::Error::custom(format!(
                "expected landmark object or array, found {}",
                other
            ))
            .into());
        }
    };

    trace!("parse_frame read {} landmarks", snapshot.len());
    Ok(Some(snapshot))
}

/// Per-line frame handling shared by every reader of a JSON-lines stream.
///
/// Counts lines, skips blank ones with a warning and tags parse errors with
/// the 1-based line number.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    line_number: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line number of the last line decoded.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Decodes one raw line. Returns `None` for a blank line.
    pub fn decode_line(&mut self, line: &str) -> Option<Result<Option<LandmarkSnapshot>>> {
        self.line_number += 1;

        let line = line.trim();
        if line.is_empty() {
            warn!("Ignoring empty frame on line {}", self.line_number);
            return None;
        }

        let line_number = self.line_number;
        Some(parse_frame(line).map_err(|e| match e {
            LimberError::Json(e) => LimberError::FrameParse {
                line: line_number,
                message: e.to_string(),
            },
            other => other,
        }))
    }
}

/// Iterates over the frames of a JSON-lines stream.
pub struct FrameReader<R> {
    lines: Lines<R>,
    decoder: FrameDecoder,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            decoder: FrameDecoder::new(),
        }
    }

    /// Line number of the last line read.
    pub fn line_number(&self) -> usize {
        self.decoder.line_number()
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<Option<LandmarkSnapshot>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if let Some(frame) = self.decoder.decode_line(&line) {
                return Some(frame);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::BodyLandmark;
    use std::io::Cursor;

    #[test]
    fn null_frame_means_no_pose() {
        assert_eq!(parse_frame("null").unwrap(), None);
        assert_eq!(parse_frame(r#"{"timestamp": 12, "landmarks": null}"#).unwrap(), None);
    }

    #[test]
    fn named_frame() {
        let snapshot = parse_frame(
            r#"{"left_wrist": {"x": 0.3, "y": 0.2, "visibility": 0.9}, "nose": {"x": 0.5, "y": 0.1}}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(BodyLandmark::LeftWrist).unwrap().y, 0.2);
        assert_eq!(snapshot.get(BodyLandmark::Nose).unwrap().x, 0.5);
    }

    #[test]
    fn indexed_and_wrapped_frames() {
        let points: Vec<String> = (0..BodyLandmark::COUNT)
            .map(|i| format!(r#"{{"x": {}, "y": 0.5, "z": -0.1}}"#, i as f32 / 64.0))
            .collect();
        let array = format!("[{}]", points.join(","));

        let bare = parse_frame(&array).unwrap().unwrap();
        assert_eq!(bare.len(), BodyLandmark::COUNT);
        assert_eq!(bare.get(BodyLandmark::RightWrist).unwrap().x, 0.25);

        let wrapped = parse_frame(&format!(r#"{{"timestamp": 3, "landmarks": {}}}"#, array))
            .unwrap()
            .unwrap();
        assert_eq!(wrapped, bare);
    }

    #[test]
    fn unknown_landmark_is_rejected() {
        assert!(parse_frame(r#"{"left_antenna": {"x": 0.1, "y": 0.1}}"#).is_err());
        assert!(parse_frame("42").is_err());
        assert!(parse_frame("not json").is_err());
    }

    #[test]
    fn reader_skips_blank_lines_and_reports_line_numbers() {
        let input = "null\n\n{\"nose\": {\"x\": 0.2, \"y\": 0.5}}\n   \n{\"nose\": 1}\n";
        let mut reader = FrameReader::new(Cursor::new(input));

        assert_eq!(reader.next().unwrap().unwrap(), None);
        let frame = reader.next().unwrap().unwrap().unwrap();
        assert_eq!(frame.get(BodyLandmark::Nose).unwrap().x, 0.2);
        assert_eq!(reader.line_number(), 3);

        match reader.next().unwrap() {
            Err(LimberError::FrameParse { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected a parse error, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn decoder_counts_blank_lines() {
        let mut decoder = FrameDecoder::new();

        assert!(decoder.decode_line("  ").is_none());
        assert_eq!(decoder.decode_line("null").unwrap().unwrap(), None);
        match decoder.decode_line("[1, 2]").unwrap() {
            Err(LimberError::FrameParse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected a parse error, got {:?}", other),
        }
        assert_eq!(decoder.line_number(), 3);
    }
}
