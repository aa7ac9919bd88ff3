//! Wire format for streamed sprite shapes.
//!
//! A record is a positional JSON array:
//!
//! ```text
//! [id, imageId, [x, y, width, height], isFixedScale, columns, rows, frame, color]
//! ```
//!
//! `width` and `height` may be the string `"-1"`, meaning "the natural size of
//! the image once resolved". Any other bounds entry, number or numeric string,
//! is a literal. `color` is a packed `0xRRGGBBAA` integer; negative values from
//! signed 32-bit producers are reinterpreted as their unsigned bit pattern.
//! `columns`, `rows` and `frame` accept any JSON number: fractions are
//! truncated and negative values become `0`.

use crate::id::ShapeId;
use common::color::Color;
use common::error::{SceneError, SceneResult};
use common::geometry::{Point, Rect, Size};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::io::BufRead;
use tracing::warn;

/// Bounds entry that stands for the resolved image's natural size.
pub const NATURAL_SIZE_SENTINEL: &str = "-1";

/// Width or height carried by a record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Extent {
    /// A literal size.
    Fixed(f32),
    /// Use the resolved image's size along this axis.
    Natural,
}

impl Extent {
    #[inline]
    pub fn resolve(&self, natural: f32) -> f32 {
        match self {
            Extent::Fixed(value) => *value,
            Extent::Natural => natural,
        }
    }
}

/// Persistent fields of a sprite shape as streamed between processes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord", into = "RawRecord")]
pub struct ShapeRecord {
    pub id: ShapeId,
    pub image_id: String,
    pub origin: Point,
    pub width: Extent,
    pub height: Extent,
    pub fixed_scale: bool,
    pub columns: u32,
    pub rows: u32,
    pub frame: u32,
    pub color: Color,
}

impl ShapeRecord {
    /// Bounds with sentinels replaced by the natural image size.
    pub fn bounds(&self, natural: Size) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.width.resolve(natural.width),
            self.height.resolve(natural.height),
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn literal(&self) -> f32 {
        match self {
            RawNumber::Number(value) => *value as f32,
            RawNumber::Text(text) => text.trim().parse::<f32>().unwrap_or_else(|_| {
                warn!("[ShapeRecord] non-numeric bounds entry {:?}, using 0", text);
                0.0
            }),
        }
    }

    fn extent(&self) -> Extent {
        match self {
            RawNumber::Text(text) if text == NATURAL_SIZE_SENTINEL => Extent::Natural,
            other => Extent::Fixed(other.literal()),
        }
    }
}

impl From<Extent> for RawNumber {
    fn from(extent: Extent) -> Self {
        match extent {
            Extent::Fixed(value) => RawNumber::Number(value as f64),
            Extent::Natural => RawNumber::Text(NATURAL_SIZE_SENTINEL.to_string()),
        }
    }
}

/// Grid count or frame index, written as an integer.
#[derive(Clone, Copy, Debug)]
struct Count(u32);

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if value < 0.0 {
            warn!("[ShapeRecord] negative count {}, using 0", value);
        }
        // Float to int casts truncate and saturate
        Ok(Count(value as u32))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawRecord(u64, String, [RawNumber; 4], bool, Count, Count, Count, i64);

impl From<RawRecord> for ShapeRecord {
    fn from(raw: RawRecord) -> Self {
        let RawRecord(id, image_id, [x, y, width, height], fixed_scale, columns, rows, frame, color) = raw;

        Self {
            id: ShapeId(id),
            image_id,
            origin: Point::new(x.literal(), y.literal()),
            width: width.extent(),
            height: height.extent(),
            fixed_scale,
            columns: columns.0,
            rows: rows.0,
            frame: frame.0,
            color: Color::from_u32(color as u32),
        }
    }
}

impl From<ShapeRecord> for RawRecord {
    fn from(record: ShapeRecord) -> Self {
        RawRecord(
            record.id.0,
            record.image_id,
            [
                RawNumber::Number(record.origin.x as f64),
                RawNumber::Number(record.origin.y as f64),
                record.width.into(),
                record.height.into(),
            ],
            record.fixed_scale,
            Count(record.columns),
            Count(record.rows),
            Count(record.frame),
            record.color.to_u32() as i64,
        )
    }
}

/// Encode one record.
pub fn encode_record(record: &ShapeRecord) -> SceneResult<String> {
    Ok(serde_json::to_string(record)?)
}

/// Decode one record.
pub fn decode_record(text: &str) -> SceneResult<ShapeRecord> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a batch of records as a single JSON array.
pub fn encode_batch(records: &[ShapeRecord]) -> SceneResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Decode a JSON array of records.
pub fn decode_batch(text: &str) -> SceneResult<Vec<ShapeRecord>> {
    Ok(serde_json::from_str(text)?)
}

/// Newline-delimited stream of record batches.
///
/// Each non-blank line holds one batch, i.e. one JSON array of records.
pub struct RecordStream<R> {
    reader: R,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> RecordStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for RecordStream<R> {
    type Item = SceneResult<Vec<ShapeRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => self.line_number += 1,
                Err(err) => return Some(Err(err.into())),
            }

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            return Some(
                decode_batch(line).map_err(|err| SceneError::codec(format!("line {}: {}", self.line_number, err))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_decode_with_sentinels() {
        let record = decode_record(r#"[7, "hero", [3, 4, "-1", "-1"], false, 4, 2, 5, 0]"#).unwrap();

        assert_eq!(record.id, ShapeId(7));
        assert_eq!(record.image_id, "hero");
        assert_eq!(record.origin, Point::new(3.0, 4.0));
        assert_eq!(record.width, Extent::Natural);
        assert_eq!(record.height, Extent::Natural);
        assert_eq!((record.columns, record.rows, record.frame), (4, 2, 5));
        assert!(record.color.is_transparent());
        assert_eq!(record.bounds(Size::new(64.0, 32.0)), Rect::new(3.0, 4.0, 64.0, 32.0));
    }

    #[test]
    fn test_numeric_strings_are_literals() {
        let record = decode_record(r#"[1, "a", ["2", 0, "48", -1], true, 1, 1, 0, 255]"#).unwrap();

        assert_eq!(record.origin.x, 2.0);
        assert_eq!(record.width, Extent::Fixed(48.0));
        // Only the string form is the sentinel
        assert_eq!(record.height, Extent::Fixed(-1.0));
        assert_eq!(record.color, Color::rgba(0, 0, 0, 255));
    }

    #[test]
    fn test_malformed_bounds_text_decodes_to_zero() {
        let record = decode_record(r#"[1, "a", [0, 0, "wide", 10], true, 1, 1, 0, 0]"#).unwrap();
        assert_eq!(record.width, Extent::Fixed(0.0));
    }

    #[test]
    fn test_counts_accept_any_number() {
        let record = decode_record(r#"[1, "a", [0, 0, 1, 1], false, 4.0, 2.9, -3, 0]"#).unwrap();
        assert_eq!((record.columns, record.rows, record.frame), (4, 2, 0));

        let batch = decode_batch(r#"[[1, "a", [0, 0, 1, 1], false, 1, 1, 0.5, 0], [2, "b", [0, 0, 1, 1], false, 1, 1, 7, 0]]"#)
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].frame, 0);
        assert_eq!(batch[1].frame, 7);
    }

    #[test]
    fn test_signed_color() {
        // 0xff0000ff written by a signed 32-bit producer
        let record = decode_record(r#"[1, "a", [0, 0, 1, 1], false, 1, 1, 0, -16776961]"#).unwrap();
        assert_eq!(record.color, Color::rgba(255, 0, 0, 255));
    }

    #[test]
    fn test_encode_is_positional() {
        let record = ShapeRecord {
            id: ShapeId(2),
            image_id: "coin".to_string(),
            origin: Point::new(1.0, 2.0),
            width: Extent::Natural,
            height: Extent::Fixed(8.0),
            fixed_scale: true,
            columns: 6,
            rows: 1,
            frame: 3,
            color: Color::rgba(0, 0, 255, 255),
        };

        let text = encode_record(&record).unwrap();
        assert_eq!(text, r#"[2,"coin",[1.0,2.0,"-1",8.0],true,6,1,3,65535]"#);
        assert_eq!(decode_record(&text).unwrap(), record);
    }

    #[test]
    fn test_wrong_arity_is_an_error() {
        let err = decode_record(r#"[1, "a", [0, 0, 1, 1], false]"#).unwrap_err();
        assert!(matches!(err, SceneError::Json(_)));
    }

    #[test]
    fn test_record_stream() {
        let input = concat!(
            r#"[[1, "a", [0, 0, "-1", "-1"], false, 2, 1, 0, 0]]"#,
            "\n\n",
            r#"[[1, "a", [0, 0, "-1", "-1"], false, 2, 1, 1, 0], [2, "b", [5, 5, 4, 4], true, 1, 1, 0, 0]]"#,
            "\n",
            "not json\n",
        );
        let mut stream = RecordStream::new(Cursor::new(input));

        assert_eq!(stream.next().unwrap().unwrap().len(), 1);
        let second = stream.next().unwrap().unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].frame, 1);
        assert_eq!(stream.line_number(), 3);

        let err = stream.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("line 4"));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_batch_roundtrip() {
        let batch = decode_batch(r#"[[1, "a", [0, 0, 1, 1], false, 1, 1, 0, 0]]"#).unwrap();
        assert_eq!(decode_batch(&encode_batch(&batch).unwrap()).unwrap(), batch);
    }
}
