//! Encoded polyline codec for route geometries.
//!
//! The format stores each point as a latitude delta followed by a longitude
//! delta from the previous point, scaled to a fixed precision and packed into
//! printable ASCII in 5-bit groups. Encoding/decoding happens at the boundary
//! (when receiving from the directions service or sending to a frontend).

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::types::Coordinate;

/// Decimal places used by the directions service.
pub const DEFAULT_PRECISION: u32 = 5;

const ALPHABET_START: u8 = 63;
const ALPHABET_END: u8 = 126;
const CONTINUATION_BIT: u64 = 0x20;
const GROUP_MASK: u64 = 0x1f;
const MAX_SHIFT: u32 = 60;

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes a polyline at [`DEFAULT_PRECISION`].
    pub fn decode(encoded: &str) -> Result<Self, DecodeError> {
        decode(encoded).map(Self::new)
    }

    pub fn encode(&self) -> String {
        encode(&self.points)
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

pub fn encode(points: &[Coordinate]) -> String {
    encode_with_precision(points, DEFAULT_PRECISION)
}

/// Decodes `encoded` where values are scaled by `10^precision`.
///
/// Pure function of its input. Malformed input yields an error, never a
/// partial sequence.
pub fn decode_with_precision(
    encoded: &str,
    precision: u32,
) -> Result<Vec<Coordinate>, DecodeError> {
    let factor = scale(precision);
    let bytes = encoded.as_bytes();
    let mut offset = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut points = Vec::new();

    while offset < bytes.len() {
        let start = offset;
        let lat_delta = read_value(bytes, &mut offset)?;
        // A latitude without its longitude.
        if offset >= bytes.len() {
            return Err(DecodeError::Truncated);
        }
        let lng_delta = read_value(bytes, &mut offset)?;

        latitude = latitude
            .checked_add(lat_delta)
            .ok_or(DecodeError::Overflow { offset: start })?;
        longitude = longitude
            .checked_add(lng_delta)
            .ok_or(DecodeError::Overflow { offset: start })?;

        points.push(Coordinate::new(
            latitude as f64 / factor,
            longitude as f64 / factor,
        ));
    }

    Ok(points)
}

/// Encodes `points` scaled by `10^precision`, rounding each component.
pub fn encode_with_precision(points: &[Coordinate], precision: u32) -> String {
    let factor = scale(precision);
    let mut encoded = String::with_capacity(points.len() * 8);
    let mut previous = (0i64, 0i64);

    for point in points {
        let latitude = (point.latitude * factor).round() as i64;
        let longitude = (point.longitude * factor).round() as i64;
        write_value(latitude - previous.0, &mut encoded);
        write_value(longitude - previous.1, &mut encoded);
        previous = (latitude, longitude);
    }

    encoded
}

fn scale(precision: u32) -> f64 {
    10f64.powi(precision as i32)
}

/// Reads one signed value starting at `offset`, advancing past it.
fn read_value(bytes: &[u8], offset: &mut usize) -> Result<i64, DecodeError> {
    let start = *offset;
    let mut accumulator: u64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(DecodeError::Truncated);
        };
        if !(ALPHABET_START..=ALPHABET_END).contains(&byte) {
            return Err(DecodeError::InvalidByte {
                byte,
                offset: *offset,
            });
        }
        if shift > MAX_SHIFT {
            return Err(DecodeError::Overflow { offset: start });
        }
        *offset += 1;

        let group = u64::from(byte - ALPHABET_START);
        accumulator |= (group & GROUP_MASK) << shift;
        shift += 5;

        if group & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let magnitude = (accumulator >> 1) as i64;
    Ok(if accumulator & 1 == 1 {
        !magnitude
    } else {
        magnitude
    })
}

fn write_value(value: i64, out: &mut String) {
    let zigzag = if value < 0 { !(value << 1) } else { value << 1 };
    let mut remaining = zigzag as u64;

    while remaining >= CONTINUATION_BIT {
        let group = (CONTINUATION_BIT | (remaining & GROUP_MASK)) as u8 + ALPHABET_START;
        out.push(char::from(group));
        remaining >>= 5;
    }
    out.push(char::from(remaining as u8 + ALPHABET_START));
}
