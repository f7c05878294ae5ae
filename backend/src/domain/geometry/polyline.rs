//! Encoded polyline codec (precision 5).
//!
//! Each coordinate is stored as a zig-zag encoded delta from the previous
//! point, scaled by 1e5 and split into 5-bit chunks offset by 63. This is the
//! format emitted by the route service, so decoding must stay bit-exact with
//! it.

use super::LatLon;

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const ASCII_OFFSET: u8 = 63;
// Beyond this shift an i64 accumulator would overflow; treat as malformed.
const MAX_SHIFT: u32 = 55;

/// Decode an encoded polyline into `(latitude, longitude)` points.
///
/// Blank input yields an empty vector. Malformed input never fails: decoding
/// stops at the first byte outside the polyline alphabet or at a truncated
/// value, returning the complete points read so far.
///
/// # Examples
/// ```
/// use roadify_places::domain::geometry::polyline::decode;
///
/// let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// assert_eq!(points.len(), 3);
/// assert!((points[0].latitude - 38.5).abs() < 1e-9);
/// assert!(decode("   ").is_empty());
/// ```
#[must_use]
pub fn decode(encoded: &str) -> Vec<LatLon> {
    if encoded.trim().is_empty() {
        return Vec::new();
    }

    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut cursor = 0;
    let mut latitude = 0_i64;
    let mut longitude = 0_i64;

    while cursor < bytes.len() {
        let Some((delta_lat, after_lat)) = next_value(bytes, cursor) else {
            break;
        };
        let Some((delta_lng, after_lng)) = next_value(bytes, after_lat) else {
            break;
        };
        cursor = after_lng;
        latitude = latitude.saturating_add(delta_lat);
        longitude = longitude.saturating_add(delta_lng);
        points.push(LatLon::new(
            latitude as f64 / PRECISION,
            longitude as f64 / PRECISION,
        ));
    }

    points
}

/// Encode points into a polyline string; the inverse of [`decode`] up to
/// 1e-5 degrees.
///
/// # Examples
/// ```
/// use roadify_places::domain::geometry::{LatLon, polyline::encode};
///
/// let encoded = encode(&[LatLon::new(38.5, -120.2), LatLon::new(40.7, -120.95)]);
/// assert_eq!(encoded, "_p~iF~ps|U_ulLnnqC");
/// ```
#[must_use]
pub fn encode(points: &[LatLon]) -> String {
    let mut encoded = String::new();
    let mut previous_lat = 0_i64;
    let mut previous_lng = 0_i64;

    for point in points {
        let latitude = scale(point.latitude);
        let longitude = scale(point.longitude);
        push_value(latitude - previous_lat, &mut encoded);
        push_value(longitude - previous_lng, &mut encoded);
        previous_lat = latitude;
        previous_lng = longitude;
    }

    encoded
}

fn next_value(bytes: &[u8], start: usize) -> Option<(i64, usize)> {
    let mut result = 0_i64;
    let mut shift = 0_u32;

    for (offset, byte) in bytes.get(start..)?.iter().enumerate() {
        let chunk = i64::from(byte.checked_sub(ASCII_OFFSET).filter(|chunk| *chunk < 64)?);
        if shift > MAX_SHIFT {
            return None;
        }
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        if chunk < CONTINUATION {
            let value = if result & 1 == 1 {
                !(result >> 1)
            } else {
                result >> 1
            };
            return Some((value, start + offset + 1));
        }
    }

    None
}

fn scale(degrees: f64) -> i64 {
    (degrees * PRECISION).round() as i64
}

fn push_value(value: i64, encoded: &mut String) {
    let mut remaining = if value < 0 { !(value << 1) } else { value << 1 };
    while remaining >= CONTINUATION {
        push_chunk((CONTINUATION | (remaining & CHUNK_MASK)) as u8, encoded);
        remaining >>= CHUNK_BITS;
    }
    push_chunk(remaining as u8, encoded);
}

fn push_chunk(chunk: u8, encoded: &mut String) {
    encoded.push(char::from(chunk + ASCII_OFFSET));
}
