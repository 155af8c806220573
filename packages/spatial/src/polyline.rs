//! Encoded polyline codec.
//!
//! The signed-delta, base64-ish encoding at 5 decimal places shared with
//! the routing provider and the rendering client. Coordinates are scaled
//! by 1e5, delta-encoded against the previous point, zigzag-signed, and
//! emitted as little-endian 5-bit chunks offset by 63.

use flood_map_geography_models::Coordinate;

/// Errors decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    /// The string ended in the middle of a chunked value.
    #[error("encoded polyline truncated mid-value")]
    Truncated,

    /// A byte outside the valid encoding range (63-126).
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte {
        /// The offending byte.
        byte: u8,
        /// Byte offset in the encoded string.
        offset: usize,
    },
}

/// Decodes an encoded polyline string into coordinates.
///
/// # Errors
///
/// Returns [`PolylineError`] if the string is truncated mid-value or
/// contains bytes outside the encoding alphabet.
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut coordinates = Vec::new();
    let mut offset = 0;
    let mut lat_e5 = 0_i64;
    let mut lng_e5 = 0_i64;

    while offset < bytes.len() {
        let (d_lat, next) = decode_value(bytes, offset)?;
        let (d_lng, next) = decode_value(bytes, next)?;
        offset = next;

        lat_e5 += d_lat;
        lng_e5 += d_lng;

        #[allow(clippy::cast_precision_loss)]
        coordinates.push(Coordinate::new(lat_e5 as f64 / 1e5, lng_e5 as f64 / 1e5));
    }

    Ok(coordinates)
}

/// Encodes coordinates into an encoded polyline string.
#[must_use]
pub fn encode_polyline(points: &[Coordinate]) -> String {
    let mut encoded = String::new();
    let mut prev_lat_e5 = 0_i64;
    let mut prev_lng_e5 = 0_i64;

    for point in points {
        let lat_e5 = scale_e5(point.latitude);
        let lng_e5 = scale_e5(point.longitude);

        encode_value(lat_e5 - prev_lat_e5, &mut encoded);
        encode_value(lng_e5 - prev_lng_e5, &mut encoded);

        prev_lat_e5 = lat_e5;
        prev_lng_e5 = lng_e5;
    }

    encoded
}

/// Rounds a degree value to its 5-decimal integer representation.
#[allow(clippy::cast_possible_truncation)]
fn scale_e5(degrees: f64) -> i64 {
    (degrees * 1e5).round() as i64
}

/// Decodes one zigzag-signed chunked value starting at `offset`.
fn decode_value(bytes: &[u8], mut offset: usize) -> Result<(i64, usize), PolylineError> {
    let mut result = 0_i64;
    let mut shift = 0_u32;

    loop {
        let Some(&byte) = bytes.get(offset) else {
            return Err(PolylineError::Truncated);
        };
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidByte { byte, offset });
        }

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        offset += 1;

        if chunk < 0x20 {
            break;
        }
    }

    let delta = if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((delta, offset))
}

/// Encodes one signed delta as zigzag 5-bit chunks.
fn encode_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= 0x20 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        out.push(char::from(((0x20 | (value & 0x1f)) + 63) as u8));
        value >>= 5;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    out.push(char::from((value + 63) as u8));
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vector from the format's documentation.
    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn decodes_reference_vector() {
        let points = decode_polyline(REFERENCE).unwrap();
        assert_eq!(points.len(), 3);
        assert!((points[0].latitude - 38.5).abs() < 1e-9);
        assert!((points[0].longitude - -120.2).abs() < 1e-9);
        assert!((points[1].latitude - 40.7).abs() < 1e-9);
        assert!((points[1].longitude - -120.95).abs() < 1e-9);
        assert!((points[2].latitude - 43.252).abs() < 1e-9);
        assert!((points[2].longitude - -126.453).abs() < 1e-9);
    }

    #[test]
    fn encodes_reference_vector() {
        let points = [
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ];
        assert_eq!(encode_polyline(&points), REFERENCE);
    }

    #[test]
    fn round_trips_at_five_decimals() {
        let points = [
            Coordinate::new(3.13900, 101.68690),
            Coordinate::new(3.15210, 101.71440),
            Coordinate::new(3.20000, 101.70000),
        ];
        let decoded = decode_polyline(&encode_polyline(&points)).unwrap();
        assert_eq!(decoded.len(), points.len());
        for (orig, back) in points.iter().zip(&decoded) {
            assert!((orig.latitude - back.latitude).abs() < 1e-5);
            assert!((orig.longitude - back.longitude).abs() < 1e-5);
        }
    }

    #[test]
    fn empty_string_decodes_to_no_points() {
        assert_eq!(decode_polyline("").unwrap(), Vec::new());
    }

    #[test]
    fn rejects_truncated_input() {
        // All three bytes have the continuation bit set.
        assert_eq!(decode_polyline("abc").unwrap_err(), PolylineError::Truncated);
    }

    #[test]
    fn rejects_bytes_outside_alphabet() {
        let err = decode_polyline("_p~iF\t").unwrap_err();
        assert!(matches!(err, PolylineError::InvalidByte { byte: 0x09, .. }));
    }
}
