// LOC (RFC 1876) geographic-position encoding. Grounded on the reference
// `LOC` RD class: mantissa/exponent size-precision packing, unsigned
// thousandths-of-arcsecond lat/lon centered at 2^31, centimetre altitude
// offset by -100000m, and the "omit trailing fields at their defaults"
// zone-text rule.

use crate::error::DnsError;

pub const DEFAULT_SIZE: u8 = 0x12; // 1m
pub const DEFAULT_HORIZ_PRE: u8 = 0x16; // 10000m
pub const DEFAULT_VERT_PRE: u8 = 0x13; // 10m

const LAT_LON_ORIGIN: i64 = 1 << 31;

pub fn encode_precision(meters: f64) -> Result<u8, DnsError> {
    if meters as i64 == 0 {
        return Ok(0);
    }
    let mut value = meters * 100.0;
    let mut exponent = 0u32;
    while value >= 10.0 && exponent < 9 {
        value /= 10.0;
        exponent += 1;
    }
    let mantissa = value.round() as i64;
    if mantissa >= 10 {
        return Err(DnsError::parse("LOC precision value out of range", 0));
    }
    Ok(((mantissa as u8) << 4) | (exponent as u8))
}

pub fn decode_precision(byte: u8) -> Result<f64, DnsError> {
    let mantissa = byte >> 4;
    let exponent = byte & 0x0f;
    if mantissa > 9 || exponent > 9 {
        return Err(DnsError::parse("LOC precision value out of range", 0));
    }
    Ok((mantissa as f64) * 10f64.powi(exponent as i32) / 100.0)
}

pub fn encode_coordinate(degrees: f64) -> u32 {
    (degrees * 3_600_000.0 + LAT_LON_ORIGIN as f64) as u32
}

/// Renders `D M S.sss C`, dropping seconds (and then minutes) when they're
/// exactly zero, matching the reference implementation's `_reprcoord`.
pub fn format_coordinate(value: u32, positive: &str, negative: &str) -> String {
    let base = (value as i64 - LAT_LON_ORIGIN).unsigned_abs();
    let cardinal = if value as i64 >= LAT_LON_ORIGIN { positive } else { negative };
    let degrees = base / 3_600_000;
    let minutes = (base % 3_600_000) / 60_000;
    let seconds = (base % 3_600_000 % 60_000) as f64 / 1000.0;
    format!("{} {} {:.3} {}", degrees, minutes, seconds, cardinal)
}

/// Renders the trailing `sizm hpm vpm` fields, omitting each one (from the
/// end inward) while it and everything after it is still at its default.
pub fn format_precision_tail(size: u8, horiz_pre: u8, vert_pre: u8) -> String {
    let show_vert = vert_pre != DEFAULT_VERT_PRE;
    let show_horiz = show_vert || horiz_pre != DEFAULT_HORIZ_PRE;
    let show_size = show_horiz || size != DEFAULT_SIZE;

    let mut parts = Vec::new();
    if show_size {
        parts.push(format!("{}m", decode_precision(size).unwrap_or(1.0)));
    }
    if show_horiz {
        parts.push(format!("{}m", decode_precision(horiz_pre).unwrap_or(10000.0)));
    }
    if show_vert {
        parts.push(format!("{}m", decode_precision(vert_pre).unwrap_or(10.0)));
    }
    parts.join(" ")
}

pub fn encode_altitude(meters: f64) -> u32 {
    ((meters + 100_000.0) * 100.0).round() as u32
}

pub fn decode_altitude(value: u32) -> f64 {
    (value as f64) / 100.0 - 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_round_trips_for_defaults() {
        assert_eq!(encode_precision(1.0).unwrap(), DEFAULT_SIZE);
        assert_eq!(encode_precision(10000.0).unwrap(), DEFAULT_HORIZ_PRE);
        assert_eq!(encode_precision(10.0).unwrap(), DEFAULT_VERT_PRE);
        assert!((decode_precision(DEFAULT_SIZE).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn altitude_round_trips() {
        let encoded = encode_altitude(100.0);
        assert!((decode_altitude(encoded) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn coordinate_formats_through_encode_and_format() {
        let encoded = encode_coordinate(42.25);
        let text = format_coordinate(encoded, "N", "S");
        assert_eq!(text, "42 15 0.000 N");
    }
}
