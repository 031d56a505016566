//! InfluxDB line protocol encoding.

use crate::point::MetricPoint;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Encodes points as line protocol, one line per point, with nanosecond
/// timestamps. Points without fields are skipped.
pub fn encode_line_protocol(points: &[MetricPoint]) -> String {
    let mut out = String::new();
    for point in points {
        if point.fields.is_empty() {
            continue;
        }
        out.push_str(&escape_measurement(&point.measurement));
        out.push(' ');
        for (index, (name, value)) in point.fields.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            out.push_str(&escape_field_key(name));
            out.push('=');
            out.push_str(&value.to_string());
        }
        out.push(' ');
        out.push_str(&point.unix.saturating_mul(NANOS_PER_SECOND).to_string());
        out.push('\n');
    }
    out
}

fn escape_measurement(name: &str) -> String {
    escape(name, &[' ', ','])
}

fn escape_field_key(name: &str) -> String {
    escape(name, &[' ', ',', '='])
}

fn escape(name: &str, specials: &[char]) -> String {
    let mut escaped = String::with_capacity(name.len());
    for ch in name.chars() {
        if specials.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
