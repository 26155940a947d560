use crate::projection::Projection;
use geo::{LineString, MultiPolygon};
use std::fmt::Write;

/// Escape a string for use in SVG text nodes and double-quoted attributes.
pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Percent-encode a country name for a path segment in an href.
pub fn href_encode(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for byte in name.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(*byte as char)
            }
            _ => {
                let _ = write!(encoded, "%{:02X}", byte);
            }
        }
    }
    encoded
}

/// Project a country's rings into one SVG path data string: absolute M/L
/// commands per ring, each closed with Z, coordinates at 2 decimals.
pub fn multipolygon_path(geometry: &MultiPolygon<f64>, projection: &Projection) -> String {
    let mut d = String::new();
    for polygon in geometry {
        append_ring(&mut d, polygon.exterior(), projection);
        for interior in polygon.interiors() {
            append_ring(&mut d, interior, projection);
        }
    }
    d
}

fn append_ring(d: &mut String, ring: &LineString<f64>, projection: &Projection) {
    if ring.0.is_empty() {
        return;
    }
    for (i, coord) in ring.coords().enumerate() {
        let (x, y) = projection.project(coord.x, coord.y);
        if i == 0 {
            let _ = write!(d, "M{:.2},{:.2}", x, y);
        } else {
            let _ = write!(d, "L{:.2},{:.2}", x, y);
        }
    }
    d.push('Z');
}
