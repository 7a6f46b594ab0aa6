//! Aspect ratio reduction and naming.

use crate::utils::format_float;

/// Ratios with a common name.
const NAMED_RATIOS: &[(&str, &str)] = &[
    ("1:1", "Square"),
    ("1.33:1", "4:3 video"),
    ("1.37:1", "Academy ratio"),
    ("1.43:1", "IMAX"),
    ("1.5:1", "3:2 video"),
    ("1.56:1", "14:9"),
    ("1.66:1", "Super 16"),
    ("1.78:1", "16:9 widescreen video"),
    ("1.85:1", "35mm standard"),
    ("2.2:1", "70mm standard"),
    ("2.35:1", "35mm anamorphic pre-1970"),
    ("2.39:1", "35mm anamorphic post-1970"),
    ("4:3", "Video"),
    ("3:2", "Video"),
    ("14:9", "Widescreen video"),
    ("16:9", "Widescreen video"),
];

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Reduces `width:height`.
///
/// When both reduced sides are above 10 the ratio is expressed as
/// `round(width / height, 2):1` instead. Returns `None` for a zero side.
pub fn aspect_ratio(width: u64, height: u64) -> Option<String> {
    if width == 0 || height == 0 {
        return None;
    }
    let factor = gcd(width, height);
    let (x, y) = (width / factor, height / factor);
    if x > 10 && y > 10 {
        let ratio = (width as f64 / height as f64 * 100.0).round() / 100.0;
        Some(format!("{}:1", format_float(ratio)))
    } else {
        Some(format!("{x}:{y}"))
    }
}

/// The reduced ratio followed by its common name when it has one,
/// e.g. `"16:9 - Widescreen video"`.
pub fn describe_aspect_ratio(width: u64, height: u64) -> Option<String> {
    let ratio = aspect_ratio(width, height)?;
    Some(
        match NAMED_RATIOS.iter().find(|(known, _)| *known == ratio) {
            Some((_, name)) => format!("{ratio} - {name}"),
            None => ratio,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_ratios() {
        assert_eq!(aspect_ratio(1920, 1080).as_deref(), Some("16:9"));
        assert_eq!(aspect_ratio(1080, 1080).as_deref(), Some("1:1"));
        assert_eq!(aspect_ratio(1998, 1080).as_deref(), Some("1.85:1"));
        assert_eq!(aspect_ratio(0, 1080), None);
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            describe_aspect_ratio(1920, 1080).as_deref(),
            Some("16:9 - Widescreen video")
        );
        assert_eq!(
            describe_aspect_ratio(2048, 858).as_deref(),
            Some("2.39:1 - 35mm anamorphic post-1970")
        );
        // exact match only: 720x576 reduces to 5:4, which has no name
        assert_eq!(describe_aspect_ratio(720, 576).as_deref(), Some("5:4"));
    }
}
