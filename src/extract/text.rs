//! Text coercion helpers for dashboard content

use scraper::ElementRef;

/// Collapses all runs of whitespace (newlines included) to single spaces and
/// trims both ends
pub fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Concatenated text of an element and its descendants
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Splits a project label like `Cape Town Harbour (Desalination)` into its
/// area and type
///
/// Only the first `(` separates the two. A label without one is all area.
pub fn area_and_type(label: &str) -> (String, String) {
    match label.split_once('(') {
        Some((area, kind)) => {
            let kind = kind.trim();
            let kind = kind.strip_suffix(')').unwrap_or(kind);
            (area.trim().to_string(), kind.trim().to_string())
        }
        None => (label.trim().to_string(), String::new()),
    }
}

/// Strips `%` signs and surrounding whitespace
pub fn strip_percent(text: &str) -> String {
    text.replace('%', "").trim().to_string()
}

/// Parses text like `27.2%` into `27.2`
pub fn parse_percentage(text: &str) -> Result<f64, String> {
    let stripped = strip_percent(text);
    let value = stripped
        .parse::<f64>()
        .map_err(|e| format!("'{}' is not a number: {}", text.trim(), e))?;

    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", text.trim()));
    }

    Ok(value)
}

/// Checks that a percentage lies in [0, 100]
pub fn ensure_percentage_range(value: f64) -> Result<f64, String> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is outside 0-100", value))
    }
}
