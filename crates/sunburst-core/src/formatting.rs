/// Format a measure value with K/M/B magnitude suffixes.
///
/// Non-finite and non-positive values render as `"0"`. Values below one
/// thousand are rounded to a whole number; larger values get two decimals
/// with trailing zeros (and a dangling decimal point) trimmed.
///
/// # Examples
///
/// ```
/// use sunburst_core::formatting::format_value;
///
/// assert_eq!(format_value(0.0), "0");
/// assert_eq!(format_value(-3.0), "0");
/// assert_eq!(format_value(999.6), "1000");
/// assert_eq!(format_value(1_500.0), "1.5K");
/// assert_eq!(format_value(1_000_000.0), "1M");
/// assert_eq!(format_value(1_234_000_000.0), "1.23B");
/// ```
pub fn format_value(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return "0".to_string();
    }

    let (divisor, suffix) = if value >= 1e9 {
        (1e9, "B")
    } else if value >= 1e6 {
        (1e6, "M")
    } else if value >= 1e3 {
        (1e3, "K")
    } else {
        return format!("{}", value.round() as i64);
    };

    let scaled = format!("{:.2}", value / divisor);
    let trimmed = scaled.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", trimmed, suffix)
}

/// Expand a `format_value` result's `B` suffix for prose summary lines.
///
/// # Examples
///
/// ```
/// use sunburst_core::formatting::spell_out_billions;
///
/// assert_eq!(spell_out_billions("1.2B"), "1.2 billion");
/// assert_eq!(spell_out_billions("750M"), "750M");
/// ```
pub fn spell_out_billions(formatted: &str) -> String {
    match formatted.strip_suffix('B') {
        Some(stem) => format!("{} billion", stem),
        None => formatted.to_string(),
    }
}

/// Pluralize a category or genre word for description text.
///
/// Handles the irregular cases the catalog data actually contains, then
/// falls back to consonant-y → `-ies`, `-s` → `-ses`, and a plain `s`.
///
/// # Examples
///
/// ```
/// use sunburst_core::formatting::pluralize;
///
/// assert_eq!(pluralize("comedy"), "comedies");
/// assert_eq!(pluralize("tv"), "TV shows");
/// assert_eq!(pluralize("sci-fi"), "sci-fi");
/// assert_eq!(pluralize("mystery"), "mysteries");
/// assert_eq!(pluralize("thriller"), "thrillers");
/// assert_eq!(pluralize(""), "");
/// ```
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    match word.to_lowercase().as_str() {
        "comedy" => return "comedies".to_string(),
        "tv" => return "TV shows".to_string(),
        "sci-fi" => return "sci-fi".to_string(),
        "espionage" => return "espionage".to_string(),
        _ => {}
    }

    if let Some(stem) = word.strip_suffix('y') {
        let consonant_y = stem
            .chars()
            .last()
            .map_or(false, |c| !"aeiouAEIOU".contains(c));
        if consonant_y {
            return format!("{}ies", stem);
        }
    }
    if word.ends_with('s') {
        return format!("{}es", word);
    }
    format!("{}s", word)
}

/// Display form of a category label: `"tv"` becomes `"TV"`, everything else
/// is capitalized.
///
/// # Examples
///
/// ```
/// use sunburst_core::formatting::format_category;
///
/// assert_eq!(format_category("tv"), "TV");
/// assert_eq!(format_category("MOVIE"), "Movie");
/// ```
pub fn format_category(word: &str) -> String {
    if word.eq_ignore_ascii_case("tv") {
        return "TV".to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => format!(
            "{}{}",
            first.to_uppercase(),
            chars.as_str().to_lowercase()
        ),
        None => String::new(),
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use sunburst_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}
