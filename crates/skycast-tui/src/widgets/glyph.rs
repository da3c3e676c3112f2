//! Terminal stand-ins for provider weather icons.

use skycast_core::IconRef;

/// Single-width glyph for an icon reference, keyed by its provider code.
///
/// Codes are `NN[d|n]`: the number selects the condition group and the
/// suffix day or night.
pub fn for_icon(icon: &IconRef) -> &'static str {
    let Some(code) = icon.code() else {
        return "?";
    };
    let night = code.ends_with('n');
    match code.get(..2) {
        Some("01") if night => "☾",
        Some("01") => "☀",
        Some("02" | "03" | "04") => "☁",
        Some("09" | "10") => "☂",
        Some("11") => "ϟ",
        Some("13") => "❄",
        Some("50") => "≋",
        _ => "?",
    }
}
