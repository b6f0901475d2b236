//! Emoji and accessibility-text canonicalization
//!
//! Emoji strings are reduced to the scalars of the emoji blocks the receiving
//! app indexes; variation selectors and stray text are dropped. A string that
//! filters down to nothing is kept as written.

use crate::error::StickerPackError;
use crate::limits::Limits;
use std::ops::RangeInclusive;

/// Unicode ranges kept by [`canonicalize_emoji`]
const EMOJI_RANGES: &[RangeInclusive<u32>] = &[
    0x1F600..=0x1F64F, // Emoticons
    0x1F300..=0x1F5FF, // Misc symbols and pictographs
    0x1F680..=0x1F6FF, // Transport and map
    0x2600..=0x26FF,   // Misc symbols
    0x2700..=0x27BF,   // Dingbats
    0x1F1E6..=0x1F1FF, // Regional indicators (flags)
    0x1F900..=0x1F9FF, // Supplemental symbols and pictographs
    0x200D..=0x200D,   // Zero-width joiner
];

fn is_emoji_scalar(c: char) -> bool {
    let value = c as u32;
    EMOJI_RANGES.iter().any(|range| range.contains(&value))
}

/// Filter one emoji string to recognized emoji scalars.
///
/// Falls back to the original string when nothing survives the filter.
///
/// ```
/// use stickerpack::emoji::canonicalize_emoji;
///
/// // U+FE0F (variation selector) is dropped
/// assert_eq!(canonicalize_emoji("\u{2615}\u{FE0F}"), "\u{2615}");
/// // Nothing recognizable: kept verbatim
/// assert_eq!(canonicalize_emoji(":)"), ":)");
/// ```
pub fn canonicalize_emoji(emoji: &str) -> String {
    let filtered: String = emoji.chars().filter(|&c| is_emoji_scalar(c)).collect();
    if filtered.is_empty() {
        emoji.to_string()
    } else {
        filtered
    }
}

/// Canonicalize a sticker's emoji list.
///
/// `None` passes through. More than `limits.max_emojis_per_sticker` entries
/// fails with [`StickerPackError::TooManyEmojis`]. Order and duplicates are
/// preserved.
pub fn canonicalize_emojis(
    emojis: Option<&[String]>,
    limits: &Limits,
) -> Result<Option<Vec<String>>, StickerPackError> {
    let Some(emojis) = emojis else {
        return Ok(None);
    };

    if emojis.len() > limits.max_emojis_per_sticker {
        return Err(StickerPackError::TooManyEmojis {
            count: emojis.len(),
            max: limits.max_emojis_per_sticker,
        });
    }

    Ok(Some(emojis.iter().map(|e| canonicalize_emoji(e)).collect()))
}

/// Check accessibility text against the limit for the sticker's mode.
pub fn validate_accessibility_text(
    text: Option<&str>,
    animated: bool,
    limits: &Limits,
) -> Result<Option<String>, StickerPackError> {
    let Some(text) = text else {
        return Ok(None);
    };

    let len = text.chars().count();
    let max = limits.max_accessibility_text_chars(animated);
    if len > max {
        return Err(StickerPackError::AccessibilityTextTooLong { len, max, animated });
    }

    Ok(Some(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_absent_emojis_pass_through() {
        assert_eq!(canonicalize_emojis(None, &Limits::default()).unwrap(), None);
    }

    #[test]
    fn test_already_canonical_emoji_is_unchanged() {
        let input = strings(&["😀"]);
        let out = canonicalize_emojis(Some(&input), &Limits::default()).unwrap();
        assert_eq!(out, Some(input));
    }

    #[test]
    fn test_surrounding_text_is_stripped() {
        let input = strings(&[" ☕ "]);
        let out = canonicalize_emojis(Some(&input), &Limits::default()).unwrap();
        assert_eq!(out, Some(strings(&["☕"])));
    }

    #[test]
    fn test_zwj_sequence_keeps_joiner() {
        // man + ZWJ + rocket
        let astronaut = "\u{1F468}\u{200D}\u{1F680}";
        assert_eq!(canonicalize_emoji(astronaut), astronaut);
    }

    #[test]
    fn test_variation_selector_is_dropped() {
        // thumbs up + text presentation selector U+FE0E
        assert_eq!(canonicalize_emoji("\u{1F44D}\u{FE0E}"), "\u{1F44D}");
        // skin tone modifiers sit inside 1F300..1F5FF and survive
        assert_eq!(canonicalize_emoji("\u{1F44B}\u{1F3FD}"), "\u{1F44B}\u{1F3FD}");
    }

    #[test]
    fn test_no_matching_scalars_falls_back_to_original() {
        let input = strings(&["abc", "😀"]);
        let out = canonicalize_emojis(Some(&input), &Limits::default()).unwrap().unwrap();
        assert_eq!(out, strings(&["abc", "😀"]));
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let input = strings(&["🙂", "☕", "🙂"]);
        let out = canonicalize_emojis(Some(&input), &Limits::default()).unwrap().unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_too_many_emojis() {
        let input = strings(&["😀", "😁", "😂", "🤣"]);
        let err = canonicalize_emojis(Some(&input), &Limits::default()).unwrap_err();
        assert_eq!(err, StickerPackError::TooManyEmojis { count: 4, max: 3 });
    }

    #[test]
    fn test_accessibility_text_limits_depend_on_mode() {
        let limits = Limits::default();
        let static_max = "a".repeat(125);
        let animated_max = "a".repeat(255);

        assert!(validate_accessibility_text(Some(&static_max), false, &limits).is_ok());
        assert_eq!(
            validate_accessibility_text(Some(&animated_max), false, &limits).unwrap_err(),
            StickerPackError::AccessibilityTextTooLong { len: 255, max: 125, animated: false }
        );
        assert!(validate_accessibility_text(Some(&animated_max), true, &limits).is_ok());

        let too_long = "a".repeat(256);
        assert!(matches!(
            validate_accessibility_text(Some(&too_long), true, &limits),
            Err(StickerPackError::AccessibilityTextTooLong { animated: true, .. })
        ));
        assert_eq!(validate_accessibility_text(None, true, &limits).unwrap(), None);
    }

    #[test]
    fn test_accessibility_text_counts_characters_not_bytes() {
        let text = "é".repeat(125);
        assert!(validate_accessibility_text(Some(&text), false, &Limits::default()).is_ok());
    }
}
