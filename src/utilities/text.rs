use std::sync::LazyLock;

use regex::Regex;

static LEADING_PRICE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d[\d\s,]*\s*MRU\s*){2,}").unwrap());
static PRICE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d\s]*\s*MRU\s*){2,}").unwrap());
static PAGINATION_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\s*/\s*\d+").unwrap());
static LEADING_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d[\d\s]*\s*MRU\s*").unwrap());
static EMBEDDED_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+[\s,]*\d+[\s,]*\d+[\s,]*MRU").unwrap());
static LEADING_NUMBERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[\d\s,]+(MRU|MRO)?\s*").unwrap());
static TRAILING_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[\d\s,]+(MRU|MRO)\s*$").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static ONLY_PRICE_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[\d\s,.\-MRU]*$").unwrap());
static LATIN_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-zÀ-ÿ]").unwrap());

fn has_arabic_text(s: &str) -> bool {
    s.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

/// Normalize scraped listing titles: strip repeated price runs, pagination
/// fragments like "1 / 3" and whitespace runs, while preserving Arabic and
/// Latin text. Titles reduced to numbers/symbols fall back to `placeholder`.
pub fn clean_listing_title(title: Option<&str>, placeholder: &str) -> String {
    let Some(title) = title.filter(|t| !t.trim().is_empty()) else {
        return placeholder.to_string();
    };

    let mut cleaned = title.trim().to_string();

    let has_arabic = has_arabic_text(&cleaned);
    let has_latin = LATIN_TEXT.is_match(&cleaned);

    if has_arabic || has_latin {
        // Only remove obvious duplicate price patterns at the start
        cleaned = LEADING_PRICE_RUN.replace_all(&cleaned, "").into_owned();
        cleaned = PAGINATION_FRAGMENT.replace_all(&cleaned, "").into_owned();
    } else {
        // Title is just numbers/prices, clean more aggressively
        cleaned = PRICE_RUN.replace_all(&cleaned, "").into_owned();
        cleaned = PAGINATION_FRAGMENT.replace_all(&cleaned, "").into_owned();
        cleaned = LEADING_PRICE.replace_all(&cleaned, "").into_owned();
        cleaned = EMBEDDED_PRICE.replace_all(&cleaned, "").into_owned();
        cleaned = LEADING_NUMBERS.replace_all(&cleaned, "").into_owned();
        cleaned = TRAILING_PRICE.replace_all(&cleaned, "").into_owned();
    }

    cleaned = WHITESPACE_RUN
        .replace_all(cleaned.trim(), " ")
        .into_owned();

    // If what's left is too short or just numbers/symbols, fall back
    if ONLY_PRICE_NOISE.is_match(&cleaned) || cleaned.chars().count() < 3 {
        let original = title.trim();
        let without_currency = original.replace("MRU", "").replace("mru", "");
        if original.chars().count() >= 3
            && (has_arabic || LATIN_TEXT.is_match(&without_currency))
        {
            return original.to_string();
        }
        return placeholder.to_string();
    }

    cleaned
}

/// Thousands-grouped price label with the MRU currency suffix.
pub fn format_price_mru(price: f64) -> String {
    let rounded = price.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("-{} MRU", grouped)
    } else {
        format!("{} MRU", grouped)
    }
}
