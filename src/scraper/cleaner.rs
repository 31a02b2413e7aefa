use super::ScrapeError;

/// Non-empty and ASCII digits only. "12" → true | "" → false | "1.5" → false
pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn parse_count(row: usize, s: &str) -> Result<u64, ScrapeError> {
    s.parse().map_err(|_| ScrapeError::InvalidNumber {
        row,
        text: s.to_string(),
    })
}

/// Split the score cell into (tag, score).
/// "12345" → ("", 12345) | "热 12345" → ("热", 12345)
///
/// Anything else, including more than two space-separated tokens, is a fault.
pub fn parse_score(row: usize, text: &str) -> Result<(String, u64), ScrapeError> {
    let text = text.trim();
    if is_digits(text) {
        return Ok((String::new(), parse_count(row, text)?));
    }

    let tokens: Vec<&str> = text.split(' ').collect();
    let [tag, score] = tokens.as_slice() else {
        return Err(ScrapeError::MalformedScore {
            row,
            text: text.to_string(),
        });
    };

    if !is_digits(score) {
        return Err(ScrapeError::InvalidNumber {
            row,
            text: score.to_string(),
        });
    }
    Ok((tag.to_string(), parse_count(row, score)?))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
