use lazy_static::lazy_static;
use regex::Regex;

const NUMBER_WORDS: [(&str, f64); 10] = [
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
];

lazy_static! {
    // Alternatives are leftmost-first, so longer spellings must come first.
    static ref DURATION_RE: Regex = Regex::new(
        r"(?i)(-?\d+(?:\.\d+)?)\s*(days?|d|hours?|hrs?|h|minutes?|mins?|m|seconds?|secs?|s)"
    )
    .unwrap();
    static ref PERCENT_RE: Regex = Regex::new(r"(\d[\d,.]*)\s*%").unwrap();
    static ref PER_DAY_RE: Regex =
        Regex::new(r"(?i)(\d[\d,.]*)\s*(/\s*day|per\s*day|daily)").unwrap();
    static ref SHIFT_DIGITS_RE: Regex = Regex::new(r"(?i)(\d+)\s*shifts?").unwrap();
    static ref SHIFT_WORDS_RE: Regex =
        Regex::new(r"(?i)\b(one|two|three|four|five|six|seven|eight|nine|ten)\s*shifts?\b").unwrap();
}

/// Reads a number out of free text: "1,200 units" is 1200, "three" is 3.
pub fn parse_number_loose(text: &str) -> Option<f64> {
    let word = text.trim().to_lowercase();
    if let Some((_, n)) = NUMBER_WORDS.iter().find(|(w, _)| *w == word) {
        return Some(*n);
    }
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Converts `value` in `unit` to seconds. Unknown units are taken as seconds.
pub fn to_seconds(value: f64, unit: &str) -> f64 {
    let unit = unit.trim().to_lowercase();
    if unit.starts_with('d') {
        value * 86_400.0
    } else if unit.starts_with('h') {
        value * 3_600.0
    } else if unit.starts_with('m') {
        value * 60.0
    } else {
        value
    }
}

/// Sums every `<number><unit>` pair: "1h 20m" is 4800, "2.5 hours" is 9000.
/// Returns `None` when the text contains no unit-qualified number.
pub fn parse_duration_to_seconds(text: &str) -> Option<f64> {
    let mut matched = false;
    let total: f64 = DURATION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let value = caps[1].parse::<f64>().ok()?;
            matched = true;
            Some(to_seconds(value, &caps[2]))
        })
        .sum();
    matched.then_some(total)
}

pub fn parse_percent(text: &str) -> Option<f64> {
    PERCENT_RE
        .captures(text)
        .and_then(|caps| parse_number_loose(&caps[1]))
}

/// "480/day", "480 per day", "480 daily".
pub fn parse_per_day(text: &str) -> Option<f64> {
    PER_DAY_RE
        .captures(text)
        .and_then(|caps| parse_number_loose(&caps[1]))
}

pub fn parse_shift_count(text: &str) -> Option<u32> {
    if let Some(caps) = SHIFT_DIGITS_RE.captures(text) {
        return caps[1].parse().ok();
    }
    SHIFT_WORDS_RE
        .captures(text)
        .and_then(|caps| parse_number_loose(&caps[1]))
        .map(|n| n as u32)
}

/// A duration with units, or a bare number already in seconds.
pub fn seconds_or_plain(text: &str) -> Option<f64> {
    parse_duration_to_seconds(text).or_else(|| parse_number_loose(text))
}

/// "85%" or a bare 0-100 number.
pub fn percent_or_plain(text: &str) -> Option<f64> {
    parse_percent(text).or_else(|| parse_number_loose(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_numbers() {
        assert_eq!(parse_number_loose("1,200 units"), Some(1200.0));
        assert_eq!(parse_number_loose(" Three "), Some(3.0));
        assert_eq!(parse_number_loose("n/a"), None);
        assert_eq!(parse_number_loose(""), None);
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration_to_seconds("90 sec"), Some(90.0));
        assert_eq!(parse_duration_to_seconds("2.5 hours"), Some(9000.0));
        assert_eq!(parse_duration_to_seconds("1h 20m"), Some(4800.0));
        assert_eq!(parse_duration_to_seconds("45s"), Some(45.0));
        assert_eq!(parse_duration_to_seconds("3 days"), Some(259_200.0));
        assert_eq!(parse_duration_to_seconds("15 minutes"), Some(900.0));
        assert_eq!(parse_duration_to_seconds("300"), None);
    }

    #[test]
    fn negative_durations_keep_their_sign() {
        assert_eq!(parse_duration_to_seconds("-5 min"), Some(-300.0));
        assert_eq!(seconds_or_plain("-90s"), Some(-90.0));
    }

    #[test]
    fn plain_numbers_are_seconds() {
        assert_eq!(seconds_or_plain("300"), Some(300.0));
        assert_eq!(seconds_or_plain("5 min"), Some(300.0));
    }

    #[test]
    fn percents_and_rates() {
        assert_eq!(parse_percent("uptime is 85%"), Some(85.0));
        assert_eq!(percent_or_plain("92.5"), Some(92.5));
        assert_eq!(parse_per_day("we ship 480/day"), Some(480.0));
        assert_eq!(parse_per_day("1,000 per day"), Some(1000.0));
        assert_eq!(parse_per_day("480"), None);
    }

    #[test]
    fn shift_counts() {
        assert_eq!(parse_shift_count("we run 3 shifts"), Some(3));
        assert_eq!(parse_shift_count("Two shifts a day"), Some(2));
        assert_eq!(parse_shift_count("all day"), None);
    }
}
