//! Formatting primitives shared by every section of every agreement.
//!
//! None of these functions fail: malformed dates and odd amounts degrade to
//! fixed placeholder text so a half-filled form still previews.

use chrono::{Datelike, Days, Months, NaiveDate};

use super::domain::DurationUnit;

pub const DATE_PLACEHOLDER: &str = "________ day of ________ ________";
pub const INLINE_BLANK: &str = "________";
pub const SIGNATURE_BLANK: &str = "____________________";
pub const CEDI_SYMBOL: &str = "GH₵";

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];
const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `GH₵1,234.50`. Always two decimals, comma thousands separators.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{CEDI_SYMBOL}0.00");
    }

    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    format!(
        "{sign}{CEDI_SYMBOL}{}.{fraction:02}",
        group_thousands(&whole.to_string())
    )
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// English words for an integer: `1500` → `One Thousand Five Hundred`.
///
/// Scales stop at Million; larger values repeat the Million scale
/// (`Two Thousand Million`).
pub fn number_to_words(value: i64) -> String {
    if value == 0 {
        return "Zero".to_string();
    }
    if value < 0 {
        return format!("Negative {}", number_to_words_unsigned(value.unsigned_abs()));
    }
    number_to_words_unsigned(value as u64)
}

fn number_to_words_unsigned(mut value: u64) -> String {
    if value == 0 {
        return "Zero".to_string();
    }

    let mut words: Vec<String> = Vec::new();

    if value / 1_000_000 > 0 {
        words.push(format!("{} Million", number_to_words_unsigned(value / 1_000_000)));
        value %= 1_000_000;
    }

    if value / 1_000 > 0 {
        words.push(format!("{} Thousand", number_to_words_unsigned(value / 1_000)));
        value %= 1_000;
    }

    if value / 100 > 0 {
        words.push(format!("{} Hundred", ONES[(value / 100) as usize]));
        value %= 100;
    }

    if value > 0 {
        if value < 20 {
            words.push(ONES[value as usize].to_string());
        } else {
            let tens = TENS[(value / 10) as usize];
            match value % 10 {
                0 => words.push(tens.to_string()),
                unit => words.push(format!("{tens}-{}", ONES[unit as usize])),
            }
        }
    }

    words.join(" ")
}

/// Words for a currency amount, rounded to the nearest whole cedi.
pub fn words_for_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return number_to_words(0);
    }
    let rounded = amount.round();
    let clamped = rounded.clamp(i64::MIN as f64, i64::MAX as f64) as i64;
    number_to_words(clamped)
}

pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Parses the ISO `YYYY-MM-DD` strings the form emits. A trailing time part is tolerated.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn month_name(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

/// `3rd day of June 2025`, or [`DATE_PLACEHOLDER`] for empty/unparseable input.
pub fn format_date_with_ordinal(raw: &str) -> String {
    match parse_iso_date(raw) {
        Some(date) => ordinal_date(date),
        None => DATE_PLACEHOLDER.to_string(),
    }
}

pub fn ordinal_date(date: NaiveDate) -> String {
    let day = date.day();
    format!(
        "{day}{} day of {} {}",
        ordinal_suffix(day),
        month_name(date),
        date.year()
    )
}

/// `3rd June 2025`: the ordinal form without "day of", used for deadlines.
pub fn format_deadline(raw: &str) -> String {
    if raw.trim().is_empty() {
        return INLINE_BLANK.to_string();
    }
    format_date_with_ordinal(raw).replacen(" day of ", " ", 1)
}

/// Long British form, `3 June 2025`. Empty for empty/unparseable input.
pub fn format_date(raw: &str) -> String {
    parse_iso_date(raw).map(long_date).unwrap_or_default()
}

pub fn long_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), month_name(date), date.year())
}

/// Last day of a lease: the anniversary of `start` after the term, minus one day.
///
/// A start day the target month lacks rolls over into the following month:
/// a year from 29 February is 1 March, so the lease ends 28 February, and a
/// month from 31 January is 3 March, so it ends 2 March. Nothing is clamped,
/// so a lease never loses a day.
pub fn lease_end_date(start: NaiveDate, value: u32, unit: DurationUnit) -> Option<NaiveDate> {
    let months = match unit {
        DurationUnit::Months => value,
        DurationUnit::Years => value.checked_mul(12)?,
    };
    let anniversary = start
        .with_day(1)?
        .checked_add_months(Months::new(months))?
        .checked_add_days(Days::new(u64::from(start.day0())))?;
    anniversary.pred_opt()
}

/// Formatted end date for a lease, or an empty string when the start date is unusable.
pub fn calculate_end_date(start: &str, value: u32, unit: DurationUnit) -> String {
    parse_iso_date(start)
        .and_then(|date| lease_end_date(date, value, unit))
        .map(long_date)
        .unwrap_or_default()
}
