//! Values that depend on other form fields. Everything here is recomputed on
//! demand from the raw record; nothing is cached on the record itself.

use super::domain::{DurationUnit, RentFrequency, TenancyRecord};
use super::format::{INLINE_BLANK, SIGNATURE_BLANK};

/// Rent periods covered by the lease term. May be fractional (yearly rent over a
/// term counted in months); rounding happens only when amounts become words.
pub fn periods_in_term(frequency: RentFrequency, duration_value: u32, unit: DurationUnit) -> f64 {
    let value = f64::from(duration_value);
    match (frequency, unit) {
        (RentFrequency::Month, DurationUnit::Years) => value * 12.0,
        (RentFrequency::Month, DurationUnit::Months) => value,
        (RentFrequency::Year, DurationUnit::Years) => value,
        (RentFrequency::Year, DurationUnit::Months) => value / 12.0,
    }
}

pub fn total_rent(record: &TenancyRecord) -> f64 {
    record.rent_amount
        * periods_in_term(
            record.rent_frequency,
            record.duration_value,
            record.duration_unit,
        )
}

pub fn has_caution_fee(caution_fee: f64) -> bool {
    caution_fee > 0.0
}

/// Heading number of the ADDITIONAL TERMS section: the slot after RENT and,
/// when present, CAUTION FEE.
pub fn additional_terms_number(caution_fee: f64) -> u32 {
    if has_caution_fee(caution_fee) {
        5
    } else {
        4
    }
}

/// `max(0, total - paid)`. Overpayment floors at zero; non-finite input counts as nothing owed.
pub fn outstanding_balance(total_price: f64, amount_paid: f64) -> f64 {
    let balance = total_price - amount_paid;
    if balance.is_finite() && balance > 0.0 {
        balance
    } else {
        0.0
    }
}

/// Empty strings and the literal `N/A` both mean "to be filled in by hand".
pub fn is_blank(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "N/A"
}

/// Value for running text, or a short blank line.
pub fn inline_or_blank(value: &str) -> &str {
    if is_blank(value) {
        INLINE_BLANK
    } else {
        value.trim()
    }
}

/// Name for a signature block, or a long blank line.
pub fn display_name(value: &str) -> &str {
    if is_blank(value) {
        SIGNATURE_BLANK
    } else {
        value.trim()
    }
}

/// ` (0244000000)` when disclosure is on and both name and phone are real values.
///
/// A placeholder name suppresses the phone even when disclosure is on.
pub fn contact_suffix(name: &str, phone: &str, disclose: bool) -> String {
    if !disclose || is_blank(name) || is_blank(phone) {
        return String::new();
    }
    format!(" ({})", phone.trim())
}
