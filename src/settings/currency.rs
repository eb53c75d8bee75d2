//! Locale-aware currency formatting.

use numfmt::{Formatter, Precision};

use crate::settings::{Currency, Language};

/// Format `amount` for the given (language, currency) pair with exactly
/// two fraction digits.
///
/// English uses comma grouping with a leading symbol (`$1,234.50`);
/// Ukrainian uses space grouping, a decimal comma and a trailing symbol
/// (`1 234,50 ₴`). Negative amounts are rendered with a leading minus
/// before the symbol, e.g. `-$75.50`.
pub fn format_currency(language: Language, currency: Currency, amount: f64) -> String {
    let group_separator = match language {
        Language::En => ',',
        Language::Uk => ' ',
    };

    let decimal_separator = match language {
        Language::En => '.',
        Language::Uk => ',',
    };

    // Work in whole cents so binary floats such as 20510.65 cannot lose
    // their last cent, then let numfmt group the integer part. numfmt
    // drops trailing fraction zeros, so the cents are appended manually
    // to guarantee exactly two digits.
    let total_cents = (amount.abs() * 100.0).round() as i64;
    let whole = total_cents / 100;
    let cents = total_cents % 100;

    let formatter = Formatter::new()
        .separator(group_separator)
        .expect("the group separator is a valid separator character")
        .precision(Precision::Decimals(0));
    let grouped = formatter.fmt_string(whole as f64);

    let number = format!("{grouped}{decimal_separator}{cents:02}");

    let sign = if amount < 0.0 { "-" } else { "" };
    let symbol = currency.symbol();

    match language {
        Language::En => format!("{sign}{symbol}{number}"),
        Language::Uk => format!("{sign}{number} {symbol}"),
    }
}

#[cfg(test)]
mod tests {
    use super::format_currency;
    use crate::settings::{Currency, Language};

    #[test]
    fn english_dollars_use_comma_grouping_and_a_leading_symbol() {
        assert_eq!(
            format_currency(Language::En, Currency::Usd, 1234.5),
            "$1,234.50"
        );
    }

    #[test]
    fn ukrainian_hryvnia_uses_space_grouping_and_a_trailing_symbol() {
        assert_eq!(
            format_currency(Language::Uk, Currency::Uah, 1234.5),
            "1 234,50 ₴"
        );
    }

    #[test]
    fn always_two_fraction_digits() {
        assert_eq!(format_currency(Language::En, Currency::Usd, 0.0), "$0.00");
        assert_eq!(format_currency(Language::En, Currency::Usd, 12.0), "$12.00");
        assert_eq!(format_currency(Language::En, Currency::Usd, 12.3), "$12.30");
        // Half cents round away from zero.
        assert_eq!(
            format_currency(Language::En, Currency::Usd, 12.345),
            "$12.35"
        );
    }

    #[test]
    fn negative_amounts_lead_with_a_minus() {
        assert_eq!(
            format_currency(Language::En, Currency::Usd, -75.5),
            "-$75.50"
        );
        assert_eq!(
            format_currency(Language::Uk, Currency::Uah, -75.5),
            "-75,50 ₴"
        );
    }

    #[test]
    fn every_currency_has_a_distinct_symbol() {
        assert_eq!(format_currency(Language::En, Currency::Eur, 1.0), "€1.00");
        assert_eq!(format_currency(Language::En, Currency::Uah, 1.0), "₴1.00");
    }

    #[test]
    fn large_totals_keep_their_cents() {
        assert_eq!(
            format_currency(Language::En, Currency::Usd, 20510.65),
            "$20,510.65"
        );
    }
}
