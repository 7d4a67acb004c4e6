use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Flat tax rate applied to every booking after discounts.
pub const TAX_RATE: Decimal = dec!(0.13);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Finalizes a discounted subtotal into the authoritative booking total.
/// Client-submitted totals are never trusted; this output is what gets
/// persisted.
pub fn finalize_price(discounted_amount: Decimal) -> PriceBreakdown {
    let tax_amount = discounted_amount * TAX_RATE;
    PriceBreakdown {
        tax_amount,
        total_amount: discounted_amount + tax_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_is_thirteen_percent() {
        let p = finalize_price(dec!(1800));
        assert_eq!(p.tax_amount, dec!(234));
        assert_eq!(p.total_amount, dec!(2034));
    }

    #[test]
    fn zero_subtotal_yields_zero_total() {
        let p = finalize_price(Decimal::ZERO);
        assert_eq!(p.total_amount, Decimal::ZERO);
    }

    #[test]
    fn total_equals_subtotal_times_one_point_thirteen() {
        let d = dec!(1234.56);
        let p = finalize_price(d);
        assert_eq!(p.total_amount, d * dec!(1.13));
    }
}
