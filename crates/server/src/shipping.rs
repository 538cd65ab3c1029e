//! Freight estimation.
//!
//! A pure calculation over a static per-UF rate table plus a volume
//! surcharge. There is no failure mode: unknown region codes fall back to a
//! default rate, so a quote always exists.

use rust_decimal::Decimal;
use serde::Serialize;

use jabuticaba_core::Uf;

/// Item count above which the volume surcharge applies.
const SURCHARGE_THRESHOLD: u32 = 3;

/// Surcharge per item beyond the threshold, in cents.
const SURCHARGE_CENTS_PER_ITEM: i64 = 500;

/// Rate applied when the region code is unknown, in cents.
const DEFAULT_RATE_CENTS: i64 = 5000;

/// Lead time quoted for unknown region codes.
const DEFAULT_LEAD_TIME: &str = "7-10 business days";

/// A freight quote: cost plus an estimated delivery window.
///
/// Value object only - recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuote {
    pub amount: Decimal,
    pub lead_time: String,
}

/// Base freight rate (cents) and lead time for a federative unit.
const fn base_rate(uf: Uf) -> (i64, &'static str) {
    match uf {
        // Sudeste
        Uf::SP => (2000, "3-5 business days"),
        Uf::RJ => (2500, "4-6 business days"),
        Uf::MG => (3000, "5-7 business days"),
        Uf::ES => (3500, "6-8 business days"),
        // Sul
        Uf::PR => (3500, "5-7 business days"),
        Uf::SC => (4000, "6-8 business days"),
        Uf::RS => (4500, "7-9 business days"),
        // Centro-Oeste
        Uf::GO => (4000, "6-8 business days"),
        Uf::MT => (5000, "8-10 business days"),
        Uf::MS => (4500, "7-9 business days"),
        Uf::DF => (4000, "6-8 business days"),
        // Nordeste
        Uf::BA => (4500, "7-9 business days"),
        Uf::SE => (5000, "8-10 business days"),
        Uf::AL => (5000, "8-10 business days"),
        Uf::PE => (5000, "8-10 business days"),
        Uf::PB => (5500, "9-11 business days"),
        Uf::RN => (5500, "9-11 business days"),
        Uf::CE => (6000, "10-12 business days"),
        Uf::PI => (6000, "10-12 business days"),
        Uf::MA => (6500, "11-13 business days"),
        // Norte
        Uf::TO => (6500, "11-13 business days"),
        Uf::PA => (7000, "12-14 business days"),
        Uf::AP => (7500, "13-15 business days"),
        Uf::RR => (8000, "14-16 business days"),
        Uf::AM => (8000, "14-16 business days"),
        Uf::AC => (8500, "15-17 business days"),
        Uf::RO => (7500, "13-15 business days"),
    }
}

/// Estimate freight for a destination region and a cart size.
///
/// `total_items` is the sum of all line quantities. Quantities above
/// [`SURCHARGE_THRESHOLD`] add a fixed per-unit surcharge. Region codes
/// that do not parse as a [`Uf`] get the default rate rather than an error.
#[must_use]
pub fn estimate(region: &str, total_items: u32) -> ShippingQuote {
    let (cents, lead_time) = region
        .parse::<Uf>()
        .map_or((DEFAULT_RATE_CENTS, DEFAULT_LEAD_TIME), base_rate);

    let extra_items = i64::from(total_items.saturating_sub(SURCHARGE_THRESHOLD));
    let amount = Decimal::new(cents + extra_items * SURCHARGE_CENTS_PER_ITEM, 2);

    ShippingQuote {
        amount,
        lead_time: lead_time.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sp_base_rate_at_or_under_threshold() {
        for items in [0, 1, 3] {
            let quote = estimate("SP", items);
            assert_eq!(quote.amount, Decimal::new(2000, 2), "items={items}");
            assert_eq!(quote.lead_time, "3-5 business days");
        }
    }

    #[test]
    fn test_surcharge_applies_per_extra_item() {
        // 5 items = 2 over the threshold = 2 x 5.00 on top of 20.00
        let quote = estimate("SP", 5);
        assert_eq!(quote.amount, Decimal::new(3000, 2));

        // 4 items = 1 over
        let quote = estimate("SP", 4);
        assert_eq!(quote.amount, Decimal::new(2500, 2));
    }

    #[test]
    fn test_remote_region_rate() {
        let quote = estimate("AC", 1);
        assert_eq!(quote.amount, Decimal::new(8500, 2));
        assert_eq!(quote.lead_time, "15-17 business days");
    }

    #[test]
    fn test_unknown_region_falls_back_to_default() {
        let quote = estimate("ZZ", 2);
        assert_eq!(quote.amount, Decimal::new(5000, 2));
        assert_eq!(quote.lead_time, DEFAULT_LEAD_TIME);

        let quote = estimate("", 2);
        assert_eq!(quote.amount, Decimal::new(5000, 2));
    }

    #[test]
    fn test_unknown_region_still_gets_surcharge() {
        let quote = estimate("ZZ", 6);
        assert_eq!(quote.amount, Decimal::new(6500, 2));
    }

    #[test]
    fn test_region_parse_is_case_insensitive() {
        assert_eq!(estimate("sp", 1), estimate("SP", 1));
    }

    #[test]
    fn test_every_uf_has_a_rate() {
        for uf in jabuticaba_core::Uf::ALL {
            let quote = estimate(uf.as_str(), 1);
            assert!(quote.amount > Decimal::ZERO);
            assert!(!quote.lead_time.is_empty());
        }
    }
}
