// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stock availability checks against variant inventory snapshots.

use dukkan_core::types::Variant;

/// Result of checking a variant against a requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityCheck {
    pub available: bool,
    /// Units left after subtracting reservations; can go negative when
    /// reservations outrun the physical count.
    pub remaining: i64,
}

/// Whether `requested` units of this variant can be sold right now.
pub fn check_availability(variant: &Variant, requested: u32) -> AvailabilityCheck {
    let remaining = variant.available();
    AvailabilityCheck {
        available: remaining >= i64::from(requested),
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use dukkan_core::types::{ProductId, VariantId};

    use super::*;

    fn variant(on_hand: i64, reserved: i64) -> Variant {
        Variant {
            id: VariantId(1),
            product_id: ProductId(1),
            color: None,
            size: None,
            price: None,
            on_hand,
            reserved,
        }
    }

    #[test]
    fn reservations_reduce_what_is_sellable() {
        let check = check_availability(&variant(5, 3), 2);
        assert!(check.available);
        assert_eq!(check.remaining, 2);

        let check = check_availability(&variant(5, 3), 3);
        assert!(!check.available);
    }

    #[test]
    fn zero_stock_is_unavailable_for_any_positive_quantity() {
        let check = check_availability(&variant(0, 0), 1);
        assert!(!check.available);
        assert_eq!(check.remaining, 0);
    }

    #[test]
    fn oversold_inventory_reports_negative_remaining() {
        let check = check_availability(&variant(2, 5), 1);
        assert!(!check.available);
        assert_eq!(check.remaining, -3);
    }
}
