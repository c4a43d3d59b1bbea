//! Vendor selection.

use core::cmp::Ordering;

use restock_core::{DomainError, DomainResult};
use restock_inventory::{InventoryItem, VendorOffer};

/// Pick the offer to order from.
///
/// Only offers whose vendor is listed in `item.vendor_ids` are eligible.
/// Among those, the total order is:
/// 1. lowest price
/// 2. highest reliability score
/// 3. shortest lead time
/// 4. earliest position in `item.vendor_ids`
/// 5. earliest position in `offers`
///
/// Fails with a configuration error when no eligible offer exists, and with a
/// validation error when an eligible offer is malformed.
pub fn select_vendor<'a>(
    item: &InventoryItem,
    offers: &'a [VendorOffer],
) -> DomainResult<&'a VendorOffer> {
    let mut best: Option<Candidate<'a>> = None;

    for (position, offer) in offers.iter().enumerate() {
        let Some(rank) = item.vendor_ids.iter().position(|v| *v == offer.vendor_id) else {
            continue;
        };
        offer.validate()?;

        let candidate = Candidate {
            rank,
            position,
            offer,
        };
        let replace = match &best {
            None => true,
            Some(current) => candidate.cmp(current) == Ordering::Less,
        };
        if replace {
            best = Some(candidate);
        }
    }

    best.map(|c| c.offer).ok_or_else(|| {
        DomainError::configuration(format!("no eligible vendor offer for SKU {}", item.sku))
    })
}

struct Candidate<'a> {
    rank: usize,
    position: usize,
    offer: &'a VendorOffer,
}

impl Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offer
            .price
            .total_cmp(&other.offer.price)
            .then_with(|| {
                other
                    .offer
                    .reliability_score
                    .total_cmp(&self.offer.reliability_score)
            })
            .then_with(|| self.offer.lead_time_days.cmp(&other.offer.lead_time_days))
            .then_with(|| self.rank.cmp(&other.rank))
            .then_with(|| self.position.cmp(&other.position))
    }
}
