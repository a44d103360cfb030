use crate::model::Amount;
use serde::Deserialize;

/// Delivery fee lookup, consulted once per order.
pub trait DeliveryZones: Send + Sync {
    fn fee_for_address(&self, address: &str) -> Amount;
}

/// A named area and the address keywords (districts, landmarks) that place an address in it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliveryZone {
    pub name: String,
    pub keywords: Vec<String>,
    pub fee: Amount,
}

/// First zone whose keyword appears in the address wins; otherwise the default fee applies.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    zones: Vec<DeliveryZone>,
    default_fee: Amount,
}

impl ZoneTable {
    pub fn new(zones: Vec<DeliveryZone>, default_fee: Amount) -> Self {
        Self { zones, default_fee }
    }

    pub fn zone_for(&self, address: &str) -> Option<&DeliveryZone> {
        let address = address.to_lowercase();
        self.zones.iter().find(|zone| {
            zone.keywords
                .iter()
                .any(|k| !k.is_empty() && address.contains(&k.to_lowercase()))
        })
    }
}

impl DeliveryZones for ZoneTable {
    fn fee_for_address(&self, address: &str) -> Amount {
        self.zone_for(address)
            .map_or(self.default_fee, |zone| zone.fee)
    }
}
