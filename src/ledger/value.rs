//! Multi-asset quantities: the ledger `Value` carried by outputs and the wide
//! `ValueSum` accumulator used for payout totals and fees.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::error::MarketError;

/// Policy (minting script) hash.
pub type PolicyId = [u8; 28];

/// A token class: minting policy plus asset name. Lovelace is not an `AssetClass`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetClass {
    pub policy_id: PolicyId,
    pub asset_name: Vec<u8>,
}

impl AssetClass {
    pub fn new(policy_id: PolicyId, asset_name: &[u8]) -> Self {
        Self {
            policy_id,
            asset_name: asset_name.to_vec(),
        }
    }
}

/// Ledger value: lovelace plus token quantities.
/// Canonical: the asset map never holds a zero quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    lovelace: u64,
    assets: BTreeMap<AssetClass, u64>,
}

impl Value {
    pub const fn from_lovelace(lovelace: u64) -> Self {
        Self {
            lovelace,
            assets: BTreeMap::new(),
        }
    }

    /// Builder form of [`Value::insert_asset`].
    pub fn with_asset(mut self, policy_id: PolicyId, asset_name: &[u8], quantity: u64) -> Self {
        self.insert_asset(AssetClass::new(policy_id, asset_name), quantity);
        self
    }

    /// Sets the quantity of `class`. A zero quantity removes the class.
    /// Returns the previous quantity, if any.
    pub fn insert_asset(&mut self, class: AssetClass, quantity: u64) -> Option<u64> {
        if quantity == 0 {
            self.assets.remove(&class)
        } else {
            self.assets.insert(class, quantity)
        }
    }

    pub const fn lovelace(&self) -> u64 {
        self.lovelace
    }

    pub fn quantity_of(&self, class: &AssetClass) -> u64 {
        self.assets.get(class).copied().unwrap_or(0)
    }

    /// Token entries in ascending `AssetClass` order.
    pub fn assets(&self) -> impl Iterator<Item = (&AssetClass, u64)> + '_ {
        self.assets.iter().map(|(class, qty)| (class, *qty))
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// True when `self` holds at least `required` of lovelace and of every token
    /// class named in `required`. Classes absent from `required` are ignored.
    pub fn covers(&self, required: &Value) -> bool {
        self.lovelace >= required.lovelace
            && required
                .assets
                .iter()
                .all(|(class, qty)| self.quantity_of(class) >= *qty)
    }
}

/// Multi-asset accumulator with 128-bit quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSum {
    lovelace: u128,
    assets: BTreeMap<AssetClass, u128>,
}

impl ValueSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every asset class of `value` independently.
    pub fn add(&mut self, value: &Value) -> Result<(), MarketError> {
        self.lovelace = self
            .lovelace
            .checked_add(u128::from(value.lovelace))
            .ok_or(MarketError::ArithmeticOverflow)?;
        for (class, qty) in value.assets() {
            let slot = self.assets.entry(class.clone()).or_insert(0);
            *slot = slot
                .checked_add(u128::from(qty))
                .ok_or(MarketError::ArithmeticOverflow)?;
        }
        Ok(())
    }

    pub const fn lovelace(&self) -> u128 {
        self.lovelace
    }

    pub fn quantity_of(&self, class: &AssetClass) -> u128 {
        self.assets.get(class).copied().unwrap_or(0)
    }

    pub fn assets(&self) -> impl Iterator<Item = (&AssetClass, u128)> + '_ {
        self.assets.iter().map(|(class, qty)| (class, *qty))
    }

    pub fn is_zero(&self) -> bool {
        self.lovelace == 0 && self.assets.values().all(|qty| *qty == 0)
    }

    /// Applies `f` to lovelace and to each token quantity, dropping zero results.
    pub fn try_map<F>(&self, f: F) -> Result<ValueSum, MarketError>
    where
        F: Fn(u128) -> Result<u128, MarketError>,
    {
        let mut out = ValueSum {
            lovelace: f(self.lovelace)?,
            assets: BTreeMap::new(),
        };
        for (class, qty) in &self.assets {
            let mapped = f(*qty)?;
            if mapped != 0 {
                out.assets.insert(class.clone(), mapped);
            }
        }
        Ok(out)
    }

    /// True when `value` holds at least this sum for every asset class.
    pub fn is_covered_by(&self, value: &Value) -> bool {
        u128::from(value.lovelace()) >= self.lovelace
            && self
                .assets
                .iter()
                .all(|(class, qty)| u128::from(value.quantity_of(class)) >= *qty)
    }
}
