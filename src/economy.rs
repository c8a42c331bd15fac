//! Coins, unlocks and the equipped character
//!
//! Coins earned in a run are credited to the wallet when it ends. The wallet
//! buys characters from the roster; only owned characters can be equipped.

use std::fmt;

use crate::character::{CharacterId, CharacterProfile, profile};
use crate::storage::KeyValueStore;

pub const WALLET_KEY: &str = "rudolph_wallet";
pub const INVENTORY_KEY: &str = "rudolph_inventory";
pub const EQUIP_KEY: &str = "rudolph_equip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    UnknownCharacter(String),
    AlreadyOwned(CharacterId),
    InsufficientFunds { cost: u64, balance: u64 },
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::UnknownCharacter(id) => write!(f, "unknown character '{id}'"),
            PurchaseError::AlreadyOwned(id) => write!(f, "{} is already owned", id.as_str()),
            PurchaseError::InsufficientFunds { cost, balance } => {
                write!(f, "costs {cost} coins but the wallet holds {balance}")
            }
        }
    }
}

impl std::error::Error for PurchaseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipError {
    UnknownCharacter(String),
    NotOwned(CharacterId),
}

impl fmt::Display for EquipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipError::UnknownCharacter(id) => write!(f, "unknown character '{id}'"),
            EquipError::NotOwned(id) => write!(f, "{} is not owned", id.as_str()),
        }
    }
}

impl std::error::Error for EquipError {}

/// Wallet, inventory and equipped character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Economy {
    pub wallet: u64,
    /// Owned characters in purchase order; always contains the starter
    pub inventory: Vec<CharacterId>,
    pub equipped: CharacterId,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            wallet: 0,
            inventory: vec![CharacterId::default()],
            equipped: CharacterId::default(),
        }
    }
}

impl Economy {
    /// Load from storage; anything missing or unreadable falls back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        let mut economy = Self::default();

        if let Some(raw) = store.get(WALLET_KEY) {
            match raw.trim().parse::<u64>() {
                Ok(wallet) => economy.wallet = wallet,
                Err(_) => log::warn!("Ignoring corrupt wallet value {raw:?}"),
            }
        }

        if let Some(raw) = store.get(INVENTORY_KEY) {
            match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => {
                    // Unknown ids are skipped, not fatal
                    for id in ids.iter().filter_map(|s| CharacterId::from_id(s)) {
                        if !economy.inventory.contains(&id) {
                            economy.inventory.push(id);
                        }
                    }
                }
                Err(e) => log::warn!("Ignoring corrupt inventory: {e}"),
            }
        }

        if let Some(raw) = store.get(EQUIP_KEY) {
            match CharacterId::from_id(&raw) {
                Some(id) if economy.owns(id) => economy.equipped = id,
                _ => log::warn!("Ignoring invalid equipped character {raw:?}"),
            }
        }

        economy
    }

    pub fn save(&self, store: &impl KeyValueStore) {
        store.set(WALLET_KEY, &self.wallet.to_string());
        match serde_json::to_string(&self.inventory) {
            Ok(json) => store.set(INVENTORY_KEY, &json),
            Err(e) => log::warn!("Failed to serialise inventory: {e}"),
        }
        store.set(EQUIP_KEY, self.equipped.as_str());
    }

    pub fn owns(&self, id: CharacterId) -> bool {
        self.inventory.contains(&id)
    }

    /// Add coins earned in a run
    pub fn credit(&mut self, coins: u32) {
        if coins > 0 {
            self.wallet = self.wallet.saturating_add(u64::from(coins));
            log::info!("Credited {coins} coins, wallet now {}", self.wallet);
        }
    }

    /// Buy a character by id
    pub fn purchase(&mut self, id: &str) -> Result<&'static CharacterProfile, PurchaseError> {
        let id = CharacterId::from_id(id)
            .ok_or_else(|| PurchaseError::UnknownCharacter(id.to_string()))?;
        if self.owns(id) {
            return Err(PurchaseError::AlreadyOwned(id));
        }

        let character = profile(id);
        if self.wallet < character.cost {
            return Err(PurchaseError::InsufficientFunds {
                cost: character.cost,
                balance: self.wallet,
            });
        }

        self.wallet -= character.cost;
        self.inventory.push(id);
        log::info!("Purchased {} for {} coins", character.name, character.cost);
        Ok(character)
    }

    /// Equip an owned character by id
    pub fn equip(&mut self, id: &str) -> Result<(), EquipError> {
        let id =
            CharacterId::from_id(id).ok_or_else(|| EquipError::UnknownCharacter(id.to_string()))?;
        if !self.owns(id) {
            return Err(EquipError::NotOwned(id));
        }
        self.equipped = id;
        log::info!("Equipped {}", id.as_str());
        Ok(())
    }

    /// Profile of the equipped character
    pub fn active_character(&self) -> &'static CharacterProfile {
        profile(self.equipped)
    }
}
