//! Balances and the product catalog
//!
//! Both live in one document (`store.json`). Every balance read-modify-write
//! runs under the document lock, so a check-and-decrement can never
//! interleave with another mutation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::application::errors::StoreError;
use crate::domain::entities::Product;
use crate::infrastructure::storage::JsonFile;

const CODE_LEN: usize = 3;
const CODE_SPACE: usize = 26 * 26 * 26;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreData {
    pub balances: BTreeMap<String, u64>,
    pub products: BTreeMap<String, Product>,
}

/// Returned by [`CommerceStore::reduce_balance`] when the balance would go negative
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("insufficient balance: have {balance}, need {requested}")]
pub struct InsufficientFunds {
    pub balance: u64,
    pub requested: u64,
}

pub struct CommerceStore {
    file: JsonFile<StoreData>,
}

impl CommerceStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::open(path, StoreData::default()),
        }
    }

    /// Current balance; unknown users have 0
    pub fn get_balance(&self, user_id: &str) -> u64 {
        self.file
            .read(|data| data.balances.get(user_id).copied())
            .unwrap_or(0)
    }

    /// Credit `amount`, returning the new balance
    pub fn add_balance(&self, user_id: &str, amount: u64) -> u64 {
        self.file.write(|data| {
            let balance = data.balances.entry(user_id.to_string()).or_insert(0);
            *balance = balance.saturating_add(amount);
            *balance
        })
    }

    /// Debit `amount` if the balance covers it, returning the new balance.
    /// An insufficient balance is left unchanged.
    pub fn reduce_balance(&self, user_id: &str, amount: u64) -> Result<u64, InsufficientFunds> {
        let mut shortfall = InsufficientFunds {
            balance: 0,
            requested: amount,
        };
        let reduced = self.file.try_write(|data| {
            let balance = data.balances.get(user_id).copied().unwrap_or(0);
            if balance < amount {
                shortfall.balance = balance;
                return None;
            }
            let remaining = balance - amount;
            data.balances.insert(user_id.to_string(), remaining);
            Some(remaining)
        });
        reduced.ok_or(shortfall)
    }

    /// Create a product under a fresh three-letter code
    pub fn add_product(&self, name: &str, price: u64) -> Result<Product, StoreError> {
        if price == 0 {
            return Err(StoreError::InvalidPrice(price));
        }
        let mut rng = rand::thread_rng();
        self.file
            .try_write(|data| {
                let code = generate_code(&data.products, &mut rng)?;
                let product = Product {
                    code: code.clone(),
                    name: name.to_string(),
                    price,
                };
                data.products.insert(code, product.clone());
                Some(product)
            })
            .ok_or(StoreError::ProductCodesExhausted)
    }

    /// Look up a product; codes are matched case-insensitively
    pub fn get_product(&self, code: &str) -> Option<Product> {
        let code = code.to_uppercase();
        self.file.read(|data| data.products.get(&code).cloned())
    }

    /// All products ordered by code
    pub fn get_all_products(&self) -> Vec<Product> {
        self.file.read(|data| data.products.values().cloned().collect())
    }

    pub fn delete_product(&self, code: &str) -> bool {
        let code = code.to_uppercase();
        self.file
            .try_write(|data| data.products.remove(&code).map(|_| ()))
            .is_some()
    }

    pub fn is_healthy(&self) -> bool {
        self.file.is_healthy()
    }
}

/// Draw random codes until one is unused; `None` once every code is taken
fn generate_code<R: Rng>(existing: &BTreeMap<String, Product>, rng: &mut R) -> Option<String> {
    if existing.len() >= CODE_SPACE {
        return None;
    }
    loop {
        let code: String = (0..CODE_LEN)
            .map(|_| char::from(b'A' + rng.gen_range(0..26u8)))
            .collect();
        if !existing.contains_key(&code) {
            return Some(code);
        }
    }
}

/// Render an amount as Indonesian Rupiah, e.g. `Rp 50.000`
pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp {}", grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn open_store() -> (tempfile::TempDir, CommerceStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = CommerceStore::open(dir.path().join("store.json"));
        (dir, store)
    }

    #[test]
    fn test_unknown_user_has_zero_balance() {
        let (_dir, store) = open_store();
        assert_eq!(store.get_balance("nobody"), 0);
    }

    #[test]
    fn test_balance_is_adds_minus_successful_reduces() {
        let (_dir, store) = open_store();
        let user = "628123@s.whatsapp.net";

        assert_eq!(store.add_balance(user, 50_000), 50_000);
        assert_eq!(store.reduce_balance(user, 30_000), Ok(20_000));
        assert_eq!(
            store.reduce_balance(user, 25_000),
            Err(InsufficientFunds {
                balance: 20_000,
                requested: 25_000
            })
        );
        assert_eq!(store.add_balance(user, 5_000), 25_000);
        assert_eq!(store.reduce_balance(user, 25_000), Ok(0));
        assert_eq!(store.get_balance(user), 0);
    }

    #[test]
    fn test_reduce_to_zero_differs_from_rejection() {
        let (_dir, store) = open_store();
        store.add_balance("u", 10);
        assert_eq!(store.reduce_balance("u", 10), Ok(0));
        assert!(store.reduce_balance("u", 1).is_err());
        assert_eq!(store.get_balance("u"), 0);
    }

    #[test]
    fn test_concurrent_reduces_never_overdraw() {
        let (_dir, store) = open_store();
        let store = Arc::new(store);
        store.add_balance("u", 100);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.reduce_balance("u", 30).is_ok())
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 3);
        assert_eq!(store.get_balance("u"), 10);
    }

    #[test]
    fn test_balances_survive_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("store.json");
        {
            let store = CommerceStore::open(&path);
            store.add_balance("u", 42);
            store.add_product("Netflix 1 Bulan", 30_000).expect("product");
        }
        let store = CommerceStore::open(&path);
        assert_eq!(store.get_balance("u"), 42);
        assert_eq!(store.get_all_products().len(), 1);
    }

    #[test]
    fn test_invalid_balance_record_keeps_original_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("store.json");
        let original = r#"{"balances":{"628111@s.whatsapp.net":50000,"628333@s.whatsapp.net":-5},"products":{}}"#;
        std::fs::write(&path, original).expect("write");

        let store = CommerceStore::open(&path);
        assert_eq!(store.get_balance("628111@s.whatsapp.net"), 0);

        let kept = std::fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").path())
            .find(|p| p.to_string_lossy().contains("store.json.corrupt-"))
            .expect("unreadable table kept");
        assert_eq!(std::fs::read_to_string(kept).expect("read"), original);
    }

    #[test]
    fn test_product_lifecycle() {
        let (_dir, store) = open_store();
        let product = store.add_product("Spotify Premium", 25_000).expect("product");

        assert_eq!(product.code.len(), 3);
        assert!(product.code.chars().all(|c| c.is_ascii_uppercase()));
        assert_eq!(store.get_product(&product.code.to_lowercase()), Some(product.clone()));

        assert!(store.delete_product(&product.code));
        assert!(!store.delete_product(&product.code));
        assert!(store.get_product(&product.code).is_none());
    }

    #[test]
    fn test_zero_price_rejected() {
        let (_dir, store) = open_store();
        assert_eq!(store.add_product("Free", 0), Err(StoreError::InvalidPrice(0)));
        assert!(store.get_all_products().is_empty());
    }

    #[test]
    fn test_generate_code_skips_taken_codes() {
        let mut existing = BTreeMap::new();
        for a in b'A'..=b'Z' {
            for b in b'A'..=b'Z' {
                for c in b'A'..=b'Z' {
                    let code = String::from_utf8(vec![a, b, c]).expect("ascii");
                    if code != "QRS" {
                        existing.insert(
                            code.clone(),
                            Product {
                                code,
                                name: String::new(),
                                price: 1,
                            },
                        );
                    }
                }
            }
        }
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(generate_code(&existing, &mut rng), Some("QRS".to_string()));

        existing.insert(
            "QRS".to_string(),
            Product {
                code: "QRS".to_string(),
                name: String::new(),
                price: 1,
            },
        );
        assert_eq!(generate_code(&existing, &mut rng), None);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0), "Rp 0");
        assert_eq!(format_money(999), "Rp 999");
        assert_eq!(format_money(50_000), "Rp 50.000");
        assert_eq!(format_money(1_234_567), "Rp 1.234.567");
    }
}
