//! Заглушка блокчейн-подписи: 88 символов base58.

use crate::{error::Result, model::EntryKind, traits::TransactionAttestor};
use rand::Rng;
use rust_decimal::Decimal;
use std::fmt;

pub const SIGNATURE_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
pub const SIGNATURE_LEN: usize = 88;

pub fn generate_signature() -> String {
    let mut rng = rand::thread_rng();
    (0..SIGNATURE_LEN)
        .map(|_| SIGNATURE_ALPHABET[rng.gen_range(0..SIGNATURE_ALPHABET.len())] as char)
        .collect()
}

/// Проверка формы (длина и алфавит), не подлинности.
pub fn is_signature(s: &str) -> bool {
    s.len() == SIGNATURE_LEN && s.bytes().all(|b| SIGNATURE_ALPHABET.contains(&b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cluster {
    #[default]
    Devnet,
    MainnetBeta,
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Devnet => f.write_str("devnet"),
            Cluster::MainnetBeta => f.write_str("mainnet-beta"),
        }
    }
}

pub fn explorer_url(signature: &str, cluster: Cluster) -> String {
    format!("https://explorer.solana.com/tx/{signature}?cluster={cluster}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockAttestor;

impl TransactionAttestor for MockAttestor {
    fn attest(&self, kind: EntryKind, amount: Decimal) -> Result<String> {
        let sig = generate_signature();
        tracing::debug!(%kind, %amount, signature = %sig, "issued mock signature");
        Ok(sig)
    }
}

/// Всегда одна и та же подпись; для тестов и воспроизводимых прогонов.
#[derive(Debug, Clone)]
pub struct FixedAttestor(pub String);

impl TransactionAttestor for FixedAttestor {
    fn attest(&self, _kind: EntryKind, _amount: Decimal) -> Result<String> {
        Ok(self.0.clone())
    }
}
