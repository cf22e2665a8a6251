//! Чтение статуса подписи через JSON-RPC Solana. Только чтение, в реестр ничего не пишем.

use crate::error::{EcoError, Result};
use serde::Deserialize;
use serde_json::json;

pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    Processed,
    Confirmed,
    Finalized,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<RpcResult>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcResult {
    value: Vec<Option<SignatureStatus>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    confirmation_status: Option<ConfirmationStatus>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    message: String,
}

pub struct StatusClient {
    client: reqwest::Client,
    url: String,
}

impl StatusClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), url: url.into() }
    }

    pub fn devnet() -> Self {
        Self::new(DEVNET_RPC_URL)
    }

    pub async fn status(&self, signature: &str) -> Result<Option<ConfirmationStatus>> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getSignatureStatuses",
            "params": [[signature], { "searchTransactionHistory": true }],
        });
        let bytes = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| EcoError::Rpc(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| EcoError::Rpc(e.to_string()))?;
        parse_status(&bytes)
    }

    /// При любой ошибке `false`, подтверждение необязательно для работы кошелька.
    pub async fn is_confirmed(&self, signature: &str) -> bool {
        match self.status(signature).await {
            Ok(status) => matches!(status, Some(ConfirmationStatus::Confirmed | ConfirmationStatus::Finalized)),
            Err(e) => {
                tracing::warn!(error = %e, signature, "signature status check failed");
                false
            }
        }
    }
}

pub fn parse_status(bytes: &[u8]) -> Result<Option<ConfirmationStatus>> {
    let resp: RpcResponse = serde_json::from_slice(bytes)?;
    if let Some(err) = resp.error {
        return Err(EcoError::Rpc(err.message));
    }
    let result = resp.result.ok_or_else(|| EcoError::Rpc("empty response".into()))?;
    Ok(result.value.into_iter().next().flatten().and_then(|s| s.confirmation_status))
}
