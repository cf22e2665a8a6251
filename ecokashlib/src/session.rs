//! Сессия пользователя: обработчики экранов поверх кошелька, бака и навигации.

use crate::{
    catalog,
    collection::{ActiveBin, CollectionLifecycle},
    error::{EcoError, Result},
    model::{money, EntryKind, EntryMeta, LedgerEntry, UserProfile},
    router::{DepositStep, Router, Screen},
    traits::TransactionAttestor,
    wallet::Wallet,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Recipient {
    Mobile { provider: String, phone: Option<String>, agent_code: Option<String> },
    Bank { bank: String, account_number: String, account_name: String },
}

impl Recipient {
    fn validate(&self) -> Result<()> {
        match self {
            Recipient::Mobile { phone, agent_code, .. } => {
                if is_blank(phone) && is_blank(agent_code) {
                    return Err(EcoError::MissingDetails("Please enter a phone number or agent code"));
                }
            }
            Recipient::Bank { account_number, account_name, .. } => {
                if account_number.trim().is_empty() || account_name.trim().is_empty() {
                    return Err(EcoError::MissingDetails("Please fill in all bank details"));
                }
            }
        }
        Ok(())
    }

    fn label(&self) -> String {
        match self {
            Recipient::Mobile { agent_code: Some(code), .. } if !code.trim().is_empty() => format!("Agent {code}"),
            Recipient::Mobile { phone, .. } => phone.clone().unwrap_or_default(),
            Recipient::Bank { account_name, .. } => account_name.clone(),
        }
    }

    fn provider(&self) -> &str {
        match self {
            Recipient::Mobile { provider, .. } => provider,
            Recipient::Bank { bank, .. } => bank,
        }
    }
}

/// Действие пользователя в сценарии (для прогона сессии из файла).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    Navigate { screen: Screen },
    Deposit { location: String, recyclable: String, quantity: u32 },
    Transfer { recipient: Recipient, amount: Decimal },
    Pay { service: String, provider: String, amount: Decimal },
    Donate { charity: String, amount: Decimal },
    PurchaseBin,
    Collect { amount: Decimal, items: u32 },
}

/// Сценарий задаётся JSON-массивом действий.
pub fn read_script<R: std::io::Read>(r: R) -> Result<Vec<Action>> {
    Ok(serde_json::from_reader(r)?)
}

fn is_blank(v: &Option<String>) -> bool {
    v.as_deref().map_or(true, |s| s.trim().is_empty())
}

pub struct Session<A> {
    attestor: A,
    router: Router,
    wallet: Wallet,
    collection: CollectionLifecycle,
    profile: Option<UserProfile>,
}

impl<A: TransactionAttestor> Session<A> {
    pub fn new(attestor: A) -> Self {
        Self {
            attestor,
            router: Router::new(),
            wallet: Wallet::new(),
            collection: CollectionLifecycle::NoBin,
            profile: None,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn collection(&self) -> &CollectionLifecycle {
        &self.collection
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn balance(&self) -> Decimal {
        self.wallet.balance()
    }

    pub fn sign_up(&mut self, profile: UserProfile) {
        tracing::info!(user = %profile.id, "signed up");
        self.start(profile);
    }

    pub fn log_in(&mut self, profile: UserProfile) {
        tracing::info!(user = %profile.id, "logged in");
        self.start(profile);
    }

    fn start(&mut self, profile: UserProfile) {
        self.wallet.reseed(profile.wallet_balance);
        self.collection = CollectionLifecycle::NoBin;
        self.profile = Some(profile);
        self.router.navigate(Screen::Home);
    }

    /// Сервер считается источником истины, после серверной операции кошелёк пересобирается из профиля.
    pub fn refresh(&mut self, profile: UserProfile) {
        tracing::debug!(user = %profile.id, balance = %profile.wallet_balance, "wallet refreshed from profile");
        self.wallet.reseed(profile.wallet_balance);
        self.profile = Some(profile);
    }

    pub fn log_out(&mut self) {
        self.profile = None;
        self.wallet = Wallet::new();
        self.collection = CollectionLifecycle::NoBin;
        self.router.navigate(Screen::Login);
    }

    pub fn deposit(&mut self, location_id: &str, recyclable_id: &str, quantity: u32) -> Result<LedgerEntry> {
        let location = catalog::location(location_id)
            .ok_or_else(|| EcoError::NotFound(format!("RVM location {location_id}")))?;
        let recyclable = catalog::recyclable(recyclable_id)
            .ok_or_else(|| EcoError::NotFound(format!("recyclable type {recyclable_id}")))?;

        let meta = EntryMeta::new(
            EntryKind::Deposit,
            "Deposit Successful",
            format!("Deposited {quantity} {} at {}", recyclable.name, location.name),
        )
        .with_icon(recyclable.icon);
        self.wallet.credit(&self.attestor, recyclable.reward(quantity), meta)
    }

    /// Начисление по подтверждённому шагу сценария депозита.
    pub fn complete_deposit(&mut self) -> Result<LedgerEntry> {
        let DepositStep::Confirm { location, recyclable, quantity } = self.router.deposit_flow().step() else {
            return Err(EcoError::InvalidStep("deposit is not confirmed"));
        };
        let entry = self.deposit(location.id, recyclable.id, quantity)?;
        self.router.deposit_flow().reset();
        Ok(entry)
    }

    pub fn transfer(&mut self, recipient: &Recipient, amount: Decimal) -> Result<LedgerEntry> {
        self.precheck(amount)?;
        recipient.validate()?;
        let meta = EntryMeta::new(
            EntryKind::Transfer,
            "Transfer Sent",
            format!("Transferred ${} to {} via {}", money(amount), recipient.label(), recipient.provider()),
        );
        self.wallet.debit(&self.attestor, amount, meta)
    }

    pub fn pay(&mut self, service: &str, provider: &str, amount: Decimal) -> Result<LedgerEntry> {
        let meta = EntryMeta::new(EntryKind::Payment, format!("{service} Payment"), format!("Paid ${} to {provider}", money(amount)));
        self.wallet.debit(&self.attestor, amount, meta)
    }

    pub fn donate(&mut self, charity: &str, amount: Decimal) -> Result<LedgerEntry> {
        if amount <= Decimal::ZERO {
            return Err(EcoError::Declined("Please enter a valid donation amount"));
        }
        if amount > self.wallet.balance() {
            return Err(EcoError::Declined("Insufficient balance. Please enter a lower amount."));
        }
        let meta = EntryMeta::new(EntryKind::Donation, "Donation Sent", format!("Donated ${} to {charity}", money(amount)));
        self.wallet.debit(&self.attestor, amount, meta)
    }

    pub fn purchase_bin(&mut self) -> ActiveBin {
        self.purchase_bin_at(Utc::now())
    }

    pub fn purchase_bin_at(&mut self, now: DateTime<Utc>) -> ActiveBin {
        self.collection.purchase_bin(now)
    }

    pub fn record_collection(&mut self, amount: Decimal, items: u32) -> Result<LedgerEntry> {
        self.record_collection_at(amount, items, Utc::now())
    }

    pub fn record_collection_at(&mut self, amount: Decimal, items: u32, now: DateTime<Utc>) -> Result<LedgerEntry> {
        let bin = self.collection.require_active()?;
        bin.record_collection(&mut self.wallet, &self.attestor, amount, items, now)
    }

    pub fn apply(&mut self, action: &Action) -> Result<Option<LedgerEntry>> {
        let entry = match action {
            Action::Navigate { screen } => {
                self.router.navigate(*screen);
                return Ok(None);
            }
            Action::PurchaseBin => {
                self.purchase_bin();
                return Ok(None);
            }
            Action::Deposit { location, recyclable, quantity } => self.deposit(location, recyclable, *quantity)?,
            Action::Transfer { recipient, amount } => self.transfer(recipient, *amount)?,
            Action::Pay { service, provider, amount } => self.pay(service, provider, *amount)?,
            Action::Donate { charity, amount } => self.donate(charity, *amount)?,
            Action::Collect { amount, items } => self.record_collection(*amount, *items)?,
        };
        Ok(Some(entry))
    }

    // порядок проверок как на экране: сумма, баланс, затем реквизиты
    fn precheck(&self, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(EcoError::InvalidAmount);
        }
        let available = self.wallet.balance();
        if amount > available {
            return Err(EcoError::InsufficientFunds { requested: amount, available });
        }
        Ok(())
    }
}
