//! Навигация: закрытый набор экранов и линейные под-сценарии внутри них.

use crate::{
    catalog::{self, RecyclableType, RvmLocation},
    error::{EcoError, Result},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Onboarding,
    Signup,
    Login,
    Home,
    Deposit,
    Collection,
    Wallet,
    Impact,
    Education,
    Profile,
    Charity,
    Transfer,
    Payments,
    ServiceRequest,
}

impl Screen {
    pub const ALL: [Screen; 14] = [
        Screen::Onboarding,
        Screen::Signup,
        Screen::Login,
        Screen::Home,
        Screen::Deposit,
        Screen::Collection,
        Screen::Wallet,
        Screen::Impact,
        Screen::Education,
        Screen::Profile,
        Screen::Charity,
        Screen::Transfer,
        Screen::Payments,
        Screen::ServiceRequest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Onboarding => "onboarding",
            Screen::Signup => "signup",
            Screen::Login => "login",
            Screen::Home => "home",
            Screen::Deposit => "deposit",
            Screen::Collection => "collection",
            Screen::Wallet => "wallet",
            Screen::Impact => "impact",
            Screen::Education => "education",
            Screen::Profile => "profile",
            Screen::Charity => "charity",
            Screen::Transfer => "transfer",
            Screen::Payments => "payments",
            Screen::ServiceRequest => "service-request",
        }
    }

    /// Нижняя панель скрыта на онбординге, авторизации и экранах операций.
    pub fn shows_bottom_nav(self) -> bool {
        !matches!(
            self,
            Screen::Onboarding
                | Screen::Signup
                | Screen::Login
                | Screen::Deposit
                | Screen::Collection
                | Screen::Transfer
                | Screen::Payments
                | Screen::Charity
                | Screen::ServiceRequest
        )
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = EcoError;

    fn from_str(s: &str) -> Result<Self> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| EcoError::Parse(format!("unknown screen: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepositStep {
    Locations,
    Select { location: &'static RvmLocation },
    Scan { location: &'static RvmLocation, recyclable: &'static RecyclableType, quantity: u32 },
    Confirm { location: &'static RvmLocation, recyclable: &'static RecyclableType, quantity: u32 },
}

/// locations -> select -> scan -> confirm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepositFlow {
    step: DepositStep,
}

impl Default for DepositFlow {
    fn default() -> Self {
        Self { step: DepositStep::Locations }
    }
}

impl DepositFlow {
    pub fn step(&self) -> DepositStep {
        self.step
    }

    pub fn select_location(&mut self, id: &str) -> Result<()> {
        if self.step != DepositStep::Locations {
            return Err(EcoError::InvalidStep("location already selected"));
        }
        let location = catalog::location(id).ok_or_else(|| EcoError::NotFound(format!("RVM location {id}")))?;
        self.step = DepositStep::Select { location };
        Ok(())
    }

    pub fn select_type(&mut self, id: &str) -> Result<()> {
        let DepositStep::Select { location } = self.step else {
            return Err(EcoError::InvalidStep("select a location first"));
        };
        let recyclable = catalog::recyclable(id).ok_or_else(|| EcoError::NotFound(format!("recyclable type {id}")))?;
        self.step = DepositStep::Scan { location, recyclable, quantity: 1 };
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: u32) -> Result<()> {
        match &mut self.step {
            DepositStep::Scan { quantity: q, .. } => {
                *q = quantity.max(1);
                Ok(())
            }
            _ => Err(EcoError::InvalidStep("quantity is chosen while scanning")),
        }
    }

    /// Завершает сканирование; возвращает награду за депозит.
    pub fn confirm(&mut self) -> Result<Decimal> {
        let DepositStep::Scan { location, recyclable, quantity } = self.step else {
            return Err(EcoError::InvalidStep("scan before confirming"));
        };
        self.step = DepositStep::Confirm { location, recyclable, quantity };
        Ok(recyclable.reward(quantity))
    }

    /// Подтверждённый депозит начисляется один раз, дальше сценарий начинается с выбора автомата.
    pub fn reset(&mut self) {
        self.step = DepositStep::Locations;
    }
}

pub const ONBOARDING_STEPS: u8 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnboardingFlow {
    step: u8,
}

impl OnboardingFlow {
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn is_last(&self) -> bool {
        self.step + 1 >= ONBOARDING_STEPS
    }

    /// `true`, когда показан последний слайд и онбординг завершён.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return true;
        }
        self.step += 1;
        false
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    current: Screen,
    deposit: DepositFlow,
    onboarding: OnboardingFlow,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            current: Screen::Onboarding,
            deposit: DepositFlow::default(),
            onboarding: OnboardingFlow::default(),
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn navigate(&mut self, target: Screen) {
        tracing::debug!(from = %self.current, to = %target, "navigate");
        match target {
            Screen::Deposit => self.deposit = DepositFlow::default(),
            Screen::Onboarding => self.onboarding = OnboardingFlow::default(),
            _ => {}
        }
        self.current = target;
    }

    pub fn back(&mut self) {
        self.navigate(Screen::Home);
    }

    pub fn shows_bottom_nav(&self) -> bool {
        self.current.shows_bottom_nav()
    }

    pub fn deposit_flow(&mut self) -> &mut DepositFlow {
        &mut self.deposit
    }

    /// Следующий слайд онбординга, после последнего переход на главный экран.
    pub fn onboarding_next(&mut self) {
        if self.onboarding.next() {
            self.navigate(Screen::Home);
        }
    }

    pub fn onboarding_step(&self) -> u8 {
        self.onboarding.step()
    }
}
