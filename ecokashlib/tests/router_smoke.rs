use ecokashlib::{
    error::EcoError,
    router::{DepositStep, Router, Screen},
    session::Session,
    signature::FixedAttestor,
};
use rust_decimal::Decimal;

#[test]
fn every_screen_reachable_from_every_screen() {
    assert_eq!(Screen::ALL.len(), 14);
    for from in Screen::ALL {
        for to in Screen::ALL {
            let mut r = Router::new();
            r.navigate(from);
            r.navigate(to);
            assert_eq!(r.current(), to);
        }
    }
}

#[test]
fn starts_on_onboarding_and_back_goes_home() {
    let mut r = Router::new();
    assert_eq!(r.current(), Screen::Onboarding);
    assert!(!r.shows_bottom_nav());
    r.navigate(Screen::Wallet);
    assert!(r.shows_bottom_nav());
    r.back();
    assert_eq!(r.current(), Screen::Home);
}

#[test]
fn bottom_nav_hidden_on_flows() {
    for s in [Screen::Deposit, Screen::Collection, Screen::Login, Screen::Signup, Screen::Transfer] {
        assert!(!s.shows_bottom_nav(), "{s}");
    }
    for s in [Screen::Home, Screen::Wallet, Screen::Impact, Screen::Education, Screen::Profile] {
        assert!(s.shows_bottom_nav(), "{s}");
    }
}

#[test]
fn onboarding_completes_to_home() {
    let mut r = Router::new();
    r.onboarding_next();
    r.onboarding_next();
    assert_eq!(r.onboarding_step(), 2);
    assert_eq!(r.current(), Screen::Onboarding);
    r.onboarding_next();
    assert_eq!(r.current(), Screen::Home);

    r.navigate(Screen::Onboarding);
    assert_eq!(r.onboarding_step(), 0);
}

#[test]
fn deposit_flow_resets_on_reentry() {
    let mut r = Router::new();
    r.navigate(Screen::Deposit);
    r.deposit_flow().select_location("3").unwrap();
    r.deposit_flow().select_type("pet").unwrap();
    r.navigate(Screen::Wallet);
    r.navigate(Screen::Deposit);
    assert_eq!(r.deposit_flow().step(), DepositStep::Locations);
}

#[test]
fn confirmed_deposit_is_credited() {
    let mut s = Session::new(FixedAttestor("sig".into()));
    s.router_mut().navigate(Screen::Deposit);
    let flow = s.router_mut().deposit_flow();
    flow.select_location("8").unwrap();
    flow.select_type("plastic").unwrap();
    flow.set_quantity(3).unwrap();
    assert_eq!(flow.confirm().unwrap(), Decimal::new(150, 2));

    let e = s.complete_deposit().expect("credit");
    assert_eq!(e.display_amount(), "+$1.50");
    assert!(e.description.contains("King Jimmy Market"));
    assert_eq!(e.signature.as_deref(), Some("sig"));
}

#[test]
fn confirmed_deposit_is_credited_once() {
    let mut s = Session::new(FixedAttestor("sig".into()));
    s.router_mut().navigate(Screen::Deposit);
    let flow = s.router_mut().deposit_flow();
    flow.select_location("2").unwrap();
    flow.select_type("plastic").unwrap();
    flow.set_quantity(2).unwrap();
    flow.confirm().unwrap();

    s.complete_deposit().expect("credit");
    assert!(matches!(s.complete_deposit(), Err(EcoError::InvalidStep(_))));
    assert_eq!(s.balance(), Decimal::new(100, 2));
    assert_eq!(s.wallet().entries().len(), 1);
    assert_eq!(s.router_mut().deposit_flow().step(), DepositStep::Locations);
}
