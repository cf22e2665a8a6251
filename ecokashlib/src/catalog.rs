//! Справочники: тарифы за единицу вторсырья и точки приёма (RVM).

use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecyclableType {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    rate_cents: i64,
}

impl RecyclableType {
    pub fn rate(&self) -> Decimal {
        Decimal::new(self.rate_cents, 2)
    }

    pub fn reward(&self, quantity: u32) -> Decimal {
        self.rate() * Decimal::from(quantity)
    }
}

pub static RECYCLABLES: [RecyclableType; 4] = [
    RecyclableType { id: "plastic", name: "Plastic Bottles", icon: "♻️", rate_cents: 50 },
    RecyclableType { id: "cans", name: "Aluminum Cans", icon: "🥫", rate_cents: 15 },
    RecyclableType { id: "pet", name: "PET Bottles", icon: "🍾", rate_cents: 40 },
    RecyclableType { id: "glass", name: "Glass Bottles", icon: "🍶", rate_cents: 30 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    School,
    Market,
    Beach,
    VehicularPark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RvmLocation {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: LocationKind,
    pub address: &'static str,
}

pub static RVM_LOCATIONS: [RvmLocation; 8] = [
    RvmLocation { id: "1", name: "Fourah Bay College", kind: LocationKind::School, address: "Mount Aureol, Freetown" },
    RvmLocation { id: "2", name: "PZ Market", kind: LocationKind::Market, address: "Siaka Stevens Street, Freetown" },
    RvmLocation { id: "3", name: "Lumley Beach", kind: LocationKind::Beach, address: "Lumley Beach Road, Freetown" },
    RvmLocation { id: "4", name: "Kissy Terminal", kind: LocationKind::VehicularPark, address: "Kissy Road, Freetown" },
    RvmLocation { id: "5", name: "Government Wharf", kind: LocationKind::VehicularPark, address: "Cline Town, Freetown" },
    RvmLocation { id: "6", name: "St. Edwards Secondary School", kind: LocationKind::School, address: "Kingtom, Freetown" },
    RvmLocation { id: "7", name: "Aberdeen Beach", kind: LocationKind::Beach, address: "Aberdeen, Freetown" },
    RvmLocation { id: "8", name: "King Jimmy Market", kind: LocationKind::Market, address: "King Jimmy, Freetown" },
];

pub fn recyclable(id: &str) -> Option<&'static RecyclableType> {
    RECYCLABLES.iter().find(|t| t.id == id)
}

pub fn location(id: &str) -> Option<&'static RvmLocation> {
    RVM_LOCATIONS.iter().find(|l| l.id == id)
}
