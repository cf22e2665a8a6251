//! ecokashlib — кошелёк наград, жизненный цикл бака и серверные маршруты EcoKash

pub mod error;
pub mod model;
pub mod traits;
pub mod signature;
pub mod wallet;
pub mod collection;
pub mod catalog;
pub mod router;
pub mod session;
pub mod store;
pub mod service;
pub mod http;
pub mod rpc;

pub mod formats {
    pub mod csv;
    pub mod json;
}
