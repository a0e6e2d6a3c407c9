//! Data models for accounts, catalog items, and requests

pub mod account;
pub mod item;
pub mod request;
pub mod rules;

pub use account::{Account, Role};
pub use item::CatalogItem;
pub use request::{Request, RequestStatus, RequestType};
