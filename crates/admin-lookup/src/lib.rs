//! Admin Lookup - callable endpoint that checks whether a phone number
//! belongs to a registered administrator.
//!
//! The endpoint:
//! - Normalizes caller-supplied phone numbers to the `+233` key format
//! - Looks the key up in the `Admins` collection, then the key without `+`
//! - Reports store failures with a fixed message, logging the cause server-side

pub mod api;
pub mod config;
pub mod error;
pub mod phone;
pub mod resolver;
pub mod store;

pub use config::Config;
pub use error::CheckError;
pub use phone::{normalize, CanonicalPhone};
pub use resolver::{AdminLookup, AdminResolver, KeyFormat};
pub use store::{AdminStore, FirestoreStore, MemoryStore, StoreError};
