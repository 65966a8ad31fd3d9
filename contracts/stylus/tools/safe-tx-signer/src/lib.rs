//! Owner-side tooling for the Stylus Safe: key handling, transaction hashing and packing of
//! the signature bytes `execTransaction` expects.

pub mod bundle;
pub mod signer;
pub mod types;


pub use bundle::SignatureBundle;
pub use signer::OwnerKey;
pub use types::{SignedTx, TxRequest};
