//! Self-call gate for owner, threshold and module mutations.

use crate::{errors::SafeError, host::SafeHost};

/// Proof that the current frame is the wallet acting on itself, i.e. the mutation was
/// authorized by a threshold-signed transaction.
///
/// Only two places mint one: the executor when a signed transaction targets the wallet's own
/// admin interface, and [`Authorized::from_caller`] when the host reports the wallet as the
/// caller.
#[derive(Debug)]
pub struct Authorized {
    _private: (),
}

impl Authorized {
    pub(crate) fn self_call() -> Self {
        Self { _private: () }
    }

    pub fn from_caller<H: SafeHost + ?Sized>(host: &H) -> Result<Self, SafeError> {
        let caller = host.msg_sender();
        if caller != host.self_address() {
            return Err(SafeError::Unauthorized(caller));
        }
        Ok(Self::self_call())
    }
}
