//! One-time initialization, normally called by the proxy factory right after deployment.

use alloc::vec::Vec;

use stylus_sdk::alloy_primitives::{Address, U256};

use crate::{
    errors::SafeError,
    events::SafeEvent,
    executor::{perform, Action},
    host::SafeEnv,
    modules::setup_modules,
    owners::setup_owners,
    payment::pay,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeSetupParams {
    pub owners: Vec<Address>,
    pub threshold: U256,
    /// Delegate-called with `initializer_data` once owners are in place; zero skips it.
    pub initializer: Address,
    pub initializer_data: Vec<u8>,
    /// Zero pays `payment` in the native currency.
    pub payment_token: Address,
    pub payment: U256,
    /// Zero pays the transaction origin.
    pub payment_receiver: Address,
}

pub fn setup<W: SafeEnv>(w: &mut W, params: SafeSetupParams) -> Result<(), SafeError> {
    setup_owners(w, &params.owners, params.threshold)?;
    setup_modules(w);

    if params.initializer != Address::ZERO {
        let outcome = perform(
            w,
            Action::DelegateCall { to: params.initializer, data: params.initializer_data },
            None,
        );
        if !outcome.success {
            return Err(SafeError::SetupCallFailed(params.initializer));
        }
    }

    if params.payment > U256::ZERO {
        let receiver = if params.payment_receiver == Address::ZERO {
            w.tx_origin()
        } else {
            params.payment_receiver
        };
        pay(w, receiver, params.payment_token, params.payment)?;
    }

    let initiator = w.msg_sender();
    w.emit_event(SafeEvent::SafeSetup {
        initiator,
        owners: params.owners,
        threshold: params.threshold,
        initializer: params.initializer,
    });
    Ok(())
}
