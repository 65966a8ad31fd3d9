//! Refund of the transaction submitter.

use stylus_sdk::{
    alloy_primitives::{Address, U256},
    alloy_sol_types::SolCall,
};

use crate::{errors::PaymentError, host::SafeEnv, interfaces::IERC20, utils::bytes::is_truthy_word};

/// Amount owed for `gas_used` units.
///
/// Native refunds use `min(gas_price, tx_gas_price)`, so a submitter can neither charge more
/// than the owners signed nor profit from under-pricing. Token refunds use `gas_price` as
/// signed; the host's native gas price says nothing about token value.
///
/// The signed ceiling `gas_used * gas_price` must fit in 256 bits in both cases.
pub fn compute_payment(
    gas_used: U256,
    gas_price: U256,
    tx_gas_price: U256,
    gas_token: Address,
) -> Result<U256, PaymentError> {
    let ceiling = gas_used
        .checked_mul(gas_price)
        .ok_or(PaymentError::ArithmeticOverflow)?;
    if gas_token != Address::ZERO {
        return Ok(ceiling);
    }
    // Bounded by the ceiling.
    Ok(gas_used * gas_price.min(tx_gas_price))
}

/// Computes and transfers the refund. Returns the amount paid.
pub fn handle_payment<W: SafeEnv>(
    w: &mut W,
    gas_used: U256,
    gas_price: U256,
    gas_token: Address,
    refund_receiver: Address,
) -> Result<U256, PaymentError> {
    let receiver = if refund_receiver == Address::ZERO {
        w.tx_origin()
    } else {
        refund_receiver
    };
    let amount = compute_payment(gas_used, gas_price, w.tx_gas_price(), gas_token)?;
    pay(w, receiver, gas_token, amount)?;
    Ok(amount)
}

/// Sends `amount` of the native currency (`token == Address::ZERO`) or of an ERC20 token.
///
/// A token transfer succeeds when the call succeeds and returns either nothing or a single
/// non-zero word; tokens that predate the boolean return are accepted.
pub fn pay<W: SafeEnv>(
    w: &mut W,
    receiver: Address,
    token: Address,
    amount: U256,
) -> Result<(), PaymentError> {
    let transferred = if token == Address::ZERO {
        w.call_contract(receiver, amount, &[], None).success
    } else {
        let data = IERC20::transferCall { to: receiver, amount }.abi_encode();
        let outcome = w.call_contract(token, U256::ZERO, &data, None);
        outcome.success
            && match outcome.return_data.len() {
                0 => true,
                32 => is_truthy_word(&outcome.return_data),
                _ => false,
            }
    };
    if !transferred {
        return Err(PaymentError::RefundTransferFailed { receiver, amount });
    }
    Ok(())
}
