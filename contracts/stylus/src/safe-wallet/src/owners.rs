//! Owner set and threshold.
//!
//! Owners form a circular singly linked list keyed by address:
//! `SENTINEL -> o1 -> o2 -> ... -> SENTINEL`. A zero link means "not an owner". Insertion and
//! removal are O(1) given the previous element, which callers compute off-chain from
//! `get_owners`.
//!
//! Every mutator validates all of its inputs before the first write, so a rejected self-call
//! leaves the registry untouched even when it runs in-process.

use alloc::vec::Vec;

use stylus_sdk::alloy_primitives::{Address, U256};

use crate::{
    auth::Authorized,
    constants::SENTINEL,
    errors::OwnerError,
    events::SafeEvent,
    host::SafeEnv,
};

pub fn setup_owners<W: SafeEnv>(
    w: &mut W,
    owners: &[Address],
    threshold: U256,
) -> Result<(), OwnerError> {
    if w.load_threshold() != U256::ZERO {
        return Err(OwnerError::AlreadyInitialized);
    }
    let count = U256::from(owners.len());
    if threshold == U256::ZERO || threshold > count {
        return Err(OwnerError::InvalidThreshold { threshold, owner_count: count });
    }

    // Validate the whole list first, duplicates included.
    for (i, owner) in owners.iter().enumerate() {
        check_new_owner(w, *owner)?;
        if owners[..i].contains(owner) {
            return Err(OwnerError::DuplicateOwner(*owner));
        }
    }

    let mut current = SENTINEL;
    for owner in owners {
        w.store_owner_next(current, *owner);
        current = *owner;
    }
    w.store_owner_next(current, SENTINEL);
    w.store_owner_count(count);
    w.store_threshold(threshold);
    Ok(())
}

/// Inserts `owner` at the head of the list and applies `threshold`.
pub fn add_owner<W: SafeEnv>(
    _auth: &Authorized,
    w: &mut W,
    owner: Address,
    threshold: U256,
) -> Result<(), OwnerError> {
    check_new_owner(w, owner)?;
    let count = w.load_owner_count() + U256::from(1u64);
    check_threshold(threshold, count)?;

    let head = w.load_owner_next(SENTINEL);
    w.store_owner_next(owner, head);
    w.store_owner_next(SENTINEL, owner);
    w.store_owner_count(count);
    w.emit_event(SafeEvent::AddedOwner(owner));

    apply_threshold(w, threshold);
    Ok(())
}

/// Unlinks `owner`, which must directly follow `prev_owner`, and applies `threshold`.
pub fn remove_owner<W: SafeEnv>(
    _auth: &Authorized,
    w: &mut W,
    prev_owner: Address,
    owner: Address,
    threshold: U256,
) -> Result<(), OwnerError> {
    let count = w.load_owner_count().saturating_sub(U256::from(1u64));
    check_threshold(threshold, count)?;
    if owner == Address::ZERO || owner == SENTINEL {
        return Err(OwnerError::InvalidOwner(owner));
    }
    if w.load_owner_next(prev_owner) != owner {
        return Err(OwnerError::InvalidPrevOwner { prev: prev_owner, owner });
    }

    let next = w.load_owner_next(owner);
    w.store_owner_next(prev_owner, next);
    w.store_owner_next(owner, Address::ZERO);
    w.store_owner_count(count);
    w.emit_event(SafeEvent::RemovedOwner(owner));

    apply_threshold(w, threshold);
    Ok(())
}

/// Puts `new_owner` in the list position held by `old_owner`.
pub fn replace_owner<W: SafeEnv>(
    _auth: &Authorized,
    w: &mut W,
    prev_owner: Address,
    old_owner: Address,
    new_owner: Address,
) -> Result<(), OwnerError> {
    check_new_owner(w, new_owner)?;
    if old_owner == Address::ZERO || old_owner == SENTINEL {
        return Err(OwnerError::InvalidOwner(old_owner));
    }
    if w.load_owner_next(prev_owner) != old_owner {
        return Err(OwnerError::InvalidPrevOwner { prev: prev_owner, owner: old_owner });
    }

    let next = w.load_owner_next(old_owner);
    w.store_owner_next(new_owner, next);
    w.store_owner_next(prev_owner, new_owner);
    w.store_owner_next(old_owner, Address::ZERO);
    w.emit_event(SafeEvent::RemovedOwner(old_owner));
    w.emit_event(SafeEvent::AddedOwner(new_owner));
    Ok(())
}

pub fn change_threshold<W: SafeEnv>(
    _auth: &Authorized,
    w: &mut W,
    threshold: U256,
) -> Result<(), OwnerError> {
    check_threshold(threshold, w.load_owner_count())?;
    w.store_threshold(threshold);
    w.emit_event(SafeEvent::ChangedThreshold(threshold));
    Ok(())
}

pub fn is_owner<W: SafeEnv>(w: &W, account: Address) -> bool {
    account != SENTINEL && w.load_owner_next(account) != Address::ZERO
}

/// Owners in list order (most recently added first).
pub fn get_owners<W: SafeEnv>(w: &W) -> Vec<Address> {
    let mut owners = Vec::new();
    let mut current = w.load_owner_next(SENTINEL);
    while current != SENTINEL && current != Address::ZERO {
        owners.push(current);
        current = w.load_owner_next(current);
    }
    owners
}

fn check_new_owner<W: SafeEnv>(w: &W, owner: Address) -> Result<(), OwnerError> {
    if owner == Address::ZERO || owner == SENTINEL || owner == w.self_address() {
        return Err(OwnerError::InvalidOwner(owner));
    }
    if w.load_owner_next(owner) != Address::ZERO {
        return Err(OwnerError::DuplicateOwner(owner));
    }
    Ok(())
}

fn check_threshold(threshold: U256, owner_count: U256) -> Result<(), OwnerError> {
    if threshold == U256::ZERO || threshold > owner_count {
        return Err(OwnerError::InvalidThreshold { threshold, owner_count });
    }
    Ok(())
}

/// Stores an already validated threshold, logging only actual changes.
fn apply_threshold<W: SafeEnv>(w: &mut W, threshold: U256) {
    if w.load_threshold() != threshold {
        w.store_threshold(threshold);
        w.emit_event(SafeEvent::ChangedThreshold(threshold));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SafeStorage;
    use crate::testing::{addr, MockSafe};

    fn auth() -> Authorized {
        Authorized::self_call()
    }

    fn safe_with(owners: &[Address], threshold: u64) -> MockSafe {
        let mut safe = MockSafe::new();
        setup_owners(&mut safe, owners, U256::from(threshold)).unwrap();
        safe
    }

    #[test]
    fn setup_keeps_given_order() {
        let owners = [addr(0x10), addr(0x20), addr(0x30)];
        let safe = safe_with(&owners, 2);
        assert_eq!(get_owners(&safe), owners.to_vec());
        assert_eq!(safe.load_threshold(), U256::from(2u64));
        assert!(is_owner(&safe, addr(0x20)));
        assert!(!is_owner(&safe, SENTINEL));
        assert!(!is_owner(&safe, addr(0x40)));
    }

    #[test]
    fn setup_rejects_bad_input() {
        let mut safe = MockSafe::new();
        assert_eq!(
            setup_owners(&mut safe, &[addr(1)], U256::from(2u64)),
            Err(OwnerError::InvalidThreshold { threshold: U256::from(2u64), owner_count: U256::from(1u64) })
        );
        assert_eq!(
            setup_owners(&mut safe, &[addr(0x10), Address::ZERO], U256::from(1u64)),
            Err(OwnerError::InvalidOwner(Address::ZERO))
        );
        assert_eq!(
            setup_owners(&mut safe, &[addr(0x10), addr(0x10)], U256::from(1u64)),
            Err(OwnerError::DuplicateOwner(addr(0x10)))
        );
        let self_address = safe.address;
        assert_eq!(
            setup_owners(&mut safe, &[self_address], U256::from(1u64)),
            Err(OwnerError::InvalidOwner(self_address))
        );
        assert!(get_owners(&safe).is_empty());

        setup_owners(&mut safe, &[addr(0x10)], U256::from(1u64)).unwrap();
        assert_eq!(
            setup_owners(&mut safe, &[addr(0x20)], U256::from(1u64)),
            Err(OwnerError::AlreadyInitialized)
        );
    }

    #[test]
    fn add_owner_prepends_and_sets_threshold() {
        let mut safe = safe_with(&[addr(0x10), addr(0x20), addr(0x30)], 2);
        add_owner(&auth(), &mut safe, addr(0x40), U256::from(3u64)).unwrap();

        assert_eq!(get_owners(&safe), vec![addr(0x40), addr(0x10), addr(0x20), addr(0x30)]);
        assert_eq!(safe.load_threshold(), U256::from(3u64));
        assert_eq!(safe.load_owner_count(), U256::from(4u64));
        assert_eq!(
            safe.events,
            vec![SafeEvent::AddedOwner(addr(0x40)), SafeEvent::ChangedThreshold(U256::from(3u64))]
        );
    }

    #[test]
    fn add_owner_validates_before_writing() {
        let mut safe = safe_with(&[addr(0x10), addr(0x20)], 1);
        assert_eq!(
            add_owner(&auth(), &mut safe, addr(0x30), U256::from(4u64)),
            Err(OwnerError::InvalidThreshold { threshold: U256::from(4u64), owner_count: U256::from(3u64) })
        );
        assert_eq!(
            add_owner(&auth(), &mut safe, addr(0x20), U256::from(1u64)),
            Err(OwnerError::DuplicateOwner(addr(0x20)))
        );
        assert_eq!(get_owners(&safe), vec![addr(0x10), addr(0x20)]);
        assert!(safe.events.is_empty());
    }

    #[test]
    fn replace_owner_keeps_position() {
        let mut safe = safe_with(&[addr(0x40), addr(0x10), addr(0x20), addr(0x30)], 3);
        replace_owner(&auth(), &mut safe, addr(0x10), addr(0x20), addr(0x50)).unwrap();

        assert_eq!(get_owners(&safe), vec![addr(0x40), addr(0x10), addr(0x50), addr(0x30)]);
        assert!(!is_owner(&safe, addr(0x20)));
        assert_eq!(safe.load_threshold(), U256::from(3u64));
    }

    #[test]
    fn replace_owner_checks_link() {
        let mut safe = safe_with(&[addr(0x10), addr(0x20), addr(0x30)], 1);
        assert_eq!(
            replace_owner(&auth(), &mut safe, addr(0x10), addr(0x30), addr(0x50)),
            Err(OwnerError::InvalidPrevOwner { prev: addr(0x10), owner: addr(0x30) })
        );
        assert_eq!(
            replace_owner(&auth(), &mut safe, addr(0x10), addr(0x20), addr(0x30)),
            Err(OwnerError::DuplicateOwner(addr(0x30)))
        );
        assert_eq!(get_owners(&safe), vec![addr(0x10), addr(0x20), addr(0x30)]);
    }

    #[test]
    fn remove_owner_unlinks_and_lowers_threshold() {
        let mut safe = safe_with(&[addr(0x40), addr(0x10), addr(0x50), addr(0x30)], 3);
        remove_owner(&auth(), &mut safe, addr(0x40), addr(0x10), U256::from(2u64)).unwrap();

        assert_eq!(get_owners(&safe), vec![addr(0x40), addr(0x50), addr(0x30)]);
        assert_eq!(safe.load_threshold(), U256::from(2u64));
        assert_eq!(safe.load_owner_count(), U256::from(3u64));

        // Head of the list is unlinked through the sentinel.
        remove_owner(&auth(), &mut safe, SENTINEL, addr(0x40), U256::from(2u64)).unwrap();
        assert_eq!(get_owners(&safe), vec![addr(0x50), addr(0x30)]);
    }

    #[test]
    fn remove_owner_never_leaves_threshold_above_count() {
        let mut safe = safe_with(&[addr(0x10), addr(0x20)], 2);
        assert_eq!(
            remove_owner(&auth(), &mut safe, SENTINEL, addr(0x10), U256::from(2u64)),
            Err(OwnerError::InvalidThreshold { threshold: U256::from(2u64), owner_count: U256::from(1u64) })
        );

        remove_owner(&auth(), &mut safe, SENTINEL, addr(0x10), U256::from(1u64)).unwrap();
        assert_eq!(
            remove_owner(&auth(), &mut safe, SENTINEL, addr(0x20), U256::from(1u64)),
            Err(OwnerError::InvalidThreshold { threshold: U256::from(1u64), owner_count: U256::ZERO })
        );
        assert_eq!(get_owners(&safe), vec![addr(0x20)]);
    }

    #[test]
    fn change_threshold_bounds() {
        let mut safe = safe_with(&[addr(0x10), addr(0x20)], 1);
        assert!(change_threshold(&auth(), &mut safe, U256::ZERO).is_err());
        assert!(change_threshold(&auth(), &mut safe, U256::from(3u64)).is_err());
        change_threshold(&auth(), &mut safe, U256::from(2u64)).unwrap();
        assert_eq!(safe.load_threshold(), U256::from(2u64));
    }
}
