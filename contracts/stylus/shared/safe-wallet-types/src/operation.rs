/// Inner-call mode of a Safe transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Operation {
    #[default]
    Call = 0,
    DelegateCall = 1,
    /// Deploy `data` as init code; `to` is ignored.
    Create = 2,
}

/// Raised when an operation byte is outside `0..=2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownOperation(pub u8);

impl TryFrom<u8> for Operation {
    type Error = UnknownOperation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Call),
            1 => Ok(Self::DelegateCall),
            2 => Ok(Self::Create),
            other => Err(UnknownOperation(other)),
        }
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        op as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reserved_operation_bytes() {
        assert_eq!(Operation::try_from(2), Ok(Operation::Create));
        assert_eq!(Operation::try_from(3), Err(UnknownOperation(3)));
        assert_eq!(u8::from(Operation::DelegateCall), 1);
    }
}
