use alloy_sol_types::sol;
use stylus_sdk::{
    alloy_primitives::{Address, U256},
    stylus_proc::SolidityError,
};

/// Errors raised while checking a signature set. Any of these aborts the whole attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureError {
    InsufficientSignatures { provided: usize, required: usize },
    InvalidSignatureOrder { signer: Address, previous: Address },
    DuplicateSigner { signer: Address },
    NotAnOwner { signer: Address },
    InvalidSignature { index: usize },
    InvalidContractSignature { owner: Address },
    HashNotApproved { owner: Address },
}

/// Owner/threshold registry errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerError {
    AlreadyInitialized,
    InvalidThreshold { threshold: U256, owner_count: U256 },
    InvalidOwner(Address),
    DuplicateOwner(Address),
    InvalidPrevOwner { prev: Address, owner: Address },
    NotAnOwner(Address),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleError {
    InvalidModule(Address),
    ModuleAlreadyEnabled(Address),
    InvalidPrevModule { prev: Address, module: Address },
    ModuleNotEnabled(Address),
    InvalidPageSize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentError {
    ArithmeticOverflow,
    RefundTransferFailed { receiver: Address, amount: U256 },
}

/// Everything the engine can fail with. Returning one of these from an entry point reverts
/// the surrounding host transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SafeError {
    SignatureVerificationFailed(SignatureError),
    Owner(OwnerError),
    Module(ModuleError),
    Payment(PaymentError),
    Unauthorized(Address),
    NotEnoughGas { required: U256, available: u64 },
    SetupCallFailed(Address),
    InvalidOperation(u8),
    NotInitialized,
    NonceExhausted,
}

impl From<SignatureError> for SafeError {
    fn from(err: SignatureError) -> Self {
        SafeError::SignatureVerificationFailed(err)
    }
}

impl From<OwnerError> for SafeError {
    fn from(err: OwnerError) -> Self {
        SafeError::Owner(err)
    }
}

impl From<ModuleError> for SafeError {
    fn from(err: ModuleError) -> Self {
        SafeError::Module(err)
    }
}

impl From<PaymentError> for SafeError {
    fn from(err: PaymentError) -> Self {
        SafeError::Payment(err)
    }
}

sol! {
    error InsufficientSignatures(uint256 provided, uint256 required);
    error InvalidSignatureOrder(address signer, address previous);
    error DuplicateSigner(address signer);
    error SignerNotOwner(address signer);
    error InvalidSignature(uint256 index);
    error InvalidContractSignature(address owner);
    error HashNotApproved(address owner);

    error AlreadyInitialized();
    error NotInitialized();
    error InvalidThreshold(uint256 threshold, uint256 ownerCount);
    error InvalidOwner(address owner);
    error DuplicateOwner(address owner);
    error InvalidPrevOwner(address prevOwner, address owner);
    error NotAnOwner(address account);

    error InvalidModule(address module);
    error ModuleAlreadyEnabled(address module);
    error InvalidPrevModule(address prevModule, address module);
    error ModuleNotEnabled(address module);
    error InvalidPageSize();

    error ArithmeticOverflow();
    error RefundTransferFailed(address receiver, uint256 amount);

    error Unauthorized(address caller);
    error NotEnoughGas(uint256 required, uint256 available);
    error SetupCallFailed(address target);
    error InvalidOperation(uint8 operation);
    error NonceExhausted();
}

/// ABI-facing revert reasons.
#[derive(SolidityError)]
pub enum SafeRevert {
    InsufficientSignatures(InsufficientSignatures),
    InvalidSignatureOrder(InvalidSignatureOrder),
    DuplicateSigner(DuplicateSigner),
    SignerNotOwner(SignerNotOwner),
    InvalidSignature(InvalidSignature),
    InvalidContractSignature(InvalidContractSignature),
    HashNotApproved(HashNotApproved),
    AlreadyInitialized(AlreadyInitialized),
    NotInitialized(NotInitialized),
    InvalidThreshold(InvalidThreshold),
    InvalidOwner(InvalidOwner),
    DuplicateOwner(DuplicateOwner),
    InvalidPrevOwner(InvalidPrevOwner),
    NotAnOwner(NotAnOwner),
    InvalidModule(InvalidModule),
    ModuleAlreadyEnabled(ModuleAlreadyEnabled),
    InvalidPrevModule(InvalidPrevModule),
    ModuleNotEnabled(ModuleNotEnabled),
    InvalidPageSize(InvalidPageSize),
    ArithmeticOverflow(ArithmeticOverflow),
    RefundTransferFailed(RefundTransferFailed),
    Unauthorized(Unauthorized),
    NotEnoughGas(NotEnoughGas),
    SetupCallFailed(SetupCallFailed),
    InvalidOperation(InvalidOperation),
    NonceExhausted(NonceExhausted),
}

impl From<SignatureError> for SafeRevert {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::InsufficientSignatures { provided, required } => {
                SafeRevert::InsufficientSignatures(InsufficientSignatures {
                    provided: U256::from(provided),
                    required: U256::from(required),
                })
            }
            SignatureError::InvalidSignatureOrder { signer, previous } => {
                SafeRevert::InvalidSignatureOrder(InvalidSignatureOrder { signer, previous })
            }
            SignatureError::DuplicateSigner { signer } => {
                SafeRevert::DuplicateSigner(DuplicateSigner { signer })
            }
            SignatureError::NotAnOwner { signer } => {
                SafeRevert::SignerNotOwner(SignerNotOwner { signer })
            }
            SignatureError::InvalidSignature { index } => {
                SafeRevert::InvalidSignature(InvalidSignature { index: U256::from(index) })
            }
            SignatureError::InvalidContractSignature { owner } => {
                SafeRevert::InvalidContractSignature(InvalidContractSignature { owner })
            }
            SignatureError::HashNotApproved { owner } => {
                SafeRevert::HashNotApproved(HashNotApproved { owner })
            }
        }
    }
}

impl From<OwnerError> for SafeRevert {
    fn from(err: OwnerError) -> Self {
        match err {
            OwnerError::AlreadyInitialized => SafeRevert::AlreadyInitialized(AlreadyInitialized {}),
            OwnerError::InvalidThreshold { threshold, owner_count } => {
                SafeRevert::InvalidThreshold(InvalidThreshold { threshold, ownerCount: owner_count })
            }
            OwnerError::InvalidOwner(owner) => SafeRevert::InvalidOwner(InvalidOwner { owner }),
            OwnerError::DuplicateOwner(owner) => SafeRevert::DuplicateOwner(DuplicateOwner { owner }),
            OwnerError::InvalidPrevOwner { prev, owner } => {
                SafeRevert::InvalidPrevOwner(InvalidPrevOwner { prevOwner: prev, owner })
            }
            OwnerError::NotAnOwner(account) => SafeRevert::NotAnOwner(NotAnOwner { account }),
        }
    }
}

impl From<ModuleError> for SafeRevert {
    fn from(err: ModuleError) -> Self {
        match err {
            ModuleError::InvalidModule(module) => SafeRevert::InvalidModule(InvalidModule { module }),
            ModuleError::ModuleAlreadyEnabled(module) => {
                SafeRevert::ModuleAlreadyEnabled(ModuleAlreadyEnabled { module })
            }
            ModuleError::InvalidPrevModule { prev, module } => {
                SafeRevert::InvalidPrevModule(InvalidPrevModule { prevModule: prev, module })
            }
            ModuleError::ModuleNotEnabled(module) => {
                SafeRevert::ModuleNotEnabled(ModuleNotEnabled { module })
            }
            ModuleError::InvalidPageSize => SafeRevert::InvalidPageSize(InvalidPageSize {}),
        }
    }
}

impl From<PaymentError> for SafeRevert {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::ArithmeticOverflow => SafeRevert::ArithmeticOverflow(ArithmeticOverflow {}),
            PaymentError::RefundTransferFailed { receiver, amount } => {
                SafeRevert::RefundTransferFailed(RefundTransferFailed { receiver, amount })
            }
        }
    }
}

impl From<SafeError> for SafeRevert {
    fn from(err: SafeError) -> Self {
        match err {
            SafeError::SignatureVerificationFailed(e) => e.into(),
            SafeError::Owner(e) => e.into(),
            SafeError::Module(e) => e.into(),
            SafeError::Payment(e) => e.into(),
            SafeError::Unauthorized(caller) => SafeRevert::Unauthorized(Unauthorized { caller }),
            SafeError::NotEnoughGas { required, available } => SafeRevert::NotEnoughGas(NotEnoughGas {
                required,
                available: U256::from(available),
            }),
            SafeError::SetupCallFailed(target) => SafeRevert::SetupCallFailed(SetupCallFailed { target }),
            SafeError::InvalidOperation(operation) => {
                SafeRevert::InvalidOperation(InvalidOperation { operation })
            }
            SafeError::NotInitialized => SafeRevert::NotInitialized(NotInitialized {}),
            SafeError::NonceExhausted => SafeRevert::NonceExhausted(NonceExhausted {}),
        }
    }
}

/// ABI-encoded revert payload for an engine error (selector + arguments).
pub fn revert_data(err: SafeError) -> alloc::vec::Vec<u8> {
    SafeRevert::from(err).into()
}
