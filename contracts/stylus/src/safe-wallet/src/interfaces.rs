//! Solidity ABI surface: events the wallet logs and the interfaces it calls or accepts.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    event SafeSetup(address indexed initiator, address[] owners, uint256 threshold, address initializer);
    event SafeReceived(address indexed sender, uint256 value);

    event AddedOwner(address indexed owner);
    event RemovedOwner(address indexed owner);
    event ChangedThreshold(uint256 threshold);
    event ApproveHash(bytes32 indexed approvedHash, address indexed owner);

    event ExecutionSuccess(bytes32 indexed txHash, uint256 payment);
    event ExecutionFailure(bytes32 indexed txHash, uint256 payment);
    event ContractCreation(address indexed newContract);

    event EnabledModule(address indexed module);
    event DisabledModule(address indexed module);
    event ExecutionFromModuleSuccess(address indexed module);
    event ExecutionFromModuleFailure(address indexed module);

    /// Payment tokens. The boolean return of `transfer` is optional.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }

    /// Contract owners validate signatures through EIP-1271.
    interface IERC1271 {
        function isValidSignature(bytes32 hash, bytes signature) external view returns (bytes4 magicValue);
    }

    /// Administrative calls a signed transaction may make against the wallet itself.
    interface ISafeAdmin {
        function addOwner(address owner, uint256 threshold) external;
        function removeOwner(address prevOwner, address owner, uint256 threshold) external;
        function replaceOwner(address prevOwner, address oldOwner, address newOwner) external;
        function changeThreshold(uint256 threshold) external;
        function enableModule(address module) external;
        function disableModule(address prevModule, address module) external;
    }
}
