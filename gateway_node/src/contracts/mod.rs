//! Contract interfaces for the Unlock factory and PublicLock instances.
//!
//! The interfaces are externally supplied metadata as far as the dispatch
//! engine is concerned; they are declared here as human-readable ABI
//! signatures whose parameter order is the order the catalogue's argument
//! schemas follow. The builder maps validated named arguments onto this
//! declared positional order.

use ethers::abi::{parse_abi, Abi, Function};
use once_cell::sync::Lazy;

/// Which interface family an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetGroup {
    /// The single Unlock factory contract.
    Factory,
    /// A deployed PublicLock membership contract.
    Instance,
}

const FACTORY_FUNCTIONS: &[&str] = &[
    "function createLock(address _lockCreator, uint256 _expirationDuration, address _tokenAddress, uint256 _keyPrice, uint256 _maxNumberOfKeys, string _lockName) returns (address)",
    "function createUpgradeableLock(bytes data) returns (address)",
    "function upgradeLock(address lockAddress, uint16 version) returns (address)",
    "function chainId() view returns (uint256)",
    "function unlockVersion() view returns (uint16)",
    "function governanceToken() view returns (address)",
    "function getGlobalTokenSymbol() view returns (string)",
    "function publicLockLatestVersion() view returns (uint16)",
];

const INSTANCE_FUNCTIONS: &[&str] = &[
    // ERC-721 views
    "function balanceOf(address _keyOwner) view returns (uint256)",
    "function getApproved(uint256 _tokenId) view returns (address)",
    "function ownerOf(uint256 _tokenId) view returns (address)",
    "function tokenByIndex(uint256 _index) view returns (uint256)",
    "function tokenOfOwnerByIndex(address _keyOwner, uint256 _index) view returns (uint256)",
    "function tokenURI(uint256 _tokenId) view returns (string)",
    "function totalSupply() view returns (uint256)",
    "function supportsInterface(bytes4 interfaceId) view returns (bool)",
    // Lock configuration views
    "function expirationDuration() view returns (uint256)",
    "function freeTrialLength() view returns (uint256)",
    "function gasRefundValue() view returns (uint256)",
    "function keyPrice() view returns (uint256)",
    "function maxKeysPerAddress() view returns (uint256)",
    "function maxNumberOfKeys() view returns (uint256)",
    "function name() view returns (string)",
    "function numberOfOwners() view returns (uint256)",
    "function publicLockVersion() view returns (uint16)",
    "function refundPenaltyBasisPoints() view returns (uint256)",
    "function symbol() view returns (string)",
    "function tokenAddress() view returns (address)",
    "function transferFeeBasisPoints() view returns (uint256)",
    "function unlockProtocol() view returns (address)",
    // Key status views
    "function getHasValidKey(address _keyOwner) view returns (bool)",
    "function isValidKey(uint256 _tokenId) view returns (bool)",
    "function keyExpirationTimestampFor(uint256 _tokenId) view returns (uint256)",
    "function keyManagerOf(uint256 _tokenId) view returns (address)",
    "function totalKeys(address _keyOwner) view returns (uint256)",
    "function isRenewable(uint256 _tokenId, address _referrer) view returns (bool)",
    // Pricing and fee views
    "function getCancelAndRefundValue(uint256 _tokenId) view returns (uint256)",
    "function getTransferFee(uint256 _tokenId, uint256 _time) view returns (uint256)",
    "function purchasePriceFor(address _recipient, address _referrer, bytes _data) view returns (uint256)",
    "function referrerFees(address _referrer) view returns (uint256)",
    // Access control views
    "function hasRole(bytes32 role, address account) view returns (bool)",
    "function isLockManager(address account) view returns (bool)",
    "function isOwner(address account) view returns (bool)",
    "function owner() view returns (address)",
    // Key purchase
    "function purchase(uint256[] _values, address[] _recipients, address[] _referrers, address[] _keyManagers, bytes[] _data) payable returns (uint256[])",
    "function extend(uint256 _value, uint256 _tokenId, address _referrer, bytes _data) payable",
    // Key management
    "function grantKeys(address[] _recipients, uint256[] _expirationTimestamps, address[] _keyManagers) returns (uint256[])",
    "function grantKeyExtension(uint256 _tokenId, uint256 _duration)",
    "function setKeyExpiration(uint256 _tokenId, uint256 _newExpiration)",
    "function setKeyManagerOf(uint256 _tokenId, address _keyManager)",
    "function renewMembershipFor(uint256 _tokenId, address _referrer)",
    // Key transfer
    "function approve(address _approved, uint256 _tokenId)",
    "function transferFrom(address _from, address _to, uint256 _tokenId)",
    "function safeTransferFrom(address _from, address _to, uint256 _tokenId)",
    "function safeTransferFrom(address _from, address _to, uint256 _tokenId, bytes _data)",
    "function lendKey(address _from, address _recipient, uint256 _tokenId)",
    "function unlendKey(address _recipient, uint256 _tokenId)",
    "function shareKey(address _to, uint256 _tokenIdFrom, uint256 _timeShared)",
    // Key cancellation
    "function cancelAndRefund(uint256 _tokenId)",
    "function expireAndRefundFor(uint256 _tokenId, uint256 _amount)",
    "function burn(uint256 _tokenId)",
    "function mergeKeys(uint256 _tokenIdFrom, uint256 _tokenIdTo, uint256 _amount)",
    // Lock configuration
    "function updateKeyPricing(uint256 _keyPrice, address _tokenAddress)",
    "function updateLockConfig(uint256 _newExpirationDuration, uint256 _maxNumberOfKeys, uint256 _maxKeysPerAccount)",
    "function updateRefundPenalty(uint256 _freeTrialLength, uint256 _refundPenaltyBasisPoints)",
    "function updateTransferFee(uint256 _transferFeeBasisPoints)",
    "function setLockMetadata(string _lockName, string _lockSymbol, string _baseTokenURI)",
    "function setReferrerFee(address _referrer, uint256 _feeBasisPoint)",
    "function setGasRefundValue(uint256 _refundValue)",
    "function setEventHooks(address _onKeyPurchaseHook, address _onKeyCancelHook, address _onValidKeyHook, address _onTokenURIHook, address _onKeyTransferHook, address _onKeyExtendHook, address _onKeyGrantHook, address _onHasRoleHook)",
    // Revenue
    "function withdraw(address _tokenAddress, address _recipient, uint256 _amount)",
    // Access control
    "function grantRole(bytes32 role, address account)",
    "function revokeRole(bytes32 role, address account)",
    "function renounceRole(bytes32 role, address account)",
    "function renounceLockManager()",
    "function setOwner(address account)",
    // Migration
    "function migrate(bytes data)",
];

static FACTORY_ABI: Lazy<Abi> =
    Lazy::new(|| parse_abi(FACTORY_FUNCTIONS).expect("factory interface is well-formed"));

static INSTANCE_ABI: Lazy<Abi> =
    Lazy::new(|| parse_abi(INSTANCE_FUNCTIONS).expect("lock interface is well-formed"));

/// The parsed interface for a target group.
pub fn abi(group: TargetGroup) -> &'static Abi {
    match group {
        TargetGroup::Factory => &FACTORY_ABI,
        TargetGroup::Instance => &INSTANCE_ABI,
    }
}

/// Look up a method by name and argument count. Overloads are distinguished
/// by arity alone, which is sufficient for this interface set.
pub fn function(group: TargetGroup, name: &str, arity: usize) -> Option<&'static Function> {
    abi(group)
        .functions
        .get(name)
        .and_then(|overloads| overloads.iter().find(|f| f.inputs.len() == arity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::ParamType;

    #[test]
    fn test_interfaces_parse() {
        assert!(!abi(TargetGroup::Factory).functions.is_empty());
        assert!(!abi(TargetGroup::Instance).functions.is_empty());
    }

    #[test]
    fn test_function_lookup() {
        let f = function(TargetGroup::Instance, "balanceOf", 1).unwrap();
        assert_eq!(f.inputs.len(), 1);
        assert_eq!(f.inputs[0].kind, ParamType::Address);

        // The alias target exists on the factory interface.
        assert!(function(TargetGroup::Factory, "chainId", 0).is_some());
        assert!(function(TargetGroup::Factory, "balanceOf", 1).is_none());
    }

    #[test]
    fn test_safe_transfer_from_overloads() {
        let three = function(TargetGroup::Instance, "safeTransferFrom", 3).unwrap();
        let four = function(TargetGroup::Instance, "safeTransferFrom", 4).unwrap();
        assert_eq!(three.inputs.len(), 3);
        assert_eq!(four.inputs[3].kind, ParamType::Bytes);
        assert!(function(TargetGroup::Instance, "safeTransferFrom", 5).is_none());
    }

    #[test]
    fn test_fixed_bytes_parameters() {
        let f = function(TargetGroup::Instance, "supportsInterface", 1).unwrap();
        assert_eq!(f.inputs[0].kind, ParamType::FixedBytes(4));
        let f = function(TargetGroup::Instance, "hasRole", 2).unwrap();
        assert_eq!(f.inputs[0].kind, ParamType::FixedBytes(32));
    }
}
