//! What is sent, where it is sent, and the handles that come back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

use super::errors::RunError;

/// A 20-byte account address, 40 hex digits with an optional `0x` prefix.
///
/// - all-lowercase and all-uppercase digits are taken as is
/// - mixed case is an EIP-55 checksum and must match
///
/// Stored in checksummed form, so `as_str` always starts with `0x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub const HEX_LEN: usize = 40;

    pub fn parse(input: &str) -> Result<Self, RunError> {
        let invalid = || RunError::InvalidTarget(input.to_string());

        let digits = input.strip_prefix("0x").unwrap_or(input);
        if digits.len() != Self::HEX_LEN || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let checksummed = checksum(digits);
        let mixed_case = digits.bytes().any(|b| b.is_ascii_lowercase())
            && digits.bytes().any(|b| b.is_ascii_uppercase());
        if mixed_case && checksummed[2..] != *digits {
            return Err(invalid());
        }
        Ok(Self(checksummed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = RunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = RunError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// EIP-55: a letter is uppercase iff the matching nibble of
// keccak256(lowercase hex) is 8 or more.
fn checksum(digits: &str) -> String {
    let lower = digits.to_ascii_lowercase();
    let mut hash = [0u8; 32];
    let mut keccak = Keccak::v256();
    keccak.update(lower.as_bytes());
    keccak.finalize(&mut hash);

    let mut out = String::with_capacity(2 + Address::HEX_LEN);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
        out.push(if nibble >= 8 { c.to_ascii_uppercase() } else { c });
    }
    out
}

/// The write each task sends to the target. Every task of a run sends the same one.
///
/// Default is an empty call with zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,

    #[serde(default)]
    pub value: u128,
}

impl Payload {
    pub fn new(data: Vec<u8>, value: u128) -> Self {
        Self { data, value }
    }
}

/// Returned by `submit`: the payload is on its way but not final yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingHandle {
    /// Identifier known at submission time (e.g. a transaction hash).
    pub id: String,
}

impl PendingHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Returned by `await_finality`.
///
/// `id` may be absent when the confirmation does not repeat it; the task runner
/// then falls back to the pending handle's id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalHandle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl FinalHandle {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            block_number: None,
        }
    }

    pub fn without_id() -> Self {
        Self::default()
    }
}

/// Opaque success token of a finished task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultHandle(String);

impl ResultHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Prefer the confirmation's id, fall back to the one known at submission.
    pub fn resolve(pending: &PendingHandle, finalized: FinalHandle) -> Self {
        match finalized.id {
            Some(id) if !id.is_empty() => Self(id),
            _ => Self(pending.id.clone()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lowercase("0x52908400098527886e0f7030069857d2e4169ee7")]
    #[case::uppercase_digits("0x8617E340B3D01FA5F11F306F4090FD50E238070D")]
    #[case::checksummed("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")]
    #[case::checksummed_2("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359")]
    #[case::no_prefix("de709f2102306220921060314715629080e2fb77")]
    fn accepts_well_formed_addresses(#[case] input: &str) {
        let address = Address::parse(input).unwrap();
        assert!(address.as_str().starts_with("0x"));
        assert_eq!(address.as_str().len(), 2 + Address::HEX_LEN);
        assert!(address.as_str()[2..].eq_ignore_ascii_case(input.trim_start_matches("0x")));
    }

    #[rstest]
    #[case::empty("")]
    #[case::prefix_only("0x")]
    #[case::uppercase_prefix("0X52908400098527886e0f7030069857d2e4169ee7")]
    #[case::leading_whitespace(" 0x52908400098527886e0f7030069857d2e4169ee7")]
    #[case::trailing_whitespace("0x52908400098527886e0f7030069857d2e4169ee7\n")]
    #[case::too_short("0x52908400098527886e0f7030069857d2e4169ee")]
    #[case::too_long("0x52908400098527886e0f7030069857d2e4169ee700")]
    #[case::non_hex("0x52908400098527886e0f7030069857d2e4169eeg")]
    #[case::bad_checksum("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD")]
    #[case::bad_checksum_2("0xFb6916095ca1df60bB79Ce92cE3Ea74c37c5d359")]
    #[case::ens_name("vitalik.eth")]
    fn rejects_malformed_addresses(#[case] input: &str) {
        let err = Address::parse(input).unwrap_err();
        assert!(matches!(err, RunError::InvalidTarget(ref s) if s == input));
    }

    #[rstest]
    #[case::lowercase(
        "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
    )]
    #[case::uppercase(
        "0xDBF03B407C01E7CD3CBEA99509D93F8DDDC8C6FB",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB"
    )]
    #[case::no_prefix(
        "d1220a0cf47c7b9be7a2e6ba89f429762e7b9adb",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb"
    )]
    fn stored_form_is_checksummed(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Address::parse(input).unwrap().as_str(), expected);
    }

    #[test]
    fn result_handle_prefers_final_id() {
        let pending = PendingHandle::new("0xpending");
        let handle = ResultHandle::resolve(&pending, FinalHandle::with_id("0xfinal"));
        assert_eq!(handle.as_str(), "0xfinal");
    }

    #[rstest]
    #[case::absent(FinalHandle::without_id())]
    #[case::empty(FinalHandle::with_id(""))]
    fn result_handle_falls_back_to_pending_id(#[case] finalized: FinalHandle) {
        let pending = PendingHandle::new("0xpending");
        let handle = ResultHandle::resolve(&pending, finalized);
        assert_eq!(handle.as_str(), "0xpending");
    }

    #[test]
    fn address_deserialization_validates() {
        let ok: Result<Address, _> =
            serde_json::from_str("\"0x52908400098527886e0f7030069857d2e4169ee7\"");
        assert!(ok.is_ok());

        let bad: Result<Address, _> = serde_json::from_str("\"0x1234\"");
        assert!(bad.is_err());
    }
}
