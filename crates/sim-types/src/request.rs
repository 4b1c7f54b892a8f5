//! Simulation request and the payload handed to forge

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forge::ForgeData;

/// `0x`-prefixed account address, kept verbatim (checksum casing included)
pub type AddressArg = String;

/// `0x`-prefixed hex blob, kept verbatim
pub type HexString = String;

/// Token kind, encoded as a number on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TokenType {
    /// Chain native asset (ETH)
    NativeAsset,
    /// ERC-20 fungible token
    Erc20,
    /// ERC-721 non-fungible token
    Erc721,
    /// ERC-1155 multi token
    Erc1155,
}

/// Token type number outside the known range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid token type: {0}")]
pub struct InvalidTokenType(pub u8);

impl TryFrom<u8> for TokenType {
    type Error = InvalidTokenType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NativeAsset),
            1 => Ok(Self::Erc20),
            2 => Ok(Self::Erc721),
            3 => Ok(Self::Erc1155),
            other => Err(InvalidTokenType(other)),
        }
    }
}

impl From<TokenType> for u8 {
    fn from(value: TokenType) -> Self {
        match value {
            TokenType::NativeAsset => 0,
            TokenType::Erc20 => 1,
            TokenType::Erc721 => 2,
            TokenType::Erc1155 => 3,
        }
    }
}

/// Token funding instructions.
///
/// The sequences are parallel: entry `i` of each one describes the same
/// token. Lengths are expected to match but are not checked here; the
/// forge-side script is the consumer that cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutData {
    /// Whether each token must be funded before the simulation
    pub tokens_in_funding_required: Vec<bool>,
    /// Kind of each token
    pub tokens_in_types: Vec<TokenType>,
    /// Token contract addresses
    pub tokens_in: Vec<AddressArg>,
    /// Amounts as decimal strings (may exceed u128)
    pub amounts_in: Vec<String>,
    /// Accounts holding the tokens to fund from
    pub tokens_in_holders: Vec<AddressArg>,
}

/// Inbound `POST /simulate` body.
///
/// Unknown top-level keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// Optional invocation overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forge_data: Option<ForgeData>,
    /// Token funding instructions
    pub shortcut_data: ShortcutData,
    /// Backend signer address
    pub backend_signer: AddressArg,
    /// Receiver address (counterfactual)
    pub enso_receiver: AddressArg,
    /// Signature paymaster address
    pub signature_paymaster: AddressArg,
    /// Bundler address
    pub bundler: AddressArg,
    /// Entry point address
    pub entry_point: AddressArg,
    /// Raw `handleOps` calldata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_ops_calldata: Option<HexString>,
}

impl SimulationRequest {
    /// Build the payload forge reads from `SIMULATION_JSON_DATA`
    pub fn payload(&self) -> SimulationPayload<'_> {
        SimulationPayload::from_request(self)
    }
}

/// Exact shape read by the forge test through `vm.envString` + JSON cheatcodes.
///
/// Field names and presence are a contract with the Solidity side:
/// `handleOpsCalldata` is always emitted, `forgeData` never is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPayload<'a> {
    /// Token funding instructions
    pub shortcut_data: &'a ShortcutData,
    /// Backend signer address
    pub backend_signer: &'a str,
    /// Receiver address
    pub enso_receiver: &'a str,
    /// Signature paymaster address
    pub signature_paymaster: &'a str,
    /// Bundler address
    pub bundler: &'a str,
    /// Entry point address
    pub entry_point: &'a str,
    /// Raw calldata, empty when the request had none
    pub handle_ops_calldata: &'a str,
}

impl<'a> SimulationPayload<'a> {
    /// Borrow the forwarded fields out of a request
    pub fn from_request(request: &'a SimulationRequest) -> Self {
        Self {
            shortcut_data: &request.shortcut_data,
            backend_signer: &request.backend_signer,
            enso_receiver: &request.enso_receiver,
            signature_paymaster: &request.signature_paymaster,
            bundler: &request.bundler,
            entry_point: &request.entry_point,
            handle_ops_calldata: request.handle_ops_calldata.as_deref().unwrap_or(""),
        }
    }

    /// Serialize to the JSON text placed in the environment
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
