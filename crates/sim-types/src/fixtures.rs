//! Canned requests for local runs and tests

use crate::request::{ShortcutData, SimulationRequest, TokenType};

const NATIVE_TOKEN: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";
const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
const USDC_HOLDER: &str = "0x37305B1cD40574E4C5Ce33f8e8306Be057fD7341";
const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

const BACKEND_SIGNER: &str = "0xFE503EE14863F6aCEE10BCdc66aC5e2301b3A946";
const ENSO_RECEIVER: &str = "0x241617016230fb1B08fE9AE3A10d308f526FF95C";
const SIGNATURE_PAYMASTER: &str = "0xfa66d86a5Efc7632070b1F0b1C639C69a7E7D8C5";
const BUNDLER: &str = "0x8B2efB5293326e1766Cb5D0855032F150A72B705";
const ENTRY_POINT: &str = "0x0000000071727De22E5E9d8BAf0edAc6f37da032";

const HANDLE_OPS_CALLDATA: &str = "0xdeaddeaddeaddeaddeaddeaddeaddeaddeadabba";

/// Funds USDC (from a holder) and native ETH, then runs `handleOps` against
/// the v0.7 entry point
pub fn mock_request_body() -> SimulationRequest {
    SimulationRequest {
        forge_data: None,
        shortcut_data: ShortcutData {
            tokens_in_funding_required: vec![true, true],
            tokens_in_types: vec![TokenType::Erc20, TokenType::NativeAsset],
            tokens_in: vec![USDC.to_string(), NATIVE_TOKEN.to_string()],
            // 100^6 and 7^18
            amounts_in: vec![
                "1000000000000".to_string(),
                "1628413597910449".to_string(),
            ],
            tokens_in_holders: vec![USDC_HOLDER.to_string(), ZERO_ADDRESS.to_string()],
        },
        backend_signer: BACKEND_SIGNER.to_string(),
        enso_receiver: ENSO_RECEIVER.to_string(),
        signature_paymaster: SIGNATURE_PAYMASTER.to_string(),
        bundler: BUNDLER.to_string(),
        entry_point: ENTRY_POINT.to_string(),
        handle_ops_calldata: Some(HANDLE_OPS_CALLDATA.to_string()),
    }
}
