//! Forge invocation settings

use serde::{Deserialize, Serialize};

/// Key of the optional setup function in a forge report
pub const SETUP_TEST_KEY: &str = "setUp()";

/// Output format flag passed to `forge test`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogFormat {
    /// Human-readable output, no flag
    #[serde(rename = "")]
    Default,
    /// Structured output (`--json`)
    #[default]
    #[serde(rename = "--json")]
    Json,
}

impl LogFormat {
    /// Command-line flag, if any
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Json => Some("--json"),
        }
    }
}

/// Verbosity flag passed to `forge test`.
///
/// `-vvv` hides traces of passing tests; `-vvvv` shows them; `-vvvvv` also
/// reports `setUp()` traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum LogVerbosity {
    /// `-v`
    #[serde(rename = "-v")]
    X1V,
    /// `-vv`
    #[serde(rename = "-vv")]
    X2V,
    /// `-vvv`
    #[serde(rename = "-vvv")]
    X3V,
    /// `-vvvv`
    #[default]
    #[serde(rename = "-vvvv")]
    X4V,
    /// `-vvvvv`
    #[serde(rename = "-vvvvv")]
    X5V,
}

impl LogVerbosity {
    /// Command-line flag
    pub fn flag(&self) -> &'static str {
        match self {
            Self::X1V => "-v",
            Self::X2V => "-vv",
            Self::X3V => "-vvv",
            Self::X4V => "-vvvv",
            Self::X5V => "-vvvvv",
        }
    }
}

/// Per-request invocation overrides (`forgeData` in the request body)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeData {
    /// `FOUNDRY_PROFILE` to select
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Test contract name (`--match-contract`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    /// Test function name without parentheses (`--match-test`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    /// Test source path relative to the foundry project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_relative_path: Option<String>,
    /// Fork RPC URL (`--fork-url`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// Output format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_format: Option<LogFormat>,
    /// Output verbosity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_verbosity: Option<LogVerbosity>,
    /// Log the inbound request before running forge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tx_data_logged: Option<bool>,
    /// Log the target test's decoded logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_test_results_logged: Option<bool>,
}

/// Values used when a request leaves a setting unset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeDefaults {
    /// Foundry profile
    pub profile: String,
    /// Test contract name
    pub contract: String,
    /// Test function name
    pub test: String,
    /// Fork RPC URL
    pub rpc_url: String,
    /// Output format
    pub log_format: LogFormat,
    /// Output verbosity
    pub log_verbosity: LogVerbosity,
    /// Log inbound requests
    pub is_tx_data_logged: bool,
    /// Log decoded test logs
    pub is_test_results_logged: bool,
}

impl Default for ForgeDefaults {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            contract: "SimulateEnsoCheckout_Fork_Test".to_string(),
            test: "test_simulateHandleOps_1".to_string(),
            rpc_url: "127.0.0.1:8545".to_string(),
            log_format: LogFormat::Json,
            log_verbosity: LogVerbosity::X4V,
            is_tx_data_logged: true,
            is_test_results_logged: true,
        }
    }
}

impl ForgeDefaults {
    /// Default test source location for a contract
    pub fn test_relative_path(contract: &str) -> String {
        format!("test/simulators/enso-checkout/tests/{}.t.sol", contract)
    }

    /// Resolve request overrides into a complete invocation config
    pub fn resolve(&self, overrides: Option<&ForgeData>) -> ForgeInvocationConfig {
        let empty = ForgeData::default();
        let data = overrides.unwrap_or(&empty);

        let contract = data.contract.clone().unwrap_or_else(|| self.contract.clone());
        let test_relative_path = data
            .test_relative_path
            .clone()
            .unwrap_or_else(|| Self::test_relative_path(&contract));

        ForgeInvocationConfig {
            profile: data.profile.clone().unwrap_or_else(|| self.profile.clone()),
            test: data.test.clone().unwrap_or_else(|| self.test.clone()),
            contract,
            test_relative_path,
            rpc_url: data.rpc_url.clone().unwrap_or_else(|| self.rpc_url.clone()),
            log_format: data.log_format.unwrap_or(self.log_format),
            log_verbosity: data.log_verbosity.unwrap_or(self.log_verbosity),
            is_tx_data_logged: data.is_tx_data_logged.unwrap_or(self.is_tx_data_logged),
            is_test_results_logged: data
                .is_test_results_logged
                .unwrap_or(self.is_test_results_logged),
        }
    }
}

/// Fully resolved settings for one forge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeInvocationConfig {
    /// Foundry profile
    pub profile: String,
    /// Test contract name
    pub contract: String,
    /// Test function name
    pub test: String,
    /// Test source path relative to the project root
    pub test_relative_path: String,
    /// Fork RPC URL
    pub rpc_url: String,
    /// Output format
    pub log_format: LogFormat,
    /// Output verbosity
    pub log_verbosity: LogVerbosity,
    /// Log inbound requests
    pub is_tx_data_logged: bool,
    /// Log decoded test logs
    pub is_test_results_logged: bool,
}

impl ForgeInvocationConfig {
    /// Arguments for the forge binary, in order
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "test".to_string(),
            "--match-contract".to_string(),
            self.contract.clone(),
            "--match-test".to_string(),
            self.test.clone(),
            self.log_verbosity.flag().to_string(),
        ];
        if let Some(flag) = self.log_format.flag() {
            args.push(flag.to_string());
        }
        args.push("--fork-url".to_string());
        args.push(self.rpc_url.clone());
        args
    }

    /// Top-level report key forge echoes back: `<path>:<contract>`
    pub fn suite_key(&self) -> String {
        format!("{}:{}", self.test_relative_path, self.contract)
    }

    /// Report key of the target test: `<test>()`
    pub fn test_key(&self) -> String {
        format!("{}()", self.test)
    }
}
