use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use klever_sdk::VmOutputDecoder;
use klever_sdk::abi::AbiSchema;

pub mod mock_node;

pub use mock_node::{MockNode, MockNodeServer};

/// ABI of the contract exercising every supported output type.
pub const EXAMPLE_ABI: &str = "example.abi.json";
/// ABI of the lottery contract, whose `getWinnersInfo` view returns `List<WinnerInfo>`.
pub const LOTTERY_ABI: &str = "lottery.abi.json";

/// Address of the deployed example contract on testnet.
pub const EXAMPLE_CONTRACT: &str =
    "klv1qqqqqqqqqqqqqpgqz0ce8rdktkap33cnmup545543pxy4f67d20qpkcuus";
/// Address of the deployed lottery contract on testnet.
pub const LOTTERY_CONTRACT: &str =
    "klv1qqqqqqqqqqqqqpgqstur8rugf2k6dulnwl48frxwfgu6a7yyhtxsqf7j4f";

/// Installs a test logger once per process. `verbose` lowers the default level to debug.
pub fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .is_test(true)
        .try_init();
}

/// Path of a file in the workspace `tests/fixtures` directory.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_schema(name: &str) -> Result<AbiSchema> {
    let path = fixture_path(name);
    let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    Ok(AbiSchema::from_reader(file)?)
}

/// A decoder loaded with the named fixture ABI.
pub fn decoder_for(name: &str) -> Result<VmOutputDecoder> {
    let schema = load_schema(name)?;
    log::debug!("Loaded fixture ABI {name} ({} endpoints)", schema.endpoints.len());
    Ok(VmOutputDecoder::with_abi(schema))
}

pub fn example_decoder() -> Result<VmOutputDecoder> {
    decoder_for(EXAMPLE_ABI)
}

pub fn lottery_decoder() -> Result<VmOutputDecoder> {
    decoder_for(LOTTERY_ABI)
}
