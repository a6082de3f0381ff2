use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use klever_sdk::abi::encode_input;
use klever_sdk::{
    Address, DecodedValue, KleverClient, Network, NetworkConfig, VmOutputDecoder, VmQueryBuilder,
};

/// Decode and encode Klever smart-contract values, and query contract views
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Contract ABI JSON file
    #[arg(short, long, global = true)]
    abi: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode hex payloads returned by an endpoint
    Decode {
        /// Endpoint name as declared in the ABI
        endpoint: String,
        /// Hex payloads, one per returned value
        #[arg(required = true)]
        payloads: Vec<String>,
    },
    /// Decode base64 payloads, as returned by the node `/vm/query` route
    DecodeQuery {
        endpoint: String,
        #[arg(required = true)]
        payloads: Vec<String>,
    },
    /// Decode one hex payload as an arbitrary ABI type
    DecodeType {
        /// Type string, e.g. `List<tuple<u8,Address>>`
        #[arg(value_name = "TYPE")]
        ty: String,
        hex: String,
    },
    /// Encode `type:value` arguments into call data
    Encode {
        #[arg(required = true)]
        args: Vec<String>,
    },
    /// Query a contract view on a node and decode the result
    Query {
        #[arg(short, long, default_value_t = Network::TestNet)]
        network: Network,
        /// Node URL, overriding the network default
        #[arg(long)]
        node_url: Option<String>,
        /// Bech32 address of the contract
        #[arg(long)]
        sc_address: Address,
        #[arg(short, long)]
        endpoint: String,
        /// View arguments as `type:value`
        #[arg(long = "arg")]
        args: Vec<String>,
        /// Use `/vm/hex` instead of `/vm/query`
        #[arg(long)]
        hex: bool,
    },
}

impl Command {
    async fn execute(&self, abi: Option<&PathBuf>) -> Result<()> {
        match self {
            Command::Decode { endpoint, payloads } => {
                let decoder = load_decoder(abi)?;
                print_value(&decoder.decode_hex(endpoint, payloads)?)
            }
            Command::DecodeQuery { endpoint, payloads } => {
                let decoder = load_decoder(abi)?;
                print_value(&decoder.decode_query(endpoint, payloads)?)
            }
            Command::DecodeType { ty, hex } => {
                let decoder = match abi {
                    Some(_) => load_decoder(abi)?,
                    None => VmOutputDecoder::new(),
                };
                print_value(&decoder.decode_type(ty, hex)?)
            }
            Command::Encode { args } => {
                println!("{}", encode_input(args)?);
                Ok(())
            }
            Command::Query {
                network,
                node_url,
                sc_address,
                endpoint,
                args,
                hex,
            } => {
                let network = match node_url {
                    Some(url) => NetworkConfig::custom(url, url)?,
                    None => NetworkConfig::new(*network)?,
                };
                let decoder = load_decoder(abi)?;
                self.handle_query(&decoder, network, sc_address, endpoint, args, *hex)
                    .await
            }
        }
    }

    async fn handle_query(
        &self,
        decoder: &VmOutputDecoder,
        network: NetworkConfig,
        sc_address: &Address,
        endpoint: &str,
        args: &[String],
        hex: bool,
    ) -> Result<()> {
        let mut builder = VmQueryBuilder::new()
            .address(*sc_address)
            .function(endpoint);
        for arg in args {
            let encoded = encode_input(&[arg])?;
            builder = builder.arg_hex(encoded.trim_start_matches('@'));
        }
        let request = builder.to_request()?;

        let client = KleverClient::builder().network(network).build()?;
        log::info!(
            "Querying `{endpoint}` on {sc_address} via {}",
            client.network().node_url
        );
        let value = if hex {
            client.query_and_decode_hex(decoder, &request).await?
        } else {
            client.query_and_decode(decoder, &request).await?
        };
        print_value(&value)
    }
}

fn load_decoder(abi: Option<&PathBuf>) -> Result<VmOutputDecoder> {
    let path = abi.context("this command needs an ABI file, pass it with --abi")?;
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut decoder = VmOutputDecoder::new();
    decoder
        .load_abi(file)
        .with_context(|| format!("loading ABI {}", path.display()))?;
    Ok(decoder)
}

fn print_value(value: &DecodedValue) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    args.command.execute(args.abi.as_ref()).await
}
