use anyhow::Result;
use klever_sdk::{
    Address, DecodedValue, KleverClient, Network, NetworkConfig, VmOutputDecoder, VmQueryBuilder,
};
use log::info;

const EXAMPLE_CONTRACT: &str = "klv1qqqqqqqqqqqqqpgqz0ce8rdktkap33cnmup545543pxy4f67d20qpkcuus";
const LOTTERY_CONTRACT: &str = "klv1qqqqqqqqqqqqqpgqstur8rugf2k6dulnwl48frxwfgu6a7yyhtxsqf7j4f";

const EXAMPLE_ABI: &[u8] = include_bytes!("../../tests/fixtures/example.abi.json");
const LOTTERY_ABI: &[u8] = include_bytes!("../../tests/fixtures/lottery.abi.json");

fn decoder(abi: &[u8]) -> Result<VmOutputDecoder> {
    let mut decoder = VmOutputDecoder::new();
    decoder.load_abi(abi)?;
    Ok(decoder)
}

async fn view_hex(
    client: &KleverClient,
    decoder: &VmOutputDecoder,
    function: &str,
) -> Result<DecodedValue> {
    let request = VmQueryBuilder::new()
        .address(EXAMPLE_CONTRACT.parse::<Address>()?)
        .function(function)
        .to_request()?;
    Ok(client.query_and_decode_hex(decoder, &request).await?)
}

async fn lottery_winners(client: &KleverClient, decoder: &VmOutputDecoder) -> Result<DecodedValue> {
    let request = VmQueryBuilder::new()
        .address(LOTTERY_CONTRACT.parse::<Address>()?)
        .function("getWinnersInfo")
        .arg_string("SCLotteryDemo")
        .to_request()?;
    Ok(client.query_and_decode(decoder, &request).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let client = KleverClient::builder()
        .network(NetworkConfig::new(Network::TestNet)?)
        .build()?;
    let example = decoder(EXAMPLE_ABI)?;
    let lottery = decoder(LOTTERY_ABI)?;

    info!("Querying {} views...", client.network().node_url);
    let (big_ints, test_struct, winners) = tokio::join!(
        view_hex(&client, &example, "list_list_list_big_int"),
        view_hex(&client, &example, "struct_test"),
        lottery_winners(&client, &lottery),
    );

    info!("list_list_list_big_int: {}", big_ints?);

    if let Some(fields) = test_struct?.as_struct() {
        info!("struct_test:");
        for (name, value) in fields.iter() {
            info!("  {name}: {value}");
        }
    }

    let winners = winners?;
    for winner in winners.as_list().unwrap_or_default() {
        info!("Winner: {winner}");
    }
    Ok(())
}
