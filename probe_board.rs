// Queries one Darwin operation directly and prints the raw and normalized responses.
// Run with: DARWIN_TOKEN=... cargo run --bin probe_board -- LDS [departures|arrivals|all]

use rail_gateway::config::DarwinConfig;
use rail_gateway::darwin::{
    BoardOptions, Crs, DarwinClient, OperationId, RequestParams, SoapFault, SoapRequest,
};
use rail_gateway::translator::normalize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let crs: Crs = args.next().unwrap_or_else(|| "LDS".to_string()).parse()?;
    let operation = match args.next().as_deref() {
        Some("arrivals") => OperationId::ArrivalBoard,
        Some("all") => OperationId::CombinedBoard,
        _ => OperationId::DepartureBoard,
    };

    let token = std::env::var("DARWIN_TOKEN")
        .map_err(|_| anyhow::anyhow!("DARWIN_TOKEN must be set"))?;

    let config = DarwinConfig::default();
    let client = DarwinClient::new(&config)?;

    let mut options = BoardOptions::new(crs);
    options.num_rows = Some(5);
    let request = SoapRequest::build(&token, operation, &RequestParams::Board(options))?;

    println!("\n=== {} via {} ===", operation, client.endpoint());
    let response = match client.send_soap_request(request.to_xml()).await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("{} Error: {}", operation, e);
            if let Some(fault) = e.fault() {
                eprintln!("Fault: {}", fault.reason);
            }
            return Ok(());
        }
    };

    println!("Raw response:");
    println!("{}", response);

    println!("\n=== Normalized ===");
    match normalize(&response, operation) {
        Ok(document) => println!("{}", serde_json::to_string_pretty(&document)?),
        Err(e) => {
            eprintln!("Normalize Error: {}", e);
            if let Some(fault) = SoapFault::parse(&response) {
                eprintln!("Fault: {}", fault.reason);
            }
        }
    }

    Ok(())
}
