use clap::Parser;
use colored::Colorize;
use mobile_connect::cli::UnusedIpArgs;
use mobile_connect::logging;
use mobile_connect::processing::available_addresses;
use mobile_connect::sakura::{SakuraClient, SimApi};
use std::io::Write;

#[tokio::main]
async fn main() {
    // Keep main.rs small, the logic is tested in the library
    dotenv::dotenv().ok();
    let args = UnusedIpArgs::parse();
    if let Err(e) = logging::init_logging(logging::level_from_verbosity(args.common.verbose)) {
        eprintln!("logging disabled: {e}");
    }
    log::info!("#Start get-unused-ip");

    if let Err(e) = run(&args).await {
        eprintln!("{}", e.to_string().red());
        std::process::exit(1);
    }
}

async fn run(args: &UnusedIpArgs) -> mobile_connect::Result<()> {
    let settings = args.common.settings()?;
    log::info!(
        "zone={} mgw={} cidr={}",
        settings.zone,
        settings.mgw_resource_id,
        settings.network
    );

    eprintln!("Fetching SIMs of mobile gateway {} ...", settings.mgw_resource_id);
    let client = SakuraClient::new(&settings)?;
    let used = client.used_addresses().await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for ip in available_addresses(settings.network, &used) {
        // Reader went away (e.g. piped into head), stop walking the network
        if writeln!(out, "{ip}").is_err() {
            log::debug!("stdout closed, stopping at {ip}");
            break;
        }
    }
    Ok(())
}
