use clap::Parser;
use colored::Colorize;
use mobile_connect::cli::RegisterSimArgs;
use mobile_connect::config::Settings;
use mobile_connect::input::load_sim_list;
use mobile_connect::logging;
use mobile_connect::output::Progress;
use mobile_connect::processing::{available_addresses, register_sims};
use mobile_connect::sakura::{SakuraClient, SimApi};
use std::collections::HashSet;
use std::net::Ipv4Addr;

#[tokio::main]
async fn main() {
    // Keep main.rs small, the logic is tested in the library
    dotenv::dotenv().ok();
    let args = RegisterSimArgs::parse();
    if let Err(e) = logging::init_logging(logging::level_from_verbosity(args.common.verbose)) {
        eprintln!("logging disabled: {e}");
    }
    log::info!("#Start register-sim");

    if let Err(e) = run(&args).await {
        eprintln!("{}", e.to_string().red());
        std::process::exit(1);
    }
}

async fn run(args: &RegisterSimArgs) -> mobile_connect::Result<()> {
    let (csv_path, settings) = args.settings()?;
    let mut progress = Progress::new(std::io::stdout());

    progress.step(format_args!("Loading CSV file ({}) ...", csv_path.display()));
    let sims = progress.close_line(load_sim_list(&csv_path))?;

    progress.step("Fetching available IP addresses ...");
    let (client, used) = progress.close_line(fetch_used(&settings).await)?;
    // Only as many addresses as SIMs can ever be handed out
    let addrs: Vec<Ipv4Addr> = available_addresses(settings.network, &used)
        .take(sims.len())
        .collect();
    log::info!("{} SIMs, {} free addresses reserved", sims.len(), addrs.len());

    progress.line("Bulk SIM registration started");
    let summary = register_sims(&client, &sims, &addrs, &mut progress).await?;
    progress.line(format_args!(
        "Bulk SIM registration finished: {} registered, {} skipped",
        summary.registered.len(),
        summary.skipped.len()
    ));
    Ok(())
}

async fn fetch_used(
    settings: &Settings,
) -> mobile_connect::Result<(SakuraClient, HashSet<Ipv4Addr>)> {
    let client = SakuraClient::new(settings)?;
    let used = client.used_addresses().await?;
    Ok((client, used))
}
