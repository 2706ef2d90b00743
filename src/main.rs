use clap::Parser;
use client_allocator::core::pipeline::read_roster;
use client_allocator::core::pools::ManagerPools;
use client_allocator::utils::error::ErrorSeverity;
use client_allocator::utils::{logger, validation::Validate};
use client_allocator::{
    AllocationPipeline, AllocationRunner, AllocatorConfig, AllocatorError, CliArgs,
    ClientDistributor, LocalStorage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting client-allocator");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match AllocatorConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(output) = &args.output {
        config.output.path = output.clone();
        tracing::info!("🔧 Output overridden to: {}", output);
    }

    // dry runs skip the [geocoder] section
    let validated = if args.dry_run {
        config.validate_rosters()
    } else {
        config.validate()
    };
    if let Err(e) = validated {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.input.directory.clone());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no geocoding, no output");
        if let Err(e) = dry_run(&storage, &config).await {
            exit_with(e);
        }
        return Ok(());
    }

    let distributor = match ClientDistributor::from_config(&config) {
        Ok(distributor) => distributor,
        Err(e) => exit_with(e),
    };
    let pipeline = AllocationPipeline::new(storage, config, distributor);

    let runner = AllocationRunner::new(pipeline);
    match runner.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Allocation completed successfully!");
            println!("✅ Allocation completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

async fn dry_run(storage: &LocalStorage, config: &AllocatorConfig) -> client_allocator::Result<()> {
    let mut roster = read_roster(storage, &config.input).await?;
    let pools = ManagerPools::build(&roster.managers, &mut roster.offices, &config.rules)?;

    println!("Clients:  {}", roster.clients.len());
    println!("Managers: {}", roster.managers.len());
    println!("VIP pool: {}", pools.vip().len());
    println!("Foreign-client pool: {}", pools.foreign().len());
    for office in &roster.offices {
        let location = match office.location {
            Some(c) => format!("{:.4}, {:.4}", c.latitude, c.longitude),
            None => "no location".to_string(),
        };
        println!(
            "Office '{}' ({}): {} managers",
            office.id,
            location,
            office.managers().len()
        );
    }
    Ok(())
}

fn exit_with(e: AllocatorError) -> ! {
    tracing::error!(
        "❌ Allocation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
