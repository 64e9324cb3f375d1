use anyhow::Context;
use clap::Parser;
use pwdedup::utils::logger;
use pwdedup::{DedupEngine, DedupError, DomainNormalizer, UniqueArgs, UniquePipeline};
use std::io::{self, Write};

fn run(args: &UniqueArgs) -> anyhow::Result<()> {
    let config = args.common.load_config().context("invalid configuration")?;

    let normalizer = DomainNormalizer::for_strategy(
        config.normalizer.strategy,
        config.normalizer.heuristic(),
    );
    let pipeline = UniquePipeline::new(io::stdin().lock(), normalizer, config.unique.clone());

    let stdout = io::stdout();
    let mut engine = DedupEngine::new(pipeline);
    let stats = engine
        .run(stdout.lock())
        .context("failed to deduplicate standard input")?;

    if args.common.summary {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{}", serde_json::to_string(&stats)?)?;
    }

    Ok(())
}

fn main() {
    let args = UniqueArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.common.verbose, args.common.log_format);
    tracing::debug!("CLI args: {:?}", args);

    if let Err(err) = run(&args) {
        tracing::error!("❌ pwdedup-unique failed: {:#}", err);
        eprintln!("pwdedup error: {:#}", err);
        if err
            .downcast_ref::<DedupError>()
            .is_some_and(DedupError::is_config_error)
        {
            eprintln!("💡 Check the column names and values in the --config file");
        }
        std::process::exit(1);
    }
}
