use anyhow::Context;
use clap::Parser;
use pwdedup::utils::{logger, validation::Validate};
use pwdedup::{DedupEngine, DedupError, DomainNormalizer, SubtractArgs, SubtractPipeline};
use std::io::{self, Write};

fn run(args: &SubtractArgs) -> anyhow::Result<()> {
    args.validate()?;
    let config = args.common.load_config().context("invalid configuration")?;

    let normalizer = DomainNormalizer::for_strategy(
        config.normalizer.strategy,
        config.normalizer.heuristic(),
    );
    let pipeline = SubtractPipeline::new(
        &args.target,
        &args.reference,
        normalizer,
        config.subtract.clone(),
    );

    let stdout = io::stdout();
    let mut engine = DedupEngine::new(pipeline);
    let stats = engine.run(stdout.lock()).with_context(|| {
        format!(
            "failed to subtract '{}' from '{}'",
            args.reference.display(),
            args.target.display()
        )
    })?;

    if args.common.summary {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{}", serde_json::to_string(&stats)?)?;
    }

    Ok(())
}

fn main() {
    // 缺少位置參數時 clap 會輸出用法並以非零狀態結束
    let args = SubtractArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.common.verbose, args.common.log_format);
    tracing::debug!("CLI args: {:?}", args);

    if let Err(err) = run(&args) {
        tracing::error!("❌ pwdedup failed: {:#}", err);
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
