use clap::Parser as _;
use tracing::info;

use crate::{
    lambda::client::AwsLambdaClientFactory,
    models::{args::AppArgs, config::Config},
    run::Run,
    utils::{
        downloader_def::providers::http::HttpContentSource, errors::EmptyResult,
        logger::LoggerUtils,
    },
};

mod lambda;
mod models;
mod render;
mod run;
mod utils;

fn main() {
    let args = AppArgs::parse();

    LoggerUtils::init(args.verbose);

    let version = env!("CARGO_PKG_VERSION");
    info!("🔧 Lambda Layer Inspector, Version: {version}");

    if let Err(err) = execute(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn execute(args: AppArgs) -> EmptyResult {
    let config = Config::load(args.config.as_deref())?.apply_args(&args);

    let factory = AwsLambdaClientFactory::new(config.aws.clone())?;
    let source = HttpContentSource::new()?;
    let run = Run::new(args, &config, factory, source);

    let stdout = std::io::stdout();
    run.execute(&mut stdout.lock())?;

    Ok(())
}
