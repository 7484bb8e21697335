use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use env_logger::Env;
use lb_convert_services::{
    run,
    Config,
};

mod args;
use args::Args;


fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse_from(wild::args_os());

    #[cfg(debug_assertions)]
    dbg!(&args);

    let config = Config::from(args);
    let summary = run(&config).with_context(|| format!("Failed to convert {}", config.input.display()))?;

    if summary.skipped > 0 {
        println!("Skipped {} scrobbles that can't be imported", summary.skipped);
    }
    if summary.filtered > 0 {
        println!("Excluded {} listens outside the requested time range", summary.filtered);
    }
    println!("Listens written: {}", summary.written);
    println!("Created: {}", config.archive.display());

    Ok(())
}
