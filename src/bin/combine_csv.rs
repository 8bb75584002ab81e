use anyhow::Result;
use filecombiner::{
    combine::csv_combiner, config::CombinerConfig, CombineError, CsvCombinerConfig,
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // usage: combine_csv <INPUT_DIR> <OUTPUT_XLSX> [SKIP_ROWS]
    let config = match resolve_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Error: {:#}", e);
            return Ok(());
        }
    };
    info!(
        input = %config.input_folder.display(),
        output = %config.output_file.display(),
        skip_rows = config.skip_rows,
        "configured"
    );

    // errors are reported, not turned into an exit code
    if let Err(e) = csv_combiner::execute(&config) {
        error!("Error: {:#}", e);
    }
    Ok(())
}

fn resolve_config() -> Result<CsvCombinerConfig> {
    let args: Vec<String> = env::args().skip(1).collect();
    if let Some(cfg) = CsvCombinerConfig::from_args(&args)? {
        return Ok(cfg);
    }

    let path = CombinerConfig::default_path();
    if !path.exists() {
        return Err(CombineError::Config(format!(
            "usage: combine_csv <INPUT_DIR> <OUTPUT_XLSX> [SKIP_ROWS], or provide {}",
            path.display()
        ))
        .into());
    }
    CombinerConfig::load(&path)?.csv_combiner.ok_or_else(|| {
        CombineError::Config(format!("no `csv_combiner` section in {}", path.display())).into()
    })
}
