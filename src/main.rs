use anyhow::{Context, Result};
use filecombiner::{
    combine::file_combiner, config::CombinerConfig, CombineError, FileCombinerConfig,
};
use std::{
    env,
    io::{self, BufRead, Write},
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) resolve folder + output ──────────────────────────────────
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
        "configured"
    );

    // ─── 3) file type: config or prompt ──────────────────────────────
    let file_type = match &config.file_type {
        Some(t) => t.clone(),
        None => match prompt_file_type(io::stdin().lock(), io::stdout()) {
            Ok(t) => t,
            Err(e) => {
                error!("Error: {:#}", e);
                return Ok(());
            }
        },
    };

    // ─── 4) combine ──────────────────────────────────────────────────
    match file_combiner::run(&config, &file_type) {
        Ok(report) => {
            for (path, reason) in &report.files_skipped {
                info!("skipped {}: {}", path.display(), reason);
            }
        }
        Err(e) => error!("Error: {:#}", e),
    }
    Ok(())
}

/// Positional args win; otherwise the `file_combiner` section of the YAML config.
fn resolve_config() -> Result<FileCombinerConfig> {
    let args: Vec<String> = env::args().skip(1).collect();
    if let Some(cfg) = FileCombinerConfig::from_args(&args)? {
        return Ok(cfg);
    }

    let path = CombinerConfig::default_path();
    if !path.exists() {
        return Err(CombineError::Config(format!(
            "usage: filecombiner <INPUT_DIR> [OUTPUT_CSV], or provide {}",
            path.display()
        ))
        .into());
    }
    CombinerConfig::load(&path)?.file_combiner.ok_or_else(|| {
        CombineError::Config(format!("no `file_combiner` section in {}", path.display())).into()
    })
}

fn prompt_file_type<R: BufRead, W: Write>(mut input: R, mut out: W) -> Result<String> {
    write!(out, "Enter the file type to combine ('excel' or 'csv'): ")?;
    out.flush()?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read file type from stdin")?;
    Ok(line.trim().to_string())
}
