extern crate env_logger;
#[macro_use]
extern crate log;

use anyhow::Result;
use clap::Parser;

use fqsieve::cli::{self, Cli, Commands};
use fqsieve::diagnostics::{Diagnostics, FileSink};
use fqsieve::pipeline::{self, FilterSettings};
use fqsieve::transform;

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    info!("fqsieve v{}", cli::VERSION);

    match &cli.command {
        Commands::Filter {
            input,
            output,
            gc,
            lenb,
            thresh,
            bound_policy,
            info_log,
            error_log,
            summary,
        } => {
            let mut diagnostics = Diagnostics::default();
            if let Some(path) = info_log {
                diagnostics = diagnostics.with_info_sink(FileSink::append(path)?);
            }
            if let Some(path) = error_log {
                diagnostics = diagnostics.with_error_sink(FileSink::append(path)?);
            }

            let settings = FilterSettings {
                gc: *gc,
                len: *lenb,
                quality_threshold: *thresh,
                policy: *bound_policy,
            };

            info!("Filtering {input} into {output}");
            let stats = pipeline::filter_fastq(input, output, &settings, &mut diagnostics)?;

            if let Some(path) = summary {
                stats.write_json(path)?;
            }

            info!("Completed successfully.")
        }
        Commands::Transform {
            operation,
            sequences,
        } => {
            for seq in transform::run(*operation, sequences)? {
                println!("{seq}");
            }
        }
        Commands::Basic { sequences } => {
            for report in transform::basic_reports(sequences)? {
                println!("{report}");
            }
        }
    };
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
