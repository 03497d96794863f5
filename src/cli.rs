use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

use crate::bound::{BoundPolicy, BoundSpec};
use crate::transform::Operation;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
🧫 fqsieve version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   quality control filtering for sequencing reads";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    flatten_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter a .fastq file by mean quality, GC content and length
    #[command(arg_required_else_help = true)]
    Filter {
        /// the input .fastq
        #[arg(long)]
        input: String,

        /// the output .fastq
        #[arg(long)]
        output: String,

        /// keep reads whose GC content (in percent) is within the interval [a,b].
        /// a single value b is read as the interval [0,b].
        ///   --gc 60
        ///   --gc 40,60
        #[arg(
            long,
            value_parser = |x: &str| BoundSpec::try_from(x),
            default_value = "0,100",
            verbatim_doc_comment
        )]
        gc: BoundSpec,

        /// keep reads whose length is within the interval [a,b].
        /// see the docs for `--gc` for how to give the interval.
        #[arg(
            long,
            value_parser = |x: &str| BoundSpec::try_from(x),
            default_value = "0,4294967296",
            verbatim_doc_comment
        )]
        lenb: BoundSpec,

        /// keep reads whose mean Phred quality is at least this value.
        /// negative values are treated as 0.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true, verbatim_doc_comment)]
        thresh: i64,

        /// whether reads on the ends of the --gc and --lenb intervals are kept
        #[arg(long, value_enum, default_value = "inclusive")]
        bound_policy: BoundPolicy,

        /// append informational diagnostics to this file
        #[arg(long)]
        info_log: Option<String>,

        /// append error diagnostics to this file
        #[arg(long)]
        error_log: Option<String>,

        /// write a JSON summary of the run to this file
        #[arg(long)]
        summary: Option<String>,
    },

    /// Transcribe, reverse or complement DNA/RNA sequences
    #[command(arg_required_else_help = true)]
    Transform {
        #[arg(value_enum)]
        operation: Operation,

        /// the sequences to transform. a sequence containing U is read as RNA, otherwise DNA.
        #[arg(required = true)]
        sequences: Vec<String>,
    },

    /// Report whether amino acid sequences contain basic residues (K, R, H)
    #[command(arg_required_else_help = true)]
    Basic {
        #[arg(required = true)]
        sequences: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("fqsieve").chain(args.iter().copied()))
    }

    #[test]
    fn filter_defaults() {
        let cli = parse(&["filter", "--input", "in.fastq", "--output", "out.fastq"]).unwrap();
        let Commands::Filter {
            gc,
            lenb,
            thresh,
            bound_policy,
            ..
        } = cli.command
        else {
            panic!("expected filter");
        };

        assert_eq!(gc, BoundSpec::Pair(0, 100));
        assert_eq!(lenb, BoundSpec::Pair(0, 1 << 32));
        assert_eq!(thresh, 0);
        assert_eq!(bound_policy, BoundPolicy::Inclusive);
    }

    #[test]
    fn filter_scalar_and_negative() {
        let cli = parse(&[
            "filter", "--input", "a", "--output", "b", "--lenb", "50", "--thresh", "-11",
        ])
        .unwrap();
        let Commands::Filter { lenb, thresh, .. } = cli.command else {
            panic!("expected filter");
        };
        assert_eq!(lenb, BoundSpec::Scalar(50));
        assert_eq!(thresh, -11);
    }

    #[test]
    fn filter_rejects_bad_bounds() {
        assert!(parse(&["filter", "--input", "a", "--output", "b", "--gc", "1,2,3"]).is_err());
        assert!(parse(&["filter", "--input", "a", "--output", "b", "--lenb", "x"]).is_err());
    }

    #[test]
    fn filter_requires_paths() {
        assert!(parse(&["filter", "--input", "a"]).is_err());
    }

    #[test]
    fn transform_operation_names() {
        let cli = parse(&["transform", "reverse-complement", "ACGT", "AAA"]).unwrap();
        let Commands::Transform {
            operation,
            sequences,
        } = cli.command
        else {
            panic!("expected transform");
        };
        assert_eq!(operation, Operation::ReverseComplement);
        assert_eq!(sequences, vec!["ACGT", "AAA"]);
    }
}
