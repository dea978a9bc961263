use anyhow::Result;
use clap::Parser;
use covstat::cli::{init_logging, Cli, Commands};
use covstat::commands::cover::{handle_cover, CoverConfig};
use covstat::commands::tests::{handle_tests, TestsConfig};
use covstat::config::load_config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let formatting = cli.formatting();
    let file_config = load_config();

    match cli.command {
        Commands::Cover {
            profile,
            func,
            root_module,
            format,
            output,
            sort,
        } => handle_cover(
            CoverConfig {
                profile,
                func,
                root_module,
                format,
                output,
                sort,
            },
            file_config,
            formatting,
        ),
        Commands::Tests {
            json,
            format,
            output,
        } => handle_tests(
            TestsConfig {
                json,
                format,
                output,
            },
            file_config,
            formatting,
        ),
    }
}
