use anyhow::Result;
use nextra_codemods::cli;
use nextra_codemods::commands;

fn main() -> Result<()> {
    let cli = cli::parse_args();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let code = commands::execute(&cli)?;
    std::process::exit(code);
}
