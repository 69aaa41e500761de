use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use atp::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(global.verbose);

    match cli.command {
        Commands::Init(args) => atp::cli::commands::init::run(args),
        Commands::Project(cmd) => atp::cli::commands::project::run(cmd, &global),
        Commands::Room(cmd) => atp::cli::commands::room::run(cmd, &global),
        Commands::Item(cmd) => atp::cli::commands::item::run(cmd, &global),
        Commands::Equip(cmd) => atp::cli::commands::equip::run(cmd, &global),
        Commands::Import(args) => atp::cli::commands::import::run(args, &global),
        Commands::Export(cmd) => atp::cli::commands::export::run(cmd, &global),
        Commands::Status(args) => atp::cli::commands::status::run(args, &global),
        Commands::Clear(args) => atp::cli::commands::clear::run(args, &global),
        Commands::Config(cmd) => atp::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => atp::cli::commands::completions::run(args),
    }
}

/// Logs go to stderr so they never mix with command output.
///
/// `ATP_LOG` (then `RUST_LOG`) selects the filter; `--verbose` forces debug.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("atp=debug")
    } else {
        EnvFilter::try_from_env("ATP_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
