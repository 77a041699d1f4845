use clap::Parser;
use miette::Result;
use valuekit::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
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
    valuekit::logging::init_tracing(cli.global.verbose);

    match cli.command {
        Commands::Simulate(args) => valuekit::cli::commands::simulate::run(args, &cli.global),
        Commands::Sample(args) => valuekit::cli::commands::sample::run(args, &cli.global),
        Commands::Negotiate(args) => valuekit::cli::commands::negotiate::run(args, &cli.global),
        Commands::Methods => valuekit::cli::commands::methods::run(&cli.global),
        Commands::Completions(args) => valuekit::cli::commands::completions::run(args),
    }
}
