//! Vogon CLI binary entry point.

use clap::Parser;
use vogon_client::cli::{
    self, AuthCommands, Cli, Commands, Context, ProjectsArgs, YoutubeArgs, YoutubeCommands,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> cli::CliResult {
    let ctx = Context::new(cli.config()?)?;

    match cli.command {
        Commands::Auth(auth_args) => match auth_args.command {
            AuthCommands::Login => cli::auth::handle_login(&ctx).await,
            AuthCommands::Status => cli::auth::handle_status(&ctx).await,
            AuthCommands::Logout => cli::auth::handle_logout(&ctx).await,
        },
        Commands::Projects(ProjectsArgs { command }) => {
            cli::projects::handle_projects(&ctx, &command).await
        }
        Commands::Generate(args) => cli::jobs::handle_generate(&ctx, &args.project, args.watch).await,
        Commands::Cancel(args) => cli::jobs::handle_cancel(&ctx, &args.project).await,
        Commands::Watch(args) => cli::jobs::handle_watch(&ctx, &args.project, args.kind).await,
        Commands::Youtube(YoutubeArgs { command }) => match command {
            YoutubeCommands::Channel => cli::jobs::handle_channel(&ctx).await,
            YoutubeCommands::Upload(args) => cli::jobs::handle_upload(&ctx, &args).await,
            YoutubeCommands::Remove(args) => cli::jobs::handle_remove(&ctx, &args.project).await,
        },
        Commands::Assets(args) => cli::projects::handle_assets(&ctx, &args.project).await,
        Commands::AdsCsv(args) => cli::projects::handle_ads_csv(&ctx, &args.project, &args.out).await,
    }
}
