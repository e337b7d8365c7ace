//! CLI handlers for projects, assets and exports.

use std::path::Path;

use super::{CliResult, Context, ProjectCommands};
use crate::project::AssetCatalog;

/// Handle `vogon projects <command>`.
pub async fn handle_projects(ctx: &Context, command: &ProjectCommands) -> CliResult {
    match command {
        ProjectCommands::List => {
            let projects = ctx.backend.list_projects().await?;
            if projects.is_empty() {
                println!("No projects yet.");
            }
            for project in projects {
                println!("{:<32} {}", project.name, project.size);
            }
        }
        ProjectCommands::Create(args) => {
            let id = ctx.backend.create_project(&args.project).await?;
            println!("✅ Created project {id}");
        }
        ProjectCommands::Delete(args) => {
            ctx.backend.delete_project(&args.project).await?;
            println!("🗑️  Deleted project {}", args.project);
        }
        ProjectCommands::Clear(args) => {
            ctx.backend.clear_project(&args.project).await?;
            println!("🧹 Removed generated videos of {}", args.project);
        }
    }
    Ok(())
}

/// Handle `vogon assets <project>`.
pub async fn handle_assets(ctx: &Context, project: &str) -> CliResult {
    let catalog = AssetCatalog::from_paths(ctx.backend.list_assets(project).await?);
    if catalog.is_empty() {
        println!("No assets in {project}.");
    }
    for asset in catalog.assets() {
        println!("{:<8} {}", asset.kind, asset.name);
    }
    Ok(())
}

/// Handle `vogon ads-csv <project> --out <path>`.
pub async fn handle_ads_csv(ctx: &Context, project: &str, out: &Path) -> CliResult {
    let csv = ctx.backend.google_ads_editor_csv(project).await?;
    tokio::fs::write(out, &csv).await?;
    println!("📄 Wrote {} bytes to {}", csv.len(), out.display());
    Ok(())
}
