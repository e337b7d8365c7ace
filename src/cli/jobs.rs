//! CLI handlers for long-running jobs: generation, status watching, YouTube.

use super::{CliResult, Context, UploadArgs};
use crate::api::{JobKind, UploadRequest};
use crate::poller::JobStatusPoller;

fn poller(ctx: &Context, project: &str) -> JobStatusPoller {
    JobStatusPoller::with_settings(
        ctx.backend.clone(),
        project,
        ctx.config.poll_settings(JobKind::Generation),
        ctx.config.poll_settings(JobKind::Upload),
    )
}

/// Print each new status of `kind` until Ctrl-C.
async fn follow(poller: &JobStatusPoller, kind: JobKind) -> CliResult {
    poller.start(kind);
    let mut updates = poller.subscribe(kind);
    let mut last_printed: Option<String> = None;
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    println!("👀 Watching {kind} status of {} (Ctrl-C to stop)", poller.project_id());
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = updates.borrow_and_update().last_result.clone();
                if let Some(status) = status {
                    if last_printed.as_deref() != Some(status.text.as_str()) {
                        match &status.started_at {
                            Some(started_at) => println!("[{started_at}] {}", status.text),
                            None => println!("{}", status.text),
                        }
                        last_printed = Some(status.text);
                    }
                }
            }
            _ = &mut interrupt => break,
        }
    }
    poller.stop(kind);
    Ok(())
}

/// Handle `vogon generate <project> [--watch]`.
pub async fn handle_generate(ctx: &Context, project: &str, watch: bool) -> CliResult {
    ctx.backend.generate_all_videos(project).await?;
    println!("🎬 Video generation started for {project}");
    if watch {
        follow(&poller(ctx, project), JobKind::Generation).await?;
    }
    Ok(())
}

/// Handle `vogon cancel <project>`.
pub async fn handle_cancel(ctx: &Context, project: &str) -> CliResult {
    ctx.backend.cancel_video_generation(project).await?;
    println!("🛑 Video generation cancelled for {project}");
    Ok(())
}

/// Handle `vogon watch <project> [--kind]`.
pub async fn handle_watch(ctx: &Context, project: &str, kind: JobKind) -> CliResult {
    follow(&poller(ctx, project), kind).await
}

/// Handle `vogon youtube channel`.
pub async fn handle_channel(ctx: &Context) -> CliResult {
    match ctx.publisher().linked_channel().await? {
        Some(channel) => println!("📺 {} ({})", channel.display_name(), channel.id),
        None => println!("The linked account has no YouTube channel."),
    }
    Ok(())
}

async fn linked_channel_id(ctx: &Context) -> Result<String, Box<dyn std::error::Error>> {
    let channel = ctx
        .publisher()
        .linked_channel()
        .await?
        .ok_or("the linked account has no YouTube channel")?;
    Ok(channel.id)
}

/// Handle `vogon youtube upload <project> [--watch]`.
///
/// Title and description default to the project's saved configuration.
pub async fn handle_upload(ctx: &Context, args: &UploadArgs) -> CliResult {
    let channel_id = linked_channel_id(ctx).await?;
    let config = ctx.backend.get_config(&args.project).await?;
    let request = UploadRequest {
        project_id: args.project.clone(),
        channel_id,
        title: args
            .title
            .clone()
            .unwrap_or_else(|| config.video_title().to_string()),
        description: args
            .description
            .clone()
            .unwrap_or_else(|| config.video_description().to_string()),
    };
    ctx.publisher().start_video_upload(&request).await?;
    println!("⬆️  Upload started for {}", args.project);
    if args.watch {
        follow(&poller(ctx, &args.project), JobKind::Upload).await?;
    } else {
        println!("   Follow it with: vogon watch {} --kind upload", args.project);
    }
    Ok(())
}

/// Handle `vogon youtube remove <project>`.
pub async fn handle_remove(ctx: &Context, project: &str) -> CliResult {
    let channel_id = linked_channel_id(ctx).await?;
    ctx.publisher()
        .remove_uploaded_videos(project, &channel_id)
        .await?;
    println!("🗑️  Removal of uploaded videos started for {project}");
    println!("   Follow it with: vogon watch {project} --kind upload");
    Ok(())
}
