use anyhow::Result;
use tracing::info;

use lt_app::ProjectorReplica;
use lt_core::Frame;

use crate::bootstrap::AppDeps;

pub async fn run(deps: &AppDeps) -> Result<()> {
    let watcher = deps.channel.spawn_watcher(deps.poll_interval());
    let replica = ProjectorReplica::attach(deps.channel.clone()).await?;
    println!("projector {} attached", replica.surface_id());

    tokio::select! {
        result = replica.run(|frame| println!("{}", describe(frame))) => result?,
        _ = tokio::signal::ctrl_c() => info!("projector interrupted"),
    }

    watcher.abort();
    Ok(())
}

/// Text rendition of a frame for terminal output.
pub fn describe(frame: &Frame) -> String {
    match frame {
        Frame::Welcome { .. } => "[welcome]".to_string(),
        Frame::Rest { .. } => "[blackout]".to_string(),
        Frame::Text {
            content,
            reference,
            font_size,
            reference_font_size,
            ..
        } => {
            let mut out = format!("{content}\n");
            if let Some(reference) = reference {
                out.push_str(&format!("  -- {reference}\n"));
            }
            out.push_str(&format!("  [{font_size}px / {reference_font_size}px]"));
            out
        }
    }
}
