use anyhow::Result;

use lt_core::ResourceId;

use crate::bootstrap::AppDeps;

pub async fn run(deps: &AppDeps, resource: &str, force: bool) -> Result<()> {
    let resource_id = ResourceId::new(resource);
    let acquired = deps.load_resource.execute(&resource_id, force).await?;

    println!(
        "{}: {} items ({}, {})",
        resource_id,
        acquired.pack.len(),
        acquired.pack.kind(),
        acquired.status
    );
    if acquired.status.is_degraded() {
        println!("warning: every mirror failed, using the bundled copy");
    }
    Ok(())
}
