use crate::{ScanArgs, artifacts};
use anyhow::Context;
use tracing::{info, warn};
use webmap_core::{Driver, Target};
use webmap_java::JavaClassReader;

pub fn run(args: &ScanArgs) -> anyhow::Result<()> {
    if !args.webapp().is_dir() {
        warn!(
            "Web application directory {} does not exist, nothing to generate",
            args.webapp().display()
        );
        return Ok(());
    }

    let config = args.load_config()?;
    let artifacts = artifacts::collect(args).context("failed to list WEB-INF/lib")?;
    info!(
        "Generating route mappings for {} ({} artifacts)...",
        args.webapp().display(),
        artifacts.len()
    );

    let reader = JavaClassReader;
    let targets = Target::defaults(&config, args.webapp());
    let summary = Driver::new(&config, &reader).run(&artifacts, &targets)?;

    for document in &summary.documents {
        let state = if document.changed { "updated" } else { "unchanged" };
        println!(
            "{}: {} ({} mappings)",
            document.path.display(),
            state,
            document.mappings
        );
    }
    println!("Servlet mappings generated: {}", summary.mappings_generated);
    println!("Servlet mappings skipped: {}", summary.skipped);
    println!("Security constraints generated: {}", summary.elevated);
    Ok(())
}
