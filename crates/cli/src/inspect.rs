use crate::{ScanArgs, artifacts};
use anyhow::Context;
use tracing::warn;
use webmap_core::{Driver, Target};
use webmap_java::JavaClassReader;

pub fn run(args: &ScanArgs) -> anyhow::Result<()> {
    if !args.webapp().is_dir() {
        warn!(
            "Web application directory {} does not exist",
            args.webapp().display()
        );
        return Ok(());
    }

    let config = args.load_config()?;
    let artifacts = artifacts::collect(args).context("failed to list WEB-INF/lib")?;
    let reader = JavaClassReader;
    let targets = Target::defaults(&config, args.webapp());
    let reports = Driver::new(&config, &reader).inspect(&artifacts, &targets)?;

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
