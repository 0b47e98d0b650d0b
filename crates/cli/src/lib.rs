mod artifacts;
mod generate;
mod inspect;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use webmap_core::WebMapConfig;

#[derive(Parser)]
#[command(
    name = "webmap",
    version,
    about = "Generates servlet route mappings from compiled classes",
    long_about = "Scans the compiled classes of an exploded web application for servlet and \
                  handler subclasses, resolves their URL patterns and rewrites the generated \
                  region of web.xml and appengine-web.xml."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write a daily rolling log file into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate the route mappings of both deployment descriptors
    #[command(
        long_about = "Scans WEB-INF/lib, WEB-INF/classes and any extra artifacts, then replaces \
                      the generated region of web.xml and appengine-web.xml. Running it twice \
                      leaves both files unchanged."
    )]
    Generate(ScanArgs),
    /// Print the resolved mappings as JSON without touching any document
    Inspect(ScanArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Exploded web application root
    #[arg(value_name = "WEBAPP_DIR")]
    pub webapp: PathBuf,

    /// Class directories to scan (defaults to WEB-INF/classes when present)
    #[arg(long = "classes", value_name = "DIR")]
    pub classes: Vec<PathBuf>,

    /// Extra jar, zip or class files to scan
    #[arg(long = "artifact", value_name = "PATH")]
    pub artifacts: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read artifacts on a worker pool
    #[arg(long)]
    pub parallel: bool,

    /// Worker pool size (implies --parallel)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Include/exclude expression, e.g. "-java\..*, +com\.acme\..*"
    #[arg(long, value_name = "EXPR")]
    pub include_exclude: Option<String>,

    /// Type never mapped, by binary name
    #[arg(long = "exclude-class", value_name = "NAME")]
    pub exclude_classes: Vec<String>,

    #[arg(long, value_name = "PATH")]
    pub web_xml: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    pub appengine_web_xml: Option<PathBuf>,

    /// Emit a security constraint for mappings that require the elevated role
    #[arg(long)]
    pub security_constraints: bool,
}

impl ScanArgs {
    /// Config file (or defaults) with the command-line flags applied on top.
    pub fn load_config(&self) -> anyhow::Result<WebMapConfig> {
        let mut config = match &self.config {
            Some(path) => WebMapConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => WebMapConfig::default(),
        };
        if self.parallel || self.threads.is_some() {
            config.parallel = true;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        if let Some(expr) = &self.include_exclude {
            config.include_exclude = expr.clone();
        }
        config
            .exclude_classes
            .extend(self.exclude_classes.iter().cloned());
        if self.web_xml.is_some() {
            config.web_xml = self.web_xml.clone();
        }
        if self.appengine_web_xml.is_some() {
            config.appengine_web_xml = self.appengine_web_xml.clone();
        }
        config.security_constraints |= self.security_constraints;
        Ok(config)
    }

    pub fn webapp(&self) -> &Path {
        &self.webapp
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = webmap_core::logging::init_logging(cli.verbose, cli.log_dir.as_deref());

    match cli.command {
        Commands::Generate(args) => generate::run(&args),
        Commands::Inspect(args) => inspect::run(&args),
    }
}
