fn main() -> anyhow::Result<()> {
    webmap_cli::run()
}
