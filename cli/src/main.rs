fn main() -> anyhow::Result<()> {
    routestore_cli::run()
}
