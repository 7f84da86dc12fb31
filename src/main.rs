fn main() -> anyhow::Result<()> {
    templeyard::run()
}
