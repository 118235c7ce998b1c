pub fn run() -> anyhow::Result<()> {
    println!("frugal {}", env!("CARGO_PKG_VERSION"));
    println!("Context optimization for AI coding assistants");
    Ok(())
}
