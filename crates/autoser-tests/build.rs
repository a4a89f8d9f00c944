fn main() -> anyhow::Result<()> {
  autoser_gen::build::generate()
}
