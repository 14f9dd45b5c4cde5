use color_eyre::Result;

fn main() -> Result<()> {
    heatmark::run_cli()
}
