use clap::Parser;
use vm_translator::cli::Cli;
use vm_translator::driver;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = driver::run(&cli) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
