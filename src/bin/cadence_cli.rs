use cadence::{cli, init};

fn main() {
    init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = cli::run(&args) {
        cli::output::error(&err);
        std::process::exit(1);
    }
}
