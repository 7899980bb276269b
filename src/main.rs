fn main() {
    use clap::Parser;
    use std::error::Error;
    env_logger::init();
    let args = ordsync::cli::Args::parse();
    if let Err(e) = ordsync::cli::run(&args) {
        eprintln!("{}", e);
        if args.verbose {
            let mut source = e.source();
            while let Some(s) = source {
                eprintln!("  cause: {}", s);
                source = s.source();
            }
        }
        std::process::exit(e.exit_code());
    }
}
