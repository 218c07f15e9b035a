use modupdate::cli;

fn main() {
    cli::init_tracing();
    if let Err(e) = cli::run() {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
