fn main() {
    if let Err(err) = lca_ingest::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
