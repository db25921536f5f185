fn main() {
    if let Err(err) = codescout_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
