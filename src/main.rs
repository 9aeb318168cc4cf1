fn main() {
    if let Err(err) = retail_normalize::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
