fn main() {
    if let Err(err) = lollipops::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
