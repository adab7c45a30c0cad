fn main() {
    if let Err(e) = hospital_records::run() {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
