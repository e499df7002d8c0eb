// Usage: airquality [DATA_DIR]
fn main() {
    let data_dir = std::env::args_os().nth(1).map(std::path::PathBuf::from);
    if let Err(e) = airquality_lib::run(data_dir) {
        eprintln!("airquality: {e}");
        std::process::exit(1);
    }
}
