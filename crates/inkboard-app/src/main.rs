//! Main application entry point (native).

fn main() {
    env_logger::init();
    log::info!("Starting Inkboard");

    if let Err(e) = inkboard_app::App::run() {
        log::error!("Inkboard exited with an error: {}", e);
        std::process::exit(1);
    }
}
