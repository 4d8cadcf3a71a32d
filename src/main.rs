fn main() {
    if let Err(e) = glowgate::app::run() {
        log::error!("event loop terminated with an error: {e:#}");
    }
}
