//! Clock readings for stamping exported files.

/// Milliseconds since the UNIX epoch, or 0 if the clock is unavailable.
#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

// Page load time plus time since load, both already in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn timestamp_millis() -> u64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map_or(0, |perf| (perf.time_origin() + perf.now()) as u64)
}
