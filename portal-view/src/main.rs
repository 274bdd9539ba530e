//! Application entry point for the portal diagram viewer.
//!
//! This binary installs the tracing subscriber, sets up eframe/egui and
//! delegates all interactive logic and rendering to [`Viewer`] from the
//! `viewer` module.

mod viewer;

use viewer::Viewer;

/// Starts the native eframe application.
///
/// Logging is filtered through `RUST_LOG`; the window title is `"Portal"`.
/// All UI state and rendering are handled by [`Viewer`].
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the diagram configuration is invalid or eframe fails to
///   create the native window or event loop.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Portal",
        options,
        Box::new(|_cc| {
            // Construct the root app state; a bad diagram configuration is
            // fatal here, before any frame runs.
            Ok(Box::new(Viewer::new()?))
        }),
    )
}
