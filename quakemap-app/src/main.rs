use quakemap::QuakeApp;

/// Standalone earthquake visualizer
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Earthquake Visualizer"),
        ..Default::default()
    };

    eframe::run_native(
        "quakemap-app",
        options,
        Box::new(|cc| Box::new(QuakeApp::new(cc))),
    )?;

    Ok(())
}
