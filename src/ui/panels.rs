use crate::config::{RefractionParams, IOR_MAX, IOR_MIN, IOR_STEP};
use crate::core::{FpsCounter, LoadingProgress};

const FPS_COLOR: egui::Color32 = egui::Color32::from_rgb(74, 158, 255);

/// Frame stats pinned to the top-left corner
pub fn fps_panel(ctx: &egui::Context, fps: &FpsCounter) {
    egui::Window::new("Stats")
        .title_bar(false)
        .resizable(false)
        .fixed_pos(egui::pos2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("{:.0} FPS", fps.fps()))
                    .size(18.0)
                    .color(FPS_COLOR),
            );
            ui.label(
                egui::RichText::new(format!("{:.2} ms", fps.frame_ms()))
                    .size(12.0)
                    .color(egui::Color32::GRAY),
            );
        });
}

/// IOR sliders, returns true when a value changed this frame
pub fn refraction_panel(ctx: &egui::Context, params: &mut RefractionParams) -> bool {
    let mut changed = false;
    egui::Window::new("Refraction")
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
        .show(ctx, |ui| {
            for (label, value) in [
                ("iorR", &mut params.ior_r),
                ("iorG", &mut params.ior_g),
                ("iorB", &mut params.ior_b),
            ] {
                let slider = egui::Slider::new(value, IOR_MIN..=IOR_MAX)
                    .step_by(IOR_STEP)
                    .text(label);
                changed |= ui.add(slider).changed();
            }
        });
    changed
}

/// Centered progress bar shown while setup stages run
pub fn loading_panel(ctx: &egui::Context, progress: &LoadingProgress, label: &str) {
    egui::Area::new(egui::Id::new("loading"))
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.set_width(300.0);
            ui.label(label);
            ui.add(egui::ProgressBar::new(progress.fraction()).show_percentage());
        });
}
