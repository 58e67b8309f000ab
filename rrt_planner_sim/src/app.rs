use crate::simulator::Simulator;

use eframe::egui;

/// Top-level application: advances the hosted planners once per frame
/// and hands the whole central panel to the simulator UI.
#[derive(Default)]
pub struct App {
    sim: Simulator,
}

impl App {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.sim.update();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.sim.ui(ui);
        });

        // Planning keeps running even without input events.
        ctx.request_repaint();
    }
}
