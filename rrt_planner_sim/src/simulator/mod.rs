pub mod rrt;

use rrt::RrtPlanning;

use egui::*;
use egui_plot::{Corner, Legend, Plot, PlotResponse, PlotUi};

/// Base trait for step-driven simulations hosted by the [`Simulator`].
///
/// One call to [`Simulate::step`] advances the simulation by exactly one
/// unit of work, so the host controls pacing by calling it more or fewer
/// times per frame.
pub trait Simulate {
    /// Perform a single unit of work
    fn step(&mut self);

    /// Restart the current run while keeping its inputs and parameters
    fn reset_state(&mut self);

    /// Hard reset back to the default, inputs included
    fn reset_all(&mut self);
}

/// Trait to allow visually representing simulation (simulation graphics + GUI)
pub trait Draw {
    /// Draw the simulation onto a 2D scene
    fn scene(&self, plot_ui: &mut PlotUi<'_>);
    /// Draw any GUI elements to interact with the simulation.
    /// Returns false when the panel asks to be removed.
    fn options(&mut self, ui: &mut Ui) -> bool;
    /// React to pointer activity over the scene plot
    fn handle_mouse(&mut self, plot_response: &PlotResponse<()>);
}

/// A concrete type for containing planner instances and executing them
pub struct Simulator {
    /// Side-by-side planner instances sharing the scene
    planners: Vec<RrtPlanning>,
    /// How many [`Simulate::step`] calls to issue per planner per frame
    steps_per_frame: usize,
    paused: bool,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            planners: vec![RrtPlanning::new(1)],
            steps_per_frame: 10,
            paused: false,
        }
    }
}

impl Simulator {
    /// Advance every planner by the configured number of steps
    pub fn update(&mut self) {
        if !self.paused {
            self.planners
                .iter_mut()
                .for_each(|sim| (0..self.steps_per_frame).for_each(|_| sim.step()));
        }
    }

    /// Restart every planner run with its current inputs
    fn reset_state(&mut self) {
        self.planners.iter_mut().for_each(|sim| sim.reset_state());
    }

    /// Reset every planner to default
    fn reset_all(&mut self) {
        self.planners.iter_mut().for_each(|sim| sim.reset_all());
    }

    /// Add a new planner instance
    fn add_planner(&mut self) {
        let id = self.planners.len() + 1;
        self.planners.push(RrtPlanning::new(id));
    }

    /// Draw the UI directly into a Ui (for embedding in CentralPanel)
    pub fn ui(&mut self, ui: &mut Ui) {
        // Control buttons
        ui.horizontal(|ui| {
            let btn_text = if self.paused { "Play" } else { "Pause" };
            if ui.button(btn_text).clicked() {
                self.paused = !self.paused;
            }
            if ui.button("Restart").clicked() {
                self.reset_state();
            }
            if ui.button("Reset All").clicked() {
                self.reset_all();
            }
            if ui.button("Add Planner").clicked() {
                self.add_planner();
            }

            ui.label("Steps/frame:");
            ui.add(DragValue::new(&mut self.steps_per_frame).range(1..=500));
        });

        ui.separator();

        // Options panel for current planners
        ui.horizontal(|ui| {
            self.planners.retain_mut(|sim| sim.options(ui));
        });
        if self.planners.is_empty() {
            self.add_planner();
        }

        ui.separator();

        // Instructions (collapsible)
        ui.collapsing("Instructions", |ui| {
            ui.label("Left-click the scene to place the start, then the goal.");
            ui.label("A third click begins a fresh run from that point.");
            ui.label("Pan by dragging, or scroll (+ shift = horizontal).");
            ui.label("Box zooming: Right click to zoom in and zoom out using a selection.");
            ui.label("Reset view with double-click.");
        });

        // Main scene plot
        let plot = Plot::new("Scene")
            .legend(Legend::default().position(Corner::RightTop))
            .show_x(false)
            .show_y(false)
            .data_aspect(1.0);

        let response = plot.show(ui, |plot_ui| {
            self.planners.iter().for_each(|sim| sim.scene(plot_ui));
        });

        self.planners
            .iter_mut()
            .for_each(|sim| sim.handle_mouse(&response));
    }
}
