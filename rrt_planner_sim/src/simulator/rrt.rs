//! Interactive incremental planning panel

use egui::*;
use egui_plot::{Line, PlotPoints, PlotResponse, PlotUi, Polygon};
use log::{info, warn};
use rrt_planner_algo::prelude::*;

use super::{Draw, Simulate};

/// State of the planning process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanningState {
    /// Waiting for start point
    WaitingForStart,
    /// Waiting for goal point
    WaitingForGoal,
    /// Session created, growing and rewiring incrementally
    Running,
}

/// One interactive planner instance
pub struct RrtPlanning {
    /// Unique identifier
    id: usize,
    /// Current planning state
    state: PlanningState,
    /// Start position in world coordinates
    start: Option<Point>,
    /// Goal position in world coordinates
    goal: Option<Point>,
    /// The running planning session
    session: Option<Session>,
    /// Successful rewires in the current run
    improvements: usize,
    /// Steering step size for new runs
    step_size: f32,
    /// Nearest-neighbor count for rewiring in new runs
    neighbor_count: usize,
    /// Rewire attempts granted per path entry once the goal connects
    attempts_per_entry: usize,
    /// Show the full exploration tree
    show_tree: bool,
}

impl RrtPlanning {
    /// Create a new planner panel
    pub fn new(id: usize) -> Self {
        Self {
            id,
            state: PlanningState::WaitingForStart,
            start: None,
            goal: None,
            session: None,
            improvements: 0,
            step_size: 20.0,
            neighbor_count: 5,
            attempts_per_entry: 100,
            show_tree: true,
        }
    }

    /// Begin a fresh session from the chosen start and goal
    fn start_session(&mut self) {
        let (Some(start), Some(goal)) = (self.start, self.goal) else {
            return;
        };
        let config = SessionConfig {
            step_size: self.step_size,
            neighbor_count: self.neighbor_count,
            ..SessionConfig::default()
        };
        match Session::new(start, goal, config) {
            Ok(session) => {
                self.session = Some(session);
                self.improvements = 0;
                self.state = PlanningState::Running;
            }
            Err(err) => {
                warn!("[sim {}] session rejected: {err}", self.id);
                self.session = None;
            }
        }
    }

    fn handle_left_click(&mut self, world_pos: Point) {
        match self.state {
            PlanningState::WaitingForStart => {
                self.start = Some(world_pos);
                self.state = PlanningState::WaitingForGoal;
            }
            PlanningState::WaitingForGoal => {
                self.goal = Some(world_pos);
                self.start_session();
            }
            PlanningState::Running => {
                self.start = Some(world_pos);
                self.goal = None;
                self.session = None;
                self.improvements = 0;
                self.state = PlanningState::WaitingForGoal;
            }
        }
    }

    /// Draw exploration tree edges along parent links
    fn draw_tree(&self, plot_ui: &mut PlotUi<'_>) {
        if !self.show_tree {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };

        let arena = session.nodes();
        for node in arena.iter() {
            if let Some(parent) = node.parent {
                let from = arena[parent].position;
                let points = PlotPoints::new(vec![
                    [from.x as f64, from.y as f64],
                    [node.position.x as f64, node.position.y as f64],
                ]);
                plot_ui.line(
                    Line::new("", points)
                        .color(Color32::from_rgba_unmultiplied(100, 180, 255, 100))
                        .width(1.0),
                );
            }
        }
    }

    /// Draw the best known path
    fn draw_path(&self, plot_ui: &mut PlotUi<'_>) {
        let Some(path) = self.session.as_ref().and_then(|s| s.current_path()) else {
            return;
        };

        let points: Vec<[f64; 2]> = path
            .points
            .iter()
            .map(|p| [p.x as f64, p.y as f64])
            .collect();
        plot_ui.line(
            Line::new(format!("Path {}", self.id), PlotPoints::new(points))
                .color(Color32::from_rgb(50, 100, 255))
                .width(3.0),
        );
    }

    /// Draw start marker (green circle)
    fn draw_start(&self, plot_ui: &mut PlotUi<'_>) {
        if let Some(p) = self.start {
            let points = self.circle_points(p, self.step_size / 3.0, 16);
            plot_ui.polygon(
                Polygon::new("Start", PlotPoints::new(points))
                    .fill_color(Color32::from_rgb(50, 200, 50))
                    .stroke(egui::Stroke::new(2.0, Color32::from_rgb(30, 150, 30))),
            );
        }
    }

    /// Draw goal marker (red circle)
    fn draw_goal(&self, plot_ui: &mut PlotUi<'_>) {
        if let Some(p) = self.goal {
            let points = self.circle_points(p, self.step_size / 3.0, 16);
            plot_ui.polygon(
                Polygon::new("Goal", PlotPoints::new(points))
                    .fill_color(Color32::from_rgb(200, 50, 50))
                    .stroke(egui::Stroke::new(2.0, Color32::from_rgb(150, 30, 30))),
            );
        }
    }

    /// Generate points for a circle
    fn circle_points(&self, center: Point, radius: f32, segments: usize) -> Vec<[f64; 2]> {
        (0..segments)
            .map(|i| {
                let angle = 2.0 * std::f32::consts::PI * (i as f32) / (segments as f32);
                [
                    (center.x + radius * angle.cos()) as f64,
                    (center.y + radius * angle.sin()) as f64,
                ]
            })
            .collect()
    }
}

impl Default for RrtPlanning {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Simulate for RrtPlanning {
    fn step(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if !session.goal_reached() {
            if let GrowResult::GoalReached(path) = session.grow() {
                let budget = path.points.len() * self.attempts_per_entry;
                session.set_rewire_budget(budget);
                info!(
                    "[sim {}] goal connected at cost {:.2}, {budget} rewire attempts",
                    self.id, path.total_cost
                );
            }
        } else if session.rewires_remaining() > 0 {
            if let RewireResult::Improved { cost_delta, .. } = session.rewire_once() {
                self.improvements += 1;
                info!("[sim {}] path shortened by {cost_delta:.2}", self.id);
            }
        }
    }

    fn reset_state(&mut self) {
        if self.start.is_some() && self.goal.is_some() {
            self.start_session();
        }
    }

    fn reset_all(&mut self) {
        self.start = None;
        self.goal = None;
        self.session = None;
        self.improvements = 0;
        self.state = PlanningState::WaitingForStart;
    }
}

impl Draw for RrtPlanning {
    fn scene(&self, plot_ui: &mut PlotUi<'_>) {
        self.draw_tree(plot_ui);
        self.draw_path(plot_ui);
        self.draw_start(plot_ui);
        self.draw_goal(plot_ui);
    }

    fn options(&mut self, ui: &mut Ui) -> bool {
        let mut keep = true;

        ui.push_id(self.id, |ui| {
            ui.group(|ui| {
                ui.set_width(220.0);
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.heading(format!("Planner {}", self.id));
                        if ui.small_button("x").clicked() {
                            keep = false;
                        }
                    });

                    ui.separator();

                    // Parameters take effect on the next run.
                    ui.horizontal(|ui| {
                        ui.label("Step size:");
                        ui.add(
                            DragValue::new(&mut self.step_size)
                                .range(1.0..=100.0)
                                .speed(0.5),
                        );
                    });
                    ui.horizontal(|ui| {
                        ui.label("Neighbors:");
                        ui.add(DragValue::new(&mut self.neighbor_count).range(1..=20));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Attempts/entry:");
                        ui.add(DragValue::new(&mut self.attempts_per_entry).range(1..=1000));
                    });
                    ui.checkbox(&mut self.show_tree, "Show tree");

                    ui.separator();

                    let status_text = match self.state {
                        PlanningState::WaitingForStart => "Click to set start point",
                        PlanningState::WaitingForGoal => "Click to set goal point",
                        PlanningState::Running => {
                            match &self.session {
                                Some(s) if !s.goal_reached() => "Growing...",
                                Some(s) if s.rewires_remaining() > 0 => "Rewiring...",
                                Some(_) => "Done",
                                None => "Ready",
                            }
                        }
                    };
                    ui.label(format!("Status: {status_text}"));

                    if let Some(session) = &self.session {
                        ui.label(format!("  Tree nodes: {}", session.nodes().len()));
                        if let Some(path) = session.current_path() {
                            ui.label(format!("  Path entries: {}", path.points.len()));
                            ui.label(format!("  Path cost: {:.2}", path.total_cost));
                            ui.label(format!(
                                "  Rewires left: {}",
                                session.rewires_remaining()
                            ));
                            ui.label(format!("  Improvements: {}", self.improvements));
                        }
                    }
                });
            });
        });

        keep
    }

    fn handle_mouse(&mut self, plot_response: &PlotResponse<()>) {
        if !plot_response.response.clicked() {
            return;
        }
        if let Some(pos) = plot_response.response.hover_pos() {
            let plot_pos = plot_response.transform.value_from_position(pos);
            let bounds = SessionConfig::default();
            let wx = (plot_pos.x as f32).clamp(0.0, bounds.workspace_width);
            let wy = (plot_pos.y as f32).clamp(0.0, bounds.workspace_height);
            self.handle_left_click(Point::new(wx, wy));
        }
    }
}
