use rrt_planner_sim::App;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1100.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "RRT Planner",
        options,
        Box::new(|cc| Ok(Box::new(App::new(cc)))),
    )
}
