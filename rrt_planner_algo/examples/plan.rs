//! Headless planning run: grow to the goal, spend the rewire budget,
//! print the resulting path.

use rrt_planner_algo::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let start = Point::new(10.0, 10.0);
    let goal = Point::new(100.0, 100.0);
    let mut session = create_session(start, goal, 20.0, 5, 0)?;

    let mut steps = 0usize;
    let initial = loop {
        steps += 1;
        if let GrowResult::GoalReached(path) = session.grow() {
            break path;
        }
    };
    println!(
        "goal reached after {steps} steps, {} nodes, cost {:.2}",
        session.nodes().len(),
        initial.total_cost
    );

    // One hundred improvement attempts per path entry.
    session.set_rewire_budget(initial.points.len() * 100);
    let mut improvements = 0usize;
    while session.rewires_remaining() > 0 {
        if let RewireResult::Improved { .. } = session.rewire_once() {
            improvements += 1;
        }
    }

    let final_path = session.current_path().unwrap();
    println!(
        "{improvements} improvements, final cost {:.2}",
        final_path.total_cost
    );
    for p in &final_path.points {
        println!("  ({:.1}, {:.1})", p.x, p.y);
    }
    Ok(())
}
