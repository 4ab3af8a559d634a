//! Headless arena demo.
//!
//! Seeds an arena from a sample task list, runs the wave to completion and
//! prints the combat log.

use arena_engine::*;

fn main() {
    let seed = 42;
    println!("Starting arena engine headless demo (seed: {})", seed);

    let mut app = create_headless_app(seed);

    let tasks = vec![
        TaskRef {
            id: "t1".into(),
            title: "Write weekly report".into(),
            is_overdue: false,
        },
        TaskRef {
            id: "t2".into(),
            title: "Fix login bug".into(),
            is_overdue: true,
        },
        TaskRef {
            id: "t3".into(),
            title: "Review pull requests".into(),
            is_overdue: false,
        },
    ];

    app.world_mut().send_event(InitializeArena { tasks, seed });
    app.update();
    app.world_mut().send_event(StartWave);
    app.update();

    // Let the wave spawn, then fell every enemy through the task bridge.
    for _ in 0..10 {
        app.world_mut().resource_mut::<ArenaClock>().skip(1.0);
        app.update();
    }
    for task_id in ["t1", "t2", "t3"] {
        app.world_mut().send_event(TaskCompleted {
            task_id: task_id.into(),
        });
        app.world_mut().resource_mut::<ArenaClock>().skip(1.0);
        app.update();
    }

    let phase = app.world().resource::<PhaseState>().current();
    let run = app.world().resource::<ArenaRun>();
    println!(
        "Run over: phase={} kills={} xp={} status={:?}",
        phase.as_str(),
        run.kills,
        run.xp_earned,
        run.status
    );

    println!("--- combat log (newest first) ---");
    for entry in app.world().resource::<CombatLog>().entries() {
        println!("[{:>7.2}s] [{}] {}", entry.timestamp, entry.kind.as_str(), entry.message);
    }
}
