//! Property tests over the synthesis engine.

use chrono::{Local, NaiveDate, TimeZone};
use dayflow_core::engine::{synthesize, ItemClass, PlanInputs};
use dayflow_core::init::PlannerInitialization;
use dayflow_core::settings::DayPlannerSettings;
use dayflow_core::task::{Priority, Profile, Task, TaskCategory};
use dayflow_core::time::Minutes;
use proptest::prelude::*;

fn off_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 26).unwrap()
}

fn init_at_nine() -> PlannerInitialization {
    let t_zero = Local.with_ymd_and_hms(2026, 2, 26, 9, 0, 0).unwrap();
    PlannerInitialization::new(off_day(), t_zero)
}

fn priority_from(index: u8) -> Priority {
    match index % 5 {
        0 => Priority::Urgent,
        1 => Priority::Super,
        2 => Priority::High,
        3 => Priority::Mid,
        _ => Priority::Low,
    }
}

prop_compose! {
    fn arb_backlog()(specs in prop::collection::vec((10u32..120, 0u8..5, 0i32..100), 0..12))
        -> Vec<Task>
    {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (duration, priority, impact))| {
                let mut t = Task::new(format!("task {i}"), Profile::Personal, TaskCategory::Todo);
                t.id = format!("t{i}");
                t.estimated_duration = Some(duration);
                t.priority = priority_from(priority);
                t.impact_score = Some(impact);
                t
            })
            .collect()
    }
}

proptest! {
    #[test]
    fn same_inputs_give_byte_identical_plans(tasks in arb_backlog()) {
        let settings = DayPlannerSettings::default();
        let init = init_at_nine();
        let inputs = PlanInputs {
            is_work_day: false,
            settings: &settings,
            initialization: Some(&init),
            tasks: &tasks,
            now: Minutes::from_hm(10, 0),
            active_task: None,
            flow_mode: false,
        };
        prop_assert_eq!(synthesize(&inputs), synthesize(&inputs));
    }

    #[test]
    fn non_filler_items_are_disjoint_and_sleep_is_last(tasks in arb_backlog()) {
        let settings = DayPlannerSettings::default();
        let init = init_at_nine();
        let inputs = PlanInputs {
            is_work_day: false,
            settings: &settings,
            initialization: Some(&init),
            tasks: &tasks,
            now: Minutes::from_hm(10, 0),
            active_task: None,
            flow_mode: false,
        };
        let plan = synthesize(&inputs);
        let items = plan.items();

        let last = items.last().expect("plan always contains sleep");
        prop_assert_eq!(last.id.as_str(), "sleep");

        // Sleep never starts before the preceding item ends.
        if items.len() > 1 {
            let before = &items[items.len() - 2];
            let sleep_start = last.time.expect("sleep is scheduled");
            let before_end = before.end_time.expect("scheduled items carry ends");
            prop_assert!(sleep_start.overnight_rank() >= before_end.overnight_rank());
        }

        let solid: Vec<_> = items.iter().filter(|i| i.class != ItemClass::C).collect();
        for (i, a) in solid.iter().enumerate() {
            for b in &solid[i + 1..] {
                prop_assert!(!a.overlaps(b), "{} overlaps {}", a.id, b.id);
            }
        }
    }
}
