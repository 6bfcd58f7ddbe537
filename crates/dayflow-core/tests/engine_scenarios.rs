//! End-to-end engine scenarios over the pure synthesis function.

use chrono::{Local, NaiveDate, TimeZone};
use dayflow_core::engine::{due_now, synthesize, DayPlan, ItemClass, PlanInputs, TimelineItem};
use dayflow_core::init::PlannerInitialization;
use dayflow_core::settings::DayPlannerSettings;
use dayflow_core::task::{DeadlineType, Priority, Profile, StrategicCategory, Task, TaskCategory};
use dayflow_core::time::Minutes;

/// An off day under the default 3-on/3-off rotation.
fn off_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 26).unwrap()
}

fn init_at(date: NaiveDate, hour: u32, minute: u32) -> PlannerInitialization {
    let t_zero = Local
        .with_ymd_and_hms(2026, 2, 26, hour, minute, 0)
        .unwrap();
    PlannerInitialization::new(date, t_zero)
}

fn task(id: &str, duration: u32) -> Task {
    let mut t = Task::new(id, Profile::Personal, TaskCategory::Todo);
    t.id = id.to_string();
    t.estimated_duration = Some(duration);
    t.priority = Priority::Mid;
    t
}

/// Settings that suppress every off-day routine so the backlog loop runs
/// from a bare fill pointer.
fn bare_settings() -> DayPlannerSettings {
    let mut s = DayPlannerSettings::default();
    s.routines.meal_prep.required = false;
    s
}

struct Scenario {
    is_work_day: bool,
    settings: DayPlannerSettings,
    initialization: Option<PlannerInitialization>,
    tasks: Vec<Task>,
    now: Minutes,
    active_task: Option<String>,
    flow_mode: bool,
}

impl Scenario {
    fn off(settings: DayPlannerSettings) -> Self {
        Scenario {
            is_work_day: false,
            settings,
            initialization: None,
            tasks: Vec::new(),
            now: Minutes::from_hm(8, 0),
            active_task: None,
            flow_mode: false,
        }
    }

    fn work(settings: DayPlannerSettings) -> Self {
        Scenario {
            is_work_day: true,
            settings,
            initialization: None,
            tasks: Vec::new(),
            now: Minutes::from_hm(8, 0),
            active_task: None,
            flow_mode: false,
        }
    }

    fn synthesize(&self) -> DayPlan {
        let inputs = PlanInputs {
            is_work_day: self.is_work_day,
            settings: &self.settings,
            initialization: self.initialization.as_ref(),
            tasks: &self.tasks,
            now: self.now,
            active_task: self.active_task.as_deref(),
            flow_mode: self.flow_mode,
        };
        synthesize(&inputs)
    }
}

fn find<'a>(items: &'a [TimelineItem], id: &str) -> &'a TimelineItem {
    items
        .iter()
        .find(|i| i.id == id)
        .unwrap_or_else(|| panic!("no item '{id}'"))
}

fn index_of(items: &[TimelineItem], id: &str) -> usize {
    items
        .iter()
        .position(|i| i.id == id)
        .unwrap_or_else(|| panic!("no item '{id}'"))
}

#[test]
fn off_day_without_initialization_awaits() {
    let scenario = Scenario::off(DayPlannerSettings::default());
    assert!(scenario.synthesize().is_awaiting_initialization());
}

#[test]
fn initialized_off_day_with_no_tasks_has_routine_anchors() {
    let mut scenario = Scenario::off(DayPlannerSettings::default());
    scenario.initialization = Some(init_at(off_day(), 9, 0));

    let plan = scenario.synthesize();
    assert!(!plan.is_awaiting_initialization());
    let items = plan.items();

    // T-zero 09:00 is before mid-morning, so the wake block is explicit.
    assert_eq!(find(items, "wake").time, Some(Minutes::from_hm(9, 0)));
    // Gym snaps to the fill pointer because T-zero is inside the window.
    assert_eq!(find(items, "gym").time, Some(Minutes::from_hm(9, 30)));
    // Meal prep follows the gym cooldown.
    assert_eq!(find(items, "meal-prep").time, Some(Minutes::from_hm(11, 15)));
    // Sleep is last at the nominal off-day bedtime.
    let last = items.last().unwrap();
    assert_eq!(last.id, "sleep");
    assert_eq!(last.time, Some(Minutes::from_hm(23, 30)));
    assert_eq!(items.len(), 4);
}

#[test]
fn early_t_zero_snaps_gym_to_window_start() {
    let mut scenario = Scenario::off(DayPlannerSettings::default());
    scenario.initialization = Some(init_at(off_day(), 6, 30));

    let items_owned = scenario.synthesize();
    let items = items_owned.items();
    assert_eq!(find(items, "wake").time, Some(Minutes::from_hm(6, 30)));
    assert_eq!(find(items, "gym").time, Some(Minutes::from_hm(8, 0)));
}

#[test]
fn late_t_zero_skips_wake_and_gym() {
    let mut scenario = Scenario::off(DayPlannerSettings::default());
    scenario.initialization = Some(init_at(off_day(), 13, 0));

    let plan = scenario.synthesize();
    let items = plan.items();
    assert!(items.iter().all(|i| i.id != "wake"));
    assert!(items.iter().all(|i| i.id != "gym"));
    assert_eq!(find(items, "meal-prep").time, Some(Minutes::from_hm(13, 0)));
}

#[test]
fn synthesis_is_deterministic() {
    let mut scenario = Scenario::off(DayPlannerSettings::default());
    scenario.initialization = Some(init_at(off_day(), 9, 0));
    scenario.tasks = vec![task("t1", 45), task("t2", 60), task("t3", 30)];
    scenario.tasks[1].priority = Priority::High;
    scenario.tasks[2].impact_score = Some(9);

    assert_eq!(scenario.synthesize(), scenario.synthesize());
}

#[test]
fn backlog_orders_by_priority_then_impact() {
    let mut scenario = Scenario::off(bare_settings());
    scenario.initialization = Some(init_at(off_day(), 13, 0));

    let mut low_high_impact = task("low-impactful", 30);
    low_high_impact.priority = Priority::Low;
    low_high_impact.impact_score = Some(99);
    let mut high = task("high", 30);
    high.priority = Priority::High;
    let mut mid_a = task("mid-a", 30);
    mid_a.impact_score = Some(5);
    let mut mid_b = task("mid-b", 30);
    mid_b.impact_score = Some(8);
    scenario.tasks = vec![low_high_impact, mid_a, high, mid_b];

    let plan = scenario.synthesize();
    let items = plan.items();
    let order: Vec<usize> = ["high", "mid-b", "mid-a", "low-impactful"]
        .iter()
        .map(|id| index_of(items, id))
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn non_filler_items_never_overlap() {
    let mut scenario = Scenario::off(DayPlannerSettings::default());
    scenario.initialization = Some(init_at(off_day(), 9, 0));
    scenario.tasks = (0..4).map(|i| task(&format!("t{i}"), 50)).collect();

    let plan = scenario.synthesize();
    let solid: Vec<&TimelineItem> = plan
        .items()
        .iter()
        .filter(|i| i.class != ItemClass::C)
        .collect();
    for (i, a) in solid.iter().enumerate() {
        for b in &solid[i + 1..] {
            assert!(!a.overlaps(b), "{} overlaps {}", a.id, b.id);
        }
    }
}

#[test]
fn sleep_is_corrected_across_midnight() {
    // Meal prep at 22:00 pushes the backlog past midnight: task1 ends
    // 23:55, task2 ends 00:20, nominal sleep 23:30.
    let mut scenario = Scenario::off(DayPlannerSettings::default());
    scenario.initialization = Some(init_at(off_day(), 22, 0));
    let mut t1 = task("t1", 60);
    t1.priority = Priority::High;
    let t2 = task("t2", 15);
    scenario.tasks = vec![t1, t2];

    let plan = scenario.synthesize();
    let items = plan.items();
    let last = items.last().unwrap();
    assert_eq!(last.id, "sleep");
    assert_eq!(last.time.unwrap().to_string(), "00:20");

    // The corrected start matches the end of the preceding item.
    let before_sleep = &items[items.len() - 2];
    assert_eq!(before_sleep.end_time.unwrap().wrapped(), 20);
}

#[test]
fn sleep_keeps_nominal_time_on_a_quiet_day() {
    let mut scenario = Scenario::off(DayPlannerSettings::default());
    scenario.initialization = Some(init_at(off_day(), 9, 0));
    scenario.tasks = vec![task("t1", 30)];

    let plan = scenario.synthesize();
    let last = plan.items().last().unwrap().clone();
    assert_eq!(last.id, "sleep");
    assert_eq!(last.time, Some(Minutes::from_hm(23, 30)));
}

#[test]
fn recovery_break_appears_after_180_consecutive_minutes() {
    let mut scenario = Scenario::off(bare_settings());
    scenario.initialization = Some(init_at(off_day(), 13, 0));
    scenario.tasks = (1..=5).map(|i| task(&format!("t{i}"), 60)).collect();

    let plan = scenario.synthesize();
    let items = plan.items();

    let recovery = find(items, "recovery-1");
    assert_eq!(recovery.duration, 30);
    assert_eq!(recovery.class, ItemClass::C);
    // After the third task (180 cumulative minutes), before the fourth.
    assert!(index_of(items, "recovery-1") > index_of(items, "t3"));
    assert!(index_of(items, "recovery-1") < index_of(items, "t4"));
    // The counter reset means no second break before t5.
    assert!(items.iter().filter(|i| i.id.starts_with("recovery")).count() == 1);
}

#[test]
fn flow_mode_hides_future_non_critical_tasks() {
    let mut scenario = Scenario::off(bare_settings());
    scenario.initialization = Some(init_at(off_day(), 13, 0));
    scenario.now = Minutes::from_hm(13, 30);
    scenario.flow_mode = true;
    // past-task lands at 13:00 (before now), future-task at 14:10.
    scenario.tasks = vec![task("past-task", 60), task("future-task", 30)];

    let plan = scenario.synthesize();
    let items = plan.items();
    assert!(items.iter().any(|i| i.id == "past-task"));
    assert!(items.iter().all(|i| i.id != "future-task"));
}

#[test]
fn flow_mode_keeps_urgent_and_hard_deadline_tasks() {
    let mut scenario = Scenario::off(bare_settings());
    scenario.initialization = Some(init_at(off_day(), 13, 0));
    scenario.now = Minutes::from_hm(12, 0);
    scenario.flow_mode = true;

    let mut urgent = task("urgent-task", 30);
    urgent.priority = Priority::Urgent;
    let mut hard = task("hard-deadline", 30);
    hard.deadline_type = DeadlineType::Hard;
    scenario.tasks = vec![urgent, hard, task("ordinary", 30)];

    let plan = scenario.synthesize();
    let items = plan.items();
    assert!(items.iter().any(|i| i.id == "urgent-task"));
    assert!(items.iter().any(|i| i.id == "hard-deadline"));
    assert!(items.iter().all(|i| i.id != "ordinary"));
}

#[test]
fn stalled_flag_respects_the_grace_window() {
    let mut scenario = Scenario::off(bare_settings());
    scenario.initialization = Some(init_at(off_day(), 13, 0));
    let mut appointment = task("appointment", 60);
    appointment.start_time = Some(Minutes::from_hm(9, 0));
    scenario.tasks = vec![appointment];

    scenario.now = Minutes::from_hm(9, 20);
    let plan = scenario.synthesize();
    assert!(find(plan.items(), "appointment").is_stalled);

    scenario.now = Minutes::from_hm(9, 10);
    let plan = scenario.synthesize();
    let item = find(plan.items(), "appointment");
    assert!(!item.is_stalled);
    assert!(item.is_current);
}

#[test]
fn active_task_is_never_stalled() {
    let mut scenario = Scenario::off(bare_settings());
    scenario.initialization = Some(init_at(off_day(), 13, 0));
    let mut appointment = task("appointment", 60);
    appointment.start_time = Some(Minutes::from_hm(9, 0));
    scenario.tasks = vec![appointment];
    scenario.now = Minutes::from_hm(9, 20);
    scenario.active_task = Some("appointment".to_string());

    let plan = scenario.synthesize();
    let item = find(plan.items(), "appointment");
    assert!(item.is_active);
    assert!(!item.is_stalled);
}

#[test]
fn travel_legs_wrap_the_task() {
    let mut scenario = Scenario::off(bare_settings());
    scenario.initialization = Some(init_at(off_day(), 13, 0));
    let mut errand = task("errand", 60);
    errand.travel_to_duration = Some(15);
    errand.travel_from_duration = Some(10);
    scenario.tasks = vec![errand];

    let plan = scenario.synthesize();
    let items = plan.items();
    let to = find(items, "transit-to-errand");
    let main = find(items, "errand");
    let from = find(items, "transit-from-errand");

    assert_eq!(to.time, Some(Minutes::from_hm(13, 0)));
    assert_eq!(main.time, Some(Minutes::from_hm(13, 15)));
    assert_eq!(from.time, Some(Minutes::from_hm(14, 15)));
    assert_eq!(to.class, ItemClass::C);
    assert_eq!(from.class, ItemClass::C);
    assert!(index_of(items, "transit-to-errand") < index_of(items, "errand"));
    assert!(index_of(items, "errand") < index_of(items, "transit-from-errand"));
}

#[test]
fn chill_mode_short_circuits_both_branches() {
    let mut settings = DayPlannerSettings::default();
    settings.chill_mode_active = true;

    let mut urgent = task("fire", 30);
    urgent.priority = Priority::Urgent;
    let ordinary = task("laundry", 30);

    for mut scenario in [Scenario::off(settings.clone()), Scenario::work(settings.clone())] {
        scenario.tasks = vec![urgent.clone(), ordinary.clone()];
        // No initialization on the off day; chill wins anyway.
        let plan = scenario.synthesize();
        match plan {
            DayPlan::Chill(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].id, "fire");
                assert_eq!(items[0].time_label(), "--:--");
            }
            other => panic!("expected chill plan, got {other:?}"),
        }
    }
}

#[test]
fn work_day_emits_the_shift_skeleton() {
    let scenario = Scenario::work(DayPlannerSettings::default());
    let plan = scenario.synthesize();
    let items = plan.items();

    assert_eq!(find(items, "wake").time, Some(Minutes::from_hm(3, 30)));
    assert_eq!(find(items, "shift-early").time, Some(Minutes::from_hm(6, 0)));
    assert_eq!(find(items, "shift-late").duration, 210);
    assert_eq!(
        find(items, "evening-routine").time,
        Some(Minutes::from_hm(19, 40))
    );
    assert!(items.iter().filter(|i| i.class == ItemClass::A).count() >= 9);
    let last = items.last().unwrap();
    assert_eq!(last.id, "sleep");
    assert_eq!(last.time, Some(Minutes::from_hm(21, 30)));
}

#[test]
fn work_evening_packs_allowed_categories_by_impact() {
    let mut scenario = Scenario::work(DayPlannerSettings::default());

    let mut fits = task("journal", 30);
    fits.strategic_category = Some(StrategicCategory::Personal);
    fits.impact_score = Some(4);
    let mut too_long = task("long-read", 40);
    too_long.strategic_category = Some(StrategicCategory::Health);
    too_long.impact_score = Some(2);
    let mut wrong_category = task("invoices", 20);
    wrong_category.strategic_category = Some(StrategicCategory::Finance);
    wrong_category.impact_score = Some(90);
    let untagged = task("untagged", 20);
    scenario.tasks = vec![wrong_category, too_long, fits, untagged];

    let plan = scenario.synthesize();
    let items = plan.items();

    // 20:40 + 30 fits before the 21:30 bedtime; the follow-up no longer does.
    assert_eq!(find(items, "journal").time, Some(Minutes::from_hm(20, 40)));
    assert!(items.iter().all(|i| i.id != "long-read"));
    // Category gate beats impact.
    assert!(items.iter().all(|i| i.id != "invoices"));
    assert!(items.iter().all(|i| i.id != "untagged"));
}

#[test]
fn work_evening_honors_the_minute_budget() {
    let mut settings = DayPlannerSettings::default();
    settings.bed_time_work = Minutes::from_hm(23, 0);
    settings.evening.max_duration_minutes = 45;
    let mut scenario = Scenario::work(settings);

    let mut first = task("first", 40);
    first.strategic_category = Some(StrategicCategory::Personal);
    first.impact_score = Some(9);
    let mut second = task("second", 30);
    second.strategic_category = Some(StrategicCategory::Personal);
    second.impact_score = Some(5);
    scenario.tasks = vec![first, second];

    let plan = scenario.synthesize();
    let items = plan.items();
    // Both fit before bedtime, but the 45-minute budget only covers one.
    assert!(items.iter().any(|i| i.id == "first"));
    assert!(items.iter().all(|i| i.id != "second"));
}

#[test]
fn appointment_start_time_overrides_placement() {
    let mut scenario = Scenario::work(DayPlannerSettings::default());
    let mut appointment = task("call", 20);
    appointment.strategic_category = Some(StrategicCategory::Personal);
    appointment.start_time = Some(Minutes::from_hm(21, 0));
    scenario.tasks = vec![appointment];

    let plan = scenario.synthesize();
    assert_eq!(find(plan.items(), "call").time, Some(Minutes::from_hm(21, 0)));
}

#[test]
fn due_now_matches_the_current_minute() {
    let mut scenario = Scenario::off(DayPlannerSettings::default());
    scenario.initialization = Some(init_at(off_day(), 9, 0));
    let plan = scenario.synthesize();

    let hits = due_now(plan.items(), Minutes::from_hm(9, 30));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "gym");
    assert!(due_now(plan.items(), Minutes::from_hm(9, 31)).is_empty());
}
