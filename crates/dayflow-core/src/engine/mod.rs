//! Timeline synthesis.
//!
//! [`synthesize`] is a pure function from a day's inputs to an ordered,
//! non-overlapping timeline. All memory lives in the persisted entities
//! passed in; re-running with the same inputs yields an identical plan.
//!
//! Work days are built around a fixed shift-anchor skeleton with a greedy
//! evening fill. Off days build from the manually recorded T-zero: routine
//! blocks first, then the backlog loop with recovery-break injection and
//! the Flow Mode filter. Chill Mode short-circuits both branches.

mod item;

pub use item::{ItemClass, ItemKind, TimelineItem};

use crate::init::PlannerInitialization;
use crate::settings::DayPlannerSettings;
use crate::task::{base_task_id, DeadlineType, Priority, Task};
use crate::time::Minutes;

/// Gap left between consecutive backlog tasks, in minutes.
const INTER_TASK_GAP: i32 = 10;
/// Consecutive work minutes that trigger a recovery break.
const RECOVERY_THRESHOLD: u32 = 180;
/// Settle time appended after a recovery break.
const RECOVERY_SETTLE: i32 = 5;
/// Minutes a start time may be in the past before a task counts as stalled.
const STALL_GRACE: i32 = 15;
/// Cooldown after the gym block before the next placement.
const GYM_COOLDOWN: i32 = 15;
/// Buffer after meal prep.
const MEAL_PREP_BUFFER: i32 = 10;
/// Off-day wake block length.
const WAKE_BLOCK: u32 = 30;
/// T-zero later than this skips the explicit wake block.
const MID_MORNING: Minutes = Minutes::from_hm(10, 0);
/// Nominal sleep block length.
const SLEEP_MINUTES: u32 = 480;
/// Start of the evening fill window on work days.
const EVENING_FILL_START: Minutes = Minutes::from_hm(20, 40);

const SLEEP_ID: &str = "sleep";

const PRECEDENCE_PRE_TRAVEL: u8 = 1;
const PRECEDENCE_TASK: u8 = 2;
const PRECEDENCE_POST_TRAVEL: u8 = 3;

/// Fixed class-A skeleton of a shift day.
const WORK_DAY_ANCHORS: [(&str, &str, Minutes, u32, ItemKind); 9] = [
    ("wake", "Wake / Prep", Minutes::from_hm(3, 30), 45, ItemKind::Routine),
    ("commute-out", "Outbound Commute", Minutes::from_hm(4, 15), 90, ItemKind::Transit),
    ("shift-early", "Shift (Early)", Minutes::from_hm(6, 0), 210, ItemKind::Shift),
    ("break-1", "First Break (Meal)", Minutes::from_hm(9, 30), 30, ItemKind::Routine),
    ("shift-mid", "Shift (Mid)", Minutes::from_hm(10, 0), 240, ItemKind::Shift),
    ("break-2", "Second Break", Minutes::from_hm(14, 0), 30, ItemKind::Routine),
    ("shift-late", "Shift (Late)", Minutes::from_hm(14, 30), 210, ItemKind::Shift),
    ("commute-back", "Return Commute", Minutes::from_hm(18, 15), 85, ItemKind::Transit),
    ("evening-routine", "Evening Routine", Minutes::from_hm(19, 40), 60, ItemKind::Routine),
];

/// Everything synthesis depends on. A fresh snapshot per call; the engine
/// holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct PlanInputs<'a> {
    pub is_work_day: bool,
    pub settings: &'a DayPlannerSettings,
    pub initialization: Option<&'a PlannerInitialization>,
    /// Occurrences active on `date`: open todo tasks from both profiles,
    /// already expanded by the recurrence layer.
    pub tasks: &'a [Task],
    /// Minute-of-day "now" used for current/stalled flags.
    pub now: Minutes,
    /// Base id of the task currently in progress, if any.
    pub active_task: Option<&'a str>,
    pub flow_mode: bool,
}

/// Result of a synthesis run.
#[derive(Debug, Clone, PartialEq)]
pub enum DayPlan {
    /// Off day, not initialized, chill mode off: the caller should offer a
    /// manual "start my day" action instead of showing an empty schedule.
    AwaitingInitialization,
    /// Chill Mode: a flat list of urgent tasks with placeholder times.
    Chill(Vec<TimelineItem>),
    /// A fully built timeline.
    Scheduled(Vec<TimelineItem>),
}

impl DayPlan {
    pub fn items(&self) -> &[TimelineItem] {
        match self {
            DayPlan::AwaitingInitialization => &[],
            DayPlan::Chill(items) | DayPlan::Scheduled(items) => items,
        }
    }

    pub fn is_awaiting_initialization(&self) -> bool {
        matches!(self, DayPlan::AwaitingInitialization)
    }
}

/// Build the timeline for one day.
pub fn synthesize(inputs: &PlanInputs) -> DayPlan {
    if inputs.settings.chill_mode_active {
        return DayPlan::Chill(chill_items(inputs.tasks));
    }

    let items = if inputs.is_work_day {
        work_day_items(inputs)
    } else {
        match inputs.initialization {
            None => return DayPlan::AwaitingInitialization,
            Some(init) => off_day_items(inputs, init),
        }
    };

    DayPlan::Scheduled(order_with_sleep_last(items))
}

/// Items whose nominal start equals the current minute; drives the
/// "time to start" notification tick.
pub fn due_now(items: &[TimelineItem], now: Minutes) -> Vec<&TimelineItem> {
    items
        .iter()
        .filter(|i| i.time.is_some_and(|t| t.wrapped() == now.wrapped()))
        .collect()
}

fn chill_items(tasks: &[Task]) -> Vec<TimelineItem> {
    tasks
        .iter()
        .filter(|t| t.priority == Priority::Urgent)
        .map(|t| {
            let mut item = TimelineItem::unscheduled(
                t.id.clone(),
                t.title.clone(),
                t.duration_minutes(),
                ItemKind::Task,
                ItemClass::B,
            );
            item.priority = Some(t.priority);
            item.profile = Some(t.profile);
            item
        })
        .collect()
}

fn work_day_items(inputs: &PlanInputs) -> Vec<TimelineItem> {
    let now = inputs.now;
    let mut items: Vec<TimelineItem> = WORK_DAY_ANCHORS
        .iter()
        .map(|&(id, title, time, duration, kind)| {
            let mut item = TimelineItem::new(id, title, time, duration, kind, ItemClass::A);
            item.is_current = contains_now(time, duration, now);
            item
        })
        .collect();

    let bed = inputs.settings.bed_time_work;
    let mut cursor = EVENING_FILL_START;
    let mut budget = inputs.settings.evening.max_duration_minutes as i32;

    let mut candidates: Vec<&Task> = inputs
        .tasks
        .iter()
        .filter(|t| {
            t.strategic_category
                .is_some_and(|c| inputs.settings.evening.allowed_categories.contains(&c))
        })
        .collect();
    candidates.sort_by(|a, b| b.impact().cmp(&a.impact()));

    for task in candidates {
        let duration = task.duration_minutes();
        let travel_to = task.travel_to();
        let travel_from = task.travel_from();
        let total = (travel_to + duration + travel_from) as i32;

        // Greedy fit: skip what doesn't fit, no backtracking.
        if cursor.add(total) > bed || duration as i32 > budget {
            continue;
        }

        if travel_to > 0 {
            items.push(transit_item(&task.id, "Transit (To)", cursor, travel_to, now, true));
            cursor = cursor.add(travel_to as i32);
        }

        let start = task.start_time.unwrap_or(cursor);
        items.push(task_item(task, start, duration, inputs));
        cursor = start.add(duration as i32);

        if travel_from > 0 {
            items.push(transit_item(&task.id, "Transit (Return)", cursor, travel_from, now, false));
            cursor = cursor.add(travel_from as i32);
        }
        cursor = cursor.add(INTER_TASK_GAP);
        budget -= duration as i32;
    }

    items.push(sleep_item(bed, now));
    items
}

fn off_day_items(inputs: &PlanInputs, init: &PlannerInitialization) -> Vec<TimelineItem> {
    let settings = inputs.settings;
    let now = inputs.now;
    let mut items = Vec::new();

    let t_zero = init.t_zero_minutes();
    let mut cursor = t_zero;

    if t_zero < MID_MORNING {
        let mut wake = TimelineItem::new(
            "wake",
            "Wake Up",
            cursor,
            WAKE_BLOCK,
            ItemKind::Routine,
            ItemClass::A,
        )
        .with_precedence(10);
        wake.is_current = contains_now(cursor, WAKE_BLOCK, now);
        items.push(wake);
        cursor = cursor.add(WAKE_BLOCK as i32);
    }

    let gym = settings.routines.gym;
    if t_zero < gym.window_end {
        let gym_start = if t_zero < gym.window_start {
            gym.window_start
        } else {
            cursor
        };
        let mut session = TimelineItem::new(
            "gym",
            "Gym Session",
            gym_start,
            gym.duration_minutes,
            ItemKind::Routine,
            ItemClass::B,
        )
        .with_precedence(20);
        session.is_current = contains_now(gym_start, gym.duration_minutes, now);
        items.push(session);
        cursor = gym_start.add(gym.duration_minutes as i32 + GYM_COOLDOWN);
    }

    let meal_prep = settings.routines.meal_prep;
    if meal_prep.required {
        let mut prep = TimelineItem::new(
            "meal-prep",
            "Meal Prep",
            cursor,
            meal_prep.duration_minutes,
            ItemKind::Routine,
            ItemClass::A,
        )
        .with_precedence(30);
        prep.is_current = contains_now(cursor, meal_prep.duration_minutes, now);
        items.push(prep);
        cursor = cursor.add(meal_prep.duration_minutes as i32 + MEAL_PREP_BUFFER);
    }

    let mut backlog: Vec<&Task> = inputs.tasks.iter().collect();
    backlog.sort_by(|a, b| {
        b.priority
            .weight()
            .cmp(&a.priority.weight())
            .then(b.impact().cmp(&a.impact()))
    });

    let walk = settings.routines.walk;
    let mut consecutive_work: u32 = 0;
    let mut recovery_count: u32 = 0;

    for task in backlog {
        let scheduled = cursor;
        let after_now = scheduled > now;

        // Flow Mode hides future non-critical work; it reappears once flow
        // is off or "now" catches up.
        if inputs.flow_mode
            && after_now
            && task.priority != Priority::Urgent
            && task.deadline_type != DeadlineType::Hard
        {
            continue;
        }

        if walk.auto_inject && consecutive_work >= RECOVERY_THRESHOLD {
            recovery_count += 1;
            let mut recovery = TimelineItem::new(
                format!("recovery-{recovery_count}"),
                "Recovery (Walk/Rest)",
                cursor,
                walk.duration_minutes,
                ItemKind::Routine,
                ItemClass::C,
            )
            .with_precedence(PRECEDENCE_POST_TRAVEL);
            recovery.is_current = contains_now(cursor, walk.duration_minutes, now);
            items.push(recovery);
            cursor = cursor.add(walk.duration_minutes as i32 + RECOVERY_SETTLE);
            consecutive_work = 0;
        }

        let duration = task.duration_minutes();
        let travel_to = task.travel_to();
        let travel_from = task.travel_from();

        if travel_to > 0 {
            items.push(transit_item(&task.id, "Transit (To)", cursor, travel_to, now, true));
            cursor = cursor.add(travel_to as i32);
        }

        let start = task.start_time.unwrap_or(cursor);
        let mut item = task_item(task, start, duration, inputs);
        item.is_stalled = !task.is_completed
            && !item.is_active
            && now.get() - start.get() > STALL_GRACE;
        items.push(item);
        cursor = start.add(duration as i32);

        if travel_from > 0 {
            items.push(transit_item(&task.id, "Transit (Return)", cursor, travel_from, now, false));
            cursor = cursor.add(travel_from as i32);
        }
        cursor = cursor.add(INTER_TASK_GAP);
        consecutive_work += duration;
    }

    items.push(sleep_item(settings.bed_time_off, now));
    items
}

fn task_item(task: &Task, start: Minutes, duration: u32, inputs: &PlanInputs) -> TimelineItem {
    let mut item = TimelineItem::new(
        task.id.clone(),
        task.title.clone(),
        start,
        duration,
        ItemKind::Task,
        ItemClass::B,
    )
    .with_precedence(PRECEDENCE_TASK);
    item.is_completed = task.is_completed;
    item.is_active = is_active_id(inputs.active_task, &task.id);
    item.is_current = contains_now(start, duration, inputs.now);
    item.impact_score = Some(task.impact());
    item.location = task.location.clone();
    item.profile = Some(task.profile);
    item.strategic_category = task.strategic_category;
    item.priority = Some(task.priority);
    item
}

fn transit_item(
    task_id: &str,
    title: &str,
    time: Minutes,
    duration: u32,
    now: Minutes,
    outbound: bool,
) -> TimelineItem {
    let (id_prefix, precedence) = if outbound {
        ("transit-to", PRECEDENCE_PRE_TRAVEL)
    } else {
        ("transit-from", PRECEDENCE_POST_TRAVEL)
    };
    let mut item = TimelineItem::new(
        format!("{id_prefix}-{task_id}"),
        title,
        time,
        duration,
        ItemKind::Transit,
        ItemClass::C,
    )
    .with_precedence(precedence);
    item.is_current = contains_now(time, duration, now);
    item
}

fn sleep_item(bed: Minutes, now: Minutes) -> TimelineItem {
    let mut item = TimelineItem::new(
        SLEEP_ID,
        "Sleep",
        bed,
        SLEEP_MINUTES,
        ItemKind::Routine,
        ItemClass::A,
    );
    item.is_current = contains_now(bed, SLEEP_MINUTES, now);
    item
}

fn contains_now(start: Minutes, duration: u32, now: Minutes) -> bool {
    now >= start && now < start.add(duration as i32)
}

/// The pointer holds a base id; items may carry occurrence ids.
fn is_active_id(active: Option<&str>, item_id: &str) -> bool {
    active.is_some_and(|a| a == item_id || a == base_task_id(item_id))
}

/// Sort everything but sleep chronologically, then make sure sleep starts
/// no earlier than the last item ends. Times in the small hours count as
/// next-day for that comparison, so a backlog running past midnight pushes
/// the displayed sleep start forward instead of appearing to overlap.
fn order_with_sleep_last(items: Vec<TimelineItem>) -> Vec<TimelineItem> {
    let (mut sleep, mut rest): (Vec<TimelineItem>, Vec<TimelineItem>) =
        items.into_iter().partition(|i| i.id == SLEEP_ID);

    rest.sort_by_key(|i| (i.time.map(Minutes::get).unwrap_or(i32::MAX), i.precedence));

    if let (Some(last), Some(sleep_item)) = (rest.last(), sleep.first_mut()) {
        if let (Some(last_end), Some(sleep_start)) = (last.end_time, sleep_item.time) {
            if last_end.overnight_rank() > sleep_start.overnight_rank() {
                sleep_item.time = Some(last_end);
                sleep_item.end_time = Some(last_end.add(sleep_item.duration as i32));
            }
        }
    }

    rest.extend(sleep);
    rest
}
