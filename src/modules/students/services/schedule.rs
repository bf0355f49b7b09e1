use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

use crate::modules::students::models::{ClassType, Student};

const FIRST_SLOT_HOUR: u32 = 6;
const LAST_SLOT_HOUR: u32 = 23;
const SLOT_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledStudent {
    pub id: String,
    pub name: String,
    pub class_type: ClassType,
    pub class_time: String,
}

/// One half-hour row of the daily board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSlot {
    /// Slot start, 24h `HH:MM`
    pub time: String,
    /// `H:MM AM|PM`
    pub label: String,
    pub students: Vec<ScheduledStudent>,
}

/// 12-hour label used on the board, e.g. `6:30 PM`
pub fn slot_label(time: NaiveTime) -> String {
    let hour = time.hour();
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, time.minute(), period)
}

fn slot_starts() -> Vec<NaiveTime> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .flat_map(|h| [(h, 0), (h, 30)])
        .filter_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
        .collect()
}

/// Places each active student with a class time into the slot containing it.
/// Times outside 06:00..24:00 appear in no slot.
pub fn daily_schedule(students: &[Student], today: NaiveDate) -> Vec<ScheduleSlot> {
    let scheduled: Vec<(&Student, NaiveTime)> = students
        .iter()
        .filter(|s| s.is_active(today))
        .filter_map(|s| s.class_time.map(|t| (s, t)))
        .collect();

    slot_starts()
        .into_iter()
        .map(|start| {
            let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(SLOT_MINUTES));
            let students = scheduled
                .iter()
                .filter(|(_, t)| *t >= start && (wrapped != 0 || *t < end))
                .map(|(s, t)| ScheduledStudent {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    class_type: s.class_type,
                    class_time: t.format("%H:%M").to_string(),
                })
                .collect();

            ScheduleSlot {
                time: start.format("%H:%M").to_string(),
                label: slot_label(start),
                students,
            }
        })
        .collect()
}
