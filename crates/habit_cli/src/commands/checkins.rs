use super::{print_json, Context};
use chrono::NaiveDate;
use habit_core::{CheckinState, DateRange, HabitId, HISTORY_WINDOW_DAYS};
use log::info;
use serde::Serialize;
use std::error::Error;

#[derive(Serialize)]
struct Toggled {
    id: HabitId,
    date: NaiveDate,
    state: CheckinState,
}

#[derive(Serialize)]
struct History {
    id: HabitId,
    from: NaiveDate,
    to: NaiveDate,
    dates: Vec<NaiveDate>,
}

pub fn toggle(ctx: &Context, id: HabitId, date: Option<NaiveDate>) -> Result<(), Box<dyn Error>> {
    let date = date.unwrap_or_else(|| ctx.today());
    let state = ctx.habits()?.toggle_checkin(id, date)?;
    info!("event=checkin_toggle module=cli status=ok habit_id={id} date={date} state={state:?}");

    if ctx.json() {
        return print_json(&Toggled { id, date, state });
    }
    match state {
        CheckinState::Checked => println!("Checked in for {date}!"),
        CheckinState::Unchecked => println!("Unchecked for {date}"),
    }
    Ok(())
}

pub fn history(
    ctx: &Context,
    id: HabitId,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), Box<dyn Error>> {
    let (from, to) = default_window(from, to, ctx.today());
    let dates = ctx.habits()?.list_checkins_in_range(id, from, to)?;

    if ctx.json() {
        return print_json(&History {
            id,
            from,
            to,
            dates,
        });
    }
    if dates.is_empty() {
        println!("No check-ins between {from} and {to}");
    }
    for date in dates {
        println!("{date}");
    }
    Ok(())
}

/// Fills a missing bound so the window spans `HISTORY_WINDOW_DAYS` days.
fn default_window(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let to = to.unwrap_or(today);
    let from = from.unwrap_or_else(|| DateRange::ending_at(to, HISTORY_WINDOW_DAYS).start());
    (from, to)
}
