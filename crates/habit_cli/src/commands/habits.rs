use super::{print_json, Context};
use habit_core::{HabitId, HabitListQuery, HabitSummary};
use log::info;
use serde::Serialize;
use std::error::Error;

/// JSON reply for commands that act on one habit.
#[derive(Serialize)]
struct HabitRef {
    id: HabitId,
}

pub fn add(ctx: &Context, name: &str, description: Option<&str>) -> Result<(), Box<dyn Error>> {
    let id = ctx.habits()?.create_habit(name, description)?;
    info!("event=habit_create module=cli status=ok habit_id={id}");

    if ctx.json() {
        return print_json(&HabitRef { id });
    }
    println!("Habit created: {id}");
    Ok(())
}

pub fn list(ctx: &Context, include_archived: bool) -> Result<(), Box<dyn Error>> {
    let query = HabitListQuery { include_archived };
    let rows = ctx.dashboard()?.overview_with(&query, ctx.today())?;

    if ctx.json() {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No habits yet. Create one with `habit add <name>`.");
        return Ok(());
    }
    for row in &rows {
        println!("{}", format_summary(row));
    }
    Ok(())
}

pub fn show(ctx: &Context, id: HabitId) -> Result<(), Box<dyn Error>> {
    let detail = ctx.dashboard()?.detail(id, ctx.today())?;
    if ctx.json() {
        return print_json(&detail);
    }

    let habit = &detail.habit;
    println!("{} ({})", habit.name, habit.uuid);
    if let Some(description) = &habit.description {
        println!("  {description}");
    }
    if habit.archived {
        println!("  archived");
    }
    println!(
        "  streak: {}  today: {}  total check-ins: {}",
        detail.streak,
        if detail.checked_today { "done" } else { "open" },
        detail.total_checkins
    );
    let grid: String = detail
        .days
        .iter()
        .map(|cell| if cell.checked { '#' } else { '.' })
        .collect();
    if let (Some(first), Some(last)) = (detail.days.first(), detail.days.last()) {
        println!("  {} {grid} {}", first.date, last.date);
    }
    Ok(())
}

pub fn archive(ctx: &Context, id: HabitId) -> Result<(), Box<dyn Error>> {
    ctx.habits()?.archive_habit(id)?;
    info!("event=habit_archive module=cli status=ok habit_id={id}");
    if ctx.json() {
        return print_json(&HabitRef { id });
    }
    println!("Habit archived: {id}");
    Ok(())
}

pub fn delete(ctx: &Context, id: HabitId) -> Result<(), Box<dyn Error>> {
    ctx.habits()?.delete_habit(id)?;
    info!("event=habit_delete module=cli status=ok habit_id={id}");
    if ctx.json() {
        return print_json(&HabitRef { id });
    }
    println!("Habit deleted: {id}");
    Ok(())
}

fn format_summary(row: &HabitSummary) -> String {
    let mark = if row.checked_today { "x" } else { " " };
    let archived = if row.habit.archived { " (archived)" } else { "" };
    format!(
        "[{mark}] {:<30} streak {:>3}  {}{archived}",
        row.habit.name, row.streak, row.habit.uuid
    )
}

#[cfg(test)]
mod tests {
    use super::format_summary;
    use habit_core::{Habit, HabitSummary};
    use uuid::Uuid;

    #[test]
    fn summary_line_marks_today_and_archive_state() {
        let id = Uuid::nil();
        let row = HabitSummary {
            habit: Habit {
                uuid: id,
                name: "Read".to_string(),
                description: None,
                created_at: 0,
                archived: true,
            },
            streak: 4,
            checked_today: true,
        };

        let line = format_summary(&row);
        assert!(line.starts_with("[x] Read"));
        assert!(line.contains("streak   4"));
        assert!(line.ends_with(&format!("{id} (archived)")));
    }
}
