//! Interactive exploration loop using dialoguer
//!
//! Stands in for the dashboard's dropdown and range slider: pick a group
//! variable, enter a range, see the ranked groups, repeat.

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::pipeline::DashboardContext;
use crate::report::print_aggregation;

/// Entry appended to the variable list to leave the loop
const QUIT_ITEM: &str = "Quit";

/// Run the explore loop until the user quits
pub fn run_explore(ctx: &DashboardContext) -> Result<()> {
    let theme = ColorfulTheme::default();
    let variables = ctx.selectable_variables();

    if variables.is_empty() {
        println!("    {}", style("No selectable variables in this dataset").yellow());
        return Ok(());
    }

    let mut items: Vec<String> = variables
        .iter()
        .map(|v| format!("{} ({})", v.display_name, v.name))
        .collect();
    items.push(QUIT_ITEM.to_string());

    let mut range = ctx.rules().default_range;
    let mut selected = 0;

    loop {
        selected = Select::with_theme(&theme)
            .with_prompt("Group by")
            .items(&items)
            .default(selected)
            .interact()?;

        let Some(variable) = variables.get(selected) else {
            break;
        };

        range = prompt_range(&theme, range)?;

        let groups = ctx.compute_aggregation(&variable.name, range)?;
        print_aggregation(
            &ctx.chart_title(&variable.name, range),
            &groups,
            &variable.display_name,
            &ctx.rules().metric_label,
        );
        println!();

        if !confirm_continue(&theme)? {
            break;
        }
    }

    Ok(())
}

/// Prompt for an inclusive range, offering the previous one as default
fn prompt_range(theme: &ColorfulTheme, previous: (f64, f64)) -> Result<(f64, f64)> {
    let low: f64 = Input::with_theme(theme)
        .with_prompt("Filter from")
        .default(previous.0)
        .interact_text()?;
    let high: f64 = Input::with_theme(theme)
        .with_prompt("Filter to")
        .default(previous.1)
        .interact_text()?;
    Ok((low, high))
}

/// Prompt user to confirm running another query
fn confirm_continue(theme: &ColorfulTheme) -> Result<bool> {
    let confirmed = Confirm::with_theme(theme)
        .with_prompt("Run another query?")
        .default(true)
        .interact()?;
    Ok(confirmed)
}
