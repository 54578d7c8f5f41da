//! Terminal tables for classification summaries, variable listings and results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{DashboardContext, GroupMean, SelectableKind, SelectableVariable};

/// Width of the longest bar in the result table
const BAR_WIDTH: usize = 30;

/// Summary of the startup classification pass
#[derive(Debug, Default)]
pub struct ClassificationSummary {
    pub total_columns: usize,
    pub categorical: Vec<String>,
    pub numeric: Vec<String>,
    pub excluded: Vec<String>,
    /// (derived name, effective bins)
    pub binned: Vec<(String, usize)>,
    pub selectable: usize,
}

impl ClassificationSummary {
    pub fn from_context(ctx: &DashboardContext) -> Self {
        let classification = ctx.classification();
        let to_owned = |names: Vec<&str>| -> Vec<String> { names.into_iter().map(String::from).collect() };
        Self {
            total_columns: classification.columns().len(),
            categorical: to_owned(classification.categorical()),
            numeric: to_owned(classification.numeric()),
            excluded: to_owned(classification.excluded()),
            binned: ctx
                .binned_variables()
                .iter()
                .map(|b| (b.name.clone(), b.bin_count()))
                .collect(),
            selectable: ctx.selectable_variables().len(),
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("CLASSIFICATION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Columns"), Cell::new(self.total_columns)]);
        table.add_row(vec![
            Cell::new("🏷️  Categorical"),
            Cell::new(self.categorical.len()).fg(Color::Cyan),
        ]);
        table.add_row(vec![
            Cell::new("🔢 Numeric"),
            Cell::new(self.numeric.len()).fg(Color::Cyan),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Excluded"),
            Cell::new(self.excluded.len()).fg(if self.excluded.is_empty() {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("📦 Binned"),
            Cell::new(self.binned.len()).fg(Color::Yellow),
        ]);
        table.add_row(vec![
            Cell::new("✅ Selectable"),
            Cell::new(self.selectable)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        print_indented(&table);

        if !self.binned.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Binned Variables").yellow(),
                style(format!("({})", self.binned.len())).dim()
            );
            for (name, bins) in &self.binned {
                println!("        {} {} {}", style("•").dim(), name, style(format!("{} bins", bins)).dim());
            }
        }

        if !self.excluded.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Excluded").yellow(),
                style(format!("({})", self.excluded.len())).dim()
            );
            for name in &self.excluded {
                println!("        {} {}", style("•").dim(), name);
            }
        }
    }
}

/// Print the selectable-variable listing
pub fn print_variables_table(variables: &[SelectableVariable]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Variable").add_attribute(Attribute::Bold),
        Cell::new("Display Name").add_attribute(Attribute::Bold),
        Cell::new("Kind").add_attribute(Attribute::Bold),
    ]);

    for var in variables {
        let (kind, color) = match var.kind {
            SelectableKind::Text => ("text", Color::White),
            SelectableKind::Dictionary => ("dictionary", Color::Cyan),
            SelectableKind::Binned => ("binned", Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&var.name),
            Cell::new(&var.display_name),
            Cell::new(kind).fg(color),
        ]);
    }

    print_indented(&table);
}

/// Render an aggregation result as a table with a proportional bar per group
pub fn render_aggregation_table(groups: &[GroupMean], group_header: &str, metric_header: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new(group_header).add_attribute(Attribute::Bold),
        Cell::new(metric_header).add_attribute(Attribute::Bold),
        Cell::new("Rows").add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);

    let max = groups
        .iter()
        .map(|g| g.value.abs())
        .fold(0.0f64, f64::max);

    for group in groups {
        let width = if max > 0.0 {
            ((group.value.abs() / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        table.add_row(vec![
            Cell::new(&group.label),
            Cell::new(format!("{:.2}", group.value)).set_alignment(CellAlignment::Right),
            Cell::new(group.count).set_alignment(CellAlignment::Right),
            Cell::new("█".repeat(width)).fg(Color::Cyan),
        ]);
    }

    table
}

/// Print an aggregation result under a chart title
pub fn print_aggregation(title: &str, groups: &[GroupMean], group_header: &str, metric_header: &str) {
    println!();
    println!("    {} {}", style("📊").cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());

    if groups.is_empty() {
        println!("    {}", style("No data in the selected range").dim());
        return;
    }

    print_indented(&render_aggregation_table(groups, group_header, metric_header));
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_table_contains_labels_in_order() {
        let groups = vec![
            GroupMean {
                label: "Private".to_string(),
                value: 20.0,
                count: 3,
            },
            GroupMean {
                label: "Public".to_string(),
                value: 10.0,
                count: 5,
            },
        ];
        let rendered = render_aggregation_table(&groups, "Ownership Type", "Income Score").to_string();
        let private = rendered.find("Private").unwrap();
        let public = rendered.find("Public").unwrap();
        assert!(private < public);
        assert!(rendered.contains("20.00"));
        assert!(rendered.contains("Income Score"));
    }
}
