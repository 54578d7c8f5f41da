//! unioutcomes: University Outcomes CLI
//!
//! Loads a dataset and its data dictionary once, then lists the selectable
//! group variables, reports filter bounds, or ranks groups by mean metric.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use unioutcomes::cli::{resolve_range, run_explore, Cli, Commands};
use unioutcomes::pipeline::{
    dataset_stats, load_dataset, load_dictionary, AggregationRequest, DashboardContext, RuleTable,
};
use unioutcomes::report::{
    export_aggregation, print_aggregation, print_variables_table, ClassificationSummary,
    ExportParams,
};
use unioutcomes::utils::{
    create_spinner, finish_with_success, finish_with_warning, init_logging, print_banner,
    print_bounds, print_completion, print_config, print_count, print_info, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let rules = match &cli.rules {
        Some(path) => RuleTable::from_json_file(path)?,
        None => RuleTable::default(),
    };

    let verbose_ui = matches!(cli.command, Commands::Summary | Commands::Explore);
    if verbose_ui {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(
            &cli.data,
            &cli.dictionary,
            &rules.filter_column,
            &rules.metric_column,
        );
    }

    let ctx = build_context(&cli, rules)?;

    match &cli.command {
        Commands::Variables => {
            print_variables_table(ctx.selectable_variables());
        }
        Commands::Bounds => {
            print_bounds(
                &ctx.rules().filter_column,
                ctx.filter_bounds(),
                ctx.rules().default_range,
            );
        }
        Commands::Summary => {
            ClassificationSummary::from_context(&ctx).display();
            print_completion();
        }
        Commands::Aggregate {
            group,
            low,
            high,
            json,
        } => {
            let range = resolve_range(*low, *high, ctx.rules().default_range);
            let request = AggregationRequest::new(group.as_str(), range);
            let groups = ctx.execute(&request)?;

            let group_label = ctx.rules().display_name(group);
            let title = ctx.chart_title(group, range);
            print_aggregation(&title, &groups, &group_label, &ctx.rules().metric_label);

            if let Some(path) = json {
                let data_file = cli.data.display().to_string();
                let params = ExportParams {
                    data_file: &data_file,
                    group_label: &group_label,
                    filter_column: &ctx.rules().filter_column,
                    metric_column: &ctx.rules().metric_column,
                    title: &title,
                };
                export_aggregation(&groups, &request, &params, path)?;
                print_success(&format!("Saved to {}", path.display()));
            }
        }
        Commands::Explore => {
            run_explore(&ctx)?;
            print_completion();
        }
    }

    Ok(())
}

/// Load both inputs and build the query context. Any load failure is fatal.
fn build_context(cli: &Cli, rules: RuleTable) -> Result<DashboardContext> {
    let step_start = Instant::now();

    let spinner = create_spinner("Loading dataset...");
    let data = load_dataset(&cli.data, cli.infer_schema_length)?;
    let (rows, cols, memory_mb) = dataset_stats(&data);
    finish_with_success(&spinner, &format!("Loaded {}", file_name(&cli.data)));

    let spinner = create_spinner("Loading data dictionary...");
    let entries = load_dictionary(&cli.dictionary, &rules.dictionary_columns)?;
    finish_with_success(
        &spinner,
        &format!("Loaded {} dictionary entries", entries.len()),
    );

    let spinner = create_spinner("Classifying and binning variables...");
    let ctx = DashboardContext::build(data, &entries, rules)?;
    if ctx.selectable_variables().is_empty() {
        finish_with_warning(&spinner, "No selectable variables found");
    } else {
        finish_with_success(&spinner, "Variables classified");
    }

    if matches!(cli.command, Commands::Summary) {
        println!("\n    {} Dataset Statistics:", style("✧").cyan());
        println!("      Rows: {}", rows);
        println!("      Columns: {}", cols);
        println!("      Estimated memory: {:.2} MB", memory_mb);
        print_count("selectable variable(s)", ctx.selectable_variables().len());
        print_info(&format!(
            "Startup took {:.2}s",
            step_start.elapsed().as_secs_f64()
        ));
    }

    Ok(ctx)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .unwrap_or_else(|| path.display().to_string())
}
