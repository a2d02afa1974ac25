//! Subcommand implementations

use std::path::{Path, PathBuf};

use rosterlink_core::{Pipeline, PipelineInput, RosterConfig, Scorer};
use rosterlink_io::{
    display_names, field_values, read_json, read_name_list, read_records, runner_names,
    write_name_list,
};

use crate::report;
use crate::settings::{self, Overrides};

pub type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Files written by `extract`
pub const QUERY_NAMES_FILE: &str = "query_names.txt";
pub const POOL_DISPLAY_NAMES_FILE: &str = "pool_display_names.txt";
pub const POOL_RAW_NAMES_FILE: &str = "pool_raw_names.txt";

/// Files written by `resolve --residuals`
pub const UNRESOLVED_FILE: &str = "unresolved_queries.txt";
pub const REMAINING_POOL_FILE: &str = "remaining_pool.txt";

pub struct ExtractArgs {
    pub feed: PathBuf,
    pub records: PathBuf,
    pub out_dir: PathBuf,
    pub market: String,
}

pub fn extract(config_path: Option<&Path>, args: &ExtractArgs) -> CommandResult {
    let config = settings::load(config_path)?;

    let feed = read_json(&args.feed)?;
    let queries = runner_names(&feed, &args.market);
    let records = read_records(&args.records)?;
    let display = display_names(&records, &config.records.name_fields);
    let raw = field_values(&records, "name");

    write_name_list(&args.out_dir.join(QUERY_NAMES_FILE), &queries)?;
    write_name_list(&args.out_dir.join(POOL_DISPLAY_NAMES_FILE), &display)?;
    write_name_list(&args.out_dir.join(POOL_RAW_NAMES_FILE), &raw)?;

    println!(
        "{} query names, {} display names, {} raw names -> {}",
        queries.len(),
        display.len(),
        raw.len(),
        args.out_dir.display()
    );
    Ok(())
}

pub struct ResolveArgs {
    pub queries: PathBuf,
    pub records: PathBuf,
    pub pool: Option<PathBuf>,
    pub reset: bool,
    pub residuals: Option<PathBuf>,
    pub json: bool,
    pub overrides: Overrides,
}

pub fn resolve(config_path: Option<&Path>, args: &ResolveArgs) -> CommandResult {
    let mut config = settings::load(config_path)?;
    args.overrides.apply(&mut config);
    let pipeline = Pipeline::new(config)?;

    let queries = read_name_list(&args.queries)?;
    let records = read_records(&args.records)?;
    let name_fields = pipeline.config().records.name_fields.clone();
    let mut input = PipelineInput::from_records(queries, records, &name_fields);
    if let Some(pool) = &args.pool {
        input = input.with_pool(read_name_list(pool)?);
    }

    if args.reset {
        if pipeline.config().export.dry_run {
            tracing::warn!("--reset ignored in a dry run");
        } else {
            pipeline.store().reset()?;
        }
    }

    let run = pipeline.run(&input)?;

    if let Some(dir) = &args.residuals {
        write_name_list(&dir.join(UNRESOLVED_FILE), &run.resolution.unresolved)?;
        write_name_list(&dir.join(REMAINING_POOL_FILE), &run.resolution.remaining.names())?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        print!("{}", report::render_run(&run));
    }
    Ok(())
}

pub fn score(config_path: Option<&Path>, a: &str, b: &str) -> CommandResult {
    let config = settings::load(config_path)?;
    config.validate()?;
    let scorer = Scorer::from_config(&config.matching);
    print!("{}", report::render_score(a, b, &scorer.score(a, b)));
    Ok(())
}

pub fn show_config(config_path: Option<&Path>, defaults: bool) -> CommandResult {
    let config = if defaults {
        RosterConfig::default()
    } else {
        settings::load(config_path)?
    };
    print!("{}", config.to_toml()?);
    Ok(())
}
