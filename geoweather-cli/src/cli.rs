use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use geoweather_core::{
    Config, ForecastModel, LocationCandidate, RunOutcome, SearchController,
    controller_from_config, search::MIN_QUERY_CHARS,
};
use inquire::{Password, PasswordDisplayMode, Select};
use std::time::Duration;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geoweather", version, about = "Look up a place and show its current weather")]
pub struct Cli {
    /// Log pipeline activity to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the point-forecast API key and model.
    Configure,

    /// List places matching a query.
    Search {
        /// Free-text place name, e.g. "Paris".
        query: String,
    },

    /// Show current weather for a place.
    Show {
        /// Free-text place name, e.g. "Paris".
        query: String,

        /// 1-based index of the suggestion to use instead of prompting.
        #[arg(long)]
        pick: Option<usize>,

        /// Print the weather record as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Search { query } => {
                let ctl = controller()?;
                for (i, place) in suggest(&ctl, &query).await?.iter().enumerate() {
                    println!("{:>2}. {}", i + 1, render::candidate_line(place));
                }
                Ok(())
            }
            Command::Show { query, pick, json } => {
                let ctl = controller()?;
                let suggestions = suggest(&ctl, &query).await?;
                let place = choose(&suggestions, pick)?;
                show(&ctl, &place, json).await
            }
        }
    }
}

fn controller() -> anyhow::Result<SearchController> {
    let config = Config::load()?;
    tracing::debug!(
        geocoder = %config.geocoder.endpoint,
        forecast = %config.forecast.endpoint,
        model = %config.forecast.model,
        "configuration loaded"
    );
    // One-shot queries: `search.debounce_ms` does not apply here.
    Ok(controller_from_config(&config)?.with_debounce(Duration::ZERO))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("Point-forecast API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_forecast_api_key(api_key.trim().to_string());

    let current = config.forecast_model().unwrap_or_default();
    let cursor = ForecastModel::all()
        .iter()
        .position(|m| *m == current)
        .unwrap_or(0);
    let model = Select::new("Forecast model:", ForecastModel::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read forecast model")?;
    config.set_forecast_model(model);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn suggest(ctl: &SearchController, query: &str) -> anyhow::Result<Vec<LocationCandidate>> {
    if query.chars().count() < MIN_QUERY_CHARS {
        bail!("Query '{query}' is too short; type at least {MIN_QUERY_CHARS} characters.");
    }

    ctl.on_input(query).await;

    let mut snap = ctl.session().snapshot();
    if let Some(notice) = snap.take_notice() {
        bail!(notice.message);
    }

    let suggestions = snap.visible_suggestions().to_vec();
    if suggestions.is_empty() {
        bail!("No places match '{query}'.");
    }
    Ok(suggestions)
}

fn choose(
    suggestions: &[LocationCandidate],
    pick: Option<usize>,
) -> anyhow::Result<LocationCandidate> {
    if let Some(n) = pick {
        return n
            .checked_sub(1)
            .and_then(|i| suggestions.get(i))
            .cloned()
            .ok_or_else(|| anyhow!("--pick {n} is out of range (1..={}).", suggestions.len()));
    }

    if let [only] = suggestions {
        return Ok(only.clone());
    }

    let labels: Vec<String> = suggestions.iter().map(render::candidate_line).collect();
    let picked = Select::new("Which place?", labels)
        .raw_prompt()
        .context("Failed to read place selection")?;

    suggestions
        .get(picked.index)
        .cloned()
        .ok_or_else(|| anyhow!("Selected place is no longer available."))
}

async fn show(
    ctl: &SearchController,
    place: &LocationCandidate,
    json: bool,
) -> anyhow::Result<()> {
    let outcome = ctl.on_select(place).await;
    let mut snap = ctl.session().snapshot();

    match outcome {
        RunOutcome::Committed => {}
        RunOutcome::Failed => {
            let notice = snap.take_notice().map(|n| n.message);
            bail!(notice.unwrap_or_else(|| "Could not load weather.".to_string()));
        }
        RunOutcome::Superseded => bail!("Weather request was superseded."),
    }

    let record = snap
        .record()
        .ok_or_else(|| anyhow!("No weather record was stored."))?;
    if json {
        println!("{}", serde_json::to_string_pretty(record.as_ref())?);
    } else {
        print!("{}", render::dashboard(record, snap.selected()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_pick_and_json() {
        let args = ["geoweather", "-v", "show", "Paris", "--pick", "2", "--json"];
        let cli = Cli::try_parse_from(args).expect("valid args");

        assert!(cli.verbose);
        match cli.command {
            Command::Show { query, pick, json } => {
                assert_eq!(query, "Paris");
                assert_eq!(pick, Some(2));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_query() {
        assert!(Cli::try_parse_from(["geoweather", "show"]).is_err());
    }

    #[test]
    fn choose_honours_pick_index() {
        let places = vec![
            LocationCandidate::new("Paris, France", 48.85, 2.35),
            LocationCandidate::new("Paris, Texas, United States", 33.66, -95.56),
        ];

        let picked = choose(&places, Some(2)).expect("in range");
        assert_eq!(picked.display_name, "Paris, Texas, United States");

        let err = choose(&places, Some(3)).unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(choose(&places, Some(0)).is_err());
    }

    #[test]
    fn choose_takes_single_suggestion_without_prompting() {
        let places = vec![LocationCandidate::new("Reykjavik, Iceland", 64.15, -21.94)];
        let picked = choose(&places, None).expect("single");
        assert_eq!(picked.display_name, "Reykjavik, Iceland");
    }
}
