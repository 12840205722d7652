use crate::analysis::comparison::{LeagueDelta, Verdict};
use crate::analysis::engine::{BucketSplit, TeamComparison, TeamProfile};
use crate::analysis::normalize::scale_to_axis;
use crate::analysis::snapshot::LeagueMetricSnapshot;
use crate::catalog::{Category, MetricCatalog};
use crate::data::store::MetricValueStore;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

const BAR_WIDTH: f64 = 20.0;

#[derive(Tabled)]
struct MetricRow {
    id: String,
    name: String,
    category: String,
    range: String,
    direction: String,
}

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: String,
    team: String,
    value: String,
    percentile: String,
}

#[derive(Tabled)]
struct ProfileRow {
    metric: String,
    value: String,
    score: String,
    percentile: String,
    bar: String,
}

#[derive(Tabled)]
struct BucketRow {
    bucket: String,
    value: String,
    percentile: String,
}

/// Header naming the metric, or the labelled fallback for an unknown id.
fn metric_title(catalog: &MetricCatalog, metric_id: &str) -> String {
    catalog
        .get(metric_id)
        .map(|d| d.name.clone())
        .unwrap_or_else(|| format!("Unknown metric: {}", metric_id))
}

fn format_optional(catalog: &MetricCatalog, metric_id: &str, value: Option<f64>) -> String {
    value
        .map(|v| catalog.format_value(metric_id, v))
        .unwrap_or_else(|| "—".to_string())
}

fn score_bar(normalized: f64) -> String {
    let filled = scale_to_axis(normalized, 0.0, BAR_WIDTH).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH as usize - filled))
}

pub fn display_dataset_header(store: &MetricValueStore, source: &str) {
    println!(
        "{} {} ({} values, {} teams, v{} loaded {})",
        "📂".cyan(),
        source,
        store.len(),
        store.team_ids().len(),
        store.version(),
        store.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
}

pub fn display_metric_catalog(catalog: &MetricCatalog, category: Option<Category>) {
    let categories: Vec<Category> = match category {
        Some(c) => vec![c],
        None => Category::ALL.to_vec(),
    };

    println!("\n{}", "📋 METRIC CATALOG".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let rows: Vec<MetricRow> = categories
        .into_iter()
        .flat_map(|c| catalog.metrics_in_category(c))
        .map(|d| MetricRow {
            id: d.id.clone(),
            name: d.name.clone(),
            category: d.category.label().to_string(),
            range: format!(
                "{} – {}",
                d.format.apply(d.range.min),
                d.format.apply(d.range.max)
            ),
            direction: match d.direction.higher_is_better() {
                Some(true) => "↑ higher".green().to_string(),
                Some(false) => "↓ lower".red().to_string(),
                None => "neutral".dimmed().to_string(),
            },
        })
        .collect();

    if rows.is_empty() {
        println!("{}", "No metrics in this category".yellow());
        return;
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_snapshot(
    snapshot: &LeagueMetricSnapshot,
    catalog: &MetricCatalog,
    store: &MetricValueStore,
) {
    println!(
        "\n{}",
        format!(
            "📊 {} — league ranking ({})",
            metric_title(catalog, &snapshot.metric_id),
            snapshot.bucket
        )
        .bold()
        .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    let Some(summary) = snapshot.summary else {
        display_no_data(&snapshot.metric_id, catalog);
        return;
    };

    let rows: Vec<RankRow> = snapshot
        .ranked_teams
        .iter()
        .map(|t| RankRow {
            rank: format!("#{}", t.rank),
            team: store.team_name(&t.team_id).to_string(),
            value: catalog.format_value(&snapshot.metric_id, t.value),
            percentile: format!("{}", t.percentile),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    println!(
        "\n{} avg {} · min {} · max {} · {} teams",
        "League:".bold(),
        catalog.format_value(&snapshot.metric_id, summary.average),
        catalog.format_value(&snapshot.metric_id, summary.min),
        catalog.format_value(&snapshot.metric_id, summary.max),
        summary.count
    );
    if !snapshot.has_sufficient_data() {
        println!("{}", "Only one team has data; percentile is trivially 100".yellow());
    }
    println!();
}

pub fn display_team_comparison(
    comparison: &TeamComparison,
    catalog: &MetricCatalog,
    store: &MetricValueStore,
) {
    let metric_id = &comparison.record.metric_id;
    let name_a = store.team_name(&comparison.team_a);
    let name_b = store.team_name(&comparison.team_b);

    println!(
        "\n{}",
        format!("⚔️  {} vs {} — {}", name_a, name_b, metric_title(catalog, metric_id))
            .bold()
            .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());
    println!(
        "  {:<20} {}",
        name_a,
        catalog.format_value(metric_id, comparison.record.team_a_value)
    );
    println!(
        "  {:<20} {}",
        name_b,
        catalog.format_value(metric_id, comparison.record.team_b_value)
    );
    println!(
        "\n  Difference: {:.1}% ({})",
        comparison.record.percent_difference,
        if comparison.record.is_significant {
            "significant".bold().to_string()
        } else {
            "not significant".dimmed().to_string()
        }
    );

    match comparison.better_team_id() {
        Some(team) => println!("  {} {}", "Edge:".bold().green(), store.team_name(team)),
        None if catalog.is_higher_better(metric_id) == Ok(None) => {
            println!("  {}", "Style metric: no better or worse side".dimmed())
        }
        None => println!("  {}", "Edge: none".dimmed()),
    }
    println!();
}

pub fn display_league_delta(
    team_id: &str,
    delta: &LeagueDelta,
    catalog: &MetricCatalog,
    store: &MetricValueStore,
) {
    let metric_id = &delta.metric_id;
    println!(
        "\n{}",
        format!(
            "🏟️  {} vs league average — {}",
            store.team_name(team_id),
            metric_title(catalog, metric_id)
        )
        .bold()
        .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());
    println!("  Team:    {}", catalog.format_value(metric_id, delta.team_value));
    println!("  League:  {}", catalog.format_value(metric_id, delta.league_average));
    println!(
        "  Delta:   {}{} ({:.1}%)",
        if delta.difference >= 0.0 { "+" } else { "-" },
        catalog.format_value(metric_id, delta.difference.abs()),
        delta.percent_difference
    );

    let verdict = match delta.verdict {
        Verdict::Better => "Above league standard".green().bold(),
        Verdict::Worse => "Below league standard".red().bold(),
        Verdict::Level => "In line with the league".yellow(),
        Verdict::Neutral => "Style metric, no judgement".dimmed(),
    };
    println!("  {}\n", verdict);
}

pub fn display_profile(profile: &TeamProfile, catalog: &MetricCatalog, store: &MetricValueStore) {
    println!(
        "\n{}",
        format!(
            "🕸️  {} — {} profile ({})",
            store.team_name(&profile.team_id),
            profile.category.label(),
            profile.bucket
        )
        .bold()
        .cyan()
    );
    println!("{}\n", "=".repeat(80).cyan());

    let rows: Vec<ProfileRow> = profile
        .points
        .iter()
        .map(|p| ProfileRow {
            metric: p.name.clone(),
            value: format_optional(catalog, &p.metric_id, p.value),
            score: p
                .normalized
                .map(|n| format!("{:.0}", n))
                .unwrap_or_else(|| "—".to_string()),
            percentile: p
                .percentile
                .map(|pct| pct.to_string())
                .unwrap_or_else(|| "—".to_string()),
            bar: p.normalized.map(score_bar).unwrap_or_default(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    match profile.overall_score() {
        Some(score) => println!("\n{} {:.0}/100\n", "Overall:".bold(), score),
        None => println!("\n{}\n", "No data for this team in this category".yellow()),
    }
}

pub fn display_bucket_split(split: &BucketSplit, catalog: &MetricCatalog, store: &MetricValueStore) {
    println!(
        "\n{}",
        format!(
            "🔀 {} — {} by result",
            store.team_name(&split.team_id),
            metric_title(catalog, &split.metric_id)
        )
        .bold()
        .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    let rows: Vec<BucketRow> = split
        .entries
        .iter()
        .map(|e| BucketRow {
            bucket: e.bucket.to_string(),
            value: format_optional(catalog, &split.metric_id, e.value),
            percentile: e
                .percentile
                .map(|p| p.to_string())
                .unwrap_or_else(|| "—".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if let Some(delta) = split.win_loss_delta() {
        println!(
            "\n{} {}{} in wins compared to losses\n",
            "Win/Loss:".bold(),
            if delta >= 0.0 { "+" } else { "-" },
            catalog.format_value(&split.metric_id, delta.abs())
        );
    } else {
        println!();
    }
}

pub fn display_unknown_metric(metric_id: &str) {
    println!("{} {}", "⚠️".yellow(), format!("Unknown metric: {}", metric_id).yellow());
}

pub fn display_no_data(metric_id: &str, catalog: &MetricCatalog) {
    println!(
        "{}",
        format!("No data for {}", metric_title(catalog, metric_id)).yellow()
    );
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
