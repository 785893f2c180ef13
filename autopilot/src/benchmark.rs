use crate::runner::{run_match, MatchSpec, RunMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use diamonds_core::sim::SimConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    /// Opponents seated against every benchmarked bot.
    pub rivals: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_ticks: u32,
    pub sim: SimConfig,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub seed: u32,
    pub seed_hex: String,
    pub ticks: u32,
    pub final_score: u32,
    pub best_rival_score: u32,
    pub diamonds_deposited: u32,
    pub tackles_attempted: u32,
    pub tackles_landed: u32,
    pub times_tackled: u32,
    pub button_presses: u32,
    pub fallback_moves: u32,
    pub deflections: u32,
    pub moves_digest: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub runs: usize,
    pub avg_score: f64,
    pub max_score: u32,
    pub min_score: u32,
    pub avg_deposited: f64,
    /// Share of runs where the bot finished at or above every rival.
    pub win_rate: f64,
    pub avg_tackles_landed: f64,
    pub avg_times_tackled: f64,
    pub avg_fallback_moves: f64,
    pub avg_deflections: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub max_ticks: u32,
    pub jobs: Option<usize>,
    pub sim: SimConfig,
    pub bots: Vec<String>,
    pub rivals: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.bots.is_empty() {
        return Err(anyhow!("benchmark requires at least one bot"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("benchmark jobs must be >= 1 when provided"));
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let run_jobs: Vec<(String, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot.clone(), *seed)))
        .collect();

    let run_one = |(bot_id, seed): &(String, u32)| -> Result<RunMetrics> {
        let spec = MatchSpec {
            bot: bot_id.clone(),
            rivals: config.rivals.clone(),
            seed: *seed,
            sim: config.sim,
            max_ticks: config.max_ticks,
        };
        let artifact = run_match(&spec)
            .with_context(|| format!("benchmark run failed for bot={bot_id} seed={seed:#x}"))?;
        Ok(artifact.metrics)
    };

    let run_results: Vec<Result<RunMetrics>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }
    tracing::info!(
        runs = runs.len(),
        bots = config.bots.len(),
        seeds = config.seeds.len(),
        "benchmark runs complete"
    );

    let rankings = rank_bots(&runs);

    let mut run_records: Vec<RunRecord> = runs
        .iter()
        .map(|run| RunRecord {
            bot_id: run.bot_id.clone(),
            bot_fingerprint: run.bot_fingerprint.clone(),
            seed: run.seed,
            seed_hex: seed_to_hex(run.seed),
            ticks: run.ticks,
            final_score: run.final_score,
            best_rival_score: run.rival_scores.iter().copied().max().unwrap_or_default(),
            diamonds_deposited: run.diamonds_deposited,
            tackles_attempted: run.tackles_attempted,
            tackles_landed: run.tackles_landed,
            times_tackled: run.times_tackled,
            button_presses: run.button_presses,
            fallback_moves: run.fallback_moves,
            deflections: run.deflections,
            moves_digest: format!("{:08x}", run.moves_digest),
        })
        .collect();

    run_records.sort_by(|a, b| {
        b.final_score
            .cmp(&a.final_score)
            .then_with(|| a.bot_id.cmp(&b.bot_id))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    write_runs_csv(&config.out_dir.join("runs.csv"), &run_records)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &rankings)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        max_ticks: config.max_ticks,
        jobs: config.jobs,
        sim: config.sim,
        bots: config.bots,
        rivals: config.rivals,
        seeds: config.seeds,
        run_count: run_records.len(),
        bot_rankings: rankings,
        runs: run_records,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    Ok(report)
}

fn rank_bots(runs: &[RunMetrics]) -> Vec<BotAggregate> {
    let mut grouped: HashMap<&str, Vec<&RunMetrics>> = HashMap::new();
    for run in runs {
        grouped.entry(run.bot_id.as_str()).or_default().push(run);
    }

    let mut rankings: Vec<BotAggregate> = grouped
        .into_iter()
        .map(|(bot_id, bot_runs)| {
            let count = bot_runs.len() as f64;
            let mean = |field: fn(&RunMetrics) -> u32| {
                bot_runs.iter().map(|run| field(*run) as f64).sum::<f64>() / count
            };
            let wins = bot_runs
                .iter()
                .filter(|run| run.rival_scores.iter().all(|rival| run.final_score >= *rival))
                .count();

            BotAggregate {
                bot_id: bot_id.to_string(),
                bot_fingerprint: bot_runs
                    .first()
                    .map(|run| run.bot_fingerprint.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                runs: bot_runs.len(),
                avg_score: mean(|run| run.final_score),
                max_score: bot_runs
                    .iter()
                    .map(|run| run.final_score)
                    .max()
                    .unwrap_or_default(),
                min_score: bot_runs
                    .iter()
                    .map(|run| run.final_score)
                    .min()
                    .unwrap_or_default(),
                avg_deposited: mean(|run| run.diamonds_deposited),
                win_rate: wins as f64 / count,
                avg_tackles_landed: mean(|run| run.tackles_landed),
                avg_times_tackled: mean(|run| run.times_tackled),
                avg_fallback_moves: mean(|run| run.fallback_moves),
                avg_deflections: mean(|run| run.deflections),
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.avg_score
            .total_cmp(&a.avg_score)
            .then_with(|| b.avg_deposited.total_cmp(&a.avg_deposited))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
    });
    rankings
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "bot_id,bot_fingerprint,seed_hex,seed,ticks,final_score,best_rival_score,diamonds_deposited,tackles_attempted,tackles_landed,times_tackled,button_presses,fallback_moves,deflections,moves_digest\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
            row.bot_id,
            row.bot_fingerprint,
            row.seed_hex,
            row.seed,
            row.ticks,
            row.final_score,
            row.best_rival_score,
            row.diamonds_deposited,
            row.tackles_attempted,
            row.tackles_landed,
            row.times_tackled,
            row.button_presses,
            row.fallback_moves,
            row.deflections,
            row.moves_digest
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[BotAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,bot_id,bot_fingerprint,runs,avg_score,max_score,min_score,avg_deposited,win_rate,avg_tackles_landed,avg_times_tackled,avg_fallback_moves,avg_deflections\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{},{:.2},{},{},{:.2},{:.4},{:.2},{:.2},{:.2},{:.2}\n",
            idx + 1,
            row.bot_id,
            row.bot_fingerprint,
            row.runs,
            row.avg_score,
            row.max_score,
            row.min_score,
            row.avg_deposited,
            row.win_rate,
            row.avg_tackles_landed,
            row.avg_times_tackled,
            row.avg_fallback_moves,
            row.avg_deflections
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

