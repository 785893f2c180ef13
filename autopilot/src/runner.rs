use crate::bots::{bot_fingerprint, load_bot, GridBot};
use anyhow::{anyhow, Context, Result};
use diamonds_core::checksum::moves_digest;
use diamonds_core::sim::{LiveBoard, SimConfig};
use diamonds_core::Move;
use serde::{Deserialize, Serialize};

/// Rival roster id used by [`run_bot`].
pub const DEFAULT_RIVAL: &str = "wanderer";

/// One match: `bot` plays agent 0, `rivals` fill the remaining seats.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchSpec {
    pub bot: String,
    pub rivals: Vec<String>,
    pub seed: u32,
    #[serde(default)]
    pub sim: SimConfig,
    pub max_ticks: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub seed: u32,
    pub max_ticks: u32,
    pub ticks: u32,
    pub final_score: u32,
    pub rival_scores: Vec<u32>,
    pub final_rng_state: u32,
    pub diamonds_picked_up: u32,
    pub diamonds_deposited: u32,
    pub tackles_attempted: u32,
    pub tackles_landed: u32,
    pub times_tackled: u32,
    pub teleport_rides: u32,
    pub button_presses: u32,
    pub evasions: u32,
    pub fallback_moves: u32,
    pub deflections: u32,
    pub moves_digest: u32,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub moves: Vec<Move>,
}

pub fn run_bot(bot_id: &str, seed: u32, max_ticks: u32) -> Result<RunArtifact> {
    run_match(&MatchSpec {
        bot: bot_id.to_string(),
        rivals: vec![DEFAULT_RIVAL.to_string()],
        seed,
        sim: SimConfig::default(),
        max_ticks,
    })
}

pub fn run_match(spec: &MatchSpec) -> Result<RunArtifact> {
    if spec.max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }

    let mut bots: Vec<Box<dyn GridBot>> = Vec::with_capacity(spec.rivals.len() + 1);
    for id in std::iter::once(&spec.bot).chain(&spec.rivals) {
        bots.push(load_bot(id)?);
    }
    for (seat, bot) in bots.iter_mut().enumerate() {
        bot.reset(spec.seed.wrapping_add(seat as u32));
    }

    let sim = SimConfig {
        agents: bots.len(),
        ..spec.sim
    };
    let mut board = LiveBoard::new(spec.seed, sim)
        .with_context(|| format!("failed to set up board for seed {:#010x}", spec.seed))?;

    let mut moves = Vec::with_capacity(spec.max_ticks as usize);
    let mut picked_up = 0u32;
    let mut deposited = 0u32;
    let mut tackles_landed = 0u32;
    let mut times_tackled = 0u32;
    let mut teleport_rides = 0u32;
    let mut button_presses = 0u32;

    while board.tick() < spec.max_ticks && !board.is_over() {
        let tick = board.tick();
        let mut chosen = Vec::with_capacity(bots.len());
        for (seat, bot) in bots.iter_mut().enumerate() {
            let view = board.snapshot_for(seat)?;
            let me = board.agent_state(seat)?;
            let rivals = board.rival_states(seat)?;
            chosen.push(bot.next_move(&view, &me, &rivals));
        }

        let events = board.step(&chosen).with_context(|| {
            format!(
                "rejected moves at tick {tick} for seed {:#010x}: {chosen:?}",
                spec.seed
            )
        })?;

        let mine = events[0];
        picked_up += mine.picked_up;
        deposited += mine.deposited;
        teleport_rides += u32::from(mine.teleported);
        button_presses += u32::from(mine.pressed_button);
        if mine.tackled.is_some() {
            tackles_landed += 1;
        }
        times_tackled += events[1..]
            .iter()
            .filter(|other| other.tackled == Some(0))
            .count() as u32;

        moves.push(chosen[0]);
    }

    let scores = board.scores();
    let telemetry = bots[0].telemetry();
    let bot_id = bots[0].id().to_string();

    tracing::info!(
        bot = %bot_id,
        seed = spec.seed,
        ticks = board.tick(),
        score = scores[0],
        rivals = ?&scores[1..],
        "match finished"
    );

    Ok(RunArtifact {
        metrics: RunMetrics {
            bot_fingerprint: bot_fingerprint(&bot_id).unwrap_or_else(|| "unknown".to_string()),
            bot_id,
            seed: spec.seed,
            max_ticks: spec.max_ticks,
            ticks: board.tick(),
            final_score: scores[0],
            rival_scores: scores[1..].to_vec(),
            final_rng_state: board.rng_state(),
            diamonds_picked_up: picked_up,
            diamonds_deposited: deposited,
            tackles_attempted: telemetry.tackles_attempted,
            tackles_landed,
            times_tackled,
            teleport_rides,
            button_presses,
            evasions: telemetry.evasions,
            fallback_moves: telemetry.fallback_moves,
            deflections: telemetry.deflections,
            moves_digest: moves_digest(&moves),
        },
        moves,
    })
}
