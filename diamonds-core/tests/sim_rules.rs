use diamonds_core::rng::{RandomSource, SeededRng};
use diamonds_core::sim::{LiveBoard, SimConfig};
use diamonds_core::{EntityKind, Move, SimError};

fn legal_moves(board: &LiveBoard, agent: usize) -> Vec<Move> {
    let me = board.agent_state(agent).expect("agent exists");
    let cfg = board.config();
    Move::CARDINALS
        .iter()
        .copied()
        .filter(|mv| {
            let next = me.position.offset(*mv);
            next.x >= 0 && next.y >= 0 && next.x < cfg.width && next.y < cfg.height
        })
        .collect()
}

#[test]
fn random_walkers_keep_every_invariant() -> Result<(), SimError> {
    for seed in [0xDEAD_BEEF, 0xC0FF_EE11, 0x1234_5678] {
        let cfg = SimConfig {
            agents: 4,
            match_ms: 400_000,
            ..SimConfig::default()
        };
        let mut board = LiveBoard::new(seed, cfg)?;
        let mut walker = SeededRng::new(seed ^ 0x5A5A_5A5A);

        while !board.is_over() {
            let moves: Vec<Move> = (0..board.agent_count())
                .map(|agent| {
                    let options = legal_moves(&board, agent);
                    options[walker.pick(options.len())]
                })
                .collect();
            board.step(&moves)?;
            board.validate()?;

            let view = board.snapshot_for(0)?;
            assert_eq!(view.teleports().len(), 2, "seed={seed:#x}");
            assert_eq!(view.red_buttons().len(), 1, "seed={seed:#x}");
            assert!(view
                .entities
                .iter()
                .any(|e| matches!(e.kind, EntityKind::Diamond { .. })));
        }
        assert_eq!(board.tick(), 400);
    }
    Ok(())
}

#[test]
fn identical_inputs_replay_identically() -> Result<(), SimError> {
    let play = |seed: u32| -> Result<(Vec<u32>, u32), SimError> {
        let mut board = LiveBoard::new(seed, SimConfig::default())?;
        let mut walker = SeededRng::new(99);
        while !board.is_over() {
            let moves: Vec<Move> = (0..board.agent_count())
                .map(|agent| {
                    let options = legal_moves(&board, agent);
                    options[walker.pick(options.len())]
                })
                .collect();
            board.step(&moves)?;
        }
        Ok((board.scores(), board.rng_state()))
    };

    assert_eq!(play(0x6046_C93D)?, play(0x6046_C93D)?);
    Ok(())
}
