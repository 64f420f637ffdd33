//! Hatchery Headless Simulation Harness
//!
//! Drives the engine through scripted runs and checks the rules hold over
//! thousands of steps. Runs entirely in-process with a seeded random source.
//!
//! Usage:
//!   cargo run -p hatchery-simtest
//!   cargo run -p hatchery-simtest -- --verbose
//!   cargo run -p hatchery-simtest -- --seed 7 --json

use hatchery_core::prelude::*;
use hatchery_core::systems::trigger_event;
use hatchery_logic::catalog::{CreatureTemplate, EggType, HabitatKind, Rarity};
use hatchery_logic::events::EventTemplate;
use serde::Serialize;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    passed: usize,
    failed: usize,
    results: &'a [TestResult],
}

struct Options {
    verbose: bool,
    json: bool,
    seed: u64,
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    Options {
        verbose: args.iter().any(|a| a == "--verbose"),
        json: args.iter().any(|a| a == "--json"),
        seed,
    }
}

fn main() {
    let opts = parse_args();
    if !opts.json {
        println!("=== Hatchery Simulation Harness (seed {}) ===\n", opts.seed);
    }

    let mut results = Vec::new();

    // 1. Config and catalog sanity
    results.extend(validate_config(&opts));

    // 2. Incubation sweep
    results.extend(validate_incubation(&opts));

    // 3. Care decay & sickness
    results.extend(validate_care(&opts));

    // 4. Service queues
    results.extend(validate_service_queues(&opts));

    // 5. Economy
    results.extend(validate_economy(&opts));

    // 6. Event storm
    results.extend(validate_events(&opts));

    // 7. Lose conditions
    results.extend(validate_lose_conditions(&opts));

    // 8. Prestige & leaderboard
    results.extend(validate_prestige(&opts));

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    if opts.json {
        let report = Report {
            seed: opts.seed,
            passed,
            failed,
            results: &results,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to encode report: {}", e),
        }
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || opts.verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed, total, failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn section(opts: &Options, title: &str) {
    if !opts.json {
        println!("--- {} ---", title);
    }
}

fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.events.trigger_chance = 0.0;
    config
}

fn spawn(engine: &mut SimulationEngine, base_income: f64) -> AnimalId {
    let config = engine.config().clone();
    let template = CreatureTemplate::new("Test Critter", "🐾", Rarity::Common, base_income);
    engine.state.spawn_animal(EggType::Common, &template, &config)
}

fn with_care(engine: &mut SimulationEngine, id: AnimalId, f: impl FnOnce(&mut Care)) {
    if let Some(entity) = engine.state.find_animal(id) {
        if let Ok(mut care) = engine.state.world.get::<&mut Care>(entity) {
            f(&mut *care);
        }
    }
}

fn stats_in_range(engine: &SimulationEngine) -> bool {
    engine.animals().iter().all(|r| {
        [r.care.hunger, r.care.cleanliness, r.care.happiness]
            .iter()
            .all(|s| (0.0..=100.0).contains(s))
    })
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn validate_config(opts: &Options) -> Vec<TestResult> {
    section(opts, "Config & Catalog");
    let mut results = Vec::new();
    let config = GameConfig::default();

    results.push(TestResult {
        name: "config_validates".into(),
        passed: config.validate().is_ok(),
        detail: format!("{:?}", config.validate()),
    });

    let empty_pools: Vec<&str> = EggType::ALL
        .iter()
        .filter(|t| config.catalog.egg(**t).map_or(true, |s| s.pool.is_empty()))
        .map(|t| t.key())
        .collect();
    results.push(TestResult {
        name: "catalog_pools_filled".into(),
        passed: empty_pools.is_empty(),
        detail: if empty_pools.is_empty() {
            format!("{} egg types with creatures", EggType::ALL.len())
        } else {
            format!("empty pools: {}", empty_pools.join(", "))
        },
    });

    let json_ok = serde_json::to_string(&config)
        .ok()
        .and_then(|s| hatchery_core::config::load_config(s.as_bytes()).ok())
        .map_or(false, |parsed| parsed == config);
    results.push(TestResult {
        name: "config_json_roundtrip".into(),
        passed: json_ok,
        detail: "default config survives JSON encode + load_config".into(),
    });

    if opts.verbose && !opts.json {
        for spec in &config.catalog.eggs {
            println!(
                "    {:8} {:>6.0} coins {:>6}ms  {} creatures",
                spec.egg_type.key(),
                spec.price,
                spec.hatch_ms,
                spec.pool.len()
            );
        }
    }

    results
}

// ── 2. Incubation ───────────────────────────────────────────────────────

fn validate_incubation(opts: &Options) -> Vec<TestResult> {
    section(opts, "Incubation");
    let mut results = Vec::new();

    let mut config = quiet_config();
    config.starting_balance = 100_000.0;
    let mut engine = SimulationEngine::with_seed(config, opts.seed, 0);

    let mut bought = 0;
    for egg_type in EggType::ALL {
        for _ in 0..5 {
            if engine.purchase_egg(egg_type, 0).is_ok() {
                bought += 1;
            }
        }
    }

    let mut hatched = 0;
    let mut now = 0;
    while now <= 100_000 {
        now += 1_000;
        hatched += engine.step(now).hatched.len();
    }

    results.push(TestResult {
        name: "incubation_one_animal_per_egg".into(),
        passed: hatched == bought && engine.animal_count() == bought && engine.eggs().is_empty(),
        detail: format!("bought {}, hatched {}", bought, hatched),
    });

    let ids: Vec<AnimalId> = engine.animals().iter().map(|r| r.animal.id).collect();
    let sorted = ids.windows(2).all(|w| w[0] < w[1]);
    results.push(TestResult {
        name: "incubation_ids_in_hatch_order".into(),
        passed: sorted,
        detail: format!("{} ids strictly increasing", ids.len()),
    });

    let mut broke = SimulationEngine::with_seed(quiet_config(), opts.seed, 0);
    let rejected = broke.purchase_egg(EggType::Mystic, 0);
    results.push(TestResult {
        name: "incubation_rejects_unaffordable".into(),
        passed: matches!(rejected, Err(ActionError::InsufficientFunds { .. }))
            && broke.balance() == 100.0,
        detail: format!("{:?}", rejected.err().map(|e| e.reason())),
    });

    let mut single = SimulationEngine::with_seed(quiet_config(), opts.seed, 0);
    let fresh = single
        .purchase_egg(EggType::Common, 0)
        .ok()
        .and_then(|_| single.step(8_000).hatched.first().copied())
        .and_then(|id| single.animal(id))
        .map(|r| (r.care.hunger, r.care.cleanliness, r.care.happiness));
    results.push(TestResult {
        name: "incubation_hatchling_fresh".into(),
        passed: fresh == Some((100.0, 100.0, 70.0)),
        detail: format!("{:?}", fresh),
    });

    results
}

// ── 3. Care ─────────────────────────────────────────────────────────────

fn validate_care(opts: &Options) -> Vec<TestResult> {
    section(opts, "Care & Sickness");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::with_seed(quiet_config(), opts.seed, 0);
    let id = spawn(&mut engine, 1.0);
    with_care(&mut engine, id, |c| {
        c.hunger = 29.0;
        c.cleanliness = 29.0;
    });

    let mut sick_at = None;
    for step in 1..=25u64 {
        let report = engine.step(step * 1_000);
        if report.fell_sick.contains(&id) && sick_at.is_none() {
            sick_at = Some(step);
        }
    }
    let threshold = engine.config().care.sickness_threshold as u64;
    results.push(TestResult {
        name: "care_sick_at_threshold".into(),
        passed: sick_at == Some(threshold),
        detail: format!("fell sick at step {:?}, threshold {}", sick_at, threshold),
    });

    let mut stays_sick = true;
    for step in 26..=200u64 {
        engine.step(step * 1_000);
        if engine.is_game_over() {
            break;
        }
        stays_sick &= engine.animal(id).map_or(false, |r| r.care.health == Health::Sick);
    }
    results.push(TestResult {
        name: "care_sickness_persists".into(),
        passed: stays_sick,
        detail: "sickness never clears on its own".into(),
    });

    results
}

// ── 4. Service Queues ───────────────────────────────────────────────────

fn validate_service_queues(opts: &Options) -> Vec<TestResult> {
    section(opts, "Service Queues");
    let mut results = Vec::new();

    let mut config = quiet_config();
    config.starting_balance = 10_000.0;
    let mut engine = SimulationEngine::with_seed(config, opts.seed, 0);
    let ids: Vec<AnimalId> = (0..5).map(|_| spawn(&mut engine, 2.0)).collect();
    for &id in &ids {
        let _ = engine.send_to_bath(id);
    }

    let mut order = Vec::new();
    let mut concurrent_ok = true;
    for step in 1..=60u64 {
        let report = engine.step(step * 1_000);
        order.extend(report.treated.iter().map(|(_, id)| *id));
        concurrent_ok &= report.treated.is_empty() || report.promoted.is_empty();
    }
    results.push(TestResult {
        name: "service_fifo_order".into(),
        passed: order == ids,
        detail: format!("completed {:?}", order),
    });
    results.push(TestResult {
        name: "service_one_transition_per_step".into(),
        passed: concurrent_ok,
        detail: "no step both finished and promoted".into(),
    });

    let victim = spawn(&mut engine, 3.0);
    let dup = engine.send_to_bath(victim).and_then(|_| engine.send_to_clinic(victim));
    results.push(TestResult {
        name: "service_exclusive_queues".into(),
        passed: matches!(dup, Err(ActionError::AlreadyQueued { .. })),
        detail: format!("{:?}", dup.err().map(|e| e.reason())),
    });

    with_care(&mut engine, victim, |c| c.health = Health::Sick);
    let _ = engine.cancel_bath(victim);
    let before = engine.balance();
    let paid = engine.send_to_clinic(victim).unwrap_or(0.0);
    let refund = engine.cancel_clinic(victim).unwrap_or(0.0);
    let second = engine.cancel_clinic(victim);
    results.push(TestResult {
        name: "service_refund_once".into(),
        passed: paid > 0.0 && refund == paid && second.is_err() && engine.balance() == before,
        detail: format!("paid {:.1}, refunded {:.1}", paid, refund),
    });

    results
}

// ── 5. Economy ──────────────────────────────────────────────────────────

fn validate_economy(opts: &Options) -> Vec<TestResult> {
    section(opts, "Economy");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::with_seed(quiet_config(), opts.seed, 0);
    let id = spawn(&mut engine, 2.0);
    with_care(&mut engine, id, |c| c.happiness = 65.0);
    let report = engine.step(1_000);
    // 65 ends the step near 65.3, inside the 1.1x tier
    results.push(TestResult {
        name: "economy_reference_income".into(),
        passed: (report.income - 2.2).abs() < 1e-9,
        detail: format!("income {:.3} (expected 2.200)", report.income),
    });

    let mut gated = 0;
    let gates: [fn(&mut Care); 3] = [
        |c| c.hunger = 0.0,
        |c| c.cleanliness = 0.0,
        |c| c.health = Health::Sick,
    ];
    for gate in gates {
        let mut engine = SimulationEngine::with_seed(quiet_config(), opts.seed, 0);
        let id = spawn(&mut engine, 10.0);
        with_care(&mut engine, id, gate);
        if engine.step(1_000).income == 0.0 {
            gated += 1;
        }
    }
    results.push(TestResult {
        name: "economy_income_gating".into(),
        passed: gated == 3,
        detail: format!("{}/3 gated animals earned nothing", gated),
    });

    let mut engine = SimulationEngine::with_seed(quiet_config(), opts.seed, 0);
    let id = spawn(&mut engine, 4.0);
    let assigned = engine.assign_habitat(id, HabitatKind::Meadow).is_ok();
    let sold = engine.sell(id);
    let vacated = engine
        .habitats()
        .get(HabitatKind::Meadow)
        .map_or(false, |h| h.assigned.is_empty());
    results.push(TestResult {
        name: "economy_sell".into(),
        passed: assigned && sold == Ok(40.0) && vacated && engine.balance() == 140.0,
        detail: format!("sold for {:?}, balance {:.1}", sold, engine.balance()),
    });

    results
}

// ── 6. Events ───────────────────────────────────────────────────────────

fn validate_events(opts: &Options) -> Vec<TestResult> {
    section(opts, "Event Storm");
    let mut results = Vec::new();

    let mut config = GameConfig::default();
    config.events.trigger_chance = 1.0;
    config.events.cooldown_ms = 0;
    config.starting_balance = 1_000.0;
    let mut engine = SimulationEngine::with_seed(config, opts.seed, 0);
    for base in [1.0, 2.0, 3.0, 5.0] {
        spawn(&mut engine, base);
    }

    let mut triggered = 0;
    let mut clamped = true;
    for step in 1..=2_000u64 {
        let report = engine.step(step * 1_000);
        triggered += report.triggered.len();
        clamped &= stats_in_range(&engine);
        if engine.is_game_over() {
            break;
        }
    }
    results.push(TestResult {
        name: "events_stats_clamped".into(),
        passed: clamped,
        detail: format!("{} events fired", triggered),
    });

    // Overlapping timed events must unwind to exactly 1.0
    let mut timed = SimulationEngine::with_seed(quiet_config(), opts.seed, 0);
    spawn(&mut timed, 1.0);
    let config = timed.config().clone();
    let templates = [
        EventTemplate::GoldenHour,
        EventTemplate::GloomySpell,
        EventTemplate::GoldenHour,
        EventTemplate::GoldenHour,
    ];
    for (i, template) in templates.iter().enumerate() {
        trigger_event(&mut timed.state, &config, *template, i as u64 * 5_000);
    }
    let peak = timed.state.events.income_multiplier;
    let report = timed.step(200_000);
    results.push(TestResult {
        name: "events_revert_exactly".into(),
        passed: peak == 4.0
            && report.expired.len() == templates.len()
            && timed.active_events().is_empty()
            && timed.state.events.income_multiplier == 1.0,
        detail: format!(
            "peak {}, after expiry {}",
            peak, timed.state.events.income_multiplier
        ),
    });

    let history_len = engine.event_history().count();
    results.push(TestResult {
        name: "events_history_bounded".into(),
        passed: history_len <= engine.config().events.history_len,
        detail: format!("{} entries kept", history_len),
    });

    results
}

// ── 7. Lose Conditions ──────────────────────────────────────────────────

fn validate_lose_conditions(opts: &Options) -> Vec<TestResult> {
    section(opts, "Lose Conditions");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::with_seed(quiet_config(), opts.seed, 0);
    engine.state.balance = -5.0;
    engine.step(1_000);
    let mut frozen = true;
    for step in 2..=10u64 {
        frozen &= engine.step(step * 1_000).frozen;
    }
    results.push(TestResult {
        name: "lose_bankrupt_freezes".into(),
        passed: engine.game_over_reason() == Some(GameOverReason::Bankrupt)
            && frozen
            && engine.balance() == -5.0,
        detail: format!("reason {:?}", engine.game_over_reason().map(|r| r.key())),
    });

    let mut engine = SimulationEngine::with_seed(quiet_config(), opts.seed, 0);
    spawn(&mut engine, 1.0);
    spawn(&mut engine, 1.0);
    for id in 0..2 {
        with_care(&mut engine, id, |c| {
            c.happiness = 0.0;
            c.hunger = 0.0;
            c.cleanliness = 0.0;
        });
    }
    let report = engine.step(1_000);
    results.push(TestResult {
        name: "lose_all_unhappy".into(),
        passed: report.game_over == Some(GameOverReason::AllUnhappy),
        detail: format!("{:?}", report.game_over),
    });

    engine.restart(2_000);
    results.push(TestResult {
        name: "lose_restart_clears".into(),
        passed: !engine.is_game_over() && engine.animal_count() == 0,
        detail: format!("balance after restart {:.0}", engine.balance()),
    });

    results
}

// ── 8. Prestige ─────────────────────────────────────────────────────────

fn validate_prestige(opts: &Options) -> Vec<TestResult> {
    section(opts, "Prestige & Leaderboard");
    let mut results = Vec::new();

    let mut engine = SimulationEngine::with_seed(quiet_config(), opts.seed, 0);
    let mut board = MemoryLeaderboard::default();
    let locked = engine.prestige(0);
    results.push(TestResult {
        name: "prestige_locked_below_threshold".into(),
        passed: matches!(locked, Err(ActionError::PrestigeLocked { .. })),
        detail: format!("{:?}", locked.err().map(|e| e.reason())),
    });

    let increment = engine.config().prestige.multiplier_increment;
    let mut ok = true;
    for round in 1..=3u32 {
        for _ in 0..engine.config().prestige.min_animals {
            spawn(&mut engine, 1.0);
        }
        engine.state.balance = engine.config().prestige.min_balance * round as f64;
        match engine.prestige(round as u64 * 60_000) {
            Ok(summary) => {
                board.record(summary);
            }
            Err(_) => ok = false,
        }
        ok &= engine.animal_count() == 0 && engine.eggs().is_empty();
    }
    let record = engine.prestige_record();
    let expected = 1.0 + 3.0 * increment;
    results.push(TestResult {
        name: "prestige_permanent_progress".into(),
        passed: ok
            && record.count == 3
            && (record.global_multiplier - expected).abs() < 1e-9
            && record.archive.len() == 3,
        detail: format!(
            "count {}, multiplier {:.2}, points {}",
            record.count, record.global_multiplier, record.points
        ),
    });

    let ranking = board.ranking();
    let descending = ranking
        .windows(2)
        .all(|w| w[0].summary.balance >= w[1].summary.balance);
    results.push(TestResult {
        name: "prestige_leaderboard_ranked".into(),
        passed: ranking.len() == 3 && descending,
        detail: ranking
            .iter()
            .map(|r| format!("#{} {:.0}", r.rank, r.summary.balance))
            .collect::<Vec<_>>()
            .join(", "),
    });

    results
}
