#![deny(unsafe_code)]
//! WFE demo binary.
//!
//! Runs a self-contained demonstration of:
//! 1. Operad law verification over random composition trees
//! 2. Concurrent two-party fusion runs with a privacy veto
//! 3. Sheaf-first reconciliation of compatible proposals
//! 4. Three-way fusion folded into one witnessed synthesis
//!
//! Set `RUST_LOG=debug` to see every engine transition.

mod scenarios;

use anyhow::Context as _;
use maple_wfe_fusion::{
    AuthorityVeto, FusionConfig, FusionEngine, FusionResult, NoVeto, Proposal, ProposalId,
    Reconciliation, TimeboxedFallbackStrategy,
};
use maple_wfe_operad::{verify_with, LawCheckConfig};
use maple_wfe_types::Trace;
use maple_wfe_witness::Witnessed;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use scenarios::Scenario;

// ── Formatting Helpers ──────────────────────────────────────────────────

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════════════════════╗
 ║          Witnessed Fusion Engine  --  Demo                   ║
 ║                                                              ║
 ║   Traced computation, lawful composition,                    ║
 ║   sheaf gluing, and dialectical synthesis.                   ║
 ╚═══════════════════════════════════════════════════════════════╝
"#;

fn section(title: &str) {
    let width: usize = 60;
    let pad = width.saturating_sub(title.len() + 4);
    let left = pad / 2;
    let right = pad - left;
    println!();
    println!(" ┌{}┐", "─".repeat(width));
    println!(" │{}  {}  {}│", " ".repeat(left), title, " ".repeat(right));
    println!(" └{}┘", "─".repeat(width));
}

fn ok(msg: &str) {
    println!("   [OK]  {}", msg);
}

fn info(msg: &str) {
    println!("   [--]  {}", msg);
}

fn warn(msg: &str) {
    println!("   [!!]  {}", msg);
}

fn print_trace(trace: &Trace) {
    for mark in trace {
        println!(
            "         {:>3}.{:<2} {}",
            mark.timestamp().physical_ms % 1000,
            mark.timestamp().logical,
            mark.description()
        );
    }
}

// ── Main ────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    println!("{}", BANNER);

    if let Err(e) = run_demo().await {
        eprintln!();
        eprintln!("   [FATAL]  Demo failed: {:#}", e);
        std::process::exit(1);
    }

    println!();
    println!(" ════════════════════════════════════════════════════════════════");
    println!("  Demo complete.  All phases succeeded.");
    println!(" ════════════════════════════════════════════════════════════════");
    println!();
}

async fn run_demo() -> anyhow::Result<()> {
    // ── Phase A: Operad Laws ────────────────────────────────────────
    section("Phase A: Operad Law Verification");

    let config = LawCheckConfig::default();
    info(&format!(
        "seed={}  samples={}  max_depth={}",
        config.seed, config.sample_count, config.max_depth
    ));
    let report = verify_with(&config);
    for outcome in &report.outcomes {
        if outcome.holds() {
            ok(&format!("{:<24} {} cases", outcome.law, outcome.cases_run));
        } else {
            warn(&format!(
                "{:<24} {} counterexample(s)",
                outcome.law,
                outcome.counterexamples.len()
            ));
        }
    }
    report.ensure_holds().context("operad laws")?;

    // ── Phase B: Concurrent Fusion ──────────────────────────────────
    section("Phase B: Two-Party Fusion  (concurrent)");

    let mut set = JoinSet::new();
    for (index, scenario) in scenarios::all().into_iter().enumerate() {
        set.spawn_blocking(move || (index, scenario.name, fuse_scenario(&scenario)));
    }
    let mut runs = Vec::new();
    while let Some(joined) = set.join_next().await {
        let (index, name, outcome) = joined?;
        runs.push((index, name, outcome?));
    }
    runs.sort_by_key(|(index, _, _)| *index);

    let mut outcomes = Vec::with_capacity(runs.len());
    for (_, name, witnessed) in runs {
        print_outcome(name, &witnessed);
        outcomes.push(witnessed);
    }

    let audit = Witnessed::sequence(outcomes);
    audit.trace().verify().context("combined audit trail")?;
    ok(&format!(
        "Audit trail: {} marks over {} runs, digest {}",
        audit.trace().len(),
        audit.value().len(),
        audit.trace().digest()
    ));

    // ── Phase C: Sheaf-First Reconciliation ─────────────────────────
    section("Phase C: Sheaf-First Reconciliation");

    demonstrate_reconcile()?;

    // ── Phase D: N-Way Fusion ───────────────────────────────────────
    section("Phase D: Three-Way Fusion");

    demonstrate_fuse_all()?;

    Ok(())
}

// ── Fusion helpers ──────────────────────────────────────────────────────

fn engine() -> anyhow::Result<FusionEngine> {
    let config = FusionConfig::new(3)?.with_actor("demo");
    Ok(FusionEngine::new(config).with_strategy(TimeboxedFallbackStrategy::new(21)))
}

fn fuse_scenario(scenario: &Scenario) -> anyhow::Result<Witnessed<FusionResult>> {
    let mut engine = engine()?;
    let a = engine.submit_proposal(scenario.a.clone());
    let b = engine.submit_proposal(scenario.b.clone());
    let board = AuthorityVeto::new("privacy-board", scenarios::privacy_board);
    Ok(engine.fuse(a, b, &board)?)
}

fn print_outcome(name: &str, witnessed: &Witnessed<FusionResult>) {
    match witnessed.value() {
        FusionResult::Synthesis(s) => {
            ok(&format!("{:<20} VERIFIED  {}", name, s.id));
            for (dimension, stance) in &s.content {
                info(&format!("  {}: {}", dimension, stance));
            }
        }
        FusionResult::Impasse { reason } => {
            warn(&format!("{:<20} IMPASSE   {}", name, reason));
        }
        FusionResult::Vetoed { reason, record } => {
            warn(&format!("{:<20} VETOED    {} ({})", name, reason, record.issuer));
        }
    }
    print_trace(witnessed.trace());
}

fn demonstrate_reconcile() -> anyhow::Result<()> {
    let mut engine = engine()?;
    let storage = Proposal::new(ProposalId::new("storage"), "infra", "postgres")
        .with_principle("durability")
        .with_position("storage", "postgres");
    let rollout = Proposal::new(ProposalId::new("rollout"), "release", "canary")
        .with_principle("durability")
        .with_position("rollout", "canary");
    let a = engine.submit_proposal(storage);
    let b = engine.submit_proposal(rollout);

    let witnessed = engine.reconcile(a, b, &NoVeto)?;
    match witnessed.value() {
        Reconciliation::Glued(belief) => {
            ok(&format!(
                "Glued on {}  confidence={:.2}",
                belief.context(),
                belief.confidence()
            ));
            for (dimension, stance) in belief.content() {
                info(&format!("  {}: {}", dimension, stance));
            }
        }
        Reconciliation::Fused(result) => {
            warn(&format!("Unexpected fusion: {}", result.state()));
        }
    }
    print_trace(witnessed.trace());
    Ok(())
}

fn demonstrate_fuse_all() -> anyhow::Result<()> {
    let mut engine = engine()?;
    let base = scenarios::framework_vs_novel();
    let managed = Proposal::new(ProposalId::new("managed"), "ops", "buy managed service")
        .with_principle("timely delivery")
        .with_position("approach", "buy managed service");
    let handles = [
        engine.submit_proposal(base.a),
        engine.submit_proposal(base.b),
        engine.submit_proposal(managed),
    ];

    let witnessed = engine.fuse_all(&handles, &NoVeto)?;
    match witnessed.value().synthesis() {
        Some(s) => {
            ok(&format!("Fused {} proposals into {}", handles.len(), s.id));
            println!("{}", serde_json::to_string_pretty(s)?);
        }
        None => warn(&format!("Stopped at {}", witnessed.value().state())),
    }
    info(&format!("{} marks", witnessed.trace().len()));
    Ok(())
}
