//! Search Q6 from scratch, then prime the result up to Q8
//!
//! Run with: RUST_LOG=info cargo run --release --example primed_search

use snakebox_core::*;

fn main() -> Result<(), SearchError> {
    env_logger::init();

    let beam = BeamConfig::default().with_budget_bytes(16 * 1024 * 1024);

    println!("=== Fresh search in Q6 ===");
    let fresh = BeamSearchEngine::new(beam.clone()).search(6)?;
    println!("   length {}, fitness {}", fresh.length, fresh.final_fitness);
    println!("   transitions {:?}", fresh.transitions);
    println!(
        "   {} levels, {} nodes, {} prune events, {} ms\n",
        fresh.stats.levels, fresh.stats.nodes_generated, fresh.stats.prune_events, fresh.stats.elapsed_ms
    );

    println!("=== Priming Q6 -> Q8 ===");
    let config = PrimingConfig {
        beam,
        ..PrimingConfig::default()
    };
    let outcome = PrimingSeeder::new(config).extend(&fresh.transitions, 6, 8)?;
    for step in &outcome.steps {
        println!(
            "   Q{} -> Q{}: {} -> {} (started from length {})",
            step.from_dimension, step.to_dimension, step.seed_length, step.result_length, step.start_length
        );
    }
    println!("   final length {} in Q{}", outcome.result.length, outcome.result.dimension);

    Ok(())
}
