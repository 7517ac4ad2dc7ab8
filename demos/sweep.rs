//! Sweep example: Durations, decay and context-driven expiry
//!
//! This example demonstrates:
//! - Attaching behaviours to statuses
//! - Running sweeps with a tick context
//! - Tracing output (set `RUST_LOG=zzstatus=debug` to see it)

use tracing_subscriber::EnvFilter;
use zzstatus::definition::StatusDefinition;
use zzstatus::*;

fn main() -> Result<(), StatusError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut registry = DefinitionRegistry::from_json(
        r#"[
            { "id": "Poison", "stackable": true, "min_stack": 0, "max_stack": 10 },
            { "id": "Haste", "duration": 3 },
            { "id": "Enraged" }
        ]"#,
    )?;
    registry.register(StatusDefinition::new("Regen").with_percentage())?;

    registry.register_behavior("Poison", Box::new(Decay::stacks(2)));
    registry.register_behavior("Regen", Box::new(Decay::percentage(0.25)));
    registry.register_behavior("Enraged", Box::new(FlagExpiry::new("combat_over")));

    let capabilities = CapabilityResolver::new();
    let mut events: Vec<StatusEvent> = Vec::new();
    let mut hero = StatusCollection::new(EntityRef::new(1, "Player"));

    let mut env = StatusEnv::new(&registry, &capabilities, &mut events);
    hero.increase_stack(&mut env, &StatusId::from_str("Poison"), 5)?;
    hero.add(&mut env, &StatusId::from_str("Haste"), 1.0)?;
    hero.add(&mut env, &StatusId::from_str("Enraged"), 1.0)?;
    hero.increase_percentage(&mut env, &StatusId::from_str("Regen"), 1.0)?;

    for tick in 1..=4 {
        let mut context = TickContext::new(tick);
        context.set("combat_over", tick >= 4);

        let report = hero.sweep(&mut env, &context)?;
        println!("\n=== Tick {} ===", tick);
        println!("Expired: {:?}", report.expired);
        println!("Updated: {:?}", report.updated);
        for instance in hero.iter() {
            println!(
                "  {}: level {:.2}, age {}",
                instance.status(),
                instance.level(),
                instance.age()
            );
        }
    }

    println!("\n{} events dispatched", events.len());

    Ok(())
}
