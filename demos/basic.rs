//! Basic example: Stacking, percentages and capability gates
//!
//! This example demonstrates:
//! - Registering status definitions
//! - Banning a status for an entity kind
//! - Mutating stacks and percentages
//! - Reading the dispatched events

use zzstatus::definition::{NotificationMode, StatusDefinition};
use zzstatus::*;

fn main() -> Result<(), StatusError> {
    // Define the statuses this game knows about
    let mut registry = DefinitionRegistry::new();
    registry.register(
        StatusDefinition::new("Bleed")
            .stackable()
            .with_min_stack(0)
            .with_max_stack(5)
            .with_notification(NotificationMode::PerUnit),
    )?;
    registry.register(StatusDefinition::new("Charge").stackable().with_percentage())?;
    println!("Registered statuses: {:?}", registry.ids());

    // Golems do not bleed
    let mut capabilities = CapabilityResolver::new();
    capabilities.ban(EntityKind::from_str("Golem"), StatusId::from_str("Bleed"));

    let bleed = StatusId::from_str("Bleed");
    let charge = StatusId::from_str("Charge");
    let mut hero = StatusCollection::new(EntityRef::new(1, "Player"));
    let mut golem = StatusCollection::new(EntityRef::new(2, "Golem"));
    let mut events: Vec<StatusEvent> = Vec::new();

    let mut env = StatusEnv::new(&registry, &capabilities, &mut events);

    println!("\nApplying 7 stacks of Bleed to both entities:");
    let on_hero = hero.increase_stack(&mut env, &bleed, 7)?;
    let on_golem = golem.increase_stack(&mut env, &bleed, 7)?;
    println!("  - Player accepted: {}", on_hero);
    println!("  - Golem accepted: {}", on_golem);

    println!("\nCharging the hero by 2.75 then 0.5:");
    hero.increase_percentage(&mut env, &charge, 2.75)?;
    hero.increase_percentage(&mut env, &charge, 0.5)?;

    println!("\n=== Player Statuses ===");
    for instance in hero.iter() {
        println!(
            "{}: {} stacks, {:.2} percentage (level {:.2})",
            instance.status(),
            instance.stack_count(),
            instance.percentage(),
            instance.level()
        );
    }

    println!("\n=== Events ===");
    for event in &events {
        println!("  {} {}: {:?}", event.owner(), event.status(), event.kind);
    }

    Ok(())
}
