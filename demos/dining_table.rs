use anyhow::Result;
use dining_rs::prelude::*;
use rand::Rng;

#[tokio::main]
async fn main() -> Result<()> {
    // Инициализируем логирование
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("🍜 Обед философов");
    println!("=================\n");

    // Порция занимает случайное время, как в реальной жизни
    let eat_duration_ms = rand::thread_rng().gen_range(50..150);

    let config = SimConfig {
        philosophers: 5,
        table_limit: 2,
        servings: 3,
        eat_duration_ms,
    };

    let sim = Simulation::new(config)?;
    sim.run().await?;

    println!("\n📊 Статистика симуляции:");
    println!("{}", serde_json::to_string_pretty(&sim.get_stats())?);

    Ok(())
}
