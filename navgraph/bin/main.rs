use anyhow::Context;
use navgraph::{FloorPlan, GraphConfig, Location};
use serde::Deserialize;

/// A floor plan together with the queries to run on it
#[derive(Deserialize)]
struct Scene {
    #[serde(flatten)]
    floor_plan: FloorPlan,
    #[serde(default)]
    config: GraphConfig,
    #[serde(default)]
    queries: Vec<Query>,
}

#[derive(Deserialize)]
struct Query {
    start: Location,
    goal: Location,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/floorplan.json".to_string());
    let text = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file))?;
    let scene: Scene =
        serde_json::from_str(&text).with_context(|| format!("parsing scene {}", file))?;

    let graph = scene.floor_plan.build(&scene.config)?;

    println!("{}", graph);

    for query in &scene.queries {
        let path = graph.find_path(query.start, query.goal);

        if path.is_empty() {
            println!("{} -> {}: no path", query.start, query.goal);
        } else {
            println!(
                "{} -> {}: {}",
                query.start,
                query.goal,
                serde_json::to_string(&path)?
            );
        }
    }

    Ok(())
}
