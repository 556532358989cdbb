//! CLI command implementations.

use campus_core::{sort_by_label, CanvasTransform, Point};
use campus_graph::{CampusConfig, FileSource, GraphStore, LoadReport};
use campus_server::{watch_dataset, CampusServer, ServerConfig, ServerState, WatcherConfig};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const CONFIG_DIR: &str = ".campus";
const CONFIG_FILE: &str = "config.json";

/// Global options shared by every command.
pub struct Context {
    pub config: Option<PathBuf>,
    pub data: Option<PathBuf>,
}

impl Context {
    /// Explicit `--config`, then the project config, then the user config.
    fn load_config(&self) -> Result<CampusConfig> {
        if let Some(path) = &self.config {
            debug!("Using config {}", path.display());
            return Ok(CampusConfig::load(path)?);
        }

        let project = Path::new(CONFIG_DIR).join(CONFIG_FILE);
        if project.exists() {
            debug!("Using config {}", project.display());
            return Ok(CampusConfig::load(&project)?);
        }

        if let Some(user) = dirs::config_dir().map(|d| d.join("campus-route").join(CONFIG_FILE)) {
            if user.exists() {
                debug!("Using config {}", user.display());
                return Ok(CampusConfig::load(&user)?);
            }
        }

        Ok(CampusConfig::default())
    }

    fn dataset(&self, config: &CampusConfig) -> Result<PathBuf> {
        self.data
            .clone()
            .or_else(|| config.dataset.clone())
            .ok_or_else(|| {
                "no dataset configured; pass --data or set \"dataset\" in the config".into()
            })
    }
}

/// Loads the dataset behind a spinner.
async fn open_store(ctx: &Context) -> Result<(CampusConfig, GraphStore, LoadReport)> {
    let config = ctx.load_config()?;
    let dataset = ctx.dataset(&config)?;
    let store = GraphStore::new(config.engine);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Loading {}...", dataset.display()));

    let result = store.load(&FileSource::new(&dataset)).await;
    spinner.finish_and_clear();

    let report = result?;
    Ok((config, store, report))
}

/// Create a default config in a directory.
pub fn init(path: &Path) -> Result<()> {
    let config_path = path.join(CONFIG_DIR).join(CONFIG_FILE);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    CampusConfig::default().save(&config_path)?;

    println!("{} Initialized Campus Route in {}", "✓".green(), path.display());
    println!("  Edit {} to point at your dataset", config_path.display().to_string().cyan());

    Ok(())
}

/// Load and validate the dataset.
pub async fn check(ctx: &Context) -> Result<()> {
    let (config, store, report) = open_store(ctx).await?;
    let stats = store.stats();

    println!(
        "{} Loaded {} in {}ms",
        "✓".green(),
        report.source.cyan(),
        report.duration_ms
    );
    println!();
    println!("  {} {}", "Buildings:".dimmed(), stats.buildings);
    println!("  {} {}", "Gates:".dimmed(), stats.gates);
    println!("  {} {}", "Waypoints:".dimmed(), stats.waypoints);
    println!(
        "  {} {} ({} walkable)",
        "Pathways:".dimmed(),
        stats.edge_count,
        stats.walkable_edges
    );
    println!("  {} {}", "Edge policy:".dimmed(), config.engine.edge_policy);

    if !report.dropped_edges.is_empty() {
        println!("\n{} {} pathways dropped:", "⚠".yellow(), report.dropped_edges.len());
        for problem in report.dropped_edges.iter().take(5) {
            println!("  {}", problem.to_string().red());
        }
        if report.dropped_edges.len() > 5 {
            println!("  ... and {} more", report.dropped_edges.len() - 5);
        }
    }

    Ok(())
}

/// List route endpoints, sorted by name.
pub async fn locations(ctx: &Context) -> Result<()> {
    let (_, store, _) = open_store(ctx).await?;

    let mut landmarks = store.landmarks();
    sort_by_label(&mut landmarks);

    if landmarks.is_empty() {
        println!("No buildings or gates in this dataset");
        return Ok(());
    }

    for node in landmarks {
        println!(
            "  {} {} {}",
            format!("{:<8}", node.kind.to_string()).yellow(),
            node.label().cyan(),
            format!("({})", node.id).dimmed()
        );
    }

    Ok(())
}

/// Find and print the shortest route.
pub async fn route(ctx: &Context, from: &str, to: &str, json: bool) -> Result<()> {
    let (_, store, _) = open_store(ctx).await?;

    let start = resolve_endpoint(&store, from);
    let end = resolve_endpoint(&store, to);
    let route = store.find_shortest_path(&start, &end)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&route)?);
        return Ok(());
    }

    let labels: Vec<String> = route
        .node_ids
        .iter()
        .filter_map(|id| store.get_node(id))
        .map(|n| n.label().to_string())
        .collect();

    println!("{}", "Route".cyan().bold());
    println!();
    println!("  {}", labels.join(" → "));
    println!();
    println!("  {} {}", "Segments:".dimmed(), route.hops());
    println!("  {} {:.0}", "Distance:".dimmed(), route.distance);
    println!("  {} {}", "Time:".dimmed(), route.duration());

    Ok(())
}

/// Emit nodes, walkable pathways and a route in canvas pixels.
pub async fn render(
    ctx: &Context,
    from: &str,
    to: &str,
    width: f64,
    height: f64,
    output: Option<&Path>,
) -> Result<()> {
    if width <= 0.0 || height <= 0.0 {
        return Err("canvas width and height must be positive".into());
    }

    let (config, store, _) = open_store(ctx).await?;
    let start = resolve_endpoint(&store, from);
    let end = resolve_endpoint(&store, to);
    let route = store.find_shortest_path(&start, &end)?;

    let scene = build_scene(&config.canvas, &store, &route, width, height);
    let text = serde_json::to_string_pretty(&scene)?;

    match output {
        Some(path) => {
            fs::write(path, text)?;
            println!("{} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}

fn build_scene(
    transform: &CanvasTransform,
    store: &GraphStore,
    route: &campus_graph::RouteResult,
    width: f64,
    height: f64,
) -> serde_json::Value {
    let graph = store.snapshot();
    let to_px = |p: Point| transform.to_canvas(p, width, height);

    let nodes: Vec<_> = graph
        .nodes()
        .map(|n| {
            serde_json::json!({
                "id": n.id,
                "type": n.kind,
                "label": n.kind.is_landmark().then(|| n.label()),
                "at": to_px(n.position()),
            })
        })
        .collect();

    let edges: Vec<_> = graph
        .walkable_edges()
        .into_iter()
        .map(|s| serde_json::json!({ "from": to_px(s.from), "to": to_px(s.to) }))
        .collect();

    serde_json::json!({
        "canvas": { "width": width, "height": height },
        "nodes": nodes,
        "edges": edges,
        "route": {
            "nodeIds": route.node_ids,
            "points": transform.to_canvas_all(route.coordinates.iter().copied(), width, height),
            "distance": route.distance,
            "estimatedTime": route.estimated_time,
            "durationText": route.duration().to_string(),
        },
    })
}

/// Start the WebSocket server, optionally watching the dataset.
pub async fn serve(ctx: &Context, port: u16, headless: bool, watch: bool) -> Result<()> {
    let bind_addr = if headless { "0.0.0.0" } else { "127.0.0.1" };

    let (config, store, report) = open_store(ctx).await?;
    let dataset = ctx.dataset(&config)?;

    println!(
        "{} Loaded {} nodes, {} pathways",
        "✓".green(),
        report.nodes,
        report.edges
    );

    let state = Arc::new(ServerState::new(Arc::new(store), dataset, config.canvas));
    state.mark_loaded().await;

    if watch {
        let watch_state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_dataset(watch_state, WatcherConfig::default()).await {
                error!("Dataset watcher error: {}", e);
            }
        });
        println!("{} Watching {} for changes", "✓".green(), state.dataset.display());
    }

    let addr = format!("{}:{}", bind_addr, port).parse()?;
    let server = CampusServer::new(state, ServerConfig { addr });

    println!("{} Listening on ws://{}:{}", "✓".green(), bind_addr, port);
    if headless {
        println!("  Headless mode: accepting connections from any host");
    }
    println!("  Press {} to stop", "Ctrl+C".cyan());

    server.run().await.map_err(|e| e.to_string())?;

    Ok(())
}

/// Accepts a node id, or a landmark name matched case-insensitively.
fn resolve_endpoint(store: &GraphStore, input: &str) -> String {
    if store.get_node(input).is_some() {
        return input.to_string();
    }

    let wanted = input.to_lowercase();
    store
        .landmarks()
        .into_iter()
        .find(|n| n.label().to_lowercase() == wanted)
        .map(|n| n.id)
        .unwrap_or_else(|| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::NodeKind;

    const DATA: &str = r#"{
        "nodes": [
            {"id": "b1", "x": 22, "y": 43, "type": "building", "name": "St. Rose"},
            {"id": "g1", "x": 78, "y": 82, "type": "gate", "name": "Gate 1"},
            {"id": "j1", "x": 50, "y": 60, "type": "path"}
        ],
        "paths": [
            {"start": "b1", "end": "j1", "walkable": true},
            {"start": "j1", "end": "g1", "walkable": true}
        ]
    }"#;

    fn store() -> GraphStore {
        let store = GraphStore::default();
        let dataset = campus_core::Dataset::from_json(DATA.as_bytes()).unwrap();
        store.load_dataset(dataset).unwrap();
        store
    }

    #[test]
    fn test_resolve_endpoint_by_id_or_name() {
        let store = store();
        assert_eq!(resolve_endpoint(&store, "g1"), "g1");
        assert_eq!(resolve_endpoint(&store, "gate 1"), "g1");
        assert_eq!(resolve_endpoint(&store, "ST. ROSE"), "b1");
        // unresolved input passes through so the engine reports it
        assert_eq!(resolve_endpoint(&store, "Annex"), "Annex");
    }

    #[test]
    fn test_locations_sorted_by_label() {
        let mut nodes = store().landmarks();
        sort_by_label(&mut nodes);
        let names: Vec<&str> = nodes.iter().map(|n| n.label()).collect();
        assert_eq!(names, vec!["Gate 1", "St. Rose"]);
        assert!(nodes.iter().all(|n| n.kind != NodeKind::Waypoint));
    }

    #[test]
    fn test_scene_uses_shared_transform() {
        let store = store();
        let route = store.find_shortest_path("b1", "g1").unwrap();
        let transform = CanvasTransform::identity();
        let scene = build_scene(&transform, &store, &route, 100.0, 100.0);

        assert_eq!(scene["edges"].as_array().unwrap().len(), 2);
        assert_eq!(scene["route"]["points"][0]["x"], 22.0);
        assert_eq!(scene["route"]["points"][2]["y"], 82.0);
        assert_eq!(scene["nodes"][2]["label"], serde_json::Value::Null);
    }

    #[test]
    fn test_init_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path()).unwrap();

        let path = dir.path().join(CONFIG_DIR).join(CONFIG_FILE);
        let config = CampusConfig::load(&path).unwrap();
        assert_eq!(config, CampusConfig::default());

        // second run leaves the file alone
        init(dir.path()).unwrap();
    }

    #[test]
    fn test_data_flag_overrides_config() {
        let ctx = Context {
            config: None,
            data: Some(PathBuf::from("other.json")),
        };
        let config = CampusConfig::default();
        assert_eq!(ctx.dataset(&config).unwrap(), PathBuf::from("other.json"));

        let ctx = Context {
            config: None,
            data: None,
        };
        let config = CampusConfig {
            dataset: None,
            ..CampusConfig::default()
        };
        assert!(ctx.dataset(&config).is_err());
    }
}
