use clap::{Parser, Subcommand};
use hn_core::to_deg_c;
use hn_network::Network;
use hn_project::{NetworkFile, ProjectResult};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "hn-cli")]
#[command(about = "heatnet CLI - District-heating network topology and pipe sizing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a network file and print a summary
    Check {
        /// Path to the network file (YAML or JSON)
        network_path: PathBuf,
    },
    /// Generate junctions, connect buildings and prune the network
    Normalize {
        /// Path to the network file (YAML or JSON)
        network_path: PathBuf,
        /// Where to write the normalized network
        #[arg(short, long)]
        output: PathBuf,
        /// Flag building branches as supply pipes so later buildings may attach to them
        #[arg(long)]
        extend_supply_pipes: bool,
        /// Replace runs of pass-through junctions by single edges
        #[arg(long)]
        collapse: bool,
        /// Merge edges shorter than this length in metres
        #[arg(long)]
        min_length: Option<f64>,
    },
    /// Print the shortest supply path of every building
    Paths {
        /// Path to the network file (YAML or JSON)
        network_path: PathBuf,
    },
    /// Size all pipes and report per-edge results
    Size {
        /// Path to the network file (YAML or JSON)
        network_path: PathBuf,
        /// Results file (YAML or JSON by extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ProjectResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { network_path } => cmd_check(&network_path),
        Commands::Normalize {
            network_path,
            output,
            extend_supply_pipes,
            collapse,
            min_length,
        } => cmd_normalize(&network_path, &output, extend_supply_pipes, collapse, min_length),
        Commands::Paths { network_path } => cmd_paths(&network_path),
        Commands::Size {
            network_path,
            output,
        } => cmd_size(&network_path, output.as_deref()),
    }
}

fn load(network_path: &Path) -> ProjectResult<(NetworkFile, Network)> {
    let file = hn_project::load_file(network_path)?;
    let net = hn_project::to_network(&file)?;
    Ok((file, net))
}

fn print_summary(net: &Network) {
    println!("Network '{}' ({:?})", net.name, net.network_type);
    println!(
        "  {} nodes ({} sources, {} substations), {} edges",
        net.node_count(),
        net.source_count(),
        net.substation_count(),
        net.edge_count()
    );
    println!(
        "  total length {:.1} m, pipe length {:.1} m",
        net.total_length(),
        net.total_pipe_length()
    );
    if let Some(ext) = net.extents() {
        let size = ext.size();
        println!("  extents {:.1} x {:.1} x {:.1} m", size.x, size.y, size.z);
    }
}

fn cmd_check(network_path: &Path) -> ProjectResult<()> {
    println!("Checking network: {}", network_path.display());
    let (_, net) = load(network_path)?;
    print_summary(&net);

    if net.check_connected_graph() {
        println!("✓ Network is connected");
    } else {
        let components = net.connected_components();
        println!("✗ Network is not connected ({} components)", components.len());
        for (i, c) in components.iter().enumerate() {
            println!("  component {}: {} nodes", i + 1, c.len());
        }
    }
    Ok(())
}

fn cmd_normalize(
    network_path: &Path,
    output: &Path,
    extend_supply_pipes: bool,
    collapse: bool,
    min_length: Option<f64>,
) -> ProjectResult<()> {
    let (mut file, mut net) = load(network_path)?;

    let crossings = net.generate_intersections()?;
    println!(
        "Intersections: {} junctions, {} edges added",
        crossings.added_nodes.len(),
        crossings.added_edges.len()
    );

    let buildings = net.connect_buildings(extend_supply_pipes)?;
    println!("Buildings: {} connected", buildings.branches.len());
    for s in &buildings.unconnected {
        println!("  {s} could not be connected (no supply pipe)");
    }

    println!("Dead ends: {} nodes removed", net.clean_dead_ends());
    if collapse {
        println!(
            "Redundant nodes: {} removed",
            net.collapse_redundant_edges()
        );
    }
    if let Some(threshold) = min_length {
        println!(
            "Short edges: {} merged",
            net.remove_short_edges(threshold)?
        );
    }

    print_summary(&net);
    file.update_from_network(&net);
    hn_project::save_file(output, &file)?;
    info!(path = %output.display(), "normalized network written");
    println!("✓ Written to {}", output.display());
    Ok(())
}

fn cmd_paths(network_path: &Path) -> ProjectResult<()> {
    let (_, net) = load(network_path)?;
    let paths = net.find_shortest_paths_for_buildings()?;

    println!("Supply paths ({}):", paths.len());
    for p in paths.values() {
        let edges: Vec<String> = p.edges.iter().map(|e| e.get().to_string()).collect();
        println!(
            "  {} <- {}: {:.1} m via [{}]",
            p.substation,
            p.source,
            p.length,
            edges.join(", ")
        );
    }
    Ok(())
}

fn cmd_size(network_path: &Path, output: Option<&Path>) -> ProjectResult<()> {
    let (file, mut net) = load(network_path)?;
    let fluid = hn_project::fluid_from_file(&file)?;
    let catalog = hn_project::catalog_from_file(&file)?;
    let params = hn_project::sizing_params(&file);

    println!(
        "Sizing at {:.1} °C, ΔT {:.1} K, max {:.0} Pa/m",
        to_deg_c(params.temperature_setpoint),
        params.temperature_difference.value,
        params.max_pressure_loss
    );
    let report = net.size_pipe_dimensions(&fluid, &catalog, &params)?;
    println!("✓ {} edges sized", report.sized);
    if !report.filled_from_neighbours.is_empty() {
        println!(
            "  {} edges off every supply path took neighbour demand",
            report.filled_from_neighbours.len()
        );
    }
    for e in &report.fallback_largest {
        println!("  {e}: no pipe within the pressure-loss budget, largest used");
    }

    for e in net.edges() {
        let pipe = e
            .pipe
            .and_then(|id| catalog.get(id).ok())
            .map_or("-", |p| p.name.as_str());
        println!(
            "  {}: {:>8.1} m  {:>10.0} W  {:>7.3} kg/s  {}",
            e.id,
            e.length(),
            e.nominal_heating_demand.value,
            e.nominal_mass_flow.value,
            pipe
        );
    }

    if let Some(path) = output {
        let results = hn_project::results_from_network(&net, Some(&report.paths));
        hn_project::save_results(path, &results)?;
        println!("✓ Results written to {}", path.display());
    }
    Ok(())
}
