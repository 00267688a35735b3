use clap::{Parser, Subcommand};
use serde::Serialize;
use sos_map::cities::{city_list, find_city, CITIES};
use sos_map::config::AppConfig;
use sos_map::geo::Coordinates;
use sos_map::location::LocationResolver;
use sos_map::map::{MapSession, Marker, MarkerStyle};
use std::path::PathBuf;

/// SOS Map: find the nearest cities to where you are.
///
/// Ranks a fixed set of ten Indian cities by planar (flat lat/lon)
/// distance to your location and highlights the closest ones.
///
/// Examples:
///   sosmap nearest --lat 28.70 --lon 77.10
///   sosmap nearest --auto --limit 3
///   sosmap nearest --from Pune --json
///   sosmap markers
///   sosmap serve --port 8080
#[derive(Parser)]
#[command(name = "sosmap", version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./sosmap.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank the city markers by distance to a location.
    Nearest {
        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// Auto-detect location via IP geolocation.
        #[arg(long, short = 'a', conflicts_with_all = ["lat", "from"])]
        auto: bool,

        /// Use one of the marker cities as the reference point.
        #[arg(long, conflicts_with = "lat")]
        from: Option<String>,

        /// Number of markers to show (defaults to ranking.limit).
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// How many of the shown markers are highlighted blue.
        #[arg(long)]
        highlighted: Option<usize>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// List the fixed city markers.
    Markers {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Serve the interactive map page and JSON API.
    Serve {
        /// Bind address (defaults to server.host).
        #[arg(long)]
        host: Option<String>,

        /// Port (defaults to server.port).
        #[arg(long, short = 'p')]
        port: Option<u16>,
    },
}

#[derive(Serialize)]
struct NearestOutput<'a> {
    reference: Coordinates,
    markers: &'a [Marker],
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    sos_map::telemetry::init(cli.verbose);

    let loaded = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    match cli.command {
        Command::Nearest { lat, lon, auto, from, limit, highlighted, json } => {
            let config = config.with_ranking(limit, highlighted);
            let resolver = build_resolver(&config, lat, lon, auto, from.as_deref());
            run_nearest(&config, resolver, json).await;
        }
        Command::Markers { json } => print_markers(json),
        Command::Serve { host, port } => {
            let config = config.with_server(host, port);
            if let Err(e) = sos_map::server::start(config).await {
                eprintln!("Server error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn build_resolver(
    config: &AppConfig,
    lat: Option<f64>,
    lon: Option<f64>,
    auto: bool,
    from: Option<&str>,
) -> LocationResolver {
    // Priority: --from > --auto > --lat/--lon > error

    if let Some(name) = from {
        let city = find_city(name).unwrap_or_else(|| {
            let names: Vec<&str> = CITIES.iter().map(|c| c.name).collect();
            eprintln!("Error: Unknown city '{}'. Known: {}", name, names.join(", "));
            std::process::exit(1);
        });
        return LocationResolver::manual(city.coordinates());
    }

    if auto {
        return LocationResolver::auto(config.location());
    }

    if let (Some(lat), Some(lon)) = (lat, lon) {
        let coords = Coordinates::new(lat, lon).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
        return LocationResolver::manual(coords);
    }

    eprintln!("Error: No location specified.");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  sosmap nearest --lat 28.70 --lon 77.10");
    eprintln!("  sosmap nearest --auto");
    eprintln!("  sosmap nearest --from Delhi");
    std::process::exit(1);
}

async fn run_nearest(config: &AppConfig, resolver: LocationResolver, json: bool) {
    let mut session = MapSession::new(&CITIES, config.map(), config.ranking());

    let reference = session.locate(resolver).await.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let markers = session.show_nearest().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if json {
        let output = NearestOutput { reference, markers };
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("  \u{1F4CD} {}", reference);
    println!();
    println!("  {:>2}  {:<10} {:>9} {:>9} {:>9}  {}", "#", "City", "Lat", "Lon", "Dist(\u{00B0})", "Color");
    for (i, marker) in markers.iter().enumerate() {
        let color = match marker.style {
            MarkerStyle::Ranked(c) => c.to_string(),
            _ => "-".to_string(),
        };
        println!(
            "  {:>2}  {:<10} {:>9.4} {:>9.4} {:>9}  {}",
            i + 1,
            marker.label,
            marker.coords.latitude,
            marker.coords.longitude,
            marker.distance.map_or_else(|| "-".to_string(), |d| format!("{:.4}", d)),
            color
        );
    }
}

fn print_markers(json: bool) {
    let cities = city_list();
    if json {
        match serde_json::to_string_pretty(&cities) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for city in cities {
        println!("  {:<10} {:>9.4} {:>9.4}", city.name, city.lat, city.lon);
    }
}
