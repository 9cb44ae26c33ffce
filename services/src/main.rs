use chrono::DateTime;
use clap::{Parser, Subcommand};
use services::{Config, DirectionsClient, RadarClient, RadarPoller, RadarSource, RoutePlanner};
use shared::{
    Point, Profile, RadarFeed, Route, categories::BreakdownEntry, format_distance,
    format_duration, format::format_elevation,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(author, version, about = "Plan a route and check the weather radar")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Request a route between two points
    Plan {
        /// Start point as LNG,LAT
        #[arg(long, allow_hyphen_values = true)]
        start: Point,
        /// End point as LNG,LAT
        #[arg(long, allow_hyphen_values = true)]
        end: Point,
        /// driving, road-cycling, mountain-cycling or hiking
        #[arg(long, default_value = "hiking")]
        profile: Profile,
        /// Print the full route as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Show the newest radar frame
    Radar {
        /// Keep polling until interrupted
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "services=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    match args.command {
        Command::Plan {
            start,
            end,
            profile,
            json,
        } => {
            let client = DirectionsClient::from_config(&config)?;
            let planner = RoutePlanner::new(client);
            let route = match planner.plan(start, end, profile).await.into_current() {
                Some(result) => result?,
                None => return Ok(()),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&route)?);
            } else {
                print_route(&route, profile);
            }
        }
        Command::Radar { watch } => {
            let client = RadarClient::new(config.radar_metadata_url.clone(), reqwest::Client::new());
            if watch {
                watch_radar(client, &config).await;
            } else {
                let feed = RadarFeed::from_result(client.fetch_frames().await);
                print_radar(&feed);
            }
        }
    }

    Ok(())
}

fn print_route(route: &Route, profile: Profile) {
    let summary = &route.summary;
    println!("{} route, {} points", profile.label(), route.geometry.len());
    println!("  distance  {}", format_distance(summary.distance_m));
    println!("  duration  {}", format_duration(summary.duration_s));
    println!("  ascent    {}", format_elevation(summary.ascent_m));
    println!("  descent   {}", format_elevation(summary.descent_m));

    let profile_data = summary.elevation_profile();
    if let (Some(min), Some(max)) = (profile_data.min_elevation, profile_data.max_elevation) {
        println!(
            "  elevation {} - {}",
            format_elevation(min),
            format_elevation(max)
        );
    }

    for (title, entries) in [
        ("surface", &summary.surface),
        ("way type", &summary.waytype),
        ("difficulty", &summary.trail_difficulty),
        ("steepness", &summary.steepness),
    ] {
        print_breakdown(title, entries);
    }
}

fn print_breakdown(title: &str, entries: &[BreakdownEntry]) {
    if entries.is_empty() {
        return;
    }
    println!("{title}:");
    for entry in entries {
        println!(
            "  {:<28} {:>9} {:>5.1}%",
            entry.label(),
            format_distance(entry.distance_m),
            entry.percentage
        );
    }
}

fn print_radar(feed: &RadarFeed) {
    match feed.current() {
        Some(frame) => {
            let when = DateTime::from_timestamp(frame.timestamp, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| frame.timestamp.to_string());
            println!("radar frame {when} ({} available)", feed.frames().len());
            println!("  {}", frame.tile_url());
        }
        None => {
            let reason = feed
                .last_error()
                .map(ToString::to_string)
                .unwrap_or_else(|| "no data yet".to_string());
            println!("radar unavailable: {reason}");
        }
    }
}

async fn watch_radar(client: RadarClient, config: &Config) {
    let poller = RadarPoller::spawn(client, config.radar_refresh);
    let mut updates = poller.subscribe();
    tracing::info!("polling radar every {:?}, Ctrl-C to stop", config.radar_refresh);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let feed = updates.borrow_and_update().clone();
                print_radar(&feed);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.stop().await;
}
