use opentimeline::cli::Args;
use opentimeline::entities::Composable;
use opentimeline::{Arena, Loaded, NodeId, Timeline};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{debug, info};

fn init_logging(args: &Args) -> Result<()> {
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let default_level = match args.verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    builder.format_timestamp_millis();

    if let Some(path) = &args.log_file {
        let file = std::fs::File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn print_summary(arena: &Arena, timeline: &Timeline) -> Result<()> {
    println!("Timeline: {}", timeline.name);
    if let Some(start) = timeline.global_start_time {
        println!("Start:    {start}");
    }
    println!("Duration: {}", timeline.duration(arena)?);
    for (index, track) in arena.children(timeline.tracks())?.iter().enumerate() {
        let kind = arena.get(*track)?;
        let label = arena.track(*track).map_or(kind.schema_name().to_string(), |t| t.kind.to_string());
        println!(
            "  [{index}] {label:<6} {:<20} {:>3} children  {}",
            kind.name(),
            kind.children().len(),
            arena.duration(*track)?
        );
    }
    Ok(())
}

fn print_ranges(arena: &Arena, timeline: &Timeline) -> Result<()> {
    for clip in timeline.clips(arena)? {
        let name = arena.get(clip)?.name().to_string();
        match timeline.range_of_child(arena, clip) {
            Ok(range) => println!("  {name:<24} {range}"),
            Err(e) => println!("  {name:<24} <{e}>"),
        }
    }
    Ok(())
}

/// Write, re-read and compare.
fn check_round_trip(arena: &Arena, timeline: &Timeline, args: &Args) -> Result<()> {
    let text = arena.timeline_to_json_string(timeline, &args.write_options())?;
    let mut reread = Arena::new();
    let Loaded::Timeline(again) = reread.from_json_str(&text, &args.read_options())? else {
        bail!("re-read document is not a timeline");
    };
    if !arena.timelines_equivalent(timeline, &reread, &again)? {
        bail!("round trip changed the document");
    }
    println!("Round trip: ok ({} nodes)", reread.len());
    Ok(())
}

fn dump_node(arena: &Arena, id: NodeId, args: &Args) -> Result<()> {
    println!("{}", arena.to_json_string(id, &args.write_options())?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    debug!("Command-line args: {:?}", args);

    let text = std::fs::read_to_string(&args.file_path)
        .with_context(|| format!("reading {}", args.file_path.display()))?;
    let mut arena = Arena::new();
    let loaded = arena
        .from_json_str(&text, &args.read_options())
        .with_context(|| format!("loading {}", args.file_path.display()))?;
    info!("Loaded {} nodes from {}", arena.len(), args.file_path.display());

    match loaded {
        Loaded::Timeline(timeline) => {
            if args.dump {
                println!("{}", arena.timeline_to_json_string(&timeline, &args.write_options())?);
                return Ok(());
            }
            print_summary(&arena, &timeline)?;
            if args.ranges {
                print_ranges(&arena, &timeline)?;
            }
            if args.check {
                check_round_trip(&arena, &timeline, &args)?;
            }
        }
        Loaded::Node(id) => {
            if args.dump {
                return dump_node(&arena, id, &args);
            }
            let kind = arena.get(id)?;
            println!("{}: {} ({})", kind.schema_name(), kind.name(), arena.duration(id)?);
        }
        Loaded::Object(obj) => {
            println!("{}: {}", obj.schema(), obj.name());
        }
    }
    Ok(())
}
