//! Tiltguard CLI
//!
//! Usage:
//!   tiltguard --pitch 115                 # Classify one pitch angle
//!   tiltguard --quat "0.7,0,0,0.7"        # Classify one attitude quaternion
//!   tiltguard --simulate                  # Scripted session through the whole guide
//!   tiltguard --interactive               # Feed samples from stdin
//!   tiltguard --simulate --json           # JSON output

use std::io::{self, BufRead};

use clap::Parser;
use colored::Colorize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use tiltguard::config::TiltConfig;
use tiltguard::core::{
    sleep_until, ChannelSampler, GuideFlow, SampleSender, ScriptedSampler, TiltClassifier,
    TiltSubscription, TiltTracker,
};
use tiltguard::types::{FlowPhase, OrientationSample, TiltError, ZoneEvent};
use tiltguard::VERSION;

/// Pitch profile for `--simulate`: low, high, then settle in band
const SIMULATED_PROFILE: &[f64] = &[
    35.0, 55.0, 75.0, 118.0, 125.0, 104.0, 92.0, 90.0, 88.0, 90.0,
];

#[derive(Parser, Debug)]
#[command(
    name = "tiltguard",
    version = VERSION,
    about = "Tiltguard - guide a phone into the target pitch band",
    long_about = "Tiltguard classifies device attitude into tilt zones and runs the\n\
                  positioning guide that precedes the eye test.\n\n\
                  Zones:\n  \
                  TOO_LOW   - pitch below 70°\n  \
                  IN_RANGE  - pitch within [70°, 110°]\n  \
                  TOO_HIGH  - pitch above 110°\n\n\
                  Every out-of-band sample arms a 3 s hold timer; when it expires\n\
                  without a re-arm the device counts as settled.\n\n\
                  Interactive commands:\n  \
                  <deg>      pitch sample        x,y,z,w   quaternion sample\n  \
                  face       face in view        noface    face lost\n  \
                  start      press START TEST    fail      simulate sensor failure\n  \
                  quit"
)]
struct Args {
    /// Classify a single pitch angle (degrees)
    #[arg(short, long, allow_negative_numbers = true)]
    pitch: Option<f64>,

    /// Classify a single quaternion "x,y,z,w"
    #[arg(short, long)]
    quat: Option<OrientationSample>,

    /// Run a scripted session through the guide
    #[arg(short, long)]
    simulate: bool,

    /// Scripted runs: report a face once face detection starts, then press START TEST
    #[arg(long)]
    face: bool,

    /// Interactive mode - read samples and commands from stdin
    #[arg(short, long)]
    interactive: bool,

    /// JSON config file overriding thresholds and timings
    #[arg(short, long)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

/// Line typed in interactive mode
#[derive(Debug)]
enum Command {
    Face(bool),
    Start,
    Quit,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match args.config.as_deref() {
        Some(path) => match TiltConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(2);
            }
        },
        None => TiltConfig::default(),
    };

    if let Some(pitch) = args.pitch {
        run_single(&OrientationSample::from_pitch_degrees(pitch), &config, &args);
    } else if let Some(quat) = args.quat {
        run_single(&quat, &config, &args);
    } else if args.interactive {
        run_interactive(config, &args).await;
    } else {
        // Default to the scripted session
        run_simulate(config, &args).await;
    }
}

/// Classify one sample without a session
fn run_single(sample: &OrientationSample, config: &TiltConfig, args: &Args) {
    if !sample.is_finite() {
        eprintln!("sample has non-finite components: {:?}", sample);
        std::process::exit(1);
    }
    let mut classifier = TiltClassifier::new(config);
    match classifier.update(&sample.normalized(), Instant::now()) {
        Some(event) => print_event(&event, args),
        None => {
            eprintln!("sample has no finite pitch: {:?}", sample);
            std::process::exit(1);
        }
    }
}

/// Scripted session (Simulate mode)
async fn run_simulate(config: TiltConfig, args: &Args) {
    print_header("Simulate", args);
    let mut tracker = TiltTracker::new(config.clone());
    let subscription = match tracker.start(ScriptedSampler::from_pitches(SIMULATED_PROFILE)) {
        Ok(sub) => sub,
        Err(e) => fail(&e),
    };
    let (_tx, rx) = mpsc::unbounded_channel();
    drive(&mut tracker, subscription, GuideFlow::new(&config), rx, true, args).await;
}

/// Interactive session fed from stdin
async fn run_interactive(config: TiltConfig, args: &Args) {
    print_header("Interactive", args);
    println!("Enter a pitch in degrees or a quaternion x,y,z,w. Type 'quit' to exit.");
    println!();

    let (sampler, samples) = ChannelSampler::new();
    let mut tracker = TiltTracker::new(config.clone());
    let subscription = match tracker.start(sampler) {
        Ok(sub) => sub,
        Err(e) => fail(&e),
    };

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || read_stdin(samples, cmd_tx));

    drive(&mut tracker, subscription, GuideFlow::new(&config), cmd_rx, false, args).await;
}

/// Blocking stdin reader; runs on its own thread
fn read_stdin(samples: SampleSender, commands: mpsc::UnboundedSender<Command>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let delivered = match line.to_ascii_lowercase().as_str() {
            "quit" | "exit" => {
                let _ = commands.send(Command::Quit);
                return;
            }
            "face" => commands.send(Command::Face(true)).is_ok(),
            "noface" => commands.send(Command::Face(false)).is_ok(),
            "start" => commands.send(Command::Start).is_ok(),
            "fail" => samples.fail(TiltError::MotionDataMissing),
            _ => {
                let sample = match line.parse::<f64>() {
                    Ok(deg) => Some(OrientationSample::from_pitch_degrees(deg)),
                    Err(_) => line.parse::<OrientationSample>().ok().map(|q| q.normalized()),
                };
                match sample {
                    Some(sample) if sample.is_finite() => samples.send(sample),
                    _ => {
                        eprintln!("⚠ not a pitch, quaternion or command: {}", line);
                        true
                    }
                }
            }
        };
        if !delivered {
            break;
        }
    }
    let _ = commands.send(Command::Quit);
}

/// Pump events into the guide flow until the test starts, the session ends, or the user quits
async fn drive(
    tracker: &mut TiltTracker,
    mut subscription: TiltSubscription,
    mut flow: GuideFlow,
    mut commands: mpsc::UnboundedReceiver<Command>,
    scripted: bool,
    args: &Args,
) {
    loop {
        tokio::select! {
            event = subscription.next_event() => match event {
                Some(event) => {
                    flow.on_event(&event, Instant::now());
                    print_event(&event, args);
                    print_prompt(&flow, args);
                }
                None => {
                    if let Ok(err) = subscription.failure.try_recv() {
                        flow.on_failure(&err);
                        eprintln!("{} {} ({:?})", "✗ tracking failed:".red(), err, flow.issue());
                    }
                    break;
                }
            },

            _ = sleep_until(flow.next_deadline()) => {
                if let Some(phase) = flow.poll(Instant::now()) {
                    print_phase(phase, args);
                    if phase == FlowPhase::StartTest {
                        break;
                    }
                    if phase == FlowPhase::FaceDetection && scripted {
                        // No camera in a scripted run: either pretend a face showed up or stop here
                        if !args.face {
                            break;
                        }
                        flow.on_face(true);
                        if let Err(e) = flow.request_test(Instant::now()) {
                            eprintln!("{}", e);
                        }
                    }
                    print_prompt(&flow, args);
                }
            },

            command = commands.recv() => match command {
                Some(Command::Face(present)) => {
                    flow.on_face(present);
                    print_prompt(&flow, args);
                }
                Some(Command::Start) => match flow.request_test(Instant::now()) {
                    Ok(()) => println!("START TEST pressed"),
                    Err(e) => println!("{} {}", "⚠".yellow(), e),
                },
                Some(Command::Quit) | None => break,
            },
        }
    }

    if let Err(e) = tracker.stop().await {
        fail(&e);
    }
}

fn fail(err: &TiltError) -> ! {
    eprintln!("{} {}", "✗".red(), err);
    std::process::exit(1);
}

fn print_header(mode: &str, args: &Args) {
    if args.json {
        return;
    }
    println!("========================================");
    println!("  {}", format!("Tiltguard v{} - {}", VERSION, mode).bold());
    println!("========================================");
    println!();
}

fn print_event(event: &ZoneEvent, args: &Args) {
    if args.json {
        println!("{}", serde_json::to_string(event).unwrap_or_default());
    } else if args.no_color {
        println!("{}", event.to_parseable_string());
    } else {
        println!("{}", event.to_terminal_string());
    }
}

fn print_prompt(flow: &GuideFlow, args: &Args) {
    if args.json {
        return;
    }
    let prompt = flow.prompt();
    println!("  └─ {}", prompt.title.dimmed());
    if !prompt.subtitle.is_empty() {
        println!("     {}", prompt.subtitle.dimmed());
    }
}

fn print_phase(phase: FlowPhase, args: &Args) {
    if args.json {
        println!("{}", serde_json::json!({ "phase": phase }));
    } else {
        println!("{}", format!("▶ phase: {}", phase).cyan().bold());
    }
}
