mod args;
mod command;
mod render;

use std::path::Path;

use quiz_core::model::Phase;
use services::{Countdown, QuizService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{Parsed, print_usage};
use crate::command::{Command, HELP};

fn init_logging() {
    // Logs go to stderr so they never interleave with the quiz on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn show(svc: &QuizService) {
    let state = svc.state();
    match state.phase() {
        Phase::Loading => println!("No quiz loaded. Use: l <path>"),
        Phase::InProgress => {
            if let Some(view) = svc.question_view() {
                print!("{}", render::question(&view));
            }
        }
        Phase::Summary => print!("{}", render::summary(&svc.summary_items(), &state.summary())),
        Phase::Results => {
            if let Some(results) = svc.results() {
                print!("{}", render::results(&results));
            }
            println!("r to retry, l <path> to load another quiz, q to quit");
        }
    }
}

/// Print a countdown line at round numbers and during the last seconds.
fn show_tick(svc: &QuizService) {
    let state = svc.state();
    if state.is_current_answered() {
        println!("Time is up.");
        show(svc);
        return;
    }
    let remaining = state.time_remaining();
    if remaining % 10 == 0 || remaining <= 5 {
        println!("{}", render::timer_line(remaining, state.is_overdue()));
    }
}

async fn load(svc: &mut QuizService, countdown: &mut Countdown, path: &Path) {
    countdown.cancel();
    if let Err(err) = svc.load_path(path).await {
        println!("Could not load {}: {err}", path.display());
    }
}

fn apply(svc: &mut QuizService, command: Command) {
    match command {
        Command::Toggle(position) => {
            svc.toggle_option_at(position);
        }
        Command::Submit => {
            svc.submit();
        }
        Command::Advance(direction) => {
            svc.advance(direction);
        }
        Command::Jump(number) => {
            if let Some(index) = number.checked_sub(1) {
                svc.jump_to(index);
            }
        }
        Command::Summary => {
            svc.open_summary();
        }
        Command::Finish => {
            svc.finish();
        }
        Command::Reset => {
            svc.reset();
        }
        Command::Load(_) | Command::Show | Command::Help | Command::Quit => {}
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = args::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .inspect_err(|e| {
            eprintln!("{e}");
            print_usage();
        })?;
    let args = match parsed {
        Parsed::Run(args) => args,
        Parsed::Help => {
            print_usage();
            return Ok(());
        }
    };

    init_logging();
    info!(
        time_limit = args.settings.time_limit_secs(),
        policy = %args.settings.timer_policy(),
        navigation = %args.settings.navigation(),
        "starting quiz"
    );

    let mut svc = QuizService::new(args.settings);
    svc.load_path(&args.quiz_path).await?;

    let (mut countdown, mut ticks) = Countdown::every_second();
    countdown.sync(svc.state().timer_key());
    println!("{HELP}\n");
    show(&svc);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Load(path)) => load(&mut svc, &mut countdown, &path).await,
                    Ok(command) => apply(&mut svc, command),
                    Err(err) => println!("{err}"),
                }
                countdown.sync(svc.state().timer_key());
                show(&svc);
            }
            Some(key) = ticks.recv() => {
                let before = svc.state().time_remaining();
                svc.tick(key);
                countdown.sync(svc.state().timer_key());
                if svc.state().time_remaining() != before {
                    show_tick(&svc);
                }
            }
        }
    }

    countdown.cancel();
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
