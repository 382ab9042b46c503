//! Demo entry point: a line-oriented REPL over the list core, plus a
//! `--demo` mode that spins up the multi-client blocking-pop harness.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::Parser;

use listd::cli::args::Cli;
use listd::cli::repl::Repl;
use listd::demo_engine::{Command, Engine};
use listd::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::set_display_level(cli.resolved_display_level());

    if cli.demo {
        return run_demo(&cli);
    }

    let mut repl = Repl::new(cli.list_config());
    if let Some(line) = &cli.command {
        println!("{}", repl.eval(line));
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(stdout, "{}", repl.eval(&line))?;
        stdout.flush()?;
    }
    Ok(())
}

/// Two simulated clients block on BLPOP against an empty key; a third pushes
/// to it after a short delay, demonstrating FIFO wakeup order.
fn run_demo(cli: &Cli) -> anyhow::Result<()> {
    let engine = Engine::spawn(cli.list_config());
    listd::displaylevel!(2, "running blocking-pop demo: two clients BLPOP an empty key, a third RPUSHes");

    std::thread::scope(|scope| {
        let eng = &engine;
        let first = scope.spawn(move || eng.submit(1, Command::BLPop(vec![b"queue".to_vec()], Some(Duration::from_secs(2)))));
        let second = scope.spawn(move || eng.submit(2, Command::BLPop(vec![b"queue".to_vec()], Some(Duration::from_secs(2)))));
        std::thread::sleep(Duration::from_millis(100));
        let reply = engine.submit(3, Command::RPush(b"queue".to_vec(), vec![b"first".to_vec(), b"second".to_vec()]));
        println!("client 3: RPUSH queue first second -> {reply}");
        println!("client 1: BLPOP queue 2 -> {}", first.join().unwrap());
        println!("client 2: BLPOP queue 2 -> {}", second.join().unwrap());
    });

    engine.shutdown();
    Ok(())
}
