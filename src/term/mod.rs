extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::lang::Source;
use crate::mach::{Config, Runtime, Status, TurtleEvent};
use ansi_term::{Colour, Style};
use clap::{Parser, Subcommand};
use linefeed::{Interface, ReadResult};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "templecode", version)]
#[command(about = "Run TempleCode programs: BASIC, PILOT and Logo in one file")]
struct Args {
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Run a program file
    Run {
        file: PathBuf,

        /// Pause at breakpoints
        #[arg(long)]
        debug: bool,

        /// Breakpoint lines, used with --debug
        #[arg(long = "break", value_delimiter = ',')]
        breakpoints: Vec<usize>,

        /// Instructions executed before the run stops
        #[arg(long)]
        max_steps: Option<u64>,

        /// Print turtle drawing events
        #[arg(long)]
        turtle: bool,

        /// Seed for RND
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Type lines and run each one immediately
    Repl,
    /// Report every line that fails to parse
    Check { file: PathBuf },
}

/// Returns the process exit code.
pub fn main() -> i32 {
    let args = Args::parse();
    let result = match args.mode {
        Some(Mode::Run {
            file,
            debug,
            breakpoints,
            max_steps,
            turtle,
            seed,
        }) => {
            let mut config = Config {
                real_time: true,
                seed,
                ..Config::default()
            };
            if let Some(max_steps) = max_steps {
                config.max_steps = max_steps;
            }
            run(&file, config, debug, breakpoints, turtle)
        }
        Some(Mode::Check { file }) => check(&file),
        Some(Mode::Repl) | None => repl(),
    };
    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", Colour::Red.bold().paint(error.to_string()));
            2
        }
    }
}

fn run(
    file: &PathBuf,
    config: Config,
    debug: bool,
    breakpoints: Vec<usize>,
    turtle: bool,
) -> std::io::Result<i32> {
    let text = std::fs::read_to_string(file)?;
    let mut runtime = Runtime::new(config);
    watch_interrupt(runtime.cancel_handle());
    runtime.on_output(|line| println!("{}", paint(line)));
    if turtle {
        runtime.on_turtle_event(|event| {
            println!("{}", Style::new().dimmed().paint(describe(event)));
        });
    }
    let input = Interface::new("input")?;
    runtime.set_input_provider(Box::new(move |prompt: &str| -> Option<String> {
        input.set_prompt(prompt).ok()?;
        match input.read_line() {
            Ok(ReadResult::Input(line)) => Some(line),
            _ => None,
        }
    }));
    runtime.set_debug_mode(debug);
    runtime.set_breakpoints(breakpoints);

    let mut result = runtime.execute(&text);
    if let Status::Paused { .. } = result.status {
        let console = Interface::new("debug")?;
        while let Status::Paused { line } = result.status {
            console.set_prompt(&format!("BREAK IN {} (Enter continues) ", line))?;
            match console.read_line()? {
                ReadResult::Input(_) => result = runtime.resume(),
                ReadResult::Signal(_) | ReadResult::Eof => return Ok(1),
            }
        }
    }
    Ok(if result.status == Status::Errored { 1 } else { 0 })
}

fn check(file: &PathBuf) -> std::io::Result<i32> {
    let text = std::fs::read_to_string(file)?;
    let errors = Source::load(&text).errors();
    for error in errors.iter() {
        println!("{}", Colour::Red.bold().paint(format!("?{}", error)));
    }
    Ok(if errors.is_empty() { 0 } else { 1 })
}

fn repl() -> std::io::Result<i32> {
    let mut runtime = Runtime::new(Config {
        real_time: true,
        ..Config::default()
    });
    watch_interrupt(runtime.cancel_handle());
    runtime.on_output(|line| println!("{}", paint(line)));
    let input = Interface::new("input")?;
    runtime.set_input_provider(Box::new(move |prompt: &str| -> Option<String> {
        input.set_prompt(if prompt.is_empty() { "? " } else { prompt }).ok()?;
        match input.read_line() {
            Ok(ReadResult::Input(line)) => Some(line),
            _ => None,
        }
    }));

    let command = Interface::new("TempleCode")?;
    command.set_prompt("> ")?;
    println!("TempleCode");
    println!("READY.");
    loop {
        let line = match command.read_line()? {
            ReadResult::Input(line) => line,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        runtime.execute_line(&line);
        command.add_history_unique(line);
    }
    Ok(0)
}

/// Ctrl-C stops the running program, not the host.
fn watch_interrupt(cancel: Arc<AtomicBool>) {
    let result = ctrlc::set_handler(move || {
        cancel.store(true, Ordering::SeqCst);
    });
    if let Err(error) = result {
        eprintln!("{}", Style::new().dimmed().paint(error.to_string()));
    }
}

fn paint(line: &str) -> String {
    if line.starts_with('?') {
        Colour::Red.bold().paint(line).to_string()
    } else if line.starts_with("TRACE:") || line.starts_with("FILL:") {
        Style::new().dimmed().paint(line).to_string()
    } else {
        line.to_string()
    }
}

fn point((x, y): (f64, f64)) -> String {
    format!("({:.1}, {:.1})", x, y)
}

fn describe(event: &TurtleEvent) -> String {
    match event {
        TurtleEvent::Line {
            from,
            to,
            color,
            width,
        } => format!("line {} {} {} {}", point(*from), point(*to), color, width),
        TurtleEvent::Circle {
            center,
            radius,
            color,
            ..
        } => format!("circle {} r={} {}", point(*center), radius, color),
        TurtleEvent::Arc {
            center,
            radius,
            start,
            extent,
            color,
            ..
        } => format!(
            "arc {} r={} from {} by {} {}",
            point(*center),
            radius,
            start,
            extent,
            color
        ),
        TurtleEvent::Dot { at, radius, color } => {
            format!("dot {} r={} {}", point(*at), radius, color)
        }
        TurtleEvent::Rect {
            corner,
            width,
            height,
            color,
            ..
        } => format!("rect {} {}x{} {}", point(*corner), width, height, color),
        TurtleEvent::Label {
            at, text, size, ..
        } => format!("label {} {:?} size {}", point(*at), text, size),
        TurtleEvent::Pose {
            x,
            y,
            heading,
            visible,
        } => format!(
            "turtle {} heading {:.1}{}",
            point((*x, *y)),
            heading,
            if *visible { "" } else { " hidden" }
        ),
        TurtleEvent::Background(color) => format!("background {}", color),
        TurtleEvent::Clear => "clear".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_line() {
        let event = TurtleEvent::Line {
            from: (0.0, 0.0),
            to: (0.0, 10.0),
            color: "black".into(),
            width: 1.0,
        };
        assert_eq!(describe(&event), "line (0.0, 0.0) (0.0, 10.0) black 1");
    }

    #[test]
    fn test_paint_leaves_plain_lines() {
        assert_eq!(paint("HELLO"), "HELLO");
        assert!(paint("?SYNTAX ERROR").contains("SYNTAX ERROR"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(vec!["templecode", "run", "x.tc", "--debug", "--break", "3,5"]);
        match args.map(|a| a.mode) {
            Ok(Some(Mode::Run {
                debug, breakpoints, ..
            })) => {
                assert!(debug);
                assert_eq!(breakpoints, vec![3, 5]);
            }
            _ => panic!("run args"),
        }
    }
}
