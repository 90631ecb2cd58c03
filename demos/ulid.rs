//! Simple command that prints one or '-n count' ULID strings, or the embedded timestamp of each
//! ULID given as an argument, along with its date in UTC

use std::{env, io, io::Write, process::ExitCode};

use chrono::{DateTime, SecondsFormat, Utc};
use monoulid::Ulid;

enum Command {
    Generate(usize),
    Inspect(Vec<String>),
}

fn main() -> io::Result<ExitCode> {
    let mut args = env::args();
    let program = args.next();
    let command = match parse_args(args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!(
                "Usage: {0} [-n count]\n       {0} ULID...",
                program.as_deref().unwrap_or("ulid")
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut buf = io::BufWriter::new(io::stdout());
    match command {
        Command::Generate(count) => {
            for _ in 0..count {
                match monoulid::ulid() {
                    Ok(e) => writeln!(buf, "{}", e)?,
                    Err(err) => {
                        buf.flush()?;
                        eprintln!("Error: {}", err);
                        return Ok(ExitCode::FAILURE);
                    }
                }
            }
        }
        Command::Inspect(texts) => {
            for text in texts {
                match text.parse::<Ulid>() {
                    Ok(e) => writeln!(buf, "{}", describe(&e))?,
                    Err(err) => {
                        buf.flush()?;
                        eprintln!("Error: '{}': {}", text, err);
                        return Ok(ExitCode::FAILURE);
                    }
                }
            }
        }
    }

    buf.flush()?;
    Ok(ExitCode::SUCCESS)
}

/// Formats `ulid` with its timestamp in milliseconds and as a UTC date.
fn describe(ulid: &Ulid) -> String {
    let datetime = DateTime::<Utc>::from(ulid.datetime());
    format!(
        "{}\t{}\t{}",
        ulid,
        ulid.timestamp(),
        datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut count = None;
    let mut texts = Vec::new();
    while let Some(arg) = args.next() {
        if arg != "-n" {
            texts.push(arg);
            continue;
        }
        if count.is_some() {
            return Err("option 'n' given more than once".to_owned());
        }
        let Some(n_arg) = args.next() else {
            return Err("argument to option 'n' missing".to_owned());
        };
        let Ok(c) = n_arg.parse() else {
            return Err(format!("invalid argument to option 'n': '{}'", n_arg));
        };
        count.replace(c);
    }

    match (count, texts.is_empty()) {
        (_, true) => Ok(Command::Generate(count.unwrap_or(1))),
        (None, false) => Ok(Command::Inspect(texts)),
        (Some(_), false) => Err("option 'n' cannot be combined with ULID arguments".to_owned()),
    }
}
