//! Simple command that prints one or '-n count' identifier strings

use std::{env, io, io::Write, process::ExitCode};

use flexuuid::{V7Generator, V7Settings};

fn main() -> io::Result<ExitCode> {
    let opts = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(opts) => opts,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count] [-s subsecond_bits] [-c counter_bits]",
                    program.as_deref().unwrap_or("flexuuid")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let settings = V7Settings::builder()
        .subsecond_precision_bits(opts.subsecond_bits)
        .counter_precision_bits(opts.counter_bits)
        .build();
    let mut g = match V7Generator::new(settings) {
        Ok(g) => g,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..opts.count {
        writeln!(buf, "{}", g.generate())?;
    }

    Ok(ExitCode::SUCCESS)
}

struct Opts {
    count: usize,
    subsecond_bits: u8,
    counter_bits: u8,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Opts, String> {
    let mut count: Option<usize> = None;
    let mut subsecond_bits: Option<u8> = None;
    let mut counter_bits: Option<u8> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-n" => parse_value(&mut count, "n", args.next())?,
            "-s" => parse_value(&mut subsecond_bits, "s", args.next())?,
            "-c" => parse_value(&mut counter_bits, "c", args.next())?,
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        }
    }
    Ok(Opts {
        count: count.unwrap_or(1),
        subsecond_bits: subsecond_bits.unwrap_or(12),
        counter_bits: counter_bits.unwrap_or(8),
    })
}

fn parse_value<T: std::str::FromStr>(
    slot: &mut Option<T>,
    name: &str,
    arg: Option<String>,
) -> Result<(), String> {
    if slot.is_some() {
        return Err(format!("option '{}' given more than once", name));
    }
    let Some(arg) = arg else {
        return Err(format!("argument to option '{}' missing", name));
    };
    let Ok(value) = arg.parse() else {
        return Err(format!("invalid argument to option '{}': '{}'", name, arg));
    };
    slot.replace(value);
    Ok(())
}
