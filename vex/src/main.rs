#[macro_use]
extern crate clap;

use clap::Arg;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vcpu::{run, Cpu, Fault, RunOptions};

#[derive(Debug)]
enum Error {
    Io(std::io::Error, PathBuf),
    BadData(String),
    Fault(Fault),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, path) => {
                write!(f, "reading image \"{}\" failed: {}", path.display(), err)
            }
            Error::BadData(text) => write!(f, "could not parse data value '{}'", text),
            Error::Fault(fault) => write!(f, "runtime fault: {:?}", fault),
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("IMAGE")
                .help("Sets the assembled .vex image to run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("DATA")
                .help("Decimal values to pre-load into the data region, starting at address 0")
                .multiple(true)
                .index(2),
        )
        .arg(
            Arg::with_name("pause_ms")
                .long("pause-ms")
                .takes_value(true)
                .value_name("MS")
                .help("Sleeps this many milliseconds between ticks"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Logs a state dump after every tick"),
        )
        .arg(
            Arg::with_name("step")
                .long("step")
                .help("Waits for a newline on stdin before every tick"),
        )
        .get_matches();

    let image = matches.value_of("IMAGE").unwrap();
    let data_args: Vec<&str> = matches
        .values_of("DATA")
        .map(|v| v.collect())
        .unwrap_or_default();
    let pause_ms = value_t!(matches, "pause_ms", u64).ok();
    let verbose = matches.is_present("verbose");
    let step = matches.is_present("step");

    init_logging(if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    });

    if let Err(err) = vex(image, &data_args, pause_ms, verbose, step) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn vex(
    image: &str,
    data_args: &[&str],
    pause_ms: Option<u64>,
    verbose: bool,
    step: bool,
) -> Result<(), Error> {
    let image_path = Path::new(image);
    let program =
        vexfile::read_file(image_path).map_err(|err| Error::Io(err, image_path.to_owned()))?;

    let data = data_args
        .iter()
        .map(|text| {
            text.parse::<u16>()
                .map_err(|_| Error::BadData(text.to_string()))
        })
        .collect::<Result<Vec<u16>, Error>>()?;

    let mut cpu = Cpu::new(&program, &data);

    let stdin = std::io::stdin();
    let mut wait_for_line = || {
        let mut line = String::new();
        let _ = stdin.lock().read_line(&mut line);
    };

    let mut opts = RunOptions {
        pause: pause_ms.map(Duration::from_millis),
        verbose,
        step: None,
    };
    if step {
        opts.step = Some(&mut wait_for_line);
    }

    run(&mut cpu, opts).map_err(Error::Fault)
}

/// Initializes logging with a plain `[level] message` console pattern.
fn init_logging(level: LevelFilter) {
    let encoder = PatternEncoder::new("[{l}] {m}{n}");

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(encoder))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .unwrap();

    let _handle = log4rs::init_config(config).unwrap();
}
