#[macro_use]
extern crate clap;

use clap::Arg;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use vasm::SourceMapItem;

#[derive(Debug)]
enum IOErrorContext {
    ReadInput,
    WriteOutput,
}

#[derive(Debug)]
enum Error {
    Vasm(vasm::Error),
    Io(std::io::Error, IOErrorContext, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => writeln!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadInput => "Reading input",
                    IOErrorContext::WriteOutput => "Writing output",
                },
                path.display(),
                err
            ),
            Error::Vasm(err) => {
                writeln!(f, "Assembling input failed:")?;
                write!(f, "{}", err)
            }
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the input file to use")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Sets the output file to write to"),
        )
        .arg(
            Arg::with_name("source_map")
                .short("m")
                .long("source-map")
                .takes_value(true)
                .value_name("SOURCE_MAP")
                .help("Sets the file to write the source map to"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Traces every lexeme as it is compiled"),
        )
        .get_matches();

    let verbose = matches.is_present("verbose");
    init_logging(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("output");
    let map = matches.value_of("source_map");

    if let Err(err) = vasm(input, output, map) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn vasm(input: &str, output: Option<&str>, map: Option<&str>) -> Result<(), Error> {
    let input_path = Path::new(input);

    let input_file = File::open(input_path)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, input_path.to_owned()))?;
    let mut buf_reader = BufReader::new(input_file);
    let mut source = String::new();

    buf_reader
        .read_to_string(&mut source)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, input_path.to_owned()))?;

    let (code, source_map) = vasm::assemble_traced(&source).map_err(Error::Vasm)?;

    let output_path: PathBuf = output
        .map(PathBuf::from)
        .unwrap_or_else(|| input_path.with_extension("vex"));

    vexfile::write_file(&output_path, &code)
        .map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, output_path))?;

    if let Some(map_path_str) = map {
        let map_path = PathBuf::from(map_path_str);
        write_source_map(&source_map[..], &map_path)
            .map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, map_path))?;
    }

    log::info!("assembled {} code word(s)", code.len());
    Ok(())
}

fn write_source_map(source_map: &[SourceMapItem], path: &PathBuf) -> std::io::Result<()> {
    use byteorder::WriteBytesExt;
    use std::io::BufWriter;
    use util::Endian;

    let mut writer = BufWriter::new(File::create(path)?);
    for item in source_map.iter() {
        writer.write_u32::<Endian>(item.start_line)?;
        writer.write_u32::<Endian>(item.line_count)?;
    }
    Ok(())
}

/// Initializes logging with a plain `[level] message` console pattern.
fn init_logging(level: LevelFilter) {
    let encoder = PatternEncoder::new("[{l}] {m}{n}");

    let stdout = ConsoleAppender::builder().encoder(Box::new(encoder)).build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .unwrap();

    let _handle = log4rs::init_config(config).unwrap();
}
