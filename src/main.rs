use std::path::PathBuf;
use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::{error, info};

use csvdenorm::logging::init_logging;
use csvdenorm::{
    encoding_from_label, parse_forced_headers, Columns, FlushTarget, InputStream, ReaderSource,
    Result, RowStream, DEFAULT_COMPOUND_COLUMN, DEFAULT_ID_COLUMN,
};

fn cli() -> Command {
    Command::new("csvdenorm")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Abraham Toriz <awonderfulcode@gmail.com>")
        .about("Spreads a `key]timestamp|...` column into one timestamp column per key")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("Input files. More than one are read in order and must share headers")
                .num_args(1..)
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT")
                .help("Output filename. Writes to stdout when missing")
                .env("CSVDENORM_OUTPUT")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("id-column")
                .long("id-column")
                .value_name("NAME")
                .help("Column holding the row identifier")
                .env("CSVDENORM_ID_COLUMN")
                .default_value(DEFAULT_ID_COLUMN),
        )
        .arg(
            Arg::new("compound-column")
                .long("compound-column")
                .value_name("NAME")
                .help("Column holding the key]timestamp|... field")
                .env("CSVDENORM_COMPOUND_COLUMN")
                .default_value(DEFAULT_COMPOUND_COLUMN),
        )
        .arg(
            Arg::new("header")
                .long("header")
                .value_name("LIST")
                .help(
                    "Forces the output headers and their order. Either a JSON array of \
                     strings or a comma separated list. Must contain exactly the headers \
                     found on the data, identifier column included",
                )
                .env("CSVDENORM_HEADER"),
        )
        .arg(
            Arg::new("encoding")
                .long("encoding")
                .value_name("LABEL")
                .help("Encoding of the input files")
                .default_value("utf-8"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More logging, repeat for even more")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

fn string_arg<'a>(matches: &'a ArgMatches, name: &str, default: &'a str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or(default)
}

fn run(matches: &ArgMatches) -> Result<()> {
    let encoding = encoding_from_label(string_arg(matches, "encoding", "utf-8"))?;
    let columns = Columns::new(
        string_arg(matches, "id-column", DEFAULT_ID_COLUMN),
        string_arg(matches, "compound-column", DEFAULT_COMPOUND_COLUMN),
    );
    let forced = parse_forced_headers(string_arg(matches, "header", ""))?;

    let sources = matches
        .get_many::<PathBuf>("input")
        .into_iter()
        .flatten()
        .map(|path| ReaderSource::from_path(path, encoding))
        .collect::<Result<Vec<_>>>()?;

    info!(inputs = sources.len(), "reading");

    // Step 1. Parse every row and find the headers
    let scan = InputStream::from_sources(sources)?.denormalize(&columns)?;

    // Step 2. Lay every row against the final headers
    let table = scan.project(forced.as_deref())?;

    // Step 3. Only now that everything succeeded, write
    let target = match matches.get_one::<PathBuf>("output") {
        Some(path) => FlushTarget::Path(path.clone()),
        None => FlushTarget::Stdout,
    };

    table.flush(&target)?;

    info!(
        rows = table.rows().len(),
        columns = table.headers().len(),
        "done"
    );

    Ok(())
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = init_logging(
        matches.get_count("verbose"),
        matches.get_flag("quiet"),
    ) {
        eprintln!("error: failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&matches) {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
