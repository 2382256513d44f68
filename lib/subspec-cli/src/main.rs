#![allow(missing_docs)]
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{Level, info, warn};
use url::Url;

use subspec_core::{
    DEFAULT_CONVERTER_URL, Document, OutputFormat, SpecGenerator, SwaggerConverter, emit,
};

const DEFAULT_INPUT: &str = "openshift-openapi.json";

const HELP: &str = "\
Extract the deployments API from an OpenShift Swagger 2.0 document as OpenAPI 3.1

USAGE:
  subspec [OPTIONS] [FORMAT]

ARGS:
  <FORMAT>                   Output format, `yaml` (default) or `json`

OPTIONS:
  -i, --input <PATH>         Source Swagger document [default: openshift-openapi.json]
  -c, --converter-url <URL>  Conversion endpoint [default: https://converter.swagger.io/api/convert]
  -v, --verbose              Log debug information on stderr
  -h, --help                 Print help
";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let Some(args) = AppArgs::parse().context("parsing arguments")? else {
        io::Write::write_all(&mut io::stdout(), HELP.as_bytes())?;
        return Ok(());
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .init();
    if !args.remaining.is_empty() {
        warn!(remaining = ?args.remaining, "Warning: unused arguments left");
    }

    let AppArgs {
        format,
        input,
        converter_url,
        ..
    } = args;

    let source = Document::load(&input)
        .with_context(|| format!("loading source document {}", input.display()))?;
    let generator = SpecGenerator::new(SwaggerConverter::new(converter_url));
    let document = generator
        .generate(&source)
        .await
        .context("generating the OpenAPI subset")?;

    let mut stdout = io::stdout().lock();
    emit(&document, format, &mut stdout).context("writing the document")?;

    info!(%format, "done");
    Ok(())
}

#[derive(Debug)]
struct AppArgs {
    format: OutputFormat,
    input: PathBuf,
    converter_url: Url,
    verbose: bool,
    remaining: Vec<std::ffi::OsString>,
}

impl AppArgs {
    /// Returns `None` when help was requested.
    fn parse() -> Result<Option<Self>> {
        Self::from_args(pico_args::Arguments::from_env())
    }

    fn from_args(mut pargs: pico_args::Arguments) -> Result<Option<Self>> {
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let verbose = pargs.contains(["-v", "--verbose"]);

        let input = pargs
            .opt_value_from_str(["-i", "--input"])
            .context("parsing input argument")?;

        let converter_url = pargs
            .opt_value_from_str(["-c", "--converter-url"])
            .context("parsing converter URL argument")?;
        let converter_url = match converter_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_CONVERTER_URL).context("parsing default converter URL")?,
        };

        let format = pargs
            .opt_free_from_str()
            .context("parsing output format")?;

        let result = Self {
            format: format.unwrap_or_default(),
            input: input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            converter_url,
            verbose,
            remaining: pargs.finish(),
        };
        Ok(Some(result))
    }
}
