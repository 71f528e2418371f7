use std::{
    fs::read_to_string,
    io::{BufWriter, StdoutLock, Write, stdout},
    path::PathBuf,
};

use argh::FromArgValue;
use asdlgen::{DirSink, HoistedField, MemorySink, Options};

macro_rules! bail {
    ($($tt:tt)*) => {
        eprintln!($($tt)*);
        ::std::process::exit(1);
    };
}

fn main() {
    let args: Args = argh::from_env();
    init_tracing(args.verbose);

    let code = match read_to_string(&args.grammar) {
        Ok(code) => code,
        Err(err) => {
            bail!("failed to read `{}`: {err}", args.grammar.display());
        }
    };

    if args.check {
        check(&code);
        eprintln!("{}: ok", args.grammar.display());
        return;
    }

    let options = args.options();
    let written = match args.out.as_deref() {
        Some("-") => print_all(&code, &options),
        out => {
            let dir = PathBuf::from(out.unwrap_or("."));
            let mut sink = DirSink::new(&dir);
            let written = generate(&code, &options, &mut sink);
            tracing::info!(dir = %dir.display(), "done");
            written
        }
    };
    eprintln!("{}: generated {written} file(s)", args.grammar.display());
}

#[derive(argh::FromArgs)]
/// Generate Java AST node classes from an ASDL grammar.
struct Args {
    /// output directory, or `-` to print every file to stdout
    #[argh(option, short = 'o')]
    out: Option<String>,

    /// java package of the generated files
    #[argh(option)]
    package: Option<String>,

    /// fully-qualified base class of every node
    #[argh(option, long = "node-base")]
    node_base: Option<String>,

    /// class of the entries kept in `specialsBefore` / `specialsAfter`
    #[argh(option, long = "comment-type")]
    comment_type: Option<String>,

    /// declare `sum.field` on the sum's base class (repeatable, replaces the default `suite.body`)
    #[argh(option)]
    hoist: Vec<Hoist>,

    /// do not hoist any field
    #[argh(switch, long = "no-hoist")]
    no_hoist: bool,

    /// only validate the grammar
    #[argh(switch)]
    check: bool,

    /// log debug output
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// path to the `.asdl` grammar
    #[argh(positional)]
    grammar: PathBuf,
}

impl Args {
    fn options(&self) -> Options {
        let mut options = Options::default();
        if let Some(package) = &self.package {
            options.package.clone_from(package);
        }
        if let Some(node_base) = &self.node_base {
            options.node_base.clone_from(node_base);
        }
        if let Some(comment_type) = &self.comment_type {
            options.comment_type.clone_from(comment_type);
        }
        if self.no_hoist {
            options.hoisted.clear();
        } else if !self.hoist.is_empty() {
            options.hoisted = self.hoist.iter().map(|h| h.0.clone()).collect();
        }
        options
    }
}

struct Hoist(HoistedField);

impl FromArgValue for Hoist {
    fn from_arg_value(value: &str) -> Result<Self, String> {
        value.parse().map(Hoist).map_err(|err| format!("{err}"))
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn check(code: &str) {
    if let Err(err) = asdlgen::check_source(code) {
        bail!("{}", err.render(code));
    }
}

fn generate(code: &str, options: &Options, sink: &mut dyn asdlgen::ArtifactSink) -> usize {
    match asdlgen::generate_from_source(code, options, sink) {
        Ok(written) => written,
        Err(err) => {
            bail!("{}", err.render(code));
        }
    }
}

struct BufferedStdout<'a>(BufWriter<StdoutLock<'a>>);

impl BufferedStdout<'_> {
    fn with<R>(f: impl FnOnce(&mut Self) -> R) -> R {
        f(&mut Self(BufWriter::new(stdout().lock())))
    }
}

impl Write for BufferedStdout<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}

fn print_all(code: &str, options: &Options) -> usize {
    let mut sink = MemorySink::default();
    let written = generate(code, options, &mut sink);
    let result = BufferedStdout::with(|o| {
        for (name, contents) in &sink.artifacts {
            writeln!(o, "// ---- {name}.java")?;
            o.write_all(contents.as_bytes())?;
        }
        o.flush()
    });
    if let Err(err) = result {
        bail!("failed to write to stdout: {err}");
    }
    written
}
