use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rs_gaddag::*;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compiles word lists into GADDAGs and finds the words a rack of tiles can make.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Cli {
    /// Log progress to stderr. `RUST_LOG` overrides the level.
    #[clap(short, long, global = true)]
    verbose: bool,

    /// Disable all logging.
    #[clap(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a word list, with one word on each line, into a binary file.
    Build {
        /// The word list to read.
        #[clap(short, long)]
        input: PathBuf,
        /// Where to write the compiled structure.
        #[clap(short, long)]
        output: PathBuf,
        /// Store only the words themselves instead of every direction-switch pattern.
        #[clap(long)]
        dawg: bool,
        #[clap(flatten)]
        format: Format,
        /// Skip merging identical subtrees.
        #[clap(long)]
        no_minimize: bool,
    },
    /// Print the header and size of a compiled file.
    Info {
        file: PathBuf,
        #[clap(flatten)]
        format: Format,
    },
    /// List the words that can be formed from a rack such as `RETAINS` or `CAT?`.
    Anagram {
        file: PathBuf,
        rack: String,
        /// Also list words that use only some of the tiles.
        #[clap(long)]
        subset: bool,
        /// The file was built with `--dawg`.
        #[clap(long)]
        dawg: bool,
        #[clap(flatten)]
        format: Format,
    },
    /// Generate blank-tile anagram puzzles: random racks with only a few answers.
    Quiz {
        file: PathBuf,
        /// How many puzzles to generate.
        #[clap(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// Blanks on each rack.
        #[clap(short, long, default_value_t = 1)]
        blanks: usize,
        /// Tiles on each rack, blanks included.
        #[clap(short, long, default_value_t = 7)]
        size: usize,
        /// Discard racks with more answers than this.
        #[clap(short, long, default_value_t = 5)]
        max_answers: usize,
        /// Seed for the tile draws. Random if not given.
        #[clap(long)]
        seed: Option<u64>,
        #[clap(flatten)]
        format: Format,
    },
}

#[derive(Args, Debug)]
struct Format {
    /// The file's multi-byte fields are big-endian.
    #[clap(long)]
    big_endian: bool,
}

impl Format {
    fn endian(&self) -> Endian {
        if self.big_endian {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

fn main() -> anyhow::Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Build {
            input,
            output,
            dawg,
            format,
            no_minimize,
        } => {
            let options = BuildOptions {
                layout: if dawg { Layout::Dawg } else { Layout::Gaddag },
                endian: format.endian(),
                minimize: !no_minimize,
            };
            build(&input, &output, options)?
        }
        Command::Info { file, format } => print_info(&load(&file, format.endian())?),
        Command::Anagram {
            file,
            rack,
            subset,
            dawg,
            format,
        } => {
            let gaddag = load(&file, format.endian())?;
            let rack: Rack = rack
                .parse()
                .with_context(|| format!("invalid rack {:?}", rack))?;
            let mode = if subset {
                SearchMode::Subset
            } else {
                SearchMode::UseAll
            };
            let words = if dawg {
                find_words_forward(&gaddag, &rack, mode)
            } else {
                find_words(&gaddag, &rack, mode)
            };
            for word in &words {
                println!("{}", word);
            }
            info!(rack = %rack, found = words.len(), "search finished");
        }
        Command::Quiz {
            file,
            count,
            blanks,
            size,
            max_answers,
            seed,
            format,
        } => {
            if blanks > size || size > MAX_LETTERS {
                bail!(
                    "rack size {} must be between the {} blanks and {}",
                    size,
                    blanks,
                    MAX_LETTERS
                );
            }
            let gaddag = load(&file, format.endian())?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let options = PuzzleOptions {
                count,
                blanks,
                size,
                max_answers,
                ..PuzzleOptions::default()
            };
            let puzzles = blank_puzzles(&gaddag, &TileBag::standard(), &mut rng, options);
            for puzzle in &puzzles {
                let answers: Vec<String> =
                    puzzle.answers.iter().map(|word| word.to_string()).collect();
                println!("{}\t{}", puzzle.rack, answers.join(" "));
            }
            if puzzles.len() < count {
                eprintln!(
                    "Only found {} of {} puzzles in {} attempts.",
                    puzzles.len(),
                    count,
                    options.max_attempts
                );
            }
        }
    }

    info!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build(input: &Path, output: &Path, options: BuildOptions) -> anyhow::Result<()> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?,
    );
    let words = WordList::from_reader(reader)
        .with_context(|| format!("failed to read words from {}", input.display()))?;
    if words.skipped() > 0 {
        eprintln!("Skipped {} unsupported words.", words.skipped());
    }

    let mut builder = GaddagBuilder::new(options);
    builder.add_words(&words);
    let built = builder.build();

    let writer = BufWriter::new(
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?,
    );
    built
        .write_to(writer)
        .with_context(|| format!("failed to write {}", output.display()))?;

    let stats = built.stats;
    println!(
        "Compiled {} words into {} patterns: {} bytes with {}-byte pointers ({} of {} nodes merged).",
        stats.words,
        stats.patterns,
        stats.byte_size,
        stats.pointer_width,
        stats.merged_nodes,
        stats.trie_nodes
    );
    Ok(())
}

fn load(path: &Path, endian: Endian) -> anyhow::Result<Gaddag> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Gaddag::from_bytes_with_endian(bytes, endian)
        .with_context(|| format!("{} is not a valid compiled word list", path.display()))
}

fn print_info(gaddag: &Gaddag) {
    let header = gaddag.header();
    println!("version: {}", header.version);
    println!("fingerprint: {}", header.fingerprint_hex());
    println!("last letter: {}", decode_letter(header.last_letter));
    println!("bitset width: {}", header.bitset_width);
    println!("pointer width: {}", header.pointer_width);
    println!("body size: {} bytes", gaddag.len());
    println!("root children: {}", gaddag.num_children(gaddag.root()));
}
