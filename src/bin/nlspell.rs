extern crate clap;

use std::io::{self, BufRead};

use clap::{App, Arg};

use nlspell::driver::CorrectionParams;
use nlspell::error_model::ErrorModel;
use nlspell::language_model::LanguageModel;
use nlspell::trie::Trie;
use nlspell::{SpellResult, Spellchecker};

fn main() -> SpellResult<()> {
    let args = App::new("nlspell")
        .version("0.1")
        .about("Bilingual noisy-channel query spelling corrector")
        .arg(
            Arg::with_name("corpus")
                .long("corpus")
                .short("f")
                .help("Tab-separated query/correction corpus; trains the language model, and the error model too unless --errors is given")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("errors")
                .long("errors")
                .short("e")
                .help("Tab-separated (misspelling, correction) corpus for the error model, if kept separate from --corpus")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("iterations")
                .long("iterations")
                .short("i")
                .help("Number of correction rounds")
                .takes_value(true)
                .default_value("2"),
        )
        .arg(
            Arg::with_name("max_candidates")
                .long("max-candidates")
                .short("n")
                .help("Maximum trie candidates considered per token")
                .takes_value(true)
                .default_value("5"),
        )
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .short("D")
                .help("Trace correction decisions to standard error"),
        )
        .get_matches();

    eprintln!("Loading language model...");
    let corpus = args.value_of("corpus").expect("corpus is required");
    let mut language_model = LanguageModel::new();
    language_model.build_from_file(corpus)?;

    eprintln!("Loading error model...");
    let error_corpus = args.value_of("errors").unwrap_or(corpus);
    let mut error_model = ErrorModel::new();
    error_model.build_from_file(error_corpus)?;

    eprintln!("Building trie...");
    let mut trie = Trie::new();
    trie.build(&language_model);
    eprintln!("Trie holds {} words.", trie.len());

    let params = CorrectionParams::default()
        .with_iterations(
            args.value_of("iterations")
                .unwrap()
                .parse::<usize>()
                .expect("iterations should be a positive integer"),
        )
        .with_max_candidates(
            args.value_of("max_candidates")
                .unwrap()
                .parse::<usize>()
                .expect("max-candidates should be a positive integer"),
        );

    let checker = Spellchecker::new(&language_model, &error_model, &trie).with_debug(args.is_present("debug"));

    eprintln!("Ready; reading queries from standard input...");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(err) => {
                eprintln!("skipping unreadable input line: {err}");
                continue;
            }
        };
        println!("{}", checker.correct_safe(&line, &params));
    }
    Ok(())
}
