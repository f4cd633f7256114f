use std::path::Path;

use bazaar_i18n::interpolate::placeholders;
use bazaar_i18n::loader::load_all_stores_from_dir;
use bazaar_i18n::{
    AbTestManager, Formality, Gender, TranslationOptions, Translator, VerbosityLevel,
    plural_category,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::warn;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("bazaar-i18n")
        .version("0.1.0")
        .about("Resolve translations, plural categories and A/B buckets")
        .subcommand_required(true)
        .subcommand(
            Command::new("translate")
                .about("Render a translation key from a directory of JSON content files")
                .arg(Arg::new("key").help("Dotted translation key").required(true))
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .short('d')
                        .help("Directory with one <locale>.json per locale")
                        .required(true),
                )
                .arg(
                    Arg::new("locale")
                        .long("locale")
                        .short('l')
                        .help("Active locale (default: the default locale)"),
                )
                .arg(
                    Arg::new("default-locale")
                        .long("default-locale")
                        .help("Default locale used as fallback")
                        .default_value("en"),
                )
                .arg(
                    Arg::new("count")
                        .long("count")
                        .short('c')
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(Arg::new("gender").long("gender").short('g'))
                .arg(Arg::new("formality").long("formality").short('f'))
                .arg(Arg::new("context").long("context").short('x'))
                .arg(Arg::new("region").long("region").short('r'))
                .arg(Arg::new("fallback").long("fallback"))
                .arg(
                    Arg::new("var")
                        .long("var")
                        .help("Interpolation variable as name=value")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .short('v')
                        .help("Log the fallback chain")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("plural")
                .about("Print the plural category of a count in a locale")
                .arg(Arg::new("locale").required(true))
                .arg(
                    Arg::new("count")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("bucket")
                .about("Print the variant a user is bucketed into")
                .arg(Arg::new("test-key").required(true))
                .arg(Arg::new("user-id").required(true))
                .arg(
                    Arg::new("variant")
                        .long("variant")
                        .help("Variant as id=text, in registration order")
                        .action(ArgAction::Append)
                        .required(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("translate", args)) => run_translate(args),
        Some(("plural", args)) => {
            let locale = args.get_one::<String>("locale").ok_or("missing locale")?;
            let count = *args.get_one::<i64>("count").ok_or("missing count")?;
            println!("{}", plural_category(locale, count.unsigned_abs()));
            Ok(())
        }
        Some(("bucket", args)) => run_bucket(args),
        _ => Err("unknown command".into()),
    }
}

fn split_pair(pair: &str) -> Result<(&str, &str), String> {
    pair.split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", pair))
}

fn run_translate(args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let key = args.get_one::<String>("key").ok_or("missing key")?;
    let dir = args.get_one::<String>("dir").ok_or("missing dir")?;
    let default_locale = args
        .get_one::<String>("default-locale")
        .ok_or("missing default locale")?;

    let stores = load_all_stores_from_dir(Path::new(dir))?;

    let mut i18n = Translator::new();
    i18n.with_default_locale(default_locale)
        .with_locale(
            args.get_one::<String>("locale")
                .unwrap_or(default_locale),
        )
        .with_stores(stores);
    let verbose = args.get_flag("verbose");
    if verbose {
        i18n.with_verbosity(VerbosityLevel::Verbose);
        if !i18n.has_locale(i18n.locale()) {
            warn!(locale = %i18n.locale(), dir = %dir, "No content file for the active locale");
        }
    }

    let mut options = TranslationOptions::new();
    if let Some(count) = args.get_one::<i64>("count") {
        options = options.with_count(*count);
    }
    if let Some(gender) = args.get_one::<String>("gender") {
        options = options.with_gender(gender.parse::<Gender>()?);
    }
    if let Some(formality) = args.get_one::<String>("formality") {
        options = options.with_formality(formality.parse::<Formality>()?);
    }
    if let Some(context) = args.get_one::<String>("context") {
        options = options.with_context(context);
    }
    if let Some(region) = args.get_one::<String>("region") {
        options = options.with_region(region);
    }
    if let Some(fallback) = args.get_one::<String>("fallback") {
        options = options.with_fallback(fallback);
    }
    for pair in args.get_many::<String>("var").into_iter().flatten() {
        let (name, value) = split_pair(pair)?;
        options = options.with_var(name, value);
    }

    let text = i18n.translate(key, &options);
    if verbose {
        let unfilled = placeholders(&text);
        if !unfilled.is_empty() {
            warn!(key = %key, "Placeholders left unfilled: {}", unfilled.join(", "));
        }
    }
    println!("{}", text);
    Ok(())
}

fn run_bucket(args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let test_key = args.get_one::<String>("test-key").ok_or("missing test key")?;
    let user_id = args.get_one::<String>("user-id").ok_or("missing user id")?;

    let variants = args
        .get_many::<String>("variant")
        .into_iter()
        .flatten()
        .map(|pair| split_pair(pair))
        .collect::<Result<Vec<_>, _>>()?;

    let mut tests = AbTestManager::new();
    tests.register_test(test_key, variants, None)?;

    let id = tests
        .assigned_variant(test_key, user_id)
        .ok_or("test not registered")?
        .to_string();
    let text = tests.get_variant(test_key, user_id).ok_or("test not registered")?;
    println!("{}\t{}", id, text);
    Ok(())
}
